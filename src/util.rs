//! Shared text helpers for the skillsmith codebase

/// Find the largest byte index <= `index` that is a char boundary in `s`.
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// First `max_chars` characters of `s` (counted in chars, not bytes).
pub fn take_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Last `max_chars` characters of `s` (counted in chars, not bytes).
pub fn last_chars(s: &str, max_chars: usize) -> &str {
    let total = s.chars().count();
    if total <= max_chars {
        return s;
    }
    match s.char_indices().nth(total - max_chars) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

/// Convert a page title into a filesystem-safe name.
/// Unsafe characters become `_`, whitespace runs collapse to a single `_`,
/// and the result is capped at 50 chars.
pub fn sanitize_filename(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let collapsed = safe.split_whitespace().collect::<Vec<_>>().join("_");
    take_chars(&collapsed, 50).to_string()
}

/// Group items by a string key, preserving first-appearance order of keys.
pub fn group_in_order<T, F>(items: &[T], key: F) -> Vec<(String, Vec<usize>)>
where
    F: Fn(&T) -> &str,
{
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        let k = key(item);
        match groups.iter_mut().find(|(name, _)| name == k) {
            Some((_, members)) => members.push(idx),
            None => groups.push((k.to_string(), vec![idx])),
        }
    }
    groups
}
