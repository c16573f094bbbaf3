//! skillsmith - Turn documentation into parameterized templates
//!
//! Builds a corpus from markdown docs, analyzes it (tool type, workflows, code
//! examples, repeated patterns, pitfalls, documentation gaps) and synthesizes
//! `${PLACEHOLDER}` templates from the examples it finds.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod pipeline;
pub mod synthesis;
pub mod util;
