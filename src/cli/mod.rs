//! CLI command handlers

pub mod seed;
pub mod serve;
