//! CLI subcommands

pub mod diff;
pub mod mb;
