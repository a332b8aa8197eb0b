//! CLI subcommands.

pub mod noise;
pub mod score;
