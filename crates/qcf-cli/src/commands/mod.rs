//! CLI command implementations.

pub mod all;
pub mod common;
pub mod feedback;
pub mod single_shot;
