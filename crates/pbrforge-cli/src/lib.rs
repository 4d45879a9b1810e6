//! PBRForge CLI library.
//!
//! Command implementations and the terminal logger used by the `pbrforge`
//! binary.

pub mod commands;
pub mod logger;
