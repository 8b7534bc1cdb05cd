//! Ellie Agent Service
//!
//! The deployable worker around `ellie-core`: environment configuration, the
//! command line, the console room and the startup sequence. The `agent`
//! binary is a thin wrapper around this library.

pub mod cli;
pub mod config;
pub mod console;
pub mod worker;
