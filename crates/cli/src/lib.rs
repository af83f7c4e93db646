//! Command-line front end for opening skylink chart sessions.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
