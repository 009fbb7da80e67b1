//! Command line front end for inspection tables.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod summary;
