//! sqlrepl library - SQL sessions over a downloadable SQLite dataset
//!
//! Provides dataset loading, query sessions, schema introspection, result
//! export, and the command and output formatting infrastructure behind the
//! `sqlrepl` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod export;
pub mod fetch;
pub mod logging;
pub mod output;
pub mod schema;
pub mod session;
pub mod view;

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod fixtures;

#[cfg(test)]
pub mod test_utils;
