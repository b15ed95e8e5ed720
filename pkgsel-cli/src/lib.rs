//! `pkgsel` command-line front end: configuration, output formats and
//! command handlers over [`pkgsel_core`].

pub mod cli;
pub mod config;
pub mod output;

pub use cli::{execute, Cli};
