//! Command-line interface components
//!
//! This module contains CLI-specific code for the Marker Fetcher application:
//! argument parsing and the command handlers.

pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, ConfigAction, ConfigArgs, DownloadArgs, GlobalArgs, ValidateArgs,
};
pub use commands::{handle_config, handle_download, handle_validate, load_config};
