//! CLI command handling module
//!
//! Handles the config and plugin subcommands, logging setup and text output.

mod commands;
mod logging;
pub mod plugin;
pub mod render;

pub use commands::{ConfigSubcommand, handle_config_command};
pub use logging::init_logging;
pub use plugin::{PluginSubcommand, handle_plugin_command};
pub use render::{render_catalog_table, render_quota};
