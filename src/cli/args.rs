//! CLI argument definitions using clap
//!
//! The driver accepts exactly two options. Anything else on the command line
//! is reported as unrecognized by [`partition_args`](crate::cli::process::partition_args)
//! before clap ever sees it.

use clap::{ArgAction, CommandFactory, Parser};

use crate::tags::{ALL_TAGS, LIST_TAGS};

/// Test driver options
#[derive(Parser, Debug, Clone)]
#[command(name = "tagtest", about = "Test driver options", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(args_override_self = true)]
pub struct Args {
    /// Produce help message
    #[arg(short = 'h', long = "help", action = ArgAction::SetTrue)]
    pub help: bool,

    /// --tags=tag1,tag2 selects the active log tags; --tags by itself prints the available tags
    #[arg(
        short = 't',
        long = "tags",
        value_name = "TAGS",
        default_value = ALL_TAGS,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = LIST_TAGS
    )]
    pub tags: String,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            help: false,
            tags: ALL_TAGS.to_string(),
        }
    }
}

impl Args {
    /// Whether the tag listing was requested
    pub fn wants_tag_listing(&self) -> bool {
        self.tags == LIST_TAGS
    }
}

/// Render the help text for the given program name
pub fn help_text(program_name: &str) -> String {
    Args::command()
        .bin_name(program_name.to_string())
        .render_help()
        .to_string()
}
