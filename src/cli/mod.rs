//! Command-line interface for jobsearch.

mod commands;

use clap::{Parser, Subcommand};

/// jobsearch - search several job boards at once through a JobSpy service
#[derive(Parser)]
#[command(name = "jobsearch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive web UI
    #[command(alias = "web")]
    Serve,

    /// Search every configured job title concurrently and save a spreadsheet
    #[command(alias = "b")]
    Batch,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// List supported job sites
    Sites,

    /// List supported countries
    Countries,
}

pub use commands::*;
