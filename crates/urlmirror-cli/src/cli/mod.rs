//! CLI for the urlmirror engine.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use urlmirror_core::config;

use commands::{run_canon, run_convert, run_equal, run_links, run_local};

/// Top-level CLI for urlmirror.
#[derive(Debug, Parser)]
#[command(name = "urlmirror")]
#[command(about = "urlmirror: URL canonicalization and offline mirror tools", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/urlmirror/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the canonical form of each URL.
    Canon {
        /// URLs to canonicalize.
        #[arg(required = true)]
        urls: Vec<String>,
        /// Reject URLs without a recognized scheme.
        #[arg(long)]
        strict: bool,
        /// Mask passwords in the output.
        #[arg(long)]
        hide_password: bool,
    },

    /// Tell whether two URLs denote the same resource.
    Equal { a: String, b: String },

    /// List the links found in a file.
    Links {
        /// File to scan.
        path: PathBuf,
        /// Scan as HTML (link attributes) instead of plain text.
        #[arg(long)]
        html: bool,
        /// URL the document was retrieved from.
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        /// Base for relative links when the document has none.
        #[arg(long, value_name = "URL")]
        base: Option<String>,
        /// Print occurrences as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the local file name each URL maps to.
    Local {
        #[arg(required = true)]
        urls: Vec<String>,
        /// Mirror root (default: current directory).
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },

    /// Convert links in an already-mirrored HTML document to local references.
    Convert {
        /// URL the document was retrieved from.
        url: String,
        /// Mirror root (default: current directory).
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        let root = |root: Option<PathBuf>| -> Result<PathBuf> {
            match root {
                Some(r) => Ok(r),
                None => Ok(std::env::current_dir()?),
            }
        };

        match cli.command {
            CliCommand::Canon {
                urls,
                strict,
                hide_password,
            } => run_canon(&cfg, &urls, strict, hide_password)?,
            CliCommand::Equal { a, b } => run_equal(&cfg, &a, &b)?,
            CliCommand::Links {
                path,
                html,
                url,
                base,
                json,
            } => run_links(&cfg, &path, html, url.as_deref(), base, json).await?,
            CliCommand::Local { urls, root: dir } => run_local(&cfg, &urls, root(dir)?)?,
            CliCommand::Convert { url, root: dir } => run_convert(&cfg, &url, root(dir)?).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
