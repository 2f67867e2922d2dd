//! Command-line interface for confkeep
//!
//! Thin command surface over [`ConfigStore`]: read or rewrite one config
//! file per invocation. Machine-readable output is available behind the
//! global `--json` flag.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::logging::{init_logging, LogConfig};
use crate::store::{AccessMode, ConfigStore};
use crate::Result;

/// confkeep command-line interface
#[derive(Parser)]
#[command(name = "confkeep")]
#[command(about = "Order-preserving INI-style configuration store")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct ConfkeepCli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable JSON output for machine-readable results
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the value stored under a key
    Get {
        /// Config file to read
        file: PathBuf,

        /// Section name (case-insensitive)
        section: String,

        /// Key within the section (exact match)
        key: String,
    },

    /// Set a key to a value and rewrite the file
    Set {
        /// Config file to rewrite
        file: PathBuf,

        /// Section name (case-insensitive; created when missing)
        section: String,

        /// Key within the section (exact match)
        key: String,

        /// Value to store
        value: String,
    },

    /// Remove a key and rewrite the file
    Unset {
        /// Config file to rewrite
        file: PathBuf,

        /// Section name (case-insensitive)
        section: String,

        /// Key within the section (exact match)
        key: String,
    },

    /// Remove a whole section (exact name match) and rewrite the file
    DeleteSection {
        /// Config file to rewrite
        file: PathBuf,

        /// Section name (exact match)
        name: String,
    },

    /// List sections with their entry counts
    Sections {
        /// Config file to read
        file: PathBuf,
    },

    /// Round-trip the file to stdout
    Print {
        /// Config file to read
        file: PathBuf,
    },
}

/// One row of `sections` output.
#[derive(Serialize)]
struct SectionSummary {
    name: String,
    anonymous: bool,
    entries: usize,
    keys: usize,
}

/// CLI command executor
pub struct CliExecutor {
    json_output: bool,
}

impl CliExecutor {
    /// Create a new CLI executor
    pub fn new(json_output: bool) -> Self {
        Self { json_output }
    }

    /// Execute a CLI command
    pub fn execute(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Get { file, section, key } => self.get(&file, &section, &key),
            Commands::Set {
                file,
                section,
                key,
                value,
            } => self.set(&file, &section, &key, &value),
            Commands::Unset { file, section, key } => self.unset(&file, &section, &key),
            Commands::DeleteSection { file, name } => self.delete_section(&file, &name),
            Commands::Sections { file } => self.sections(&file),
            Commands::Print { file } => self.print(&file),
        }
    }

    fn get(&self, file: &Path, section: &str, key: &str) -> Result<()> {
        let mut store = open(file)?;
        match store.value(section, key)? {
            Some(value) => {
                if self.json_output {
                    let result = serde_json::json!({
                        "section": section,
                        "key": key,
                        "value": value,
                    });
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    println!("{}", value);
                }
                Ok(())
            }
            None => bail!("no value for {}.{} in {}", section, key, file.display()),
        }
    }

    fn set(&self, file: &Path, section: &str, key: &str, value: &str) -> Result<()> {
        let mut store = open(file)?;
        store.set_value(section, key, value)?;
        store
            .save(file)
            .with_context(|| format!("unable to rewrite {}", file.display()))?;
        info!(section, key, "value set");
        Ok(())
    }

    fn unset(&self, file: &Path, section: &str, key: &str) -> Result<()> {
        let mut store = open(file)?;
        store.delete_value(section, key)?;
        store
            .save(file)
            .with_context(|| format!("unable to rewrite {}", file.display()))?;
        info!(section, key, "value removed");
        Ok(())
    }

    fn delete_section(&self, file: &Path, name: &str) -> Result<()> {
        let mut store = open(file)?;
        store.delete_section(name);
        store
            .save(file)
            .with_context(|| format!("unable to rewrite {}", file.display()))?;
        info!(section = name, "section removed");
        Ok(())
    }

    fn sections(&self, file: &Path) -> Result<()> {
        let store = open(file)?;
        let summaries: Vec<SectionSummary> = store
            .iter()
            .map(|s| SectionSummary {
                name: s.name().to_string(),
                anonymous: s.is_anonymous(),
                entries: s.entry_count(),
                keys: s.key_count(),
            })
            .collect();

        if self.json_output {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        } else if summaries.is_empty() {
            println!("No sections found.");
        } else {
            println!("Sections:");
            for summary in summaries {
                let label = if summary.anonymous {
                    "(anonymous)".to_string()
                } else {
                    format!("[{}]", summary.name)
                };
                println!(
                    "  {} - {} entries, {} keys",
                    label, summary.entries, summary.keys
                );
            }
        }
        Ok(())
    }

    fn print(&self, file: &Path) -> Result<()> {
        let mut store = open(file)?;
        // Loading a read-only file drops the file-write capability, but
        // printing to stdout never touches the medium. Restore it so a
        // read-only file can still be printed.
        store.reopen(AccessMode::all());
        let mut stdout = std::io::stdout().lock();
        store.serialize(&mut stdout)?;
        Ok(())
    }
}

/// Opens `file` into a store with every capability granted.
///
/// A read-only file still opens; the store drops its file-write capability
/// and the rewriting commands report the denial instead of clobbering.
fn open(file: &Path) -> Result<ConfigStore> {
    let mut store = ConfigStore::new(AccessMode::all());
    store
        .load(file)
        .with_context(|| format!("unable to open {}", file.display()))?;
    Ok(store)
}

/// Run the CLI interface
pub fn run_cli() -> Result<()> {
    let cli = ConfkeepCli::parse();

    let log_config = if cli.verbose {
        LogConfig::development()
    } else {
        LogConfig::from_env()
    };
    init_logging(&log_config).map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    let executor = CliExecutor::new(cli.json);

    if let Err(e) = executor.execute(cli.command) {
        if cli.json {
            let error_json = serde_json::json!({
                "error": true,
                "message": e.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&error_json)?);
        } else {
            eprintln!("confkeep: {:#}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}
