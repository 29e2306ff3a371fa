// SPDX-License-Identifier: PMPL-1.0-or-later
//! a11y-fixer CLI - accessibility diagnostics and automatic fixes for markup

use a11y_fixer::config::{default_config_path, load_config, write_default_config, Config};
use a11y_fixer::report::{generate_report, OutputFormat};
use a11y_fixer::resolver::{EditResolver, Resolution};
use a11y_fixer::rules::{RuleRegistry, Syntax};
use a11y_fixer::scanner::{self, FileReport};
use a11y_fixer::service::client::SuggestionClient;
use a11y_fixer::service::server;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Accessibility diagnostics for markup with safe, conflict-aware fixes
#[derive(Parser)]
#[command(name = "a11y-fixer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to .a11y-fixer.toml)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all rules on every markup file in a directory
    Check {
        /// Directory to scan
        dir: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Analyze a single file
    Analyze {
        /// File to analyze
        file: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,
    },

    /// Apply every available fix to a file
    Fix {
        /// File to fix
        file: PathBuf,

        /// Write the result back instead of printing it
        #[arg(long)]
        write: bool,

        /// Fetch edits from a suggestion service at this URL instead
        #[arg(long)]
        remote: Option<String>,

        /// Label mode sent to the suggestion service
        #[arg(long, default_value = "heuristic")]
        mode: String,
    },

    /// Run the suggestion service
    Serve {
        /// Address to bind (overrides the config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides the config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write a default configuration file
    InitConfig {
        /// Where to write it (defaults to .a11y-fixer.toml)
        path: Option<PathBuf>,
    },
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI
    Sarif,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Sarif => OutputFormat::Sarif,
        }
    }
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("a11y_fixer=debug")
    } else {
        EnvFilter::new(format!("a11y_fixer={}", level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = load_config(&config_path)?;
    init_logging(cli.verbose, &config.log.level);

    match cli.command {
        Commands::Check { dir, format, output } => {
            let registry = RuleRegistry::from_config(&config.analysis);
            let reports = scanner::scan_directory(&dir, &registry)?;
            let report = generate_report(&reports, format.into());
            write_output(&report, output.as_deref())?;

            if has_issues(&reports) {
                std::process::exit(1);
            }
        }

        Commands::Analyze { file, format } => {
            let registry = RuleRegistry::from_config(&config.analysis);
            let reports = vec![scanner::scan_file(&file, &registry)?];
            println!("{}", generate_report(&reports, format.into()));

            if has_issues(&reports) {
                std::process::exit(1);
            }
        }

        Commands::Fix { file, write, remote, mode } => {
            let mut text = std::fs::read_to_string(&file)?;
            let syntax = Syntax::from_path(&file);
            let resolution = fix_text(&mut text, syntax, &config, remote.as_deref(), &mode).await?;

            eprintln!(
                "Applied {} edit(s) to {} ({} duplicate(s) dropped, {} conflicting fix(es) skipped)",
                resolution.applied,
                file.display(),
                resolution.duplicates,
                resolution.conflicts.len()
            );
            for conflict in &resolution.conflicts {
                eprintln!("  skipped '{}': overlaps '{}'", conflict.title, conflict.conflicts_with);
            }

            if write {
                std::fs::write(&file, &text)?;
            } else {
                print!("{}", text);
            }
        }

        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Starting suggestion service on {}:{}", config.server.host, config.server.port);
            server::serve(config).await?;
        }

        Commands::InitConfig { path } => {
            let path = path.unwrap_or(config_path);
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            write_default_config(&path)?;
            eprintln!("Configuration written to {}", path.display());
        }
    }

    Ok(())
}

/// Fix `text` in place, locally or through a suggestion service
async fn fix_text(
    text: &mut String,
    syntax: Syntax,
    config: &Config,
    remote: Option<&str>,
    mode: &str,
) -> anyhow::Result<Resolution> {
    let resolver = EditResolver::new(config.resolver.overlap, config.analysis.line_endings);

    let url = remote.or(config.suggestions.url.as_deref());
    match url {
        Some(url) => {
            let client = SuggestionClient::new(url, Duration::from_secs(config.suggestions.timeout_secs))?
                .with_syntax(syntax);
            let current = text.as_str();
            let edits = client.suggest(current, mode, current, config.analysis.line_endings).await;
            Ok(resolver.apply_edits(text, &edits))
        }
        None => {
            let registry = RuleRegistry::from_config(&config.analysis);
            let issues = registry.analyze_as(text.as_str(), syntax);
            Ok(resolver.fix_all(text, &issues))
        }
    }
}

fn has_issues(reports: &[FileReport]) -> bool {
    reports.iter().any(|r| !r.issues.is_empty())
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
