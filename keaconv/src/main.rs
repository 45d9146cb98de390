//! keaconv - ISC DHCP to Kea configuration translator
//!
//! This is the main entry point for the keaconv CLI.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use keaconv_config::diagnostics::{render_error, render_warning};
use keaconv_config::Translation;
use keaconv_core::config::{Family, OutputFormat, TranslateConfig};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// keaconv - translate ISC DHCP server configurations to Kea
#[derive(Parser)]
#[command(name = "keaconv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a dhcpd.conf file
    Translate {
        /// Path to the ISC DHCP configuration
        input: PathBuf,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Translator settings file (TOML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Treat the input as a DHCPv6 configuration
        #[arg(short = '6', long)]
        v6: bool,

        /// Output format, overrides the settings file
        #[arg(long, value_enum)]
        format: Option<Format>,
    },

    /// Parse a dhcpd.conf file and report problems
    Check {
        /// Path to the ISC DHCP configuration
        input: PathBuf,

        /// Translator settings file (TOML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Treat the input as a DHCPv6 configuration
        #[arg(short = '6', long)]
        v6: bool,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Annotated,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Annotated => OutputFormat::Annotated,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Translate {
            input,
            output,
            config,
            v6,
            format,
        } => {
            let mut settings = settings(config.as_deref(), v6)?;
            if let Some(format) = format {
                settings.output.format = format.into();
            }
            let translation = run(&input, &settings)?;
            let text = keaconv_config::render_output(&translation, &settings.output)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, text)
                        .with_context(|| format!("Cannot write {}", path.display()))?;
                    tracing::info!("Wrote {}", path.display());
                }
                None => print!("{}", text),
            }
        }

        Commands::Check { input, config, v6 } => {
            let settings = settings(config.as_deref(), v6)?;
            let translation = run(&input, &settings)?;
            if translation.issues == 0 {
                println!("Configuration '{}' translates cleanly", input.display());
            } else {
                println!(
                    "Configuration '{}' translates with {} issue(s)",
                    input.display(),
                    translation.issues
                );
            }
        }

        Commands::Version => {
            println!("keaconv v{}", keaconv_core::VERSION);
        }
    }

    Ok(())
}

fn settings(path: Option<&Path>, v6: bool) -> anyhow::Result<TranslateConfig> {
    let mut settings = keaconv_config::load_settings(path)?;
    if v6 {
        settings.family = Family::V6;
    }
    Ok(settings)
}

/// Translate `input`, printing reports to stderr. Parse errors exit with
/// status 1.
fn run(input: &Path, settings: &TranslateConfig) -> anyhow::Result<Translation> {
    tracing::info!("Translating {}", input.display());
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("Cannot read {}", input.display()))?;
    let name = input.display().to_string();
    let color = std::io::stderr().is_terminal();

    let translation = match keaconv_config::translate(&source, settings) {
        Ok(translation) => translation,
        Err(e) => {
            eprint!("{}", render_error(&name, &source, &e, color));
            std::process::exit(1);
        }
    };

    for diagnostic in &translation.diagnostics {
        eprint!("{}", render_warning(&name, &source, diagnostic, color));
    }
    if translation.issues > 0 {
        eprintln!("{}: {} issue(s) need review", name, translation.issues);
    }
    Ok(translation)
}

