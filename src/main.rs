//! # Pavers CLI
//!
//! Command-line interface for the paver personalization engine.
//!
//! ## Usage
//!
//! ```bash
//! # List personalizable products
//! pavers rules
//!
//! # Check an engraving the way the server would
//! pavers check paver-12x12 --cross "IN MEMORY OF" "JANE DOE" ...
//!
//! # Run the HTTP API
//! pavers serve --listen 0.0.0.0:8080 --consent-token secret
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pavers::{
    PaversError, RuleTable, SessionFlags,
    config::Notices,
    server::{self, ServerConfig},
    upload::DEFAULT_MAX_BYTES,
    validate::validate_lines,
};

/// Pavers - engraved paver personalization engine
#[derive(Parser, Debug)]
#[command(name = "pavers")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,

        /// JSON rule table (defaults to the builtin catalog)
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,

        /// Anti-forgery token expected on every submission
        #[arg(long)]
        consent_token: String,

        /// Largest accepted graphic in bytes
        #[arg(long, default_value_t = DEFAULT_MAX_BYTES)]
        max_upload: usize,

        /// Public URL prefix for graphic links (e.g. https://shop.example)
        #[arg(long, default_value = "")]
        public_url: String,

        /// Message shown after a successful submission
        #[arg(long)]
        success_message: Option<String>,

        /// Message shown when a submission cannot be processed
        #[arg(long)]
        error_message: Option<String>,

        /// Engraving disclaimer shown beneath the form
        #[arg(long)]
        disclaimer: Option<String>,
    },

    /// List personalizable products
    Rules {
        /// JSON rule table (defaults to the builtin catalog)
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,

        /// Print the table as a rule file
        #[arg(long)]
        json: bool,
    },

    /// Validate engraving lines for a product
    Check {
        /// Product key
        product: String,

        /// One argument per line
        lines: Vec<String>,

        /// Decorative cross selected
        #[arg(long)]
        cross: bool,

        /// Graphic attached
        #[arg(long)]
        graphic: bool,

        /// JSON rule table (defaults to the builtin catalog)
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pavers=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_rules(path: Option<&PathBuf>) -> Result<RuleTable, PaversError> {
    match path {
        Some(path) => RuleTable::load(path),
        None => Ok(RuleTable::builtin()),
    }
}

fn run() -> Result<(), PaversError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            rules,
            consent_token,
            max_upload,
            public_url,
            success_message,
            error_message,
            disclaimer,
        } => {
            let defaults = Notices::default();
            let config = ServerConfig {
                listen_addr: listen,
                rules_path: rules,
                consent_token,
                max_upload_bytes: max_upload,
                public_url,
                notices: Notices {
                    success: success_message.unwrap_or(defaults.success),
                    error: error_message.unwrap_or(defaults.error),
                    disclaimer: disclaimer.unwrap_or(defaults.disclaimer),
                },
            };

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))?;
        }

        Commands::Rules { rules, json } => {
            let table = load_rules(rules.as_ref())?;
            if json {
                println!("{}", table.to_json()?);
                return Ok(());
            }

            println!(
                "{:<16} {:>5} {:>7} {:>6} {:>8} {:>8}",
                "PRODUCT", "LINES", "COLUMNS", "CROSS", "REDUCED", "FEE"
            );
            for (product, rule) in table.iter() {
                let reduced = rule
                    .reduced_columns
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<16} {:>5} {:>7} {:>6} {:>8} {:>8}",
                    product,
                    rule.lines,
                    rule.columns,
                    if rule.allow_cross { "yes" } else { "no" },
                    reduced,
                    rule.graphic_fee.to_string()
                );
            }
        }

        Commands::Check {
            product,
            lines,
            cross,
            graphic,
            rules,
        } => {
            let table = load_rules(rules.as_ref())?;
            let Some(rule) = table.resolve(&product) else {
                println!("{} is not personalizable", product);
                return Ok(());
            };

            let flags = rule.sanitize_flags(SessionFlags {
                cross_selected: cross,
                graphic_attached: graphic,
            });
            let columns = rule.effective_columns(flags);

            match validate_lines(rule.lines, columns, &lines) {
                Ok(accepted) => {
                    println!("Accepted ({} lines x {} columns):", rule.lines, columns);
                    for (i, line) in accepted.iter().enumerate() {
                        println!("  {:>2} | {:<width$} |", i + 1, line.as_str(), width = columns);
                    }
                }
                Err(rejection) => {
                    println!("Rejected: {}", rejection);
                    std::process::exit(2);
                }
            }
        }
    }

    Ok(())
}
