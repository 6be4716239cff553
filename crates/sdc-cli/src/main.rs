use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sdc_host::{relative_path, ProductVersion};

mod commands;

use commands::compare::DeclaredShape;

/// Exit status when a comparison completes but is not compliant.
const EXIT_NOT_COMPLIANT: u8 = 2;

#[derive(Parser)]
#[command(name = "sdc")]
#[command(about = "Server desired-configuration checks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare an observed configuration file against a declared one.
    /// Prints the report as JSON; exits 2 when not compliant.
    Compare {
        /// Observed configuration (YAML or JSON mapping)
        #[arg(long)]
        observed: String,

        /// Declared configuration (YAML or JSON mapping)
        #[arg(long)]
        declared: String,

        /// How to present the declared document
        #[arg(long, value_enum, default_value_t = DeclaredShape::Map)]
        shape: DeclaredShape,

        /// Restrict the check to these keys (repeatable)
        #[arg(long = "key")]
        keys: Vec<String>,
    },

    /// Compute layered settings hash + print canonical JSON
    SettingsHash {
        /// Paths in merge order (base -> site -> host ...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Report settings keys no code reads
    SettingsCheck {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,

        /// Fail when unknown keys are present
        #[arg(long, default_value_t = false)]
        strict: bool,
    },

    /// Print the registry keys that mark a server as trusted
    TrustZoneKeys {
        /// Server name
        #[arg(long)]
        server: String,

        /// Layered settings paths in merge order (defaults apply when omitted)
        #[arg(long = "settings")]
        settings_paths: Vec<String>,
    },

    /// Print the domain-relative path of a distinguished name
    OuPath {
        /// Distinguished name, e.g. OU=Web,OU=Servers,DC=contoso,DC=com
        dn: String,
    },

    /// Parse a product version string and print its four parts
    ProductVersion {
        /// Version string, e.g. 16.0.4351.1000
        version: String,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    // Load .env.local if present (dev convenience, e.g. RUST_LOG).
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Compare {
            observed,
            declared,
            shape,
            keys,
        } => {
            let report = commands::compare::run_compare(&observed, &declared, shape, &keys)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_compliant() {
                return Ok(ExitCode::from(EXIT_NOT_COMPLIANT));
            }
        }

        Commands::SettingsHash { paths } => {
            let loaded = commands::load_settings(&paths)?;
            println!("settings_hash={}", loaded.settings_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::SettingsCheck { paths, strict } => {
            let report = commands::settings::run_settings_check(&paths, strict)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::TrustZoneKeys {
            server,
            settings_paths,
        } => {
            for key in commands::settings::trust_zone_keys(&settings_paths, &server)? {
                println!("{key}");
            }
        }

        Commands::OuPath { dn } => {
            println!("{}", relative_path(&dn));
        }

        Commands::ProductVersion { version } => {
            let v: ProductVersion = version.parse()?;
            println!("{}", serde_json::to_string(&v)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
