//! Connect Native CLI
//!
//! ```bash
//! # Compile an object literal of helper calls into PropMapping JSON
//! connect-native props Button.props.ts
//!
//! # Render a PropMapping as the JavaScript evaluated at inspection time
//! connect-native render mapping.json
//!
//! # Parse every connection file of a project
//! connect-native parse --dir ./web
//!
//! # Create connection files for linked components
//! connect-native create links.json --dir ./web
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use connect_native::protocol::{GroupStatus, MessageLevel, ParseOptions};
use connect_native::{
    dispatch_create, group_create_payloads, parse_code_connect, parse_prop_mapping_source,
    render_prop_mapping, select_backend, PendingConnection, ProjectConfig, PropMapping,
};

#[derive(Parser)]
#[command(
    name = "connect-native",
    version = env!("CARGO_PKG_VERSION"),
    about = "Compile figma.* helper calls and drive Code Connect parser executables"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (use multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an object literal of helper calls and print its PropMapping as JSON
    Props {
        file: PathBuf,
    },
    /// Render a PropMapping JSON file as a JavaScript object literal
    Render {
        mapping: PathBuf,
        /// Layer expression the lookups run against
        #[arg(long)]
        selector: Option<String>,
    },
    /// Parse connection files and print the PARSE response
    Parse {
        /// Files relative to the project directory; all connection files when empty
        paths: Vec<String>,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        #[arg(long)]
        auto_add_imports: bool,
    },
    /// Group linked components by source file and create their connection files
    Create {
        /// JSON array of pending connections
        connections: PathBuf,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Write every file here instead of next to its source file
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("info"),
                1 => EnvFilter::new("debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry().with(formatter).with(filter).init();
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Props { file } => {
            let source = read(&file)?;
            let props = parse_prop_mapping_source(&source, &file.display().to_string())?;
            println!("{}", serde_json::to_string_pretty(&props)?);
            Ok(true)
        }
        Commands::Render { mapping, selector } => {
            let data = read(&mapping)?;
            let de = &mut serde_json::Deserializer::from_str(&data);
            let props: PropMapping = serde_path_to_error::deserialize(de)
                .with_context(|| format!("{} is not a PropMapping", mapping.display()))?;
            println!("{}", render_prop_mapping(&props, selector.as_deref())?);
            Ok(true)
        }
        Commands::Parse {
            paths,
            dir,
            auto_add_imports,
        } => {
            let config = ProjectConfig::load(&dir)?.code_connect;
            let backend = select_backend(&config, &dir)?;
            let options = ParseOptions {
                auto_add_imports,
                verbose: cli.verbose > 0,
            };
            let response = parse_code_connect(backend.as_ref(), &dir, paths, &config, options)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(response
                .messages
                .iter()
                .all(|m| m.level != MessageLevel::Error))
        }
        Commands::Create {
            connections,
            dir,
            out_dir,
        } => {
            let config = ProjectConfig::load(&dir)?.code_connect;
            let data = read(&connections)?;
            let de = &mut serde_json::Deserializer::from_str(&data);
            let pending: Vec<PendingConnection> = serde_path_to_error::deserialize(de)
                .with_context(|| format!("{} is not a list of connections", connections.display()))?;

            let payloads = group_create_payloads(pending, &config, out_dir.as_deref());
            let backend = select_backend(&config, &dir)?;
            let outcome = dispatch_create(backend.as_ref(), &payloads);

            for group in &outcome.groups {
                match &group.status {
                    GroupStatus::Created(files) => {
                        for file in files {
                            println!("created  {}", file.file_path);
                        }
                    }
                    GroupStatus::Rejected => println!("rejected {}", group.destination),
                    GroupStatus::Failed(e) => println!("failed   {}: {}", group.destination, e),
                }
            }
            Ok(outcome.all_succeeded())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
