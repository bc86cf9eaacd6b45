//! userdata-rs - generate EC2 user-data bootstrap scripts
//!
//! Renders a container-fleet boot script from command-line flags or a
//! manifest file and writes it to stdout or a file, optionally encoded
//! for the EC2 user-data transport.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use userdata_rs::encode::{encode_payload, Encoding};
use userdata_rs::{
    ContainerFleet, CredentialContext, FleetManifest, ImageRef, OsFamily, Session, UserData,
};

#[derive(Parser)]
#[command(name = "userdata-rs")]
#[command(author, version, about = "Generate EC2 user-data bootstrap scripts", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a container-fleet bootstrap script
    Render {
        /// Fleet manifest file (YAML, or JSON by extension)
        #[arg(long, conflicts_with = "image")]
        manifest: Option<PathBuf>,

        /// Image repository path, e.g. 123456789.dkr.ecr.us-east-1.amazonaws.com/app
        #[arg(long, required_unless_present = "manifest")]
        image: Option<String>,

        /// Fallback tag when the image path carries none
        #[arg(long, default_value = "latest")]
        tag: String,

        /// Target OS family
        #[arg(long, default_value = "amazon_linux")]
        os: OsFamily,

        /// Container environment variable as KEY=VALUE (repeatable)
        #[arg(short = 'e', long = "env", value_parser = parse_env_entry)]
        env: Vec<(String, String)>,

        /// Container command override
        #[arg(long, default_value = "")]
        cmd: String,

        /// Do not inject AWS credentials into the container environment
        #[arg(long)]
        no_aws_env: bool,

        /// AWS region (overrides the environment)
        #[arg(long)]
        region: Option<String>,

        /// AWS access key (overrides the environment)
        #[arg(long)]
        access_key: Option<String>,

        /// AWS secret key (overrides the environment)
        #[arg(long)]
        secret_key: Option<String>,

        /// Payload encoding: plain, base64, or gzip
        #[arg(long, default_value = "plain")]
        encoding: Encoding,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Parse a KEY=VALUE argument
fn parse_env_entry(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            manifest,
            image,
            tag,
            os,
            env,
            cmd,
            no_aws_env,
            region,
            access_key,
            secret_key,
            encoding,
            output,
        } => {
            let fleet = match manifest {
                Some(path) => load_manifest(&path)?.into_user_data(),
                None => {
                    // clap enforces --image when --manifest is absent
                    let image = image.context("--image is required without --manifest")?;
                    ContainerFleet::new(ImageRef::new(image).with_tag(tag))
                        .os(os)
                        .envs(env)
                        .cmd(cmd)
                        .include_aws_env(!no_aws_env)
                }
            };

            let mut session = Session::from_env();
            if let Some(region) = region {
                session = session.region(region);
            }
            if let Some(access_key) = access_key {
                session = session.access_key(access_key);
            }
            if let Some(secret_key) = secret_key {
                session = session.secret_key(secret_key);
            }

            let credentials = CredentialContext::resolve(Some(&session));
            let script = fleet.render(&credentials)?;
            let payload = encode_payload(&script, encoding)?;

            match output {
                Some(path) => {
                    fs::write(&path, &payload)
                        .with_context(|| format!("writing user-data to {}", path.display()))?;
                    info!("Wrote {} user-data to {}", encoding, path.display());
                }
                None => {
                    if payload.ends_with('\n') {
                        print!("{payload}");
                    } else {
                        println!("{payload}");
                    }
                }
            }
        }
    }

    Ok(())
}

/// Load a manifest, choosing the parser by file extension
fn load_manifest(path: &Path) -> anyhow::Result<FleetManifest> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading manifest {}", path.display()))?;

    let manifest = if path.extension().is_some_and(|ext| ext == "json") {
        FleetManifest::from_json(&text)?
    } else {
        FleetManifest::from_yaml(&text)?
    };

    Ok(manifest)
}
