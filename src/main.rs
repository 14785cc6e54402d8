use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wardrobe_engine::config::{CliConfig, EngineSettings, FileConfig};
use wardrobe_engine::{load_catalog, Pipeline, Profile, RawProfile};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the JSON catalog file.
    #[clap(value_parser = parse_path)]
    pub catalog: PathBuf,

    /// Path to the JSON wardrobe profile file.
    #[clap(value_parser = parse_path)]
    pub profile: PathBuf,

    /// Path to an optional TOML config file. Its values override CLI flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Attach per-stage explanations to every ranked garment.
    #[clap(long, default_value_t = false)]
    pub debug: bool,

    /// Years outside a brand's age range that still count as a weak match.
    #[clap(long)]
    pub age_tail_years: Option<u8>,

    /// Pretty-print the JSON output.
    #[clap(long, default_value_t = false)]
    pub pretty: bool,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let settings = EngineSettings::resolve(
        &CliConfig {
            debug: cli_args.debug,
            age_tail_years: cli_args.age_tail_years,
        },
        file_config,
    )?;

    info!("Loading catalog from {:?}...", cli_args.catalog);
    let catalog = load_catalog(&cli_args.catalog)?;

    let profile_content = std::fs::read_to_string(&cli_args.profile)
        .with_context(|| format!("Failed to read profile file: {:?}", cli_args.profile))?;
    let raw: RawProfile = serde_json::from_str(&profile_content)
        .with_context(|| format!("Failed to parse profile file: {:?}", cli_args.profile))?;

    let profile = match Profile::from_raw(raw, &catalog) {
        Ok(profile) => profile,
        Err(validation) => {
            for (field, messages) in validation.fields() {
                for message in messages {
                    error!("{}: {}", field, message);
                }
            }
            bail!("Profile failed validation");
        }
    };

    let pipeline = Pipeline::core(&settings)?;

    info!("Generating recommendations...");
    let recommendations = pipeline.recommend(&profile, &catalog, settings.debug);
    info!(
        "Ranked garments across {} basics.",
        recommendations.basics.len()
    );

    let output = if cli_args.pretty {
        serde_json::to_string_pretty(&recommendations)?
    } else {
        serde_json::to_string(&recommendations)?
    };
    println!("{}", output);

    Ok(())
}
