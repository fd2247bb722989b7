use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use founder_frequency::{
    calculate_extended_profile, calculate_profile, detect_amplifications, detect_tensions,
    load_requests, Config, LookupTables, PromptAssembler, TierSelection,
};

#[derive(Parser)]
#[command(name = "founder-frequency", version, about = "Founder frequency profiles and report prompts")]
struct Cli {
    /// JSON config file (defaults + environment when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full profile as JSON
    Profile {
        name: String,
        dob: String,
        /// Forecast year (implies --extended)
        #[arg(long)]
        year: Option<i32>,
        /// Include personal year, personal month and quarterly forecast
        #[arg(long)]
        extended: bool,
    },
    /// Print detected tensions and amplifications
    Patterns { name: String, dob: String },
    /// Print the assembled prompt(s) for a tier
    Prompt {
        name: String,
        dob: String,
        #[arg(long, value_enum, default_value_t = TierArg::Insight)]
        tier: TierArg,
    },
    /// One JSON line of metadata per `name,dob` CSV row
    Batch {
        csv: PathBuf,
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TierArg {
    Insight,
    Blueprint,
    Both,
}

impl From<TierArg> for TierSelection {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::Insight => TierSelection::Insight,
            TierArg::Blueprint => TierSelection::Blueprint,
            TierArg::Both => TierSelection::Both,
        }
    }
}

fn main() -> Result<()> {
    // Logs on stderr; stdout carries JSON
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    match cli.command {
        Commands::Profile { name, dob, year, extended } => run_profile(&name, &dob, year, extended),
        Commands::Patterns { name, dob } => run_patterns(&name, &dob),
        Commands::Prompt { name, dob, tier } => run_prompt(&config, &name, &dob, tier.into()),
        Commands::Batch { csv, year } => run_batch(&config, &csv, year),
    }
}

fn load_tables(config: &Config) -> LookupTables {
    LookupTables::load(config.matrix_path.as_deref(), config.matrix_extended_path.as_deref())
}

fn run_profile(name: &str, dob: &str, year: Option<i32>, extended: bool) -> Result<()> {
    let output = if extended || year.is_some() {
        serde_json::to_string_pretty(&calculate_extended_profile(name, dob, year)?)?
    } else {
        serde_json::to_string_pretty(&calculate_profile(name, dob)?)?
    };
    println!("{}", output);
    Ok(())
}

fn run_patterns(name: &str, dob: &str) -> Result<()> {
    let profile = calculate_profile(name, dob)?;
    let output = json!({
        "summary": profile.summary,
        "tensions": detect_tensions(&profile),
        "amplifications": detect_amplifications(&profile),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_prompt(config: &Config, name: &str, dob: &str, selection: TierSelection) -> Result<()> {
    let assembler = PromptAssembler::new(load_tables(config));
    let prompts = assembler.assemble(name, dob, selection)?;

    if let Some(insight) = &prompts.insight {
        if selection == TierSelection::Both {
            println!("━━━━━━━━━━ INSIGHT ━━━━━━━━━━");
        }
        println!("{}", insight);
    }
    if let Some(blueprint) = &prompts.blueprint {
        if selection == TierSelection::Both {
            println!("\n━━━━━━━━━━ BLUEPRINT ━━━━━━━━━━");
        }
        println!("{}", blueprint);
    }
    Ok(())
}

fn run_batch(config: &Config, csv: &Path, year: Option<i32>) -> Result<()> {
    let requests = load_requests(csv).with_context(|| format!("Failed to load batch: {:?}", csv))?;
    let assembler = PromptAssembler::new(load_tables(config)).with_target_year(year);

    let mut ok = 0;
    let mut failed = 0;

    for (row, request) in requests.iter().enumerate() {
        let result = request.validate().and_then(|(name, dob)| {
            let cache_key = request.cache_key(year)?;
            let metadata = assembler.metadata(name, dob)?;
            Ok(json!({ "row": row + 1, "name": name, "cache_key": cache_key, "metadata": metadata }))
        });

        match result {
            Ok(line) => {
                println!("{}", serde_json::to_string(&line)?);
                ok += 1;
            }
            Err(e) => {
                warn!(row = row + 1, error = %e, "skipping row");
                failed += 1;
            }
        }
    }

    eprintln!("✓ {} rows processed, {} skipped", ok, failed);
    Ok(())
}
