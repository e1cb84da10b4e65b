use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use streaming_triangles::prelude::*;
use streaming_triangles::streaming::TSV_HEADER;

#[derive(Parser)]
#[command(name = "triangle-count")]
#[command(about = "Bounded-memory triangle counting over edge update streams")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Global triangle estimates, one row per statistics window
    Count(RunArgs),
    /// Per-node accuracy against an exact local counter
    Local(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Edge update file: `+|- u v time` or `u v time` per line
    #[arg(short, long)]
    input: PathBuf,

    /// R, RH, F, FH, P or V
    #[arg(short, long, required_unless_present = "config")]
    sampler: Option<String>,

    /// Reservoir or ensemble size, or p for the fixed-p samplers
    #[arg(short, long, required_unless_present = "config")]
    param: Option<String>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 10_000)]
    stats_every: usize,

    /// Process removals instead of stopping at the first one
    #[arg(long)]
    with_deletions: bool,

    /// JSON experiment file; replaces the sampler and run flags
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Tsv,
    Json,
}

fn parse_sampler(code: &str, param: &str, only_add: bool) -> anyhow::Result<SamplerConfig> {
    let size = || -> anyhow::Result<usize> {
        param
            .parse::<usize>()
            .with_context(|| format!("sampler {} expects an integer size, got '{}'", code, param))
    };
    let p = || -> anyhow::Result<f64> {
        param
            .parse::<f64>()
            .with_context(|| format!("sampler {} expects a probability, got '{}'", code, param))
    };

    Ok(match code {
        "R" => SamplerConfig::reservoir(size()?, false, only_add),
        "RH" => SamplerConfig::reservoir(size()?, true, only_add),
        "F" => SamplerConfig::FixedP { p: p()?, sample_and_hold: false },
        "FH" => SamplerConfig::FixedP { p: p()?, sample_and_hold: true },
        "P" => {
            let size = size()?;
            SamplerConfig::Pinar { edge_reservoir: size, wedge_reservoir: size }
        }
        "V" => SamplerConfig::Pavan { estimators: size()? },
        other => bail!("sampler '{}' not supported", other),
    })
}

fn experiment(args: &RunArgs, local: bool) -> anyhow::Result<ExperimentConfig> {
    let mut config = if let Some(path) = &args.config {
        ExperimentConfig::from_json_file(path)
            .with_context(|| format!("loading experiment config {}", path.display()))?
    } else {
        let only_add = !args.with_deletions;
        let (Some(code), Some(param)) = (&args.sampler, &args.param) else {
            bail!("--sampler and --param are required without --config");
        };
        ExperimentConfig {
            run: RunConfig {
                seed: args.seed,
                stats_every: args.stats_every,
                only_add,
                ..RunConfig::default()
            },
            sampler: parse_sampler(code, param, only_add)?,
        }
    };
    config.run.local = local;
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Count(args) => {
            let config = experiment(&args, false)?;
            let mut sampler = build_sampler(&config.sampler, &config.run)?;
            let updates = EdgeStreamReader::from_path(&args.input)?.with_timestamps(true);

            if args.format == OutputFormat::Tsv {
                writeln!(out, "{}", TSV_HEADER.join("\t"))?;
            }
            run_counting(updates, sampler.as_mut(), &config.run, |window| {
                match args.format {
                    OutputFormat::Tsv => writeln!(out, "{}", window.to_tsv_row())?,
                    OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(window)?)?,
                }
                Ok(())
            })?;
        }
        Commands::Local(args) => {
            let config = experiment(&args, true)?;
            let mut sampler = build_sampler(&config.sampler, &config.run)?;
            let updates = EdgeStreamReader::from_path(&args.input)?;

            run_local_evaluation(updates, sampler.as_mut(), &config.run, |row| {
                match args.format {
                    OutputFormat::Tsv => writeln!(out, "{}", row.to_tsv_row())?,
                    OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(row)?)?,
                }
                Ok(())
            })?;
        }
    }

    out.flush()?;
    Ok(())
}
