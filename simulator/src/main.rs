use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use surveilcore::processing::radar::DEFAULT_RADAR_ID;
use surveilcore::{Domain, Stream};
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DomainArg {
    Radar,
    Adsb,
    All,
    /// Skip synthesis (e.g. only import a ground record)
    Neither,
}

#[derive(Parser)]
#[command(author, version, about = "Synthesize, write and reload radar/ADS-B demo datasets")]
struct Args {
    /// Load a workflow config from YAML (other generation flags are ignored)
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Directory holding the <domain>/<stream>/ trees
    #[arg(long, default_value = ".")]
    output_root: PathBuf,
    #[arg(long, value_enum, default_value_t = DomainArg::All)]
    domain: DomainArg,
    /// Total observations per domain (split evenly over three targets)
    #[arg(long)]
    count: Option<usize>,
    #[arg(long, default_value_t = 2025)]
    seed: u64,
    #[arg(long, default_value = DEFAULT_RADAR_ID)]
    radar_id: String,
    #[arg(long)]
    suffix: Option<String>,
    /// Use the current UTC time as file suffix
    #[arg(long, default_value_t = false)]
    timestamp_suffix: bool,
    /// Normalize an extractor JSON record and store it under ground/info
    #[arg(long)]
    ground_record: Option<PathBuf>,
    #[arg(long)]
    provider: Option<String>,
    /// Reload every written stream and print a summary
    #[arg(long, default_value_t = false)]
    load: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        let mut config = WorkflowConfig::from_args(args.output_root.clone(), args.seed, &args.radar_id);
        if let Some(count) = args.count {
            config.radar.count = count;
            config.adsb.count = count;
        }
        if let Some(suffix) = &args.suffix {
            config.suffix = suffix.clone();
        }
        config.timestamp_suffix = args.timestamp_suffix;
        config
    };
    match args.domain {
        DomainArg::Radar => config.adsb.enabled = false,
        DomainArg::Adsb => config.radar.enabled = false,
        DomainArg::Neither => {
            config.radar.enabled = false;
            config.adsb.enabled = false;
        }
        DomainArg::All => {}
    }

    let runner = Runner::new(config);
    let result = runner.execute().context("executing workflow")?;
    if !result.runs.is_empty() {
        println!("Suffix: {}", result.suffix);
    }
    for run in &result.runs {
        println!(
            "[OK] {} -> {} observations, {} alerts",
            run.domain, run.observations, run.alerts
        );
        for path in [&run.info.csv, &run.info.json, &run.pred.csv, &run.pred.json] {
            println!("  - {}", path.display());
        }
    }

    let mut domains: Vec<Domain> = result.runs.iter().map(|run| run.domain).collect();
    if let Some(path) = &args.ground_record {
        let files = runner.import_ground(path, args.provider.as_deref())?;
        println!("[OK] ground -> {}, {}", files.json.display(), files.csv.display());
        domains.push(Domain::Ground);
    }

    if args.load {
        for domain in domains {
            let streams: &[Stream] = if domain == Domain::Ground {
                &[Stream::Info]
            } else {
                &[Stream::Info, Stream::Pred]
            };
            for &stream in streams {
                let summary = runner.ingest(domain, stream);
                println!(
                    "Loaded {}/{}: {} rows, {} columns, span {:?} .. {:?}, {} cells degraded",
                    summary.domain,
                    summary.stream,
                    summary.rows,
                    summary.columns.len(),
                    summary.first,
                    summary.last,
                    summary.metrics.cells_degraded
                );
            }
        }
    }

    Ok(())
}
