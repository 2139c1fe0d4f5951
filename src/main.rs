use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use hedis_stars::utils::{SyntheticPlanConfig, generate_plan_snapshot};
use hedis_stars::{EngineConfig, MeasureRegistry, PlanSnapshot, PortfolioEngine};
use log::info;

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

#[derive(Parser, Debug)]
#[command(name = "hedis-stars")]
#[command(version)]
#[command(about = "Rate a Medicare Advantage HEDIS portfolio and simulate gap-closure ROI", long_about = None)]
struct Cli {
    /// Plan snapshot JSON; a seeded synthetic plan is generated when omitted
    snapshot: Option<PathBuf>,

    /// Engine configuration JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed of the synthetic plan
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Members in the synthetic plan
    #[arg(long, default_value_t = 5_000)]
    members: usize,

    /// Include every disparity in the equity report
    #[arg(long)]
    detailed: bool,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();
    let start = Instant::now();

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => EngineConfig::default(),
    };
    info!("Configuration:\n{config}");

    let snapshot = match &args.snapshot {
        Some(path) => PlanSnapshot::from_json_file(path)
            .with_context(|| format!("loading snapshot {}", path.display()))?,
        None => {
            let synthetic = SyntheticPlanConfig {
                seed: args.seed,
                members: args.members,
                ..SyntheticPlanConfig::default()
            };
            info!(
                "No snapshot given; generating a synthetic plan of {} members (seed {})",
                synthetic.members, synthetic.seed
            );
            generate_plan_snapshot(&synthetic)
        }
    };

    let engine = PortfolioEngine::new(config, MeasureRegistry::standard())?;
    let report = engine.run(&snapshot)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.to_text(args.detailed));
    }

    info!("Completed in {:?}", start.elapsed());
    Ok(())
}
