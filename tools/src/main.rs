//! fitdata-gen: headless dataset generator.
//!
//! Usage:
//!   fitdata-gen --seed 42 --customers 2500 --out data/raw
//!   fitdata-gen --seed 42 --config params.json --db dataset.db
//!   fitdata-gen --dump-config > params.json

use anyhow::Result;
use fitdata_core::{
    config::SimConfig,
    dataset::{Dataset, DatasetSummary},
    engine::GenEngine,
    export,
    store::DatasetStore,
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--dump-config") {
        println!("{}", serde_json::to_string_pretty(&SimConfig::default())?);
        return Ok(());
    }

    let seed = parse_arg(&args, "--seed", 42u64);
    let out_dir = str_arg(&args, "--out").unwrap_or("data/raw");
    let db = str_arg(&args, "--db");

    let mut config = match str_arg(&args, "--config") {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    config.population = parse_arg(&args, "--customers", config.population);

    println!("fitdata-gen");
    println!("  seed:       {seed}");
    println!("  customers:  {}", config.population);
    println!("  horizon:    {} ..= {}", config.horizon.start, config.horizon.end);
    println!("  out:        {out_dir}");
    if let Some(db) = db {
        println!("  db:         {db}");
    }
    println!();

    let mut engine = GenEngine::build(seed, config)?;
    let dataset = engine.run()?;

    export::write_dataset(&dataset, Path::new(out_dir))?;

    if let Some(db) = db {
        persist(&engine, &dataset, db)?;
    }

    print_summary(&dataset.summary());
    Ok(())
}

fn persist(engine: &GenEngine, dataset: &Dataset, db: &str) -> Result<()> {
    let store = DatasetStore::open(db)?;
    store.migrate()?;

    let seed = engine.seed();
    let run_id = format!("run-{seed}-{}", unix_secs());
    let config = engine.config();
    store.insert_run(
        &run_id,
        seed,
        env!("CARGO_PKG_VERSION"),
        config.population,
        config.facility_capacity,
    )?;
    store.insert_dataset(&run_id, dataset)?;
    println!("  run_id:     {run_id}");
    Ok(())
}

fn print_summary(summary: &DatasetSummary) {
    println!("=== DONE ===");
    println!("  customers:      {}", summary.customers);
    println!(
        "  subscriptions:  {} ({} active, {} canceled)",
        summary.subscriptions, summary.active_subscriptions, summary.canceled_subscriptions
    );
    println!("  visits:         {}", summary.visits);
    println!("  addons:         {}", summary.addons);
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn unix_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
