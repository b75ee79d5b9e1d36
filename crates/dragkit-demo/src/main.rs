//! Run the demo scenarios from the command line.

use clap::Parser;
use dragkit_core::DragConfig;
use dragkit_demo::{DemoError, ScenarioRegistry, run_scenario};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "Scripted, headless DragKit drags", long_about = None)]
struct Args {
    /// Scenario to run; all of them when omitted
    scenario: Option<String>,

    /// JSON file with a drag config
    #[arg(long)]
    config: Option<PathBuf>,

    /// List the scenarios and exit
    #[arg(long)]
    list: bool,
}

fn load_config(path: Option<&Path>) -> Result<DragConfig, DemoError> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(DragConfig::from_json(&json)?)
        }
        None => Ok(DragConfig::default()),
    }
}

fn run(args: Args) -> Result<(), DemoError> {
    if args.list {
        ScenarioRegistry::print_all();
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;
    let scenarios = match args.scenario {
        Some(name) => vec![ScenarioRegistry::find(&name).ok_or(DemoError::UnknownScenario(name))?],
        None => ScenarioRegistry::all(),
    };
    for scenario in &scenarios {
        run_scenario(scenario, &config)?.print();
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    log::info!("Starting DragKit demo");
    if let Err(e) = run(args) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
