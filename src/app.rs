// Replay frontend: drives a prognosis session through a recorded scenario and
// prints what the host would have shown.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::core::{
    config::ConfigManager,
    coordinator::Prognosis,
    error::Result,
    memory::file::MemoryFile,
    replay_engine::{ReplayEngine, Scenario},
};

#[derive(Parser)]
#[command(name = "prognosis-replay")]
#[command(about = "Replay a recorded host timeline through the prognosis core")]
#[command(version)]
struct Args {
    /// Scenario file (JSON frames)
    #[arg(short, long, value_name = "FILE")]
    scenario: PathBuf,

    /// Directory holding settings.json
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    config_dir: PathBuf,

    /// Treatment memory save file, loaded before and written after the replay
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Log filter, e.g. "info" or "prognosis=debug"
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Entry point for the binary. Returns the process exit code.
pub fn run() -> i32 {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .init();

    match replay(&args) {
        Ok(()) => 0,
        Err(e) => {
            log::error!("Replay failed: {}", e);
            1
        }
    }
}

fn replay(args: &Args) -> Result<()> {
    let settings = ConfigManager::new(args.config_dir.clone()).load();
    let save = args.save.as_ref().map(MemoryFile::new);
    let memory = match &save {
        Some(file) => file.load()?,
        None => Default::default(),
    };

    let scenario = Scenario::load(&args.scenario)?;
    log::info!(
        "Replaying {} frame(s) from {:?} with {} remembered treatment(s)",
        scenario.frames.len(),
        args.scenario,
        memory.len()
    );

    let mut engine = ReplayEngine::new(scenario, Prognosis::with_memory(settings, memory));
    for report in engine.by_ref() {
        for alert in &report.alerts {
            println!("[tick {}] LETTER {}: {}", report.tick, alert.title, alert.body);
        }
        for (request, line) in &report.tooltips {
            let line = line.as_deref().unwrap_or("(no prognosis)");
            println!(
                "[tick {}] {} / {}: {}",
                report.tick, request.patient, request.affliction, line
            );
        }
    }

    let memory = engine.into_session().into_memory();
    if let Some(file) = &save {
        file.save(&memory)?;
        log::info!("Saved {} treatment record(s) to {:?}", memory.len(), file.path());
    }
    Ok(())
}
