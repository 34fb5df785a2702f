use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use rollover_model::{ModelState, RolloverConfig, naming};
use rollover_results::SnapshotStore;
use rollover_setup::{CycleContext, RestartSchedule, initial_schedule, setup_next_cycle};

/// Settings file looked up in the working directory.
const SETTINGS_FILE: &str = "rollover_settings.json";

fn usage() {
    eprintln!("usage: rollover-cli advance <cycle> <workdir>");
    eprintln!("       rollover-cli show <cycle> <workdir>");
}

/// Schedule file handed to the job submission, stamped with its origin.
#[derive(Serialize, Deserialize)]
struct ScheduleDocument {
    generated_at: String,
    cycle: u32,
    model: String,
    schedule: RestartSchedule,
}

fn load_config(workdir: &Path) -> Result<RolloverConfig, String> {
    let path = workdir.join(SETTINGS_FILE);
    if !path.exists() {
        return Ok(RolloverConfig::default());
    }
    let bytes = fs::read(&path).map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    serde_json::from_slice(&bytes).map_err(|err| format!("bad settings in {}: {err}", path.display()))
}

fn model_path(workdir: &Path, cycle: u32) -> PathBuf {
    workdir.join(format!("{}_model.json", naming::model_name(cycle)))
}

fn load_model(workdir: &Path, cycle: u32) -> Result<ModelState, String> {
    let path = model_path(workdir, cycle);
    let bytes = fs::read(&path).map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    serde_json::from_slice(&bytes).map_err(|err| format!("bad model in {}: {err}", path.display()))
}

fn advance(cycle: u32, workdir: &Path) -> Result<PathBuf, String> {
    let config = load_config(workdir)?;
    let model = load_model(workdir, cycle)?;
    let ctx = CycleContext {
        cycle,
        model: &model,
        config: &config,
    };

    let schedule = if cycle <= 1 {
        initial_schedule(&ctx).map_err(|err| err.to_string())?
    } else {
        let store = SnapshotStore::new(workdir);
        setup_next_cycle(&ctx, &store).map_err(|err| err.to_string())?
    };

    let document = ScheduleDocument {
        generated_at: Utc::now().to_rfc3339(),
        cycle,
        model: model.name.clone(),
        schedule,
    };
    let path = workdir.join(format!("{}_schedule.json", naming::job_name(cycle)));
    let bytes = serde_json::to_vec_pretty(&document)
        .map_err(|err| format!("cannot serialize schedule: {err}"))?;
    fs::write(&path, bytes).map_err(|err| format!("cannot write {}: {err}", path.display()))?;
    Ok(path)
}

fn print_document(document: &ScheduleDocument) {
    println!("cycle: {}", document.cycle);
    println!("model: {}", document.model);
    println!("generated_at: {}", document.generated_at);
    println!("stages: {}", document.schedule.stages.len());
    for stage in &document.schedule.stages {
        let restart = match stage.restart_intervals {
            Some(n) => format!(", restart={n}"),
            None => String::new(),
        };
        println!(
            "  {} <- {} (t={}{})",
            stage.name, stage.previous, stage.time_period, restart
        );
    }
    println!("boundary_conditions: {}", document.schedule.boundaries.len());
}

fn show(cycle: u32, workdir: &Path) -> Result<(), String> {
    let path = workdir.join(format!("{}_schedule.json", naming::job_name(cycle)));
    let bytes = fs::read(&path).map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    let document: ScheduleDocument = serde_json::from_slice(&bytes)
        .map_err(|err| format!("bad schedule in {}: {err}", path.display()))?;
    print_document(&document);
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        usage();
        return ExitCode::from(2);
    }

    let cycle: u32 = match args[2].parse() {
        Ok(cycle) if cycle >= 1 => cycle,
        _ => {
            eprintln!("bad cycle number: {}", args[2]);
            usage();
            return ExitCode::from(2);
        }
    };
    let workdir = Path::new(&args[3]);

    let result = match args[1].as_str() {
        "advance" => advance(cycle, workdir).map(|path| {
            println!("schedule written: {}", path.display());
        }),
        "show" => show(cycle, workdir),
        _ => {
            usage();
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}
