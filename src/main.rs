// src/main.rs

use std::io;
use std::process;

use log::{debug, error, info};
use env_logger::Env;

use l1probe::config::ProbeConfig;
use l1probe::core::arena::Arena;
use l1probe::probe::HardwareProbe;
use l1probe::report::{Progress, SystemInfo};
use l1probe::runner::ProbeRunner;

fn main() {
    let config = match ProbeConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Initialize the logger
    let env = Env::default()
        .filter_or("L1PROBE_LOG", config.log_level.as_str())
        .write_style_or("L1PROBE_LOG_STYLE", "auto");
    env_logger::Builder::from_env(env).init();

    debug!("{:?}", config);
    debug!("{}", SystemInfo::collect().to_string_pretty());
    info!("Allocating arena of {} slots", config.probe.arena_slots);

    let mut arena = Arena::new(config.probe.arena_slots);
    let mut probe = HardwareProbe::new(&mut arena, &config.probe);
    let runner = ProbeRunner::new(config);
    let mut progress = Progress::new(io::stdout().lock());

    let report = match runner.run(&mut probe, &mut progress) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = runner.publish(&report, progress) {
        error!("{}", e);
        process::exit(1);
    }
}
