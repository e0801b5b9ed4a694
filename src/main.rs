/*
 * jetscout: locate recently opened JetBrains IDE projects and on-disk
 * repositories, filtered by a query, emitted as a script-filter JSON
 * document on stdout.
 *
 * Invocation: `jetscout <launcher-path> [query words...]`. Configuration
 * (cache directory, scan roots, debug flag, cache TTL) comes from the
 * process environment; see `core::settings`.
 */
mod core;

use crate::core::{SearchEngine, Settings};
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(launcher) = args.next().map(PathBuf::from) else {
        eprintln!("usage: jetscout <launcher-path> [query...]");
        return ExitCode::FAILURE;
    };
    let query: String = args.collect::<Vec<_>>().join(" ");

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("jetscout: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings);
    log::debug!("jetscout: launcher={launcher:?}, query='{query}'");

    let engine = SearchEngine::new(launcher, settings);
    let result = engine.search(&query);

    match serde_json::to_string(&result) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("jetscout: failed to serialize result: {e}");
            ExitCode::FAILURE
        }
    }
}

/*
 * Best-effort logging bootstrap. In debug mode records are appended to the
 * per-day debug file under the cache directory; any failure here leaves the
 * log facade uninitialized, which silently discards records — logging must
 * never affect search correctness.
 */
fn init_logging(settings: &Settings) {
    if !settings.debug {
        return;
    }
    let debug_file = settings.debug_log_file();
    let file = match OpenOptions::new().create(true).append(true).open(&debug_file) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("jetscout: can't open debug log {}: {e}", debug_file.display());
            return;
        }
    };
    let _ = WriteLogger::init(LevelFilter::Trace, Config::default(), file);
}
