#![forbid(unsafe_code)]

//! Headless lightbox runner.
//!
//! # Running
//!
//! ```sh
//! cargo run -p lightbox-harness -- tap > run.jsonl
//! LIGHTBOX_DETERMINISTIC=1 LIGHTBOX_CAPTION_MODE=staged cargo run -p lightbox-harness -- storm
//! ```
//!
//! The first argument names a built-in script (`tap`, `interrupt`, `scroll`,
//! `storm`; default `tap`). Frame records go to stdout, logs to stderr.
//! `RUST_LOG` controls log verbosity (default `info`).

use std::io::{self, BufWriter};
use std::process::ExitCode;

use lightbox_harness::determinism::DEFAULT_SEED;
use lightbox_harness::{DeterminismFixture, HarnessConfig, HarnessError, ScenarioRunner, Script};

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "harness run failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), HarnessError> {
    let name = std::env::args().nth(1).unwrap_or_else(|| "tap".to_owned());
    let config = HarnessConfig::from_env()?;
    let fixture = DeterminismFixture::new(&name, DEFAULT_SEED);
    let script = Script::named(&name, &config, fixture.seed())?;

    let mut runner = ScenarioRunner::new(&config, &fixture)?;
    let mut out = BufWriter::new(io::stdout().lock());
    runner.run(&script, &fixture, &mut out)?;
    Ok(())
}

#[cfg(feature = "tracing-json")]
fn init_logging() {
    lightbox_core::logging::init_json_subscriber();
}

#[cfg(not(feature = "tracing-json"))]
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
