#![forbid(unsafe_code)]

//! Deterministic headless driver for lightbox.
//!
//! # Role in Lightbox
//! `lightbox-harness` runs the [`Lightbox`](lightbox_widgets::Lightbox)
//! controller without a display: scripted taps, scrolls and waits on a
//! virtual ticker, one JSON line per frame, and a BLAKE3 digest of the run
//! so two runs can be compared byte for byte.
//!
//! Configuration comes from `LIGHTBOX_*` environment variables (see
//! [`config`] and [`determinism`]).

pub mod config;
pub mod determinism;
pub mod error;
pub mod scenario;

pub use config::HarnessConfig;
pub use determinism::DeterminismFixture;
pub use error::HarnessError;
pub use scenario::{FrameRecord, RunSummary, ScenarioRunner, Script, Step};
