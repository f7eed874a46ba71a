#![forbid(unsafe_code)]

//! Scripted scenarios against a headless [`Lightbox`].
//!
//! A [`Script`] is a list of [`Step`]s. Input steps are applied immediately;
//! [`Step::Wait`] advances a [`VirtualTicker`] and emits one [`FrameRecord`]
//! per tick. Every input and frame record is written as one JSON line and
//! fed into a BLAKE3 hasher, so two runs of the same script under the same
//! configuration produce the same [`RunSummary::digest`].
//!
//! # JSONL Schema
//!
//! ```json
//! {"event":"run.start","run_id":"tap_seed1","seed":1,"deterministic":true,"ts":"T000000","scenario":"tap","items":30}
//! {"event":"input","seq":0,"t_ms":0,"step":"tap 200,150","accepted":true,"phase":"idle","pending":4}
//! {"event":"frame","seq":1,"t_ms":16,"phase":"expanding","image_progress":0.02,...,"commands":19}
//! {"event":"run.end","ts":"T000001","frames":120,"digest":"9f2c..."}
//! ```
//!
//! Only `input` and `frame` lines are hashed; the start and end lines carry
//! wall-clock data outside deterministic mode.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use lightbox_core::geometry::Point;
use lightbox_core::ticker::{Ticker, VirtualTicker};
use lightbox_widgets::{
    DisplayList, ItemId, Lightbox, Phase, TransitionFrame, view::close_control_rect,
};
use serde::Serialize;
use tracing::info_span;

use crate::config::HarnessConfig;
use crate::determinism::DeterminismFixture;
use crate::error::HarnessError;

/// One scripted action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Tap a screen point, as a user would.
    Tap(Point),
    /// Select an item directly, bypassing hit testing.
    Select(ItemId),
    Dismiss,
    /// Scroll the grid by a signed pixel offset.
    Scroll(f32),
    /// Let time pass, one frame record per tick.
    Wait(Duration),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tap(p) => write!(f, "tap {},{}", p.x, p.y),
            Self::Select(item) => write!(f, "select {item}"),
            Self::Dismiss => f.write_str("dismiss"),
            Self::Scroll(dy) => write!(f, "scroll {dy}"),
            Self::Wait(d) => write!(f, "wait {}ms", d.as_millis()),
        }
    }
}

/// A named sequence of steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Script {
    /// Names accepted by [`Script::named`].
    pub const NAMES: &'static [&'static str] = &["tap", "interrupt", "scroll", "storm"];

    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Built-in script by name. `storm` is generated from `seed`.
    pub fn named(name: &str, config: &HarnessConfig, seed: u64) -> Result<Self, HarnessError> {
        match name {
            "tap" => Ok(Self::tap_expand_dismiss(config)),
            "interrupt" => Ok(Self::interrupted(config)),
            "scroll" => Ok(Self::scroll_then_select(config)),
            "storm" => Ok(Self::storm(config, seed, 200)),
            other => Err(HarnessError::UnknownScenario(other.to_owned())),
        }
    }

    /// Tap the second cell of the first row, wait for the close control,
    /// tap it, wait for the collapse.
    pub fn tap_expand_dismiss(config: &HarnessConfig) -> Self {
        let close = close_control_rect(&config.lightbox);
        let lb = &config.lightbox;
        Self::new(
            "tap",
            vec![
                Step::Tap(Point::new(lb.screen.width * 0.5, 60.0)),
                Step::Wait(settle_time(config)),
                Step::Tap(Point::new(close.x + close.width * 0.5, close.y + close.height * 0.5)),
                Step::Wait(lb.collapse_duration + Duration::from_millis(100)),
            ],
        )
    }

    /// Dismiss and re-select in the middle of an expand. Both are rejected
    /// under the default (strict) dismiss rule.
    pub fn interrupted(config: &HarnessConfig) -> Self {
        let half = config.lightbox.expand_duration / 2;
        Self::new(
            "interrupt",
            vec![
                Step::Select(ItemId(0)),
                Step::Wait(half),
                Step::Dismiss,
                Step::Select(ItemId(1)),
                Step::Wait(settle_time(config)),
                Step::Dismiss,
                Step::Wait(config.lightbox.collapse_duration + Duration::from_millis(100)),
            ],
        )
    }

    /// Scroll, select before the layout pass catches up, then let it land.
    pub fn scroll_then_select(config: &HarnessConfig) -> Self {
        Self::new(
            "scroll",
            vec![
                Step::Wait(Duration::from_millis(16)),
                Step::Scroll(150.0),
                Step::Tap(Point::new(10.0, 10.0)),
                Step::Wait(settle_time(config)),
                Step::Scroll(-150.0),
                Step::Dismiss,
                Step::Wait(config.lightbox.collapse_duration + Duration::from_millis(100)),
            ],
        )
    }

    /// `len` pseudo-random steps generated from `seed`.
    pub fn storm(config: &HarnessConfig, seed: u64, len: usize) -> Self {
        let screen = config.lightbox.screen;
        let mut rng = Rng::new(seed);
        let steps = (0..len)
            .map(|_| match rng.next() % 10 {
                0..=3 => Step::Tap(Point::new(
                    rng.next_unit() * screen.width,
                    rng.next_unit() * screen.height,
                )),
                4 => Step::Select(ItemId((rng.next() % (config.items as u64 + 4)) as usize)),
                5 => Step::Dismiss,
                6 => Step::Scroll(rng.next_unit() * 400.0 - 200.0),
                _ => Step::Wait(Duration::from_millis(rng.next() % 240 + 1)),
            })
            .collect();
        Self::new("storm", steps)
    }
}

/// Long enough for the expand, a staged caption, and the close control.
fn settle_time(config: &HarnessConfig) -> Duration {
    let lb = &config.lightbox;
    lb.expand_duration
        + lb.caption_duration
        + lb.close_control_delay
        + lb.close_control_duration
        + Duration::from_millis(100)
}

/// Deterministic xorshift64 generator for storm scripts.
struct Rng {
    state: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform-ish value in `[0, 1)`.
    fn next_unit(&mut self) -> f32 {
        (self.next() >> 40) as f32 / (1u64 << 24) as f32
    }
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Serialize)]
struct StartRecord<'a> {
    event: &'static str,
    run_id: &'a str,
    seed: u64,
    deterministic: bool,
    ts: String,
    scenario: &'a str,
    items: usize,
}

#[derive(Debug, Serialize)]
struct InputRecord {
    event: &'static str,
    seq: u64,
    t_ms: u64,
    step: String,
    accepted: bool,
    phase: Phase,
    pending: Option<ItemId>,
}

/// Snapshot of one tick as written to the JSONL stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub event: &'static str,
    pub seq: u64,
    /// Virtual time since the run started.
    pub t_ms: u64,
    #[serde(flatten)]
    pub frame: TransitionFrame,
    pub pending: Option<ItemId>,
    /// Draw commands produced by rendering this frame.
    pub commands: usize,
}

#[derive(Debug, Serialize)]
struct EndRecord<'a> {
    event: &'static str,
    ts: String,
    frames: u64,
    accepted: u64,
    rejected: u64,
    final_phase: Phase,
    digest: &'a str,
}

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub scenario: String,
    pub frames: u64,
    /// Input steps that changed something.
    pub accepted: u64,
    /// Input steps that were ignored.
    pub rejected: u64,
    pub final_phase: Phase,
    /// Hex BLAKE3 digest over every input and frame line.
    pub digest: String,
}

// ============================================================================
// Runner
// ============================================================================

/// Drives a [`Lightbox`] through scripts on virtual time.
#[derive(Debug)]
pub struct ScenarioRunner {
    lightbox: Lightbox,
    ticker: VirtualTicker,
    list: DisplayList,
    seq: u64,
}

impl ScenarioRunner {
    /// Build a lightbox from `config`, ticking at the fixture's time step.
    pub fn new(config: &HarnessConfig, fixture: &DeterminismFixture) -> Result<Self, HarnessError> {
        Ok(Self {
            lightbox: Lightbox::new(config.catalog(), &config.lightbox)?,
            ticker: VirtualTicker::new(fixture.time_step()),
            list: DisplayList::new(),
            seq: 0,
        })
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    /// Run `script`, writing JSONL to `out`.
    pub fn run(
        &mut self,
        script: &Script,
        fixture: &DeterminismFixture,
        out: &mut impl Write,
    ) -> Result<RunSummary, HarnessError> {
        let _span = info_span!(
            "lightbox.scenario",
            scenario = script.name.as_str(),
            seed = fixture.seed(),
            deterministic = fixture.deterministic()
        )
        .entered();

        write_line(
            out,
            &StartRecord {
                event: "run.start",
                run_id: fixture.run_id(),
                seed: fixture.seed(),
                deterministic: fixture.deterministic(),
                ts: fixture.timestamp(),
                scenario: &script.name,
                items: self.lightbox.catalog().len(),
            },
        )?;

        let mut hasher = blake3::Hasher::new();
        let mut frames = 0u64;
        let mut accepted = 0u64;
        let mut rejected = 0u64;

        for step in &script.steps {
            match *step {
                Step::Wait(span) => {
                    for _ in 0..self.ticker.steps_for(span) {
                        let record = self.tick();
                        hash_line(out, &mut hasher, &record)?;
                        frames += 1;
                    }
                }
                input => {
                    let ok = self.apply(input);
                    if ok {
                        accepted += 1;
                    } else {
                        rejected += 1;
                    }
                    let record = InputRecord {
                        event: "input",
                        seq: self.next_seq(),
                        t_ms: self.elapsed_ms(),
                        step: input.to_string(),
                        accepted: ok,
                        phase: self.lightbox.phase(),
                        pending: self.lightbox.pending_selection(),
                    };
                    hash_line(out, &mut hasher, &record)?;
                }
            }
        }

        let digest = hasher.finalize().to_hex().to_string();
        let final_phase = self.lightbox.phase();
        write_line(
            out,
            &EndRecord {
                event: "run.end",
                ts: fixture.timestamp(),
                frames,
                accepted,
                rejected,
                final_phase,
                digest: &digest,
            },
        )?;
        out.flush()?;

        tracing::info!(
            scenario = script.name.as_str(),
            frames,
            accepted,
            rejected,
            digest = digest.as_str(),
            "scenario complete"
        );

        Ok(RunSummary {
            scenario: script.name.clone(),
            frames,
            accepted,
            rejected,
            final_phase,
            digest,
        })
    }

    fn apply(&mut self, step: Step) -> bool {
        match step {
            Step::Tap(point) => self.lightbox.tap(point).is_some(),
            Step::Select(item) => self.lightbox.select(item),
            Step::Dismiss => self.lightbox.dismiss(),
            Step::Scroll(dy) => self.lightbox.scroll_by(dy),
            Step::Wait(_) => true,
        }
    }

    fn tick(&mut self) -> FrameRecord {
        let dt = self.ticker.next_delta();
        self.lightbox.tick(dt);
        self.list.clear();
        self.lightbox.render(&mut self.list);
        FrameRecord {
            event: "frame",
            seq: self.next_seq(),
            t_ms: self.elapsed_ms(),
            frame: self.lightbox.frame(),
            pending: self.lightbox.pending_selection(),
            commands: self.list.len(),
        }
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.seq;
        self.seq += 1;
        seq
    }

    fn elapsed_ms(&self) -> u64 {
        self.ticker.elapsed().as_millis() as u64
    }
}

fn write_line(out: &mut impl Write, record: &impl Serialize) -> Result<(), HarnessError> {
    serde_json::to_writer(&mut *out, record)?;
    out.write_all(b"\n")?;
    Ok(())
}

fn hash_line(
    out: &mut impl Write,
    hasher: &mut blake3::Hasher,
    record: &impl Serialize,
) -> Result<(), HarnessError> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    hasher.update(&line);
    out.write_all(&line)?;
    Ok(())
}
