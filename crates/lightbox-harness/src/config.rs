#![forbid(unsafe_code)]

//! Environment-driven harness configuration.
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `LIGHTBOX_CAPTION_LAYOUT` | `cover` or `slide-up` |
//! | `LIGHTBOX_CAPTION_MODE` | `shared` or `staged` |
//! | `LIGHTBOX_EXPAND_MS` | expand duration |
//! | `LIGHTBOX_COLLAPSE_MS` | collapse duration |
//! | `LIGHTBOX_CLOSE_DELAY_MS` | close control delay |
//! | `LIGHTBOX_EXPANDED_HEIGHT` | expanded image height in px |
//! | `LIGHTBOX_ITEMS` | catalog size |
//!
//! Seed, tick length and deterministic mode come from
//! [`determinism`](crate::determinism).

use std::time::Duration;

use lightbox_widgets::{CaptionLayoutKind, CaptionMode, Catalog, CatalogEntry, LightboxConfig};

use crate::error::HarnessError;

/// Catalog size when `LIGHTBOX_ITEMS` is unset.
pub const DEFAULT_ITEMS: usize = 30;

/// Resolved settings for one harness run.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    pub lightbox: LightboxConfig,
    pub items: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            lightbox: LightboxConfig::default(),
            items: DEFAULT_ITEMS,
        }
    }
}

impl HarnessConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, HarnessError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`, so tests need not touch the real
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HarnessError> {
        let mut lb = LightboxConfig::default();
        let mut items = DEFAULT_ITEMS;

        if let Some(raw) = lookup("LIGHTBOX_CAPTION_LAYOUT") {
            lb = lb.caption_layout(raw.parse::<CaptionLayoutKind>()?);
        }
        if let Some(raw) = lookup("LIGHTBOX_CAPTION_MODE") {
            lb = lb.caption_mode(raw.parse::<CaptionMode>()?);
        }
        if let Some(ms) = parse_ms(&lookup, "LIGHTBOX_EXPAND_MS")? {
            lb = lb.expand_duration(ms);
        }
        if let Some(ms) = parse_ms(&lookup, "LIGHTBOX_COLLAPSE_MS")? {
            lb = lb.collapse_duration(ms);
        }
        if let Some(ms) = parse_ms(&lookup, "LIGHTBOX_CLOSE_DELAY_MS")? {
            lb = lb.close_control_delay(ms);
        }
        if let Some(raw) = lookup("LIGHTBOX_EXPANDED_HEIGHT") {
            let height = raw.trim().parse::<f32>().map_err(|_| HarnessError::Env {
                key: "LIGHTBOX_EXPANDED_HEIGHT",
                value: raw.clone(),
                expected: "number",
            })?;
            lb = lb.expanded_height(height);
        }
        if let Some(raw) = lookup("LIGHTBOX_ITEMS") {
            items = raw.trim().parse().map_err(|_| HarnessError::Env {
                key: "LIGHTBOX_ITEMS",
                value: raw.clone(),
                expected: "item count",
            })?;
        }

        lb.validate()?;
        Ok(Self {
            lightbox: lb,
            items,
        })
    }

    /// Placeholder catalog of `items` captioned images.
    pub fn catalog(&self) -> Catalog {
        (0..self.items)
            .map(|i| CatalogEntry::new(format!("images/{i:03}.jpg")).caption(format!("Image {i}")))
            .collect()
    }
}

fn parse_ms(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<Duration>, HarnessError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|_| HarnessError::Env {
            key,
            value: raw,
            expected: "duration in milliseconds",
        })
}
