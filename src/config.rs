//! Tunable thresholds and timings

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reflow configuration.
///
/// Heights are in the rendering layer's units (CSS pixels in a browser host),
/// durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReflowConfig {
    /// Overflow smaller than this is measurement noise
    pub overflow_tolerance: f32,
    /// Reserved space below the visible height when choosing a cut point
    pub safety_margin: f32,
    /// A block taller than this share of the container counts as large
    pub large_block_ratio: f32,
    /// Relative position of the fallback split when no block crosses the limit
    pub fallback_position: f32,
    /// Debounce for plain character edits
    pub text_debounce_ms: u64,
    /// Debounce for structural inserts (tables, charts, images)
    pub structural_debounce_ms: u64,
    /// Delay between a committed mutation and the focus transfer
    pub focus_delay_ms: u64,
    /// Upper bound on subpages per page
    pub max_sub_pages: usize,
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            overflow_tolerance: 2.0,
            safety_margin: 20.0,
            large_block_ratio: 0.5,
            fallback_position: 0.8,
            text_debounce_ms: 50,
            structural_debounce_ms: 150,
            focus_delay_ms: 10,
            max_sub_pages: 64,
        }
    }
}

impl ReflowConfig {
    /// Parse a config from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
