//! Overflow detection for content surfaces

use crate::surface::SurfaceMetrics;

/// Decides whether a surface's content extends past its visible box
#[derive(Debug, Clone, Copy)]
pub struct OverflowDetector {
    /// Differences at or below this are rounding noise
    pub tolerance: f32,
}

impl Default for OverflowDetector {
    fn default() -> Self {
        Self { tolerance: 2.0 }
    }
}

impl OverflowDetector {
    /// Create a detector with the given tolerance
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    /// How far the content extends past the visible box (0 when it fits)
    pub fn overflow_amount(&self, metrics: &SurfaceMetrics) -> f32 {
        (metrics.scroll_height - metrics.client_height).max(0.0)
    }

    /// Check a surface; unmounted surfaces (`None`) never overflow
    pub fn is_overflowing(&self, metrics: Option<SurfaceMetrics>) -> bool {
        match metrics {
            Some(m) => self.overflow_amount(&m) > self.tolerance,
            None => false,
        }
    }
}
