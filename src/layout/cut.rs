//! Cut-point selection over measured block heights

/// Picks the block index at which an overflowing surface is split.
///
/// Blocks `[0, cut)` stay on the source, `[cut, len)` move on. The walk is a
/// single pass over rendered heights, so repeated calls on the same input give
/// the same answer.
#[derive(Debug, Clone, Copy)]
pub struct CutPointSelector {
    /// Space reserved below the visible height
    pub safety_margin: f32,
    /// Share of the container height above which a block is "large"
    pub large_block_ratio: f32,
    /// Relative position of the fallback split
    pub fallback_position: f32,
}

impl Default for CutPointSelector {
    fn default() -> Self {
        Self {
            safety_margin: 20.0,
            large_block_ratio: 0.5,
            fallback_position: 0.8,
        }
    }
}

impl CutPointSelector {
    /// Select a cut point, or `None` when no split is safe
    pub fn select(&self, heights: &[f32], visible_height: f32) -> Option<usize> {
        let len = heights.len();
        if len < 2 {
            return None;
        }

        let usable = visible_height - self.safety_margin;
        let large = visible_height * self.large_block_ratio;

        // The block crossing the limit moves whole, so a large block after
        // smaller ones opens the continuation instead of leaving the source
        // near empty.
        let cut = heights
            .iter()
            .scan(0.0f32, |used, &height| {
                *used += height;
                Some(*used)
            })
            .position(|used| used > usable);

        let cut = match cut {
            Some(cut) => {
                log::trace!("natural cut at {} ({} usable)", cut, usable);
                cut
            }
            None if len > 2 => {
                let cut = (len as f32 * self.fallback_position).floor() as usize;
                log::debug!("no natural cut among {} blocks, falling back to {}", len, cut);
                cut.min(len - 1)
            }
            None => {
                let large_index = heights.iter().position(|&h| h > large)?;
                log::debug!("two blocks, splitting around large block {}", large_index);
                1
            }
        };

        // Never move the very first block
        let cut = cut.max(1);
        (cut < len).then_some(cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_cut() {
        let selector = CutPointSelector::default();
        let heights = [100.0; 5];
        // 300 fits in 330, the fourth block would make 400
        assert_eq!(selector.select(&heights, 350.0), Some(3));
    }

    #[test]
    fn test_repeated_calls_agree() {
        let selector = CutPointSelector::default();
        let heights = [40.0, 120.0, 90.0, 200.0, 15.0, 60.0];
        let first = selector.select(&heights, 400.0);
        for _ in 0..10 {
            assert_eq!(selector.select(&heights, 400.0), first);
        }
    }

    #[test]
    fn test_large_block_moves_whole() {
        let selector = CutPointSelector::default();
        // One small block fits; the large one (> 175) would not
        assert_eq!(selector.select(&[50.0, 320.0], 350.0), Some(1));
        assert_eq!(selector.select(&[50.0, 320.0, 30.0], 350.0), Some(1));
        // Smaller blocks stay, the large one leads the moved tail
        assert_eq!(selector.select(&[60.0, 60.0, 250.0, 30.0], 350.0), Some(2));
        assert_eq!(selector.select(&[60.0, 60.0, 250.0, 30.0, 300.0], 350.0), Some(2));
    }

    #[test]
    fn test_first_block_never_moves() {
        let selector = CutPointSelector::default();
        // The first block alone exceeds the usable height
        assert_eq!(selector.select(&[400.0, 50.0, 50.0], 350.0), Some(1));
    }

    #[test]
    fn test_fallback_position() {
        let selector = CutPointSelector::default();
        // Everything fits: mismatch came from measurement noise
        assert_eq!(selector.select(&[10.0; 5], 350.0), Some(4));
        assert_eq!(selector.select(&[10.0; 3], 350.0), Some(2));
    }

    #[test]
    fn test_declines() {
        let selector = CutPointSelector::default();
        assert_eq!(selector.select(&[], 350.0), None);
        assert_eq!(selector.select(&[500.0], 350.0), None);
        // Two small blocks that fit: tolerate the overflow
        assert_eq!(selector.select(&[100.0, 100.0], 350.0), None);
        // An oversized first block stays put, the rest moves
        assert_eq!(selector.select(&[400.0, 10.0], 350.0), Some(1));
    }

    #[test]
    fn test_two_blocks_with_large_one() {
        let selector = CutPointSelector::default();
        assert_eq!(selector.select(&[20.0, 200.0], 350.0), Some(1));
    }
}
