//! Surface targets, caret positions and focus requests

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which surface of a page: the page itself or one of its subpages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceTarget {
    /// The page's own content surface
    Page,
    /// The subpage at this index
    SubPage(usize),
}

impl SurfaceTarget {
    /// Build from the `index | null` form used by hosts
    pub fn from_index(index: Option<usize>) -> Self {
        match index {
            None => SurfaceTarget::Page,
            Some(i) => SurfaceTarget::SubPage(i),
        }
    }

    /// Subpage index, `None` for the page itself
    pub fn index(&self) -> Option<usize> {
        match self {
            SurfaceTarget::Page => None,
            SurfaceTarget::SubPage(i) => Some(*i),
        }
    }

    /// The continuation that receives this surface's overflow
    pub fn next(&self) -> SurfaceTarget {
        match self {
            SurfaceTarget::Page => SurfaceTarget::SubPage(0),
            SurfaceTarget::SubPage(i) => SurfaceTarget::SubPage(i + 1),
        }
    }

    /// The predecessor: the page for subpage 0, otherwise the prior subpage
    pub fn previous(&self) -> Option<SurfaceTarget> {
        match self {
            SurfaceTarget::Page => None,
            SurfaceTarget::SubPage(0) => Some(SurfaceTarget::Page),
            SurfaceTarget::SubPage(i) => Some(SurfaceTarget::SubPage(i - 1)),
        }
    }

    /// Position in the page's surface list (page = 0)
    pub fn position(&self) -> usize {
        self.index().map_or(0, |i| i + 1)
    }

    /// Inverse of [`SurfaceTarget::position`]
    pub fn at_position(position: usize) -> Self {
        match position {
            0 => SurfaceTarget::Page,
            n => SurfaceTarget::SubPage(n - 1),
        }
    }
}

impl fmt::Display for SurfaceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceTarget::Page => f.write_str("page"),
            SurfaceTarget::SubPage(i) => write!(f, "subpage {}", i),
        }
    }
}

/// Caret position reported by a live surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caret {
    /// Offset in the surface's flattened text (grapheme clusters)
    pub text_offset: usize,
    /// Offset within the innermost node holding the caret
    pub node_offset: usize,
}

impl Caret {
    /// Create a caret at a text offset
    pub fn new(text_offset: usize, node_offset: usize) -> Self {
        Self {
            text_offset,
            node_offset,
        }
    }

    /// Check if the caret sits at the very first text position.
    ///
    /// Offset 0 inside a nested element is not enough: text before that
    /// element would put the flattened offset past 0.
    pub fn is_at_start(&self) -> bool {
        self.text_offset == 0 && self.node_offset == 0
    }
}

/// Where to put the caret when a surface receives focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaretPlacement {
    Start,
    End,
}

/// A focus transfer scheduled after a committed mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusRequest {
    pub target: SurfaceTarget,
    pub caret: CaretPlacement,
}

impl FocusRequest {
    pub fn new(target: SurfaceTarget, caret: CaretPlacement) -> Self {
        Self { target, caret }
    }
}
