//! Mutation watching: debounced overflow checks and delayed focus
//!
//! Time is passed in as milliseconds so the scheduler is a plain coalescing
//! queue with no timer or observer API of its own. A superseded check is
//! simply replaced.

use crate::editing::{FocusRequest, SurfaceTarget};

/// What kind of change a surface reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MutationKind {
    /// Typed characters: cheap, frequent
    Text,
    /// Inserted or removed blocks: expensive, rare
    Structural,
}

/// A change reported by a surface subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationEvent {
    pub target: SurfaceTarget,
    pub kind: MutationKind,
}

impl MutationEvent {
    pub fn text(target: SurfaceTarget) -> Self {
        Self {
            target,
            kind: MutationKind::Text,
        }
    }

    pub fn structural(target: SurfaceTarget) -> Self {
        Self {
            target,
            kind: MutationKind::Structural,
        }
    }
}

/// A check waiting for its debounce to elapse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCheck {
    pub due_ms: u64,
    pub kind: MutationKind,
    /// Surface that reported the last change
    pub source: SurfaceTarget,
}

/// Debounces overflow checks.
///
/// Each notice cancels the pending check and schedules a new one. A pending
/// structural check keeps its slow-path kind when a keystroke arrives.
#[derive(Debug, Clone)]
pub struct MutationWatcher {
    text_delay_ms: u64,
    structural_delay_ms: u64,
    pending: Option<PendingCheck>,
}

impl MutationWatcher {
    /// Create a watcher with fast- and slow-path delays
    pub fn new(text_delay_ms: u64, structural_delay_ms: u64) -> Self {
        Self {
            text_delay_ms,
            structural_delay_ms,
            pending: None,
        }
    }

    /// Delay used for a kind of mutation
    pub fn delay(&self, kind: MutationKind) -> u64 {
        match kind {
            MutationKind::Text => self.text_delay_ms,
            MutationKind::Structural => self.structural_delay_ms,
        }
    }

    /// Record a mutation, rescheduling the pending check
    pub fn notice(&mut self, event: MutationEvent, now_ms: u64) {
        let kind = match self.pending {
            Some(pending) => pending.kind.max(event.kind),
            None => event.kind,
        };
        let due_ms = now_ms + self.delay(kind);
        log::trace!("{:?} mutation on {}, check due at {}", event.kind, event.target, due_ms);
        self.pending = Some(PendingCheck {
            due_ms,
            kind,
            source: event.target,
        });
    }

    /// Take the pending check if its debounce has elapsed
    pub fn poll(&mut self, now_ms: u64) -> Option<PendingCheck> {
        match self.pending {
            Some(pending) if pending.due_ms <= now_ms => self.pending.take(),
            _ => None,
        }
    }

    /// Drop the pending check
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Get the pending check
    pub fn pending(&self) -> Option<PendingCheck> {
        self.pending
    }
}

/// Holds the focus transfer that follows a committed mutation
#[derive(Debug, Clone)]
pub struct FocusQueue {
    delay_ms: u64,
    pending: Option<(u64, FocusRequest)>,
}

impl FocusQueue {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Schedule a focus transfer; a later request replaces an earlier one
    pub fn schedule(&mut self, request: FocusRequest, now_ms: u64) {
        self.pending = Some((now_ms + self.delay_ms, request));
    }

    /// Take the request if its delay has elapsed
    pub fn poll(&mut self, now_ms: u64) -> Option<FocusRequest> {
        match self.pending {
            Some((due, request)) if due <= now_ms => {
                self.pending = None;
                Some(request)
            }
            _ => None,
        }
    }

    /// Get the pending request
    pub fn pending(&self) -> Option<FocusRequest> {
        self.pending.map(|(_, request)| request)
    }
}

/// Get current timestamp in milliseconds
pub fn current_timestamp() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
