//! Command objects resolved once per user action

use crate::document::ContentBlock;
use crate::editing::SurfaceTarget;

/// What to apply
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Insert generated blocks (table, chart, image, ...) at a block index;
    /// `None` appends
    InsertBlocks {
        at: Option<usize>,
        blocks: Vec<ContentBlock>,
    },
    /// Delete backward from the caret
    DeleteBackward,
    /// Switch document-wide heading numbering
    SetNumbering(bool),
}

/// Where to apply it and what to apply
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub target: SurfaceTarget,
    pub operation: Operation,
}

impl Command {
    /// Create a command
    pub fn new(target: SurfaceTarget, operation: Operation) -> Self {
        Self { target, operation }
    }

    /// Insert blocks at the end of a surface
    pub fn append(target: SurfaceTarget, blocks: Vec<ContentBlock>) -> Self {
        Self::new(target, Operation::InsertBlocks { at: None, blocks })
    }
}

/// How a command was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The engine applied the command
    Applied,
    /// The engine declined; the host's default behavior should proceed
    Default,
    /// The target surface could not be resolved
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_command() {
        let cmd = Command::append(SurfaceTarget::SubPage(1), vec![ContentBlock::paragraph("x")]);
        assert_eq!(cmd.target, SurfaceTarget::SubPage(1));
        assert!(matches!(cmd.operation, Operation::InsertBlocks { at: None, ref blocks } if blocks.len() == 1));
    }
}
