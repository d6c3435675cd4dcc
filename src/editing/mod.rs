//! Editing context: surface targets, caret, focus and commands

mod command;
mod cursor;

pub use command::{Command, CommandOutcome, Operation};
pub use cursor::{Caret, CaretPlacement, FocusRequest, SurfaceTarget};
