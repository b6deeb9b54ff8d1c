//! dissect - split pasted prompts into typed, editable blocks.
//!
//! [`import`] segments and classifies prompt text, [`session`] holds the
//! editable result with undo/redo, and [`library`] is where a finished
//! session is committed.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod import;
pub mod input;
pub mod library;
pub mod session;
pub mod test_utils;

pub use error::{DissectError, Result};
