//! Prompt dissection: turning pasted prompt text into typed blocks.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! 1. **Segmenter** (`Dissector`) - Splits text into ordered segments
//! 2. **Classifier** (`BlockClassifier`) - Tags each segment with a category
//!    and a 0-100 confidence
//!
//! The resulting `DissectedBlock`s seed an editing [`Session`](crate::session::Session).
//!
//! # Example
//!
//! ```
//! use dissect::import::{classify, BlockType, MatchTier};
//!
//! let result = classify("You are an expert chef. Create a recipe for soup.");
//! assert_eq!(result.block_type, BlockType::Role);
//! assert_eq!(result.tier, MatchTier::Phrase);
//! ```

mod classifiers;
mod parser;
mod types;

pub use classifiers::*;
pub use parser::*;
pub use types::*;
