//! Visual regression tests for dissection output.
//!
//! Block ids are random, so each test renders a stable text summary and
//! snapshots that instead of the raw blocks.

mod dissection_visual;
