//! Property tests for dissection and session editing.

mod dissection_props;
mod session_props;
