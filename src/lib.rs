//! helix-bot — conversational business-DNA profiler.
//!
//! Each user turn is routed through a priority chain of inference
//! backends (operator webhook first, generative fallback second). The
//! winning backend's partial structured update is folded into the
//! session's profile, and an integrity score is derived from the result.
//! When every backend fails, the turn degrades to a fixed apology reply
//! instead of an error; the session stays interactive.

pub mod config;
pub mod error;
pub mod inference;
pub mod logger;
pub mod profile;
pub mod session;
