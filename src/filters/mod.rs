//! Temporal smoothing for overlay anchors.
//!
//! Raw landmark-derived poses jitter from frame to frame. This module
//! provides exponential smoothing for scalar and circular quantities and a
//! per-anchor state owner that decides when to smooth, snap or forget.

/// Linear and circular exponential smoothing primitives
pub mod exponential;

/// Per-anchor smoothing state and loss policies
pub mod anchor;

pub use anchor::{AnchorId, AnchorProfile, LossPolicy, SmoothingFilter, SmoothingState};
pub use exponential::{smooth_angle, smooth_value, wrap_angle};
