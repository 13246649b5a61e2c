//! Accessory try-on overlays anchored to hand and face landmarks.
//!
//! This library turns the output of an external hand/face landmark detector
//! into stable accessory overlays (rings, sunglasses, earrings, necklaces):
//! - Mode geometry resolvers map normalized landmarks to target poses
//! - Per-anchor exponential smoothing removes jitter without lag on reacquire
//! - A face-outline clip lets earrings pass behind the face
//! - A retrying asset loader keeps overlays available despite flaky hosts
//!
//! The per-frame pipeline consists of:
//! 1. Resolving target poses for the active mode
//! 2. Picking one ring candidate when several hands are visible
//! 3. Smoothing every visible anchor and marking the rest lost
//! 4. Clipping and compositing onto a [`surface::Surface`]
//!
//! # Examples
//!
//! ## Sunglasses on a recorded face
//!
//! ```
//! use accessory_overlay::assets::{AccessoryAsset, AssetStore};
//! use accessory_overlay::engine::{FrameSettings, OverlayEngine};
//! use accessory_overlay::filters::SmoothingFilter;
//! use accessory_overlay::landmarks::{FrameInput, LandmarkFrame, Viewport};
//! use accessory_overlay::resolvers::Mode;
//! use accessory_overlay::surface::RecordingSurface;
//! use image::RgbaImage;
//!
//! let mut assets = AssetStore::new();
//! assets.insert(AccessoryAsset::preloaded("aviators", Mode::Sunglasses, RgbaImage::new(200, 80)));
//! let mut engine = OverlayEngine::new(assets, None, SmoothingFilter::default());
//!
//! // Outer eye corners at indices 33 and 263
//! let mut face = vec![(0.5, 0.5); 468];
//! face[33] = (0.40, 0.45);
//! face[263] = (0.60, 0.45);
//! let input = FrameInput {
//!     hands: Vec::new(),
//!     face: Some(LandmarkFrame::from(face)),
//! };
//!
//! let mut surface = RecordingSurface::new(Viewport::new(1000.0, 1000.0, 1.0));
//! let report = engine.process_frame(&input, &FrameSettings::new(Mode::Sunglasses), &mut surface);
//! assert_eq!(report.status, "Sunglasses overlay active (aviators)");
//! assert_eq!(report.poses.len(), 1);
//! ```
//!
//! ## Smoothing an anchor
//!
//! ```
//! use accessory_overlay::filters::{AnchorId, SmoothingFilter};
//! use accessory_overlay::pose::Pose;
//!
//! let mut filter = SmoothingFilter::default();
//! filter.update(AnchorId::RingHand, Pose::new(0.0, 0.0, 0.0, 10.0));
//! let smoothed = filter.update(AnchorId::RingHand, Pose::new(10.0, 0.0, 0.0, 10.0));
//! assert!((smoothed.x - 3.0).abs() < 1e-9);
//!
//! // The ring forgets everything once the hand disappears
//! filter.mark_lost(AnchorId::RingHand);
//! assert!(filter.state(AnchorId::RingHand).is_cleared());
//! ```

/// Landmark frames, detector input and frame geometry
pub mod landmarks;

/// Overlay pose type
pub mod pose;

/// Temporal smoothing with per-anchor loss policies
pub mod filters;

/// Per-mode landmark geometry
pub mod resolvers;

/// Ring candidate selection across hands
pub mod selector;

/// Face-outline occlusion clip for earrings
pub mod occlusion;

/// Accessory images and the retrying loader
pub mod assets;

/// Drawing targets
pub mod surface;

/// Per-mode drawing rules
pub mod compositor;

/// Frame pipeline tying everything together
pub mod engine;

/// Utility functions for geometry and numeric conversions
pub mod utils;

/// Error types and result handling
pub mod error;

/// Replay application
pub mod app;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
