//! Per-frame pipeline: resolve, select, smooth, clip, draw.

use crate::assets::{AccessoryAsset, AssetLoader, AssetStore, LoadState};
use crate::compositor::{self, Scene};
use crate::constants::{SIZE_SCALE_DEFAULT_PERCENT, SIZE_SCALE_MAX_PERCENT, SIZE_SCALE_MIN_PERCENT};
use crate::filters::{AnchorId, SmoothingFilter};
use crate::landmarks::FrameInput;
use crate::occlusion;
use crate::pose::Pose;
use crate::resolvers::{resolver_for, FaceMetrics, Mode, ResolveContext, Resolution};
use crate::selector::select_candidate;
use crate::surface::{Sprite, Surface};
use log::debug;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// User-facing controls read once per frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSettings {
    pub mode: Mode,
    /// Selected accessory id per mode
    pub selections: HashMap<Mode, String>,
    /// Size slider; values outside 50..=200 are clamped
    pub size_scale_percent: u32,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            mode: Mode::Rings,
            selections: HashMap::new(),
            size_scale_percent: SIZE_SCALE_DEFAULT_PERCENT,
        }
    }
}

impl FrameSettings {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_selection(mut self, mode: Mode, id: &str) -> Self {
        self.selections.insert(mode, id.to_string());
        self
    }

    #[must_use]
    pub const fn with_size_percent(mut self, percent: u32) -> Self {
        self.size_scale_percent = percent;
        self
    }

    /// Size multiplier after clamping, 1.0 = 100 %
    #[must_use]
    pub fn size_scale(&self) -> f64 {
        let percent = self
            .size_scale_percent
            .clamp(SIZE_SCALE_MIN_PERCENT, SIZE_SCALE_MAX_PERCENT);
        f64::from(percent) / 100.0
    }

    #[must_use]
    pub fn selection(&self, mode: Mode) -> Option<&str> {
        self.selections.get(&mode).map(String::as_str)
    }
}

/// What happened during one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub mode: Mode,
    pub status: String,
    /// Accessory the frame used, if any resolved
    pub asset_id: Option<String>,
    /// Hands or faces reported by the detector
    pub subject_count: usize,
    /// Smoothed poses handed to the compositor
    pub poses: Vec<Pose>,
    pub front_view: bool,
    /// Whether the occlusion clip was active
    pub occluded: bool,
}

/// The overlay engine
///
/// Owns the asset store, the optional background loader and all temporal
/// state. Frames are processed synchronously; nothing in
/// [`process_frame`](Self::process_frame) can fail.
pub struct OverlayEngine {
    assets: AssetStore,
    loader: Option<AssetLoader>,
    smoothing: SmoothingFilter,
}

impl OverlayEngine {
    /// Create an engine and start loading every idle asset
    #[must_use]
    pub fn new(mut assets: AssetStore, loader: Option<AssetLoader>, smoothing: SmoothingFilter) -> Self {
        if let Some(loader) = &loader {
            loader.load_all(&mut assets);
        }
        Self {
            assets,
            loader,
            smoothing,
        }
    }

    #[must_use]
    pub const fn assets(&self) -> &AssetStore {
        &self.assets
    }

    #[must_use]
    pub const fn smoothing(&self) -> &SmoothingFilter {
        &self.smoothing
    }

    /// Wait for pending asset loads; `true` if all of them finished
    pub fn settle(&mut self, timeout: Duration) -> bool {
        match &self.loader {
            Some(loader) => loader.settle(&mut self.assets, timeout),
            None => true,
        }
    }

    /// Forget all temporal state
    pub fn reset(&mut self) {
        self.smoothing.reset();
    }

    /// Render one frame onto `surface`
    pub fn process_frame(&mut self, input: &FrameInput, settings: &FrameSettings, surface: &mut dyn Surface) -> FrameReport {
        if let Some(loader) = &self.loader {
            loader.poll(&mut self.assets);
        }

        let mode = settings.mode;
        let viewport = surface.viewport();
        let size_scale = settings.size_scale();
        let asset = selected_asset(&self.assets, settings);
        let sprite = asset.and_then(|asset| {
            asset.image().map(|image| Sprite {
                id: asset.id.as_str(),
                image,
            })
        });

        let ctx = ResolveContext {
            input,
            viewport,
            size_scale,
            asset_aspect: sprite.map_or(1.0, |sprite| sprite.aspect()),
        };
        let resolution = resolver_for(mode)(&ctx);
        let poses = smooth_targets(&mut self.smoothing, &resolution, sprite.is_some());

        let clip = if mode == Mode::Earrings && resolution.front_view {
            input.face.as_ref().and_then(|face| {
                let metrics = FaceMetrics::measure(face, viewport)?;
                occlusion::face_clip(face, viewport, metrics.eye_mid, resolution.front_view)
            })
        } else {
            None
        };

        let scene = Scene {
            mode,
            poses,
            clip,
            size_scale,
        };
        compositor::compose(surface, &scene, sprite);

        let status = status_message(&resolution, asset, settings.selection(mode));
        debug!("{mode}: {status} ({} drawn)", scene.poses.len());

        FrameReport {
            mode,
            status,
            asset_id: asset.map(|asset| asset.id.clone()),
            subject_count: resolution.subject_count,
            poses: scene.poses,
            front_view: resolution.front_view,
            occluded: scene.clip.is_some(),
        }
    }
}

/// Selected accessory of the active mode, or the mode's first catalog entry
fn selected_asset<'a>(assets: &'a AssetStore, settings: &FrameSettings) -> Option<&'a AccessoryAsset> {
    let mode = settings.mode;
    match settings.selection(mode) {
        Some(id) => assets.get(id).filter(|asset| asset.mode == mode),
        None => assets.first_for(mode),
    }
}

/// Run the resolution through the per-anchor filters
///
/// Anchors the frame does not drive are marked lost so each one follows its
/// own loss policy. The necklace target depends on the image aspect, so it is
/// not driven until the image is ready.
fn smooth_targets(smoothing: &mut SmoothingFilter, resolution: &Resolution, image_ready: bool) -> Vec<Pose> {
    let mut driven = HashSet::new();
    let mut poses = Vec::new();

    if resolution.mode == Mode::Rings {
        let candidates: Vec<Pose> = resolution.targets.iter().filter_map(|t| t.pose).collect();
        let previous = smoothing.state(AnchorId::RingHand).position();
        if let Some(chosen) = select_candidate(&candidates, previous) {
            poses.push(smoothing.update(AnchorId::RingHand, chosen));
            driven.insert(AnchorId::RingHand);
        }
    } else {
        for target in &resolution.targets {
            match (target.anchor, target.pose) {
                (Some(AnchorId::Necklace), Some(_)) if !image_ready => {}
                (Some(anchor), Some(pose)) => {
                    poses.push(smoothing.update(anchor, pose));
                    driven.insert(anchor);
                }
                (None, Some(pose)) => poses.push(pose),
                (_, None) => {}
            }
        }
    }

    for anchor in AnchorId::ALL {
        if !driven.contains(&anchor) {
            smoothing.mark_lost(anchor);
        }
    }
    poses
}

fn status_message(resolution: &Resolution, asset: Option<&AccessoryAsset>, selection: Option<&str>) -> String {
    let mode = resolution.mode;
    let kind = mode.item_name();

    if resolution.subject_count == 0 {
        return if mode.uses_face() {
            "Show your face to the camera".to_string()
        } else {
            "Show your hand to the camera".to_string()
        };
    }

    let Some(asset) = asset else {
        return match selection {
            Some(id) => format!("No {kind} selected ({id} is not in the catalog)"),
            None => format!("No {kind} selected"),
        };
    };

    if asset.state() == LoadState::Exhausted {
        return format!("Failed to load {kind} image ({})", asset.id);
    }

    if mode.uses_face() && asset.is_ready() && !resolution.any_visible() {
        return "Show your face to the camera".to_string();
    }

    match mode {
        Mode::Rings => format!("Hands detected: {}", resolution.subject_count),
        Mode::Sunglasses if asset.is_ready() => format!("Sunglasses overlay active ({})", asset.id),
        Mode::Sunglasses => match asset.attempt_number() {
            Some(attempt) if attempt > 1 => format!("Loading sunglasses image ({})... (attempt {attempt})", asset.id),
            _ => format!("Loading sunglasses image ({})...", asset.id),
        },
        Mode::Necklace if asset.is_ready() => "Necklace active".to_string(),
        Mode::Earrings if asset.is_ready() => "Earrings overlay active".to_string(),
        Mode::Necklace | Mode::Earrings => format!("Loading {kind} image..."),
    }
}
