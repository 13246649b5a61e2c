//! Accessory images and their retry state.
//!
//! Every catalog entry becomes an [`AccessoryAsset`] at startup. Loading walks
//! a short ladder of connection strategies; the first one that yields a
//! decodable image makes the asset ready for good, and running off the end of
//! the ladder leaves it exhausted. Network work happens in [`loader`]; the
//! state transitions below are only ever applied on the frame thread.

/// Background worker that executes load attempts
pub mod loader;

/// Transports used by the worker
pub mod http;

pub use http::{HttpFetcher, ImageFetcher};
pub use loader::AssetLoader;

use crate::constants::CACHE_BUST_PARAM;
use crate::resolvers::Mode;
use image::RgbaImage;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// One rung of the retry ladder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStrategy {
    pub url: String,
    /// Request with an `Origin` header and require CORS approval
    pub cross_origin: bool,
    /// Suppress the `Referer` header
    pub no_referrer: bool,
}

impl LoadStrategy {
    #[must_use]
    pub fn new(url: &str, cross_origin: bool, no_referrer: bool) -> Self {
        Self {
            url: url.to_string(),
            cross_origin,
            no_referrer,
        }
    }

    /// Strategy ladder for a catalog entry
    ///
    /// Three attempts against the primary URL, loosening the request each
    /// time, plus one CORS attempt against the fallback URL if there is one.
    #[must_use]
    pub fn ladder(url: &str, fallback_url: Option<&str>) -> Vec<Self> {
        let mut ladder = vec![Self::new(url, true, true), Self::new(url, false, true), Self::new(url, false, false)];
        if let Some(fallback) = fallback_url {
            ladder.push(Self::new(fallback, true, true));
        }
        ladder
    }
}

/// Append the cache-busting parameter to `url`
#[must_use]
pub fn cache_busted(url: &str, stamp: u128) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{CACHE_BUST_PARAM}={stamp}")
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis())
}

/// Retry state of one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Never requested
    Idle,
    /// Strategy `i` is in flight
    Attempting(usize),
    Ready,
    /// Every strategy failed
    Exhausted,
}

impl LoadState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Exhausted)
    }
}

/// A single network attempt handed to the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub asset_id: String,
    /// Zero-based index into the strategy ladder
    pub attempt: usize,
    pub strategy: LoadStrategy,
    /// Strategy URL with a fresh cache-busting parameter
    pub url: String,
}

/// A catalog image with its loading progress
#[derive(Debug, Clone)]
pub struct AccessoryAsset {
    pub id: String,
    pub mode: Mode,
    pub source_url: String,
    pub strategies: Vec<LoadStrategy>,
    state: LoadState,
    image: Option<Arc<RgbaImage>>,
}

impl AccessoryAsset {
    #[must_use]
    pub fn new(id: &str, mode: Mode, url: &str, fallback_url: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            mode,
            source_url: url.to_string(),
            strategies: LoadStrategy::ladder(url, fallback_url),
            state: LoadState::Idle,
            image: None,
        }
    }

    /// An asset whose image is already in memory
    #[must_use]
    pub fn preloaded(id: &str, mode: Mode, image: RgbaImage) -> Self {
        Self {
            state: LoadState::Ready,
            image: Some(Arc::new(image)),
            ..Self::new(id, mode, "", None)
        }
    }

    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready)
    }

    /// Decoded image, available once ready
    #[must_use]
    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_deref()
    }

    /// One-based number of the attempt in flight
    #[must_use]
    pub const fn attempt_number(&self) -> Option<usize> {
        match self.state {
            LoadState::Attempting(i) => Some(i + 1),
            _ => None,
        }
    }

    /// Start loading; `None` if the asset was already requested
    pub fn begin(&mut self) -> Option<LoadRequest> {
        if self.state != LoadState::Idle {
            return None;
        }
        self.attempt(0)
    }

    /// Accept the decoded image of attempt `attempt`
    ///
    /// Returns `false` for stale results that no longer match the state.
    pub fn on_success(&mut self, attempt: usize, image: RgbaImage) -> bool {
        if self.state != LoadState::Attempting(attempt) {
            return false;
        }
        self.image = Some(Arc::new(image));
        self.state = LoadState::Ready;
        true
    }

    /// Record a failed attempt and move to the next strategy, if any
    pub fn on_failure(&mut self, attempt: usize) -> Option<LoadRequest> {
        if self.state != LoadState::Attempting(attempt) {
            return None;
        }
        self.attempt(attempt + 1)
    }

    fn attempt(&mut self, index: usize) -> Option<LoadRequest> {
        let Some(strategy) = self.strategies.get(index) else {
            self.state = LoadState::Exhausted;
            return None;
        };
        self.state = LoadState::Attempting(index);
        Some(LoadRequest {
            asset_id: self.id.clone(),
            attempt: index,
            url: cache_busted(&strategy.url, unix_millis()),
            strategy: strategy.clone(),
        })
    }
}

/// All catalog assets in catalog order
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    assets: Vec<AccessoryAsset>,
}

impl AssetStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset, replacing any existing asset with the same id
    pub fn insert(&mut self, asset: AccessoryAsset) {
        match self.assets.iter_mut().find(|a| a.id == asset.id) {
            Some(existing) => *existing = asset,
            None => self.assets.push(asset),
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AccessoryAsset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut AccessoryAsset> {
        self.assets.iter_mut().find(|a| a.id == id)
    }

    /// First catalog entry of a mode, used when nothing is selected
    #[must_use]
    pub fn first_for(&self, mode: Mode) -> Option<&AccessoryAsset> {
        self.assets.iter().find(|a| a.mode == mode)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccessoryAsset> {
        self.assets.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AccessoryAsset> {
        self.assets.iter_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Whether any asset still has an attempt in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.assets.iter().any(|a| matches!(a.state, LoadState::Attempting(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_shapes() {
        let plain = LoadStrategy::ladder("https://a/x.png", None);
        let flags: Vec<_> = plain.iter().map(|s| (s.cross_origin, s.no_referrer)).collect();
        assert_eq!(flags, vec![(true, true), (false, true), (false, false)]);

        let with_fallback = LoadStrategy::ladder("https://a/x.png", Some("https://b/y.png"));
        assert_eq!(with_fallback.len(), 4);
        assert_eq!(with_fallback[3], LoadStrategy::new("https://b/y.png", true, true));
    }

    #[test]
    fn test_cache_busting_separator() {
        assert_eq!(cache_busted("https://a/x.png", 42), "https://a/x.png?v=42");
        assert_eq!(cache_busted("https://a/x.png?w=640", 42), "https://a/x.png?w=640&v=42");
    }

    #[test]
    fn test_state_machine_walks_ladder() {
        let mut asset = AccessoryAsset::new("ring", Mode::Rings, "https://a/x.png", None);
        assert_eq!(asset.state(), LoadState::Idle);

        let first = asset.begin().unwrap();
        assert_eq!(first.attempt, 0);
        assert!(first.url.starts_with("https://a/x.png?v="));
        assert!(asset.begin().is_none());
        assert_eq!(asset.attempt_number(), Some(1));

        assert_eq!(asset.on_failure(0).unwrap().attempt, 1);
        // Stale failure for an older attempt is ignored
        assert!(asset.on_failure(0).is_none());
        assert_eq!(asset.state(), LoadState::Attempting(1));

        assert_eq!(asset.on_failure(1).unwrap().attempt, 2);
        assert!(asset.on_failure(2).is_none());
        assert_eq!(asset.state(), LoadState::Exhausted);
        assert!(!asset.on_success(2, RgbaImage::new(1, 1)));
        assert!(!asset.is_ready());
    }

    #[test]
    fn test_ready_is_terminal() {
        let mut asset = AccessoryAsset::new("glasses", Mode::Sunglasses, "https://a/x.png", None);
        asset.begin();
        assert!(asset.on_success(0, RgbaImage::new(4, 2)));
        assert!(asset.is_ready());
        assert!(asset.state().is_terminal());
        assert!(asset.on_failure(0).is_none());
        assert!(asset.is_ready());
        assert_eq!(asset.image().map(image::RgbaImage::dimensions), Some((4, 2)));
    }

    #[test]
    fn test_store_lookup() {
        let mut store = AssetStore::new();
        store.insert(AccessoryAsset::new("a", Mode::Rings, "u", None));
        store.insert(AccessoryAsset::new("b", Mode::Rings, "u", None));
        store.insert(AccessoryAsset::preloaded("a", Mode::Rings, RgbaImage::new(1, 1)));

        assert_eq!(store.len(), 2);
        assert!(store.get("a").unwrap().is_ready());
        assert_eq!(store.first_for(Mode::Rings).unwrap().id, "a");
        assert!(store.first_for(Mode::Necklace).is_none());
    }
}
