//! Configuration management for the accessory overlay engine

use crate::assets::{AccessoryAsset, AssetStore, HttpFetcher};
use crate::constants::{
    EAR_ANGLE_ALPHA, EAR_POSITION_ALPHA, NECKLACE_ALPHA, RING_ALPHA, SIZE_SCALE_DEFAULT_PERCENT,
    SIZE_SCALE_MAX_PERCENT, SIZE_SCALE_MIN_PERCENT,
};
use crate::engine::FrameSettings;
use crate::filters::{AnchorId, AnchorProfile, SmoothingFilter};
use crate::landmarks::Viewport;
use crate::resolvers::Mode;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

/// Host serving the bundled catalog images
const CATALOG_HOST: &str = "https://pub-e46fd816b4ee497fb2f639f180c4df20.r2.dev";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Accessory images available to the engine
    pub catalog: CatalogConfig,

    /// Initial mode, accessories and size
    pub selection: SelectionConfig,

    /// Smoothing strengths
    pub smoothing: SmoothingConfig,

    /// Asset download behaviour
    pub loader: LoaderConfig,

    /// Output frame geometry
    pub output: OutputConfig,
}

/// One catalog image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Identifier used for selection
    pub id: String,

    /// Mode the image belongs to
    pub mode: Mode,

    /// Primary image URL (`https://` or `file://`)
    pub url: String,

    /// Extra URL tried after every strategy on `url` failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_url: Option<String>,
}

impl CatalogEntry {
    fn new(id: &str, mode: Mode, url: String) -> Self {
        Self {
            id: id.to_string(),
            mode,
            url,
            fallback_url: None,
        }
    }
}

/// Accessory catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog entries, in display order
    pub entries: Vec<CatalogEntry>,
}

/// Initial user selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Active mode
    pub mode: Mode,

    /// Selected ring id
    pub ring: Option<String>,

    /// Selected sunglasses id
    pub sunglasses: Option<String>,

    /// Selected earring id
    pub earring: Option<String>,

    /// Selected necklace id
    pub necklace: Option<String>,

    /// Size slider in percent (50-200)
    pub size_scale_percent: u32,
}

/// Exponential smoothing factors, each in (0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Ring position, angle and radius
    pub ring_alpha: f64,

    /// Earring position
    pub ear_position_alpha: f64,

    /// Earring angle
    pub ear_angle_alpha: f64,

    /// Necklace position and angle
    pub necklace_alpha: f64,
}

/// Asset loader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Origin presented to the asset host
    pub page_origin: String,

    /// Largest accepted image, in bytes
    pub max_bytes: u64,

    /// How long startup waits for the catalog to load, in seconds
    pub settle_timeout_secs: u64,
}

/// Output frame configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Frame width in logical pixels
    pub width: u32,

    /// Frame height in logical pixels
    pub height: u32,

    /// Device pixel ratio; the surface uses max(1, floor(ratio))
    pub pixel_ratio: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let pngfind = |name: &str| format!("{CATALOG_HOST}/pngfind.com-{name}.png");
        let earring_url = format!("{CATALOG_HOST}/85ef607d-7716-4a42-abf3-ee8fb30ecd29.png");

        let mut entries = vec![
            CatalogEntry::new("diamond-ring-1707837", Mode::Rings, pngfind("diamond-ring-png-1707837")),
            CatalogEntry::new("loose-diamonds-2037252", Mode::Rings, pngfind("loose-diamonds-png-2037252")),
            CatalogEntry::new("laurel-leaf-6893709", Mode::Rings, pngfind("laurel-leaf-png-6893709")),
            CatalogEntry::new("aviators-105130", Mode::Sunglasses, pngfind("aviators-png-105130")),
            CatalogEntry::new("aviators-105839", Mode::Sunglasses, pngfind("aviators-png-105839")),
            CatalogEntry::new("chasma-248748", Mode::Sunglasses, pngfind("chasma-png-248748")),
            CatalogEntry::new("round-glasses-2333295", Mode::Sunglasses, pngfind("round-glasses-png-2333295")),
            CatalogEntry::new("sunglasses-vector-5936502", Mode::Sunglasses, pngfind("sunglasses-vector-png-5936502")),
            CatalogEntry::new(
                "indian-gold-necklace-1635999",
                Mode::Necklace,
                pngfind("indian-gold-jewellery-necklace-1635999"),
            ),
        ];
        let mut earring = CatalogEntry::new("gold-drop-earring", Mode::Earrings, earring_url.clone());
        earring.fallback_url = Some(earring_url);
        entries.push(earring);

        Self { entries }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Rings,
            ring: Some("diamond-ring-1707837".to_string()),
            sunglasses: Some("aviators-105130".to_string()),
            earring: None,
            necklace: None,
            size_scale_percent: SIZE_SCALE_DEFAULT_PERCENT,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            ring_alpha: RING_ALPHA,
            ear_position_alpha: EAR_POSITION_ALPHA,
            ear_angle_alpha: EAR_ANGLE_ALPHA,
            necklace_alpha: NECKLACE_ALPHA,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            page_origin: "http://localhost:5173".to_string(),
            max_bytes: 16 * 1024 * 1024,
            settle_timeout_secs: 30,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            pixel_ratio: 1.0,
        }
    }
}

impl SelectionConfig {
    /// Configured accessory id for a mode
    #[must_use]
    pub fn accessory(&self, mode: Mode) -> Option<&str> {
        match mode {
            Mode::Rings => self.ring.as_deref(),
            Mode::Sunglasses => self.sunglasses.as_deref(),
            Mode::Earrings => self.earring.as_deref(),
            Mode::Necklace => self.necklace.as_deref(),
        }
    }

    /// Set the accessory id for a mode
    pub fn set_accessory(&mut self, mode: Mode, id: &str) {
        let slot = match mode {
            Mode::Rings => &mut self.ring,
            Mode::Sunglasses => &mut self.sunglasses,
            Mode::Earrings => &mut self.earring,
            Mode::Necklace => &mut self.necklace,
        };
        *slot = Some(id.to_string());
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Build the smoothing filter from the configured alphas
    #[must_use]
    pub fn smoothing_filter(&self) -> SmoothingFilter {
        let profiles: HashMap<AnchorId, AnchorProfile> = AnchorId::ALL
            .into_iter()
            .map(|anchor| {
                let mut profile = AnchorProfile::default_for(anchor);
                match anchor {
                    AnchorId::RingHand => {
                        profile.position_alpha = self.smoothing.ring_alpha;
                        profile.angle_alpha = self.smoothing.ring_alpha;
                        profile.scale_alpha = Some(self.smoothing.ring_alpha);
                    }
                    AnchorId::LeftEar | AnchorId::RightEar => {
                        profile.position_alpha = self.smoothing.ear_position_alpha;
                        profile.angle_alpha = self.smoothing.ear_angle_alpha;
                    }
                    AnchorId::Necklace => {
                        profile.position_alpha = self.smoothing.necklace_alpha;
                        profile.angle_alpha = self.smoothing.necklace_alpha;
                    }
                }
                (anchor, profile)
            })
            .collect();
        SmoothingFilter::new(profiles)
    }

    /// One idle asset per catalog entry
    #[must_use]
    pub fn asset_store(&self) -> AssetStore {
        let mut store = AssetStore::new();
        for entry in &self.catalog.entries {
            store.insert(AccessoryAsset::new(&entry.id, entry.mode, &entry.url, entry.fallback_url.as_deref()));
        }
        store
    }

    /// HTTP transport configured from the loader section
    #[must_use]
    pub fn http_fetcher(&self) -> HttpFetcher {
        HttpFetcher::new(
            Duration::from_secs(self.loader.timeout_secs),
            &self.loader.page_origin,
            self.loader.max_bytes,
        )
    }

    /// Initial per-frame settings
    #[must_use]
    pub fn frame_settings(&self) -> FrameSettings {
        let mut settings =
            FrameSettings::new(self.selection.mode).with_size_percent(self.selection.size_scale_percent);
        for mode in Mode::ALL {
            if let Some(id) = self.selection.accessory(mode) {
                settings = settings.with_selection(mode, id);
            }
        }
        settings
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            f64::from(self.output.width),
            f64::from(self.output.height),
            self.output.pixel_ratio,
        )
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Validate catalog
        let mut ids = HashSet::new();
        for entry in &self.catalog.entries {
            if entry.id.is_empty() {
                return Err(Error::ConfigError("Catalog ids must not be empty".to_string()));
            }
            if !ids.insert(entry.id.as_str()) {
                return Err(Error::ConfigError(format!("Duplicate catalog id: {}", entry.id)));
            }
            if entry.url.is_empty() {
                return Err(Error::ConfigError(format!("Catalog entry {} has no URL", entry.id)));
            }
        }

        // Validate selection
        for mode in Mode::ALL {
            let Some(id) = self.selection.accessory(mode) else {
                continue;
            };
            match self.catalog.entries.iter().find(|entry| entry.id == id) {
                Some(entry) if entry.mode == mode => {}
                Some(entry) => {
                    return Err(Error::ConfigError(format!(
                        "Selected {} {id} is a {} entry",
                        mode.item_name(),
                        entry.mode.item_name()
                    )));
                }
                None => {
                    return Err(Error::ConfigError(format!(
                        "Selected {} not in catalog: {id}",
                        mode.item_name()
                    )));
                }
            }
        }
        if !(SIZE_SCALE_MIN_PERCENT..=SIZE_SCALE_MAX_PERCENT).contains(&self.selection.size_scale_percent) {
            return Err(Error::ConfigError(format!(
                "Size scale must be between {SIZE_SCALE_MIN_PERCENT} and {SIZE_SCALE_MAX_PERCENT} percent"
            )));
        }

        // Validate smoothing factors
        for (name, alpha) in [
            ("ring_alpha", self.smoothing.ring_alpha),
            ("ear_position_alpha", self.smoothing.ear_position_alpha),
            ("ear_angle_alpha", self.smoothing.ear_angle_alpha),
            ("necklace_alpha", self.smoothing.necklace_alpha),
        ] {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(Error::ConfigError(format!("{name} must be in (0.0, 1.0]")));
            }
        }

        // Validate loader settings
        if self.loader.timeout_secs == 0 {
            return Err(Error::ConfigError("Loader timeout must be greater than 0".to_string()));
        }
        if self.loader.max_bytes == 0 {
            return Err(Error::ConfigError("Loader byte limit must be greater than 0".to_string()));
        }

        // Validate output geometry
        if self.output.width == 0 || self.output.height == 0 {
            return Err(Error::ConfigError("Output dimensions must be greater than 0".to_string()));
        }
        if !(self.output.pixel_ratio.is_finite() && self.output.pixel_ratio > 0.0) {
            return Err(Error::ConfigError("Pixel ratio must be a positive number".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Accessory Overlay Configuration

# Accessory catalog; fallback_url adds a last-resort load attempt
catalog:
  entries:
    - id: "diamond-ring-1707837"
      mode: rings
      url: "https://pub-e46fd816b4ee497fb2f639f180c4df20.r2.dev/pngfind.com-diamond-ring-png-1707837.png"
    - id: "aviators-105130"
      mode: sunglasses
      url: "https://pub-e46fd816b4ee497fb2f639f180c4df20.r2.dev/pngfind.com-aviators-png-105130.png"
    - id: "indian-gold-necklace-1635999"
      mode: necklace
      url: "https://pub-e46fd816b4ee497fb2f639f180c4df20.r2.dev/pngfind.com-indian-gold-jewellery-necklace-1635999.png"
    - id: "gold-drop-earring"
      mode: earrings
      url: "https://pub-e46fd816b4ee497fb2f639f180c4df20.r2.dev/85ef607d-7716-4a42-abf3-ee8fb30ecd29.png"
      fallback_url: "file:///usr/share/accessory-overlay/earring.png"

# Initial selection
selection:
  mode: sunglasses
  ring: "diamond-ring-1707837"
  sunglasses: "aviators-105130"
  size_scale_percent: 100

# Smoothing factors (higher = snappier, lower = smoother)
smoothing:
  ring_alpha: 0.30
  ear_position_alpha: 0.28
  ear_angle_alpha: 0.18
  necklace_alpha: 0.12

# Asset loading
loader:
  timeout_secs: 10
  page_origin: "http://localhost:5173"
  max_bytes: 16777216
  settle_timeout_secs: 30

# Output frames
output:
  width: 1280
  height: 720
  pixel_ratio: 1.0
"#;
