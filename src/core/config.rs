//! World configuration with documented constants
//!
//! All tunable numbers for generation, pathfinding and culling live here.
//! The config is plain data: it is built once (defaults or TOML), validated,
//! and passed by value into each component. Nothing reads it globally.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, WorldError};

/// Top-level configuration for a world instance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub generation: GenerationConfig,
    pub pathfinding: PathfindingConfig,
    pub culling: CullingConfig,
}

impl WorldConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text. Missing sections and fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: WorldConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.generation.validate()?;
        self.pathfinding.validate()?;
        self.culling.validate()
    }
}

// === NOISE ===

/// Fractal (multi-octave) noise parameters for one terrain layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Number of octaves summed into the field
    pub octaves: u32,

    /// Amplitude multiplier between successive octaves
    ///
    /// 0.5 halves each octave's contribution, giving the classic 1/f look.
    pub persistence: f64,

    /// Frequency multiplier between successive octaves
    pub lacunarity: f64,

    /// Base frequency in cycles per tile
    ///
    /// At 0.04 the largest features span roughly 25 tiles.
    pub scale: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            scale: 0.04,
        }
    }
}

impl NoiseConfig {
    pub fn validate(&self, layer: &str) -> Result<()> {
        if self.octaves == 0 {
            return Err(WorldError::InvalidConfig(format!(
                "{layer}: octaves must be at least 1"
            )));
        }
        if !(self.persistence > 0.0 && self.persistence.is_finite()) {
            return Err(WorldError::InvalidConfig(format!(
                "{layer}: persistence ({}) must be positive",
                self.persistence
            )));
        }
        if !(self.lacunarity >= 1.0 && self.lacunarity.is_finite()) {
            return Err(WorldError::InvalidConfig(format!(
                "{layer}: lacunarity ({}) must be >= 1",
                self.lacunarity
            )));
        }
        if !(self.scale > 0.0 && self.scale.is_finite()) {
            return Err(WorldError::InvalidConfig(format!(
                "{layer}: scale ({}) must be positive",
                self.scale
            )));
        }
        Ok(())
    }
}

// === ISLAND MASK ===

/// Distance metric used to measure how far a tile is from the map centre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FalloffShape {
    /// Euclidean distance, gives round islands
    Radial,
    /// Max of the axis distances, gives islands that fill rectangular maps
    #[default]
    Square,
}

/// Island mask parameters
///
/// Elevation becomes `raw * (1 - d^power) + center_lift * (1 - d)` where `d`
/// is 0 at the centre and 1 on the outer ring. Both terms vanish at `d = 1`,
/// so border tiles always end at elevation 0 whatever the raw noise was.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandConfig {
    pub shape: FalloffShape,

    /// Falloff exponent. Higher keeps the interior high and drops steeply near the coast.
    pub power: f32,

    /// Extra elevation added toward the centre to reduce inland lakes
    pub center_lift: f32,
}

impl Default for IslandConfig {
    fn default() -> Self {
        Self {
            shape: FalloffShape::Square,
            power: 3.0,
            center_lift: 0.15,
        }
    }
}

// === BIOMES ===

/// Ordered thresholds for biome classification
///
/// Water and beach checks run first, then elevation bands, then climate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeThresholds {
    /// Below this elevation: deep water
    pub deep_water_level: f32,
    /// Below this elevation: water
    pub water_level: f32,
    /// Width of the sand band above `water_level`
    pub beach_band: f32,
    pub hills_level: f32,
    pub mountain_level: f32,
    pub snow_level: f32,

    /// Temperature below which land is tundra/taiga
    pub cold_temperature: f32,
    /// Temperature above which land is desert/savanna
    pub hot_temperature: f32,
    /// Moisture below which land counts as dry
    pub dry_moisture: f32,
    /// Moisture above which land counts as wet
    pub wet_moisture: f32,

    /// How much temperature drops per unit of elevation above the waterline
    pub altitude_cooling: f32,
}

impl Default for BiomeThresholds {
    fn default() -> Self {
        Self {
            deep_water_level: 0.18,
            water_level: 0.28,
            beach_band: 0.04,
            hills_level: 0.62,
            mountain_level: 0.74,
            snow_level: 0.86,
            cold_temperature: 0.3,
            hot_temperature: 0.65,
            dry_moisture: 0.35,
            wet_moisture: 0.6,
            altitude_cooling: 0.3,
        }
    }
}

impl BiomeThresholds {
    pub fn validate(&self) -> Result<()> {
        let bands = [
            self.deep_water_level,
            self.water_level,
            self.water_level + self.beach_band,
            self.hills_level,
            self.mountain_level,
            self.snow_level,
        ];
        if bands.windows(2).any(|w| w[0] > w[1]) {
            return Err(WorldError::InvalidConfig(format!(
                "elevation bands must be ascending: {:?}",
                bands
            )));
        }
        if self.deep_water_level <= 0.0 {
            return Err(WorldError::InvalidConfig(
                "deep_water_level must be positive so the border can sit below it".into(),
            ));
        }
        if self.cold_temperature >= self.hot_temperature {
            return Err(WorldError::InvalidConfig(format!(
                "cold_temperature ({}) should be < hot_temperature ({})",
                self.cold_temperature, self.hot_temperature
            )));
        }
        if self.dry_moisture >= self.wet_moisture {
            return Err(WorldError::InvalidConfig(format!(
                "dry_moisture ({}) should be < wet_moisture ({})",
                self.dry_moisture, self.wet_moisture
            )));
        }
        Ok(())
    }
}

// === GENERATION ===

/// Terrain generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// World units (pixels) per tile
    pub tile_size: f32,

    pub elevation: NoiseConfig,
    pub moisture: NoiseConfig,
    pub temperature: NoiseConfig,
    pub island: IslandConfig,
    pub biomes: BiomeThresholds,

    /// Whether mountain tiles can be walked on
    pub mountains_passable: bool,

    /// Number of majority-vote smoothing passes (0 disables smoothing)
    pub smoothing_iterations: u32,

    /// Neighbours (out of 8) of the opposite kind needed to flip a tile
    ///
    /// 8 only removes fully isolated tiles; 5 is a plain majority.
    pub smoothing_majority: u32,

    /// Minimum tile count before rows are generated on the rayon pool
    pub parallel_threshold: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            tile_size: 4.0,
            elevation: NoiseConfig::default(),
            moisture: NoiseConfig {
                octaves: 3,
                scale: 0.05,
                ..NoiseConfig::default()
            },
            temperature: NoiseConfig {
                octaves: 2,
                scale: 0.02,
                ..NoiseConfig::default()
            },
            island: IslandConfig::default(),
            biomes: BiomeThresholds::default(),
            mountains_passable: true,
            smoothing_iterations: 2,
            smoothing_majority: 6,
            parallel_threshold: 4096,
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.tile_size > 0.0 && self.tile_size.is_finite()) {
            return Err(WorldError::InvalidTileSize(self.tile_size));
        }
        self.elevation.validate("elevation")?;
        self.moisture.validate("moisture")?;
        self.temperature.validate("temperature")?;
        if !(self.island.power > 0.0 && self.island.power.is_finite()) {
            return Err(WorldError::InvalidConfig(format!(
                "island power ({}) must be positive",
                self.island.power
            )));
        }
        if !(0.0..=1.0).contains(&self.island.center_lift) {
            return Err(WorldError::InvalidConfig(format!(
                "island center_lift ({}) must be within [0, 1]",
                self.island.center_lift
            )));
        }
        if !(1..=8).contains(&self.smoothing_majority) {
            return Err(WorldError::InvalidConfig(format!(
                "smoothing_majority ({}) must be within 1..=8",
                self.smoothing_majority
            )));
        }
        self.biomes.validate()
    }
}

// === PATHFINDING ===

/// A* search settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingConfig {
    /// Node expansions allowed per search before giving up
    ///
    /// A 200x200 map has 40k cells; the default allows a full sweep with margin.
    pub max_expansions: usize,

    /// Collapse straight runs of waypoints to their endpoints
    pub simplify_paths: bool,

    /// Allow diagonal steps between two blocked orthogonal neighbours
    pub allow_corner_cutting: bool,

    /// Minimum batch size before searches run on the rayon pool
    pub parallel_threshold: usize,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            max_expansions: 50_000,
            simplify_paths: true,
            allow_corner_cutting: false,
            parallel_threshold: 8,
        }
    }
}

impl PathfindingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_expansions == 0 {
            return Err(WorldError::InvalidConfig(
                "max_expansions must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// === CULLING ===

/// Viewport culling settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CullingConfig {
    /// Screen-space margin around the view, in pixels at zoom 1
    ///
    /// Divided by zoom, so the margin looks the same at every zoom level.
    pub buffer: f32,

    /// Buffer multiplier for low-priority entities under aggressive culling
    pub low_priority_buffer_scale: f32,

    /// Minimum time between accepted culling updates
    pub update_interval_ms: u64,

    /// Camera movement (world units) that forces an update
    pub move_threshold: f32,

    /// Zoom change that forces an update
    pub zoom_threshold: f32,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            buffer: 100.0,
            low_priority_buffer_scale: 0.5,
            update_interval_ms: 100,
            move_threshold: 50.0,
            zoom_threshold: 0.1,
        }
    }
}

impl CullingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.buffer >= 0.0 && self.buffer.is_finite()) {
            return Err(WorldError::InvalidConfig(format!(
                "culling buffer ({}) must be non-negative",
                self.buffer
            )));
        }
        if !(0.0..=1.0).contains(&self.low_priority_buffer_scale) {
            return Err(WorldError::InvalidConfig(format!(
                "low_priority_buffer_scale ({}) must be within [0, 1]",
                self.low_priority_buffer_scale
            )));
        }
        if self.move_threshold < 0.0 || self.zoom_threshold < 0.0 {
            return Err(WorldError::InvalidConfig(
                "culling thresholds must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = WorldConfig::from_toml_str(
            r#"
            [generation]
            tile_size = 8.0

            [generation.island]
            shape = "radial"

            [pathfinding]
            max_expansions = 1000
            "#,
        )
        .unwrap();

        assert_eq!(config.generation.tile_size, 8.0);
        assert_eq!(config.generation.island.shape, FalloffShape::Radial);
        assert_eq!(config.generation.island.power, IslandConfig::default().power);
        assert_eq!(config.pathfinding.max_expansions, 1000);
        assert_eq!(config.culling, CullingConfig::default());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = WorldConfig::from_toml_str("[generation]\ntile_size = \"big\"");
        assert!(matches!(result, Err(WorldError::Toml(_))));
    }

    #[test]
    fn test_unordered_bands_rejected() {
        let mut config = WorldConfig::default();
        config.generation.biomes.water_level = 0.9;
        assert!(matches!(config.validate(), Err(WorldError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        let mut config = WorldConfig::default();
        config.generation.tile_size = 0.0;
        assert!(matches!(config.validate(), Err(WorldError::InvalidTileSize(_))));
    }

    #[test]
    fn test_zero_octaves_rejected() {
        let mut config = WorldConfig::default();
        config.generation.moisture.octaves = 0;
        assert!(config.validate().is_err());
    }
}
