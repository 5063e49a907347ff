//! Biome types and their gameplay attributes
//!
//! Classification order matters: water and beach are decided from elevation
//! alone before any climate rule gets a say.

use serde::{Deserialize, Serialize};

use crate::core::config::BiomeThresholds;

/// Categorical terrain type of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    #[default]
    DeepWater,
    Water,
    Sand,
    Grassland,
    Forest,
    Desert,
    Savanna,
    Tundra,
    Taiga,
    Hills,
    Mountain,
    Snow,
}

impl Biome {
    pub const ALL: [Biome; 12] = [
        Biome::DeepWater,
        Biome::Water,
        Biome::Sand,
        Biome::Grassland,
        Biome::Forest,
        Biome::Desert,
        Biome::Savanna,
        Biome::Tundra,
        Biome::Taiga,
        Biome::Hills,
        Biome::Mountain,
        Biome::Snow,
    ];

    pub fn is_water(&self) -> bool {
        matches!(self, Biome::DeepWater | Biome::Water)
    }

    /// Can agents enter this biome?
    pub fn is_passable(&self, mountains_passable: bool) -> bool {
        match self {
            Biome::DeepWater | Biome::Water => false,
            Biome::Mountain => mountains_passable,
            _ => true,
        }
    }

    /// Movement cost multiplier (1.0 = open ground)
    pub fn movement_cost(&self) -> f32 {
        match self {
            Biome::DeepWater | Biome::Water => f32::INFINITY,
            Biome::Sand => 1.2,
            Biome::Grassland => 1.0,
            Biome::Forest => 1.5,
            Biome::Desert => 1.4,
            Biome::Savanna => 1.1,
            Biome::Tundra => 1.3,
            Biome::Taiga => 1.6,
            Biome::Hills => 2.0,
            Biome::Mountain => 3.0,
            Biome::Snow => 2.5,
        }
    }

    /// Settlement desirability (0.0 = unbuildable)
    pub fn build_value(&self) -> f32 {
        match self {
            Biome::DeepWater | Biome::Water => 0.0,
            Biome::Sand => 0.4,
            Biome::Grassland => 1.0,
            Biome::Forest => 0.6,
            Biome::Desert => 0.2,
            Biome::Savanna => 0.8,
            Biome::Tundra => 0.3,
            Biome::Taiga => 0.4,
            Biome::Hills => 0.5,
            Biome::Mountain => 0.1,
            Biome::Snow => 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Biome::DeepWater => "deep water",
            Biome::Water => "water",
            Biome::Sand => "sand",
            Biome::Grassland => "grassland",
            Biome::Forest => "forest",
            Biome::Desert => "desert",
            Biome::Savanna => "savanna",
            Biome::Tundra => "tundra",
            Biome::Taiga => "taiga",
            Biome::Hills => "hills",
            Biome::Mountain => "mountain",
            Biome::Snow => "snow",
        }
    }

    /// Classify a tile from its elevation, moisture and temperature
    pub fn classify(elevation: f32, moisture: f32, temperature: f32, t: &BiomeThresholds) -> Biome {
        if elevation < t.deep_water_level {
            return Biome::DeepWater;
        }
        if elevation < t.water_level {
            return Biome::Water;
        }
        if elevation < t.water_level + t.beach_band {
            return Biome::Sand;
        }

        if elevation >= t.snow_level {
            return Biome::Snow;
        }
        if elevation >= t.mountain_level {
            return Biome::Mountain;
        }
        if elevation >= t.hills_level {
            return Biome::Hills;
        }

        if temperature < t.cold_temperature {
            return if moisture > t.wet_moisture {
                Biome::Taiga
            } else {
                Biome::Tundra
            };
        }

        if temperature > t.hot_temperature {
            return if moisture < t.dry_moisture {
                Biome::Desert
            } else {
                Biome::Savanna
            };
        }

        if moisture > t.wet_moisture {
            Biome::Forest
        } else {
            Biome::Grassland
        }
    }
}

impl std::fmt::Display for Biome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
