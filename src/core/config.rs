//! Movement configuration with documented defaults
//!
//! Supplied once at construction and passed explicitly to the components
//! that need it. Loaded from TOML:
//!
//! ```toml
//! prefer_towns = true
//! harsh_terrain = ["mountains", "swamp", "badlands"]
//! impassable = ["ocean", "lake", "peaks"]
//! step_delay_ms = 150
//! resume_delay_ms = 250
//! spawn_ring_radius = 15
//!
//! [costs]
//! plains = 1
//! forest = 2
//! swamp = 3
//! ocean = "impassable"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use crate::core::error::ConfigError;
use crate::map::Terrain;
use crate::pathfinding::cost::MoveCost;

/// Configuration for the movement systems
#[derive(Debug, Clone)]
pub struct MovementConfig {
    // === COSTS ===
    /// Per-terrain movement cost. Terrain missing from the table costs 1.
    pub costs: BTreeMap<Terrain, MoveCost>,

    /// Terrain that is impassable regardless of any cost entry
    pub impassable: Vec<Terrain>,

    // === SPAWNING ===
    /// Bias spawn selection towards settlements
    ///
    /// Also enables the harsh-terrain gate for hexes that are not themselves
    /// settlements.
    pub prefer_towns: bool,

    /// Passable terrain rejected as a spawn point unless it holds a settlement
    pub harsh_terrain: Vec<Terrain>,

    /// Largest ring radius scanned around the map centre before falling back
    /// to an exhaustive scan
    pub spawn_ring_radius: u32,

    /// Seed for the spawn RNG; `None` seeds from entropy
    pub seed: Option<u64>,

    // === EXECUTION PACING ===
    /// Pause between arriving at one hex and leaving for the next
    pub step_delay: Duration,

    /// Pause between the resume signal and the next step
    pub resume_delay: Duration,
}

impl Default for MovementConfig {
    fn default() -> Self {
        let costs = BTreeMap::from([
            (Terrain::Plains, MoveCost::Turns(1)),
            (Terrain::Grassland, MoveCost::Turns(1)),
            (Terrain::Road, MoveCost::Turns(1)),
            (Terrain::Coast, MoveCost::Turns(1)),
            (Terrain::Forest, MoveCost::Turns(2)),
            (Terrain::Hills, MoveCost::Turns(2)),
            (Terrain::Desert, MoveCost::Turns(2)),
            (Terrain::Badlands, MoveCost::Turns(2)),
            (Terrain::Tundra, MoveCost::Turns(2)),
            (Terrain::River, MoveCost::Turns(2)),
            (Terrain::Jungle, MoveCost::Turns(3)),
            (Terrain::Mountains, MoveCost::Turns(3)),
            (Terrain::Swamp, MoveCost::Turns(3)),
            (Terrain::Snow, MoveCost::Turns(3)),
        ]);

        Self {
            costs,
            impassable: Terrain::default_impassable().to_vec(),
            prefer_towns: true,
            harsh_terrain: Terrain::default_harsh().to_vec(),
            spawn_ring_radius: 15,
            seed: None,
            step_delay: Duration::from_millis(150),
            resume_delay: Duration::from_millis(250),
        }
    }
}

/// TOML representation; every field optional so partial files layer over
/// the defaults
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    costs: Option<BTreeMap<String, TomlCost>>,
    impassable: Option<Vec<String>>,
    prefer_towns: Option<bool>,
    harsh_terrain: Option<Vec<String>>,
    spawn_ring_radius: Option<u32>,
    seed: Option<u64>,
    step_delay_ms: Option<u64>,
    resume_delay_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlCost {
    Turns(u32),
    Marker(String),
}

impl MovementConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string, layering it over the defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(costs) = raw.costs {
            for (name, cost) in costs {
                let Some(terrain) = known_terrain(&name, "costs") else {
                    continue;
                };
                let cost = match cost {
                    TomlCost::Turns(turns) => MoveCost::Turns(turns),
                    TomlCost::Marker(marker) if marker.eq_ignore_ascii_case("impassable") => {
                        MoveCost::Impassable
                    }
                    TomlCost::Marker(marker) => {
                        return Err(ConfigError::Invalid(format!(
                            "cost for '{}' must be an integer or \"impassable\", got \"{}\"",
                            name, marker
                        )));
                    }
                };
                config.costs.insert(terrain, cost);
            }
        }
        if let Some(names) = raw.impassable {
            config.impassable = names.iter().filter_map(|n| known_terrain(n, "impassable")).collect();
        }
        if let Some(names) = raw.harsh_terrain {
            config.harsh_terrain = names.iter().filter_map(|n| known_terrain(n, "harsh_terrain")).collect();
        }
        if let Some(prefer) = raw.prefer_towns {
            config.prefer_towns = prefer;
        }
        if let Some(radius) = raw.spawn_ring_radius {
            config.spawn_ring_radius = radius;
        }
        if let Some(ms) = raw.step_delay_ms {
            config.step_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = raw.resume_delay_ms {
            config.resume_delay = Duration::from_millis(ms);
        }
        config.seed = raw.seed;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spawn_ring_radius == 0 {
            return Err(ConfigError::Invalid("spawn_ring_radius must be at least 1".into()));
        }

        // A zero-cost hex makes hex distance overestimate the remaining cost,
        // so A* may return a longer-than-optimal route.
        for (terrain, cost) in &self.costs {
            if *cost == MoveCost::Turns(0) && !self.impassable.contains(terrain) {
                tracing::warn!(%terrain, "zero movement cost; routes may not be optimal");
            }
        }

        Ok(())
    }
}

fn known_terrain(name: &str, section: &str) -> Option<Terrain> {
    match name.parse::<Terrain>() {
        Ok(terrain) => Some(terrain),
        Err(_) => {
            tracing::warn!(name, section, "ignoring unknown terrain in movement config");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MovementConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_layers_over_defaults() {
        let config = MovementConfig::from_toml_str(
            r#"
            prefer_towns = false
            step_delay_ms = 10

            [costs]
            forest = 4
            "#,
        )
        .unwrap();

        assert!(!config.prefer_towns);
        assert_eq!(config.step_delay, Duration::from_millis(10));
        assert_eq!(config.costs.get(&Terrain::Forest), Some(&MoveCost::Turns(4)));
        assert_eq!(config.costs.get(&Terrain::Swamp), Some(&MoveCost::Turns(3)));
        assert_eq!(config.spawn_ring_radius, 15);
    }

    #[test]
    fn test_impassable_marker() {
        let config = MovementConfig::from_toml_str("[costs]\nswamp = \"impassable\"\n").unwrap();
        assert_eq!(config.costs.get(&Terrain::Swamp), Some(&MoveCost::Impassable));
    }

    #[test]
    fn test_bad_marker_rejected() {
        let result = MovementConfig::from_toml_str("[costs]\nswamp = \"slow\"\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_terrain_skipped() {
        let config = MovementConfig::from_toml_str(
            "impassable = [\"ocean\", \"lava\"]\n[costs]\nlava = 9\n",
        )
        .unwrap();
        assert_eq!(config.impassable, vec![Terrain::Ocean]);
    }

    #[test]
    fn test_zero_ring_radius_invalid() {
        let result = MovementConfig::from_toml_str("spawn_ring_radius = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            MovementConfig::from_toml_str("walk_speed = 3\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
