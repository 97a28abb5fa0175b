//! Static tactics tables with documented defaults
//!
//! Every lookup table the engine reads lives in `TacticsCatalog`: formation
//! specs, slot capacities, directional weights and counter multipliers.
//! A catalog is built once and then only read. TOML files can override
//! individual entries; anything a file leaves out keeps its default.
//!
//! ```toml
//! [[formations]]
//! type = "Phalanx"
//! speed_multiplier = 0.75
//! capacity = { front = 25, flank = 6, back = 12, support = 8 }
//!
//! [formations.position_bonuses.front]
//! armor = 0.3
//!
//! [[directions]]
//! direction = "Rear"
//! weights = { front = 0.1, flank = 0.2, back = 0.5, support = 0.2 }
//!
//! [[counters]]
//! attacker = "Swarm"
//! defender = "Box"
//! multiplier = 1.3
//! ```

use crate::core::error::{Result, TacticsError};
use crate::formation::capacity::CapacityTable;
use crate::formation::catalog::{FormationCatalog, FormationSpec};
use crate::formation::counter::CounterMatrix;
use crate::formation::damage::DirectionalWeights;
use crate::formation::types::{AttackDirection, FormationType, PerPosition, PositionBonuses};
use serde::Deserialize;
use std::path::Path;

/// Tolerance for a direction's weights summing to 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-4;

/// Upper bound on any single position's capacity
pub const MAX_POSITION_CAPACITY: u32 = 64;

/// All static tables the engine consults
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TacticsCatalog {
    pub formations: FormationCatalog,
    pub capacity: CapacityTable,
    pub weights: DirectionalWeights,
    pub counters: CounterMatrix,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    formations: Vec<FormationEntry>,
    #[serde(default)]
    directions: Vec<DirectionEntry>,
    #[serde(default)]
    counters: Vec<CounterEntry>,
}

#[derive(Debug, Deserialize)]
struct FormationEntry {
    #[serde(rename = "type")]
    formation_type: FormationType,
    speed_multiplier: Option<f32>,
    reconfigure_seconds: Option<u32>,
    position_bonuses: Option<PositionBonuses>,
    tags: Option<Vec<String>>,
    capacity: Option<PerPosition<u32>>,
}

#[derive(Debug, Deserialize)]
struct DirectionEntry {
    direction: AttackDirection,
    weights: PerPosition<f64>,
}

#[derive(Debug, Deserialize)]
struct CounterEntry {
    attacker: FormationType,
    defender: FormationType,
    multiplier: f64,
}

impl TacticsCatalog {
    /// Create a catalog with the reference tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by a TOML document, then validated
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        let mut catalog = Self::default();
        catalog.merge(file)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load overrides from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn merge(&mut self, file: CatalogFile) -> Result<()> {
        for entry in file.formations {
            if entry.formation_type == FormationType::Unknown {
                return Err(TacticsError::InvalidCatalog(
                    "formation entry with unrecognized type".into(),
                ));
            }

            let mut spec = self
                .formations
                .get(entry.formation_type)
                .cloned()
                .unwrap_or(FormationSpec {
                    speed_multiplier: 1.0,
                    reconfigure_seconds: 0,
                    position_bonuses: PositionBonuses::default(),
                    tags: Vec::new(),
                });
            if let Some(speed) = entry.speed_multiplier {
                spec.speed_multiplier = speed;
            }
            if let Some(seconds) = entry.reconfigure_seconds {
                spec.reconfigure_seconds = seconds;
            }
            if let Some(bonuses) = entry.position_bonuses {
                spec.position_bonuses = bonuses;
            }
            if let Some(tags) = entry.tags {
                spec.tags = tags;
            }
            self.formations.insert(entry.formation_type, spec);

            if let Some(row) = entry.capacity {
                self.capacity.set_row(entry.formation_type, row);
            }
        }

        for entry in file.directions {
            if entry.direction == AttackDirection::Unknown {
                return Err(TacticsError::InvalidCatalog(
                    "direction entry with unrecognized direction".into(),
                ));
            }
            self.weights.set_row(entry.direction, entry.weights);
        }

        for entry in file.counters {
            if entry.attacker == FormationType::Unknown || entry.defender == FormationType::Unknown
            {
                return Err(TacticsError::InvalidCatalog(
                    "counter entry with unrecognized formation".into(),
                ));
            }
            self.counters
                .set(entry.attacker, entry.defender, entry.multiplier);
        }

        Ok(())
    }

    /// Validate tables for internal consistency
    pub fn validate(&self) -> Result<()> {
        // Every other direction falls back to the frontal row
        if self.weights.row(AttackDirection::Frontal).is_none() {
            return Err(TacticsError::InvalidCatalog("no weights for Frontal".into()));
        }

        for (direction, row) in self.weights.iter() {
            if row.iter().any(|(_, w)| !(0.0..=1.0).contains(w)) {
                return Err(TacticsError::InvalidCatalog(format!(
                    "{:?} weights must lie in [0, 1]",
                    direction
                )));
            }

            let sum: f64 = row.iter().map(|(_, w)| *w).sum();
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(TacticsError::InvalidCatalog(format!(
                    "{:?} weights sum to {:.4}, expected 1.0",
                    direction, sum
                )));
            }
        }

        for (formation, row) in self.capacity.iter() {
            for (position, slots) in row.iter() {
                if *slots > MAX_POSITION_CAPACITY {
                    return Err(TacticsError::InvalidCatalog(format!(
                        "{} {} capacity {} exceeds {}",
                        formation, position, slots, MAX_POSITION_CAPACITY
                    )));
                }
            }
        }

        for (attacker, defender, multiplier) in self.counters.iter() {
            if !multiplier.is_finite() || multiplier <= 0.0 {
                return Err(TacticsError::InvalidCatalog(format!(
                    "counter {} vs {} must be positive, got {}",
                    attacker, defender, multiplier
                )));
            }
        }

        for (formation, spec) in self.formations.iter() {
            if !spec.speed_multiplier.is_finite() || spec.speed_multiplier <= 0.0 {
                return Err(TacticsError::InvalidCatalog(format!(
                    "{} speed multiplier must be positive",
                    formation
                )));
            }
            if spec
                .position_bonuses
                .iter()
                .any(|(_, bonus)| bonus.map_or(false, |b| !b.is_finite()))
            {
                return Err(TacticsError::InvalidCatalog(format!(
                    "{} has a non-finite position bonus",
                    formation
                )));
            }
        }

        Ok(())
    }
}

// === GLOBAL CATALOG ACCESS ===

use std::sync::OnceLock;

static CATALOG: OnceLock<TacticsCatalog> = OnceLock::new();

/// Get the global catalog (initializes with defaults if not set)
pub fn catalog() -> &'static TacticsCatalog {
    CATALOG.get_or_init(TacticsCatalog::default)
}

/// Set the global catalog (can only be called once, before first read)
///
/// Returns Err if the catalog was already set or already read.
pub fn set_catalog(catalog: TacticsCatalog) -> std::result::Result<(), TacticsCatalog> {
    CATALOG.set(catalog)
}
