//! Static per-formation data: speed, reconfiguration time, position bonuses
//!
//! Content is game-design data. The engine only looks it up.

use crate::combat::modifiers::StatModifiers;
use crate::core::types::ShipStack;
use crate::formation::types::{FormationType, PerPosition, PositionBonuses};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Catalog entry for one formation type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationSpec {
    /// Multiplier on the stack's slowest base speed
    pub speed_multiplier: f32,
    /// Seconds needed to switch into this formation
    pub reconfigure_seconds: u32,
    #[serde(default)]
    pub position_bonuses: PositionBonuses,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl FormationSpec {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Formation specs keyed by type
#[derive(Debug, Clone, PartialEq)]
pub struct FormationCatalog {
    specs: BTreeMap<FormationType, FormationSpec>,
}

impl FormationCatalog {
    pub fn empty() -> Self {
        Self {
            specs: BTreeMap::new(),
        }
    }

    pub fn get(&self, formation_type: FormationType) -> Option<&FormationSpec> {
        self.specs.get(&formation_type)
    }

    /// Insert or replace an entry. `Unknown` is never stored.
    pub fn insert(&mut self, formation_type: FormationType, spec: FormationSpec) {
        if formation_type != FormationType::Unknown {
            self.specs.insert(formation_type, spec);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormationType, &FormationSpec)> + '_ {
        self.specs.iter().map(|(t, s)| (*t, s))
    }

    /// Position bonus table, empty for an unlisted formation
    pub fn position_bonuses(&self, formation_type: FormationType) -> PositionBonuses {
        self.get(formation_type)
            .map(|s| s.position_bonuses)
            .unwrap_or_default()
    }

    /// Fleet speed in this formation: slowest hull times the multiplier
    ///
    /// 0.0 for an empty stack or an unlisted formation.
    pub fn effective_speed(&self, formation_type: FormationType, stack: &ShipStack) -> f32 {
        match (self.get(formation_type), stack.slowest_speed()) {
            (Some(spec), Some(speed)) => speed as f32 * spec.speed_multiplier,
            _ => 0.0,
        }
    }

    /// Time to switch from one formation into another
    pub fn reconfigure_seconds(&self, from: FormationType, to: FormationType) -> u32 {
        if from == to {
            return 0;
        }
        self.get(to).map(|s| s.reconfigure_seconds).unwrap_or(0)
    }
}

fn spec(
    speed_multiplier: f32,
    reconfigure_seconds: u32,
    position_bonuses: PositionBonuses,
    tags: &[&str],
) -> FormationSpec {
    FormationSpec {
        speed_multiplier,
        reconfigure_seconds,
        position_bonuses,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

impl Default for FormationCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();

        catalog.insert(
            FormationType::Line,
            spec(
                1.0,
                10,
                PerPosition::new(
                    Some(StatModifiers::armor(0.10)),
                    None,
                    Some(StatModifiers::accuracy(0.05)),
                    None,
                ),
                &["balanced"],
            ),
        );

        // Uniform armor, slow to move
        catalog.insert(
            FormationType::Box,
            spec(
                0.85,
                15,
                PerPosition::splat(Some(StatModifiers::armor(0.05))),
                &["defensive"],
            ),
        );

        catalog.insert(
            FormationType::Vanguard,
            spec(
                1.1,
                12,
                PerPosition::new(
                    Some(StatModifiers::damage(0.15).with_armor(-0.05)),
                    None,
                    None,
                    None,
                ),
                &["aggressive", "breakthrough"],
            ),
        );

        catalog.insert(
            FormationType::Skirmish,
            spec(
                1.2,
                8,
                PerPosition::new(
                    Some(StatModifiers::armor(-0.10)),
                    Some(StatModifiers::evasion(0.15).with_damage(0.05)),
                    None,
                    None,
                ),
                &["mobile", "harass"],
            ),
        );

        catalog.insert(
            FormationType::Echelon,
            spec(
                1.05,
                10,
                PerPosition::new(
                    None,
                    Some(StatModifiers::damage(0.10)),
                    Some(StatModifiers::accuracy(0.10)),
                    None,
                ),
                &["flanking"],
            ),
        );

        catalog.insert(
            FormationType::Phalanx,
            spec(
                0.8,
                18,
                PerPosition::new(
                    Some(StatModifiers::armor(0.25)),
                    Some(StatModifiers::armor(-0.10)),
                    None,
                    None,
                ),
                &["defensive", "anchor"],
            ),
        );

        catalog.insert(
            FormationType::Swarm,
            spec(
                1.25,
                6,
                PerPosition::new(
                    Some(StatModifiers::evasion(0.10)),
                    None,
                    None,
                    Some(StatModifiers::damage(0.10)),
                ),
                &["mobile", "saturation"],
            ),
        );

        catalog
    }
}
