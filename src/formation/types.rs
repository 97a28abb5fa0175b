//! Formation, position and assignment types
//!
//! Every enum here carries an `Unknown` variant that absorbs names this build
//! does not recognize. Lookups against `Unknown` always fall back to a
//! documented default instead of failing.

use crate::core::types::{ShipStack, ShipType};
use crate::combat::modifiers::StatModifiers;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Geometric formation a stack can adopt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FormationType {
    Line,
    Box,
    Vanguard,
    Skirmish,
    Echelon,
    Phalanx,
    Swarm,
    #[serde(other)]
    Unknown,
}

impl FormationType {
    pub const ALL: [FormationType; 7] = [
        FormationType::Line,
        FormationType::Box,
        FormationType::Vanguard,
        FormationType::Skirmish,
        FormationType::Echelon,
        FormationType::Phalanx,
        FormationType::Swarm,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FormationType::Line => "Line",
            FormationType::Box => "Box",
            FormationType::Vanguard => "Vanguard",
            FormationType::Skirmish => "Skirmish",
            FormationType::Echelon => "Echelon",
            FormationType::Phalanx => "Phalanx",
            FormationType::Swarm => "Swarm",
            FormationType::Unknown => "Unknown",
        }
    }

    /// Case-insensitive lookup; unrecognized names map to `Unknown`
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
            .unwrap_or(FormationType::Unknown)
    }
}

impl std::fmt::Display for FormationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Tactical role a bucket occupies within a formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FormationPosition {
    Front,
    Flank,
    Back,
    Support,
    #[serde(other)]
    Unknown,
}

impl FormationPosition {
    /// Fixed scan order used by the assigner and the distributor
    pub const ALL: [FormationPosition; 4] = [
        FormationPosition::Front,
        FormationPosition::Flank,
        FormationPosition::Back,
        FormationPosition::Support,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FormationPosition::Front => "Front",
            FormationPosition::Flank => "Flank",
            FormationPosition::Back => "Back",
            FormationPosition::Support => "Support",
            FormationPosition::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for FormationPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// Direction an attack arrives from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttackDirection {
    Frontal,
    Flanking,
    Rear,
    Envelopment,
    #[serde(other)]
    Unknown,
}

impl AttackDirection {
    pub const ALL: [AttackDirection; 4] = [
        AttackDirection::Frontal,
        AttackDirection::Flanking,
        AttackDirection::Rear,
        AttackDirection::Envelopment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AttackDirection::Frontal => "Frontal",
            AttackDirection::Flanking => "Flanking",
            AttackDirection::Rear => "Rear",
            AttackDirection::Envelopment => "Envelopment",
            AttackDirection::Unknown => "Unknown",
        }
    }

    /// Case-insensitive lookup; unrecognized names map to `Unknown`
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
            .unwrap_or(AttackDirection::Unknown)
    }
}

/// One value per tactical position
///
/// Used for capacity rows, directional weight rows and bonus tables. Lookups
/// for `FormationPosition::Unknown` return `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerPosition<T> {
    #[serde(default)]
    pub front: T,
    #[serde(default)]
    pub flank: T,
    #[serde(default)]
    pub back: T,
    #[serde(default)]
    pub support: T,
}

impl<T> PerPosition<T> {
    pub fn new(front: T, flank: T, back: T, support: T) -> Self {
        Self {
            front,
            flank,
            back,
            support,
        }
    }

    pub fn get(&self, position: FormationPosition) -> Option<&T> {
        match position {
            FormationPosition::Front => Some(&self.front),
            FormationPosition::Flank => Some(&self.flank),
            FormationPosition::Back => Some(&self.back),
            FormationPosition::Support => Some(&self.support),
            FormationPosition::Unknown => None,
        }
    }

    /// Entries in `FormationPosition::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = (FormationPosition, &T)> + '_ {
        FormationPosition::ALL
            .into_iter()
            .filter_map(move |p| self.get(p).map(|v| (p, v)))
    }
}

impl<T: Copy + Default> PerPosition<T> {
    pub fn splat(value: T) -> Self {
        Self::new(value, value, value, value)
    }
}

/// Per-position stat bonuses of a formation; `None` means no bonus entry
pub type PositionBonuses = PerPosition<Option<StatModifiers>>;

/// A bucket placed at a tactical position
///
/// `assigned_hp` starts as `per_ship_hp * count` and afterwards tracks the
/// group's current aggregate hit points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormationAssignment {
    pub position: FormationPosition,
    /// Presentation row (0 = front line); not used by damage math
    pub layer: u8,
    pub ship_type: ShipType,
    pub bucket_index: usize,
    pub count: u32,
    #[serde(rename = "assignedHP")]
    pub assigned_hp: u64,
}

impl FormationAssignment {
    /// Counts toward its position being "filled"
    pub fn is_filled(&self) -> bool {
        self.count > 0 && self.assigned_hp > 0
    }
}

/// A stack arranged into a formation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formation {
    pub formation_type: FormationType,
    /// Heading in degrees
    #[serde(default)]
    pub facing: f32,
    #[serde(default)]
    pub assignments: Vec<FormationAssignment>,
    #[serde(default)]
    pub modifiers: PositionBonuses,
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    1
}

impl Formation {
    /// Empty formation of the given type
    pub fn new(formation_type: FormationType) -> Self {
        Self {
            formation_type,
            facing: 0.0,
            assignments: Vec::new(),
            modifiers: PositionBonuses::default(),
            version: default_version(),
        }
    }

    pub fn with_facing(mut self, facing: f32) -> Self {
        self.facing = facing;
        self
    }

    /// Assignments holding a position, in assignment order
    pub fn assignments_in(
        &self,
        position: FormationPosition,
    ) -> impl Iterator<Item = &FormationAssignment> + '_ {
        self.assignments.iter().filter(move |a| a.position == position)
    }

    /// Number of assignments holding a position, filled or not
    pub fn occupancy(&self, position: FormationPosition) -> usize {
        self.assignments_in(position).count()
    }

    /// Positions holding at least one live assignment
    pub fn filled_positions(&self) -> BTreeSet<FormationPosition> {
        self.assignments
            .iter()
            .filter(|a| a.is_filled())
            .map(|a| a.position)
            .collect()
    }

    pub fn total_hp(&self) -> u64 {
        self.assignments.iter().map(|a| a.assigned_hp).sum()
    }

    /// Non-empty buckets of `stack` that have no assignment here
    pub fn unplaced_buckets(&self, stack: &ShipStack) -> usize {
        stack
            .iter()
            .filter(|(_, _, bucket)| !bucket.is_empty())
            .filter(|(ship_type, index, _)| {
                !self
                    .assignments
                    .iter()
                    .any(|a| a.ship_type == *ship_type && a.bucket_index == *index)
            })
            .count()
    }
}
