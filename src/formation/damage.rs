//! Directional damage distribution
//!
//! An attack's damage is split across occupied positions by the direction's
//! weight row, renormalized over the positions that are actually filled.
//! Each position's share is then split across its assignments by current HP.
//!
//! Weights are converted to fixed-point integers before splitting, so
//! shares are computed exactly and a lone filled position receives the
//! whole attack. Both steps floor each share independently. The floored
//! remainder is discarded, never pushed onto another entry: with `n`
//! recipients up to `n - 1` points can be lost.

use crate::core::config::catalog;
use crate::formation::types::{
    AttackDirection, Formation, FormationAssignment, FormationPosition, PerPosition,
};
use std::collections::BTreeMap;

/// Weight rows per attack direction
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalWeights {
    rows: BTreeMap<AttackDirection, PerPosition<f64>>,
}

impl DirectionalWeights {
    pub fn empty() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    pub fn set_row(&mut self, direction: AttackDirection, row: PerPosition<f64>) {
        if direction != AttackDirection::Unknown {
            self.rows.insert(direction, row);
        }
    }

    /// Weight row for a direction; unlisted directions use the frontal row
    pub fn row(&self, direction: AttackDirection) -> Option<&PerPosition<f64>> {
        self.rows
            .get(&direction)
            .or_else(|| self.rows.get(&AttackDirection::Frontal))
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttackDirection, &PerPosition<f64>)> + '_ {
        self.rows.iter().map(|(d, r)| (*d, r))
    }
}

impl Default for DirectionalWeights {
    fn default() -> Self {
        let mut weights = Self::empty();
        //                                                              front flank back support
        weights.set_row(AttackDirection::Frontal, PerPosition::new(0.6, 0.2, 0.1, 0.1));
        weights.set_row(AttackDirection::Flanking, PerPosition::new(0.2, 0.5, 0.15, 0.15));
        weights.set_row(AttackDirection::Rear, PerPosition::new(0.1, 0.15, 0.5, 0.25));
        weights.set_row(AttackDirection::Envelopment, PerPosition::splat(0.25));
        weights
    }
}

/// Fixed-point scale for direction weights
pub const WEIGHT_SCALE: f64 = 1e9;

/// Largest raw weight honoured; keeps the u128 products in range
const MAX_RAW_WEIGHT: f64 = 1e6;

/// A weight as an exact integer; negative and NaN weights count as zero
fn weight_units(weight: f64) -> u128 {
    (weight.clamp(0.0, MAX_RAW_WEIGHT) * WEIGHT_SCALE).round() as u128
}

/// Turns an attack into per-position damage
pub struct DamageDistributor<'a> {
    weights: &'a DirectionalWeights,
}

impl<'a> DamageDistributor<'a> {
    pub fn new(weights: &'a DirectionalWeights) -> Self {
        Self { weights }
    }

    /// Damage landing on each filled position
    ///
    /// Returns an empty map when nothing is filled. Positions whose share
    /// floors to zero are omitted.
    pub fn distribute(
        &self,
        formation: &Formation,
        incoming_damage: u64,
        direction: AttackDirection,
    ) -> BTreeMap<FormationPosition, u64> {
        let mut damage = BTreeMap::new();

        let filled = formation.filled_positions();
        if filled.is_empty() {
            return damage;
        }

        let row = self.weights.row(direction);
        let weight_of = |position: FormationPosition| -> u128 {
            row.and_then(|r| r.get(position))
                .copied()
                .map(weight_units)
                .unwrap_or(0)
        };

        let total_filled_weight: u128 = filled.iter().map(|p| weight_of(*p)).sum();

        if total_filled_weight == 0 {
            let share = incoming_damage / filled.len() as u64;
            if share > 0 {
                for position in &filled {
                    damage.insert(*position, share);
                }
            }
            return damage;
        }

        for position in &filled {
            let share =
                (incoming_damage as u128 * weight_of(*position) / total_filled_weight) as u64;
            if share > 0 {
                damage.insert(*position, share);
            }
        }

        tracing::trace!(
            "{:?} attack of {} split as {:?}",
            direction,
            incoming_damage,
            damage
        );

        damage
    }
}

/// Split a position's damage across its assignments by current HP
///
/// Output is aligned with `assignments`. Zero total HP gives every
/// assignment zero.
pub fn apportion(position_damage: u64, assignments: &[&FormationAssignment]) -> Vec<u64> {
    let total_weight: u128 = assignments.iter().map(|a| a.assigned_hp as u128).sum();
    if total_weight == 0 {
        return vec![0; assignments.len()];
    }

    assignments
        .iter()
        .map(|a| (position_damage as u128 * a.assigned_hp as u128 / total_weight) as u64)
        .collect()
}

/// Distribute using the global catalog's weights
pub fn distribute_damage(
    formation: &Formation,
    incoming_damage: u64,
    direction: AttackDirection,
) -> BTreeMap<FormationPosition, u64> {
    DamageDistributor::new(&catalog().weights).distribute(formation, incoming_damage, direction)
}
