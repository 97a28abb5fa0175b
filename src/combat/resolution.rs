//! Resolving an incoming attack against a formation
//!
//! Composes distribution and apportionment into a per-assignment report,
//! and applies a report to a formation's current hit points.

use crate::core::types::{ShipStack, ShipType};
use crate::formation::counter::CounterMatrix;
use crate::formation::damage::{apportion, DamageDistributor};
use crate::formation::types::{
    AttackDirection, Formation, FormationAssignment, FormationPosition, FormationType,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Damage landing on one assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DamageRow {
    /// Index into `Formation::assignments`
    pub assignment: usize,
    pub position: FormationPosition,
    pub ship_type: ShipType,
    pub damage: u64,
}

/// Outcome of splitting one attack across a formation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DamageReport {
    pub incoming: u64,
    /// Damage per position after distribution
    pub by_position: BTreeMap<FormationPosition, u64>,
    /// Per-assignment rows, in assignment order
    pub rows: Vec<DamageRow>,
    /// Sum of all rows
    pub distributed: u64,
    /// Floor losses from both splitting steps, plus damage with no target
    pub lost_to_rounding: u64,
}

impl DamageReport {
    pub fn damage_to(&self, assignment: usize) -> u64 {
        self.rows
            .iter()
            .find(|r| r.assignment == assignment)
            .map(|r| r.damage)
            .unwrap_or(0)
    }
}

/// Split an attack down to individual assignments without mutating anything
pub fn resolve_incoming(
    distributor: &DamageDistributor<'_>,
    formation: &Formation,
    incoming_damage: u64,
    direction: AttackDirection,
) -> DamageReport {
    let by_position = distributor.distribute(formation, incoming_damage, direction);

    let mut rows = Vec::new();
    for (position, position_damage) in &by_position {
        let (indices, members): (Vec<usize>, Vec<&FormationAssignment>) = formation
            .assignments
            .iter()
            .enumerate()
            .filter(|(_, a)| a.position == *position)
            .unzip();

        let shares = apportion(*position_damage, &members);
        for ((index, member), damage) in indices.into_iter().zip(members).zip(shares) {
            if damage > 0 {
                rows.push(DamageRow {
                    assignment: index,
                    position: *position,
                    ship_type: member.ship_type,
                    damage,
                });
            }
        }
    }
    rows.sort_by_key(|r| r.assignment);

    let distributed: u64 = rows.iter().map(|r| r.damage).sum();
    DamageReport {
        incoming: incoming_damage,
        by_position,
        rows,
        distributed,
        lost_to_rounding: incoming_damage.saturating_sub(distributed),
    }
}

/// Subtract a report's damage from the formation's current hit points
///
/// With the source stack available, each assignment's ship count drops to
/// the number of hulls its remaining HP can still cover. Counts never rise
/// and assignments are never removed.
pub fn apply_damage(formation: &mut Formation, report: &DamageReport, stack: Option<&ShipStack>) {
    for row in &report.rows {
        let Some(assignment) = formation.assignments.get_mut(row.assignment) else {
            continue;
        };

        assignment.assigned_hp = assignment.assigned_hp.saturating_sub(row.damage);

        let per_ship_hp = stack
            .and_then(|s| s.bucket(assignment.ship_type, assignment.bucket_index))
            .map(|b| b.per_ship_hp)
            .filter(|hp| *hp > 0);
        if let Some(per_ship_hp) = per_ship_hp {
            let survivors = assignment.assigned_hp.div_ceil(per_ship_hp);
            assignment.count = assignment.count.min(survivors.min(u32::MAX as u64) as u32);
        } else if assignment.assigned_hp == 0 {
            assignment.count = 0;
        }
    }
}

/// Fold per-assignment damage into one total per hull class
pub fn apportion_by_ship_type(
    position_damage: u64,
    assignments: &[&FormationAssignment],
) -> BTreeMap<ShipType, u64> {
    let mut totals = BTreeMap::new();
    for (assignment, damage) in assignments.iter().zip(apportion(position_damage, assignments)) {
        *totals.entry(assignment.ship_type).or_insert(0) += damage;
    }
    totals
}

/// Scale raw damage by the attacker-vs-defender counter multiplier
pub fn counter_adjusted_damage(
    counters: &CounterMatrix,
    base_damage: u64,
    attacker: FormationType,
    defender: FormationType,
) -> u64 {
    (base_damage as f64 * counters.multiplier(attacker, defender)).floor() as u64
}
