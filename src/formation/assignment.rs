//! Slot assignment: placing a stack's buckets into formation positions
//!
//! Buckets are visited in a fixed order (hull class by name, then bucket
//! index). Each goes to its preferred position while that position has
//! room; otherwise the overflow resolver picks an alternative:
//!
//! 1. most assignments of the same hull class already there, dead
//!    groups included
//! 2. closest per-ship HP among the live same-class assignments
//!    (a position with none ranks last on this key)
//! 3. most remaining capacity
//! 4. scan order of `FormationPosition::ALL`
//!
//! A bucket that fits nowhere is dropped without error.

use crate::core::config::catalog;
use crate::core::types::{ShipStack, ShipType};
use crate::formation::capacity::CapacityProvider;
use crate::formation::catalog::FormationCatalog;
use crate::formation::position::{determine_layer, determine_optimal_position};
use crate::formation::types::{Formation, FormationAssignment, FormationPosition, FormationType};
use ahash::AHashMap;
use std::cmp::Reverse;

/// Distance from a bucket's per-ship HP to the nearest same-class neighbour
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum HpGap {
    Closest(u64),
    /// No live same-class assignment to compare against
    NoMatch,
}

/// A bucket already holding a slot
///
/// Dead groups (count 0) have no per-ship HP to compare against but still
/// count as same-class neighbours.
#[derive(Debug, Clone, Copy)]
struct PlacedBucket {
    position: FormationPosition,
    ship_type: ShipType,
    per_ship_hp: Option<u64>,
}

/// Places buckets under hard per-position capacity limits
pub struct SlotAssigner<'a, C: CapacityProvider + ?Sized> {
    capacity: &'a C,
    formations: &'a FormationCatalog,
}

impl<'a, C: CapacityProvider + ?Sized> SlotAssigner<'a, C> {
    pub fn new(capacity: &'a C, formations: &'a FormationCatalog) -> Self {
        Self {
            capacity,
            formations,
        }
    }

    /// Arrange a stack into a fresh formation
    pub fn assign(&self, stack: &ShipStack, formation_type: FormationType) -> Formation {
        let mut formation = Formation::new(formation_type);
        formation.modifiers = self.formations.position_bonuses(formation_type);
        self.extend(&mut formation, stack);
        formation
    }

    /// Place a stack's buckets into an existing formation
    ///
    /// Existing assignments count against capacity and take part in the
    /// overflow tie-breaks, dead ones included. Nothing already placed is
    /// moved. Returns the number of buckets placed.
    pub fn extend(&self, formation: &mut Formation, stack: &ShipStack) -> usize {
        let formation_type = formation.formation_type;

        let mut occupancy: AHashMap<FormationPosition, u32> = AHashMap::new();
        let mut placed: Vec<PlacedBucket> = Vec::new();
        for existing in &formation.assignments {
            *occupancy.entry(existing.position).or_insert(0) += 1;
            placed.push(PlacedBucket {
                position: existing.position,
                ship_type: existing.ship_type,
                per_ship_hp: (existing.count > 0)
                    .then(|| existing.assigned_hp / existing.count as u64),
            });
        }

        let before = formation.assignments.len();
        for (ship_type, bucket_index, bucket) in stack.iter() {
            if bucket.is_empty() {
                continue;
            }

            let preferred = determine_optimal_position(ship_type, formation_type);
            let position = if self.remaining(formation_type, preferred, &occupancy) > 0 {
                preferred
            } else {
                match self.resolve_overflow(
                    formation_type,
                    ship_type,
                    bucket.per_ship_hp,
                    &occupancy,
                    &placed,
                ) {
                    Some(fallback) => {
                        tracing::debug!(
                            "{} bucket {} overflowed {} -> {} in {}",
                            ship_type,
                            bucket_index,
                            preferred,
                            fallback,
                            formation_type
                        );
                        fallback
                    }
                    None => {
                        tracing::debug!(
                            "{} bucket {} dropped: {} has no free slots",
                            ship_type,
                            bucket_index,
                            formation_type
                        );
                        continue;
                    }
                }
            };

            *occupancy.entry(position).or_insert(0) += 1;
            placed.push(PlacedBucket {
                position,
                ship_type,
                per_ship_hp: Some(bucket.per_ship_hp),
            });
            formation.assignments.push(FormationAssignment {
                position,
                layer: determine_layer(position),
                ship_type,
                bucket_index,
                count: bucket.count,
                assigned_hp: bucket.total_hp(),
            });
        }

        formation.assignments.len() - before
    }

    fn remaining(
        &self,
        formation_type: FormationType,
        position: FormationPosition,
        occupancy: &AHashMap<FormationPosition, u32>,
    ) -> u32 {
        let used = occupancy.get(&position).copied().unwrap_or(0);
        self.capacity
            .max_slots(formation_type, position)
            .saturating_sub(used)
    }

    /// Best alternative position with spare capacity, if any
    fn resolve_overflow(
        &self,
        formation_type: FormationType,
        ship_type: ShipType,
        per_ship_hp: u64,
        occupancy: &AHashMap<FormationPosition, u32>,
        placed: &[PlacedBucket],
    ) -> Option<FormationPosition> {
        FormationPosition::ALL
            .into_iter()
            .filter_map(|position| {
                let remaining = self.remaining(formation_type, position, occupancy);
                if remaining == 0 {
                    return None;
                }

                let same_type = placed
                    .iter()
                    .filter(|p| p.position == position && p.ship_type == ship_type);
                let same_count = same_type.clone().count();
                let gap = same_type
                    .filter_map(|p| p.per_ship_hp)
                    .map(|hp| hp.abs_diff(per_ship_hp))
                    .min()
                    .map(HpGap::Closest)
                    .unwrap_or(HpGap::NoMatch);

                Some((position, (Reverse(same_count), gap, Reverse(remaining))))
            })
            .min_by_key(|(_, key)| *key)
            .map(|(position, _)| position)
    }
}

/// Arrange a stack using the global catalog
pub fn assign_formation(stack: &ShipStack, formation_type: FormationType) -> Formation {
    let catalog = catalog();
    SlotAssigner::new(&catalog.capacity, &catalog.formations).assign(stack, formation_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formation::capacity::CapacityTable;
    use crate::formation::types::PerPosition;

    fn fixed_capacity(row: PerPosition<u32>) -> impl Fn(FormationType, FormationPosition) -> u32 {
        move |_, position| row.get(position).copied().unwrap_or(0)
    }

    fn fighter_at(position: FormationPosition, per_ship_hp: u64) -> FormationAssignment {
        FormationAssignment {
            position,
            layer: determine_layer(position),
            ship_type: ShipType::Fighter,
            bucket_index: 0,
            count: 1,
            assigned_hp: per_ship_hp,
        }
    }

    #[test]
    fn test_preferred_positions_used_when_free() {
        let stack = ShipStack::new()
            .with_bucket(ShipType::Fighter, 20, 5)
            .with_bucket(ShipType::Bomber, 50, 2)
            .with_bucket(ShipType::Drone, 5, 10);

        let formation = assign_formation(&stack, FormationType::Line);

        assert_eq!(formation.assignments.len(), 3);
        // Bomber < Drone < Fighter by name
        assert_eq!(formation.assignments[0].ship_type, ShipType::Bomber);
        assert_eq!(formation.assignments[0].position, FormationPosition::Back);
        assert_eq!(formation.assignments[0].layer, 2);
        assert_eq!(formation.assignments[1].position, FormationPosition::Support);
        assert_eq!(formation.assignments[2].position, FormationPosition::Front);
        assert_eq!(formation.assignments[2].assigned_hp, 100);
        assert_eq!(formation.version, 1);
    }

    #[test]
    fn test_empty_buckets_skipped() {
        let stack = ShipStack::new()
            .with_bucket(ShipType::Fighter, 0, 5)
            .with_bucket(ShipType::Fighter, 20, 0)
            .with_bucket(ShipType::Fighter, 20, 1);

        let formation = assign_formation(&stack, FormationType::Line);
        assert_eq!(formation.assignments.len(), 1);
        assert_eq!(formation.assignments[0].bucket_index, 2);
    }

    #[test]
    fn test_overflow_follows_same_type() {
        // Front holds one. The second fighter has no same-type neighbour
        // anywhere, so it takes the roomiest position; the third follows it.
        let capacity = fixed_capacity(PerPosition::new(1, 2, 5, 3));
        let formations = FormationCatalog::default();
        let assigner = SlotAssigner::new(&capacity, &formations);

        let stack = ShipStack::new()
            .with_bucket(ShipType::Fighter, 20, 1)
            .with_bucket(ShipType::Fighter, 20, 1)
            .with_bucket(ShipType::Fighter, 20, 1);

        let formation = assigner.assign(&stack, FormationType::Line);
        let positions: Vec<_> = formation.assignments.iter().map(|a| a.position).collect();
        assert_eq!(
            positions,
            vec![
                FormationPosition::Front,
                FormationPosition::Back,
                FormationPosition::Back,
            ]
        );
    }

    #[test]
    fn test_full_tie_uses_scan_order() {
        let capacity = fixed_capacity(PerPosition::new(2, 2, 2, 2));
        let formations = FormationCatalog::default();
        let assigner = SlotAssigner::new(&capacity, &formations);

        let stack = ShipStack::new()
            .with_bucket(ShipType::Fighter, 100, 1)
            .with_bucket(ShipType::Fighter, 40, 1)
            .with_bucket(ShipType::Fighter, 100, 1)
            .with_bucket(ShipType::Fighter, 45, 1);

        let formation = assigner.assign(&stack, FormationType::Line);
        assert_eq!(formation.assignments[2].position, FormationPosition::Flank);
        assert_eq!(formation.assignments[3].position, FormationPosition::Flank);
    }

    #[test]
    fn test_closest_hp_wins_when_counts_match() {
        let capacity = fixed_capacity(PerPosition::new(1, 3, 3, 0));
        let formations = FormationCatalog::default();
        let assigner = SlotAssigner::new(&capacity, &formations);

        let mut formation = Formation::new(FormationType::Line);
        formation.assignments.push(fighter_at(FormationPosition::Front, 500));
        formation.assignments.push(fighter_at(FormationPosition::Flank, 100));
        formation.assignments.push(fighter_at(FormationPosition::Back, 280));

        let reinforcements = ShipStack::new().with_bucket(ShipType::Fighter, 300, 1);
        assert_eq!(assigner.extend(&mut formation, &reinforcements), 1);
        assert_eq!(formation.assignments[3].position, FormationPosition::Back);
    }

    #[test]
    fn test_distant_same_type_beats_roomier_position() {
        let capacity = fixed_capacity(PerPosition::new(1, 1, 8, 0));
        let formations = FormationCatalog::default();
        let assigner = SlotAssigner::new(&capacity, &formations);

        let mut occupancy = AHashMap::new();
        occupancy.insert(FormationPosition::Front, 1);
        occupancy.insert(FormationPosition::Back, 1);
        let placed = [
            PlacedBucket {
                position: FormationPosition::Flank,
                ship_type: ShipType::Fighter,
                per_ship_hp: Some(9_000),
            },
            PlacedBucket {
                position: FormationPosition::Back,
                ship_type: ShipType::Cruiser,
                per_ship_hp: Some(50),
            },
        ];

        let chosen = assigner.resolve_overflow(
            FormationType::Line,
            ShipType::Fighter,
            50,
            &occupancy,
            &placed,
        );
        assert_eq!(chosen, Some(FormationPosition::Flank));
    }

    #[test]
    fn test_remaining_capacity_breaks_final_tie() {
        let capacity = fixed_capacity(PerPosition::new(0, 2, 4, 3));
        let formations = FormationCatalog::default();
        let assigner = SlotAssigner::new(&capacity, &formations);

        let stack = ShipStack::new().with_bucket(ShipType::Cruiser, 80, 2);
        let formation = assigner.assign(&stack, FormationType::Line);
        assert_eq!(formation.assignments[0].position, FormationPosition::Back);
    }

    #[test]
    fn test_bucket_dropped_when_all_full() {
        let capacity = fixed_capacity(PerPosition::new(1, 0, 0, 0));
        let formations = FormationCatalog::default();
        let assigner = SlotAssigner::new(&capacity, &formations);

        let stack = ShipStack::new()
            .with_bucket(ShipType::Fighter, 20, 1)
            .with_bucket(ShipType::Scout, 10, 1);

        let formation = assigner.assign(&stack, FormationType::Line);
        assert_eq!(formation.assignments.len(), 1);
        assert_eq!(formation.unplaced_buckets(&stack), 1);
    }

    #[test]
    fn test_extend_saturated_formation_places_nothing() {
        let capacity = fixed_capacity(PerPosition::new(1, 1, 1, 1));
        let formations = FormationCatalog::default();
        let assigner = SlotAssigner::new(&capacity, &formations);

        let mut formation = Formation::new(FormationType::Box);
        for position in FormationPosition::ALL {
            formation.assignments.push(fighter_at(position, 30));
        }
        let before = formation.clone();

        let extra = ShipStack::new().with_bucket(ShipType::Scout, 10, 4);
        assert_eq!(assigner.extend(&mut formation, &extra), 0);
        assert_eq!(formation, before);
    }

    #[test]
    fn test_dead_assignments_still_hold_slots() {
        let capacity = fixed_capacity(PerPosition::new(1, 0, 0, 0));
        let formations = FormationCatalog::default();
        let assigner = SlotAssigner::new(&capacity, &formations);

        let mut formation = Formation::new(FormationType::Line);
        formation.assignments.push(FormationAssignment {
            count: 0,
            assigned_hp: 0,
            ..fighter_at(FormationPosition::Front, 0)
        });

        let extra = ShipStack::new().with_bucket(ShipType::Fighter, 10, 1);
        assert_eq!(assigner.extend(&mut formation, &extra), 0);
    }

    #[test]
    fn test_dead_same_type_group_attracts_overflow() {
        let capacity = fixed_capacity(PerPosition::new(1, 3, 2, 0));
        let formations = FormationCatalog::default();
        let assigner = SlotAssigner::new(&capacity, &formations);

        let mut formation = Formation::new(FormationType::Line);
        formation.assignments.push(fighter_at(FormationPosition::Front, 40));
        formation.assignments.push(FormationAssignment {
            count: 0,
            assigned_hp: 0,
            ..fighter_at(FormationPosition::Back, 0)
        });

        // Flank is roomier, but Back already holds a fighter group
        let extra = ShipStack::new().with_bucket(ShipType::Fighter, 20, 1);
        assert_eq!(assigner.extend(&mut formation, &extra), 1);
        assert_eq!(formation.assignments[2].position, FormationPosition::Back);
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let table = CapacityTable::default();
        let formations = FormationCatalog::default();
        let assigner = SlotAssigner::new(&table, &formations);

        let mut stack = ShipStack::new();
        for i in 0..80 {
            stack = stack.with_bucket(ShipType::Fighter, 10 + i, 1);
        }

        for formation_type in FormationType::ALL {
            let formation = assigner.assign(&stack, formation_type);
            for position in FormationPosition::ALL {
                assert!(
                    formation.occupancy(position) as u32
                        <= table.max_slots(formation_type, position)
                );
            }
            assert_eq!(
                formation.assignments.len() as u32,
                table.total_slots(formation_type).min(80)
            );
        }
    }

    #[test]
    fn test_modifiers_copied_from_catalog() {
        let stack = ShipStack::new().with_bucket(ShipType::Fighter, 20, 1);
        let formation = assign_formation(&stack, FormationType::Phalanx);
        assert_eq!(
            formation.modifiers,
            FormationCatalog::default().position_bonuses(FormationType::Phalanx)
        );
    }

    #[test]
    fn test_unknown_formation_places_nothing() {
        let stack = ShipStack::new().with_bucket(ShipType::Fighter, 20, 1);
        let formation = assign_formation(&stack, FormationType::Unknown);
        assert!(formation.assignments.is_empty());
    }
}
