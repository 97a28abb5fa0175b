//! Per-position slot capacity
//!
//! `CapacityTable` is the single source of truth for how many assignments a
//! position can hold. Anything that needs the limit goes through
//! `CapacityProvider`.

use crate::formation::types::{FormationPosition, FormationType, PerPosition};
use std::collections::BTreeMap;

/// Maximum number of assignments a position can hold
pub trait CapacityProvider {
    fn max_slots(&self, formation_type: FormationType, position: FormationPosition) -> u32;
}

impl<F> CapacityProvider for F
where
    F: Fn(FormationType, FormationPosition) -> u32,
{
    fn max_slots(&self, formation_type: FormationType, position: FormationPosition) -> u32 {
        self(formation_type, position)
    }
}

/// Fixed capacity rows per formation type
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityTable {
    rows: BTreeMap<FormationType, PerPosition<u32>>,
}

impl CapacityTable {
    pub fn empty() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    pub fn set_row(&mut self, formation_type: FormationType, row: PerPosition<u32>) {
        if formation_type != FormationType::Unknown {
            self.rows.insert(formation_type, row);
        }
    }

    pub fn row(&self, formation_type: FormationType) -> Option<&PerPosition<u32>> {
        self.rows.get(&formation_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormationType, &PerPosition<u32>)> + '_ {
        self.rows.iter().map(|(t, r)| (*t, r))
    }

    /// Total assignments a formation can hold across all positions
    pub fn total_slots(&self, formation_type: FormationType) -> u32 {
        self.row(formation_type)
            .map(|r| r.iter().map(|(_, v)| *v).sum())
            .unwrap_or(0)
    }
}

impl CapacityProvider for CapacityTable {
    /// Unlisted formations and unknown positions hold nothing
    fn max_slots(&self, formation_type: FormationType, position: FormationPosition) -> u32 {
        self.row(formation_type)
            .and_then(|r| r.get(position))
            .copied()
            .unwrap_or(0)
    }
}

impl Default for CapacityTable {
    fn default() -> Self {
        let mut table = Self::empty();
        //                                                  front flank back support
        table.set_row(FormationType::Line, PerPosition::new(20, 10, 12, 8));
        table.set_row(FormationType::Box, PerPosition::new(15, 12, 15, 10));
        table.set_row(FormationType::Vanguard, PerPosition::new(25, 8, 8, 6));
        table.set_row(FormationType::Skirmish, PerPosition::new(8, 20, 8, 10));
        table.set_row(FormationType::Echelon, PerPosition::new(14, 16, 10, 8));
        table.set_row(FormationType::Phalanx, PerPosition::new(24, 6, 12, 8));
        table.set_row(FormationType::Swarm, PerPosition::new(16, 16, 6, 16));
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacities_in_design_range() {
        let table = CapacityTable::default();
        for formation in FormationType::ALL {
            for position in FormationPosition::ALL {
                let slots = table.max_slots(formation, position);
                assert!((6..=25).contains(&slots), "{} {} = {}", formation, position, slots);
            }
        }
    }

    #[test]
    fn test_unknown_lookups_have_no_capacity() {
        let table = CapacityTable::default();
        assert_eq!(table.max_slots(FormationType::Unknown, FormationPosition::Front), 0);
        assert_eq!(table.max_slots(FormationType::Line, FormationPosition::Unknown), 0);
    }

    #[test]
    fn test_closure_provider() {
        let provider = |_: FormationType, position: FormationPosition| -> u32 {
            match position {
                FormationPosition::Front => 1,
                _ => 0,
            }
        };
        assert_eq!(provider.max_slots(FormationType::Box, FormationPosition::Front), 1);
        assert_eq!(provider.max_slots(FormationType::Box, FormationPosition::Back), 0);
    }

    #[test]
    fn test_total_slots() {
        let table = CapacityTable::default();
        assert_eq!(table.total_slots(FormationType::Line), 50);
        assert_eq!(table.total_slots(FormationType::Unknown), 0);
    }
}
