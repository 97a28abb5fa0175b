//! Formation-vs-formation counter multipliers
//!
//! Rows are attackers, columns defenders. The table is deliberately
//! asymmetric: Vanguard punishing Line says nothing about Line attacking
//! Vanguard. Only non-neutral entries are stored; everything else is 1.0.

use crate::core::config::catalog;
use crate::formation::types::FormationType;
use std::collections::BTreeMap;

pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CounterMatrix {
    entries: BTreeMap<FormationType, BTreeMap<FormationType, f64>>,
}

impl CounterMatrix {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, attacker: FormationType, defender: FormationType, multiplier: f64) {
        if attacker == FormationType::Unknown || defender == FormationType::Unknown {
            return;
        }
        self.entries
            .entry(attacker)
            .or_default()
            .insert(defender, multiplier);
    }

    /// Damage multiplier for an attacker formation hitting a defender formation
    pub fn multiplier(&self, attacker: FormationType, defender: FormationType) -> f64 {
        self.entries
            .get(&attacker)
            .and_then(|row| row.get(&defender))
            .copied()
            .unwrap_or(NEUTRAL_MULTIPLIER)
    }

    /// Stored (non-default) entries in attacker, defender order
    pub fn iter(&self) -> impl Iterator<Item = (FormationType, FormationType, f64)> + '_ {
        self.entries.iter().flat_map(|(attacker, row)| {
            row.iter()
                .map(move |(defender, multiplier)| (*attacker, *defender, *multiplier))
        })
    }
}

impl Default for CounterMatrix {
    fn default() -> Self {
        use FormationType::*;

        let mut matrix = Self::empty();
        for (attacker, defender, multiplier) in [
            (Line, Skirmish, 1.10),
            (Line, Swarm, 1.15),
            (Line, Vanguard, 0.90),
            (Box, Swarm, 1.10),
            (Box, Echelon, 1.15),
            (Box, Vanguard, 1.05),
            (Vanguard, Line, 1.25),
            (Vanguard, Skirmish, 1.10),
            (Vanguard, Phalanx, 0.75),
            (Skirmish, Phalanx, 1.20),
            (Skirmish, Box, 1.10),
            (Skirmish, Vanguard, 0.90),
            (Echelon, Line, 1.15),
            (Echelon, Phalanx, 1.10),
            (Echelon, Box, 0.85),
            (Phalanx, Vanguard, 1.20),
            (Phalanx, Swarm, 1.15),
            (Phalanx, Skirmish, 0.85),
            (Swarm, Box, 1.20),
            (Swarm, Line, 1.10),
            (Swarm, Phalanx, 0.85),
        ] {
            matrix.set(attacker, defender, multiplier);
        }
        matrix
    }
}

/// Look up a multiplier in the global catalog
pub fn counter_multiplier(attacker: FormationType, defender: FormationType) -> f64 {
    catalog().counters.multiplier(attacker, defender)
}
