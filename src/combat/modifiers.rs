//! Stat modifier deltas and how they stack
//!
//! Values are fractional deltas: `damage: 0.15` means +15% outgoing damage.
//! How two modifier sets merge is owned by the combat resolver, so merging
//! goes through the `CombineModifiers` seam. `AdditiveCombine` is the stock
//! implementation.

use serde::{Deserialize, Serialize};

/// Fractional stat adjustments applied to ships in a position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatModifiers {
    #[serde(default)]
    pub damage: f32,
    #[serde(default)]
    pub armor: f32,
    #[serde(default)]
    pub evasion: f32,
    #[serde(default)]
    pub accuracy: f32,
    #[serde(default)]
    pub speed: f32,
}

impl StatModifiers {
    pub fn damage(value: f32) -> Self {
        Self {
            damage: value,
            ..Self::default()
        }
    }

    pub fn armor(value: f32) -> Self {
        Self {
            armor: value,
            ..Self::default()
        }
    }

    pub fn evasion(value: f32) -> Self {
        Self {
            evasion: value,
            ..Self::default()
        }
    }

    pub fn accuracy(value: f32) -> Self {
        Self {
            accuracy: value,
            ..Self::default()
        }
    }

    pub fn with_damage(mut self, value: f32) -> Self {
        self.damage = value;
        self
    }

    pub fn with_armor(mut self, value: f32) -> Self {
        self.armor = value;
        self
    }

    pub fn with_evasion(mut self, value: f32) -> Self {
        self.evasion = value;
        self
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    fn fields(&self) -> [f32; 5] {
        [self.damage, self.armor, self.evasion, self.accuracy, self.speed]
    }

    pub fn is_finite(&self) -> bool {
        self.fields().iter().all(|v| v.is_finite())
    }
}

/// Merge a delta onto a base modifier set
pub trait CombineModifiers {
    fn combine(&self, base: &StatModifiers, delta: &StatModifiers) -> StatModifiers;
}

/// Field-wise sum
#[derive(Debug, Clone, Copy, Default)]
pub struct AdditiveCombine;

impl CombineModifiers for AdditiveCombine {
    fn combine(&self, base: &StatModifiers, delta: &StatModifiers) -> StatModifiers {
        StatModifiers {
            damage: base.damage + delta.damage,
            armor: base.armor + delta.armor,
            evasion: base.evasion + delta.evasion,
            accuracy: base.accuracy + delta.accuracy,
            speed: base.speed + delta.speed,
        }
    }
}

impl<F> CombineModifiers for F
where
    F: Fn(&StatModifiers, &StatModifiers) -> StatModifiers,
{
    fn combine(&self, base: &StatModifiers, delta: &StatModifiers) -> StatModifiers {
        self(base, delta)
    }
}
