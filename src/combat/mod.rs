//! Combat-side helpers: stat modifiers and damage application

pub mod modifiers;
pub mod resolution;

pub use modifiers::{AdditiveCombine, CombineModifiers, StatModifiers};
pub use resolution::{
    apply_damage, apportion_by_ship_type, counter_adjusted_damage, resolve_incoming, DamageReport,
    DamageRow,
};
