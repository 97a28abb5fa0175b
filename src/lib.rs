//! Fleet Tactics - formation slot assignment and directional damage math
//!
//! Arranges ship stacks into formations under per-position capacity limits,
//! and splits incoming damage across positions and ship groups.

pub mod combat;
pub mod core;
pub mod formation;

pub use crate::core::config::{catalog, set_catalog, TacticsCatalog};
pub use crate::core::error::{Result, TacticsError};
pub use crate::core::types::{HpBucket, ShipStack, ShipType};
