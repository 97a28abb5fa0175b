//! Formation system - slot assignment and directional damage
//!
//! Data flows one way:
//! - `SlotAssigner` arranges a stack into a `Formation`
//! - `DamageDistributor` splits an attack across filled positions
//! - `apportion` splits a position's damage across its assignments
//!
//! `CounterMatrix` and the position bonus lookup are independent utilities
//! for the combat resolver.

pub mod assignment;
pub mod bonus;
pub mod capacity;
pub mod catalog;
pub mod counter;
pub mod damage;
pub mod position;
pub mod types;

pub use assignment::{assign_formation, SlotAssigner};
pub use bonus::{apply_bonuses, apply_position_bonuses};
pub use capacity::{CapacityProvider, CapacityTable};
pub use catalog::{FormationCatalog, FormationSpec};
pub use counter::{counter_multiplier, CounterMatrix, NEUTRAL_MULTIPLIER};
pub use damage::{apportion, distribute_damage, DamageDistributor, DirectionalWeights};
pub use position::{determine_layer, determine_optimal_position};
pub use types::{
    AttackDirection, Formation, FormationAssignment, FormationPosition, FormationType,
    PerPosition, PositionBonuses,
};
