pub mod config;
pub mod error;
pub mod types;

pub use config::{catalog, set_catalog, TacticsCatalog};
pub use error::{Result, TacticsError};
pub use types::{HpBucket, ShipStack, ShipType};
