//! Card system: definitions and registry.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions, stored in board zones
//! - `CardDefinition`: Static card data (damage, weight)
//! - `CardRegistry`: Card definition lookup

pub mod definition;
pub mod registry;

pub use definition::{CardDefinition, CardId};
pub use registry::CardRegistry;
