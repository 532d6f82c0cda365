//! Content template schema for Emberreach worlds.
//!
//! These types describe the *authored* shape of a world: region/room layout,
//! item and NPC templates, spells, and the pools a quest generator draws
//! from. They are deliberately inert data -- nothing here ticks, resolves
//! combat, or tracks live state. `emberreach_core` consumes a [`WorldDef`]
//! to build its own runtime entities; it never holds a `WorldDef` directly
//! once the world is built.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_world};
