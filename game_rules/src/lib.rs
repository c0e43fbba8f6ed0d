//! # Game Rules
//!
//! The rules vocabulary that authored narrative graphs refer to. Effects,
//! conditions, characters, the in-game calendar and workplace event fields are
//! defined here so that the editor and the runtime systems agree on names.
//!
//! This crate only describes rules. Evaluating a condition or applying an
//! effect belongs to the runtime game systems, not to this crate.

pub mod calendar;
pub mod entities;
pub mod mechanics;
pub mod workplace;

pub use calendar::*;
pub use entities::*;
pub use mechanics::*;
pub use workplace::*;
