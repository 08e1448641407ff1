//! # Saga Rules
//!
//! The state container for Samsara Saga - player archetypes, progress records,
//! and the open-ended world flag map. This crate knows nothing about the story
//! graph; it only stores state and exposes the primitives every other
//! component mutates it through.

pub mod entities;
pub mod error;
pub mod mechanics;
pub mod world_state;

pub use entities::*;
pub use error::*;
pub use mechanics::*;
pub use world_state::*;
