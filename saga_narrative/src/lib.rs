//! # Saga Narrative
//!
//! The story engine of Samsara Saga. This crate reads static story data,
//! decides which options a player can see, and drives the `saga_rules` state
//! container through choices, puzzles, and progression.
//!
//! ## Core Components
//!
//! - **condition**: Gating predicates as a tagged expression language
//! - **story**: Per-act scene tables loaded from JSON
//! - **resolver**: Current scene lookup, option filtering, and resolution
//! - **puzzle**: Puzzle attempts with first-match-wins solution scanning
//! - **progression**: XP, levels, achievements, and quests
//! - **session**: The `GameSession` facade over all of the above
//!
//! ## Design Philosophy
//!
//! - **Explicit State**: Every session owns its state; nothing is global
//! - **Atomic Turns**: A rejected or broken action leaves the state untouched
//! - **Data-Driven**: Story content is portable data, never executable code

pub mod condition;
pub mod config;
pub mod error;
pub mod progression;
pub mod puzzle;
pub mod resolver;
pub mod session;
pub mod story;

pub use condition::*;
pub use config::*;
pub use error::*;
pub use progression::*;
pub use puzzle::*;
pub use resolver::*;
pub use session::*;
pub use story::*;
