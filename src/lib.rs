//! # Veilspire: Shattered Legacy
//!
//! A single-player terminal text adventure: explore a fixed dungeon, collect
//! and equip items, fight scripted enemies in turn-based combat, and persist
//! progress to a versioned JSON save file.
//!
//! ## Features
//!
//! - **Room graph navigation**: directional commands over a fixed dungeon
//!   topology with gated (locked) transitions.
//! - **Inventory engine**: take/equip/use semantics with declarative item
//!   use-effects interpreted by a small executor.
//! - **Turn-based combat**: weighted-random enemy behavior selection, timed
//!   enemy spawning, defeat/loot/victory resolution.
//! - **Versioned saves**: one flat JSON document with forward migration of
//!   older schema versions and score breakdown tracking.
//! - **Async design**: Tokio drives the command loop, the autosave interval
//!   and the delayed encounter timers on a single logical thread.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use veilspire::animation::ConsoleAnimator;
//! use veilspire::config::Config;
//! use veilspire::game::Session;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let animator = ConsoleAnimator::new(true, 1.0);
//!     let mut session = Session::new(config, animator);
//!     session.run().await
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - Data model, catalog, engines and the session orchestrator
//! - [`animation`] - The animation collaborator trait and implementations
//! - [`config`] - Configuration management

pub mod animation;
pub mod config;
pub mod game;
