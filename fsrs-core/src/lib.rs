//! FSRS-6 spaced-repetition scheduling for a single card.
//!
//! A [`Scheduler`] is built once from a [`SchedulerConfig`] and then used to
//! review cards, replay review histories and query retrievability. Every
//! operation is a pure function of its inputs; time and fuzzing randomness can
//! be injected through [`sources`].

pub mod config;
pub mod constants;
pub mod errors;
pub mod formulas;
pub mod fuzz;
pub mod models;
pub mod params;
pub mod scheduler;
pub mod sources;
pub mod timestamp;

pub use config::*;
pub use constants::*;
pub use errors::*;
pub use models::*;
pub use params::*;
pub use scheduler::*;
pub use sources::*;
