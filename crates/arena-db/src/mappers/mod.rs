//! Entity to model mappers
//!
//! `From<Model> for Entity` conversions from database rows to domain objects.
//! Rows that cannot be represented in the domain are filtered by the
//! `*_from_model` helpers instead.

mod achievement;
mod activity;
mod challenge;
mod user;

pub use achievement::{achievement_from_model, reaction_summary_from_model};
