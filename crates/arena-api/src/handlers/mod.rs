//! Route handlers
//!
//! All HTTP request handlers organized by area.

pub mod admin;
pub mod auth;
pub mod challenges;
pub mod checkins;
pub mod dashboard;
pub mod health;
pub mod notifications;
pub mod profile;
pub mod social;
