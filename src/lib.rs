//! Preference-weighted recipe ranking
//!
//! Candidate recipes from food recognition are tagged with keywords, the
//! keywords feed a durable frequency profile, and the recipes are ranked by
//! how often their keywords have been seen before.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
