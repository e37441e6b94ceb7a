//! Board game catalogue and recommendation service.
//!
//! A static snapshot (game metadata, thumbnails and a precomputed similarity
//! table) is loaded once at start-up and served read-only: filtered and
//! paginated catalogue pages, game details with a normalised radar profile,
//! and the ranked neighbours of a selected game.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
