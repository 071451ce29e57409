//! FloodEx: terminal flood-risk dashboard.
//!
//! A user registers with a name and a location, then sees the current
//! flood risk for that location together with live weather readings
//! fetched from Open-Meteo and a local prediction service.

pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
mod helpers;
pub mod models;
pub mod render;
pub mod screens;
pub mod services;
pub mod session;
pub mod tasks;
