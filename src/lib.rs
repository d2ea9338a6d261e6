// Library exports for FitTrack
// This allows testing of internal modules

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod form;
pub mod models;
pub mod progress;
pub mod session;
