//! AlphaPredict Dashboard Client Library
//!
//! This library provides the core functionality for the AlphaPredict income
//! prediction dashboard: a typed REST gateway to the prediction backend,
//! deterministic view-model builders with placeholder fallbacks, and text
//! renderers for the dashboard pages.
//!
//! # Modules
//!
//! - `analytics`: Analytics snapshot presentation policy and fallbacks.
//! - `comparison`: Segment comparison builder.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `format`: ru-RU currency and percentage formatting.
//! - `gateway_client`: Backend REST API client.
//! - `models`: Core data models.
//! - `prediction`: Prediction envelope builder and refresh sequencing.
//! - `views`: Page renderers.

pub mod analytics;
pub mod comparison;
pub mod config;
pub mod errors;
pub mod format;
pub mod gateway_client;
pub mod models;
pub mod prediction;
pub mod views;
