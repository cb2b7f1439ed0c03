//! Libris Library Management Backend
//!
//! A small REST JSON backend for managing a library catalog, its members,
//! and loans, with background email notifications for loan creation and
//! overdue reminders.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod jobs;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
