//! Economic report dashboard: seeded and user-added reports, AI-generated
//! narratives and cross-report storyboards, relationship graph layout and
//! PDF ingestion.

pub mod app;
pub mod charts;
pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod llm;
pub mod models;
pub mod processing;
pub mod services;
pub mod speech;
pub mod validation;

pub use error::{DashboardError, Result};
