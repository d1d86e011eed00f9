//! Survey authoring, response collection, result aggregation and CSV export over a SQLite store.
//!
//! The [`survey`] module holds the boundary operations; [`commands`] and [`handler`] drive them
//! from the command line.

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod helpers;
pub mod runtime;
pub mod support;
pub mod survey;

pub use error::{Result, SurveyError};
