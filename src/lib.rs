pub mod app;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod format;
pub mod merge;
pub mod metadata;
pub mod oceantea;
pub mod output;
pub mod stats;
