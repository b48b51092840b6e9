// Library exports for the dossiers CLI
// This allows testing of internal modules

pub mod api;
pub mod commands;
pub mod config;
pub mod models;
pub mod storage;
pub mod ui;
