//! Command handlers

pub mod config;
pub mod quote;
pub mod remind;
pub mod session;
pub mod settings;
pub mod stats;
