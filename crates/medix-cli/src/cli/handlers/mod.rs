//! Command handlers for the Medix CLI

pub mod auth;
pub mod config;
pub mod doctors;
