pub mod app;
pub mod auth;
pub mod config;
pub mod docs;
pub mod error;
pub mod items;
pub mod state;
pub mod system;
pub mod validation;
