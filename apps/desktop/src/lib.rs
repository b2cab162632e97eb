pub mod config;
pub mod keyboard;
