pub mod configuration;
pub mod persistence;
