pub mod credentials;
pub mod document;
pub mod errors;
pub mod preferences;
pub mod profile;
pub mod settings;
