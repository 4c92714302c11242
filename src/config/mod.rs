//! Configuration loaded from `fortress.toml` in the data directory.

pub mod settings;

pub use settings::Settings;
