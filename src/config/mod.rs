// Configuration module
// Public interface for configuration loading

mod loader;
mod settings;

pub use loader::{default_config_path, load_config, load_config_from, validate, BASE_URL_ENV, USER_ID_ENV};
pub use settings::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_USER_ID};
