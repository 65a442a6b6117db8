//! Configuration: directories, `settings.conf` and the API credential.

pub mod credentials;
mod paths;
pub mod settings;

pub use credentials::{
    API_KEY_ENV, Credential, CredentialError, CredentialStore, SettingsCredentialStore,
    validate_api_key,
};
pub use paths::{CONFIG_DIR_ENV, config_dir, logs_dir, settings_path};
pub use settings::{Settings, load_settings, parse_settings};
