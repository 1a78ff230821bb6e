//! # repo-helper-core
//!
//! Settings schema, resolution and errors.
//!
//! - [`schema`]: the table of recognised keys
//! - [`resolve`]: raw document to canonical [`Settings`]
//! - [`document`]: loading `repo_helper.yml` from a repository
//! - [`error`]: [`ConfigError`]

pub mod document;
pub mod error;
pub mod resolve;
pub mod schema;
pub mod settings;

pub use document::{load_document, load_settings, settings_path, SETTINGS_FILE};
pub use error::ConfigError;
pub use resolve::resolve;
pub use settings::{FeatureFlag, Platform, PythonEnv, Settings, SphinxTheme};
