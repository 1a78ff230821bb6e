//! # repo-helper-renderer
//!
//! Tera-based rendering of the managed-file templates from resolved
//! repo-helper settings.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use repo_helper_renderer::{TemplateContext, TemplateEngine};
//! use repo_helper_core::Settings;
//!
//! fn render_tox(settings: &Settings) -> Result<String, repo_helper_renderer::RenderError> {
//!     let engine = TemplateEngine::new(None)?;
//!     let ctx = TemplateContext::new(settings).to_tera_context()?;
//!     engine.render("tox.ini.tera", &ctx)
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod helpers;

pub use context::{fill_absent, TemplateContext, MANAGED_MESSAGE};
pub use engine::{embedded_template_names, TemplateEngine};
pub use error::RenderError;
