//! Supported translation languages.
//!
//! All name/code resolution for the bot goes through this module.
//!
//! # Architecture
//!
//! - `table`: The static list of languages the translation service accepts
//! - `registry`: Bidirectional name <-> code lookup built once from the table
//!
//! # Example
//!
//! ```rust,ignore
//! use babel_bot::languages::LanguageRegistry;
//!
//! let registry = LanguageRegistry::get();
//! assert_eq!(registry.resolve_code("French"), Some("fr"));
//! assert_eq!(registry.display_name_for("fr"), Some("french"));
//! ```

mod registry;
mod table;

pub use registry::{title_case, LanguageEntry, LanguageRegistry};
pub use table::SUPPORTED_LANGUAGES;

/// Code of Simplified Chinese in the translation service's vocabulary.
pub const SIMPLIFIED_CHINESE: &str = "zh-CN";

/// Code of Traditional Chinese in the translation service's vocabulary.
pub const TRADITIONAL_CHINESE: &str = "zh-TW";
