//! Language registry: bidirectional lookup between display names and codes.
//!
//! The registry is built once from [`SUPPORTED_LANGUAGES`] and shared through
//! a `OnceLock` singleton. Both directions are answered from prebuilt indexes.

use super::table::SUPPORTED_LANGUAGES;
use super::{SIMPLIFIED_CHINESE, TRADITIONAL_CHINESE};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// A supported language: lowercase English display name and service code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageEntry {
    /// Display name as stored in the table (e.g. "chinese (simplified)")
    pub name: &'static str,

    /// Code in its canonical case (e.g. "zh-CN")
    pub code: &'static str,
}

impl LanguageEntry {
    /// Display name in title case, as shown to users.
    pub fn title(&self) -> String {
        title_case(self.name)
    }
}

/// Lookup tables over an ordered list of languages.
pub struct LanguageRegistry {
    entries: Vec<LanguageEntry>,
    /// Lowercase name or code -> index of the first entry carrying it
    forward: HashMap<String, usize>,
    /// Lowercase code -> index of the first entry carrying it
    reverse: HashMap<String, usize>,
    /// Trailing "(Source -> Dest)" annotations appended to bot translations
    annotation: Regex,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global registry over the supported language table.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| {
            LanguageRegistry::new(SUPPORTED_LANGUAGES.to_vec())
                .expect("escaped language names always form a valid pattern")
        })
    }

    /// Build a registry over `entries`, preserving their order.
    ///
    /// When two entries share a name or code, lookups return the earlier one.
    pub fn new(entries: Vec<LanguageEntry>) -> Result<Self, regex::Error> {
        let mut forward = HashMap::new();
        let mut reverse = HashMap::new();

        for (index, entry) in entries.iter().enumerate() {
            forward.entry(entry.name.to_lowercase()).or_insert(index);
            forward.entry(entry.code.to_lowercase()).or_insert(index);
            reverse.entry(entry.code.to_lowercase()).or_insert(index);
        }

        let annotation = build_annotation_pattern(&entries)?;

        Ok(Self {
            entries,
            forward,
            reverse,
            annotation,
        })
    }

    /// All entries in table order.
    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    /// Resolve user input (a display name or a code, any case) to a code.
    ///
    /// Falls back to the Chinese shorthands `chinese`, `zh`, `zh-tw` and
    /// `zh-cn` when the table has no direct match.
    pub fn resolve_code(&self, input: &str) -> Option<&'static str> {
        let key = input.trim().to_lowercase();

        if let Some(&index) = self.forward.get(&key) {
            return Some(self.entries[index].code);
        }

        match key.as_str() {
            "chinese" | "zh" => Some(SIMPLIFIED_CHINESE),
            "zh-tw" => Some(TRADITIONAL_CHINESE),
            "zh-cn" => Some(SIMPLIFIED_CHINESE),
            _ => None,
        }
    }

    /// Canonical form of `code` if it is one the translation service accepts.
    pub fn canonical_code(&self, code: &str) -> Option<&'static str> {
        self.reverse
            .get(&code.to_lowercase())
            .map(|&index| self.entries[index].code)
    }

    /// Display name for a code. The first entry wins when codes are shared.
    pub fn display_name_for(&self, code: &str) -> Option<&'static str> {
        self.reverse
            .get(&code.to_lowercase())
            .map(|&index| self.entries[index].name)
    }

    /// Title-cased display name for a code, for user-facing output.
    pub fn display_title_for(&self, code: &str) -> Option<String> {
        self.display_name_for(code).map(title_case)
    }

    /// Remove every trailing `(Source -> Dest)` annotation from `text`.
    ///
    /// Stripping an already stripped string returns it unchanged.
    pub fn strip_annotation(&self, text: &str) -> String {
        self.annotation.replace(text, "").trim().to_string()
    }
}

fn build_annotation_pattern(entries: &[LanguageEntry]) -> Result<Regex, regex::Error> {
    let names = entries
        .iter()
        .map(|entry| regex::escape(&entry.title()))
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&format!(
        r"(?i)(?:\s*\((?:{names}) -> (?:{names})\))+\s*$"
    ))
}

/// Uppercase the first letter of every word and lowercase the rest.
///
/// A word starts after any non-alphabetic character, so
/// `"chinese (simplified)"` becomes `"Chinese (Simplified)"`.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut word_start = true;

    for c in text.chars() {
        if c.is_alphabetic() {
            if word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            result.push(c);
            word_start = true;
        }
    }

    result
}
