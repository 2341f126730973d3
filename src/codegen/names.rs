//! Identifier Casing
//!
//! Word splitting and case conversion shared by every naming policy.
//! Words break on `_`, `-`, `.`, spaces and lower-to-upper transitions, so
//! `parentModel`, `parent_model` and `parent-model` all split the same way.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ILLEGAL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());

/// Casing convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Casing {
    PascalCase,
    CamelCase,
    SnakeCase,
    ScreamingSnakeCase,
}

impl Casing {
    pub fn apply(&self, s: &str) -> String {
        match self {
            Self::PascalCase => to_pascal_case(s),
            Self::CamelCase => to_camel_case(s),
            Self::SnakeCase => to_snake_case(s),
            Self::ScreamingSnakeCase => to_snake_case(s).to_uppercase(),
        }
    }
}

/// Split an identifier into words
pub fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in s.chars() {
        if c == '_' || c == '-' || c == '.' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        if let Some(p) = prev {
            if c.is_uppercase() && (p.is_lowercase() || p.is_ascii_digit()) && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Upper-case the first letter, leave the rest of the word alone
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// `parent_model` / `parentModel` -> `ParentModel`
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// `parent_model` / `ParentModel` -> `parentModel`
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// `parentModel` -> `parent_model`
pub fn to_snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Replace characters illegal in identifiers and guard a leading digit
pub fn sanitize_identifier(s: &str) -> String {
    let cleaned = ILLEGAL_CHARS.replace_all(s, "_");
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        return "_".to_string();
    }
    if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", cleaned)
    } else {
        cleaned.to_string()
    }
}
