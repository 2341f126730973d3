//! Diagnostics
//!
//! Collects non-fatal outcomes during model assembly. Fatal conditions are
//! `ResolutionError`s; everything here lets generation proceed.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ResolutionError;

// =============================================================================
// Diagnostic Codes
// =============================================================================

/// Diagnostic code for categorizing issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // === References ===
    /// Reference participates in a cycle; resolved to a named type
    CyclicReference,
    /// $ref target not found in the named-schema table
    UnresolvedReference,
    /// Schema node that cannot be read, or one that inherits from itself
    InvalidSchema,

    // === Composition ===
    /// Composition shape the policy cannot classify
    AmbiguousComposition,
    /// Child declared a discriminator property different from its parent's
    DiscriminatorOverride,
    /// Inline oneOf/anyOf member has no name to dispatch on
    UnnamedUnionMember,

    // === Properties ===
    /// Local property shares a parent property's name with a different shape
    ConflictingEnumOverride,
    /// Local enum shadows a parent enum with a different literal set
    EnumShadow,
    /// Inline object property mapped to the free-form object type
    InlineObjectFlattened,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnresolvedReference => "E001",
            Self::AmbiguousComposition => "E002",
            Self::InvalidSchema => "E003",
            Self::ConflictingEnumOverride => "W001",
            Self::DiscriminatorOverride => "W002",
            Self::UnnamedUnionMember => "W003",
            Self::InlineObjectFlattened => "W004",
            Self::CyclicReference => "I001",
            Self::EnumShadow => "I002",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::UnresolvedReference | Self::AmbiguousComposition | Self::InvalidSchema => Severity::Error,

            Self::ConflictingEnumOverride
            | Self::DiscriminatorOverride
            | Self::UnnamedUnionMember
            | Self::InlineObjectFlattened => Severity::Warning,

            Self::CyclicReference | Self::EnumShadow => Severity::Info,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

// =============================================================================
// Diagnostic Item
// =============================================================================

/// A single diagnostic item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticItem {
    /// Schema that caused this diagnostic
    pub schema: String,
    pub code: DiagnosticCode,
    pub message: String,
    /// Additional context (related schemas, property paths)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

impl DiagnosticItem {
    pub fn new(schema: impl Into<String>, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl From<&ResolutionError> for DiagnosticItem {
    fn from(err: &ResolutionError) -> Self {
        let code = match err {
            ResolutionError::UnresolvedReference { .. } => DiagnosticCode::UnresolvedReference,
            ResolutionError::InvalidSchema { .. } => DiagnosticCode::InvalidSchema,
            ResolutionError::AmbiguousComposition { .. } => DiagnosticCode::AmbiguousComposition,
        };
        Self::new(err.schema(), code, err.to_string())
    }
}

impl fmt::Display for DiagnosticItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.code,
            self.code.severity(),
            self.message,
            self.schema
        )?;

        for ctx in &self.context {
            write!(f, "\n  - {}", ctx)?;
        }

        Ok(())
    }
}

// =============================================================================
// Diagnostics Collection
// =============================================================================

/// Collection of diagnostics for one model or one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<DiagnosticItem>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic item, logging it at the matching level
    pub fn push(&mut self, item: DiagnosticItem) {
        match item.severity() {
            Severity::Error => tracing::error!(schema = %item.schema, code = %item.code, "{}", item.message),
            Severity::Warning => tracing::warn!(schema = %item.schema, code = %item.code, "{}", item.message),
            Severity::Info => tracing::debug!(schema = %item.schema, code = %item.code, "{}", item.message),
        }
        self.items.push(item);
    }

    /// Add a diagnostic built from its parts
    pub fn report(
        &mut self,
        schema: impl Into<String>,
        code: DiagnosticCode,
        message: impl Into<String>,
    ) {
        self.push(DiagnosticItem::new(schema, code, message));
    }

    /// A reference resolved to a named type because it closes a cycle
    pub fn cyclic_reference(&mut self, schema: &str, target: &str, path: &str) {
        self.push(
            DiagnosticItem::new(
                schema,
                DiagnosticCode::CyclicReference,
                format!("Reference to '{}' closes a cycle; resolved as a named type", target),
            )
            .with_context(format!("Path: {}", path)),
        );
    }

    /// Local property conflicts with an inherited one of the same name
    pub fn conflicting_enum_override(&mut self, schema: &str, property: &str, parent: &str) {
        self.push(
            DiagnosticItem::new(
                schema,
                DiagnosticCode::ConflictingEnumOverride,
                format!(
                    "Property '{}' shares its name with a property of '{}' but differs in type or enum shape; keeping the local declaration",
                    property, parent
                ),
            ),
        );
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|i| i.severity() == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(|i| i.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(|i| i.severity() == Severity::Warning)
    }

    /// Items carrying a specific code
    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(move |i| i.code == code)
    }

    pub fn all(&self) -> &[DiagnosticItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Merge another collection into this one without re-logging
    pub fn merge(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    /// Format all diagnostics for display
    pub fn format_all(&self) -> String {
        let mut output = String::new();

        for item in &self.items {
            output.push_str(&format!("{}\n", item));
        }

        if self.has_errors() {
            output.push_str(&format!(
                "\n{} error(s), {} warning(s)\n",
                self.error_count(),
                self.warning_count()
            ));
        } else if !self.is_empty() {
            output.push_str(&format!("\n{} warning(s)\n", self.warning_count()));
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_all())
    }
}

impl IntoIterator for Diagnostics {
    type Item = DiagnosticItem;
    type IntoIter = std::vec::IntoIter<DiagnosticItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a DiagnosticItem;
    type IntoIter = std::slice::Iter<'a, DiagnosticItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
