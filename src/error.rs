//! Error types for model resolution

use thiserror::Error;

/// Result type for resolution operations
pub type Result<T> = std::result::Result<T, ResolutionError>;

/// Fatal resolution errors.
///
/// A fatal error aborts the assembly of one named schema only. Non-fatal
/// outcomes (cycles, conflicting overrides) are reported as diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Unresolved reference '{reference}' in schema '{schema}' at {path}{}", suggestion_suffix(.suggestion))]
    UnresolvedReference {
        schema: String,
        reference: String,
        path: String,
        suggestion: Option<String>,
    },

    #[error("Ambiguous composition in schema '{schema}': {reason}")]
    AmbiguousComposition { schema: String, reason: String },

    #[error("Invalid schema '{schema}': {reason}")]
    InvalidSchema { schema: String, reason: String },
}

impl ResolutionError {
    /// Name of the schema whose assembly failed
    pub fn schema(&self) -> &str {
        match self {
            Self::UnresolvedReference { schema, .. }
            | Self::AmbiguousComposition { schema, .. }
            | Self::InvalidSchema { schema, .. } => schema,
        }
    }

    /// Re-attribute an error raised while resolving a dependency.
    ///
    /// A parent's failure is reported against the child that needed it, with
    /// the parent kept in the path so the original location is not lost.
    pub(crate) fn within(self, schema: &str) -> Self {
        match self {
            Self::UnresolvedReference { schema: inner, reference, path, suggestion } if inner != schema => {
                Self::UnresolvedReference {
                    schema: schema.to_string(),
                    reference,
                    path: format!("{} (via {})", path, inner),
                    suggestion,
                }
            }
            Self::AmbiguousComposition { schema: inner, reason } if inner != schema => {
                Self::AmbiguousComposition {
                    schema: schema.to_string(),
                    reason: format!("{} (via {})", reason, inner),
                }
            }
            Self::InvalidSchema { schema: inner, reason } if inner != schema => Self::InvalidSchema {
                schema: schema.to_string(),
                reason: format!("{} (via {})", reason, inner),
            },
            other => other,
        }
    }
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{}'?)", name),
        None => String::new(),
    }
}
