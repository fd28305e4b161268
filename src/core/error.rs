// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core error types with error codes

use thiserror::Error;

use super::error_code::*;

/// Main delegate error type
///
/// Every error surfaces to the immediate caller of construction or rendering.
/// Nothing in this crate retries.
#[derive(Debug, Error)]
pub enum DelegateError {
    /// A delegate could not be constructed from its input
    #[error("{error_code}: cannot construct {type_name}: {message}")]
    ConstructionError {
        error_code: ErrorCode,
        type_name: String,
        message: String,
    },

    /// A declared field is not present on the record being projected
    #[error("{error_code}: attribute '{attribute}' is missing on {record_type} record")]
    ProjectionError {
        error_code: ErrorCode,
        record_type: String,
        attribute: String,
    },

    /// The external template renderer failed
    #[error("{error_code}: template '{template}' failed to render")]
    RenderError {
        error_code: ErrorCode,
        template: String,
        #[source]
        source: anyhow::Error,
    },

    /// A template or local referred to a helper or accessor the type does not define
    #[error("{error_code}: {type_name} has no {member_kind} named '{name}'")]
    UnknownMember {
        error_code: ErrorCode,
        type_name: String,
        member_kind: &'static str,
        name: String,
    },

    /// User-supplied accessor, helper or selector code failed
    #[error("{error_code}: {message}")]
    AccessorError { error_code: ErrorCode, message: String },

    /// A schema was rejected when its type was built or registered
    #[error("{error_code}: invalid definition of {type_name}: {message}")]
    DefinitionError {
        error_code: ErrorCode,
        type_name: String,
        message: String,
    },

    /// Configuration could not be loaded
    #[error("{error_code}: {message}")]
    ConfigError { error_code: ErrorCode, message: String },
}

impl DelegateError {
    /// Create a construction error
    pub fn construction(
        error_code: ErrorCode,
        type_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ConstructionError {
            error_code,
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a projection error for a missing attribute
    pub fn missing_attribute(record_type: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::ProjectionError {
            error_code: VD0051,
            record_type: record_type.into(),
            attribute: attribute.into(),
        }
    }

    /// Wrap a renderer failure
    pub fn render(template: impl Into<String>, source: anyhow::Error) -> Self {
        Self::RenderError {
            error_code: VD0101,
            template: template.into(),
            source,
        }
    }

    /// Create an error for an undefined helper
    pub fn unknown_helper(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownMember {
            error_code: VD0102,
            type_name: type_name.into(),
            member_kind: "helper",
            name: name.into(),
        }
    }

    /// Create an error for an undefined accessor
    pub fn unknown_accessor(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownMember {
            error_code: VD0103,
            type_name: type_name.into(),
            member_kind: "accessor",
            name: name.into(),
        }
    }

    /// Error raised from user code (accessors, helpers, variant selectors)
    pub fn accessor(message: impl Into<String>) -> Self {
        Self::AccessorError {
            error_code: VD0104,
            message: message.into(),
        }
    }

    /// Create a definition error
    pub fn definition(
        error_code: ErrorCode,
        type_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::DefinitionError {
            error_code,
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            error_code: VD0201,
            message: message.into(),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &ErrorCode {
        match self {
            Self::ConstructionError { error_code, .. } => error_code,
            Self::ProjectionError { error_code, .. } => error_code,
            Self::RenderError { error_code, .. } => error_code,
            Self::UnknownMember { error_code, .. } => error_code,
            Self::AccessorError { error_code, .. } => error_code,
            Self::DefinitionError { error_code, .. } => error_code,
            Self::ConfigError { error_code, .. } => error_code,
        }
    }

    /// Whether this error was raised while constructing a delegate
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::ConstructionError { .. })
    }
}

/// Result type for delegate operations
pub type Result<T> = std::result::Result<T, DelegateError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_construction_error_display() {
        let err = DelegateError::construction(VD0003, "AdminDelegate", "cycle detected");
        assert_eq!(
            err.to_string(),
            "VD0003: cannot construct AdminDelegate: cycle detected"
        );
        assert!(err.is_construction());
    }

    #[test]
    fn test_render_error_keeps_source() {
        let err = DelegateError::render("user/profile", anyhow::anyhow!("template not found"));
        assert_eq!(err.error_code(), &VD0101);
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("template not found"));
    }

    #[test]
    fn test_unknown_helper_display() {
        let err = DelegateError::unknown_helper("UserDelegate", "format_date");
        assert_eq!(
            err.to_string(),
            "VD0102: UserDelegate has no helper named 'format_date'"
        );
    }
}
