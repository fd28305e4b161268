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

//! Error code system in the style of the Rust compiler (VD0001, VD0002, ...)

use std::fmt;

/// Error categories for organizing error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Construction errors (VD0001-VD0050)
    Construction,
    /// Projection errors (VD0051-VD0100)
    Projection,
    /// Render errors (VD0101-VD0150)
    Render,
    /// Schema definition errors (VD0151-VD0200)
    Definition,
    /// Configuration errors (VD0201-VD0250)
    Config,
}

/// Error code following the Rust compiler pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    pub code: u16,
}

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self { code }
    }

    /// Full error code string (e.g. "VD0001")
    pub fn code_str(&self) -> String {
        self.to_string()
    }

    /// Category this code belongs to
    pub fn category(&self) -> ErrorCategory {
        match self.code {
            1..=50 => ErrorCategory::Construction,
            51..=100 => ErrorCategory::Projection,
            101..=150 => ErrorCategory::Render,
            151..=200 => ErrorCategory::Definition,
            _ => ErrorCategory::Config,
        }
    }

    /// Short human-readable title
    pub fn title(&self) -> &'static str {
        match self.code {
            1 => "Unknown delegate type",
            2 => "Variant selector failed",
            3 => "Variant resolution cycle",
            4 => "Variant resolution too deep",
            5 => "Record sequence shape cannot be determined",
            6 => "Input has the wrong kind for its field",
            7 => "Required property missing",
            8 => "Selected variant cannot be constructed",
            51 => "Attribute missing on source record",
            101 => "Template renderer failed",
            102 => "Unknown helper",
            103 => "Unknown accessor",
            104 => "Accessor failed",
            151 => "Invalid delegate schema",
            152 => "Delegate type already registered",
            153 => "Parent type not registered",
            201 => "Invalid configuration",
            _ => "Unknown error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VD{:04}", self.code)
    }
}

// Construction (VD0001-VD0050)
pub const VD0001: ErrorCode = ErrorCode::new(1); // Unknown delegate type
pub const VD0002: ErrorCode = ErrorCode::new(2); // Variant selector failed
pub const VD0003: ErrorCode = ErrorCode::new(3); // Variant resolution cycle
pub const VD0004: ErrorCode = ErrorCode::new(4); // Variant resolution too deep
pub const VD0005: ErrorCode = ErrorCode::new(5); // Empty record sequence without field list
pub const VD0006: ErrorCode = ErrorCode::new(6); // Wrong input kind
pub const VD0007: ErrorCode = ErrorCode::new(7); // Required property missing
pub const VD0008: ErrorCode = ErrorCode::new(8); // Selected variant cannot be constructed

// Projection (VD0051-VD0100)
pub const VD0051: ErrorCode = ErrorCode::new(51); // Attribute missing on source record

// Render (VD0101-VD0150)
pub const VD0101: ErrorCode = ErrorCode::new(101); // Renderer failed
pub const VD0102: ErrorCode = ErrorCode::new(102); // Unknown helper
pub const VD0103: ErrorCode = ErrorCode::new(103); // Unknown accessor
pub const VD0104: ErrorCode = ErrorCode::new(104); // Accessor failed

// Definition (VD0151-VD0200)
pub const VD0151: ErrorCode = ErrorCode::new(151); // Invalid schema
pub const VD0152: ErrorCode = ErrorCode::new(152); // Duplicate type registration
pub const VD0153: ErrorCode = ErrorCode::new(153); // Parent type not registered

// Config (VD0201-VD0250)
pub const VD0201: ErrorCode = ErrorCode::new(201); // Invalid configuration

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display() {
        assert_eq!(VD0001.to_string(), "VD0001");
        assert_eq!(VD0151.code_str(), "VD0151");
    }

    #[test]
    fn test_code_categories() {
        assert_eq!(VD0007.category(), ErrorCategory::Construction);
        assert_eq!(VD0051.category(), ErrorCategory::Projection);
        assert_eq!(VD0102.category(), ErrorCategory::Render);
        assert_eq!(VD0152.category(), ErrorCategory::Definition);
        assert_eq!(VD0201.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_code_titles() {
        assert_eq!(VD0008.title(), "Selected variant cannot be constructed");
        assert_eq!(VD0153.title(), "Parent type not registered");
        assert_eq!(ErrorCode::new(999).title(), "Unknown error");
    }
}
