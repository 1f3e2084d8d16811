//! Stock-keeping unit identifier.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Case-normalized SKU value object.
///
/// All lookups in the system go through this type, so "widget-1" and
/// "WIDGET-1" always address the same catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Parse a raw SKU string: trimmed and upper-cased.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let normalized = raw.as_ref().trim().to_uppercase();
        if normalized.is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Sku {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Sku {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let sku = Sku::parse("  widget-1 ").unwrap();
        assert_eq!(sku.as_str(), "WIDGET-1");
    }

    #[test]
    fn differently_cased_inputs_are_the_same_sku() {
        assert_eq!(Sku::parse("widget").unwrap(), Sku::parse("WIDGET").unwrap());
    }

    #[test]
    fn parse_rejects_empty() {
        let err = Sku::parse("   ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
