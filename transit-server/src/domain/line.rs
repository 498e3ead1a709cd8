//! Line identifiers.

use std::borrow::Borrow;
use std::fmt;

use super::DomainError;

/// A non-empty transit line identifier, e.g. `L1`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(String);

impl LineId {
    /// Parse a line id, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyId { kind: "line" });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LineId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        assert_eq!(LineId::parse("L1").unwrap().as_str(), "L1");
        assert_eq!(LineId::parse(" B ").unwrap().as_str(), "B");
    }

    #[test]
    fn reject_empty() {
        assert_eq!(
            LineId::parse(""),
            Err(DomainError::EmptyId { kind: "line" })
        );
    }
}
