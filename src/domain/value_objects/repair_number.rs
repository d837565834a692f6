use serde::{Deserialize, Serialize};
use std::fmt;

/// Human-readable ticket number shown on lists and receipts, e.g. `REP001`.
///
/// Numbers are derived from the current record count at creation time and
/// never renumbered afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepairNumber(String);

impl RepairNumber {
    /// Formats the number for the given 1-based ordinal.
    pub fn from_ordinal(ordinal: usize) -> Self {
        Self(format!("REP{ordinal:03}"))
    }

    pub fn new(value: String) -> Result<Self, String> {
        if value.is_empty() {
            return Err("RepairNumber cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepairNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RepairNumber> for String {
    fn from(value: RepairNumber) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_are_zero_padded_to_three_digits() {
        assert_eq!(RepairNumber::from_ordinal(1).as_str(), "REP001");
        assert_eq!(RepairNumber::from_ordinal(42).as_str(), "REP042");
        assert_eq!(RepairNumber::from_ordinal(123).as_str(), "REP123");
        assert_eq!(RepairNumber::from_ordinal(1000).as_str(), "REP1000");
    }
}
