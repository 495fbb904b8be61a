// SPDX-License-Identifier: MPL-2.0

//! Composite identifiers addressing a selectable leaf.

use super::model::NodeId;
use std::fmt;
use std::str::FromStr;

/// Separator between the three id parts.
pub const DELIMITER: char = '-';

/// `{top}-{mid}-{leaf}`: the unit of selection, removal and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeId {
    pub top: NodeId,
    pub mid: NodeId,
    pub leaf: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCompositeIdError {
    #[error("expected three '-'-separated ids, got {0:?}")]
    WrongShape(String),
    #[error("invalid id part {part:?} in {input:?}")]
    InvalidPart { input: String, part: String },
}

impl CompositeId {
    pub fn new(top: NodeId, mid: NodeId, leaf: NodeId) -> Self {
        Self { top, mid, leaf }
    }

    pub fn decompose(&self) -> (NodeId, NodeId, NodeId) {
        (self.top, self.mid, self.leaf)
    }

    /// Parses every string, dropping the ones that are not valid identifiers.
    pub fn parse_all<S: AsRef<str>>(values: &[S]) -> Vec<CompositeId> {
        values
            .iter()
            .filter_map(|value| match value.as_ref().parse::<CompositeId>() {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::warn!("ignoring selection value: {}", e);
                    None
                }
            })
            .collect()
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}",
            self.top, self.mid, self.leaf
        )
    }
}

impl FromStr for CompositeId {
    type Err = ParseCompositeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(DELIMITER).collect();
        let [top, mid, leaf] = parts.as_slice() else {
            return Err(ParseCompositeIdError::WrongShape(s.to_string()));
        };

        // Only the canonical decimal form: no sign, whitespace or leading zeros.
        let parse = |part: &str| {
            let canonical = !part.is_empty()
                && part.bytes().all(|b| b.is_ascii_digit())
                && (part.len() == 1 || !part.starts_with('0'));
            canonical
                .then(|| part.parse::<NodeId>().ok())
                .flatten()
                .ok_or_else(|| ParseCompositeIdError::InvalidPart {
                    input: s.to_string(),
                    part: part.to_string(),
                })
        };

        Ok(Self::new(parse(top)?, parse(mid)?, parse(leaf)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_decompose_round_trip() {
        for (top, mid, leaf) in [(0, 0, 0), (1, 2, 10), (42, 7, 9001), (u64::MAX, 0, u64::MAX)] {
            let id: CompositeId = CompositeId::new(top, mid, leaf).to_string().parse().unwrap();
            assert_eq!(id.decompose(), (top, mid, leaf));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(CompositeId::new(1, 2, 10).to_string(), "1-2-10");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            "1-2".parse::<CompositeId>(),
            Err(ParseCompositeIdError::WrongShape(_))
        ));
        assert!(matches!(
            "1-2-3-4".parse::<CompositeId>(),
            Err(ParseCompositeIdError::WrongShape(_))
        ));
        assert!(matches!(
            "1--3".parse::<CompositeId>(),
            Err(ParseCompositeIdError::InvalidPart { .. })
        ));
        assert!(matches!(
            "a-2-3".parse::<CompositeId>(),
            Err(ParseCompositeIdError::InvalidPart { .. })
        ));
    }

    #[test]
    fn test_rejects_non_canonical_numbers() {
        for input in [
            "+1-2-10",
            "01-2-10",
            " 1-2-10 ",
            "1-2-+10",
            "1-02-10",
            "1-2-18446744073709551616",
        ] {
            assert!(
                matches!(
                    input.parse::<CompositeId>(),
                    Err(ParseCompositeIdError::InvalidPart { .. })
                ),
                "{input:?} should be rejected"
            );
        }
        assert_eq!("0-0-0".parse::<CompositeId>(), Ok(CompositeId::new(0, 0, 0)));
    }

    #[test]
    fn test_parse_all_skips_invalid() {
        let ids = CompositeId::parse_all(&["1-2-10", "bogus", " 3-4-5 ", "3-4-5"]);
        assert_eq!(ids, vec![CompositeId::new(1, 2, 10), CompositeId::new(3, 4, 5)]);
    }
}
