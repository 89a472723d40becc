//! Parameter marker discovery in SQL text.
//!
//! The server reports how many parameters a statement has, but not what they
//! are called. Names come from scanning the SQL for `:NAME` markers. The scan
//! is purely lexical: markers inside string literals or comments count too,
//! and then disagree with the server's parameter count.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\w+|\?").expect("parameter marker pattern compiles"));

/// Parameter marker found in SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// `?`
    Positional,
    /// `:NAME`, stored without the colon.
    Named(String),
}

impl Placeholder {
    /// Name of a named marker.
    pub fn name(&self) -> Option<&str> {
        match self {
            Placeholder::Positional => None,
            Placeholder::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::Positional => f.write_str("?"),
            Placeholder::Named(name) => write!(f, ":{}", name),
        }
    }
}

/// Find the parameter markers of `sql`, one per server-reported parameter.
///
/// Fails with [`Error::MixedPlaceholders`] if both marker kinds occur, then
/// with [`Error::TooManyPlaceholders`] or [`Error::MissingPlaceholders`] if
/// the number of markers differs from `param_count`.
pub fn scan(sql: &str, param_count: usize) -> Result<Vec<Placeholder>> {
    let markers: Vec<Placeholder> = MARKER
        .find_iter(sql)
        .map(|m| match m.as_str().strip_prefix(':') {
            Some(name) => Placeholder::Named(name.to_string()),
            None => Placeholder::Positional,
        })
        .collect();

    let named = markers.iter().filter(|m| m.name().is_some()).count();
    if named > 0 && named < markers.len() {
        return Err(Error::MixedPlaceholders);
    }
    if markers.len() > param_count {
        return Err(Error::TooManyPlaceholders {
            found: markers.len(),
            reported: param_count,
        });
    }
    if markers.len() < param_count {
        return Err(Error::MissingPlaceholders {
            found: markers.len(),
            reported: param_count,
        });
    }
    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_named_markers() {
        let found = scan("UPDATE t SET a = :X WHERE b = :Y", 2).unwrap();
        assert_eq!(
            found,
            vec![
                Placeholder::Named("X".to_string()),
                Placeholder::Named("Y".to_string())
            ]
        );
    }

    #[test]
    fn test_positional_markers() {
        let found = scan("INSERT INTO t VALUES (?, ?)", 2).unwrap();
        assert_eq!(found, vec![Placeholder::Positional, Placeholder::Positional]);
    }

    #[test]
    fn test_mixed_markers_fail() {
        assert!(matches!(
            scan("SELECT * FROM t WHERE a = ? AND b = :B", 2),
            Err(Error::MixedPlaceholders)
        ));
        // Checked before the counts
        assert!(matches!(
            scan("SELECT * FROM t WHERE a = ? AND b = :B", 5),
            Err(Error::MixedPlaceholders)
        ));
    }

    #[test]
    fn test_count_mismatch() {
        assert!(matches!(
            scan("SELECT * FROM t WHERE a = ? AND b = ?", 1),
            Err(Error::TooManyPlaceholders {
                found: 2,
                reported: 1
            })
        ));
        assert!(matches!(
            scan("SELECT * FROM t WHERE a = :A", 2),
            Err(Error::MissingPlaceholders {
                found: 1,
                reported: 2
            })
        ));
    }

    #[test]
    fn test_markers_in_literals_are_counted() {
        assert!(matches!(
            scan("SELECT '12:30' FROM t WHERE a = :A", 1),
            Err(Error::TooManyPlaceholders { .. })
        ));
    }

    #[test]
    fn test_no_parameters_still_scanned() {
        assert_eq!(scan("SELECT name FROM dual", 0).unwrap(), Vec::new());
        assert!(matches!(
            scan("SELECT * FROM t WHERE a = ? AND b = :B", 0),
            Err(Error::MixedPlaceholders)
        ));
        assert!(matches!(
            scan("SELECT '12:30' FROM dual", 0),
            Err(Error::TooManyPlaceholders {
                found: 1,
                reported: 0
            })
        ));
    }

    proptest! {
        #[test]
        fn positional_markers_fill_every_slot(n in 1usize..20) {
            let sql = format!("INSERT INTO t VALUES ({})", vec!["?"; n].join(", "));
            let found = scan(&sql, n).unwrap();
            prop_assert_eq!(found.len(), n);
            prop_assert!(found.iter().all(|p| *p == Placeholder::Positional));
        }

        #[test]
        fn named_markers_keep_order(names in prop::collection::vec("[A-Z][A-Z0-9_]{0,8}", 1..10)) {
            let sql = names
                .iter()
                .map(|n| format!("c = :{n}"))
                .collect::<Vec<_>>()
                .join(" AND ");
            let found = scan(&format!("SELECT * FROM t WHERE {sql}"), names.len()).unwrap();
            let found: Vec<_> = found.iter().filter_map(|p| p.name()).collect();
            prop_assert_eq!(found, names.iter().map(String::as_str).collect::<Vec<_>>());
        }

        #[test]
        fn marker_count_must_match(n in 1usize..10, reported in 1usize..10) {
            let sql = vec!["?"; n].join(",");
            let result = scan(&sql, reported);
            prop_assert_eq!(result.is_ok(), n == reported);
        }
    }
}
