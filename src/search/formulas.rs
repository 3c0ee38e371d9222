//! The external formula table.
//!
//! Maps a target's digit string (e.g. "123") to a formula that produces
//! that integer from the shared number pool. The table ships as JSON with
//! the shape `{"results": [{"number": ..., "formula": ...}]}`; `number`
//! may be a JSON string or integer. Formulas written with `factorial(x)`
//! calls are normalized to postfix `(x)!` so they match the notation the
//! expression editor produces.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors loading a formula table from disk.
#[derive(Debug, Error)]
pub enum FormulaTableError {
    #[error("failed to read formula file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse formula file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("formula entry has a non-scalar number")]
    BadNumber,
}

#[derive(Debug, Deserialize)]
struct FormulaFile {
    results: Vec<FormulaEntry>,
}

#[derive(Debug, Deserialize)]
struct FormulaEntry {
    number: serde_json::Value,
    formula: String,
}

/// Lookup table from digit string to formula.
#[derive(Debug, Clone, Default)]
pub struct FormulaTable {
    entries: HashMap<String, String>,
}

impl FormulaTable {
    /// Builds a table from (digit string, formula) pairs. Formulas are
    /// normalized to postfix factorial notation.
    pub fn from_entries<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(digits, formula)| (digits.into(), rewrite_factorials(formula.as_ref())))
            .collect();
        FormulaTable { entries }
    }

    /// Parses the JSON table format.
    pub fn from_json_str(json: &str) -> Result<Self, FormulaTableError> {
        let file: FormulaFile = serde_json::from_str(json)?;
        let mut entries = HashMap::with_capacity(file.results.len());
        for entry in file.results {
            let digits = match entry.number {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                _ => return Err(FormulaTableError::BadNumber),
            };
            entries.insert(digits, rewrite_factorials(&entry.formula));
        }
        Ok(FormulaTable { entries })
    }

    /// Reads and parses a table from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FormulaTableError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Looks up the formula for a digit string.
    pub fn get(&self, digits: &str) -> Option<&str> {
        self.entries.get(digits).map(String::as_str)
    }

    /// Number of targets the table covers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rewrites every `factorial(x)` call into postfix `(x)!`, recursing into
/// the argument so nested calls are normalized too.
pub fn rewrite_factorials(formula: &str) -> String {
    const CALL: &str = "factorial(";
    let mut out = String::with_capacity(formula.len());
    let mut rest = formula;

    while let Some(at) = rest.find(CALL) {
        let open = at + CALL.len() - 1;
        match matching_paren(rest, open) {
            Some(close) => {
                out.push_str(&rest[..at]);
                out.push('(');
                out.push_str(&rewrite_factorials(&rest[open + 1..close]));
                out.push_str(")!");
                rest = &rest[close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Index of the `)` matching the `(` at byte index `open`, if balanced.
fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices().skip_while(|&(i, _)| i < open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_single_call() {
        assert_eq!(rewrite_factorials("factorial(4)"), "(4)!");
        assert_eq!(rewrite_factorials("factorial(4)+2"), "(4)!+2");
        assert_eq!(rewrite_factorials("2*factorial(3)-1"), "2*(3)!-1");
    }

    #[test]
    fn rewrites_multiple_and_nested_calls() {
        assert_eq!(
            rewrite_factorials("factorial(3)+factorial(4)"),
            "(3)!+(4)!"
        );
        assert_eq!(rewrite_factorials("factorial(2+1)"), "(2+1)!");
        assert_eq!(rewrite_factorials("factorial(factorial(3))"), "((3)!)!");
    }

    #[test]
    fn leaves_other_formulas_alone() {
        assert_eq!(rewrite_factorials("3*4+sqrt(2)"), "3*4+sqrt(2)");
        assert_eq!(rewrite_factorials(""), "");
    }

    #[test]
    fn parses_json_with_string_and_integer_numbers() {
        let json = r#"{
            "results": [
                {"number": "12", "formula": "3*4"},
                {"number": 56, "formula": "factorial(4)+2^5"}
            ]
        }"#;
        let table = FormulaTable::from_json_str(json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("12"), Some("3*4"));
        assert_eq!(table.get("56"), Some("(4)!+2^5"));
        assert_eq!(table.get("99"), None);
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(FormulaTable::from_json_str("not json").is_err());
        assert!(FormulaTable::from_json_str(r#"{"results": [{"number": [1], "formula": "x"}]}"#).is_err());
    }
}
