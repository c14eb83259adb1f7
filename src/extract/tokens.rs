//! Calculation token matching and formula rewriting.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

/// Prefix of the internal identifiers Tableau assigns to calculated fields.
pub const TOKEN_PREFIX: &str = "Calculation_";

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"Calculation_\d+").unwrap())
}

fn reference_regex() -> &'static Regex {
    static REFERENCE: OnceLock<Regex> = OnceLock::new();
    REFERENCE.get_or_init(|| Regex::new(r"\[(Calculation_\d+)\]").unwrap())
}

/// Find the first `Calculation_<digits>` token anywhere in `name`.
///
/// ```
/// use twbfields::extract::extract_token;
///
/// assert_eq!(extract_token("[Calculation_123]"), Some("Calculation_123"));
/// assert_eq!(extract_token("[Sales]"), None);
/// ```
pub fn extract_token(name: &str) -> Option<&str> {
    token_regex().find(name).map(|m| m.as_str())
}

/// Strip one layer of enclosing square brackets.
///
/// ```
/// use twbfields::extract::strip_brackets;
///
/// assert_eq!(strip_brackets("[Sales]"), "Sales");
/// assert_eq!(strip_brackets("[[Sales]]"), "[Sales]");
/// assert_eq!(strip_brackets("Sales"), "Sales");
/// ```
pub fn strip_brackets(name: &str) -> &str {
    name.strip_prefix('[')
        .and_then(|n| n.strip_suffix(']'))
        .unwrap_or(name)
}

/// Mapping from calculation token to the caption of the column owning it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    captions: HashMap<String, String>,
}

impl TokenMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the caption for a token. The last caption seen wins.
    pub fn insert(&mut self, token: impl Into<String>, caption: impl Into<String>) {
        let token = token.into();
        let caption = caption.into();
        if let Some(previous) = self.captions.insert(token.clone(), caption.clone()) {
            if previous != caption {
                debug!(
                    "Token {} captioned twice: '{}' replaced by '{}'",
                    token, previous, caption
                );
            }
        }
    }

    /// Caption recorded for a token.
    pub fn caption(&self, token: &str) -> Option<&str> {
        self.captions.get(token).map(String::as_str)
    }

    /// Number of tokens in the map.
    pub fn len(&self) -> usize {
        self.captions.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    /// Resolve a stripped field name that is itself a calculation token.
    ///
    /// Only names starting with `Calculation_` are looked up; anything else,
    /// and tokens without a caption, come back unchanged.
    pub fn resolve_name<'a>(&'a self, name: &'a str) -> &'a str {
        if !name.starts_with(TOKEN_PREFIX) {
            return name;
        }
        extract_token(name)
            .and_then(|token| self.caption(token))
            .unwrap_or(name)
    }

    /// Replace every `[Calculation_<digits>]` in `formula` with `[<caption>]`.
    ///
    /// References without a caption are left as they are.
    pub fn rewrite_formula(&self, formula: &str) -> String {
        reference_regex()
            .replace_all(formula, |caps: &Captures| match self.caption(&caps[1]) {
                Some(caption) => format!("[{}]", caption),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TokenMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TokenMap::new();
        for (token, caption) in iter {
            map.insert(token, caption);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_anywhere() {
        assert_eq!(extract_token("Calculation_1"), Some("Calculation_1"));
        assert_eq!(
            extract_token("[federated.0x1].[Calculation_9876543210]"),
            Some("Calculation_9876543210")
        );
        assert_eq!(extract_token("[Calculation_]"), None);
        assert_eq!(extract_token("calculation_12"), None);
    }

    #[test]
    fn test_strip_brackets_one_layer() {
        assert_eq!(strip_brackets("[Sales]"), "Sales");
        assert_eq!(strip_brackets("Sales"), "Sales");
        assert_eq!(strip_brackets("[Sales"), "[Sales");
        assert_eq!(strip_brackets("[]"), "");
    }

    #[test]
    fn test_last_caption_wins() {
        let mut map = TokenMap::new();
        map.insert("Calculation_1", "First");
        map.insert("Calculation_1", "Second");
        assert_eq!(map.len(), 1);
        assert_eq!(map.caption("Calculation_1"), Some("Second"));
    }

    #[test]
    fn test_resolve_name() {
        let map: TokenMap = [("Calculation_42", "Profit Ratio")].into_iter().collect();
        assert_eq!(map.resolve_name("Calculation_42"), "Profit Ratio");
        assert_eq!(map.resolve_name("Calculation_43"), "Calculation_43");
        // The literal prefix must lead the name
        assert_eq!(map.resolve_name("x_Calculation_42"), "x_Calculation_42");
    }

    #[test]
    fn test_rewrite_formula() {
        let map: TokenMap = [("Calculation_1", "Base Cost"), ("Calculation_2", "Margin")]
            .into_iter()
            .collect();

        assert_eq!(
            map.rewrite_formula("[Calculation_1]*2 + [Calculation_2] - [Calculation_1]"),
            "[Base Cost]*2 + [Margin] - [Base Cost]"
        );
        assert_eq!(
            map.rewrite_formula("SUM([Calculation_3]) / [Sales]"),
            "SUM([Calculation_3]) / [Sales]"
        );
        // Unbracketed tokens are not references
        assert_eq!(map.rewrite_formula("Calculation_1"), "Calculation_1");
        assert_eq!(map.rewrite_formula(""), "");
    }

    #[test]
    fn test_rewrite_caption_with_dollar_sign() {
        let map: TokenMap = [("Calculation_1", "Cost $1")].into_iter().collect();
        assert_eq!(map.rewrite_formula("[Calculation_1]"), "[Cost $1]");
    }
}
