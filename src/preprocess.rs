//! Textual normalization.
//!
//! Two kinds of rewrite run on raw text rather than on the tree:
//!
//! - the global charset rewrite, applied once to the whole script before
//!   any parsing;
//! - the fallback rules, applied to a single statement's original text only
//!   after the direct attempt for that statement failed.
//!
//! Every rule is a case-insensitive regex with no shared state.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;

static RE_UTF8MB4: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)utf8mb4").unwrap());

static DEFAULT_RULES: Lazy<Vec<PreprocessingRule>> = Lazy::new(|| {
    vec![
        PreprocessingRule::new("index_method_hint", r"(?i)USING\s+BTREE", ""),
        PreprocessingRule::new("on_update_timestamp", r"(?i)ON\s+UPDATE\s+CURRENT_TIMESTAMP", ""),
        PreprocessingRule::new("row_format", r"(?i)ROW_FORMAT\s*=\s*\w+", ""),
        // The `=` keeps the column-level AUTO_INCREMENT keyword out of reach.
        PreprocessingRule::new("auto_increment_seed", r"(?i)AUTO_INCREMENT\s*=\s*\d+", ""),
    ]
});

/// One `(pattern, replacement)` text rewrite.
#[derive(Debug, Clone)]
pub struct PreprocessingRule {
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl PreprocessingRule {
    /// Build a rule from a pattern known to be valid.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid regex.
    pub fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, self.replacement)
    }
}

/// Result of normalizing one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Normalized {
    pub text: String,
    /// Names of the rules that changed the text, in application order.
    pub applied: Vec<&'static str>,
}

impl Normalized {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// The ordered fallback rule list.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    rules: Vec<PreprocessingRule>,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.clone(),
        }
    }
}

impl Preprocessor {
    /// Apply every rule in order, repeating the sequence until the text is
    /// stable. Stripping one match can expose another (`USING USING BTREE
    /// BTREE`), and a single pass would then not be idempotent. Every rule
    /// deletes a non-empty match, so the loop terminates.
    pub fn normalize(&self, text: &str) -> Normalized {
        let mut current = text.to_string();
        let mut applied = Vec::new();

        loop {
            let mut changed = false;

            for rule in &self.rules {
                if let Cow::Owned(next) = rule.apply(&current) {
                    if next != current {
                        if !applied.contains(&rule.name) {
                            applied.push(rule.name);
                        }
                        changed = true;
                    }
                    current = next;
                }
            }

            if !changed {
                break;
            }
        }

        Normalized {
            text: current,
            applied,
        }
    }
}

/// Outcome of the script-level charset rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalNormalization {
    pub text: String,
    pub replacements: usize,
}

/// Rewrite every `utf8mb4` in the script to the target charset name.
pub fn normalize_script(script: &str, charset: &str) -> GlobalNormalization {
    let replacements = RE_UTF8MB4.find_iter(script).count();
    let text = match replacements {
        0 => script.to_string(),
        _ => RE_UTF8MB4
            .replace_all(script, regex::NoExpand(charset))
            .into_owned(),
    };

    GlobalNormalization { text, replacements }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_each_rule() {
        let pre = Preprocessor::default();

        assert_eq!(
            pre.normalize("ALTER TABLE t ADD INDEX idx (a) using  btree").text,
            "ALTER TABLE t ADD INDEX idx (a) "
        );
        assert_eq!(
            pre.normalize("ts TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP").text,
            "ts TIMESTAMP DEFAULT CURRENT_TIMESTAMP "
        );
        assert_eq!(
            pre.normalize("CREATE TABLE t (id INT) ROW_FORMAT = DYNAMIC").text,
            "CREATE TABLE t (id INT) "
        );
        assert_eq!(
            pre.normalize("CREATE TABLE t (id INT) auto_increment=42").text,
            "CREATE TABLE t (id INT) "
        );
    }

    #[test]
    fn test_column_auto_increment_survives() {
        let pre = Preprocessor::default();
        let text = "CREATE TABLE t (id INT NOT NULL AUTO_INCREMENT, PRIMARY KEY (id)) AUTO_INCREMENT=7";
        let normalized = pre.normalize(text);
        assert_eq!(
            normalized.text,
            "CREATE TABLE t (id INT NOT NULL AUTO_INCREMENT, PRIMARY KEY (id)) "
        );
        assert_eq!(normalized.applied, vec!["auto_increment_seed"]);
    }

    #[test]
    fn test_idempotent() {
        let pre = Preprocessor::default();
        let inputs = [
            "CREATE TABLE t (id INT) ENGINE=InnoDB ROW_FORMAT=COMPRESSED AUTO_INCREMENT=5",
            "ALTER TABLE t ADD INDEX idx (a) USING BTREE",
            "ts TIMESTAMP ON UPDATE CURRENT_TIMESTAMP",
            "USING USING BTREE BTREE",
            "SELECT 1",
            "",
        ];
        let nested = format!("{}{}", "USING ".repeat(20), "BTREE ".repeat(20));
        for input in inputs.into_iter().chain([nested.as_str()]) {
            let once = pre.normalize(input).text;
            let twice = pre.normalize(&once);
            assert_eq!(twice.text, once, "input: {input}");
        }
    }

    #[test]
    fn test_unchanged_text_reports_no_rules() {
        let normalized = Preprocessor::default().normalize("SELECT * FROM users");
        assert!(!normalized.changed());
        assert_eq!(normalized.text, "SELECT * FROM users");
    }

    #[test]
    fn test_normalize_script_charset() {
        let result = normalize_script(
            "CREATE TABLE t (a VARCHAR(10) CHARACTER SET utf8mb4) DEFAULT CHARSET=UTF8MB4;",
            "UTF8",
        );
        assert_eq!(result.replacements, 2);
        assert_eq!(
            result.text,
            "CREATE TABLE t (a VARCHAR(10) CHARACTER SET UTF8) DEFAULT CHARSET=UTF8;"
        );

        let untouched = normalize_script("SELECT 1", "UTF8");
        assert_eq!(untouched.replacements, 0);
    }
}
