//! Attribute naming strategies.
//!
//! Declared attribute names are whatever the [`Resource`](crate::Resource)
//! implementation lists in its field descriptors (typically the Rust field
//! name). A strategy maps those to wire names on both the read and write path,
//! so a `first_name` field can travel as `first-name` or `firstName`.

/// Mapping from declared attribute names to wire attribute names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingStrategy {
    /// Use declared names unchanged.
    #[default]
    AsDeclared,
    /// `first-name`
    KebabCase,
    /// `first_name`
    SnakeCase,
    /// `firstName`
    CamelCase,
}

impl NamingStrategy {
    pub fn apply(self, declared: &str) -> String {
        match self {
            NamingStrategy::AsDeclared => declared.to_string(),
            NamingStrategy::KebabCase => words(declared).join("-"),
            NamingStrategy::SnakeCase => words(declared).join("_"),
            NamingStrategy::CamelCase => {
                let mut out = String::with_capacity(declared.len());
                for (i, word) in words(declared).iter().enumerate() {
                    if i == 0 {
                        out.push_str(word);
                        continue;
                    }
                    let mut chars = word.chars();
                    if let Some(first) = chars.next() {
                        out.extend(first.to_uppercase());
                        out.push_str(chars.as_str());
                    }
                }
                out
            }
        }
    }
}

/// Splits on `_`, `-` and lower-to-upper case boundaries; words come back lowercase.
fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in name.chars() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
