use serde::{Deserialize, Serialize};

/// Which OData revision's spelling of the substring function is in use.
///
/// `V4` reads and writes `contains(property, 'value')`. `V2` reads and writes
/// the legacy `substringof('value', property)`. Each dialect only accepts its
/// own spelling when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    V4,
    V2,
}

impl Dialect {
    /// Name of the substring-containment function in this dialect
    pub fn contains_function(&self) -> &'static str {
        match self {
            Dialect::V4 => "contains",
            Dialect::V2 => "substringof",
        }
    }
}

pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Settings shared by parsing and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub dialect: Dialect,
    /// Maximum parenthesis nesting accepted by the parser
    pub max_depth: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl FilterConfig {
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_partial_json() {
        let config: FilterConfig = serde_json::from_str(r#"{"dialect": "v2"}"#).unwrap();
        assert_eq!(config.dialect, Dialect::V2);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }
}
