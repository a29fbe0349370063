//! YAML parsing with diagnostic error reporting

pub mod diagnostics;

pub use diagnostics::{YamlError, YamlSyntaxError};

use serde::de::DeserializeOwned;
use std::path::Path;

/// Parse YAML text, converting syntax errors into labeled diagnostics
pub fn parse_yaml_str<T: DeserializeOwned + 'static>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content)
        .map_err(|e| YamlSyntaxError::from_serde_error(&e, content, filename).into())
}

/// Read and parse a YAML file
pub fn parse_yaml_file<T: DeserializeOwned + 'static>(path: &Path) -> Result<T, YamlError> {
    let content = std::fs::read_to_string(path)?;
    parse_yaml_str(&content, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_yaml() {
        let value: serde_json::Value = parse_yaml_str("key: 1\n", "test.yaml").unwrap();
        assert_eq!(value["key"], 1);
    }

    #[test]
    fn test_parse_invalid_yaml_is_syntax_error() {
        let result: Result<serde_json::Value, _> =
            parse_yaml_str("key: [unclosed\n", "test.yaml");
        assert!(matches!(result, Err(YamlError::Syntax(_))));
    }
}
