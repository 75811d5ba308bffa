//! YAML parsing with error handling

use serde::de::DeserializeOwned;

use crate::core::config::ConfigError;

/// Parse YAML content into a typed value, naming the file in errors
pub fn parse_yaml<T: DeserializeOwned + 'static>(content: &str, filename: &str) -> Result<T, ConfigError> {
    serde_yml::from_str(content).map_err(|e| ConfigError::Yaml {
        file: filename.to_string(),
        message: e.to_string(),
    })
}

/// Parse YAML from a file path
pub fn parse_yaml_file<T: DeserializeOwned + 'static>(path: &std::path::Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let filename = path.display().to_string();
    parse_yaml(&content, &filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distribution::FlatParams;

    #[test]
    fn test_parse_valid_yaml() {
        let yaml = "min: 4\nmax: 15";
        let result: FlatParams = parse_yaml(yaml, "test.yaml").unwrap();
        assert_eq!(result, FlatParams::new(4.0, 15.0));
    }

    #[test]
    fn test_parse_invalid_yaml_names_file() {
        let yaml = "min: 4\n  invalid indentation";
        let err = parse_yaml::<FlatParams>(yaml, "diameter.yaml").unwrap_err();
        assert!(err.to_string().contains("diameter.yaml"));
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_yaml_file::<FlatParams>(std::path::Path::new("/nonexistent/x.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
