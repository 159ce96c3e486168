//! OpenAPI specification model
//!
//! Only `info.title` and `info.version` are needed; the rest of the document
//! is passed to the generator untouched.

use serde::{Deserialize, Deserializer};

/// The `info` object of an OpenAPI document
#[derive(Debug, Clone, Deserialize)]
pub struct ApiInfo {
    #[serde(deserialize_with = "scalar_string")]
    pub title: String,
    /// Release version, used verbatim as commit message suffix and tag name
    #[serde(deserialize_with = "scalar_string")]
    pub version: String,
}

/// OpenAPI specification
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSpec {
    pub info: ApiInfo,
}

impl ApiSpec {
    pub fn title(&self) -> &str {
        &self.info.title
    }

    pub fn version(&self) -> &str {
        &self.info.version
    }
}

/// Accept YAML scalars of any type as strings
///
/// Unquoted versions such as `version: 2.1` parse as numbers.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string, found {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_info() {
        let spec: ApiSpec = serde_yaml::from_str(
            r#"
openapi: 3.0.0
info:
  title: Media Delivery
  version: "1.2.0"
paths: {}
"#,
        )
        .unwrap();
        assert_eq!(spec.title(), "Media Delivery");
        assert_eq!(spec.version(), "1.2.0");
    }

    #[test]
    fn test_numeric_version() {
        let spec: ApiSpec =
            serde_yaml::from_str("info:\n  title: Upload\n  version: 2.1\n").unwrap();
        assert_eq!(spec.version(), "2.1");
    }

    #[test]
    fn test_missing_version_is_error() {
        let result: Result<ApiSpec, _> = serde_yaml::from_str("info:\n  title: Upload\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_info_is_error() {
        let result: Result<ApiSpec, _> = serde_yaml::from_str("openapi: 3.0.0\n");
        assert!(result.is_err());
    }
}
