use crate::utils::error::{CrmError, Result};
use crate::utils::validation::{validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const HUBSPOT_BASE_URL: &str = "https://api.hubapi.com";
pub const ZOHO_BASE_URL: &str = "https://www.zohoapis.com";
pub const CLOSE_BASE_URL: &str = "https://api.close.com";

/// Adapter configuration, loadable from TOML with `${ENV_VAR}` substitution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub http: HttpConfig,
    pub endpoints: EndpointsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
}

/// Base URLs for providers with fixed vendor hosts. Salesforce, Pipedrive
/// and MS Dynamics use the per-connection account URL instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub hubspot: String,
    pub zoho: String,
    pub close: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            endpoints: EndpointsConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            hubspot: HUBSPOT_BASE_URL.to_string(),
            zoho: ZOHO_BASE_URL.to_string(),
            close: CLOSE_BASE_URL.to_string(),
        }
    }
}

impl AdapterConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CrmError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CrmError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` placeholders with environment values. Unset
    /// variables keep the placeholder text.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CrmError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("endpoints.hubspot", &self.endpoints.hubspot)?;
        validate_url("endpoints.zoho", &self.endpoints.zoho)?;
        validate_url("endpoints.close", &self.endpoints.close)?;

        if self.http.timeout_seconds == 0 {
            return Err(CrmError::InvalidInputError {
                field: "http.timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }
}

impl Validate for AdapterConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_point_at_vendor_hosts() {
        let config = AdapterConfig::default();
        assert_eq!(config.endpoints.hubspot, "https://api.hubapi.com");
        assert_eq!(config.endpoints.zoho, "https://www.zohoapis.com");
        assert_eq!(config.endpoints.close, "https://api.close.com");
        assert_eq!(config.http.timeout_seconds, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[http]
timeout_seconds = 10

[endpoints]
hubspot = "http://localhost:9000"
"#;

        let config = AdapterConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.http.timeout_seconds, 10);
        assert_eq!(config.endpoints.hubspot, "http://localhost:9000");
        // Untouched endpoints keep their vendor defaults.
        assert_eq!(config.endpoints.zoho, "https://www.zohoapis.com");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CRM_BRIDGE_TEST_HUBSPOT", "http://mock.internal:8080");

        let toml_content = r#"
[endpoints]
hubspot = "${CRM_BRIDGE_TEST_HUBSPOT}"
"#;

        let config = AdapterConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.endpoints.hubspot, "http://mock.internal:8080");

        std::env::remove_var("CRM_BRIDGE_TEST_HUBSPOT");
    }

    #[test]
    fn test_config_validation_rejects_bad_endpoint() {
        let toml_content = r#"
[endpoints]
zoho = "not-a-url"
"#;

        let config = AdapterConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[http]
timeout_seconds = 5
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = AdapterConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.http.timeout_seconds, 5);
    }
}
