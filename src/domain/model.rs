use crate::utils::error::CrmError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Third-party CRM providers the adapter can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Hubspot,
    Zohocrm,
    Sfdc,
    Pipedrive,
    Closecrm,
    MsDynamics365Sales,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Hubspot => "hubspot",
            Provider::Zohocrm => "zohocrm",
            Provider::Sfdc => "sfdc",
            Provider::Pipedrive => "pipedrive",
            Provider::Closecrm => "closecrm",
            Provider::MsDynamics365Sales => "ms_dynamics_365_sales",
        }
    }

    /// Vendor name as it appears in caller-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Hubspot => "Hubspot",
            Provider::Zohocrm => "Zoho",
            Provider::Sfdc => "Salesforce",
            Provider::Pipedrive => "Pipedrive",
            Provider::Closecrm => "Close CRM",
            Provider::MsDynamics365Sales => "MS Dynamics 365",
        }
    }
}

impl FromStr for Provider {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hubspot" => Ok(Provider::Hubspot),
            "zohocrm" => Ok(Provider::Zohocrm),
            "sfdc" => Ok(Provider::Sfdc),
            "pipedrive" => Ok(Provider::Pipedrive),
            "closecrm" => Ok(Provider::Closecrm),
            "ms_dynamics_365_sales" => Ok(Provider::MsDynamics365Sales),
            other => Err(CrmError::UnsupportedProvider {
                provider: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caller's stored connection to one CRM provider. Token refresh and
/// tenant resolution happen upstream; this carries the resolved values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub provider: Provider,
    pub access_token: String,
    /// Instance/account base URL for providers without a fixed host
    /// (Salesforce, Pipedrive, MS Dynamics).
    pub account_url: Option<String>,
    /// Tenant-specific schema mapping id consulted by the unification step.
    pub schema_mapping_id: Option<String>,
}

/// The tenant account on whose behalf a call is made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    /// Account-level field mapping, consulted by the mapping store when no
    /// tenant schema mapping matches.
    #[serde(default)]
    pub field_mapping_config: Option<crate::core::unify::FieldMapping>,
}

/// A dynamic CRM record: an arbitrary bag of fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Builds a record from a JSON object. Non-object values yield None.
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(map) => Some(Self {
                data: map.into_iter().collect(),
            }),
            _ => None,
        }
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

/// Query parameters for fetching a single dynamic object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetObjectQuery {
    /// Comma-separated provider field list, passed through as given.
    pub fields: Option<String>,
    /// Association type names to resolve alongside the record (HubSpot).
    #[serde(default)]
    pub associations: Vec<String>,
}

/// Query parameters for listing dynamic objects of one type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListObjectsQuery {
    pub fields: Option<String>,
    pub page_size: Option<usize>,
    /// Opaque cursor returned by a previous page of the same provider.
    pub cursor: Option<String>,
    #[serde(default)]
    pub associations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
}

/// Envelope for get-one responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectResponse {
    pub status: ResponseStatus,
    pub result: Record,
}

/// Envelope for list responses with normalized pagination cursors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectListResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    pub results: Vec<Record>,
}

/// Envelope for create/update responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub result: Record,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_round_trip() {
        for raw in [
            "hubspot",
            "zohocrm",
            "sfdc",
            "pipedrive",
            "closecrm",
            "ms_dynamics_365_sales",
        ] {
            let provider: Provider = raw.parse().unwrap();
            assert_eq!(provider.as_str(), raw);
        }
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let err = "freshsales".parse::<Provider>().unwrap_err();
        assert!(matches!(
            err,
            CrmError::UnsupportedProvider { provider } if provider == "freshsales"
        ));
    }

    #[test]
    fn test_record_from_value() {
        let record = Record::from_value(json!({"id": 1, "name": "Acme"})).unwrap();
        assert_eq!(record.data.get("name").unwrap(), "Acme");
        assert!(Record::from_value(json!([1, 2])).is_none());
        assert!(Record::from_value(json!("plain")).is_none());
    }

    #[test]
    fn test_record_serializes_transparently() {
        let record = Record::from_value(json!({"id": 7})).unwrap();
        let serialized = serde_json::to_value(&record).unwrap();
        assert_eq!(serialized, json!({"id": 7}));
    }

    #[test]
    fn test_list_response_skips_absent_cursors() {
        let response = ObjectListResponse {
            status: ResponseStatus::Ok,
            next: None,
            previous: None,
            results: vec![],
        };
        let serialized = serde_json::to_value(&response).unwrap();
        assert_eq!(serialized, json!({"status": "ok", "results": []}));
    }
}
