//! Per-provider request construction: outbound URL, headers, and body for
//! each of the four dynamic-object operations.

use crate::config::EndpointsConfig;
use crate::core::associations;
use crate::domain::model::{Connection, GetObjectQuery, ListObjectsQuery, Provider};
use crate::utils::error::{CrmError, Result};
use reqwest::Method;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl ProviderRequest {
    fn get(url: String, headers: Vec<(&'static str, String)>) -> Self {
        Self {
            method: Method::GET,
            url,
            headers,
            body: None,
        }
    }
}

fn account_url(connection: &Connection) -> Result<&str> {
    connection
        .account_url
        .as_deref()
        .ok_or_else(|| CrmError::MissingConfigError {
            field: "connection.account_url".to_string(),
        })
}

fn bearer_auth(connection: &Connection) -> (&'static str, String) {
    (
        "authorization",
        format!("Bearer {}", connection.access_token),
    )
}

fn zoho_auth(connection: &Connection) -> (&'static str, String) {
    (
        "authorization",
        format!("Zoho-oauthtoken {}", connection.access_token),
    )
}

fn close_headers(connection: &Connection) -> Vec<(&'static str, String)> {
    vec![
        bearer_auth(connection),
        ("accept", "application/json".to_string()),
    ]
}

fn odata_headers(connection: &Connection) -> Vec<(&'static str, String)> {
    vec![
        bearer_auth(connection),
        ("odata-maxversion", "4.0".to_string()),
        ("odata-version", "4.0".to_string()),
        ("accept", "application/json".to_string()),
    ]
}

/// Builds the get-one request for the connection's provider.
pub fn get_object(
    endpoints: &EndpointsConfig,
    connection: &Connection,
    object_type: &str,
    id: &str,
    query: &GetObjectQuery,
) -> Result<ProviderRequest> {
    let request = match connection.provider {
        Provider::Hubspot => {
            let properties = query.fields.clone().unwrap_or_default();
            let valid_associations = associations::filter_valid(&query.associations);
            let mut url = format!(
                "{}/crm/v3/objects/{}/{}?properties={}",
                endpoints.hubspot, object_type, id, properties
            );
            if !valid_associations.is_empty() {
                url.push_str(&format!("&associations={}", valid_associations.join(",")));
            }
            ProviderRequest::get(url, vec![bearer_auth(connection)])
        }
        Provider::Zohocrm => {
            let fields_suffix = query
                .fields
                .as_ref()
                .map(|fields| format!("?fields={}", fields))
                .unwrap_or_default();
            let url = format!(
                "{}/crm/v3/{}/{}{}",
                endpoints.zoho, object_type, id, fields_suffix
            );
            ProviderRequest::get(url, vec![zoho_auth(connection)])
        }
        Provider::Sfdc => {
            let url = format!(
                "{}/services/data/v56.0/sobjects/{}/{}",
                account_url(connection)?,
                object_type,
                id
            );
            ProviderRequest::get(url, vec![bearer_auth(connection)])
        }
        Provider::Pipedrive => {
            let url = format!("{}/v1/{}s/{}", account_url(connection)?, object_type, id);
            ProviderRequest::get(url, vec![bearer_auth(connection)])
        }
        Provider::Closecrm => {
            let url = format!("{}/api/v1/{}/{}/", endpoints.close, object_type, id);
            ProviderRequest::get(url, close_headers(connection))
        }
        Provider::MsDynamics365Sales => {
            let url = format!(
                "{}/api/data/v9.2/{}s({})",
                account_url(connection)?,
                object_type,
                id
            );
            ProviderRequest::get(url, odata_headers(connection))
        }
    };

    Ok(request)
}

/// Builds the get-many request, encoding the provider's paging vocabulary.
pub fn list_objects(
    endpoints: &EndpointsConfig,
    connection: &Connection,
    object_type: &str,
    query: &ListObjectsQuery,
) -> Result<ProviderRequest> {
    let request = match connection.provider {
        Provider::Hubspot => {
            let properties = query.fields.clone().unwrap_or_default();
            let valid_associations = associations::filter_valid(&query.associations);
            let mut url = format!(
                "{}/crm/v3/objects/{}?properties={}",
                endpoints.hubspot, object_type, properties
            );
            if let Some(page_size) = query.page_size {
                url.push_str(&format!("&limit={}", page_size));
            }
            if let Some(cursor) = &query.cursor {
                url.push_str(&format!("&after={}", cursor));
            }
            if !valid_associations.is_empty() {
                url.push_str(&format!("&associations={}", valid_associations.join(",")));
            }
            ProviderRequest::get(url, vec![bearer_auth(connection)])
        }
        Provider::Zohocrm => {
            let fields = query.fields.clone().unwrap_or_default();
            let mut url = format!("{}/crm/v3/{}?fields={}", endpoints.zoho, object_type, fields);
            if let Some(page_size) = query.page_size {
                url.push_str(&format!("&per_page={}", page_size));
            }
            if let Some(cursor) = &query.cursor {
                url.push_str(&format!("&page_token={}", cursor));
            }
            ProviderRequest::get(url, vec![zoho_auth(connection)])
        }
        Provider::Sfdc => {
            let mut paging = String::new();
            if let Some(page_size) = query.page_size {
                paging.push_str(&format!("ORDER+BY+Id+DESC+LIMIT+{}+", page_size));
            }
            if let Some(cursor) = &query.cursor {
                paging.push_str(&format!("OFFSET+{}", cursor));
            }
            if query.page_size.is_none() && query.cursor.is_none() {
                paging = "LIMIT+200".to_string();
            }

            let soql = match query.fields.as_deref() {
                None | Some("ALL") => {
                    format!("SELECT+fields(all)+from+{}+{}", object_type, paging)
                }
                Some(fields) => format!(
                    "SELECT+{}+from+{}+{}",
                    fields.split(',').collect::<Vec<_>>().join("+,+"),
                    object_type,
                    paging
                ),
            };

            let url = format!(
                "{}/services/data/v56.0/query/?q={}",
                account_url(connection)?,
                soql
            );
            ProviderRequest::get(url, vec![bearer_auth(connection)])
        }
        Provider::Pipedrive => {
            let mut url = format!("{}/v1/{}s?", account_url(connection)?, object_type);
            if let Some(page_size) = query.page_size {
                url.push_str(&format!("&limit={}", page_size));
            }
            if let Some(cursor) = &query.cursor {
                url.push_str(&format!("&start={}", cursor));
            }
            ProviderRequest::get(url, vec![bearer_auth(connection)])
        }
        Provider::Closecrm => {
            let mut url = format!("{}/api/v1/{}/?", endpoints.close, object_type);
            if let Some(page_size) = query.page_size {
                url.push_str(&format!("&_limit={}", page_size));
            }
            if let Some(cursor) = &query.cursor {
                url.push_str(&format!("&_skip={}", cursor));
            }
            ProviderRequest::get(url, close_headers(connection))
        }
        Provider::MsDynamics365Sales => {
            // The inbound cursor is the vendor's full @odata.nextLink URL;
            // only its query string is carried over.
            let mut params = Vec::new();
            if let Some(fields) = &query.fields {
                params.push(format!("$select={}", fields));
            }
            if let Some(paging) = query
                .cursor
                .as_deref()
                .and_then(|cursor| cursor.split_once('?'))
                .map(|(_, query_string)| query_string)
            {
                params.push(paging.to_string());
            }

            let url = format!(
                "{}/api/data/v9.2/{}s?{}",
                account_url(connection)?,
                object_type,
                params.join("&")
            );

            let mut headers = odata_headers(connection);
            if let Some(page_size) = query.page_size {
                headers.push(("prefer", format!("odata.maxpagesize={}", page_size)));
            }
            ProviderRequest::get(url, headers)
        }
    };

    Ok(request)
}

/// Builds the create request. HubSpot and Zoho wrap the caller payload in
/// their envelope; the rest post it as-is.
pub fn create_object(
    endpoints: &EndpointsConfig,
    connection: &Connection,
    object_type: &str,
    body: &Value,
) -> Result<ProviderRequest> {
    let request = match connection.provider {
        Provider::Hubspot => ProviderRequest {
            method: Method::POST,
            url: format!("{}/crm/v3/objects/{}", endpoints.hubspot, object_type),
            headers: vec![bearer_auth(connection)],
            body: Some(json!({ "properties": body })),
        },
        Provider::Zohocrm => ProviderRequest {
            method: Method::POST,
            url: format!("{}/crm/v3/{}", endpoints.zoho, object_type),
            headers: vec![zoho_auth(connection)],
            body: Some(json!({ "data": [body] })),
        },
        Provider::Sfdc => ProviderRequest {
            method: Method::POST,
            url: format!(
                "{}/services/data/v56.0/sobjects/{}/",
                account_url(connection)?,
                object_type
            ),
            headers: vec![bearer_auth(connection)],
            body: Some(body.clone()),
        },
        Provider::Pipedrive => ProviderRequest {
            method: Method::POST,
            url: format!("{}/v1/{}s", account_url(connection)?, object_type),
            headers: vec![bearer_auth(connection)],
            body: Some(body.clone()),
        },
        Provider::Closecrm => ProviderRequest {
            method: Method::POST,
            url: format!("{}/api/v1/{}/", endpoints.close, object_type),
            headers: close_headers(connection),
            body: Some(body.clone()),
        },
        Provider::MsDynamics365Sales => ProviderRequest {
            method: Method::POST,
            url: format!(
                "{}/api/data/v9.2/{}s",
                account_url(connection)?,
                object_type
            ),
            headers: odata_headers(connection),
            body: Some(body.clone()),
        },
    };

    Ok(request)
}

/// Builds the update request. Salesforce and MS Dynamics return no body on
/// success; the service re-fetches the record afterwards.
pub fn update_object(
    endpoints: &EndpointsConfig,
    connection: &Connection,
    object_type: &str,
    id: &str,
    body: &Value,
) -> Result<ProviderRequest> {
    let request = match connection.provider {
        Provider::Hubspot => ProviderRequest {
            method: Method::PATCH,
            url: format!(
                "{}/crm/v3/objects/{}/{}",
                endpoints.hubspot, object_type, id
            ),
            headers: vec![bearer_auth(connection)],
            body: Some(json!({ "properties": body })),
        },
        Provider::Zohocrm => ProviderRequest {
            method: Method::PUT,
            url: format!("{}/crm/v3/{}/{}", endpoints.zoho, object_type, id),
            headers: vec![zoho_auth(connection)],
            body: Some(json!({ "data": [body] })),
        },
        Provider::Sfdc => ProviderRequest {
            method: Method::PATCH,
            url: format!(
                "{}/services/data/v56.0/sobjects/{}/{}",
                account_url(connection)?,
                object_type,
                id
            ),
            headers: vec![bearer_auth(connection)],
            body: Some(body.clone()),
        },
        Provider::Pipedrive => ProviderRequest {
            method: Method::PUT,
            url: format!("{}/v1/{}s/{}", account_url(connection)?, object_type, id),
            headers: vec![bearer_auth(connection)],
            body: Some(body.clone()),
        },
        Provider::Closecrm => ProviderRequest {
            method: Method::PUT,
            url: format!("{}/api/v1/{}/{}", endpoints.close, object_type, id),
            headers: close_headers(connection),
            body: Some(body.clone()),
        },
        Provider::MsDynamics365Sales => ProviderRequest {
            method: Method::PATCH,
            url: format!(
                "{}/api/data/v9.2/{}s({})",
                account_url(connection)?,
                object_type,
                id
            ),
            headers: odata_headers(connection),
            body: Some(body.clone()),
        },
    };

    Ok(request)
}
