use crate::config::{AdapterConfig, EndpointsConfig};
use crate::core::associations;
use crate::core::pagination::{self, PageCursors};
use crate::core::request::{self, ProviderRequest};
use crate::domain::model::{
    Account, Connection, GetObjectQuery, ListObjectsQuery, ObjectListResponse, ObjectResponse,
    Provider, Record, ResponseStatus, WriteResponse,
};
use crate::domain::ports::{Unifier, UnifyContext};
use crate::utils::error::{CrmError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, Validate};
use futures::future;
use serde_json::Value;
use std::time::Duration;

/// Unified CRUD adapter for dynamic CRM objects. Each call dispatches on
/// the connection's provider, performs the vendor REST call, and unifies
/// the raw payload before returning the canonical envelope.
pub struct DynamicObjectService<U: Unifier> {
    client: reqwest::Client,
    endpoints: EndpointsConfig,
    unifier: U,
}

impl<U: Unifier> DynamicObjectService<U> {
    pub fn new(unifier: U) -> Result<Self> {
        Self::with_config(AdapterConfig::default(), unifier)
    }

    pub fn with_config(config: AdapterConfig, unifier: U) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoints: config.endpoints,
            unifier,
        })
    }

    /// Fetches one dynamic object and unifies it.
    pub async fn get_object(
        &self,
        connection: &Connection,
        account: &Account,
        object_type: &str,
        id: &str,
        query: &GetObjectQuery,
    ) -> Result<ObjectResponse> {
        self.get_object_inner(connection, account, object_type, id, query)
            .await
            .map_err(Self::to_public)
    }

    /// Fetches one page of dynamic objects with normalized cursors.
    pub async fn list_objects(
        &self,
        connection: &Connection,
        account: &Account,
        object_type: &str,
        query: &ListObjectsQuery,
    ) -> Result<ObjectListResponse> {
        self.list_objects_inner(connection, account, object_type, query)
            .await
            .map_err(Self::to_public)
    }

    /// Creates a dynamic object from the caller's payload.
    pub async fn create_object(
        &self,
        connection: &Connection,
        account: &Account,
        object_type: &str,
        body: &Record,
    ) -> Result<WriteResponse> {
        self.create_object_inner(connection, account, object_type, body)
            .await
            .map_err(Self::to_public)
    }

    /// Updates a dynamic object. Providers whose update call returns no
    /// body (Salesforce, MS Dynamics) get a follow-up fetch.
    pub async fn update_object(
        &self,
        connection: &Connection,
        account: &Account,
        object_type: &str,
        id: &str,
        body: &Record,
    ) -> Result<WriteResponse> {
        self.update_object_inner(connection, account, object_type, id, body)
            .await
            .map_err(Self::to_public)
    }

    async fn get_object_inner(
        &self,
        connection: &Connection,
        account: &Account,
        object_type: &str,
        id: &str,
        query: &GetObjectQuery,
    ) -> Result<ObjectResponse> {
        validate_non_empty_string("object_type", object_type)?;
        validate_non_empty_string("id", id)?;

        let provider = connection.provider;
        tracing::info!(
            %provider,
            account_id = %account.id,
            object_type,
            id,
            "GET dynamic object"
        );

        let req = request::get_object(&self.endpoints, connection, object_type, id, query)?;
        let raw = self.execute(req, provider).await?;
        let record = single_record(provider, raw)?;

        let ctx = UnifyContext {
            provider,
            object_type,
            connection,
            account,
        };
        let result = self.unifier.unify(record, &ctx).await?;

        Ok(ObjectResponse {
            status: ResponseStatus::Ok,
            result,
        })
    }

    async fn list_objects_inner(
        &self,
        connection: &Connection,
        account: &Account,
        object_type: &str,
        query: &ListObjectsQuery,
    ) -> Result<ObjectListResponse> {
        validate_non_empty_string("object_type", object_type)?;
        if let Some(page_size) = query.page_size {
            validate_positive_number("page_size", page_size, 1)?;
        }

        let provider = connection.provider;
        tracing::info!(
            %provider,
            account_id = %account.id,
            object_type,
            page_size = ?query.page_size,
            cursor = ?query.cursor,
            "GET all dynamic objects"
        );

        let req = request::list_objects(&self.endpoints, connection, object_type, query)?;
        let raw = self.execute(req, provider).await?;

        let cursors = page_cursors(provider, &raw, query);
        let records = list_records(provider, raw)?;

        let ctx = UnifyContext {
            provider,
            object_type,
            connection,
            account,
        };
        // Fan out unification across the page; try_join_all keeps input order.
        let results = future::try_join_all(
            records
                .into_iter()
                .map(|record| self.unifier.unify(record, &ctx)),
        )
        .await?;

        Ok(ObjectListResponse {
            status: ResponseStatus::Ok,
            next: cursors.next,
            previous: cursors.previous,
            results,
        })
    }

    async fn create_object_inner(
        &self,
        connection: &Connection,
        account: &Account,
        object_type: &str,
        body: &Record,
    ) -> Result<WriteResponse> {
        validate_non_empty_string("object_type", object_type)?;

        let provider = connection.provider;
        tracing::info!(
            %provider,
            account_id = %account.id,
            object_type,
            "CREATE dynamic object"
        );

        let body_value = serde_json::to_value(body)?;
        let req = request::create_object(&self.endpoints, connection, object_type, &body_value)?;
        let raw = self.execute(req, provider).await?;
        let record = single_record(provider, raw)?;

        let ctx = UnifyContext {
            provider,
            object_type,
            connection,
            account,
        };
        let result = self.unifier.unify(record, &ctx).await?;

        Ok(WriteResponse {
            status: ResponseStatus::Ok,
            message: format!("{} created in {}", object_type, provider.display_name()),
            result,
        })
    }

    async fn update_object_inner(
        &self,
        connection: &Connection,
        account: &Account,
        object_type: &str,
        id: &str,
        body: &Record,
    ) -> Result<WriteResponse> {
        validate_non_empty_string("object_type", object_type)?;
        validate_non_empty_string("id", id)?;

        let provider = connection.provider;
        tracing::info!(
            %provider,
            account_id = %account.id,
            object_type,
            id,
            "UPDATE dynamic object"
        );

        let body_value = serde_json::to_value(body)?;
        let req = request::update_object(&self.endpoints, connection, object_type, id, &body_value)?;
        let raw = self.execute(req, provider).await?;

        let record = match provider {
            // These vendors acknowledge the update without a body.
            Provider::Sfdc | Provider::MsDynamics365Sales => {
                let fetch = request::get_object(
                    &self.endpoints,
                    connection,
                    object_type,
                    id,
                    &GetObjectQuery::default(),
                )?;
                let fetched = self.execute(fetch, provider).await?;
                single_record(provider, fetched)?
            }
            _ => single_record(provider, raw)?,
        };

        let ctx = UnifyContext {
            provider,
            object_type,
            connection,
            account,
        };
        let result = self.unifier.unify(record, &ctx).await?;

        Ok(WriteResponse {
            status: ResponseStatus::Ok,
            message: format!("{} updated in {}", object_type, provider.display_name()),
            result,
        })
    }

    async fn execute(&self, req: ProviderRequest, provider: Provider) -> Result<Value> {
        tracing::debug!(%provider, method = %req.method, url = %req.url, "dispatching vendor request");

        let mut builder = self.client.request(req.method, &req.url);
        for (name, value) in &req.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(CrmError::RemoteApiError {
                provider: provider.display_name().to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn to_public(err: CrmError) -> CrmError {
        if err.is_recognized() {
            err
        } else {
            tracing::error!(error = %err, "dynamic object request failed");
            CrmError::InternalError
        }
    }
}

fn unexpected(provider: Provider, context: &str) -> CrmError {
    CrmError::UnexpectedPayload {
        provider: provider.display_name().to_string(),
        context: context.to_string(),
    }
}

/// Pulls the single raw record out of a vendor response.
fn single_record(provider: Provider, raw: Value) -> Result<Record> {
    let value = match provider {
        Provider::Hubspot => flatten_hubspot_object(raw),
        Provider::Zohocrm => raw
            .pointer("/data/0")
            .cloned()
            .ok_or_else(|| unexpected(provider, "missing data[0]"))?,
        Provider::Pipedrive => raw
            .get("data")
            .cloned()
            .ok_or_else(|| unexpected(provider, "missing data member"))?,
        Provider::Sfdc | Provider::Closecrm | Provider::MsDynamics365Sales => raw,
    };

    Record::from_value(value).ok_or_else(|| unexpected(provider, "record is not a JSON object"))
}

/// Pulls the raw record page out of a vendor list response. An empty body
/// (Zoho returns 204 on empty result sets) yields an empty page.
fn list_records(provider: Provider, raw: Value) -> Result<Vec<Record>> {
    if raw.is_null() {
        return Ok(Vec::new());
    }

    let member = match provider {
        Provider::Hubspot => "results",
        Provider::Zohocrm | Provider::Pipedrive | Provider::Closecrm => "data",
        Provider::Sfdc => "records",
        Provider::MsDynamics365Sales => "value",
    };

    let items = match raw.get(member) {
        Some(Value::Array(items)) => items.clone(),
        _ => return Err(unexpected(provider, &format!("missing {} array", member))),
    };

    items
        .into_iter()
        .map(|item| {
            let value = match provider {
                Provider::Hubspot => flatten_hubspot_object(item),
                _ => item,
            };
            Record::from_value(value).ok_or_else(|| unexpected(provider, "record is not a JSON object"))
        })
        .collect()
}

/// HubSpot keeps the interesting fields under `properties` and associated
/// record ids under `associations`; both are folded into the record root
/// before unification.
fn flatten_hubspot_object(raw: Value) -> Value {
    let association_ids = associations::collect_association_ids(&raw);

    let mut map = match raw {
        Value::Object(map) => map,
        other => return other,
    };

    if let Some(Value::Object(properties)) = map.get("properties").cloned() {
        for (key, value) in properties {
            map.insert(key, value);
        }
    }
    if let Some(ids) = association_ids {
        map.insert("associations".to_string(), ids);
    }

    Value::Object(map)
}

fn page_cursors(provider: Provider, raw: &Value, query: &ListObjectsQuery) -> PageCursors {
    match provider {
        Provider::Hubspot => pagination::hubspot(raw),
        Provider::Zohocrm => pagination::zoho(raw),
        Provider::Sfdc => pagination::sfdc(raw, query.page_size, query.cursor.as_deref()),
        Provider::Pipedrive => pagination::pipedrive(raw),
        Provider::Closecrm => pagination::closecrm(raw, query.page_size, query.cursor.as_deref()),
        Provider::MsDynamics365Sales => pagination::ms_dynamics(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_record_extraction_per_provider() {
        let zoho = json!({"data": [{"id": "z1"}]});
        let record = single_record(Provider::Zohocrm, zoho).unwrap();
        assert_eq!(record.data.get("id").unwrap(), "z1");

        let pipedrive = json!({"success": true, "data": {"id": 5}});
        let record = single_record(Provider::Pipedrive, pipedrive).unwrap();
        assert_eq!(record.data.get("id").unwrap(), 5);

        let close = json!({"id": "c1", "status": "open"});
        let record = single_record(Provider::Closecrm, close).unwrap();
        assert_eq!(record.data.get("id").unwrap(), "c1");
    }

    #[test]
    fn test_single_record_rejects_missing_members() {
        let err = single_record(Provider::Zohocrm, json!({"data": []})).unwrap_err();
        assert!(matches!(err, CrmError::UnexpectedPayload { .. }));

        let err = single_record(Provider::Pipedrive, json!({"success": false})).unwrap_err();
        assert!(matches!(err, CrmError::UnexpectedPayload { .. }));
    }

    #[test]
    fn test_flatten_hubspot_object_merges_properties_and_associations() {
        let raw = json!({
            "id": "42",
            "properties": {"dealname": "Acme", "amount": "1000"},
            "associations": {
                "contacts": {"results": [{"id": "7"}]}
            }
        });

        let record = single_record(Provider::Hubspot, raw).unwrap();
        assert_eq!(record.data.get("id").unwrap(), "42");
        assert_eq!(record.data.get("dealname").unwrap(), "Acme");
        assert_eq!(
            record.data.get("associations").unwrap(),
            &json!({"contacts": ["7"]})
        );
    }

    #[test]
    fn test_list_records_empty_body_yields_empty_page() {
        let records = list_records(Provider::Zohocrm, Value::Null).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_list_records_missing_member_is_unexpected() {
        let err = list_records(Provider::Sfdc, json!({"totalSize": 0})).unwrap_err();
        assert!(matches!(err, CrmError::UnexpectedPayload { .. }));
    }

    #[test]
    fn test_to_public_collapses_unrecognized_errors() {
        let internal = DynamicObjectService::<crate::core::unify::NoopUnifier>::to_public(
            CrmError::UnexpectedPayload {
                provider: "Hubspot".to_string(),
                context: "missing results array".to_string(),
            },
        );
        assert!(matches!(internal, CrmError::InternalError));

        // Vendor rejections carry status/body for the log but never reach
        // the caller as-is.
        let vendor = DynamicObjectService::<crate::core::unify::NoopUnifier>::to_public(
            CrmError::RemoteApiError {
                provider: "Zoho".to_string(),
                status: 404,
                body: "{}".to_string(),
            },
        );
        assert!(matches!(vendor, CrmError::InternalError));

        let recognized = DynamicObjectService::<crate::core::unify::NoopUnifier>::to_public(
            CrmError::UnsupportedProvider {
                provider: "freshsales".to_string(),
            },
        );
        assert!(matches!(recognized, CrmError::UnsupportedProvider { .. }));
    }
}
