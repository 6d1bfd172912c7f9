use crate::domain::model::Record;
use crate::domain::ports::{MappingStore, Unifier, UnifyContext};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Tenant field mapping: canonical field name -> provider field path.
/// Paths support nested access with `.` separators (`owner.email`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FieldMapping {
    pub fields: HashMap<String, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Applies the mapping to one raw record. Mapped top-level source
    /// fields are consumed; everything else passes through so dynamic
    /// objects keep their vendor extras. Nested source paths leave the
    /// containing object in place.
    pub fn apply(&self, record: Record) -> Record {
        let source = record.data;
        let mut mapped: HashMap<String, serde_json::Value> = HashMap::new();
        let mut consumed_roots: HashSet<&str> = HashSet::new();

        for (canonical, path) in &self.fields {
            if let Some(value) = lookup_path(&source, path) {
                mapped.insert(canonical.clone(), value);
                if !path.contains('.') {
                    consumed_roots.insert(path.as_str());
                }
            }
        }

        let mut data: HashMap<String, serde_json::Value> = source
            .into_iter()
            .filter(|(key, _)| !consumed_roots.contains(key.as_str()))
            .collect();
        data.extend(mapped);

        Record { data }
    }
}

fn lookup_path(data: &HashMap<String, serde_json::Value>, path: &str) -> Option<serde_json::Value> {
    let mut segments = path.split('.');
    let root = segments.next()?;
    let mut current = data.get(root)?;
    for segment in segments {
        current = current.get(segment)?;
    }
    Some(current.clone())
}

/// Unifier that resolves the tenant mapping through a [`MappingStore`] and
/// applies it. No configured mapping means identity unification.
pub struct SchemaUnifier<M: MappingStore> {
    store: M,
}

impl<M: MappingStore> SchemaUnifier<M> {
    pub fn new(store: M) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<M: MappingStore> Unifier for SchemaUnifier<M> {
    async fn unify(&self, raw: Record, ctx: &UnifyContext<'_>) -> Result<Record> {
        let mapping = self
            .store
            .mapping_for(
                ctx.connection.schema_mapping_id.as_deref(),
                ctx.account.field_mapping_config.as_ref(),
                ctx.provider,
                ctx.object_type,
            )
            .await?;

        match mapping {
            Some(mapping) => Ok(mapping.apply(raw)),
            None => Ok(raw),
        }
    }
}

/// In-memory mapping store keyed by (schema mapping id, object type). The
/// tenant schema mapping wins; the account-level config is the fallback.
/// Production deployments back this trait with the mapping config store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMappingStore {
    mappings: HashMap<(String, String), FieldMapping>,
}

impl InMemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        schema_mapping_id: impl Into<String>,
        object_type: impl Into<String>,
        mapping: FieldMapping,
    ) {
        self.mappings
            .insert((schema_mapping_id.into(), object_type.into()), mapping);
    }
}

#[async_trait]
impl MappingStore for InMemoryMappingStore {
    async fn mapping_for(
        &self,
        schema_mapping_id: Option<&str>,
        account_mapping: Option<&FieldMapping>,
        _provider: crate::domain::model::Provider,
        object_type: &str,
    ) -> Result<Option<FieldMapping>> {
        if let Some(schema_id) = schema_mapping_id {
            if let Some(mapping) = self
                .mappings
                .get(&(schema_id.to_string(), object_type.to_string()))
            {
                return Ok(Some(mapping.clone()));
            }
        }
        Ok(account_mapping.cloned())
    }
}

/// Identity unifier for callers that do their own mapping downstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopUnifier;

#[async_trait]
impl Unifier for NoopUnifier {
    async fn unify(&self, raw: Record, _ctx: &UnifyContext<'_>) -> Result<Record> {
        Ok(raw)
    }
}
