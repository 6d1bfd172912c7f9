use crate::core::unify::FieldMapping;
use crate::domain::model::{Account, Connection, Provider, Record};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Context handed to the unification step alongside each raw record.
#[derive(Debug, Clone, Copy)]
pub struct UnifyContext<'a> {
    pub provider: Provider,
    pub object_type: &'a str,
    pub connection: &'a Connection,
    pub account: &'a Account,
}

/// Maps a raw provider record into the canonical field schema.
#[async_trait]
pub trait Unifier: Send + Sync {
    async fn unify(&self, raw: Record, ctx: &UnifyContext<'_>) -> Result<Record>;
}

/// External store holding tenant-specific field mappings. Implementations
/// see both the connection's schema mapping id and the account-level
/// mapping config. Returning None means no mapping is configured and the
/// record passes through unchanged.
#[async_trait]
pub trait MappingStore: Send + Sync {
    async fn mapping_for(
        &self,
        schema_mapping_id: Option<&str>,
        account_mapping: Option<&FieldMapping>,
        provider: Provider,
        object_type: &str,
    ) -> Result<Option<FieldMapping>>;
}
