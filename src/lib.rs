pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::AdapterConfig;
pub use core::service::DynamicObjectService;
pub use core::unify::{FieldMapping, InMemoryMappingStore, NoopUnifier, SchemaUnifier};
pub use domain::model::{
    Account, Connection, GetObjectQuery, ListObjectsQuery, ObjectListResponse, ObjectResponse,
    Provider, Record, ResponseStatus, WriteResponse,
};
pub use domain::ports::{MappingStore, Unifier, UnifyContext};
pub use utils::error::{CrmError, Result};
pub use utils::logger::{init_json_logger, init_logger};
