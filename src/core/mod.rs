pub mod associations;
pub mod pagination;
pub mod request;
pub mod service;
pub mod unify;

pub use crate::domain::model::{Connection, Provider, Record};
pub use crate::domain::ports::{MappingStore, Unifier, UnifyContext};
pub use crate::utils::error::Result;
pub use service::DynamicObjectService;
