pub mod collections;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod record;
pub mod repository;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;
pub use record::{Record, RecordError};
pub use repository::Repository;
pub use store::{Document, DocumentStore, StoreError, StoreResult};
