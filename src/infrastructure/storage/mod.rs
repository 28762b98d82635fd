pub mod object_store;
pub mod s3;

pub use object_store::{ObjectReader, ObjectStore, StorageError};
pub use s3::StorageService;
