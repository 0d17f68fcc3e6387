mod in_memory_blob_store;
mod object_store_adapter;

pub use in_memory_blob_store::InMemoryBlobStore;
pub use object_store_adapter::ObjectStoreBlobAdapter;
