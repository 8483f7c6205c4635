//! Vector storage.
//!
//! - [`VectorStore`]: backend trait
//! - [`LocalVectorStore`]: embedded `sabor-vector` backend (default)
//! - [`VectorStoreManager`]: one named collection plus the embedder that fills it

pub mod local;
pub mod manager;
pub mod vectorstore;

pub use local::LocalVectorStore;
pub use manager::VectorStoreManager;
pub use vectorstore::VectorStore;
