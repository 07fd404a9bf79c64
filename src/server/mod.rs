//! Server-side assembly: the backing-store contract, the cascade assembly
//! engine, and the raw-resource template helper.

mod assembly;
mod resource;
mod store;

pub use assembly::{AssemblyEngine, AssemblyEngineBuilder};
pub use resource::{FileResourceRepository, ResourceRepository, retrieve_binary, retrieve_resource};
pub use store::BackingStore;
