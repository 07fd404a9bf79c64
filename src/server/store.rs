//! Backing-store contract consumed by the assembly engine.

use crate::error::Result;
use indexmap::IndexMap;
use serde_json::Value;

/// Trait for backing stores that hold configuration documents.
///
/// Implement this trait to serve configuration from a version-controlled
/// checkout, a relational table, an object store, or local files. The
/// assembly engine queries one tuple at a time and concatenates the
/// non-empty results.
pub trait BackingStore: Send + Sync {
    /// Look up the document for one `(application, profile, label)` tuple.
    ///
    /// A `profile` of `None` requests the profile-agnostic document for the
    /// application (the equivalent of `myapp.yml` next to `myapp-dev.yml`).
    /// An empty map means no document exists for the tuple; that is not an
    /// error. Failures must be surfaced as errors, never as silent empties.
    ///
    /// Must be safe to call repeatedly with different tuples within one
    /// resolution.
    fn lookup(
        &self,
        application: &str,
        profile: Option<&str>,
        label: &str,
    ) -> Result<IndexMap<String, Value>>;

    /// The backing-store revision the given label currently points at, when
    /// the store exposes one (e.g. a commit id). Used to stamp
    /// [`Environment::version`](crate::environment::Environment::version).
    fn version(&self, _label: &str) -> Option<String> {
        None
    }
}
