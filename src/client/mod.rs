//! Client-side retrieval: settings, endpoint selection, the transport seam,
//! and the multi-endpoint failover client.

mod discovery;
mod retrieval;
mod settings;
mod transport;

pub use discovery::{DiscoveryLookup, EndpointSelector, RetrySettings, normalize_address};
pub use retrieval::RetrievalClient;
pub use settings::{ClientSettings, ClientSettingsBuilder, DiscoverySettings, MultipleUriStrategy};
pub use transport::{EnvironmentTransport, HttpTransport, TransportError, TransportReply};
