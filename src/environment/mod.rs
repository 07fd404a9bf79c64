//! The environment model: property sources, assembled environments, and
//! request-string normalization.

mod model;
mod placeholder;
mod request;

pub use model::{Environment, PropertySource};
pub use placeholder::{flatten, resolve_placeholders};
pub use request::{normalize_applications, normalize_profiles, parse_comma_list, split_comma_list};
