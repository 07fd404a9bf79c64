//! The cascade assembly engine.
//!
//! Expands an `(application, profile, label)` request into an ordered
//! sequence of backing-store tuples, queries the store for each, and
//! concatenates the non-empty results into one precedence-ordered
//! [`Environment`].

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::environment::{
    Environment, PropertySource, normalize_applications, normalize_profiles, parse_comma_list,
    split_comma_list,
};
use crate::error::Result;
use crate::server::BackingStore;

/// Assembles environments by cascading over a [`BackingStore`].
///
/// Stateless with respect to concurrent invocations: the only shared state
/// is the injected store (and the optional store lock). Construct once and
/// call [`resolve`](AssemblyEngine::resolve) per request.
///
/// # Examples
///
/// ```rust,no_run
/// use cascade_config::prelude::*;
/// # use std::sync::Arc;
/// # fn example(store: Arc<dyn cascade_config::server::BackingStore>) -> Result<()> {
/// let engine = AssemblyEngine::builder(store)
///     .with_default_label("main")
///     .build();
///
/// let environment = engine.resolve("myapp", "production", "")?;
/// for source in &environment.property_sources {
///     println!("{}", source.name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct AssemblyEngine {
    store: Arc<dyn BackingStore>,
    default_label: String,
    fail_on_error: bool,
    config_incomplete: bool,
    store_lock: Option<Arc<Mutex<()>>>,
}

impl AssemblyEngine {
    /// Create a new builder over the given backing store.
    pub fn builder(store: Arc<dyn BackingStore>) -> AssemblyEngineBuilder {
        AssemblyEngineBuilder::new(store)
    }

    /// Resolve one request into a precedence-ordered environment.
    ///
    /// Never produces a "null" result: a request with no matching backing
    /// data yields an environment with zero property sources.
    ///
    /// # Errors
    ///
    /// Returns an error only when `fail_on_error` is set and a single tuple
    /// lookup fails; otherwise store failures are logged and skipped.
    pub fn resolve(&self, application: &str, profile: &str, label: &str) -> Result<Environment> {
        // Serializes the whole tuple loop against stores that are not safe
        // for concurrent readers (e.g. a local working-copy checkout).
        let _guard = self
            .store_lock
            .as_ref()
            .map(|lock| lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner()));

        let label = if label.trim().is_empty() {
            self.default_label.clone()
        } else {
            label.to_string()
        };
        let mut profile = normalize_profiles(profile);
        if self.config_incomplete && !profile.starts_with("default") {
            // Incomplete stores cannot answer profile-less lookups, so the
            // "default" profile document stands in for them.
            profile = format!("default,{profile}");
        }

        let mut environment = Environment::new(application, split_comma_list(&profile))
            .with_label(label.clone());

        let mut applications = parse_comma_list(&normalize_applications(application));
        applications.reverse();
        let mut profiles = parse_comma_list(&profile);
        profiles.reverse();
        let labels = if label.contains(',') {
            let mut labels = split_comma_list(&label);
            labels.reverse();
            labels
        } else {
            vec![label]
        };

        for label in &labels {
            for profile in &profiles {
                for application in &applications {
                    self.add_property_source(
                        &mut environment,
                        application,
                        Some(profile),
                        label,
                    )?;
                }
            }
            // Profile-agnostic documents, the equivalent of myapp.yml next
            // to myapp-dev.yml.
            if !self.config_incomplete {
                for application in &applications {
                    self.add_property_source(&mut environment, application, None, label)?;
                }
            }
        }

        if let Some(label) = labels.last() {
            environment.version = self.store.version(label);
        }
        Ok(environment)
    }

    fn add_property_source(
        &self,
        environment: &mut Environment,
        application: &str,
        profile: Option<&str>,
        label: &str,
    ) -> Result<()> {
        let name = match profile {
            Some(profile) => format!("{application}-{profile}"),
            None => application.to_string(),
        };
        match self.store.lookup(application, profile, label) {
            Ok(source) => {
                if !source.is_empty() {
                    environment.add(PropertySource::new(name, source));
                }
            }
            Err(err) => {
                if self.fail_on_error {
                    return Err(err);
                }
                debug!(%application, ?profile, %label, error = %err,
                    "skipping failed backing store lookup");
            }
        }
        Ok(())
    }
}

/// Builder for constructing an [`AssemblyEngine`].
pub struct AssemblyEngineBuilder {
    store: Arc<dyn BackingStore>,
    default_label: String,
    fail_on_error: bool,
    config_incomplete: bool,
    store_lock: Option<Arc<Mutex<()>>>,
}

impl AssemblyEngineBuilder {
    fn new(store: Arc<dyn BackingStore>) -> Self {
        Self {
            store,
            default_label: "main".to_string(),
            fail_on_error: false,
            config_incomplete: false,
            store_lock: None,
        }
    }

    /// Label substituted when a request carries a blank label.
    ///
    /// Default is `"main"`.
    pub fn with_default_label(mut self, label: impl Into<String>) -> Self {
        self.default_label = label.into();
        self
    }

    /// Propagate a failed tuple lookup instead of logging and skipping it.
    ///
    /// Default is `false`: one broken document does not abort the whole
    /// resolution.
    pub fn with_fail_on_error(mut self, fail_on_error: bool) -> Self {
        self.fail_on_error = fail_on_error;
        self
    }

    /// Mark the store as unable to answer profile-less lookups.
    ///
    /// When set, the profile-agnostic pass is suppressed and the `"default"`
    /// profile is forced onto the front of every profile list instead.
    pub fn with_config_incomplete(mut self, config_incomplete: bool) -> Self {
        self.config_incomplete = config_incomplete;
        self
    }

    /// Serialize resolutions through a caller-owned lock.
    ///
    /// Required for stores that are not safe for concurrent readers: the
    /// lock is held across the whole tuple loop of each resolve, so a
    /// concurrent request never observes the store mid-update. The caller
    /// owns the lock and may scope derived file reads under it too.
    pub fn with_store_lock(mut self, lock: Arc<Mutex<()>>) -> Self {
        self.store_lock = Some(lock);
        self
    }

    /// Build the engine.
    pub fn build(self) -> AssemblyEngine {
        AssemblyEngine {
            store: self.store,
            default_label: self.default_label,
            fail_on_error: self.fail_on_error,
            config_incomplete: self.config_incomplete,
            store_lock: self.store_lock,
        }
    }
}
