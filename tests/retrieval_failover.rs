//! Integration tests for the full retrieval flow: discovery, candidate
//! ordering, and the failover policy, driven through the public API with a
//! scripted transport.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cascade_config::client::{
    DiscoveryLookup, DiscoverySettings, EndpointSelector, EnvironmentTransport, RetrySettings,
    TransportError, TransportReply,
};
use cascade_config::prelude::*;
use indexmap::IndexMap;
use reqwest::header::HeaderMap;
use serde_json::json;

struct ScriptedTransport {
    routes: Vec<(&'static str, u16)>,
    good_base: &'static str,
    urls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn new(routes: Vec<(&'static str, u16)>, good_base: &'static str) -> Arc<Self> {
        Arc::new(Self {
            routes,
            good_base,
            urls: Mutex::new(Vec::new()),
        })
    }

    fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    fn environment_body() -> String {
        let mut source = IndexMap::new();
        source.insert("server.port".to_string(), json!(8080));
        let mut environment =
            Environment::new("myapp", vec!["production".to_string()]).with_label("main");
        environment.add(PropertySource::new("myapp-production", source));
        serde_json::to_string(&environment).unwrap()
    }
}

#[async_trait]
impl EnvironmentTransport for ScriptedTransport {
    async fn get(
        &self,
        url: &str,
        _headers: HeaderMap,
    ) -> std::result::Result<TransportReply, TransportError> {
        self.urls.lock().unwrap().push(url.to_string());
        if url.starts_with(self.good_base) {
            return Ok(TransportReply {
                status: 200,
                body: Self::environment_body(),
            });
        }
        for (base, status) in &self.routes {
            if url.starts_with(base) {
                return Ok(TransportReply {
                    status: *status,
                    body: String::new(),
                });
            }
        }
        Err(TransportError::Connect("unreachable".to_string()))
    }
}

struct StaticLookup {
    instances: Vec<String>,
}

#[async_trait]
impl DiscoveryLookup for StaticLookup {
    async fn instances(&self, _service_id: &str) -> cascade_config::error::Result<Vec<String>> {
        Ok(self.instances.clone())
    }
}

fn settings(uris: &[&str]) -> ClientSettings {
    ClientSettings::builder()
        .with_uris(uris.iter().copied())
        .with_name("myapp")
        .with_profile("production")
        .with_label("main")
        .build()
        .unwrap()
}

#[tokio::test]
async fn failover_walks_candidates_in_order_until_success() {
    // "http://down" has no route, so it fails at the connection level.
    let transport = ScriptedTransport::new(vec![("http://broken", 500)], "http://good");
    let client = RetrievalClient::with_transport(
        settings(&["http://down", "http://broken", "http://good"]),
        Arc::clone(&transport) as Arc<dyn EnvironmentTransport>,
    );

    let environment = client.load().await.unwrap().unwrap();
    assert_eq!(environment.name, "myapp");
    assert_eq!(environment.property_sources[0].name, "myapp-production");
    assert_eq!(
        transport.urls(),
        vec![
            "http://down/myapp/production/main",
            "http://broken/myapp/production/main",
            "http://good/myapp/production/main",
        ]
    );
}

#[tokio::test]
async fn discovered_instances_replace_the_static_list() {
    let transport = ScriptedTransport::new(vec![], "http://discovered");
    let lookup = Arc::new(StaticLookup {
        instances: vec!["http://discovered:8888/".to_string()],
    });

    let mut settings = settings(&["http://static"]);
    settings.discovery = Some(DiscoverySettings {
        enabled: true,
        service_id: "configserver".to_string(),
    });
    let client = RetrievalClient::with_transport(
        settings,
        Arc::clone(&transport) as Arc<dyn EnvironmentTransport>,
    )
    .with_selector(EndpointSelector::with_discovery(lookup));

    let environment = client.load().await.unwrap().unwrap();
    assert_eq!(environment.name, "myapp");
    assert_eq!(
        transport.urls(),
        vec!["http://discovered:8888/myapp/production/main"]
    );
}

#[tokio::test]
async fn empty_discovery_fails_before_any_candidate_attempt() {
    let transport = ScriptedTransport::new(vec![], "http://never");
    let lookup = Arc::new(StaticLookup { instances: vec![] });

    let mut settings = settings(&["http://static"]);
    settings.discovery = Some(DiscoverySettings {
        enabled: true,
        service_id: "configserver".to_string(),
    });
    let client = RetrievalClient::with_transport(
        settings,
        Arc::clone(&transport) as Arc<dyn EnvironmentTransport>,
    )
    .with_selector(EndpointSelector::with_discovery(lookup).with_retry(RetrySettings {
        attempts: 2,
        initial_backoff: Duration::from_millis(1),
        multiplier: 1.0,
    }));

    let err = client.load().await.unwrap_err();
    assert!(matches!(err, ConfigError::NoInstancesFound { .. }));
    assert!(transport.urls().is_empty());
}

#[tokio::test]
async fn wire_environment_round_trips_into_usable_values() {
    let transport = ScriptedTransport::new(vec![], "http://good");
    let client = RetrievalClient::with_transport(
        settings(&["http://good"]),
        Arc::clone(&transport) as Arc<dyn EnvironmentTransport>,
    );

    let environment = client.load().await.unwrap().unwrap();
    let values = cascade_config::environment::flatten(&environment);
    assert_eq!(values["server.port"], json!(8080));
}

#[tokio::test]
async fn fail_fast_reports_labels_after_exhaustion() {
    let transport = ScriptedTransport::new(vec![("http://a", 404), ("http://b", 404)], "http://never");
    let mut settings = settings(&["http://a", "http://b"]);
    settings.label = Some("v1,v2".to_string());
    settings.fail_fast = true;
    let client = RetrievalClient::with_transport(
        settings,
        Arc::clone(&transport) as Arc<dyn EnvironmentTransport>,
    );

    let err = client.load().await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("v1") && message.contains("v2"));
    // Both labels were tried against both candidates.
    assert_eq!(transport.urls().len(), 4);
}
