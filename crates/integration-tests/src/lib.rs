//! Integration tests for the WooCommerce YML feed server.
//!
//! Each test starts a [`FakeStore`] (a wiremock server answering the
//! WordPress and WooCommerce REST routes) and a real feed server bound to an
//! ephemeral port, then talks to it over HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p woo-yml-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use woo_yml_server::catalog::{CatalogProvider, WooCommerceClient};
use woo_yml_server::config::WooCommerceConfig;
use woo_yml_server::routes;
use woo_yml_server::state::AppState;

/// A WooCommerce store served by wiremock.
pub struct FakeStore {
    pub server: MockServer,
}

impl FakeStore {
    /// Start a store with WooCommerce active and no catalog data.
    pub async fn start() -> Self {
        let store = Self::start_bare().await;
        store.mount_index(&["wp/v2", "wc/v3"]).await;
        store.mount_json("/wp-json/wc/v3/products/attributes", json!([])).await;
        store
    }

    /// Start a store with nothing mounted.
    pub async fn start_bare() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Serve the WordPress REST index with the given namespaces.
    pub async fn mount_index(&self, namespaces: &[&str]) {
        self.mount_json(
            "/wp-json/",
            json!({
                "name": "Test & Shop",
                "url": "https://shop.test",
                "home": "https://shop.test",
                "namespaces": namespaces,
            }),
        )
        .await;
    }

    /// Serve the category listing and a `?slug=` lookup for each entry.
    pub async fn mount_categories(&self, categories: Value) {
        let route = "/wp-json/wc/v3/products/categories";
        for category in categories.as_array().into_iter().flatten() {
            let Some(slug) = category.get("slug").and_then(Value::as_str) else {
                continue;
            };
            Mock::given(method("GET"))
                .and(path(route))
                .and(query_param("slug", slug))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([category])))
                .mount(&self.server)
                .await;
        }

        Mock::given(method("GET"))
            .and(path(route))
            .and(query_param("hide_empty", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(categories))
            .mount(&self.server)
            .await;
    }

    /// Serve the product listing.
    pub async fn mount_products(&self, products: Value) {
        self.mount_json("/wp-json/wc/v3/products", products).await;
    }

    /// Answer `route` with the given status and no usable body.
    pub async fn mount_status(&self, route: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string("{\"message\":\"nope\"}"))
            .mount(&self.server)
            .await;
    }

    async fn mount_json(&self, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Client configuration pointing at this store.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI is not a valid URL.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn config(&self) -> WooCommerceConfig {
        WooCommerceConfig {
            base_url: Url::parse(&format!("{}/", self.server.uri())).unwrap(),
            consumer_key: "ck_integration".to_string(),
            consumer_secret: SecretString::from("cs_integration"),
            page_size: 100,
            timeout: Duration::from_secs(5),
        }
    }
}

/// A feed server running in the background.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Spawn the full application against `store`.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built or no port can be bound.
    #[allow(clippy::unwrap_used)]
    pub async fn spawn(store: &FakeStore) -> Self {
        let client = WooCommerceClient::new(&store.config()).unwrap();
        let catalog: Arc<dyn CatalogProvider> = Arc::new(client);
        let app = routes::app(AppState::new(catalog));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            addr,
            client: reqwest::Client::new(),
        }
    }

    /// Full URL for a path on this server.
    #[must_use]
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }

    /// GET a path, returning status, content type, and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails at the transport level.
    #[allow(clippy::unwrap_used)]
    pub async fn get(&self, path_and_query: &str) -> (u16, String, String) {
        let response = self.client.get(self.url(path_and_query)).send().await.unwrap();
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await.unwrap();
        (status, content_type, body)
    }
}
