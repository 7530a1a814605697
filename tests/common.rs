#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate, unreachable_pub)]

use missive_server::config::{Config, DatabaseConfig, HealthConfig, ServerConfig, TelemetryConfig};
use missive_server::domain::message::Message;
use missive_server::storage::{InMemoryMessageRepository, MessageRepository};
use missive_server::{AppBuilder, api};
use reqwest::Response;
use serde_json::{Value, json};
use std::sync::{Arc, Once};
use tokio::net::TcpListener;
use uuid::Uuid;

pub const VALID_CONTENT: &str = "This is valid content with enough length";

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("missive_server=debug".parse().unwrap())
            .add_directive("sqlx=warn".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

pub fn get_test_config() -> Config {
    Config {
        database_url: None,
        database: DatabaseConfig::default(),
        server: ServerConfig { host: "127.0.0.1".to_string(), port: 0, mgmt_port: 0, shutdown_timeout_secs: 1 },
        telemetry: TelemetryConfig::default(),
        health: HealthConfig::default(),
    }
}

#[derive(Debug)]
pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub repo: InMemoryMessageRepository,
    pub config: Config,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(get_test_config()).await
    }

    pub async fn spawn_with_config(config: Config) -> Self {
        let repo = InMemoryMessageRepository::new();
        Self::spawn_with_repository(config, Arc::new(repo.clone()), repo).await
    }

    /// Spawns against an arbitrary repository; `repo` is still returned for seeding
    /// but only reflects server state when it is the same store.
    pub async fn spawn_with_repository(
        config: Config,
        backend: Arc<dyn MessageRepository>,
        repo: InMemoryMessageRepository,
    ) -> Self {
        setup_tracing();

        let app = AppBuilder::new(config.clone()).with_repository(backend).build().await.unwrap();

        let api_listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port)).await.unwrap();
        let mgmt_listener =
            TcpListener::bind(format!("{}:{}", config.server.host, config.server.mgmt_port)).await.unwrap();
        let server_url = format!("http://{}", api_listener.local_addr().unwrap());
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());

        let app_router = api::app_router(app.services);
        let mgmt_router = api::mgmt_router(app.mgmt);

        tokio::spawn(async move {
            axum::serve(api_listener, app_router).await.unwrap();
        });
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt_router).await.unwrap();
        });

        Self { server_url, mgmt_url, client: reqwest::Client::new(), repo, config }
    }

    pub fn messages_url(&self, organization_id: Uuid) -> String {
        format!("{}/api/v1/organizations/{}/messages", self.server_url, organization_id)
    }

    pub fn message_url(&self, organization_id: Uuid, id: Uuid) -> String {
        format!("{}/{}", self.messages_url(organization_id), id)
    }

    pub async fn create_message(&self, organization_id: Uuid, title: &str, content: &str) -> Response {
        self.client
            .post(self.messages_url(organization_id))
            .json(&json!({ "title": title, "content": content }))
            .send()
            .await
            .unwrap()
    }

    /// Creates a message that must succeed and returns its JSON body.
    pub async fn create_valid(&self, organization_id: Uuid, title: &str) -> Value {
        let resp = self.create_message(organization_id, title, VALID_CONTENT).await;
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
        resp.json().await.unwrap()
    }

    pub async fn update_message(&self, organization_id: Uuid, id: Uuid, body: &Value) -> Response {
        self.client.put(self.message_url(organization_id, id)).json(body).send().await.unwrap()
    }

    pub async fn delete_message(&self, organization_id: Uuid, id: Uuid) -> Response {
        self.client.delete(self.message_url(organization_id, id)).send().await.unwrap()
    }

    pub async fn get_message(&self, organization_id: Uuid, id: Uuid) -> Response {
        self.client.get(self.message_url(organization_id, id)).send().await.unwrap()
    }

    /// Inserts an inactive message straight into the store.
    pub fn seed_inactive(&self, organization_id: Uuid, title: &str) -> Message {
        let message = Message {
            id: Uuid::new_v4(),
            organization_id,
            title: title.to_string(),
            content: VALID_CONTENT.to_string(),
            is_active: false,
            updated_at: None,
        };
        self.repo.insert(message.clone());
        message
    }
}

pub fn id_of(body: &Value) -> Uuid {
    body["id"].as_str().unwrap().parse().unwrap()
}
