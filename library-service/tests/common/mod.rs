#![allow(dead_code)]

use library_service::config::{LibraryConfig, MongoConfig};
use library_service::models::Book;
use library_service::services::{BookStore, InMemoryBookStore};
use library_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub fn test_config() -> LibraryConfig {
    LibraryConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            ..Default::default()
        },
        mongodb: MongoConfig {
            uri: std::env::var("TEST_MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database: format!("library_test_{}", std::process::id()),
            collection: "library".to_string(),
        },
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the service on an empty in-memory store.
    pub async fn spawn() -> (Self, Arc<InMemoryBookStore>) {
        Self::spawn_with_books(Vec::new()).await
    }

    pub async fn spawn_with_books(books: Vec<Book>) -> (Self, Arc<InMemoryBookStore>) {
        let store = Arc::new(InMemoryBookStore::with_books(books));
        let app = Self::spawn_with_store(store.clone()).await;
        (app, store)
    }

    pub async fn spawn_with_store(store: Arc<dyn BookStore>) -> Self {
        let app = Application::build_with_store(test_config(), store)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create_book(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/postbook"))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_book(&self, id: &str) -> reqwest::Response {
        self.client
            .get(self.url(&format!("/getbook/{}", id)))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn take_books(&self, ids: &str) -> reqwest::Response {
        self.client
            .put(self.url(&format!("/takebook/{}", ids)))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
