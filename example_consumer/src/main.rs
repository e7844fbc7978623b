//! Example consumer: exposes in-memory resources through restless-sdk.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Set `MANIFEST_PATH` to a JSON manifest to replace the built-in resources.

mod memory;

use memory::MemoryFactory;
use restless_sdk::{load_manifest, ApiConfig, ApiManager, AxumHost, Callbacks, ResourceDescriptor};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("restless_sdk=info,example_consumer=info")),
        )
        .init();

    let host = Arc::new(AxumHost::new());
    let manager = ApiManager::new(host.clone(), Arc::new(MemoryFactory::default()));

    match std::env::var("MANIFEST_PATH") {
        Ok(path) => {
            let manifest = load_manifest(&path).await?;
            manager.create_apis(&manifest)?;
        }
        Err(_) => {
            let person = ResourceDescriptor::new("person").with_relation("computer");
            manager.create_api(
                &person,
                &ApiConfig {
                    verbs: vec!["GET".into(), "POST".into(), "PATCH".into(), "DELETE".into()],
                    allow_bulk_patch: true,
                    allow_function_eval: true,
                    ..Default::default()
                },
                Callbacks::default(),
            )?;
            manager.create_api(
                &ResourceDescriptor::new("computer"),
                &ApiConfig {
                    verbs: vec!["GET".into(), "POST".into()],
                    results_per_page: 0,
                    ..Default::default()
                },
                Callbacks::default(),
            )?;
        }
    }

    let app = host.router()?.layer(RequestBodyLimitLayer::new(1024 * 1024));
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into());
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Example consumer listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
