//! A mock server standing in for the remote REST and GraphQL services a
//! GraphQL engine's custom resolvers call out to during end-to-end tests.
//!
//! Every route is stateless and request-scoped: handlers verify the inbound
//! request against a declarative expectation, then synthesize their response
//! from the request alone. Any path outside the route table answers a plain
//! 404, which is how total upstream unreachability is simulated.

#![cfg_attr(test, allow(unused_crate_dependencies))]

use std::time::Duration;

use axum::Router;
use http::{StatusCode, Uri};

mod countries;
mod gql_fields;
mod movies;
mod names;
mod schema_probes;

pub mod introspection;
pub mod resolve;
pub mod verify;

/// The complete path → handler table, built once at startup.
pub fn router() -> Router {
    Router::new()
        .merge(movies::routes())
        .merge(names::routes())
        .merge(schema_probes::routes())
        .merge(countries::routes())
        .merge(gql_fields::routes())
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> StatusCode {
    tracing::debug!(%uri, "no route registered, answering 404");
    StatusCode::NOT_FOUND
}

/// A running simulator on an ephemeral port, for in-process tests. The
/// listener task shuts down when the handle drops.
pub struct MockRemoteServer {
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
    port: u16,
}

impl Drop for MockRemoteServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            shutdown.send(()).ok();
        }
    }
}

impl MockRemoteServer {
    pub async fn start() -> MockRemoteServer {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let (shutdown_sender, shutdown_receiver) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, router())
                .with_graceful_shutdown(async move {
                    shutdown_receiver.await.ok();
                })
                .await
                .unwrap();
        });

        // Give the server a moment to start accepting connections.
        tokio::time::sleep(Duration::from_millis(20)).await;

        tracing::debug!(port, "mock remote services listening");

        MockRemoteServer {
            shutdown: Some(shutdown_sender),
            port,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}
