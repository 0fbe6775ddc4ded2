//! In-process fake upstreams for client and service tests.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral localhost port and returns its address.
pub async fn spawn_upstream(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake upstream");
    let addr = listener.local_addr().expect("Fake upstream has no address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Fake upstream crashed");
    });

    addr
}
