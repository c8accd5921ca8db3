//! Exercises the simulator over a real TCP connection, the way the engine
//! under test reaches it.

#![allow(unused_crate_dependencies, clippy::panic)]

use std::time::Duration;

use remote_mocks::MockRemoteServer;
use serde_json::{json, Value};

#[tokio::test(flavor = "multi_thread")]
async fn serves_rest_and_graphql_routes_over_tcp() {
    let server = MockRemoteServer::start().await;
    let client = reqwest::Client::new();

    let movies: Value = client
        .get(format!("{}/favMovies/0x123?name=Author&num=10", server.url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(movies.get("myFavoriteMovies").is_some());

    let names: Value = client
        .post(format!("{}/userNames", server.url()))
        .body(r#"[{"uid":"a"},{"uid":"b"},{"uid":"c"}]"#)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(names, json!(["uname-a", "uname-b", "uname-c"]));

    let user: Value = client
        .post(format!("{}/gqlUserName", server.url()))
        .body(r#"{"query":"query { userName(id: $id) }","variables":{"id":"0x9"}}"#)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(user, json!({ "data": { "userName": "uname-0x9" } }));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_paths_fail_with_a_transport_error() {
    let server = MockRemoteServer::start().await;

    let response = reqwest::Client::new()
        .get(format!("{}/invalidAppend", server.url()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    assert!(response.bytes().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn the_listener_stops_when_the_handle_drops() {
    let server = MockRemoteServer::start().await;
    let url = format!("{}/verifyHeaders", server.url());
    let client = reqwest::Client::new();

    // Reachable while the handle is alive.
    client.get(&url).send().await.unwrap();

    drop(server);

    for _ in 0..20 {
        tokio::time::sleep(Duration::from_millis(50)).await;
        if client.get(&url).send().await.is_err() {
            return;
        }
    }
    panic!("server kept answering after the handle was dropped");
}
