//! Admin protocol behavior: configuration listing, the develop/use override
//! lifecycle, error reporting, and the override taking effect on proxied
//! traffic.

use std::sync::Arc;

use devproxy::Routes;
use reqwest::StatusCode;
use url::Url;

mod common;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn routes_with(prefix: &str, target: &str) -> Arc<Routes> {
    Arc::new(Routes::from_pairs([(prefix.to_string(), url(target))]))
}

#[tokio::test]
async fn test_root_lists_configuration() {
    let routes = routes_with("/api", "http://a.example/base");
    let admin = common::start_admin(routes).await;

    let res = common::client()
        .get(format!("http://{admin}/"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.text().await.unwrap();
    assert!(body.starts_with("Configuration: "), "body: {body}");
    assert!(body.contains("/api -> http://a.example/base"), "body: {body}");
}

#[tokio::test]
async fn test_develop_then_use_round_trip() {
    let routes = routes_with("/api", "http://original.example/");
    let admin = common::start_admin(routes.clone()).await;
    let client = common::client();

    // Override.
    let res = client
        .get(format!("http://{admin}/develop/api"))
        .query(&[("at", "http://localhost:3000/dev")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        res.text().await.unwrap(),
        "Developing /api at http://localhost:3000/dev"
    );
    assert_eq!(routes.target_of("/api"), Some(url("http://localhost:3000/dev")));

    // Second override keeps the original backup.
    let res = client
        .get(format!("http://{admin}/develop/api"))
        .query(&[("at", "http://localhost:4000/other")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        routes.target_of("/api"),
        Some(url("http://localhost:4000/other"))
    );

    // Restore goes back to the pre-override target, not the first override.
    let res = client
        .get(format!("http://{admin}/use/api"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        res.text().await.unwrap(),
        "Using /api from http://original.example/"
    );
    assert_eq!(routes.target_of("/api"), Some(url("http://original.example/")));

    // A second use is a no-op but still succeeds.
    let res = client
        .get(format!("http://{admin}/use/api"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        res.text().await.unwrap(),
        "Using /api from http://original.example/"
    );
    assert_eq!(routes.target_of("/api"), Some(url("http://original.example/")));
}

#[tokio::test]
async fn test_develop_accepts_form_encoded_at() {
    let routes = routes_with("/api", "http://original.example/");
    let admin = common::start_admin(routes.clone()).await;

    let res = common::client()
        .post(format!("http://{admin}/develop/api"))
        .form(&[("at", "http://localhost:3000/dev")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        res.text().await.unwrap(),
        "Developing /api at http://localhost:3000/dev"
    );
    assert_eq!(routes.target_of("/api"), Some(url("http://localhost:3000/dev")));
}

#[tokio::test]
async fn test_unknown_prefix_is_rejected_without_mutation() {
    let routes = routes_with("/api", "http://a.example/");
    let admin = common::start_admin(routes.clone()).await;
    let client = common::client();

    let res = client
        .get(format!("http://{admin}/develop/nope"))
        .query(&[("at", "http://c.example")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await.unwrap(), "No such route /nope");

    let res = client
        .get(format!("http://{admin}/use/nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await.unwrap(), "No such route /nope");

    // Table untouched.
    assert_eq!(routes.snapshot().len(), 1);
    assert_eq!(routes.target_of("/api"), Some(url("http://a.example/")));
}

#[tokio::test]
async fn test_develop_with_unparseable_at_is_rejected() {
    let routes = routes_with("/api", "http://a.example/");
    let admin = common::start_admin(routes.clone()).await;
    let client = common::client();

    // Relative URL, no scheme.
    let res = client
        .get(format!("http://{admin}/develop/api"))
        .query(&[("at", "not-a-url")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(!res.text().await.unwrap().is_empty());

    // Missing entirely: parses as the empty string and fails the same way.
    let res = client
        .get(format!("http://{admin}/develop/api"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(routes.target_of("/api"), Some(url("http://a.example/")));
}

#[tokio::test]
async fn test_override_takes_effect_on_proxied_traffic() {
    let original = common::start_echo_backend("original").await;
    let development = common::start_echo_backend("development").await;

    let routes = routes_with("/api", &format!("http://{original}"));
    let admin = common::start_admin(routes.clone()).await;
    let proxy = common::start_proxy(routes).await;
    let client = common::client();

    let fetch = |path: &'static str| {
        let client = client.clone();
        async move {
            client
                .get(format!("http://{proxy}{path}"))
                .send()
                .await
                .unwrap()
                .text()
                .await
                .unwrap()
        }
    };

    assert!(fetch("/api/ping").await.contains("original GET /ping"));

    let res = client
        .get(format!("http://{admin}/develop/api"))
        .query(&[("at", format!("http://{development}"))])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(fetch("/api/ping").await.contains("development GET /ping"));

    let res = client
        .get(format!("http://{admin}/use/api"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(fetch("/api/ping").await.contains("original GET /ping"));
}
