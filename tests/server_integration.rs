//! Serves the repository over a real socket and drives it with an HTTP client

use maven_bridge::config::Config;
use maven_bridge::repository::Repository;
use maven_bridge::server;
use reqwest::StatusCode;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, LAST_MODIFIED, LOCATION};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Bridge {
    base: String,
    client: reqwest::Client,
    _stop: oneshot::Sender<()>,
}

impl Bridge {
    async fn start(upstream: &MockServer) -> Self {
        let mut config = Config::default();
        config.hangar.api_base_url = upstream.uri();
        config.modrinth.api_base_url = upstream.uri();
        config.cache.metadata_expiration_seconds = 300;
        let repository = Repository::from_config(&config).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let (stop, stopped) = oneshot::channel::<()>();
        let _server = tokio::spawn(server::serve(listener, repository, async move {
            let _ = stopped.await;
        }));

        let client = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none()).build().unwrap();

        Self { base, client, _stop: stop }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

async fn mount_hangar(upstream: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/projects/Maintenance/versions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "name": "4.2.1", "createdAt": "2024-01-02T03:04:05.123Z", "dependencies": [] }],
            "pagination": { "count": 1, "limit": 20, "offset": 0 }
        })))
        .mount(upstream)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects/Maintenance/versions/4.2.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "4.2.1",
            "createdAt": "2024-01-02T03:04:05.123Z",
            "dependencies": []
        })))
        .mount(upstream)
        .await;
}

#[tokio::test]
async fn test_metadata_is_served_and_cached() {
    let upstream = MockServer::start().await;
    mount_hangar(&upstream).await;
    let bridge = Bridge::start(&upstream).await;

    for _ in 0..2 {
        let response = bridge
            .client
            .get(bridge.url("/repository/io/papermc/hangar/paper/Maintenance/maven-metadata.xml"))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/xml");
        assert_eq!(response.headers()[CACHE_CONTROL], "public, max-age=300");

        let text = response.text().await.unwrap();
        assert!(text.starts_with("<metadata>"));
        assert!(text.contains("<groupId>io.papermc.hangar.paper</groupId>"));
    }

    assert_eq!(upstream.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_head_pom() {
    let upstream = MockServer::start().await;
    mount_hangar(&upstream).await;
    let bridge = Bridge::start(&upstream).await;

    let response = bridge
        .client
        .head(bridge.url("/repository/io/papermc/hangar/paper/Maintenance/4.2.1/Maintenance-4.2.1.pom"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[LAST_MODIFIED], "Tue, 02 Jan 2024 03:04:05 GMT");
    assert!(response.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_jar_redirects_upstream() {
    let upstream = MockServer::start().await;
    let bridge = Bridge::start(&upstream).await;

    let response = bridge
        .client
        .get(bridge.url("/repository/io/papermc/hangar/paper/Maintenance/4.2.1/Maintenance-4.2.1.jar"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers()[LOCATION].to_str().unwrap(),
        format!("{}/projects/Maintenance/versions/4.2.1/PAPER/download", upstream.uri())
    );
    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_errors() {
    let upstream = MockServer::start().await;
    let bridge = Bridge::start(&upstream).await;

    let response = bridge.client.get(bridge.url("/repository/org/example/thing/maven-metadata.xml")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.text().await.unwrap().contains("org/example/thing/maven-metadata.xml"));

    let response = bridge
        .client
        .get(bridge.url("/repository/io/papermc/hangar/paper/Maintenance/4.2.1/Other-4.2.1.pom"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = bridge
        .client
        .head(bridge.url("/repository/io/papermc/hangar/paper/Maintenance/maven-metadata.xml"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = bridge
        .client
        .post(bridge.url("/repository/io/papermc/hangar/paper/Maintenance/maven-metadata.xml"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_root_points_at_repository() {
    let upstream = MockServer::start().await;
    let bridge = Bridge::start(&upstream).await;

    let response = bridge.client.get(bridge.url("/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("/repository/"));
}
