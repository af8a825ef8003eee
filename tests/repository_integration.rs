//! End-to-end tests of the repository boundary against wiremock Hangar and Modrinth upstreams

use core::time::Duration;
use maven_bridge::config::Config;
use maven_bridge::repository::{Repository, RepositoryResponse};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn repository(server: &MockServer) -> Repository {
    let mut config = Config::default();
    config.hangar.api_base_url = server.uri();
    config.modrinth.api_base_url = server.uri();
    config.cache.pom_expiration_seconds = 600;
    config.cache.metadata_expiration_seconds = 300;
    config.cache.jar_expiration_seconds = 900;
    Repository::from_config(&config).unwrap()
}

fn body(response: &RepositoryResponse) -> &str {
    match response {
        RepositoryResponse::Document { body: text, .. } => text.as_str(),
        other => panic!("expected a document, got {} {:?}", other.status(), other.detail()),
    }
}

fn header<'a>(headers: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
    headers.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
}

fn hangar_version(name: &str, created_at: &str) -> Value {
    json!({ "name": name, "createdAt": created_at, "dependencies": [] })
}

fn modrinth_version(id: &str, project_id: &str, number: &str, loaders: &[&str], dependencies: Value) -> Value {
    json!({
        "id": id,
        "project_id": project_id,
        "name": number,
        "version_number": number,
        "dependencies": dependencies,
        "loaders": loaders,
        "date_published": "2023-06-01T12:00:00Z",
        "files": [
            { "url": format!("https://cdn.modrinth.com/{id}-sources.jar"), "filename": "sources.jar", "primary": false },
            { "url": format!("https://cdn.modrinth.com/{id}.jar"), "filename": "main.jar", "primary": true }
        ]
    })
}

#[tokio::test]
async fn test_hangar_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/Maintenance/versions"))
        .and(query_param("platform", "PAPER"))
        .and(query_param("channel", "Release"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                hangar_version("4.2.1", "2024-01-02T03:04:05.123Z"),
                hangar_version("4.2.0", "2023-12-01T00:00:00.000Z")
            ],
            "pagination": { "count": 2, "limit": 20, "offset": 0 }
        })))
        .mount(&server)
        .await;

    let response = repository(&server)
        .get("/repository/io/papermc/hangar/paper/Release/Maintenance/maven-metadata.xml")
        .await;

    let expected = "<metadata>
  <groupId>io.papermc.hangar.paper.Release</groupId>
  <artifactId>Maintenance</artifactId>
  <versioning>
    <latest>4.2.1</latest>
    <release>4.2.1</release>
    <versions>
      <version>4.2.1</version>
      <version>4.2.0</version>
    </versions>
    <lastUpdated>20240102030405</lastUpdated>
  </versioning>
</metadata>";

    assert_eq!(body(&response), expected);
    assert_eq!(header(&response.headers(), "Cache-Control"), Some("public, max-age=300"));
    assert_eq!(header(&response.headers(), "Content-Type"), Some("application/xml"));
}

#[tokio::test]
async fn test_hangar_empty_listing_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/Maintenance/versions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [],
            "pagination": { "count": 0, "limit": 20, "offset": 0 }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects/Maintenance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Maintenance",
            "namespace": { "owner": "kennytv", "slug": "Maintenance" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = repository(&server).get("io/papermc/hangar/waterfall/Maintenance/maven-metadata.xml").await;
    assert_eq!(response.status(), 404);
    assert_eq!(response.detail().as_deref(), Some("Hangar project 'Maintenance' has no waterfall versions"));
}

#[tokio::test]
async fn test_hangar_pom_and_head() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/Maintenance/versions/4.2.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "4.2.1",
            "createdAt": "2024-01-02T03:04:05.123Z",
            "dependencies": [{ "namespace": "io.papermc.hangar.paper", "name": "ProtocolLib", "version": "5.1.0" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repository = repository(&server);
    let pom_path = "io/papermc/hangar/paper/Maintenance/4.2.1/Maintenance-4.2.1.pom";

    let response = repository.get(pom_path).await;
    let pom = body(&response);
    assert!(pom.contains("  <groupId>io.papermc.hangar.paper</groupId>\n  <artifactId>Maintenance</artifactId>\n  <version>4.2.1</version>"));
    assert!(pom.contains(
        "    <dependency>\n      <groupId>io.papermc.hangar.paper</groupId>\n      <artifactId>ProtocolLib</artifactId>\n      <version>5.1.0</version>\n    </dependency>"
    ));
    assert_eq!(header(&response.headers(), "Cache-Control"), Some("public, max-age=600"));

    let head = repository.head(pom_path).await;
    assert_eq!(head.status(), 200);
    let headers = head.headers();
    assert_eq!(header(&headers, "Content-Type"), Some("application/xml"));
    assert_eq!(header(&headers, "Last-Modified"), Some("Tue, 02 Jan 2024 03:04:05 GMT"));
    assert_eq!(header(&headers, "Content-Length"), Some(pom.len().to_string().as_str()));
}

#[tokio::test]
async fn test_hangar_pom_missing_version() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/Maintenance/versions/0.0.1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let response = repository(&server).get("io/papermc/hangar/paper/Maintenance/0.0.1/Maintenance-0.0.1.pom").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_hangar_jar_redirect() {
    let server = MockServer::start().await;

    let response = repository(&server).get("io/papermc/hangar/velocity/Maintenance/4.2.1/Maintenance-4.2.1.jar").await;

    match response {
        RepositoryResponse::Redirect { location, max_age } => {
            assert_eq!(location, format!("{}/projects/Maintenance/versions/4.2.1/VELOCITY/download", server.uri()));
            assert_eq!(max_age, Duration::from_secs(900));
        }
        other => panic!("expected a redirect, got {}", other.status()),
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/Maintenance/versions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let response = repository(&server).get("io/papermc/hangar/paper/Maintenance/maven-metadata.xml").await;
    assert_eq!(response.status(), 502);
    assert!(matches!(response, RepositoryResponse::UpstreamFailure(_)));
}

#[tokio::test]
async fn test_modrinth_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/project/fabric-api/version"))
        .and(query_param("loaders", r#"["fabric"]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            modrinth_version("b", "P7dR8mSH", "0.92.1", &["fabric"], json!([])),
            modrinth_version("a", "P7dR8mSH", "0.92.0", &["fabric"], json!([]))
        ])))
        .mount(&server)
        .await;

    let response = repository(&server).get("com/modrinth/fabric/fabric-api/maven-metadata.xml").await;
    let metadata = body(&response);

    assert!(metadata.contains("<groupId>com.modrinth.fabric</groupId>"));
    assert!(metadata.contains("<artifactId>fabric-api</artifactId>"));
    assert!(metadata.contains("<latest>0.92.1</latest>"));
    assert!(metadata.contains("<version>0.92.1</version>\n      <version>0.92.0</version>"));
    assert!(metadata.contains("<lastUpdated>20230601120000</lastUpdated>"));
}

#[tokio::test]
async fn test_modrinth_empty_listing_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/project/fabric-api/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/project/fabric-api"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let response = repository(&server).get("com/modrinth/forge/fabric-api/maven-metadata.xml").await;
    assert_eq!(response.status(), 404);
    assert_eq!(response.detail().as_deref(), Some("Modrinth project 'fabric-api' not found"));
}

#[tokio::test]
async fn test_modrinth_pom_with_expanded_dependencies() {
    let server = MockServer::start().await;

    let dependencies = json!([
        { "project_id": "lib", "version_id": "l1", "dependency_type": "required" },
        { "project_id": "unpinned", "dependency_type": "optional" }
    ]);

    Mock::given(method("GET"))
        .and(path("/project/mymod/version/1.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(modrinth_version("m1", "mymod", "1.0.0", &["fabric"], dependencies)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/project/lib/version/l1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(modrinth_version("l1", "lib", "2.5.0", &["fabric"], json!([]))))
        .mount(&server)
        .await;

    let response = repository(&server).get("com/modrinth/fabric/mymod/1.0.0/mymod-1.0.0.pom").await;
    let pom = body(&response);

    assert!(pom.contains("  <groupId>com.modrinth.fabric</groupId>\n  <artifactId>mymod</artifactId>\n  <version>1.0.0</version>"));
    assert!(pom.contains("      <artifactId>lib</artifactId>\n      <version>2.5.0</version>"));
    assert!(!pom.contains("unpinned"));
    assert_eq!(pom.matches("<dependency>").count(), 1);
}

#[tokio::test]
async fn test_modrinth_loader_mismatch_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/project/mymod/version/1.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(modrinth_version("m1", "mymod", "1.0.0", &["fabric"], json!([]))))
        .mount(&server)
        .await;

    let repository = repository(&server);
    assert_eq!(repository.get("com/modrinth/forge/mymod/1.0.0/mymod-1.0.0.pom").await.status(), 404);
    assert_eq!(repository.get("com/modrinth/forge/mymod/1.0.0/mymod-1.0.0.jar").await.status(), 404);
}

#[tokio::test]
async fn test_modrinth_jar_redirects_to_primary_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/project/mymod/version/1.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(modrinth_version("m1", "mymod", "1.0.0", &["quilt"], json!([]))))
        .mount(&server)
        .await;

    let response = repository(&server).get("com/modrinth/quilt/mymod/1.0.0/mymod-1.0.0.jar").await;
    assert_eq!(response.status(), 307);
    assert_eq!(header(&response.headers(), "Location"), Some("https://cdn.modrinth.com/m1.jar"));
    assert_eq!(header(&response.headers(), "Cache-Control"), Some("public, max-age=900"));
}

#[tokio::test]
async fn test_modrinth_jar_without_primary_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/project/mymod/version/1.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m1",
            "project_id": "mymod",
            "name": "1.0.0",
            "version_number": "1.0.0",
            "loaders": ["fabric"],
            "files": [{ "url": "https://cdn.modrinth.com/extra.jar", "filename": "extra.jar", "primary": false }]
        })))
        .mount(&server)
        .await;

    let response = repository(&server).get("com/modrinth/fabric/mymod/1.0.0/mymod-1.0.0.jar").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_bad_file_name_never_reaches_upstream() {
    let server = MockServer::start().await;
    let repository = repository(&server);

    assert_eq!(repository.get("com/modrinth/fabric/mymod/1.0.0/other-1.0.0.pom").await.status(), 400);
    assert_eq!(repository.get("io/papermc/hangar/paper/Maintenance/4.2.1/Maintenance-4.2.0.jar").await.status(), 400);
    assert_eq!(repository.get("com/modrinth/liteloader/mymod/maven-metadata.xml").await.status(), 400);

    assert!(server.received_requests().await.unwrap().is_empty());
}
