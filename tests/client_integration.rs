//! IndexClient integration tests against a mock index service.

use comcrawl::{ClientConfig, IndexClient, IndexId};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COLLINFO: &str = r#"[
    {"id": "CC-MAIN-2020-05", "name": "January 2020 Index", "timegate": "t", "cdx-api": "c"},
    {"id": "CC-MAIN-2019-51", "name": "December 2019 Index", "timegate": "t", "cdx-api": "c"}
]"#;

fn config_for(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.service.base_url = server.uri();
    config.service.timeout_seconds = 5;
    config
}

fn index(id: &str) -> IndexId {
    IndexId::new(id).expect("index id")
}

async fn mount_index(server: &MockServer, collection: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{collection}-index")))
        .and(query_param("output", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn searches_every_listed_index_when_none_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collinfo.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(COLLINFO))
        .expect(1)
        .mount(&server)
        .await;
    mount_index(&server, "CC-MAIN-2020-05", "{\"url\":\"https://a.test/new\"}\n").await;
    mount_index(&server, "CC-MAIN-2019-51", "{\"url\":\"https://a.test/old\"}\n").await;

    let client = IndexClient::new(&config_for(&server)).expect("client");
    let request = client
        .request("a.test/*", vec![], None, Some(2))
        .await
        .expect("request");
    let ids: Vec<&str> = request.indexes.iter().map(IndexId::as_str).collect();
    assert_eq!(ids, vec!["2020-05", "2019-51"]);

    let results = client.search(&request).await.expect("search");
    let urls: Vec<&str> = results.iter().filter_map(|r| r.url()).collect();
    assert_eq!(urls, vec!["https://a.test/new", "https://a.test/old"]);
}

#[tokio::test]
async fn listing_and_all_index_search_skip_the_same_bad_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collinfo.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[
                {"id": "CC-MAIN-2020-05", "name": "January 2020 Index", "timegate": "t", "cdx-api": "c"},
                {"id": "CC-MAIN-", "name": "Broken", "timegate": "t", "cdx-api": "c"},
                {"id": "CC-MAIN-2019-51", "name": "December 2019 Index", "timegate": "t", "cdx-api": "c"}
            ]"#,
        ))
        .mount(&server)
        .await;

    let client = IndexClient::new(&config_for(&server)).expect("client");
    let listed = client.listed_indexes().await.expect("listing");
    let names: Vec<(&str, &str)> = listed
        .iter()
        .map(|(id, info)| (id.as_str(), info.name.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![("2020-05", "January 2020 Index"), ("2019-51", "December 2019 Index")]
    );

    let request = client.request("f.test", vec![], None, None).await.expect("request");
    let ids: Vec<&str> = request.indexes.iter().map(IndexId::as_str).collect();
    assert_eq!(ids, vec!["2020-05", "2019-51"]);
}

#[tokio::test]
async fn configured_defaults_apply_when_not_overridden() {
    let server = MockServer::start().await;
    let mut config = config_for(&server);
    config.search.indexes = vec![index("2019-51")];
    config.search.worker_count = Some(4);

    let client = IndexClient::new(&config).expect("client");

    let request = client
        .request("b.test", vec![], None, None)
        .await
        .expect("request");
    assert_eq!(request.indexes, vec![index("2019-51")]);
    assert_eq!(request.worker_count, Some(4));

    let overridden = client
        .request("b.test", vec![index("2020-05")], Some(1), Some(1))
        .await
        .expect("request");
    assert_eq!(overridden.indexes, vec![index("2020-05")]);
    assert_eq!(overridden.worker_count, Some(1));
    assert_eq!(overridden.page, Some(1));
}

#[tokio::test]
async fn detailed_search_reports_missing_index() {
    let server = MockServer::start().await;
    mount_index(&server, "CC-MAIN-2019-51", "{\"url\":\"https://c.test/\"}\n").await;

    let client = IndexClient::new(&config_for(&server)).expect("client");
    let request = client
        .request("c.test", vec![index("2019-51"), index("1999-01")], None, None)
        .await
        .expect("request");

    let report = client.search_detailed(&request).await.expect("report");
    assert_eq!(report.total_results(), 1);
    assert_eq!(report.misses().len(), 1);
    assert_eq!(report.misses()[0].0.as_str(), "1999-01");
}

#[tokio::test]
async fn unreachable_collinfo_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collinfo.json"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = IndexClient::new(&config_for(&server)).expect("client");
    let err = client.request("d.test", vec![], None, None).await.unwrap_err();
    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn zero_workers_turns_off_configured_pool() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/CC-MAIN-2019-51-index"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"url\":\"https://e.test/p2\"}\n"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.search.worker_count = Some(4);
    let client = IndexClient::new(&config).expect("client");

    let request = client
        .request("e.test/*", vec![index("2019-51")], Some(2), Some(0))
        .await
        .expect("request");
    assert_eq!(request.worker_count, Some(0));
    assert!(request.honours_page());

    let results = client.search(&request).await.expect("search");
    let urls: Vec<&str> = results.iter().filter_map(|r| r.url()).collect();
    assert_eq!(urls, vec!["https://e.test/p2"]);
}

#[test]
fn invalid_config_rejected() {
    let mut config = ClientConfig::default();
    config.service.timeout_seconds = 0;
    assert!(IndexClient::new(&config).is_err());
}
