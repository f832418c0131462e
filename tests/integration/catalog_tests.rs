//! Catalog sweep against a mock contest site

use crate::common::{catalog_path, create_test_config, index_page, mount_page, ratings_page};
use standings_crawler::config::PaginationMode;
use standings_crawler::crawler::Coordinator;
use standings_crawler::storage::read_catalog;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_index(server: &MockServer, page: u32, ids: &[u64]) {
    Mock::given(method("GET"))
        .and(path(format!("/contests/page/{}", page)))
        .and(query_param("locale", "ru"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(ids)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_catalog_keeps_rated_contests_oldest_first() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_index(&server, 1, &[1503, 1502, 1501]).await;
    mount_index(&server, 2, &[1501, 1500]).await;
    mount_page(&server, "/contest/1503/ratings", ratings_page(1503, &[("a", 1)], 0)).await;
    mount_page(&server, "/contest/1502/ratings", ratings_page(1502, &[], 0)).await;
    mount_page(
        &server,
        "/contest/1501/ratings",
        ratings_page(1501, &[("b", 1), ("c", 1)], 0),
    )
    .await;
    mount_page(&server, "/contest/1500/ratings", ratings_page(1500, &[("d", 1)], 0)).await;

    let config = create_test_config(&server.uri(), &dir, PaginationMode::Concurrent, 100);
    let coordinator = Coordinator::new(config).unwrap();

    let outcome = coordinator.run_catalog(2).await.unwrap();

    assert_eq!(outcome.catalog.ids(), vec![1500, 1501, 1503]);
    assert!(outcome.skipped.is_empty());
    assert_eq!(
        std::fs::read_to_string(catalog_path(&dir)).unwrap(),
        "3\n1500\n1501\n1503\n"
    );
    assert_eq!(
        read_catalog(&catalog_path(&dir)).unwrap().ids(),
        vec![1500, 1501, 1503]
    );

    let requests = server.received_requests().await.unwrap();
    let ratings_1501 = requests
        .iter()
        .filter(|r| r.url.path() == "/contest/1501/ratings")
        .count();
    assert_eq!(ratings_1501, 1);
}

#[tokio::test]
async fn test_index_page_outage_is_retried() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/contests/page/1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_index(&server, 1, &[7]).await;
    mount_page(&server, "/contest/7/ratings", ratings_page(7, &[("a", 1)], 0)).await;

    let config = create_test_config(&server.uri(), &dir, PaginationMode::Concurrent, 100);
    let coordinator = Coordinator::new(config).unwrap();

    let outcome = coordinator.run_catalog(1).await.unwrap();

    assert_eq!(outcome.catalog.ids(), vec![7]);
    let index_requests = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/contests/page/1")
        .count();
    assert_eq!(index_requests, 2);
}

#[tokio::test]
async fn test_catalog_drives_standings_run() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_index(&server, 1, &[12, 11, 10]).await;
    for id in [10u64, 11, 12] {
        let rows = [("solo", 1)];
        mount_page(&server, &format!("/contest/{}/ratings", id), ratings_page(id, &rows, 0)).await;
        mount_page(
            &server,
            &format!("/contest/{}/ratings/page/1", id),
            ratings_page(id, &rows, 0),
        )
        .await;
    }

    let config = create_test_config(&server.uri(), &dir, PaginationMode::Concurrent, 100);
    let coordinator = Coordinator::new(config).unwrap();
    coordinator.run_catalog(1).await.unwrap();

    let last_two = coordinator.catalog_ids(Some(2)).unwrap();
    assert_eq!(last_two, vec![11, 12]);

    let report = coordinator.save_standings(&last_two).await;
    assert_eq!(report.saved, vec![11, 12]);
    assert!(report.is_success());
}
