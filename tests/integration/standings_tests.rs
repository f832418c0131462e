//! Standings reconstruction against a mock contest site

use crate::common::{create_test_config, mount_page, ratings_page, standings_dir};
use standings_crawler::config::PaginationMode;
use standings_crawler::crawler::Coordinator;
use standings_crawler::storage::read_standings;
use standings_crawler::StandingsError;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROWS_1: &[(&str, usize)] = &[("tourist", 1), ("petr", 2), ("jiangly", 2)];
const ROWS_2: &[(&str, usize)] = &[("ecnerwala", 2), ("um_nik", 5), ("radewoosh", 6)];
const ROWS_3: &[(&str, usize)] = &[("benq", 7), ("ksun48", 7)];

/// Contest 1500: three pages of up to three rows, a tie spanning pages 1 and 2,
/// and page 4 answered with page 3 again
async fn mount_contest(server: &MockServer) {
    let base = "/contest/1500/ratings/page/";
    mount_page(server, &format!("{}1", base), ratings_page(1500, ROWS_1, 3)).await;
    mount_page(server, &format!("{}2", base), ratings_page(1500, ROWS_2, 3)).await;
    mount_page(server, &format!("{}3", base), ratings_page(1500, ROWS_3, 3)).await;
    mount_page(server, &format!("{}4", base), ratings_page(1500, ROWS_3, 3)).await;
}

const EXPECTED_FILE: &str = "8 Codeforces Round 1500\n\
tourist 1 1\n\
petr 2 4\n\
jiangly 2 4\n\
ecnerwala 2 4\n\
um_nik 5 5\n\
radewoosh 6 6\n\
benq 7 8\n\
ksun48 7 8\n";

#[tokio::test]
async fn test_concurrent_standings_file() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_contest(&server).await;

    let config = create_test_config(&server.uri(), &dir, PaginationMode::Concurrent, 3);
    let coordinator = Coordinator::new(config).unwrap();

    let report = coordinator.save_standings(&[1500]).await;

    assert_eq!(report.saved, vec![1500]);
    let written = std::fs::read_to_string(standings_dir(&dir).join("1500.txt")).unwrap();
    assert_eq!(written, EXPECTED_FILE);

    let requests = server.received_requests().await.unwrap();
    let page_one = requests
        .iter()
        .filter(|r| r.url.path() == "/contest/1500/ratings/page/1")
        .count();
    assert_eq!(page_one, 1);
    assert!(requests
        .iter()
        .all(|r| r.url.path() != "/contest/1500/ratings/page/4"));
}

#[tokio::test]
async fn test_sequential_standings_stop_at_repeated_page() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_contest(&server).await;

    let config = create_test_config(&server.uri(), &dir, PaginationMode::Sequential, 3);
    let coordinator = Coordinator::new(config).unwrap();

    let standings = coordinator.collect_standings(1500).await.unwrap();

    assert_eq!(standings.title, "Codeforces Round 1500");
    assert_eq!(standings.len(), 8);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests
            .iter()
            .filter(|r| r.url.path() == "/contest/1500/ratings/page/4")
            .count(),
        1
    );
    assert!(requests
        .iter()
        .all(|r| r.url.path() != "/contest/1500/ratings/page/5"));
}

#[tokio::test]
async fn test_requests_identify_the_crawler() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let body = ratings_page(3, &[("a", 1)], 0);

    Mock::given(method("GET"))
        .and(path("/contest/3/ratings/page/1"))
        .and(header("user-agent", "TestBot/1.0.0 (+https://example.com/contact)"))
        .and(header("from", "test@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/contest/3/ratings/page/1", body).await;

    let config = create_test_config(&server.uri(), &dir, PaginationMode::Concurrent, 100);
    Coordinator::new(config)
        .unwrap()
        .collect_standings(3)
        .await
        .unwrap();

    server.verify().await;
}

#[tokio::test]
async fn test_broken_contest_leaves_no_file_and_run_continues() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_contest(&server).await;
    // rank 3 at position 2 cannot happen without a tie at rank 1
    mount_page(
        &server,
        "/contest/1400/ratings/page/1",
        ratings_page(1400, &[("a", 1), ("b", 3)], 0),
    )
    .await;

    let config = create_test_config(&server.uri(), &dir, PaginationMode::Concurrent, 3);
    let coordinator = Coordinator::new(config).unwrap();

    let err = coordinator.collect_standings(1400).await.unwrap_err();
    assert!(matches!(err, StandingsError::Structural(_)));

    let report = coordinator.save_standings(&[1400, 1500]).await;

    assert_eq!(report.saved, vec![1500]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, 1400);
    assert!(!standings_dir(&dir).join("1400.txt").exists());
    assert_eq!(read_standings(&standings_dir(&dir), 1500).unwrap().len(), 8);
}
