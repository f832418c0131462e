use standings_crawler::config::{
    Config, CrawlerConfig, OutputConfig, PaginationMode, SourceConfig, UserAgentConfig,
};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server, writing into `dir`
pub fn create_test_config(
    base_url: &str,
    dir: &TempDir,
    pagination: PaginationMode,
    page_size: usize,
) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_concurrent_fetches: 4,
            retry_delay_secs: 1,
            request_timeout_secs: 5,
            connect_timeout_secs: 5,
            page_size,
            pagination,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        source: SourceConfig {
            base_url: base_url.to_string(),
            locale: Some("ru".to_string()),
        },
        output: OutputConfig {
            standings_dir: standings_dir(dir).display().to_string(),
            catalog_path: catalog_path(dir).display().to_string(),
        },
    }
}

pub fn standings_dir(dir: &TempDir) -> PathBuf {
    dir.path().join("standings")
}

pub fn catalog_path(dir: &TempDir) -> PathBuf {
    dir.path().join("data").join("all_contests.txt")
}

/// A ratings page: title, participant rows, and links to pages `1..=pages`
pub fn ratings_page(contest_id: u64, rows: &[(&str, usize)], pages: u32) -> String {
    let rows: String = rows
        .iter()
        .map(|(handle, rank)| {
            format!(
                r#"<tr participantId="{h}" id="p-{h}"><td>{r}</td><td><a href="/profile/{h}">{h}</a></td><td>1500</td></tr>"#,
                h = handle,
                r = rank
            )
        })
        .collect();
    let links: String = (1..=pages)
        .map(|p| {
            let href = if p == 1 {
                format!("/contest/{}/ratings/page/1?order=BY_RANK", contest_id)
            } else {
                format!("/contest/{}/ratings/page/{}", contest_id, p)
            };
            format!(r#"<span class="page-index"><a href="{}">{}</a></span>"#, href, p)
        })
        .collect();

    format!(
        r#"<html><body>
        <div class="title"><a href="/contest/{c}">
            Codeforces Round {c}
        </a></div>
        <table class="standings">
            <tr><th>#</th><th>Who</th><th>Rating</th></tr>
            {rows}
        </table>
        <div class="pagination">{links}</div>
        </body></html>"#,
        c = contest_id,
        rows = rows,
        links = links
    )
}

/// An index page listing `ids` newest first, with the usual noise links
pub fn index_page(ids: &[u64]) -> String {
    let rows: String = ids
        .iter()
        .map(|id| {
            format!(
                r##"<tr><td><a href="/contest/{id}">Enter</a></td>
                <td><a href="/contest/{id}/standings">Standings</a></td>
                <td><a href="/contest/{id}#registration">Register</a></td></tr>"##,
                id = id
            )
        })
        .collect();
    format!(
        r#"<html><body><table>{}</table><a href="/contests/page/2">next</a></body></html>"#,
        rows
    )
}

pub async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}
