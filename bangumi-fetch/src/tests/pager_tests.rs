use std::collections::HashMap;
use std::sync::Mutex;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::*;
use crate::settings::RemoteConfig;
use crate::types::PageData;

/// In-process page source. Pages absent from the map fail with HTTP 503.
struct ScriptedSource {
    page_size: u32,
    pages: HashMap<u32, PageEnvelope>,
    requested: Mutex<Vec<u32>>,
}

impl ScriptedSource {
    fn new(page_size: u32) -> Self {
        Self {
            page_size,
            pages: HashMap::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn page(mut self, page: u32, envelope: PageEnvelope) -> Self {
        self.pages.insert(page, envelope);
        self
    }

    fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

impl PageSource for ScriptedSource {
    fn page_size(&self) -> u32 {
        self.page_size
    }

    async fn fetch_page(&self, page: u32) -> Result<PageEnvelope, FetchError> {
        self.requested.lock().unwrap().push(page);
        self.pages
            .get(&page)
            .cloned()
            .ok_or(FetchError::Status { page, status: 503 })
    }
}

#[derive(Default)]
struct Recorder(Mutex<Vec<u8>>);

impl FetchProgress for Recorder {
    fn on_progress(&self, percent: u8) {
        self.0.lock().unwrap().push(percent);
    }
}

impl Recorder {
    fn seen(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

fn items(prefix: &str, n: usize) -> Vec<BangumiItem> {
    (0..n)
        .map(|i| BangumiItem::new(format!("{prefix}-{i}")))
        .collect()
}

fn names(items: &[BangumiItem]) -> Vec<String> {
    items.iter().map(|i| i.name.clone()).collect()
}

#[test]
fn percent_rounds_and_clamps() {
    assert_eq!(progress_percent(0, 90), 0);
    assert_eq!(progress_percent(30, 90), 33);
    assert_eq!(progress_percent(60, 90), 67);
    assert_eq!(progress_percent(90, 90), 100);
    assert_eq!(progress_percent(120, 90), 100);
    assert_eq!(progress_percent(5, 0), 100);
}

#[tokio::test]
async fn walks_all_pages_in_order() {
    let source = ScriptedSource::new(2)
        .page(1, PageEnvelope::ok(3, items("p1", 2)))
        .page(2, PageEnvelope::ok(3, items("p2", 2)))
        .page(3, PageEnvelope::ok(3, items("p3", 1)));
    let progress = Recorder::default();

    let all = fetch_all(&source, &progress).await.unwrap();

    assert_eq!(
        names(&all),
        vec!["p1-0", "p1-1", "p2-0", "p2-1", "p3-0"]
    );
    assert_eq!(source.requested(), vec![1, 2, 3]);
    // Estimated total is 6, the last page only had one item.
    assert_eq!(progress.seen(), vec![33, 67, 83]);
}

#[tokio::test]
async fn failed_middle_page_is_skipped() {
    // 3 pages of 70, 200 items in total; page 2 is down.
    let source = ScriptedSource::new(70)
        .page(1, PageEnvelope::ok(3, items("p1", 70)))
        .page(3, PageEnvelope::ok(3, items("p3", 60)));
    let progress = Recorder::default();

    let all = fetch_all(&source, &progress).await.unwrap();

    assert_eq!(all.len(), 130);
    assert_eq!(all[0].name, "p1-0");
    assert_eq!(all[69].name, "p1-69");
    assert_eq!(all[70].name, "p3-0");
    assert_eq!(source.requested(), vec![1, 2, 3]);
    assert_eq!(progress.seen(), vec![33, 62]);
}

#[tokio::test]
async fn non_success_middle_page_is_skipped() {
    let refused = PageEnvelope {
        code: 500,
        message: Some("busy".to_string()),
        data: None,
    };
    let source = ScriptedSource::new(1)
        .page(1, PageEnvelope::ok(3, items("p1", 1)))
        .page(2, refused)
        .page(3, PageEnvelope::ok(3, items("p3", 1)));
    let progress = Recorder::default();

    let all = fetch_all(&source, &progress).await.unwrap();
    assert_eq!(names(&all), vec!["p1-0", "p3-0"]);
    assert_eq!(progress.seen().len(), 2);
}

#[tokio::test]
async fn non_success_first_page_aborts() {
    let source = ScriptedSource::new(30).page(
        1,
        PageEnvelope {
            code: 404,
            message: Some("user not found".to_string()),
            data: Some(PageData::default()),
        },
    );
    let progress = Recorder::default();

    let err = fetch_all(&source, &progress).await.unwrap_err();
    assert!(matches!(err, FetchError::RemoteMetadata(_)));
    assert!(err.to_string().contains("user not found"));
    assert_eq!(source.requested(), vec![1]);
    assert!(progress.seen().is_empty());
}

#[tokio::test]
async fn unreachable_first_page_aborts() {
    let source = ScriptedSource::new(30);
    let err = fetch_all(&source, &SilentProgress).await.unwrap_err();
    assert_eq!(
        bangumi_core::Classified::kind(&err),
        bangumi_core::ErrorKind::RemoteMetadata
    );
}

#[tokio::test]
async fn zero_pages_is_empty_success() {
    let source = ScriptedSource::new(30).page(1, PageEnvelope::ok(0, Vec::new()));
    let progress = Recorder::default();

    let all = fetch_all(&source, &progress).await.unwrap();
    assert!(all.is_empty());
    assert_eq!(progress.seen(), vec![100]);
}

#[tokio::test]
async fn missing_settings_fail_before_any_request() {
    let err = fetch_catalog(&Settings::default(), &SilentProgress)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Config(_)));
}

/// Serve `GET /collections?...&page=N` from a minimal HTTP/1.1 listener.
async fn serve_pages(total_pages: u32) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let mut read = 0;
                while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf[read..]).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => read += n,
                    }
                }
                let request = String::from_utf8_lossy(&buf[..read]).to_string();
                let target = request.split_whitespace().nth(1).unwrap_or("/");
                let page: u32 = target
                    .split(['?', '&'])
                    .find_map(|kv| kv.strip_prefix("page="))
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(0);
                assert!(target.contains("userId=alice"));
                assert!(target.contains("pageSize=2"));

                let (status, body) = if page == 2 {
                    ("500 Internal Server Error", String::new())
                } else {
                    let list = vec![BangumiItem::new(format!("page{page}")).with_id(page as i64)];
                    let env = PageEnvelope::ok(total_pages, list);
                    ("200 OK", serde_json::to_string(&env).unwrap())
                };
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}/collections", addr)
}

#[tokio::test]
async fn http_client_walks_local_server() {
    let api_url = serve_pages(3).await;
    let config = RemoteConfig {
        api_url,
        user_id: "alice".to_string(),
        page_size: 2,
        subject_type: 2,
        collection_type: 2,
    };
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    let client = CatalogClient::with_http(http, config);
    let progress = Recorder::default();

    let all = fetch_all(&client, &progress).await.unwrap();

    assert_eq!(names(&all), vec!["page1", "page3"]);
    assert_eq!(all[1].id, Some(3));
    assert_eq!(progress.seen(), vec![17, 33]);
}
