#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use bangumi_core::BangumiItem;
use bangumi_fetch::{FetchError, FetchProgress, PageEnvelope, PageSource};

/// Serves pages from memory. Pages not in the map fail with HTTP 503.
pub struct MockSource {
    pub page_size: u32,
    pub pages: HashMap<u32, PageEnvelope>,
}

impl MockSource {
    /// Split `items` into pages of `page_size`.
    pub fn paged(page_size: u32, items: Vec<BangumiItem>) -> Self {
        let chunks: Vec<Vec<BangumiItem>> = items
            .chunks(page_size as usize)
            .map(<[BangumiItem]>::to_vec)
            .collect();
        let total_pages = chunks.len() as u32;
        let pages = chunks
            .into_iter()
            .enumerate()
            .map(|(i, list)| (i as u32 + 1, PageEnvelope::ok(total_pages, list)))
            .collect();
        Self { page_size, pages }
    }

    /// A source whose first page is unreachable.
    pub fn offline() -> Self {
        Self {
            page_size: 30,
            pages: HashMap::new(),
        }
    }
}

impl PageSource for MockSource {
    fn page_size(&self) -> u32 {
        self.page_size
    }

    async fn fetch_page(&self, page: u32) -> Result<PageEnvelope, FetchError> {
        self.pages
            .get(&page)
            .cloned()
            .ok_or(FetchError::Status { page, status: 503 })
    }
}

#[derive(Default)]
pub struct Recorder(Mutex<Vec<u8>>);

impl Recorder {
    pub fn seen(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

impl FetchProgress for Recorder {
    fn on_progress(&self, percent: u8) {
        self.0.lock().unwrap().push(percent);
    }
}

pub fn remote_items(n: i64) -> Vec<BangumiItem> {
    (1..=n)
        .map(|i| {
            BangumiItem::new(format!("Remote {i}"))
                .with_id(100 + i)
                .with_label("type", "TV")
        })
        .collect()
}

pub fn names(items: &[BangumiItem]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}
