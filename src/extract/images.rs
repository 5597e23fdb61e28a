use std::time::Duration;

use anyhow::Result;
use tracing::warn;

use crate::graph::{Graph, Node};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Seam for the one network operation in the pipeline, so resolution logic
/// can be exercised against a fake.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetcher with a bounded timeout. One attempt, no retries;
/// a miss degrades the record to no photo.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

/// Resolve the recipe photo from the optional `Image` list.
///
/// Entries are tried in display order; within an entry the embedded blob
/// wins, then a fetch of its `url`, then the thumbnail. The first entry
/// that resolves ends the search. A failed fetch gives up on the photo
/// entirely rather than falling back to a stale thumbnail.
pub fn resolve(graph: &Graph, fetcher: &dyn Fetcher) -> Option<Vec<u8>> {
    let mut entries: Vec<&Graph> = graph
        .list("Image")?
        .iter()
        .filter_map(Node::as_graph)
        .collect();
    entries.sort_by_key(|e| e.int("displayOrder").unwrap_or(0));

    for entry in entries {
        if let Some(data) = entry.blob("Data") {
            return Some(data.to_vec());
        }
        if let Some(url) = entry.string("url") {
            warn!("missing photo data, fetching {url}");
            match fetcher.fetch(url) {
                Ok(bytes) => return Some(bytes),
                Err(e) => {
                    warn!("photo fetch failed for {url}: {e:#}");
                    return None;
                }
            }
        }
        if let Some(thumbnail) = entry.blob("thumbnail") {
            warn!("missing photo data and URL, using thumbnail");
            return Some(thumbnail.to_vec());
        }
    }
    None
}
