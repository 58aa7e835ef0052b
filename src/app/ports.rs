use async_trait::async_trait;

use crate::error::Result;

/// Outbound page retrieval. Implementations must bound the request with a
/// timeout and map non-2xx responses to an error.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

#[derive(Clone, Debug)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}
