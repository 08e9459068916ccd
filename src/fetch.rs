use crate::error::WorkerError;

use futures::StreamExt;
use tracing::info;

/// Retrieves source text from the URL-addressed code store.
///
/// One GET per call, no retry. Retry policy belongs to the caller.
pub struct CodeFetcher {
    http: reqwest::Client,
    size_limit: u64,
}

impl CodeFetcher {
    pub fn new(size_limit: u64) -> Self {
        Self {
            http: reqwest::Client::new(),
            size_limit,
        }
    }

    #[tracing::instrument(err, skip(self))]
    pub async fn fetch(&self, code_ref: &str) -> Result<String, WorkerError> {
        let res = self
            .http
            .get(code_ref)
            .send()
            .await
            .map_err(WorkerError::FetchTransport)?;

        let status = res.status();
        if !status.is_success() {
            return Err(WorkerError::FetchStatus(status));
        }

        let mut stream = res.bytes_stream();
        let mut body: Vec<u8> = Vec::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(WorkerError::FetchTransport)?;
            body.extend_from_slice(&chunk);
            if body.len() as u64 > self.size_limit {
                return Err(WorkerError::BodyTooLarge {
                    size: body.len() as u64,
                    size_limit: self.size_limit,
                });
            }
        }

        info!(size = body.len(), "fetched code");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
