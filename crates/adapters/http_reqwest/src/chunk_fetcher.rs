//! Remote glyph catalog chunks over HTTP.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use pageshell_app::ports::ChunkFetcher;
use pageshell_domain::error::FetchError;
use pageshell_domain::icon::ChunkMap;

use crate::error::ClientError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`ChunkFetcher`] requesting `<base>/static/mdi/<file>.json`.
#[derive(Clone)]
pub struct HttpChunkFetcher {
    client: Client,
    base: Url,
}

impl HttpChunkFetcher {
    /// Fetch chunks from the catalog served at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if `base` is not a valid base URL or the HTTP
    /// client cannot be built.
    pub fn new(base: &str) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Self::with_client(client, base)
    }

    /// Like [`HttpChunkFetcher::new`] with a preconfigured client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if `base` is not a valid base URL.
    pub fn with_client(client: Client, base: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            return Err(ClientError::NotABase(base.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { client, base })
    }

    /// URL of the chunk named `file`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if `file` does not form a valid URL.
    pub fn chunk_url(&self, file: &str) -> Result<Url, FetchError> {
        self.base
            .join(&format!("static/mdi/{file}.json"))
            .map_err(|err| FetchError::new(file, err))
    }
}

impl ChunkFetcher for HttpChunkFetcher {
    fn fetch_chunk(&self, file: &str) -> impl Future<Output = Result<ChunkMap, FetchError>> + Send {
        let client = self.client.clone();
        let url = self.chunk_url(file);
        let file = file.to_string();
        async move {
            let url = url?;
            tracing::debug!(%url, "requesting icon chunk");
            let response = client
                .get(url)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|err| FetchError::new(&file, describe(&err)))?;
            response
                .json::<ChunkMap>()
                .await
                .map_err(|err| FetchError::new(&file, describe(&err)))
        }
    }
}

fn describe(err: &reqwest::Error) -> String {
    match err.status() {
        Some(status) => format!("status {status}"),
        None if err.is_decode() => "invalid chunk body".to_string(),
        None if err.is_timeout() => "timed out".to_string(),
        None => "request failed".to_string(),
    }
}
