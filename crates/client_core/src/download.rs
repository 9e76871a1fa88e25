//! Resolution of the success panel's download link into document bytes.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download link is empty")]
    EmptyLink,
    #[error("invalid download link {link:?}: {source}")]
    InvalidLink {
        link: String,
        #[source]
        source: url::ParseError,
    },
    #[error("malformed data url")]
    MalformedDataUrl,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("download request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Decodes `data:` links locally; other links are fetched, relative ones
/// against the server the document was processed by.
pub async fn fetch_download(http: &Client, base: &Url, link: &str) -> Result<Vec<u8>, DownloadError> {
    let link = link.trim();
    if link.is_empty() {
        return Err(DownloadError::EmptyLink);
    }
    if let Some(bytes) = decode_data_url(link) {
        return bytes;
    }

    let url = base.join(link).map_err(|source| DownloadError::InvalidLink {
        link: link.to_string(),
        source,
    })?;
    info!(%url, "downloading processed document");
    let bytes = http
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    Ok(bytes.to_vec())
}

/// `None` when `link` is not a data URL at all.
pub fn decode_data_url(link: &str) -> Option<Result<Vec<u8>, DownloadError>> {
    let rest = link.strip_prefix("data:")?;
    let Some((meta, payload)) = rest.split_once(',') else {
        return Some(Err(DownloadError::MalformedDataUrl));
    };
    if meta.ends_with(";base64") {
        Some(STANDARD.decode(payload).map_err(DownloadError::from))
    } else {
        Some(Ok(payload.as_bytes().to_vec()))
    }
}

/// Name offered when saving: the service's suggestion, else `clean_<original>`.
pub fn suggested_file_name(service_name: Option<&str>, original_name: &str) -> String {
    service_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("clean_{original_name}"))
}

#[cfg(test)]
#[path = "tests/download_tests.rs"]
mod tests;
