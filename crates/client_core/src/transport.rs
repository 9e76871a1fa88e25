use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde_json::Value;
use shared::{
    domain::{Sensitivity, PDF_MIME_TYPE},
    protocol::{ProcessOutcome, ProcessResponse, FILE_FIELD, PROCESS_PATH, SENSITIVITY_FIELD},
};
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::{
    download::{fetch_download, DownloadError},
    state::SubmissionTicket,
};

/// Everything one `POST /process` needs, captured when the submission starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRequest {
    pub ticket: SubmissionTicket,
    pub file_name: String,
    pub file_bytes: Vec<u8>,
    pub sensitivity: Sensitivity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReply {
    pub status: u16,
    pub body: ProcessResponse,
}

impl ProcessReply {
    pub fn http_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid server url {url:?}: {source}")]
    InvalidServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to processing service failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("processing service returned a body that is not JSON: {0}")]
    InvalidBody(#[source] reqwest::Error),
    #[error("processing service returned a null body (HTTP {status})")]
    NullBody { status: u16 },
}

#[async_trait]
pub trait ProcessTransport: Send + Sync {
    async fn process(&self, request: ProcessRequest) -> Result<ProcessReply, TransportError>;
}

/// Maps a finished transport call onto the widget outcome. Anything short of
/// a parsed JSON body is reported as a connectivity failure.
pub fn outcome_from_result(result: Result<ProcessReply, TransportError>) -> ProcessOutcome {
    match result {
        Ok(reply) => ProcessOutcome::from_reply(reply.http_ok(), &reply.body),
        Err(err) => {
            error!(error = %err, "process request did not complete");
            ProcessOutcome::connection_failed()
        }
    }
}

pub struct HttpProcessTransport {
    http: Client,
    server_url: Url,
    endpoint: Url,
}

impl HttpProcessTransport {
    pub fn new(server_url: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let parse_error = |source| TransportError::InvalidServerUrl {
            url: server_url.to_string(),
            source,
        };
        let server_url_parsed = Url::parse(server_url.trim()).map_err(parse_error)?;
        let endpoint = server_url_parsed.join(PROCESS_PATH).map_err(parse_error)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(TransportError::Client)?;

        Ok(Self {
            http,
            server_url: server_url_parsed,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches the processed document behind a success panel's download link.
    pub async fn download(&self, link: &str) -> Result<Vec<u8>, DownloadError> {
        fetch_download(&self.http, &self.server_url, link).await
    }
}

#[async_trait]
impl ProcessTransport for HttpProcessTransport {
    async fn process(&self, request: ProcessRequest) -> Result<ProcessReply, TransportError> {
        let file_part = Part::bytes(request.file_bytes)
            .file_name(request.file_name)
            .mime_str(PDF_MIME_TYPE)
            .map_err(TransportError::Client)?;
        let form = Form::new()
            .part(FILE_FIELD, file_part)
            .text(SENSITIVITY_FIELD, request.sensitivity.form_value());

        debug!(endpoint = %self.endpoint, ticket = request.ticket.0, "posting multipart form");
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(TransportError::Network)?;

        let status = response.status().as_u16();
        let body: Value = response.json().await.map_err(TransportError::InvalidBody)?;
        // Field reads on `null` have nothing to fall back on; scalars and arrays just have no fields.
        if body.is_null() {
            return Err(TransportError::NullBody { status });
        }
        Ok(ProcessReply {
            status,
            body: ProcessResponse::from_json(&body),
        })
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
