use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use scan_logging::{scan_debug, scan_info};
use url::Url;

use crate::gate::{check_content_type, parse_analysis_body};
use crate::{AnalysisPayload, ClientError, FailureKind, ImageUpload, ReportPayload};

pub const ANALYZE_PATH: &str = "analyze";
pub const REPORT_PATH: &str = "download_report";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Cap on analyze response bodies (JSON carrying base64 stage images).
    pub max_analysis_bytes: u64,
    /// Cap on generated report documents.
    pub max_report_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            max_analysis_bytes: 64 * 1024 * 1024,
            max_report_bytes: 20 * 1024 * 1024,
        }
    }
}

/// The two remote collaborators: image analysis and report generation.
#[async_trait::async_trait]
pub trait ScanService: Send + Sync {
    async fn analyze(&self, upload: ImageUpload) -> Result<AnalysisPayload, ClientError>;

    async fn generate_report(&self, payload: &ReportPayload) -> Result<Vec<u8>, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestScanClient {
    settings: ClientSettings,
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestScanClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            base_url,
            client,
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ScanService for ReqwestScanClient {
    async fn analyze(&self, upload: ImageUpload) -> Result<AnalysisPayload, ClientError> {
        let url = self.endpoint(ANALYZE_PATH)?;
        scan_info!(
            "POST {} file={} bytes={}",
            url,
            upload.file_name,
            upload.bytes.len()
        );

        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime)
            .map_err(map_reqwest_error)?;
        let form = Form::new().part("image", part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let content_type = content_type_of(&response);
        scan_debug!("analyze response status={} content_type={:?}", status, content_type);

        check_content_type(content_type.as_deref())?;
        let body = read_body(response, self.settings.max_analysis_bytes).await?;
        parse_analysis_body(status, &body)
    }

    async fn generate_report(&self, payload: &ReportPayload) -> Result<Vec<u8>, ClientError> {
        let url = self.endpoint(REPORT_PATH)?;
        scan_info!("POST {} type={} stage={}", url, payload.cancer_type, payload.cancer_stage);

        let body = serde_json::to_vec(payload)
            .map_err(|err| ClientError::new(FailureKind::Io, err.to_string()))?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        read_body(response, self.settings.max_report_bytes).await
    }
}

async fn read_body(response: reqwest::Response, max_bytes: u64) -> Result<Vec<u8>, ClientError> {
    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(ClientError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                },
                "response too large",
            ));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(ClientError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                },
                "response too large",
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut url =
        Url::parse(raw).map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ClientError::new(
            FailureKind::InvalidUrl,
            format!("{raw} cannot be a base url"),
        ));
    }
    // Endpoints are joined relative to the base path.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn content_type_of(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
