//! HTTP client for the remote skin-analysis service.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::blocking::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::{config::AppConfig, intake::Submission};

pub const IP_LOOKUP_FAILED: &str = "IP 주소 로딩 실패 (API 에러)";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unsupported photo type: {0:?}")]
    UnsupportedPhoto(PathBuf),
    #[error("failed to read photo {path:?}: {source}")]
    Photo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("분석 실패: 서버 응답 상태 {status}. 메시지: {body}")]
    Server { status: u16, body: String },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

pub fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

/// Everything sent for one analysis attempt.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub photo_path: PathBuf,
    pub submission: Submission,
    pub user_id: String,
    pub user_ip: String,
}

impl AnalysisRequest {
    fn form(&self) -> Result<Form, ClientError> {
        let mime = image_mime(&self.photo_path)
            .ok_or_else(|| ClientError::UnsupportedPhoto(self.photo_path.clone()))?;
        let bytes = fs::read(&self.photo_path).map_err(|source| ClientError::Photo {
            path: self.photo_path.clone(),
            source,
        })?;
        let file_name = self
            .photo_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo".to_string());
        let image = Part::bytes(bytes).file_name(file_name).mime_str(mime)?;
        let concerns = serde_json::to_string(&self.submission.concerns)
            .unwrap_or_else(|_| "[]".to_string());

        Ok(Form::new()
            .part("image", image)
            .text("gender", self.submission.gender.api_label())
            .text("birth_year", self.submission.birth_year.to_string())
            .text("birth_month", self.submission.birth_month.to_string())
            .text("concerns", concerns)
            .text("user_id", self.user_id.clone())
            .text("user_ip", self.user_ip.clone()))
    }

    pub fn photo_reference(&self) -> String {
        self.photo_path.to_string_lossy().to_string()
    }
}

/// The remote side of a diagnosis. Swappable so the session logic can run without a network.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, request: &AnalysisRequest) -> Result<Value, ClientError>;

    /// Best effort; failures come back as a placeholder string.
    fn lookup_ip(&self) -> String;
}

pub struct AnalysisClient {
    http: Client,
    config: AppConfig,
}

impl AnalysisClient {
    pub fn new(config: AppConfig) -> Result<Self, ClientError> {
        let builder = Client::builder().timeout(config.request_timeout_secs.map(Duration::from_secs));
        if config.api_key.is_empty() {
            warn!("analysis API key is empty; requests will likely be rejected");
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }
}

#[derive(Deserialize)]
struct IpResponse {
    ip: String,
}

impl Analyzer for AnalysisClient {
    fn analyze(&self, request: &AnalysisRequest) -> Result<Value, ClientError> {
        let form = request.form()?;
        let url = self.config.analyze_url();
        info!(url = %url, user = %request.user_id, "sending analysis request");

        let response = self
            .http
            .post(&url)
            .header("X-API-KEY", &self.config.api_key)
            .multipart(form)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let mut result: Value = response.json()?;
        if let Value::Object(map) = &mut result {
            map.insert(
                "imageUrl".to_string(),
                Value::String(request.photo_reference()),
            );
        }
        info!("analysis response received");
        Ok(result)
    }

    fn lookup_ip(&self) -> String {
        let fetched = self
            .http
            .get(&self.config.ip_lookup_url)
            .send()
            .and_then(|response| response.json::<IpResponse>());
        match fetched {
            Ok(body) => body.ip,
            Err(err) => {
                warn!("failed to fetch IP: {}", err);
                IP_LOOKUP_FAILED.to_string()
            }
        }
    }
}
