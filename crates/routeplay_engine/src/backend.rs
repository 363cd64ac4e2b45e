use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use routeplay_core::{JobRequest, RouteGeometry, ROUTE_ARTIFACT_PATH};
use routeplay_logging::{rp_debug, rp_info};
use url::Url;

use crate::route::parse_route_geometry;
use crate::{FailureKind, JobError};

const RUN_PATH: &str = "/run";
const CANCEL_PATH: &str = "/cancel";

/// Raw body chunks of the progress stream, in transport order.
pub type ByteStream = BoxStream<'static, Result<Bytes, JobError>>;

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    /// Applies to the route and download fetches. The progress stream is
    /// never timed out; it ends only by transport close or cancellation.
    pub artifact_timeout: Duration,
}

impl BackendSettings {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:5000/";
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_ARTIFACT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Parses the server url; timeouts start at their defaults.
    pub fn with_base_url(base_url: &str) -> Result<Self, JobError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| JobError::new(FailureKind::InvalidUrl, err.to_string()))?;
        Ok(Self {
            base_url,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            artifact_timeout: Self::DEFAULT_ARTIFACT_TIMEOUT,
        })
    }

    /// Resolves a server-absolute path such as `/run` against the base url.
    pub fn endpoint(&self, path: &str) -> Result<Url, JobError> {
        self.base_url
            .join(path)
            .map_err(|err| JobError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
pub trait JobBackend: Send + Sync {
    /// Submits a job and returns its progress body once headers arrive.
    async fn submit(&self, request: &JobRequest) -> Result<ByteStream, JobError>;

    /// Fetches and parses the computed route.
    async fn fetch_route(&self) -> Result<RouteGeometry, JobError>;

    /// Asks the server to stop the running optimization.
    async fn request_cancel(&self) -> Result<(), JobError>;

    /// Fetches one of the download references.
    async fn download(&self, path: &str) -> Result<Bytes, JobError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, JobError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| JobError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    async fn get_artifact(&self, path: &str) -> Result<Bytes, JobError> {
        let url = self.settings.endpoint(path)?;
        let response = self
            .client
            .get(url)
            .timeout(self.settings.artifact_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response)?;
        response.bytes().await.map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl JobBackend for ReqwestBackend {
    async fn submit(&self, request: &JobRequest) -> Result<ByteStream, JobError> {
        let url = self.settings.endpoint(RUN_PATH)?;
        let form = match request {
            JobRequest::Upload(file) => Form::new().part(
                request.field_name(),
                Part::bytes(file.bytes.clone()).file_name(file.file_name.clone()),
            ),
            JobRequest::Sample { identifier } => {
                Form::new().text(request.field_name(), identifier.clone())
            }
        };
        rp_info!("Submitting {} to {}", request.describe(), url);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response)?;

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_reqwest_error))
            .boxed())
    }

    async fn fetch_route(&self) -> Result<RouteGeometry, JobError> {
        let body = self.get_artifact(ROUTE_ARTIFACT_PATH).await?;
        let route = parse_route_geometry(&body)?;
        rp_debug!("Route artifact holds {} points", route.len());
        Ok(route)
    }

    async fn request_cancel(&self) -> Result<(), JobError> {
        let url = self.settings.endpoint(CANCEL_PATH)?;
        let response = self
            .client
            .post(url)
            .timeout(self.settings.artifact_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response).map(|_| ())
    }

    async fn download(&self, path: &str) -> Result<Bytes, JobError> {
        self.get_artifact(path).await
    }
}

fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, JobError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(JobError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> JobError {
    if err.is_timeout() {
        return JobError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return JobError::new(FailureKind::InvalidUrl, err.to_string());
    }
    JobError::new(FailureKind::Network, err.to_string())
}
