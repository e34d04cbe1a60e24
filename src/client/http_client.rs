use crate::{
    client::traits::ImageApi,
    config::StudioConfig,
    error::{Result, StudioError},
    models::{EditRequest, ErrorDetail, GenerationRequest, ImageArtifact, ImageResponse},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

const CREATE_PATH: &str = "/api/create";
const EDIT_PATH: &str = "/api/edit";

/// `ImageApi` over HTTP/JSON.
#[derive(Clone)]
pub struct HttpImageClient {
    client: Client,
    base_url: String,
}

impl HttpImageClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn from_config(config: &StudioConfig) -> Self {
        Self::new(config.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B>(&self, path: &str, body: &B) -> Result<ImageArtifact>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path);
        log::debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = ErrorDetail::from_body(&text).detail;
            log::warn!(
                "Image API {} returned {}: {}",
                path,
                status.as_u16(),
                detail.as_deref().unwrap_or("<no detail>")
            );
            return Err(StudioError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let text = response.text().await?;
        let payload: ImageResponse = serde_json::from_str(&text)?;
        log::debug!(
            "Image API {} returned {} base64 characters",
            path,
            payload.image_base64.len()
        );

        Ok(payload.into())
    }
}

#[async_trait]
impl ImageApi for HttpImageClient {
    async fn generate(&self, request: GenerationRequest) -> Result<ImageArtifact> {
        log::info!("Requesting image generation ({})", request.size);
        self.post_json(CREATE_PATH, &request).await
    }

    async fn edit(&self, request: EditRequest) -> Result<ImageArtifact> {
        log::info!("Requesting image edit");
        self.post_json(EDIT_PATH, &request).await
    }
}
