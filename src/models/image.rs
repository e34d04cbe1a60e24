use crate::error::{Result, StudioError};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output dimensions accepted by the create endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1024x1024")]
    Square,
    #[serde(rename = "1536x1024")]
    Landscape,
    #[serde(rename = "1024x1536")]
    Portrait,
    #[serde(rename = "auto")]
    Auto,
}

impl ImageSize {
    pub const ALL: [ImageSize; 4] = [
        ImageSize::Square,
        ImageSize::Landscape,
        ImageSize::Portrait,
        ImageSize::Auto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Square => "1024x1024",
            ImageSize::Landscape => "1536x1024",
            ImageSize::Portrait => "1024x1536",
            ImageSize::Auto => "auto",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self> {
        ImageSize::ALL
            .into_iter()
            .find(|size| size.as_str() == s)
            .ok_or_else(|| StudioError::InvalidRequest(format!("Unsupported image size: {s}")))
    }
}

/// Body of `POST /api/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub size: ImageSize,
}

impl GenerationRequest {
    /// Builds a request, rejecting blank prompts before anything is sent.
    pub fn new(prompt: impl Into<String>, size: ImageSize) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(StudioError::InvalidRequest("Prompt is required.".into()));
        }
        Ok(Self { prompt, size })
    }
}

/// Body of `POST /api/edit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRequest {
    pub prompt: String,
    pub image_base64: String,
}

impl EditRequest {
    pub fn new(prompt: impl Into<String>, source: &ImageArtifact) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(StudioError::InvalidRequest("Edit prompt is required.".into()));
        }
        Ok(Self {
            prompt,
            image_base64: source.base64().to_string(),
        })
    }
}

/// Success body shared by both endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    pub image_base64: String,
}

/// A base64-encoded PNG returned by the image API.
///
/// The payload is kept verbatim; it is only decoded when raw bytes are asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageArtifact {
    image_base64: String,
}

impl ImageArtifact {
    pub const MIME_TYPE: &'static str = "image/png";

    pub fn new(image_base64: impl Into<String>) -> Self {
        Self {
            image_base64: image_base64.into(),
        }
    }

    pub fn base64(&self) -> &str {
        &self.image_base64
    }

    /// True when the server answered with no image data.
    pub fn is_empty(&self) -> bool {
        self.image_base64.is_empty()
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", Self::MIME_TYPE, self.image_base64)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.image_base64)
            .map_err(|e| StudioError::Decode(e.to_string()))
    }
}

impl From<ImageResponse> for ImageArtifact {
    fn from(response: ImageResponse) -> Self {
        Self::new(response.image_base64)
    }
}
