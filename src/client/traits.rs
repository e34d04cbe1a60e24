use crate::{
    error::Result,
    models::{EditRequest, GenerationRequest, ImageArtifact},
};
use async_trait::async_trait;

/// The two calls the studio makes against the image backend.
#[async_trait]
pub trait ImageApi: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<ImageArtifact>;

    async fn edit(&self, request: EditRequest) -> Result<ImageArtifact>;
}
