use crate::{
    client::ImageApi,
    error::{Result, StudioError},
    flow::{Flow, FlowStatus, Ticket},
    logger,
    models::{EditRequest, GenerationRequest, ImageArtifact, ImageSize},
};
use serde::Serialize;
use std::{future::Future, sync::Arc};
use tokio::sync::Mutex;

pub const GENERATE_FALLBACK: &str = "Failed to generate image.";
pub const EDIT_FALLBACK: &str = "Failed to edit image.";
pub const NO_SOURCE_IMAGE: &str = "Generate an image before editing.";

#[derive(Debug)]
struct StudioState {
    prompt: String,
    size: ImageSize,
    edit_prompt: String,
    generate: Flow,
    edit: Flow,
}

impl StudioState {
    fn new() -> Self {
        Self {
            prompt: String::new(),
            size: ImageSize::default(),
            edit_prompt: String::new(),
            generate: Flow::new("generation"),
            edit: Flow::new("edit"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FlowKind {
    Generate,
    Edit,
}

impl FlowKind {
    fn label(self) -> &'static str {
        match self {
            FlowKind::Generate => "image generation",
            FlowKind::Edit => "image edit",
        }
    }

    fn fallback(self) -> &'static str {
        match self {
            FlowKind::Generate => GENERATE_FALLBACK,
            FlowKind::Edit => EDIT_FALLBACK,
        }
    }

    fn flow_mut(self, state: &mut StudioState) -> &mut Flow {
        match self {
            FlowKind::Generate => &mut state.generate,
            FlowKind::Edit => &mut state.edit,
        }
    }
}

/// Read-only view of one flow.
#[derive(Debug, Clone, Serialize)]
pub struct FlowSnapshot {
    pub status: FlowStatus,
    pub error: Option<String>,
    pub has_image: bool,
    #[serde(skip)]
    pub artifact: Option<ImageArtifact>,
}

impl FlowSnapshot {
    fn of(flow: &Flow) -> Self {
        let artifact = flow.artifact().cloned();
        Self {
            status: flow.status(),
            error: flow.error().map(str::to_string),
            has_image: artifact.is_some(),
            artifact,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == FlowStatus::Loading
    }
}

/// Read-only view of a whole session, used for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct StudioSnapshot {
    pub prompt: String,
    pub size: ImageSize,
    pub edit_prompt: String,
    pub generate: FlowSnapshot,
    pub edit: FlowSnapshot,
}

/// One browser session: form values plus the generate and edit flows.
///
/// API calls run on their own task, so a flow always leaves `Loading` even
/// when the caller stops waiting.
pub struct Studio {
    api: Arc<dyn ImageApi>,
    state: Arc<Mutex<StudioState>>,
}

impl Studio {
    pub fn new(api: Arc<dyn ImageApi>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(StudioState::new())),
        }
    }

    /// Runs the generation flow.
    ///
    /// Starting a generation drops the generated and edited images and orphans
    /// any edit still in flight, since its source image is gone.
    pub async fn generate(
        &self,
        prompt: impl Into<String>,
        size: ImageSize,
    ) -> Result<ImageArtifact> {
        let prompt = prompt.into();
        let (ticket, request) = {
            let mut state = self.state.lock().await;
            if state.generate.is_loading() {
                return Err(StudioError::Busy(state.generate.name()));
            }
            state.prompt = prompt.clone();
            state.size = size;

            let request = match GenerationRequest::new(prompt, size) {
                Ok(request) => request,
                Err(e) => {
                    state.generate.reject(e.user_message(GENERATE_FALLBACK));
                    return Err(e);
                }
            };
            let ticket = state.generate.begin()?;
            state.edit.invalidate();
            (ticket, request)
        };

        log::info!("🎨 Generating image ({})", request.size);
        let api = self.api.clone();
        self.settle(FlowKind::Generate, ticket, async move {
            api.generate(request).await
        })
        .await
    }

    /// Runs the edit flow against the current generated image.
    pub async fn edit(&self, prompt: impl Into<String>) -> Result<ImageArtifact> {
        let prompt = prompt.into();
        let (ticket, request) = {
            let mut state = self.state.lock().await;
            if state.edit.is_loading() {
                return Err(StudioError::Busy(state.edit.name()));
            }
            state.edit_prompt = prompt.clone();

            let source = state.generate.artifact().filter(|a| !a.is_empty());
            let request = match source {
                None => Err(StudioError::Precondition(NO_SOURCE_IMAGE.to_string())),
                Some(source) => EditRequest::new(prompt, source),
            };
            let request = match request {
                Ok(request) => request,
                Err(e) => {
                    state.edit.reject(e.user_message(EDIT_FALLBACK));
                    return Err(e);
                }
            };
            (state.edit.begin()?, request)
        };

        log::info!("🖌️  Editing image");
        let api = self.api.clone();
        self.settle(FlowKind::Edit, ticket, async move { api.edit(request).await })
            .await
    }

    /// Runs `call` on its own task and applies the outcome to the flow there.
    async fn settle<F>(&self, kind: FlowKind, ticket: Ticket, call: F) -> Result<ImageArtifact>
    where
        F: Future<Output = Result<ImageArtifact>> + Send + 'static,
    {
        let state = self.state.clone();
        let task = tokio::spawn(async move {
            let outcome = {
                let _timer = logger::timer(kind.label());
                call.await
            };

            let mut state = state.lock().await;
            let message = outcome.as_ref().map_err(|e| e.user_message(kind.fallback()));
            if !kind.flow_mut(&mut state).complete(ticket, message.cloned()) {
                log::warn!("Discarding superseded {} result", kind.label());
            } else if let Err(e) = &outcome {
                log::warn!("{} failed: {}", kind.label(), e);
            }
            outcome
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("❌ {} task failed: {}", kind.label(), e);
                let mut state = self.state.lock().await;
                kind.flow_mut(&mut state)
                    .complete(ticket, Err(kind.fallback().to_string()));
                Err(StudioError::Task(e.to_string()))
            }
        }
    }

    /// Forgets everything, as a page reload would. In-flight results are dropped.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.prompt.clear();
        state.size = ImageSize::default();
        state.edit_prompt.clear();
        state.generate.invalidate();
        state.edit.invalidate();
    }

    pub async fn snapshot(&self) -> StudioSnapshot {
        let state = self.state.lock().await;
        StudioSnapshot {
            prompt: state.prompt.clone(),
            size: state.size,
            edit_prompt: state.edit_prompt.clone(),
            generate: FlowSnapshot::of(&state.generate),
            edit: FlowSnapshot::of(&state.edit),
        }
    }
}
