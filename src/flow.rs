use crate::error::{Result, StudioError};
use crate::models::ImageArtifact;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    Loading,
    Success(ImageArtifact),
    Error(String),
}

impl FlowState {
    pub fn status(&self) -> FlowStatus {
        match self {
            FlowState::Idle => FlowStatus::Idle,
            FlowState::Loading => FlowStatus::Loading,
            FlowState::Success(_) => FlowStatus::Success,
            FlowState::Error(_) => FlowStatus::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Identifies one submission of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// State of one request flow (generate or edit).
///
/// Every `begin` hands out a ticket; a completion is applied only while its
/// ticket is still the current one.
#[derive(Debug)]
pub struct Flow {
    name: &'static str,
    state: FlowState,
    current: u64,
}

impl Flow {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: FlowState::Idle,
            current: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn status(&self) -> FlowStatus {
        self.state.status()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FlowState::Loading)
    }

    pub fn artifact(&self) -> Option<&ImageArtifact> {
        match &self.state {
            FlowState::Success(artifact) => Some(artifact),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FlowState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Moves to `Loading` and returns the ticket the completion must present.
    pub fn begin(&mut self) -> Result<Ticket> {
        if self.is_loading() {
            return Err(StudioError::Busy(self.name));
        }
        self.current += 1;
        self.state = FlowState::Loading;
        Ok(Ticket(self.current))
    }

    /// Records a failure that happened before any request was sent.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.current += 1;
        self.state = FlowState::Error(message.into());
    }

    /// Applies a completion. Returns false when the ticket is stale.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: std::result::Result<ImageArtifact, String>,
    ) -> bool {
        if ticket.0 != self.current {
            return false;
        }
        self.state = match outcome {
            Ok(artifact) => FlowState::Success(artifact),
            Err(message) => FlowState::Error(message),
        };
        true
    }

    /// Drops the current state and orphans any in-flight ticket.
    pub fn invalidate(&mut self) {
        self.current += 1;
        self.state = FlowState::Idle;
    }
}
