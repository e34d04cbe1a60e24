pub mod client;
pub mod config;
pub mod error;
pub mod flow;
pub mod logger;
pub mod models;
#[cfg(feature = "server")]
pub mod server;
pub mod session;
pub mod studio;

pub use client::{HttpImageClient, ImageApi};
pub use config::{LogFormat, StudioConfig};
pub use error::{Result, StudioError};
pub use flow::{Flow, FlowState, FlowStatus};
pub use models::{EditRequest, GenerationRequest, ImageArtifact, ImageSize};
pub use session::SessionStore;
pub use studio::{Studio, StudioSnapshot};
