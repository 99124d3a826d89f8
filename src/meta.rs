//! Track metadata and the extraction-service seam.
//!
//! The metadata itself comes from an external generative service; this module
//! only defines the structured result, its all-or-nothing JSON parse, and the
//! trait boundary the rest of the pipeline consumes it through.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One timed lyric line, `start < end`, seconds from track start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// Structured analysis result for one uploaded track.
///
/// Produced once per upload; immutable afterward except for user-edited
/// title/artist overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioMetadata {
    pub title: String,
    pub artist: String,
    pub mood: String,
    #[serde(rename = "imagePrompt")]
    pub image_prompt: String,
    pub transcription: Vec<TranscriptionSegment>,
}

impl AudioMetadata {
    /// Parse a service response. All-or-nothing: any missing or malformed
    /// field rejects the whole payload, no partial metadata survives.
    pub fn from_json(raw: &str) -> Result<Self, MetadataError> {
        serde_json::from_str(raw).map_err(MetadataError::MalformedResponse)
    }

    /// Apply a user-edited title override.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Apply a user-edited artist override.
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }
}

/// Failures of the external metadata extraction call.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("No API credential configured")]
    AuthRequired,
    #[error("Service quota exceeded, try again later")]
    QuotaExceeded,
    #[error("Service returned malformed metadata: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("Transient service failure: {0}")]
    TransientFailure(String),
}

/// Boundary to the external extraction service.
///
/// Implementations receive the raw uploaded bytes and mime type; how the
/// result is obtained (model, prompt, retries) is the implementor's business.
pub trait MetadataService {
    fn analyze(&self, audio: &[u8], mime: &str) -> Result<AudioMetadata, MetadataError>;
}
