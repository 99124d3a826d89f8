//! Background generation service boundary.

use thiserror::Error;

use super::asset::BackgroundAsset;
use crate::meta::AudioMetadata;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("generation service requires authentication")]
    AuthRequired,
    #[error("generation quota exceeded")]
    QuotaExceeded,
    #[error("failed to load generated asset: {0}")]
    AssetLoad(String),
    #[error("generation failed: {0}")]
    TransientFailure(String),
}

/// Produces a background asset from track metadata. Implementations wrap a
/// remote image or video model; tests substitute canned assets.
pub trait BackgroundGenerator {
    /// Generate a still image background from the metadata's image prompt.
    fn generate_image(&self, metadata: &AudioMetadata) -> Result<BackgroundAsset, GenerateError>;

    /// Generate a looping video background. The default delegates to the
    /// image path for services without video support.
    fn generate_video(&self, metadata: &AudioMetadata) -> Result<BackgroundAsset, GenerateError> {
        self.generate_image(metadata)
    }
}
