//! Holder for the installed background with stale-result protection.

use log::debug;

use super::asset::BackgroundAsset;

/// Identifies one generation request. Only the token handed out by the most
/// recent [`BackgroundSlot::begin_generation`] call can install a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationToken(u64);

/// The background currently in use, plus the bookkeeping needed to ignore
/// results from requests the user has since superseded.
#[derive(Default)]
pub struct BackgroundSlot {
    asset: Option<BackgroundAsset>,
    next_token: u64,
    pending: Option<u64>,
}

impl BackgroundSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation request, invalidating any outstanding one.
    pub fn begin_generation(&mut self) -> GenerationToken {
        let token = self.next_token;
        self.next_token += 1;
        self.pending = Some(token);
        GenerationToken(token)
    }

    /// Install a finished asset. Returns false (and drops the asset) when the
    /// token no longer matches the latest request.
    pub fn install(&mut self, token: GenerationToken, asset: BackgroundAsset) -> bool {
        if self.pending != Some(token.0) {
            debug!("dropping stale background generation result");
            return false;
        }
        self.pending = None;
        self.asset = Some(asset);
        true
    }

    /// Abandon the outstanding request, if any, without touching the
    /// installed asset.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Remove the installed background.
    pub fn clear(&mut self) {
        self.asset = None;
        self.pending = None;
    }

    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    pub fn asset(&self) -> Option<&BackgroundAsset> {
        self.asset.as_ref()
    }
}
