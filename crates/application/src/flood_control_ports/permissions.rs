use async_trait::async_trait;
use flood_control_core::AppResult;
use flood_control_domain::Capability;

/// Port answering whether a subject holds a capability.
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    /// Returns whether the subject may manage settings gated by the capability.
    async fn has_capability(&self, subject: &str, capability: Capability) -> AppResult<bool>;
}
