/// Decides whether capture is suppressed for a source application.
pub trait ExclusionPolicyPort: Send + Sync {
    fn is_excluded(&self, source_app_id: &str) -> bool;
}

/// Policy that never suppresses capture.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExclusions;

impl ExclusionPolicyPort for NoExclusions {
    fn is_excluded(&self, _source_app_id: &str) -> bool {
        false
    }
}
