use super::state::LocationSource;
use crate::models::Coordinates;

/// One restaurant fetch as issued by the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchRequest {
    /// Controller generation the request belongs to
    pub generation: u64,
    pub at: Coordinates,
    pub source: LocationSource,
    /// 1 for the first fetch of a cycle
    pub attempt: u32,
}

/// The single automatic fallback: a failed fetch is retried once at the
/// fixed fallback coordinates, never more.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub fallback: Coordinates,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(fallback: Coordinates) -> Self {
        Self {
            max_attempts: 2,
            fallback,
        }
    }

    /// The follow-up request for `failed`, if the policy allows one.
    /// A fetch that already used the fallback coordinates is final.
    #[must_use]
    pub fn fallback_after(&self, failed: &FetchRequest) -> Option<FetchRequest> {
        if failed.source == LocationSource::Fallback || failed.attempt >= self.max_attempts {
            return None;
        }
        Some(FetchRequest {
            generation: failed.generation,
            at: self.fallback,
            source: LocationSource::Fallback,
            attempt: failed.attempt + 1,
        })
    }
}
