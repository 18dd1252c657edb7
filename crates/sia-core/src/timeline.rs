use crate::identifier::Identifier;
use crate::status::Status;

pub const DEFAULT_ESCALATION_THRESHOLD_HOURS: u32 = 72;

/// Hours elapsed since a brand-approval request was filed.
pub trait ElapsedSource: Send + Sync {
    fn hours_since_request(&self, request_id: &Identifier, status: Status) -> u32;
}

/// Timeline the synthetic brand API reports: in-progress requests are 48
/// hours old, disapproved ones 80.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticTimeline;

impl ElapsedSource for SyntheticTimeline {
    fn hours_since_request(&self, _request_id: &Identifier, status: Status) -> u32 {
        match status {
            Status::InProgress => 48,
            Status::Disapproved => 80,
            _ => 0,
        }
    }
}

/// Same elapsed time for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedElapsed(pub u32);

impl ElapsedSource for FixedElapsed {
    fn hours_since_request(&self, _request_id: &Identifier, _status: Status) -> u32 {
        self.0
    }
}
