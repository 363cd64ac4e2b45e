use crate::{JobId, JobRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Abort any running job, then submit this one.
    StartJob { job_id: JobId, request: JobRequest },
    CancelJob,
    Quit,
}
