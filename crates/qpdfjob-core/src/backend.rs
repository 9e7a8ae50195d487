use std::sync::Arc;

use crate::{JobError, JobJson, JobStatus};

/// Trait for job execution backends.
///
/// Implementors perform the single call across the native boundary; input
/// validation lives in [`crate::Dispatcher`], so `invoke` only ever sees a
/// validated [`JobJson`]. The production implementation is
/// `qpdfjob_native::NativeRunner`.
pub trait JobRunner: Send + Sync {
    /// Run one job and return the engine's status code verbatim.
    fn invoke(&self, job: &JobJson) -> Result<JobStatus, JobError>;
}

impl<T: JobRunner + ?Sized> JobRunner for Arc<T> {
    fn invoke(&self, job: &JobJson) -> Result<JobStatus, JobError> {
        (**self).invoke(job)
    }
}

impl<T: JobRunner + ?Sized> JobRunner for Box<T> {
    fn invoke(&self, job: &JobJson) -> Result<JobStatus, JobError> {
        (**self).invoke(job)
    }
}
