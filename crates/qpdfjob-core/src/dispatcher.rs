use std::path::Path;

use crate::{JobError, JobJson, JobRunner, JobStatus, validate_job};

/// Validates job descriptions and hands them to a [`JobRunner`].
///
/// The runner is injected, so a `Dispatcher` only exists once the native
/// library has been loaded; there is no lazy state inside.
#[derive(Debug)]
pub struct Dispatcher<R> {
    runner: R,
}

impl<R: JobRunner> Dispatcher<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Validate `input` and run it.
    ///
    /// Validation failures are returned before the runner is touched. Any
    /// status the engine reports, including 2 and 3, comes back as `Ok`.
    pub fn run_job(&self, input: impl AsRef<[u8]>) -> Result<JobStatus, JobError> {
        let job = validate_job(input.as_ref())?;
        self.dispatch(&job)
    }

    /// Read a job file and run its contents.
    pub fn run_job_file(&self, path: &Path) -> Result<JobStatus, JobError> {
        let bytes = std::fs::read(path)?;
        tracing::debug!(path = %path.display(), "read job file");
        self.run_job(bytes)
    }

    /// Run an already validated job. Called once, never retried.
    pub fn dispatch(&self, job: &JobJson) -> Result<JobStatus, JobError> {
        tracing::debug!(bytes = job.len(), "dispatching job");
        let status = self.runner.invoke(job)?;
        if !status.is_documented() {
            tracing::warn!(code = status.code(), "engine returned an undocumented status code");
        }
        tracing::debug!(code = status.code(), "job finished");
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records every payload and answers with a fixed status.
    struct Recording {
        status: JobStatus,
        calls: Mutex<Vec<String>>,
    }

    impl Recording {
        fn new(code: i32) -> Self {
            Self {
                status: JobStatus::from(code),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl JobRunner for Recording {
        fn invoke(&self, job: &JobJson) -> Result<JobStatus, JobError> {
            self.calls.lock().unwrap().push(job.as_str().to_owned());
            Ok(self.status)
        }
    }

    #[test]
    fn invalid_input_never_reaches_runner() {
        let dispatcher = Dispatcher::new(Recording::new(0));
        assert!(dispatcher.run_job(b"\xc3\x28").is_err());
        assert!(dispatcher.run_job("  ").is_err());
        assert!(dispatcher.run_job("{not json").is_err());
        assert!(dispatcher.runner().calls().is_empty());
    }

    #[test]
    fn trimmed_payload_is_forwarded_once() {
        let dispatcher = Dispatcher::new(Recording::new(0));
        let status = dispatcher.run_job("  {\"qdf\": \"\"}\n").unwrap();
        assert_eq!(status, JobStatus::SUCCESS);
        assert_eq!(dispatcher.runner().calls(), vec!["{\"qdf\": \"\"}"]);
    }

    #[test]
    fn engine_failure_codes_are_not_errors() {
        for code in [2, 3, 1, 42] {
            let dispatcher = Dispatcher::new(Recording::new(code));
            let status = dispatcher.run_job("{}").unwrap();
            assert_eq!(status.code(), code);
        }
    }

    #[test]
    fn runner_errors_propagate() {
        struct Broken;
        impl JobRunner for Broken {
            fn invoke(&self, _job: &JobJson) -> Result<JobStatus, JobError> {
                Err(JobError::Library("symbol missing".into()))
            }
        }

        let dispatcher = Dispatcher::new(Broken);
        assert!(matches!(
            dispatcher.run_job("{}"),
            Err(JobError::Library(_))
        ));
    }

    #[test]
    fn missing_job_file_is_io_error() {
        let dispatcher = Dispatcher::new(Recording::new(0));
        let err = dispatcher
            .run_job_file(Path::new("/nonexistent/qpdfjob/job.json"))
            .unwrap_err();
        assert!(matches!(err, JobError::Io(_)));
        assert!(dispatcher.runner().calls().is_empty());
    }
}
