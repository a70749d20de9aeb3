//! Steps and substeps: named checks with individually recorded outcomes.
//!
//! A [`Step`] runs its substeps synchronously, in call order, and keeps them
//! in that order for reporting. Each substep check returns `Ok(())` or an
//! error describing what failed; failures are recorded, never propagated.

use std::future::Future;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::status::Status;

/// One atomic assertion inside a [`Step`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substep {
    description: String,
    status: Status,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    remarks: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

impl Substep {
    fn from_outcome<E>(description: String, outcome: Result<(), E>) -> Self
    where
        E: Into<anyhow::Error>,
    {
        let (status, errors) = match outcome {
            Ok(()) => (Status::Success, Vec::new()),
            // `{:#}` keeps the whole cause chain: "failed to get user: unauthorized: ..."
            Err(e) => (Status::Failure, vec![format!("{:#}", e.into())]),
        };

        Self {
            description,
            status,
            remarks: Vec::new(),
            errors,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn remarks(&self) -> &[String] {
        &self.remarks
    }

    /// Captured errors. Only non-empty while the status is `Failure`.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Attach advisory context. Remarks never affect the status.
    pub fn add_remark(&mut self, remark: impl Into<String>) -> &mut Self {
        self.remarks.push(remark.into());
        self
    }

    /// Downgrade a failed substep to a warning.
    ///
    /// Precondition: none; calling this on a substep that did not fail is a
    /// no-op. Postcondition: a `Failure` becomes `Warning`, and its captured
    /// errors become remarks so the reason stays visible in the report. No
    /// other transition is possible through this method.
    pub fn downgrade(&mut self) -> &mut Self {
        if self.status == Status::Failure {
            self.status = self.status.downgraded();
            self.remarks.append(&mut self.errors);
        }
        self
    }
}

/// A named group of substeps forming one logical check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    name: String,
    substeps: Vec<Substep>,
    remarks: Vec<String>,
    errors: Vec<String>,
    failed: bool,
}

impl Step {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            substeps: Vec::new(),
            remarks: Vec::new(),
            errors: Vec::new(),
            failed: false,
        }
    }

    /// Run `check` once and record its outcome as a new substep.
    ///
    /// Returns the recorded substep so the caller can attach remarks or
    /// downgrade it.
    pub fn run<F, E>(&mut self, description: impl Into<String>, check: F) -> &mut Substep
    where
        F: FnOnce() -> Result<(), E>,
        E: Into<anyhow::Error>,
    {
        let outcome = check();
        self.record(description.into(), outcome)
    }

    /// Async counterpart of [`Step::run`]. The future is awaited to completion
    /// before this returns, so substeps still execute strictly in order.
    pub async fn run_async<Fut, E>(
        &mut self,
        description: impl Into<String>,
        check: Fut,
    ) -> &mut Substep
    where
        Fut: Future<Output = Result<(), E>>,
        E: Into<anyhow::Error>,
    {
        let outcome = check.await;
        self.record(description.into(), outcome)
    }

    fn record<E>(&mut self, description: String, outcome: Result<(), E>) -> &mut Substep
    where
        E: Into<anyhow::Error>,
    {
        let substep = Substep::from_outcome(description, outcome);
        debug!(
            step = %self.name,
            substep = %substep.description,
            status = %substep.status,
            "substep finished"
        );
        self.substeps.push(substep);
        let last = self.substeps.len() - 1;
        &mut self.substeps[last]
    }

    /// Record a step-level error, for preconditions that fail before any
    /// substep can run (e.g. unreadable input).
    pub fn add_error(&mut self, err: impl Into<anyhow::Error>) {
        self.errors.push(format!("{:#}", err.into()));
    }

    pub fn add_remark(&mut self, remark: impl Into<String>) {
        self.remarks.push(remark.into());
    }

    /// Mark the whole step as failed, e.g. when a precondition stops it
    /// before its remaining substeps run.
    ///
    /// This can only make the status worse; there is no way to clear it.
    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    /// The step's status.
    ///
    /// The aggregate of the substeps, raised to `Failure` if step-level
    /// errors were recorded or the step was marked failed. A step with
    /// nothing recorded is vacuously successful.
    pub fn status(&self) -> Status {
        let mut status = Status::fold(self.substeps.iter().map(Substep::status));
        if self.failed || !self.errors.is_empty() {
            status = status.worse(Status::Failure);
        }
        if status == Status::Unknown {
            Status::Success
        } else {
            status
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn substeps(&self) -> &[Substep] {
        &self.substeps
    }

    /// Find a substep by its description.
    pub fn substep(&self, description: &str) -> Option<&Substep> {
        self.substeps
            .iter()
            .find(|s| s.description == description)
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn remarks(&self) -> &[String] {
        &self.remarks
    }
}

impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Step", 5)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("status", &self.status())?;
        if self.errors.is_empty() {
            state.skip_field("errors")?;
        } else {
            state.serialize_field("errors", &self.errors)?;
        }
        if self.remarks.is_empty() {
            state.skip_field("remarks")?;
        } else {
            state.serialize_field("remarks", &self.remarks)?;
        }
        if self.substeps.is_empty() {
            state.skip_field("substeps")?;
        } else {
            state.serialize_field("substeps", &self.substeps)?;
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn test_run_records_success() {
        let mut step = Step::new("demo");
        let s = step.run("passes", || Ok::<_, anyhow::Error>(()));
        assert_eq!(s.status(), Status::Success);
        assert!(s.errors().is_empty());
        assert_eq!(step.status(), Status::Success);
    }

    #[test]
    fn test_run_records_failure_with_cause_chain() {
        let mut step = Step::new("demo");
        step.run("fails", || {
            Err::<(), _>(anyhow!("connection reset")).context("failed to get user")
        });

        let s = step.substep("fails").unwrap();
        assert_eq!(s.status(), Status::Failure);
        assert_eq!(s.errors(), ["failed to get user: connection reset"]);
        assert_eq!(step.status(), Status::Failure);
    }

    #[test]
    fn test_substeps_keep_insertion_order() {
        let mut step = Step::new("demo");
        step.run("first", || Err::<(), _>(anyhow!("no")));
        step.run("second", || Ok::<_, anyhow::Error>(()));
        step.run("third", || Ok::<_, anyhow::Error>(()));

        let names: Vec<_> = step.substeps().iter().map(Substep::description).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn test_downgrade_failure_to_warning_moves_errors() {
        let mut step = Step::new("demo");
        step.run("optional", || Err::<(), _>(anyhow!("no email"))).downgrade();

        let s = step.substep("optional").unwrap();
        assert_eq!(s.status(), Status::Warning);
        assert!(s.errors().is_empty());
        assert_eq!(s.remarks(), ["no email"]);
        assert_eq!(step.status(), Status::Warning);
    }

    #[test]
    fn test_downgrade_is_noop_on_success() {
        let mut step = Step::new("demo");
        let s = step.run("fine", || Ok::<_, anyhow::Error>(()));
        s.downgrade();
        assert_eq!(s.status(), Status::Success);
    }

    #[test]
    fn test_empty_step_is_vacuously_successful() {
        assert_eq!(Step::new("empty").status(), Status::Success);
    }

    #[test]
    fn test_precondition_failure_fails_step() {
        let mut step = Step::new("demo");
        step.add_error(anyhow!("failed to read key file"));
        step.mark_failed();

        assert_eq!(step.status(), Status::Failure);
        assert!(step.substeps().is_empty());
        assert_eq!(step.errors(), ["failed to read key file"]);
    }

    #[test]
    fn test_mark_failed_without_substeps_or_errors() {
        let mut step = Step::new("demo");
        step.mark_failed();
        assert_eq!(step.status(), Status::Failure);
    }

    #[test]
    fn test_failed_substep_cannot_be_masked_at_step_level() {
        let mut step = Step::new("demo");
        step.run("hard check", || Err::<(), _>(anyhow!("revoked")));
        step.add_remark("looks fine otherwise");
        step.run("soft check", || Err::<(), _>(anyhow!("no email"))).downgrade();

        assert_eq!(step.status(), Status::Failure);
    }

    #[test]
    fn test_step_error_without_mark_still_fails() {
        let mut step = Step::new("demo");
        step.add_error(anyhow!("boom"));
        assert_eq!(step.status(), Status::Failure);
    }

    #[tokio::test]
    async fn test_run_async_records_outcome() {
        let mut step = Step::new("demo");
        step.run_async("async ok", async { Ok::<_, anyhow::Error>(()) }).await;
        step.run_async("async fail", async { Err::<(), _>(anyhow!("timed out")) })
            .await
            .add_remark("check the network");

        assert_eq!(step.substeps()[0].status(), Status::Success);
        let failed = &step.substeps()[1];
        assert_eq!(failed.status(), Status::Failure);
        assert_eq!(failed.remarks(), ["check the network"]);
    }

    #[test]
    fn test_serialize_omits_empty_lists() {
        let mut step = Step::new("demo");
        step.run("ok", || Ok::<_, anyhow::Error>(()));

        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["status"], "success");
        assert!(json.get("errors").is_none());
        assert!(json["substeps"][0].get("remarks").is_none());
    }
}
