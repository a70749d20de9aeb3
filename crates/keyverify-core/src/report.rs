//! The verification report: ordered steps, aggregate outcome, rendering.

use std::fmt::Write as _;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::status::Status;
use crate::step::{Step, Substep};

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

/// All steps of one verification run, in the order they were appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    steps: Vec<Step>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step. No deduplication, no reordering.
    pub fn append(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name() == name)
    }

    /// Worst status across all steps; an empty report is vacuously successful.
    pub fn status(&self) -> Status {
        match Status::fold(self.steps.iter().map(Step::status)) {
            Status::Unknown => Status::Success,
            status => status,
        }
    }

    /// Whether verification failed. Warnings do not fail the run.
    pub fn did_fail(&self) -> bool {
        self.status().is_failure()
    }

    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Markdown => self.render_markdown(),
            ReportFormat::Json => self.render_json(),
        }
    }

    /// Render as markdown. Output depends only on the report contents.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        let status = self.status();

        out.push_str("# Verification report\n\n");
        let _ = writeln!(out, "**Result:** {} {}", status.marker(), title(status));

        for step in &self.steps {
            render_step(&mut out, step);
        }

        out
    }

    /// Render as pretty-printed JSON.
    pub fn render_json(&self) -> String {
        // Report only holds strings, statuses and vectors, so serialization
        // cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Report", 3)?;
        state.serialize_field("status", &self.status())?;
        state.serialize_field("failed", &self.did_fail())?;
        state.serialize_field("steps", &self.steps)?;
        state.end()
    }
}

fn title(status: Status) -> &'static str {
    match status {
        Status::Unknown => "Unknown",
        Status::Success => "Success",
        Status::Warning => "Warning",
        Status::Failure => "Failure",
    }
}

fn render_step(out: &mut String, step: &Step) {
    let status = step.status();
    let _ = writeln!(out, "\n## {} {}\n", status.marker(), step.name());

    for remark in step.remarks() {
        let _ = writeln!(out, "> {}", remark);
    }
    if status == Status::Failure {
        for error in step.errors() {
            let _ = writeln!(out, "> **Error:** {}", error);
        }
    }
    if !step.remarks().is_empty() || (status == Status::Failure && !step.errors().is_empty()) {
        out.push('\n');
    }

    for substep in step.substeps() {
        render_substep(out, substep);
    }
}

fn render_substep(out: &mut String, substep: &Substep) {
    let status = substep.status();
    let _ = writeln!(out, "- {} {}", status.marker(), substep.description());

    for remark in substep.remarks() {
        let _ = writeln!(out, "  - {}", remark);
    }
    if status == Status::Failure {
        for error in substep.errors() {
            let _ = writeln!(out, "  - **Error:** {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn sample_report() -> Report {
        let mut key = Step::new("Validate GPG key");
        key.run("Key is a valid PGP key", || Ok::<_, anyhow::Error>(()))
            .add_remark("Fingerprint: ABCD");
        key.run("Key is not expired", || Err::<(), _>(anyhow!("key is expired")));
        key.run("Key has an email", || Err::<(), _>(anyhow!("no email")))
            .downgrade();

        let mut user = Step::new("Validate Github user");
        user.run("User is a member of the organization acme", || {
            Ok::<_, anyhow::Error>(())
        });

        let mut report = Report::new();
        report.append(key);
        report.append(user);
        report
    }

    #[test]
    fn test_empty_report_does_not_fail() {
        let report = Report::new();
        assert!(!report.did_fail());
        assert_eq!(report.status(), Status::Success);
    }

    #[test]
    fn test_single_failure_anywhere_fails_report() {
        let report = sample_report();
        assert!(report.did_fail());
        assert_eq!(report.status(), Status::Failure);
    }

    #[test]
    fn test_warnings_only_do_not_fail() {
        let mut step = Step::new("demo");
        step.run("ok", || Ok::<_, anyhow::Error>(()));
        step.run("soft", || Err::<(), _>(anyhow!("meh"))).downgrade();

        let mut report = Report::new();
        report.append(step);
        assert!(!report.did_fail());
        assert_eq!(report.status(), Status::Warning);
    }

    #[test]
    fn test_append_preserves_order_without_dedup() {
        let mut report = Report::new();
        report.append(Step::new("b"));
        report.append(Step::new("a"));
        report.append(Step::new("b"));

        let names: Vec<_> = report.steps().iter().map(Step::name).collect();
        assert_eq!(names, ["b", "a", "b"]);
    }

    #[test]
    fn test_render_markdown_layout() {
        let md = sample_report().render_markdown();
        let expected = "\
# Verification report

**Result:** ❌ Failure

## ❌ Validate GPG key

- ✅ Key is a valid PGP key
  - Fingerprint: ABCD
- ❌ Key is not expired
  - **Error:** key is expired
- ⚠️ Key has an email
  - no email

## ✅ Validate Github user

- ✅ User is a member of the organization acme
";
        assert_eq!(md, expected);
    }

    #[test]
    fn test_render_is_deterministic() {
        let report = sample_report();
        assert_eq!(report.render_markdown(), report.render_markdown());
        assert_eq!(report.render_json(), report.render_json());
    }

    #[test]
    fn test_render_step_precondition_error() {
        let mut step = Step::new("Validate GPG key");
        step.add_error(anyhow!("failed to read key file: not found"));
        step.mark_failed();

        let mut report = Report::new();
        report.append(step);

        let md = report.render_markdown();
        assert!(md.contains(
            "## ❌ Validate GPG key\n\n> **Error:** failed to read key file: not found\n"
        ));
    }

    #[test]
    fn test_failed_substep_always_fails_report() {
        let mut step = Step::new("Validate GPG key");
        step.run("Key is not revoked", || Err::<(), _>(anyhow!("revoked")));
        step.run("Key can be used for signing", || Ok::<_, anyhow::Error>(()));
        step.mark_failed();

        let mut report = Report::new();
        report.append(step);
        report.append(Step::new("Validate Github user"));

        assert_eq!(report.status(), Status::Failure);
        assert!(report.did_fail());
    }

    #[test]
    fn test_render_json_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&sample_report().render_json()).unwrap();

        assert_eq!(json["status"], "failure");
        assert_eq!(json["failed"], true);
        assert_eq!(json["steps"][0]["name"], "Validate GPG key");
        assert_eq!(json["steps"][0]["substeps"][1]["errors"][0], "key is expired");
        assert_eq!(json["steps"][0]["substeps"][2]["status"], "warning");
        assert_eq!(json["steps"][1]["status"], "success");
    }
}
