//! Text shown in a runnable example's output area

use serde::Serialize;

use super::response::RunResponse;

pub const APPLICATION_OUTPUT: &str = "Application output";
pub const UNAVAILABLE: &str = "Temporarily unavailable";
pub const RUNNING: &str = "Running...";
const NO_OUTPUT: &str = "-- No output --";

/// Title and body of the output area
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPanel {
    pub title: String,
    pub body: String,
}

impl OutputPanel {
    /// Shown while a run is in flight
    pub fn running() -> Self {
        Self {
            title: APPLICATION_OUTPUT.to_string(),
            body: RUNNING.to_string(),
        }
    }

    /// Shown when the relay failed or sent nothing parseable
    pub fn unavailable() -> Self {
        Self {
            title: APPLICATION_OUTPUT.to_string(),
            body: UNAVAILABLE.to_string(),
        }
    }

    /// Render a backend response.
    ///
    /// `default_output` replaces the "no output" marker, e.g. with
    /// "All tests passed" for wrapped unittest blocks.
    pub fn from_response(response: &RunResponse, default_output: Option<&str>) -> Self {
        let compilation = &response.compilation;
        let runtime = &response.runtime;

        if compilation.failed() {
            return Self {
                title: format!(
                    "Compilation output ({}: {})",
                    status_text(compilation.status),
                    compilation.err
                ),
                body: compilation.stdout.clone(),
            };
        }

        let mut body = String::new();
        if !compilation.stdout.is_empty() {
            body.push_str("Compilation output: \n");
            body.push_str(&compilation.stdout);
            body.push('\n');
        }

        if runtime.stdout.is_empty() && runtime.stderr.is_empty() {
            body.push_str(default_output.unwrap_or(NO_OUTPUT));
        } else {
            body.push_str(&runtime.stdout);
            body.push_str(&runtime.stderr);
        }

        let title = if runtime.failed() {
            format!(
                "{} ({}: {})",
                APPLICATION_OUTPUT,
                status_text(runtime.status),
                runtime.err
            )
        } else {
            APPLICATION_OUTPUT.to_string()
        };

        Self { title, body }
    }

    /// Render a raw relay body, falling back to the unavailable panel
    pub fn from_body(body: &str, default_output: Option<&str>) -> Self {
        match super::response::parse_payload(body) {
            Some(response) => Self::from_response(&response, default_output),
            None => Self::unavailable(),
        }
    }
}

fn status_text(status: Option<i64>) -> String {
    status.map(|s| s.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runnable::response::Stage;

    fn response(compilation: Stage, runtime: Stage) -> RunResponse {
        RunResponse {
            compilation,
            runtime,
        }
    }

    fn stage(stdout: &str, stderr: &str, status: i64, err: &str) -> Stage {
        Stage {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            status: Some(status),
            err: err.to_string(),
            time: None,
        }
    }

    #[test]
    fn test_compilation_failure_shows_compiler_output() {
        let panel = OutputPanel::from_response(
            &response(
                stage("onlineapp.d(3): Error: undefined identifier `x`", "", 1, "Compilation failed"),
                Stage::default(),
            ),
            None,
        );
        assert_eq!(panel.title, "Compilation output (1: Compilation failed)");
        assert_eq!(panel.body, "onlineapp.d(3): Error: undefined identifier `x`");
    }

    #[test]
    fn test_successful_run() {
        let panel = OutputPanel::from_response(
            &response(stage("", "", 0, ""), stage("Hello\n", "", 0, "")),
            None,
        );
        assert_eq!(panel, OutputPanel {
            title: "Application output".to_string(),
            body: "Hello\n".to_string(),
        });
    }

    #[test]
    fn test_compiler_warnings_and_stderr_are_included() {
        let panel = OutputPanel::from_response(
            &response(
                stage("Warning: deprecated", "", 0, ""),
                stage("out\n", "err\n", 0, ""),
            ),
            None,
        );
        assert_eq!(panel.body, "Compilation output: \nWarning: deprecated\nout\nerr\n");
    }

    #[test]
    fn test_no_output_marker_and_default() {
        let empty = response(stage("", "", 0, ""), stage("", "", 0, ""));
        assert_eq!(OutputPanel::from_response(&empty, None).body, "-- No output --");
        assert_eq!(
            OutputPanel::from_response(&empty, Some("All tests passed")).body,
            "All tests passed"
        );
    }

    #[test]
    fn test_runtime_failure_in_title() {
        let panel = OutputPanel::from_response(
            &response(
                stage("", "", 0, ""),
                stage("", "core.exception.AssertError@onlineapp.d(5)", 1, "Exited with code 1"),
            ),
            None,
        );
        assert_eq!(panel.title, "Application output (1: Exited with code 1)");
        assert_eq!(panel.body, "core.exception.AssertError@onlineapp.d(5)");
    }

    #[test]
    fn test_unparseable_body_is_unavailable() {
        assert_eq!(OutputPanel::from_body("<html>oops</html>", None), OutputPanel::unavailable());
        assert_eq!(OutputPanel::unavailable().body, "Temporarily unavailable");
    }

    #[test]
    fn test_backend_error_without_sections_is_unavailable() {
        assert_eq!(
            OutputPanel::from_body(r#"{"error":"backend overloaded"}"#, None),
            OutputPanel::unavailable()
        );
        assert_eq!(
            OutputPanel::from_body("<?xml version=\"1.0\"?><response></response>", None),
            OutputPanel::unavailable()
        );
    }
}
