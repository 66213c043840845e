//! Client side of the compile-and-run relay
//!
//! A runnable example posts its code, stdin and program arguments to the
//! relay endpoint and renders whatever comes back. Transport errors and
//! unparseable replies both end in the "temporarily unavailable" panel; there
//! is no retry, the user simply runs again.

use serde::Serialize;
use std::time::Duration;

use super::output::OutputPanel;
use super::wrap::wrap_into_main;

/// Form fields posted to the relay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunRequest {
    pub code: String,
    pub stdin: String,
    pub args: String,
}

impl RunRequest {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            ..Default::default()
        }
    }

    /// Percent-encode every field once more. The relay splices the received
    /// values into its upstream form body as-is, so they must arrive encoded.
    pub fn escaped(&self) -> Self {
        let enc = |s: &str| url::form_urlencoded::byte_serialize(s.as_bytes()).collect::<String>();
        Self {
            code: enc(&self.code),
            stdin: enc(&self.stdin),
            args: enc(&self.args),
        }
    }
}

/// HTTP client for the relay endpoint
pub struct RunClient {
    endpoint: String,
    http_client: reqwest::Client,
}

impl RunClient {
    pub fn new(endpoint: String, http_client: reqwest::Client) -> Self {
        Self {
            endpoint,
            http_client,
        }
    }

    /// Client with its own connection pool and the given request timeout
    pub fn with_timeout(endpoint: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(endpoint, http_client))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post the request and return the relay's body verbatim
    pub async fn send(&self, request: &RunRequest) -> Result<String, reqwest::Error> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .form(&request.escaped())
            .send()
            .await?
            .error_for_status()?;
        response.text().await
    }

    /// Run the request and render the outcome. Never fails: any problem turns
    /// into the unavailable panel.
    pub async fn run(&self, request: &RunRequest, default_output: Option<&str>) -> OutputPanel {
        match self.send(request).await {
            Ok(body) => {
                let panel = OutputPanel::from_body(&body, default_output);
                if panel == OutputPanel::unavailable() {
                    tracing::warn!(endpoint = %self.endpoint, "relay returned no parseable payload");
                }
                panel
            }
            Err(e) => {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "relay request failed");
                OutputPanel::unavailable()
            }
        }
    }
}

/// State of one runnable example widget: the editable code, its inputs, the
/// output panel and whether the run control is enabled
#[derive(Debug, Clone)]
pub struct RunnableExample {
    original: String,
    code: String,
    stdin: String,
    args: String,
    /// Module to wrap unittest bodies for; `None` runs the code as written
    unittest_module: Option<String>,
    default_output: Option<String>,
    running: bool,
    output: Option<OutputPanel>,
}

impl RunnableExample {
    pub fn new(code: &str) -> Self {
        Self {
            original: code.to_string(),
            code: code.to_string(),
            stdin: String::new(),
            args: String::new(),
            unittest_module: None,
            default_output: None,
            running: false,
            output: None,
        }
    }

    /// Example taken from a documented unittest of `module`
    pub fn unittest(code: &str, module: &str, default_output: Option<&str>) -> Self {
        Self {
            unittest_module: Some(module.to_string()),
            default_output: default_output.map(str::to_string),
            ..Self::new(code)
        }
    }

    pub fn with_stdin(mut self, stdin: &str) -> Self {
        self.stdin = stdin.to_string();
        self
    }

    pub fn with_args(mut self, args: &str) -> Self {
        self.args = args.to_string();
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn edit(&mut self, code: &str) {
        self.code = code.to_string();
    }

    /// Restore the code the page shipped with
    pub fn reset(&mut self) {
        self.code = self.original.clone();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn output(&self) -> Option<&OutputPanel> {
        self.output.as_ref()
    }

    pub fn default_output(&self) -> Option<&str> {
        self.default_output.as_deref()
    }

    /// Disable the run control and build the request. Returns `None` while a
    /// previous run is still in flight.
    pub fn start_run(&mut self) -> Option<RunRequest> {
        if self.running {
            return None;
        }
        self.running = true;
        self.output = Some(OutputPanel::running());

        let code = match &self.unittest_module {
            Some(module) => wrap_into_main(&self.code, module),
            None => self.code.clone(),
        };
        Some(RunRequest {
            code,
            stdin: self.stdin.clone(),
            args: self.args.clone(),
        })
    }

    /// Show the result and re-enable the run control
    pub fn finish(&mut self, panel: OutputPanel) {
        self.output = Some(panel);
        self.running = false;
    }

    /// Full cycle against a relay
    pub async fn run_with(&mut self, client: &RunClient) -> Option<&OutputPanel> {
        let request = self.start_run()?;
        let panel = client.run(&request, self.default_output.as_deref()).await;
        self.finish(panel);
        self.output.as_ref()
    }
}
