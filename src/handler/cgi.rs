//! CGI invocation for POST
//!
//! The external program is an opaque collaborator: it receives the
//! decoded query argument on its command line, request metadata
//! through environment variables, and answers on stdout.

use anyhow::Context;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::warn;

use crate::config::Config;
use crate::http::request::Request;

/// One external program run, consumed exactly once.
pub struct CgiInvocation {
    program: PathBuf,
    argument: Option<String>,
    env: Vec<(&'static str, String)>,
}

impl CgiInvocation {
    pub fn new(
        request: &Request,
        cfg: &Config,
        argument: Option<String>,
        content_length: String,
    ) -> Self {
        let env = vec![
            ("SCRIPT_NAME", request.raw_target.clone()),
            ("SERVER_NAME", cfg.server_name.clone()),
            ("SERVER_PORT", cfg.port.to_string()),
            (
                "HTTP_FROM",
                request.header("From").unwrap_or_default().to_string(),
            ),
            (
                "HTTP_USER_AGENT",
                request.header("User-Agent").unwrap_or_default().to_string(),
            ),
            ("CONTENT_LENGTH", content_length),
        ];

        Self {
            program: request.target.clone(),
            argument,
            env,
        }
    }

    /// Environment contract handed to the program.
    pub fn env(&self) -> &[(&'static str, String)] {
        &self.env
    }

    /// Runs the program to completion and returns its standard output.
    ///
    /// Stderr is logged, not forwarded.
    pub async fn run(&self) -> anyhow::Result<Vec<u8>> {
        let mut command = Command::new(&self.program);
        if let Some(argument) = &self.argument {
            command.arg(argument);
        }
        for (key, value) in &self.env {
            command.env(key, value);
        }

        let output = command
            .output()
            .await
            .context("failed to run CGI program")?;

        if !output.stderr.is_empty() {
            warn!(
                program = %self.program.display(),
                "CGI stderr: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }

        Ok(output.stdout)
    }
}

/// Decodes the query line's private escaping scheme.
///
/// Fixed order of whole-string passes: `!!` -> `!`, then `!@` -> `@`,
/// then any remaining `!` -> `*`. The passes are sequential, so a `!`
/// produced by the first rule is still caught by the last one.
pub fn unescape_query(query: &str) -> String {
    query.replace("!!", "!").replace("!@", "@").replace('!', "*")
}
