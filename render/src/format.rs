//! External code formatter run over the output tree.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use tracing::{debug, info, warn};
use wait_timeout::ChildExt;

use crate::error::{RenderError, Result};

/// Formatter command line. The output directory is appended as the last
/// argument.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use modelgen_render::Formatter;
///
/// Formatter::new("black")
///     .with_args(["--quiet"])
///     .with_timeout(Duration::from_secs(60))
///     .run("project")
///     .unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Formatter {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs the formatter on `dir` and waits for it.
    ///
    /// # Errors
    ///
    /// - [`RenderError::FormatterUnavailable`] if the command cannot be spawned
    /// - [`RenderError::FormatterFailed`] on a non-zero exit status
    /// - [`RenderError::FormatterTimeout`] if it runs longer than the timeout;
    ///   the process is killed
    pub fn run(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        debug!(command = %self.command, args = ?self.args, dir = %dir.display(), "running formatter");

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .arg(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::FormatterUnavailable {
                command: self.command.clone(),
                source,
            })?;

        // Drain stderr in the background so a chatty formatter cannot block
        // on a full pipe.
        let stderr_thread = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                buf
            })
        });

        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                warn!(
                    command = %self.command,
                    timeout_secs = self.timeout.as_secs(),
                    "formatter timed out, killing process"
                );
                let _ = child.kill();
                let _ = child.wait();
                return Err(RenderError::FormatterTimeout {
                    command: self.command.clone(),
                    timeout_secs: self.timeout.as_secs(),
                });
            }
        };

        let stderr = stderr_thread
            .and_then(|thread| thread.join().ok())
            .map(|buf| String::from_utf8_lossy(&buf).trim().to_string())
            .unwrap_or_default();

        if !status.success() {
            return Err(RenderError::FormatterFailed {
                command: self.command.clone(),
                status: status.to_string(),
                stderr,
            });
        }

        info!(command = %self.command, dir = %dir.display(), "formatted generated files");
        Ok(())
    }
}
