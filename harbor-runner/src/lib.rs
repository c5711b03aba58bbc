//! Script-execution collaborator for Harbor.
//!
//! [`ShellScriptRunner`] spawns the external boilerplate-creation script and
//! streams every line it emits, in arrival order, to the caller's
//! [`LineSink`]. Both stdout and stderr are read line-by-line on their own
//! threads and funneled through one channel drained by a single consumer,
//! so the sink is never invoked concurrently with itself.
//!
//! No timeout is imposed: a stuck script blocks the operation until it
//! exits. The return value is exactly "did the process exit successfully" —
//! the service layer turns `false` into `ScriptExecutionFailed`.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;

use harbor_core::{LineSink, NewProjectRequest, ScriptRunner};

/// Runs the boilerplate script as a child process.
///
/// The script receives the project name, pretty name, port, and Redis DB
/// index as positional arguments, and `HARBOR_PORT` / `HARBOR_REDIS_DB` in
/// its environment.
#[derive(Debug, Clone)]
pub struct ShellScriptRunner {
    script: PathBuf,
}

impl ShellScriptRunner {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }

    pub fn script(&self) -> &Path {
        &self.script
    }
}

impl ScriptRunner for ShellScriptRunner {
    fn execute(&self, request: &NewProjectRequest, sink: &mut dyn LineSink) -> bool {
        sink.line(&format!(
            "$ {} {} \"{}\" {} {}",
            self.script.display(),
            request.name,
            request.pretty_name,
            request.port,
            request.redis_db
        ));

        let spawned = Command::new(&self.script)
            .arg(&request.name.0)
            .arg(&request.pretty_name)
            .arg(request.port.to_string())
            .arg(request.redis_db.to_string())
            .env("HARBOR_PORT", request.port.to_string())
            .env("HARBOR_REDIS_DB", request.redis_db.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(err) => {
                tracing::error!(script = %self.script.display(), error = %err, "spawn failed");
                sink.line(&format!("failed to start {}: {err}", self.script.display()));
                return false;
            }
        };

        let (tx, rx) = mpsc::channel::<String>();
        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_line_reader(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_line_reader(stderr, tx.clone()));
        }
        drop(tx); // consumer loop ends when both readers hang up

        // Single consumer: delivery is serialized and in arrival order.
        for line in rx {
            sink.line(&line);
        }
        for handle in readers {
            let _ = handle.join();
        }

        match child.wait() {
            Ok(status) => {
                tracing::debug!(script = %self.script.display(), %status, "script finished");
                status.success()
            }
            Err(err) => {
                sink.line(&format!("failed to reap script process: {err}"));
                false
            }
        }
    }
}

fn spawn_line_reader(
    stream: impl Read + Send + 'static,
    tx: mpsc::Sender<String>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for line in BufReader::new(stream).lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Tests (unix: fixture scripts need the executable bit)
// ---------------------------------------------------------------------------
