//! Child process ownership, output capture, and cancellation.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::BuildError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A shared flag that asks a running build to stop.
///
/// Clones observe the same flag, so one can be handed to a signal handler or
/// another thread while the build waits on the child.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates an untriggered token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a finished child left behind.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit status.
    pub status: ExitStatus,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// Owns a running child. Dropping the guard kills the child if it is still
/// running and always reaps it.
#[derive(Debug)]
pub struct ProcessGuard {
    child: Child,
    reaped: bool,
}

impl ProcessGuard {
    /// Spawns `command` with piped output.
    pub fn spawn(command: &mut Command) -> io::Result<Self> {
        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        log::debug!("spawned pid {}", child.id());
        Ok(Self {
            child,
            reaped: false,
        })
    }

    /// Returns the child's process id.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Waits for the child while collecting its output, polling `cancel`.
    ///
    /// On cancellation the child is killed and reaped before
    /// [`BuildError::Cancelled`] is returned.
    pub fn wait(mut self, cancel: &CancelToken) -> Result<ProcessOutput, BuildError> {
        let stdout = self.child.stdout.take().map(capture);
        let stderr = self.child.stderr.take().map(capture);

        let status = loop {
            if cancel.is_cancelled() {
                log::warn!("cancelling pid {}", self.child.id());
                self.terminate();
                join(stdout);
                join(stderr);
                return Err(BuildError::Cancelled);
            }
            match self.child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(BuildError::io("<child process>", e)),
            }
        };
        self.reaped = true;

        Ok(ProcessOutput {
            status,
            stdout: join(stdout),
            stderr: join(stderr),
        })
    }

    fn terminate(&mut self) {
        if self.reaped {
            return;
        }
        if let Err(e) = self.child.kill() {
            log::debug!("kill pid {}: {e}", self.child.id());
        }
        if let Err(e) = self.child.wait() {
            log::warn!("failed to reap pid {}: {e}", self.child.id());
        }
        self.reaped = true;
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        self.terminate();
    }
}

fn capture<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            log::debug!("output pipe closed early: {e}");
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[test]
    fn captures_output_and_status() {
        let guard = ProcessGuard::spawn(&mut sh("echo out; echo err >&2; exit 3")).unwrap();
        let output = guard.wait(&CancelToken::new()).unwrap();
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[test]
    fn cancellation_kills_child() {
        let cancel = CancelToken::new();
        let guard = ProcessGuard::spawn(&mut sh("exec sleep 30")).unwrap();
        let trigger = cancel.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            trigger.cancel();
        });
        let start = Instant::now();
        let err = guard.wait(&cancel).unwrap_err();
        canceller.join().unwrap();
        assert!(matches!(err, BuildError::Cancelled));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn drop_reaps_running_child() {
        let guard = ProcessGuard::spawn(&mut sh("exec sleep 30")).unwrap();
        let pid = guard.id();
        drop(guard);
        let alive = Command::new("kill")
            .arg("-0")
            .arg(pid.to_string())
            .status()
            .unwrap();
        assert!(!alive.success());
    }

    #[test]
    fn token_is_shared() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!token.is_cancelled());
        other.cancel();
        assert!(token.is_cancelled());
    }
}
