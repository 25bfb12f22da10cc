use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWriteExt},
    process::{Child, Command},
    time,
};
use tracing::{debug, warn};

use crate::types::ExecutionResult;

/// How long to keep draining stdout/stderr after the child has been reaped
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// One external program invocation: a compile stage or a run stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCommand {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    /// Address-space limit applied to the child before exec
    pub memory_limit_bytes: Option<u64>,
}

impl StageCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            memory_limit_bytes: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &std::path::Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn memory_limit_bytes(mut self, limit: Option<u64>) -> Self {
        self.memory_limit_bytes = limit;
        self
    }
}

/// What a single process invocation produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed or terminated by a signal
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    pub elapsed: Duration,
    /// Set when the program could not be started at all
    pub spawn_error: Option<String>,
}

impl ProcessOutcome {
    fn spawn_failed(message: String, elapsed: Duration) -> Self {
        Self {
            elapsed,
            spawn_error: Some(message),
            ..Self::default()
        }
    }

    /// Exit code 0 and nothing on stderr. Warnings on stderr count as failure.
    pub fn success(&self) -> bool {
        self.spawn_error.is_none()
            && !self.timed_out
            && self.exit_code == Some(0)
            && self.stderr.trim().is_empty()
    }

    pub fn into_result(self) -> ExecutionResult {
        let success = self.success();
        if let Some(message) = self.spawn_error {
            return ExecutionResult::failure(message, self.elapsed);
        }

        let error = self.stderr.trim();
        ExecutionResult {
            output: self.stdout.trim().to_string(),
            error: (!error.is_empty()).then(|| error.to_string()),
            execution_time: self.elapsed,
            success,
            timed_out: self.timed_out,
        }
    }
}

/// Spawns one child per stage, feeds stdin, captures output and enforces the time limit
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    max_output_bytes: usize,
}

impl ProcessRunner {
    pub fn new(max_output_bytes: usize) -> Self {
        Self { max_output_bytes }
    }

    pub async fn run(&self, stage: &StageCommand, stdin: &str, timeout: Duration) -> ProcessOutcome {
        debug!("Process runner - Command: {}", stage.program);
        debug!("Process runner - Args: {:?}", stage.args);
        debug!("Process runner - Timeout: {:?}", timeout);

        let mut command = Command::new(&stage.program);
        command
            .args(&stage.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &stage.current_dir {
            command.current_dir(dir);
        }

        #[cfg(unix)]
        {
            let memory_limit = stage.memory_limit_bytes;
            unsafe {
                command.pre_exec(move || {
                    use nix::sys::resource::{setrlimit, Resource};
                    use nix::unistd::{setpgid, Pid};

                    // Own process group so a timeout can take down helpers the program forked
                    setpgid(Pid::from_raw(0), Pid::from_raw(0)).map_err(std::io::Error::from)?;
                    if let Some(limit) = memory_limit {
                        setrlimit(Resource::RLIMIT_AS, limit, limit)
                            .map_err(std::io::Error::from)?;
                    }
                    Ok(())
                });
            }
        }

        let start = Instant::now();
        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to spawn {}: {}", stage.program, e);
                return ProcessOutcome::spawn_failed(e.to_string(), start.elapsed());
            }
        };

        let stdout = Arc::new(Mutex::new(Vec::new()));
        let stderr = Arc::new(Mutex::new(Vec::new()));
        let mut readers = Vec::with_capacity(2);
        if let Some(pipe) = child.stdout.take() {
            readers.push(tokio::spawn(drain(
                pipe,
                stdout.clone(),
                self.max_output_bytes,
                "stdout",
            )));
        }
        if let Some(pipe) = child.stderr.take() {
            readers.push(tokio::spawn(drain(
                pipe,
                stderr.clone(),
                self.max_output_bytes,
                "stderr",
            )));
        }

        // stdin is always closed so the child never waits for more input
        let writer = child.stdin.take().map(|mut pipe| {
            let input = stdin.to_owned();
            tokio::spawn(async move {
                if !input.is_empty() {
                    if let Err(e) = pipe.write_all(input.as_bytes()).await {
                        debug!("Failed to write stdin: {}", e);
                    }
                }
                drop(pipe);
            })
        });

        let pid = child.id();
        let (exit_code, timed_out) = match time::timeout(timeout, child.wait()).await {
            Ok(Ok(status)) => {
                // Anything the program left running in the background dies with it
                kill_process_group(pid);
                (status.code(), false)
            }
            Ok(Err(e)) => {
                warn!("Failed to wait for {}: {}", stage.program, e);
                kill_process_group(pid);
                (None, false)
            }
            Err(_) => {
                warn!(
                    "{} exceeded time limit of {}ms, killing process group",
                    stage.program,
                    timeout.as_millis()
                );
                kill_process_tree(&mut child).await;
                (None, true)
            }
        };
        let elapsed = start.elapsed();

        if let Some(writer) = writer {
            writer.abort();
        }
        for mut reader in readers {
            if time::timeout(OUTPUT_DRAIN_GRACE, &mut reader).await.is_err() {
                debug!("Output stream of {} still open after exit", stage.program);
                reader.abort();
            }
        }

        debug!(
            "{} finished in {}ms (exit code {:?})",
            stage.program,
            elapsed.as_millis(),
            exit_code
        );

        ProcessOutcome {
            stdout: take_lossy(&stdout),
            stderr: take_lossy(&stderr),
            exit_code,
            timed_out,
            elapsed,
            spawn_error: None,
        }
    }
}

async fn kill_process_tree(child: &mut Child) {
    kill_process_group(child.id());

    // Reaps the child; also the only kill available off unix
    if let Err(e) = child.kill().await {
        debug!("Failed to kill child process: {}", e);
    }
}

/// SIGKILL the group led by `pid`. An already empty group is not an error.
fn kill_process_group(pid: Option<u32>) {
    #[cfg(unix)]
    if let Some(pid) = pid {
        use nix::errno::Errno;
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(e) => debug!("Failed to kill process group {}: {}", pid, e),
        }
    }
    #[cfg(not(unix))]
    let _ = pid;
}

async fn drain<R>(mut reader: R, sink: Arc<Mutex<Vec<u8>>>, limit: usize, stream: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; 8192];
    let mut truncated = false;
    loop {
        let read = match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                debug!("Failed to read {}: {}", stream, e);
                break;
            }
        };

        let mut buffer = sink.lock().unwrap_or_else(PoisonError::into_inner);
        let room = limit.saturating_sub(buffer.len());
        if read > room && !truncated {
            truncated = true;
            warn!("{} exceeded {} bytes, discarding the rest", stream, limit);
        }
        buffer.extend_from_slice(&chunk[..read.min(room)]);
    }
}

fn take_lossy(buffer: &Mutex<Vec<u8>>) -> String {
    let bytes = std::mem::take(&mut *buffer.lock().unwrap_or_else(PoisonError::into_inner));
    String::from_utf8_lossy(&bytes).into_owned()
}
