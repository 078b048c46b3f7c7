//! Command Runner: spawn one external command inside the working directory.
//!
//! Arguments are passed as a literal vector, never through a shell. Output is
//! drained on reader threads while the child runs so large outputs cannot
//! deadlock the pipes. With a timeout set, the child leads its own process
//! group and the whole group is killed, so grandchildren holding the pipes
//! (`npm` -> `sh` -> `node`) cannot keep the call alive.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

use crate::core::types::CommandOutput;
use crate::io::config::Workdir;

/// Runs external commands on behalf of the actions.
///
/// `Err` means the command could not be run at all (e.g. the executable is
/// missing). A command that runs and exits non-zero is `Ok`; its status is in
/// [`CommandOutput::exit_code`].
pub trait CommandRunner {
    fn run(&self, argv: &[&str]) -> Result<CommandOutput>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for Box<T> {
    fn run(&self, argv: &[&str]) -> Result<CommandOutput> {
        (**self).run(argv)
    }
}

/// Runner that spawns real child processes in a fixed [`Workdir`].
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    workdir: Workdir,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(workdir: Workdir) -> Self {
        Self {
            workdir,
            timeout: None,
        }
    }

    /// Kill commands that run longer than `timeout`. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn workdir(&self) -> &Workdir {
        &self.workdir
    }
}

impl CommandRunner for ProcessRunner {
    #[instrument(skip_all, fields(command = %argv.join(" ")))]
    fn run(&self, argv: &[&str]) -> Result<CommandOutput> {
        let Some((program, args)) = argv.split_first() else {
            bail!("empty command");
        };

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(self.workdir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if self.timeout.is_some() {
            own_process_group(&mut cmd);
        }

        debug!("spawning child process");
        let mut child = match cmd.spawn() {
            Ok(c) => c,
            Err(e) => {
                error!(err = %e, "failed to spawn command");
                return Err(e).with_context(|| format!("spawn {}", argv.join(" ")));
            }
        };

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("stdout was not piped"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow!("stderr was not piped"))?;

        let stdout_handle = thread::spawn(move || read_stream(stdout));
        let stderr_handle = thread::spawn(move || read_stream(stderr));

        let (status, timed_out) = match self.timeout {
            Some(timeout) => wait_with_timeout(&mut child, timeout)?,
            None => (child.wait().context("wait for command")?, false),
        };

        let stdout = join_output(stdout_handle).context("join stdout")?;
        let mut stderr = join_output(stderr_handle).context("join stderr")?;

        if timed_out && let Some(timeout) = self.timeout {
            if !stderr.is_empty() && !stderr.ends_with('\n') {
                stderr.push('\n');
            }
            stderr.push_str(&format!("[timed out after {timeout:?}]\n"));
        }

        debug!(exit_code = ?status.code(), timed_out, "command finished");
        Ok(CommandOutput {
            argv: argv.iter().map(|token| token.to_string()).collect(),
            stdout,
            stderr,
            exit_code: status.code(),
        })
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(ExitStatus, bool)> {
    match child.wait_timeout(timeout).context("wait for command")? {
        Some(status) => Ok((status, false)),
        None => {
            warn!(timeout_ms = timeout.as_millis() as u64, "command timed out, killing");
            kill_process_group(child)?;
            let status = child.wait().context("wait command after kill")?;
            Ok((status, true))
        }
    }
}

#[cfg(unix)]
fn own_process_group(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    cmd.process_group(0);
}

#[cfg(not(unix))]
fn own_process_group(_cmd: &mut Command) {}

#[cfg(unix)]
fn kill_process_group(child: &mut Child) -> Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    // The child was spawned into its own group, so its pid is the pgid.
    match killpg(Pid::from_raw(child.id() as i32), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(err) => Err(err).context("kill command process group"),
    }
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) -> Result<()> {
    child.kill().context("kill command")
}

fn join_output(handle: thread::JoinHandle<Result<String>>) -> Result<String> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

fn read_stream<R: Read>(mut reader: R) -> Result<String> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).context("read output")?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::Path;

    fn runner_in(dir: &Path) -> ProcessRunner {
        ProcessRunner::new(Workdir::resolve(dir, dir).expect("workdir"))
    }

    #[test]
    fn captures_stdout_then_stderr() {
        let temp = tempfile::tempdir().expect("tempdir");
        let runner = runner_in(temp.path());
        let out = runner
            .run(&["sh", "-c", "echo out; echo err >&2"])
            .expect("run");
        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");
        assert_eq!(out.transcript(), "$ sh -c echo out; echo err >&2\nout\nerr\n");
    }

    #[test]
    fn nonzero_exit_is_not_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = runner_in(temp.path())
            .run(&["sh", "-c", "echo failing >&2; exit 3"])
            .expect("run");
        assert_eq!(out.exit_code, Some(3));
        assert!(!out.success());
        assert_eq!(out.stderr, "failing\n");
    }

    #[test]
    fn runs_inside_workdir() {
        let temp = tempfile::tempdir().expect("tempdir");
        let runner = runner_in(temp.path());
        let out = runner.run(&["sh", "-c", "pwd -P"]).expect("run");
        assert_eq!(out.stdout.trim_end(), runner.workdir().path().to_string_lossy());
    }

    #[test]
    fn tokens_are_not_shell_interpreted() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = runner_in(temp.path())
            .run(&["echo", "$HOME", "a;b", "*"])
            .expect("run");
        assert_eq!(out.stdout, "$HOME a;b *\n");
    }

    #[test]
    fn missing_executable_is_a_spawn_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = runner_in(temp.path())
            .run(&["siteops-no-such-binary", "--flag"])
            .expect_err("spawn should fail");
        assert!(format!("{err:#}").contains("spawn siteops-no-such-binary --flag"));
    }

    #[test]
    fn empty_command_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        assert!(runner_in(temp.path()).run(&[]).is_err());
    }

    #[test]
    fn timeout_kills_and_notes_it() {
        let temp = tempfile::tempdir().expect("tempdir");
        let runner = runner_in(temp.path()).with_timeout(Some(Duration::from_millis(200)));
        let out = runner.run(&["sleep", "5"]).expect("run");
        assert!(!out.success());
        assert!(out.stderr.ends_with("[timed out after 200ms]\n"));
    }

    #[test]
    fn timeout_also_kills_grandchildren_holding_the_pipes() {
        let temp = tempfile::tempdir().expect("tempdir");
        let runner = runner_in(temp.path()).with_timeout(Some(Duration::from_millis(200)));
        let started = std::time::Instant::now();
        let out = runner
            .run(&["sh", "-c", "sleep 4; echo done"])
            .expect("run");
        let elapsed = started.elapsed();
        assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
        assert!(!out.stdout.contains("done"));
        assert!(out.stderr.ends_with("[timed out after 200ms]\n"));
    }
}
