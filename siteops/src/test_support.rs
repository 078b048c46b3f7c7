//! Test-only helpers: a scripted command runner and a git repository fixture.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow, bail};
use tempfile::TempDir;

use crate::actions::ActionRegistry;
use crate::core::types::CommandOutput;
use crate::io::config::Workdir;
use crate::io::process::CommandRunner;

/// One queued reply of a [`ScriptedRunner`].
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Output {
        stdout: String,
        stderr: String,
        exit_code: i32,
    },
    /// Behave as if the executable could not be spawned.
    SpawnError(String),
}

/// Runner that records every argv and answers from a queue.
///
/// Once the queue is exhausted every command "succeeds" with empty output.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    replies: Mutex<VecDeque<ScriptedReply>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn output(stdout: &str, stderr: &str, exit_code: i32) -> ScriptedReply {
        ScriptedReply::Output {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
        }
    }

    pub fn spawn_error(message: &str) -> ScriptedReply {
        ScriptedReply::SpawnError(message.to_string())
    }

    /// Argument vectors in the order they were run.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, argv: &[&str]) -> Result<CommandOutput> {
        let argv: Vec<String> = argv.iter().map(|token| token.to_string()).collect();
        self.calls.lock().expect("calls lock").push(argv.clone());
        let reply = self.replies.lock().expect("replies lock").pop_front();
        match reply {
            Some(ScriptedReply::SpawnError(message)) => Err(anyhow!(message)),
            Some(ScriptedReply::Output {
                stdout,
                stderr,
                exit_code,
            }) => Ok(CommandOutput {
                argv,
                stdout,
                stderr,
                exit_code: Some(exit_code),
            }),
            None => Ok(CommandOutput {
                argv,
                stdout: String::new(),
                stderr: String::new(),
                exit_code: Some(0),
            }),
        }
    }
}

/// Build a registry over an existing directory.
pub fn registry_in<R: CommandRunner>(dir: &Path, runner: R) -> ActionRegistry<R> {
    let workdir = Workdir::resolve(dir, dir).expect("workdir");
    ActionRegistry::new(workdir, runner)
}

/// A git checkout with an initial commit, tracking a bare `origin` remote.
///
/// Layout inside the temp dir: `remote.git/` (bare) and `site/` (checkout).
pub struct TestRepo {
    _temp: TempDir,
    site: PathBuf,
    remote: PathBuf,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("tempdir")?;
        let remote = temp.path().join("remote.git");
        let site = temp.path().join("site");
        fs::create_dir_all(&site).context("create site dir")?;

        run_git(temp.path(), &["init", "--bare", "remote.git"])?;
        run_git(&site, &["init"])?;
        run_git(&site, &["config", "user.name", "Siteops Test"])?;
        run_git(&site, &["config", "user.email", "siteops-test@local.invalid"])?;
        run_git(&site, &["config", "commit.gpgsign", "false"])?;

        fs::write(site.join("README.md"), "# site\n").context("write README")?;
        run_git(&site, &["add", "-A"])?;
        run_git(&site, &["commit", "-m", "chore: bootstrap"])?;

        let remote_url = remote.to_string_lossy().into_owned();
        run_git(&site, &["remote", "add", "origin", &remote_url])?;
        run_git(&site, &["push", "-u", "origin", "HEAD"])?;

        Ok(Self {
            _temp: temp,
            site,
            remote,
        })
    }

    /// The checkout (use as the working directory).
    pub fn path(&self) -> &Path {
        &self.site
    }

    pub fn workdir(&self) -> Workdir {
        Workdir::resolve(&self.site, &self.site).expect("workdir")
    }

    pub fn write_file(&self, relative: &str, contents: &str) -> Result<()> {
        let path = self.site.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))
    }

    /// Subject of the latest commit in the checkout.
    pub fn head_subject(&self) -> Result<String> {
        let out = run_git(&self.site, &["log", "-1", "--format=%s"])?;
        Ok(out.trim().to_string())
    }

    /// Subject of the latest commit the remote received.
    pub fn remote_head_subject(&self) -> Result<String> {
        let out = run_git(&self.remote, &["log", "-1", "--format=%s"])?;
        Ok(out.trim().to_string())
    }

    pub fn commit_count(&self) -> Result<usize> {
        let out = run_git(&self.site, &["rev-list", "--count", "HEAD"])?;
        out.trim()
            .parse()
            .with_context(|| format!("parse commit count '{}'", out.trim()))
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("spawn git {}", args.join(" ")))?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
