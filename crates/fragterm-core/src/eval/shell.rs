use std::path::PathBuf;

use serde_json::Value;

use super::{EvalError, Evaluator};
use crate::namespace::JsonNamespace;

const MAX_OUTPUT_LINES: usize = 2000;

/// Marks the line carrying the shell's final working directory.
const CWD_MARKER: &str = "__fragterm_cwd__:";

/// Runs fragments as shell scripts.
///
/// Each run starts in the namespace's `cwd` with the scalar `vars` exported
/// to the environment. A `cd` inside a fragment carries over to later runs
/// of the same context. Runs never produce a value; stdout and stderr become
/// output in the order they were written.
pub struct ShellEvaluator {
    shell: String,
}

impl ShellEvaluator {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Source with stderr folded into stdout, plus a trailer reporting the
    /// final directory while keeping the script's own exit status.
    fn wrap(source: &str) -> String {
        format!(
            "exec 2>&1\n{source}\n__fragterm_status=$?\nprintf '\\n{CWD_MARKER}%s\\n' \"$PWD\"\nexit $__fragterm_status\n"
        )
    }
}

impl Default for ShellEvaluator {
    fn default() -> Self {
        Self::new(crate::constants::defaults::SHELL)
    }
}

#[async_trait::async_trait]
impl Evaluator for ShellEvaluator {
    fn name(&self) -> &str {
        &self.shell
    }

    async fn execute(
        &self,
        source: &str,
        namespace: &mut JsonNamespace,
        sink: &mut Vec<String>,
    ) -> Result<Option<String>, EvalError> {
        let cwd = namespace
            .cwd()
            .map(PathBuf::from)
            .filter(|p| p.is_dir())
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        let mut cmd = tokio::process::Command::new(&self.shell);
        cmd.arg("-c")
            .arg(Self::wrap(source))
            .current_dir(&cwd)
            .envs(namespace.vars())
            .stdin(std::process::Stdio::null());

        let output = cmd
            .output()
            .await
            .map_err(|e| EvalError::new(format!("failed to start {}: {e}", self.shell)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut lines: Vec<&str> = stdout.lines().collect();

        if let Some(pos) = lines.iter().rposition(|l| l.starts_with(CWD_MARKER)) {
            let dir = lines.remove(pos)[CWD_MARKER.len()..].to_string();
            // The trailer starts with a newline of its own.
            if pos > 0 && lines.get(pos - 1).is_some_and(|l| l.is_empty()) {
                lines.remove(pos - 1);
            }
            if dir != cwd.display().to_string() {
                tracing::debug!("shell moved to {dir}");
                namespace.set("cwd", Value::String(dir));
            }
        }

        if lines.len() > MAX_OUTPUT_LINES {
            let dropped = lines.len() - MAX_OUTPUT_LINES;
            lines.truncate(MAX_OUTPUT_LINES);
            sink.extend(lines.into_iter().map(str::to_string));
            sink.push(format!("... [{dropped} lines truncated]"));
        } else {
            sink.extend(lines.into_iter().map(str::to_string));
        }

        if output.status.success() {
            return Ok(None);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let status = output
            .status
            .code()
            .map(|c| format!("exit status {c}"))
            .unwrap_or_else(|| "terminated by signal".to_string());
        Err(match stderr.lines().rev().find(|l| !l.trim().is_empty()) {
            Some(last) => EvalError::new(format!("{status}: {last}")),
            None => EvalError::new(status),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn namespace_in(dir: &std::path::Path) -> JsonNamespace {
        let mut ns = JsonNamespace::for_context("shell");
        ns.set("cwd", json!(dir.display().to_string()));
        ns
    }

    #[tokio::test]
    async fn test_stdout_becomes_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut ns = namespace_in(dir.path());
        let mut sink = Vec::new();
        let value = ShellEvaluator::default()
            .execute("echo one\necho two", &mut ns, &mut sink)
            .await
            .unwrap();
        assert_eq!(value, None);
        assert_eq!(sink, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_failure_reports_status_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let mut ns = namespace_in(dir.path());
        let mut sink = Vec::new();
        let err = ShellEvaluator::default()
            .execute("echo partial\necho nope >&2\nexit 3", &mut ns, &mut sink)
            .await
            .unwrap_err();
        assert_eq!(err.description, "exit status 3");
        assert_eq!(sink, vec!["partial", "nope"]);
    }

    #[tokio::test]
    async fn test_stderr_kept_on_success_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut ns = namespace_in(dir.path());
        let mut sink = Vec::new();
        let value = ShellEvaluator::default()
            .execute("echo out\necho warn >&2\necho after", &mut ns, &mut sink)
            .await
            .unwrap();
        assert_eq!(value, None);
        assert_eq!(sink, vec!["out", "warn", "after"]);
    }

    #[tokio::test]
    async fn test_vars_exported() {
        let dir = tempfile::tempdir().unwrap();
        let mut ns = namespace_in(dir.path());
        ns.set("vars.GREETING", json!("hello"));
        let mut sink = Vec::new();
        ShellEvaluator::default()
            .execute("echo \"$GREETING\"", &mut ns, &mut sink)
            .await
            .unwrap();
        assert_eq!(sink, vec!["hello"]);
    }

    #[tokio::test]
    async fn test_cd_persists_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let mut ns = namespace_in(dir.path());
        let eval = ShellEvaluator::default();
        let mut sink = Vec::new();
        eval.execute("cd sub", &mut ns, &mut sink).await.unwrap();
        assert!(sink.is_empty());
        assert!(ns.cwd().unwrap().ends_with("sub"));
        eval.execute("basename \"$PWD\"", &mut ns, &mut sink)
            .await
            .unwrap();
        assert_eq!(sink, vec!["sub"]);
    }
}
