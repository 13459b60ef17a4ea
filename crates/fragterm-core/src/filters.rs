//! Source formatters applied to a fragment before it runs.
//!
//! A formatter that fails leaves the code as it was; see [`apply_format`].

use std::process::Stdio;

use tokio::io::AsyncWriteExt;

use crate::error::{FragError, Result};
use crate::fragment::Fragment;

#[async_trait::async_trait]
pub trait Formatter: Send + Sync {
    fn name(&self) -> &str;
    async fn format(&self, lines: &[String]) -> Result<Vec<String>>;
}

/// Expands tabs, strips trailing whitespace and collapses trailing blank
/// lines to a single one.
pub struct WhitespaceFormatter {
    tab_width: usize,
}

impl WhitespaceFormatter {
    pub fn new(tab_width: usize) -> Self {
        Self { tab_width }
    }
}

impl Default for WhitespaceFormatter {
    fn default() -> Self {
        Self::new(crate::constants::defaults::TAB_WIDTH)
    }
}

#[async_trait::async_trait]
impl Formatter for WhitespaceFormatter {
    fn name(&self) -> &str {
        "whitespace"
    }

    async fn format(&self, lines: &[String]) -> Result<Vec<String>> {
        let indent = " ".repeat(self.tab_width);
        let mut out: Vec<String> = lines
            .iter()
            .map(|l| l.replace('\t', &indent).trim_end().to_string())
            .collect();
        while out.len() > 1 && out[out.len() - 1].is_empty() && out[out.len() - 2].is_empty() {
            out.pop();
        }
        Ok(out)
    }
}

/// Pipes the code through an external program and takes its stdout.
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a `[program, args...]` list as found in the config.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

#[async_trait::async_trait]
impl Formatter for CommandFormatter {
    fn name(&self) -> &str {
        &self.program
    }

    async fn format(&self, lines: &[String]) -> Result<Vec<String>> {
        let mut child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // Feed stdin while stdout drains.
        let mut input = lines.join("\n");
        input.push('\n');
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input.as_bytes()).await?;
                stdin.shutdown().await?;
            }
            Ok::<_, std::io::Error>(())
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FragError::Format(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        fed?;

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text.lines().map(str::to_string).collect())
    }
}

/// Format a fragment in place. On failure the code is left unmodified.
pub async fn apply_format(formatter: &dyn Formatter, fragment: &mut Fragment) -> bool {
    match formatter.format(&fragment.code).await {
        Ok(lines) => {
            fragment.set_code(lines);
            true
        }
        Err(e) => {
            tracing::warn!(
                "formatter {} failed on {}: {e}",
                formatter.name(),
                fragment.name
            );
            false
        }
    }
}
