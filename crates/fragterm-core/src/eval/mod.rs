mod shell;

pub use shell::ShellEvaluator;

use thiserror::Error;

use crate::constants::layout::VALUE_PREFIX;
use crate::context::Context;
use crate::error::{FragError, Result};
use crate::filters::{apply_format, Formatter};
use crate::fragment::Fragment;
use crate::history::HistoryStore;
use crate::namespace::JsonNamespace;

/// A failed evaluation. The description becomes the last output line of
/// the fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{description}")]
pub struct EvalError {
    pub description: String,
}

impl EvalError {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Runs fragment source against a context's namespace.
///
/// Lines written to `sink` during the run become fragment output. A
/// returned value is shown ahead of them.
#[async_trait::async_trait]
pub trait Evaluator: Send + Sync {
    fn name(&self) -> &str;

    async fn execute(
        &self,
        source: &str,
        namespace: &mut JsonNamespace,
        sink: &mut Vec<String>,
    ) -> std::result::Result<Option<String>, EvalError>;
}

/// What happened to one fragment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub fragment: String,
    /// Revision recorded by the run; `None` when it failed
    pub revision: Option<usize>,
    pub error: Option<String>,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    pub fn summary(&self) -> String {
        match (&self.error, self.revision) {
            (Some(e), _) => format!("{} failed: {e}", self.fragment),
            (None, Some(rev)) => format!("{} r {rev}", self.fragment),
            (None, None) => format!("{} ran", self.fragment),
        }
    }
}

impl Context {
    /// Run one fragment.
    ///
    /// The code is formatted first when the `format` option is on. A
    /// detached fragment leaves the document while it runs and comes back
    /// last in document order, focused.
    pub async fn run_fragment(
        &mut self,
        name: &str,
        evaluator: &dyn Evaluator,
        formatter: &dyn Formatter,
    ) -> Result<RunReport> {
        let idx = self
            .document
            .position(name)
            .ok_or_else(|| FragError::not_found(format!("fragment '{name}'")))?;

        let format = self.options.format;
        let (source, detached) = {
            let fragment = self
                .document
                .get_mut(name)
                .ok_or_else(|| FragError::not_found(format!("fragment '{name}'")))?;
            if format {
                apply_format(formatter, fragment).await;
            }
            fragment.out.clear();
            (fragment.source(), fragment.detached)
        };

        tracing::debug!("running {name} with {}", evaluator.name());

        let mut sink = Vec::new();
        let report = if detached {
            let mut fragment = self.document.detach(idx);
            let outcome = evaluator
                .execute(&source, &mut self.namespace, &mut sink)
                .await;
            let report = record_outcome(&mut self.history, &mut fragment, outcome, sink);
            self.document.attach(fragment);
            report
        } else {
            let outcome = evaluator
                .execute(&source, &mut self.namespace, &mut sink)
                .await;
            let fragment = self
                .document
                .get_mut(name)
                .ok_or_else(|| FragError::not_found(format!("fragment '{name}'")))?;
            record_outcome(&mut self.history, fragment, outcome, sink)
        };

        if let Some(revision) = report.revision {
            self.log_run(name, revision, &source);
        }
        self.refresh_namespace();
        Ok(report)
    }

    /// Run every fragment in document order with all outputs cleared
    /// first. Focus returns to the fragment that was active.
    pub async fn run_all(
        &mut self,
        evaluator: &dyn Evaluator,
        formatter: &dyn Formatter,
    ) -> Vec<RunReport> {
        let active = self.document.active().name.clone();
        self.document.clear_outputs();

        let mut reports = Vec::new();
        for name in self.document.names() {
            match self.run_fragment(&name, evaluator, formatter).await {
                Ok(report) => reports.push(report),
                Err(e) => tracing::warn!("skipping {name}: {e}"),
            }
        }

        if let Err(e) = self.document.set_active(&active) {
            tracing::warn!("could not refocus {active}: {e}");
        }
        reports
    }
}

/// Write a run's result into the fragment. Successful runs are recorded in
/// history.
fn record_outcome(
    history: &mut HistoryStore,
    fragment: &mut Fragment,
    outcome: std::result::Result<Option<String>, EvalError>,
    sink: Vec<String>,
) -> RunReport {
    fragment.edit.executed = true;
    match outcome {
        Ok(value) => {
            let mut out: Vec<String> = value
                .map(|v| {
                    format!("{VALUE_PREFIX}{v}")
                        .split('\n')
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            out.extend(sink);
            fragment.out = out;
            fragment.edit.error = false;
            let revision = history.record(fragment);
            RunReport {
                fragment: fragment.name.clone(),
                revision: Some(revision),
                error: None,
            }
        }
        Err(e) => {
            fragment.out = sink;
            fragment.out.push(e.description.clone());
            fragment.edit.error = true;
            RunReport {
                fragment: fragment.name.clone(),
                revision: None,
                error: Some(e.description),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextOptions;
    use crate::filters::WhitespaceFormatter;
    use std::sync::Mutex;

    /// Replays canned results and remembers what it was asked to run.
    struct Scripted {
        results: Mutex<Vec<std::result::Result<Option<String>, EvalError>>>,
        logs: Vec<String>,
        seen: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(results: Vec<std::result::Result<Option<String>, EvalError>>) -> Self {
            Self {
                results: Mutex::new(results),
                logs: Vec::new(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl Evaluator for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn execute(
            &self,
            source: &str,
            _namespace: &mut JsonNamespace,
            sink: &mut Vec<String>,
        ) -> std::result::Result<Option<String>, EvalError> {
            self.seen.lock().unwrap().push(source.to_string());
            sink.extend(self.logs.iter().cloned());
            let mut results = self.results.lock().unwrap();
            if results.is_empty() {
                Ok(None)
            } else {
                results.remove(0)
            }
        }
    }

    fn ctx_with(code: &[&str]) -> Context {
        let mut ctx = Context::new("test", ContextOptions::default());
        ctx.document
            .active_mut()
            .set_code(code.iter().map(|s| s.to_string()).collect());
        ctx
    }

    #[tokio::test]
    async fn test_value_goes_ahead_of_logs() {
        let mut ctx = ctx_with(&["echo hi"]);
        let mut eval = Scripted::new(vec![Ok(Some("a\nb".into()))]);
        eval.logs = vec!["log".into()];
        let report = ctx
            .run_fragment("frag_0", &eval, &WhitespaceFormatter::default())
            .await
            .unwrap();
        assert_eq!(report.revision, Some(0));
        let frag = ctx.document.active();
        assert_eq!(frag.out, vec!["=> a", "b", "log"]);
        assert!(frag.edit.executed);
    }

    #[tokio::test]
    async fn test_failure_keeps_revision() {
        let mut ctx = ctx_with(&["x"]);
        let eval = Scripted::new(vec![
            Ok(None),
            Err(EvalError::new("boom")),
        ]);
        let fmt = WhitespaceFormatter::default();
        ctx.run_fragment("frag_0", &eval, &fmt).await.unwrap();
        let report = ctx.run_fragment("frag_0", &eval, &fmt).await.unwrap();
        assert!(!report.succeeded());
        let frag = ctx.document.active();
        assert_eq!(frag.revision, Some(0));
        assert!(frag.edit.error);
        assert_eq!(frag.out, vec!["boom"]);
        assert_eq!(ctx.history.len("frag_0"), 1);
    }

    #[tokio::test]
    async fn test_detached_fragment_moves_last() {
        let mut ctx = ctx_with(&["first"]);
        ctx.document.create_fragment("b").unwrap();
        ctx.document.set_active("frag_0").unwrap();
        ctx.document.toggle_detached();
        let eval = Scripted::new(vec![Ok(Some("1".into()))]);
        ctx.run_fragment("frag_0", &eval, &WhitespaceFormatter::default())
            .await
            .unwrap();
        assert_eq!(ctx.document.names(), vec!["b", "frag_0"]);
        assert_eq!(ctx.document.active().name, "frag_0");
        assert_eq!(ctx.document.active().out, vec!["=> 1"]);
    }

    #[tokio::test]
    async fn test_format_applied_before_run() {
        let mut ctx = ctx_with(&["\techo  ", "", ""]);
        let eval = Scripted::new(Vec::new());
        ctx.run_fragment("frag_0", &eval, &WhitespaceFormatter::default())
            .await
            .unwrap();
        assert_eq!(eval.seen.lock().unwrap()[0], "    echo\n");
        assert!(ctx.executed_script().contains("# frag_0 r 0"));
    }

    #[tokio::test]
    async fn test_run_all_restores_focus() {
        let mut ctx = ctx_with(&["a"]);
        ctx.document.create_fragment("b").unwrap();
        ctx.document.create_fragment("c").unwrap();
        ctx.document.set_active("b").unwrap();
        let eval = Scripted::new(Vec::new());
        let reports = ctx.run_all(&eval, &WhitespaceFormatter::default()).await;
        assert_eq!(reports.len(), 3);
        assert_eq!(ctx.document.active().name, "b");
        assert_eq!(eval.seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_fragment() {
        let mut ctx = ctx_with(&["a"]);
        let eval = Scripted::new(Vec::new());
        let err = ctx
            .run_fragment("nope", &eval, &WhitespaceFormatter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FragError::NotFound(_)));
    }
}
