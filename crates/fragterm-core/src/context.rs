use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::constants::{defaults, names};
use crate::document::{Direction, Document};
use crate::error::{FragError, Result};
use crate::history::HistoryStore;
use crate::namespace::JsonNamespace;

/// Per-context options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextOptions {
    /// Run the formatter over a fragment before executing it
    pub format: bool,
    /// Syntax-highlight code when rendering
    pub highlight: bool,
    /// Lines moved by page up/down
    pub scroll_speed: usize,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            format: defaults::FORMAT_ON_RUN,
            highlight: defaults::HIGHLIGHT,
            scroll_speed: defaults::SCROLL_SPEED,
        }
    }
}

/// An isolated set of fragments sharing one namespace, option set and
/// history.
#[derive(Debug, Clone)]
pub struct Context {
    name: String,
    pub document: Document,
    pub history: HistoryStore,
    pub options: ContextOptions,
    pub namespace: JsonNamespace,
    /// Source of every successful run, in run order
    script: String,
}

impl Context {
    pub fn new(name: impl Into<String>, options: ContextOptions) -> Self {
        let name = name.into();
        let namespace = JsonNamespace::for_context(&name);
        let mut ctx = Self {
            name,
            document: Document::new(),
            history: HistoryStore::new(),
            options,
            namespace,
            script: String::new(),
        };
        ctx.refresh_namespace();
        ctx
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn executed_script(&self) -> &str {
        &self.script
    }

    pub(crate) fn log_run(&mut self, fragment: &str, revision: usize, source: &str) {
        self.script
            .push_str(&format!("\n# {fragment} r {revision}\n{source}\n"));
    }

    /// Rename a fragment and carry its history along.
    pub fn rename_fragment(&mut self, old: &str, new: &str, overwrite: bool) -> Result<()> {
        self.document.rename_fragment(old, new, overwrite)?;
        self.history.rename(old, new);
        Ok(())
    }

    pub fn restore_revision(&mut self, direction: Direction) -> bool {
        self.document.restore_revision(direction, &self.history)
    }

    /// Mirror context state into `meta` so runs and autocomplete can see it.
    pub fn refresh_namespace(&mut self) {
        let fragments: Map<String, Value> = self
            .document
            .fragments()
            .iter()
            .map(|f| {
                (
                    f.name.clone(),
                    json!({
                        "revision": f.revision,
                        "detached": f.detached,
                        "lines": f.code.len(),
                        "executed": f.edit.executed,
                        "error": f.edit.error,
                        "history": self.history.len(&f.name),
                    }),
                )
            })
            .collect();
        self.namespace.set("meta.name", json!(self.name));
        self.namespace.set("meta.fragments", Value::Object(fragments));
        self.namespace.set(
            "meta.opts",
            serde_json::to_value(self.options).unwrap_or(Value::Null),
        );
        self.namespace
            .set("meta.active", json!(self.document.active().name));
    }

    /// Same code, history and options; fresh namespace and no run state.
    fn into_reset(self) -> Self {
        let mut document = self.document;
        document.reset_run_state();
        let mut ctx = Self {
            namespace: JsonNamespace::for_context(&self.name),
            name: self.name,
            document,
            history: self.history,
            options: self.options,
            script: self.script,
        };
        ctx.refresh_namespace();
        ctx
    }
}

/// Named contexts in registration order, one of them active.
#[derive(Debug)]
pub struct ContextManager {
    contexts: Vec<Context>,
    active: usize,
    /// Next candidate for `ctx_<n>` names
    counter: usize,
    defaults: ContextOptions,
}

impl ContextManager {
    pub fn new(defaults: ContextOptions) -> Self {
        let first = format!("{}0", names::CONTEXT_PREFIX);
        Self {
            contexts: vec![Context::new(first, defaults)],
            active: 0,
            counter: 1,
            defaults,
        }
    }

    pub fn active(&self) -> &Context {
        &self.contexts[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Context {
        &mut self.contexts[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn get(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.contexts.iter().position(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.contexts.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn defaults(&self) -> ContextOptions {
        self.defaults
    }

    /// Register and activate a new context.
    pub fn create(&mut self, name: impl Into<String>) -> Result<usize> {
        let name = name.into();
        if self.position(&name).is_some() {
            return Err(FragError::conflict(format!("context '{name}'")));
        }
        tracing::info!("creating context {name}");
        self.contexts.push(Context::new(name, self.defaults));
        self.active = self.contexts.len() - 1;
        Ok(self.active)
    }

    /// Create a context under the first free `ctx_<n>` name, with a header
    /// line in its first fragment.
    pub fn create_fresh(&mut self) -> String {
        let mut name = format!("{}{}", names::CONTEXT_PREFIX, self.counter);
        while self.position(&name).is_some() {
            self.counter += 1;
            name = format!("{}{}", names::CONTEXT_PREFIX, self.counter);
        }
        self.counter += 1;
        let idx = self.contexts.len();
        self.contexts.push(Context::new(name.clone(), self.defaults));
        self.active = idx;

        let fragment = self.contexts[idx].document.active_mut();
        fragment.set_code(vec![format!("# Context {name}"), String::new()]);
        fragment.edit.row = 1;
        tracing::info!("created context {name}");
        name
    }

    /// Activate the next (Right/Down) or previous (Left/Up) context,
    /// wrapping around.
    pub fn switch(&mut self, direction: Direction) -> &str {
        let len = self.contexts.len();
        self.active = match direction {
            Direction::Right | Direction::Down => (self.active + 1) % len,
            Direction::Left | Direction::Up => (self.active + len - 1) % len,
        };
        &self.contexts[self.active].name
    }

    pub fn switch_to(&mut self, name: &str) -> Result<()> {
        self.active = self
            .position(name)
            .ok_or_else(|| FragError::not_found(format!("context '{name}'")))?;
        Ok(())
    }

    /// Forget run state: every fragment loses `executed` and output, the
    /// namespace starts over. Code, history and options are kept.
    pub fn reset(&mut self, name: &str) -> Result<()> {
        let idx = self
            .position(name)
            .ok_or_else(|| FragError::not_found(format!("context '{name}'")))?;
        let old = self.contexts.remove(idx);
        self.contexts.insert(idx, old.into_reset());
        tracing::info!("reset context {name}");
        Ok(())
    }

    /// Remove a context. The last one cannot be deleted.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let idx = self
            .position(name)
            .ok_or_else(|| FragError::not_found(format!("context '{name}'")))?;
        if self.contexts.len() == 1 {
            return Err(FragError::refused(
                "no other contexts, make a new one first",
            ));
        }
        let active_name = self.active().name.clone();
        self.contexts.remove(idx);
        self.active = if idx == self.active {
            idx.saturating_sub(1)
        } else {
            self.position(&active_name).unwrap_or(0)
        };
        tracing::info!("deleted context {name}");
        Ok(())
    }
}

impl Default for ContextManager {
    fn default() -> Self {
        Self::new(ContextOptions::default())
    }
}
