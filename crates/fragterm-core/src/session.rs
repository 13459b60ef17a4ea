use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::commands::{Command, OptionChange};
use crate::config::Settings;
use crate::context::{Context, ContextManager, ContextOptions};
use crate::dispatcher::{Mode, Outcome};
use crate::error::{FragError, Result};
use crate::eval::{Evaluator, ShellEvaluator};
use crate::filters::{CommandFormatter, Formatter, WhitespaceFormatter};
use crate::persistence;
use crate::render::RenderModel;
use crate::viewport::Viewport;

/// All editor state behind one terminal: contexts, the viewport and the
/// input mode. Events go in through [`Session::handle_event`], frames come
/// out of [`Session::render`].
pub struct Session {
    pub(crate) contexts: ContextManager,
    pub(crate) viewport: Viewport,
    pub(crate) evaluator: Box<dyn Evaluator>,
    pub(crate) formatter: Box<dyn Formatter>,
    pub(crate) mode: Mode,
    /// Consecutive ctrl+c presses
    pub(crate) quit_presses: u8,
    pub(crate) status: String,
    pub(crate) echo: Vec<String>,
    /// Viewport tracks the cursor; false after a free scroll
    pub(crate) follow: bool,
    pub(crate) tab_width: usize,
}

impl Session {
    pub fn new(
        evaluator: Box<dyn Evaluator>,
        formatter: Box<dyn Formatter>,
        options: ContextOptions,
    ) -> Self {
        let mut session = Self {
            contexts: ContextManager::new(options),
            viewport: Viewport::default(),
            evaluator,
            formatter,
            mode: Mode::Edit,
            quit_presses: 0,
            status: String::new(),
            echo: Vec::new(),
            follow: true,
            tab_width: crate::constants::defaults::TAB_WIDTH,
        };
        session.sync_viewport();
        session
    }

    pub fn with_settings(settings: &Settings) -> Self {
        let evaluator = Box::new(ShellEvaluator::new(settings.eval.shell.clone()));
        let formatter: Box<dyn Formatter> = match settings
            .eval
            .format_command
            .as_deref()
            .and_then(CommandFormatter::from_argv)
        {
            Some(cmd) => Box::new(cmd),
            None => Box::new(WhitespaceFormatter::new(settings.editor.tab_width)),
        };
        let mut session = Self::new(evaluator, formatter, settings.context_options());
        session.tab_width = settings.editor.tab_width.max(1);
        session
    }

    pub fn contexts(&self) -> &ContextManager {
        &self.contexts
    }

    pub fn contexts_mut(&mut self) -> &mut ContextManager {
        &mut self.contexts
    }

    pub fn context(&self) -> &Context {
        self.contexts.active()
    }

    pub fn context_mut(&mut self) -> &mut Context {
        self.contexts.active_mut()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = text.into();
    }

    pub fn echo(&self) -> &[String] {
        &self.echo
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.viewport.resize(width, height);
        self.sync_viewport();
    }

    /// Load a file into a new fragment of the active context.
    pub fn load_file(&mut self, path: &Path) -> Result<String> {
        let name = persistence::load(&mut self.contexts.active_mut().document, path, false)?;
        self.status = format!("loaded {} as {name}", path.display());
        self.sync_viewport();
        Ok(name)
    }

    /// The frame to paint for the current state.
    pub fn render(&self) -> RenderModel {
        let mut model = RenderModel::build(self.contexts.active(), &self.viewport, self.follow);
        model.status = match &self.mode {
            Mode::Find { term } => format!(">> FIND: {term}"),
            Mode::Command { input } => format!(">> {input}"),
            Mode::Suggest(s) => format!(">> {} (enter to accept)", s.candidate),
            Mode::Edit => self.status.clone(),
        };
        model.echo = self.echo.clone();
        model
    }

    /// Bring the viewport up to date with the document after an event.
    pub(crate) fn sync_viewport(&mut self) {
        let doc = &self.contexts.active().document;
        let (cursor, height) = (doc.cursor_line(), doc.line_count());
        if self.follow {
            self.viewport.follow_cursor(cursor, height);
        } else {
            self.viewport.doc_height = height;
            self.viewport.scroll(0);
        }
    }

    /// Show an error in the status line.
    pub(crate) fn report<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("{e}");
                self.status = e.to_string();
                None
            }
        }
    }

    pub(crate) fn show_message(&mut self, text: &str) {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        if lines.len() > 1 {
            self.echo = lines;
        } else {
            self.status = text.to_string();
        }
    }

    /// Carry out a parsed command line.
    pub(crate) fn execute_command(&mut self, command: Command) -> Outcome {
        match command {
            Command::Quit => return Outcome::Quit,
            Command::Message(text) => self.show_message(&text),
            Command::Save(path) => {
                let result = persistence::save(&self.contexts.active().document, &path);
                if let Some(n) = self.report(result) {
                    self.status = format!("saved {n} lines to {}", path.display());
                }
            }
            Command::Load { path, overwrite } => {
                let doc = &mut self.contexts.active_mut().document;
                let result = persistence::load(doc, &path, overwrite);
                if let Some(name) = self.report(result) {
                    self.status = format!("loaded {} as {name}", path.display());
                }
            }
            Command::WriteScript(path) => {
                let result = persistence::write_script(self.contexts.active(), &path);
                if self.report(result).is_some() {
                    self.status = format!("wrote executed script to {}", path.display());
                }
            }
            Command::Rename { old, new, overwrite } => {
                let result = self
                    .contexts
                    .active_mut()
                    .rename_fragment(&old, &new, overwrite);
                if self.report(result).is_some() {
                    self.status = format!("renamed {old} to {new}");
                }
            }
            Command::Merge { into, from } => {
                let result = self
                    .contexts
                    .active_mut()
                    .document
                    .merge_fragments(&into, &from);
                if self.report(result).is_some() {
                    self.status = format!("merged {from} into {into}");
                }
            }
            Command::Reorder(order) => {
                let result = self.contexts.active_mut().document.reorder_fragments(&order);
                if self.report(result).is_some() {
                    self.status = "fragments reordered".into();
                }
            }
            Command::ListFragments => {
                self.echo = self
                    .contexts
                    .active()
                    .document
                    .fragments()
                    .iter()
                    .enumerate()
                    .map(|(i, f)| {
                        let mut line = format!("{i}: {}", f.name);
                        if let Some(rev) = f.revision {
                            line.push_str(&format!(" r {rev}"));
                        }
                        if f.detached {
                            line.push_str(" (detached)");
                        }
                        line
                    })
                    .collect();
            }
            Command::NewFragment(name) => {
                let doc = &mut self.contexts.active_mut().document;
                let result = doc.create_fragment(name.clone()).and_then(|_| doc.set_active(&name));
                self.report(result);
            }
            Command::NewContext(name) => {
                let result = self.contexts.create(name.clone());
                if self.report(result).is_some() {
                    self.status = format!("switched to new context {name}");
                }
            }
            Command::ListContexts => {
                let active = self.contexts.active().name().to_string();
                self.echo = self
                    .contexts
                    .names()
                    .into_iter()
                    .map(|n| {
                        if n == active {
                            format!("* {n}")
                        } else {
                            format!("  {n}")
                        }
                    })
                    .collect();
            }
            Command::SetOption(change) => {
                let ctx = self.contexts.active_mut();
                match change {
                    OptionChange::Format(on) => ctx.options.format = on,
                    OptionChange::Highlight(on) => ctx.options.highlight = on,
                    OptionChange::ScrollSpeed(n) => ctx.options.scroll_speed = n,
                }
                ctx.refresh_namespace();
                self.status = format!("options: {:?}", self.contexts.active().options);
            }
            Command::ChangeDir(None) => {
                self.status = self
                    .contexts
                    .active()
                    .namespace
                    .cwd()
                    .unwrap_or(".")
                    .to_string();
            }
            Command::ChangeDir(Some(dir)) => {
                let result = self.change_dir(&dir);
                if let Some(path) = self.report(result) {
                    self.status = format!("run directory: {path}");
                }
            }
            Command::SetVar { name, value } => {
                self.contexts
                    .active_mut()
                    .namespace
                    .set(&format!("vars.{name}"), Value::String(value));
                self.status = format!("set {name}");
            }
        }
        self.contexts.active_mut().refresh_namespace();
        Outcome::Continue
    }

    fn change_dir(&mut self, dir: &str) -> Result<String> {
        let ns = &mut self.contexts.active_mut().namespace;
        let base = ns.cwd().map(PathBuf::from).unwrap_or_default();
        let target = base.join(dir);
        if !target.is_dir() {
            return Err(FragError::not_found(format!("directory '{dir}'")));
        }
        let target = target.canonicalize()?.display().to_string();
        ns.set("cwd", Value::String(target.clone()));
        Ok(target)
    }
}
