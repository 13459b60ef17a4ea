//! Key handling. Each mode owns a slice of the keymap; Edit holds the
//! bulk of it.

use crate::autocomplete::{self, Suggestion};
use crate::commands::parse_command;
use crate::constants::HELP;
use crate::document::Direction;
use crate::keys::{InputEvent, Key, KeyCode, Modifiers};
use crate::session::Session;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Edit,
    /// Typing a search term
    Find { term: String },
    /// A completion is staged; enter accepts it
    Suggest(Suggestion),
    /// Typing a `/command`
    Command { input: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

impl Session {
    pub async fn handle_event(&mut self, event: InputEvent) -> Outcome {
        let outcome = match event {
            InputEvent::Key(key) => self.handle_key(key).await,
            InputEvent::Paste(text) => {
                self.quit_presses = 0;
                self.handle_paste(&text);
                Outcome::Continue
            }
            InputEvent::Resize { width, height } => {
                self.viewport.resize(width as usize, height as usize);
                Outcome::Continue
            }
        };
        self.sync_viewport();
        outcome
    }

    async fn handle_key(&mut self, key: Key) -> Outcome {
        if key.modifiers.without_shift() == Modifiers::CTRL && key.code == KeyCode::Char('c') {
            self.quit_presses += 1;
            if self.quit_presses >= 2 {
                return Outcome::Quit;
            }
            self.status = "press ctrl c again to exit".into();
            return Outcome::Continue;
        }
        self.quit_presses = 0;
        self.echo.clear();

        match std::mem::take(&mut self.mode) {
            Mode::Edit => self.handle_edit_key(key).await,
            Mode::Find { term } => {
                self.handle_find_key(key, term);
                Outcome::Continue
            }
            Mode::Command { input } => self.handle_command_key(key, input),
            Mode::Suggest(suggestion) => {
                if key.modifiers == Modifiers::NONE && key.code == KeyCode::Enter {
                    self.contexts
                        .active_mut()
                        .document
                        .replace_before_cursor(suggestion.replace, &suggestion.candidate);
                    self.follow = true;
                    Outcome::Continue
                } else {
                    self.handle_edit_key(key).await
                }
            }
        }
    }

    fn handle_paste(&mut self, text: &str) {
        match &mut self.mode {
            Mode::Find { term } => term.push_str(&single_line(text)),
            Mode::Command { input } => input.push_str(&single_line(text)),
            Mode::Suggest(_) | Mode::Edit => {
                self.mode = Mode::Edit;
                self.contexts.active_mut().document.insert_str(text);
                self.follow = true;
            }
        }
    }

    fn handle_find_key(&mut self, key: Key, mut term: String) {
        if let Some(c) = key.printable() {
            term.push(c);
            self.mode = Mode::Find { term };
            return;
        }
        match key.code {
            KeyCode::Backspace => {
                if term.pop().is_some() {
                    self.mode = Mode::Find { term };
                }
            }
            KeyCode::Enter => {
                let found = self.contexts.active_mut().document.find(&term);
                self.follow = true;
                self.status = if found {
                    format!("found '{term}'")
                } else {
                    format!("'{term}' not found")
                };
            }
            KeyCode::Esc => {}
            _ => self.mode = Mode::Find { term },
        }
    }

    fn handle_command_key(&mut self, key: Key, mut input: String) -> Outcome {
        if let Some(c) = key.printable() {
            input.push(c);
            self.mode = Mode::Command { input };
            return Outcome::Continue;
        }
        match key.code {
            KeyCode::Backspace => {
                if input.pop().is_some() {
                    self.mode = Mode::Command { input };
                }
                Outcome::Continue
            }
            KeyCode::Enter => self.execute_command(parse_command(&input)),
            KeyCode::Esc => Outcome::Continue,
            _ => {
                self.mode = Mode::Command { input };
                Outcome::Continue
            }
        }
    }

    async fn handle_edit_key(&mut self, key: Key) -> Outcome {
        if let Some(c) = key.printable() {
            self.contexts.active_mut().document.insert_char(c);
            self.follow = true;
            return Outcome::Continue;
        }

        let speed = self.contexts.active().options.scroll_speed;
        let mods = key.modifiers.without_shift();
        let doc = &mut self.contexts.active_mut().document;
        let mut follow = true;

        match (mods, &key.code) {
            (Modifiers::NONE, KeyCode::Enter) => doc.split_line(),
            (Modifiers::NONE, KeyCode::Backspace) => doc.delete_before(),
            (Modifiers::NONE, KeyCode::Delete) => doc.delete_at(),
            (Modifiers::NONE, KeyCode::Left) => {
                doc.move_cursor(Direction::Left);
            }
            (Modifiers::NONE, KeyCode::Right) => {
                doc.move_cursor(Direction::Right);
            }
            (Modifiers::NONE, KeyCode::Up) => {
                doc.move_cursor(Direction::Up);
            }
            (Modifiers::NONE, KeyCode::Down) => {
                doc.move_cursor(Direction::Down);
            }
            (Modifiers::NONE, KeyCode::Home) => doc.home(),
            (Modifiers::NONE, KeyCode::End) => doc.end(),
            (Modifiers::CTRL, KeyCode::Left) => doc.word_left(),
            (Modifiers::CTRL, KeyCode::Right) => doc.word_right(),
            (Modifiers::NONE, KeyCode::Tab) => self.complete_or_indent(),

            (Modifiers::CTRL, KeyCode::Char('d')) => doc.clear_line(),
            (Modifiers::CTRL, KeyCode::Char('k')) => doc.delete_active(),
            (Modifiers::CTRL, KeyCode::Char('l')) => doc.clear_outputs(),
            (Modifiers::NONE, KeyCode::Insert) => {
                let detached = doc.toggle_detached();
                self.status = if detached { "detached" } else { "attached" }.into();
            }
            (Modifiers::CTRL, KeyCode::Insert) => {
                let row = doc.active().edit.row;
                if let Some(name) = doc.split_fragment(row) {
                    self.status = format!("split into {name}");
                }
            }

            (Modifiers::NONE, KeyCode::PageUp) => doc.page_cursor(Direction::Up, speed),
            (Modifiers::NONE, KeyCode::PageDown) => doc.page_cursor(Direction::Down, speed),
            (Modifiers::CTRL, KeyCode::PageUp) => {
                doc.focus(Direction::Up);
            }
            (Modifiers::CTRL, KeyCode::PageDown) => {
                doc.focus(Direction::Down);
            }
            (Modifiers::ALT, KeyCode::PageUp) => {
                self.viewport.scroll(-(speed as isize));
                follow = false;
            }
            (Modifiers::ALT, KeyCode::PageDown) => {
                self.viewport.scroll(speed as isize);
                follow = false;
            }
            (Modifiers::CTRL, KeyCode::Up) => {
                doc.move_fragment(Direction::Up);
            }
            (Modifiers::CTRL, KeyCode::Down) => {
                doc.move_fragment(Direction::Down);
            }
            (Modifiers::ALT, KeyCode::Up) => {
                let ctx = self.contexts.active_mut();
                if !ctx.restore_revision(Direction::Up) {
                    self.status = "no earlier revision".into();
                }
            }
            (Modifiers::ALT, KeyCode::Down) => {
                let ctx = self.contexts.active_mut();
                if !ctx.restore_revision(Direction::Down) {
                    self.status = "no later revision".into();
                }
            }

            (Modifiers::CTRL, KeyCode::Char('r')) => self.run_active().await,
            (Modifiers::CTRL_ALT, KeyCode::Char('r')) => self.run_all().await,
            (Modifiers::CTRL, KeyCode::Char('n')) => {
                let name = self.contexts.active().name().to_string();
                let result = self.contexts.reset(&name);
                if self.report(result).is_some() {
                    self.status = format!("reset {name}");
                }
            }
            (Modifiers::CTRL, KeyCode::Char('f')) => {
                self.mode = Mode::Find {
                    term: String::new(),
                };
            }
            (Modifiers::CTRL, KeyCode::Char('p')) => {
                self.mode = Mode::Command {
                    input: "/".into(),
                };
            }
            (Modifiers::CTRL_ALT, KeyCode::Char('n')) => {
                let name = self.contexts.create_fresh();
                self.status = format!("new context {name}");
            }
            (Modifiers::CTRL_ALT, KeyCode::Char('k')) => {
                let name = self.contexts.active().name().to_string();
                let result = self.contexts.delete(&name);
                if self.report(result).is_some() {
                    self.status = format!("deleted {name}");
                }
            }
            (Modifiers::CTRL_ALT, KeyCode::Left) => {
                let name = self.contexts.switch(Direction::Left).to_string();
                self.status = name;
            }
            (Modifiers::CTRL_ALT, KeyCode::Right) => {
                let name = self.contexts.switch(Direction::Right).to_string();
                self.status = name;
            }

            (_, KeyCode::F(1)) => {
                self.echo = HELP.lines().map(str::to_string).collect();
                follow = self.follow;
            }
            _ => {
                self.echo = vec![format!("<{}>", key.describe())];
                follow = self.follow;
            }
        }

        self.follow = follow;
        Outcome::Continue
    }

    /// Tab: indent when there is no word before the cursor, otherwise
    /// complete it against the namespace.
    fn complete_or_indent(&mut self) {
        let ctx = self.contexts.active_mut();
        let before = ctx.document.active().before_cursor().to_string();
        if autocomplete::current_token(&before).is_empty() {
            let indent = " ".repeat(self.tab_width);
            ctx.document.insert_str(&indent);
            return;
        }

        ctx.refresh_namespace();
        let resolution = autocomplete::resolve(&ctx.namespace, &before);
        self.echo = resolution.describe();
        if let Some(suggestion) = resolution.suggestion() {
            self.mode = Mode::Suggest(suggestion);
        }
    }

    async fn run_active(&mut self) {
        let ctx = self.contexts.active_mut();
        let name = ctx.document.active().name.clone();
        let result = ctx
            .run_fragment(&name, self.evaluator.as_ref(), self.formatter.as_ref())
            .await;
        if let Some(report) = self.report(result) {
            self.status = report.summary();
        }
    }

    async fn run_all(&mut self) {
        let reports = self
            .contexts
            .active_mut()
            .run_all(self.evaluator.as_ref(), self.formatter.as_ref())
            .await;
        let failed = reports.iter().filter(|r| !r.succeeded()).count();
        self.status = format!("ran {} fragments, {failed} failed", reports.len());
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
