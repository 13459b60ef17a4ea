use crate::constants::names;
use crate::error::{FragError, Result};
use crate::fragment::{byte_index, char_index, char_len, Fragment};
use crate::history::HistoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// The ordered fragments of one context and the fragment holding the cursor.
///
/// Vector order is document order. `active` always indexes a live fragment;
/// the only exception is the window between [`Document::detach`] and
/// [`Document::attach`] while a detached fragment runs.
#[derive(Debug, Clone)]
pub struct Document {
    fragments: Vec<Fragment>,
    active: usize,
    /// Default-name counter, monotonic and never reused
    created: usize,
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            fragments: Vec::new(),
            active: 0,
            created: 0,
        };
        let name = doc.next_default_name();
        doc.fragments.push(Fragment::new(name));
        doc
    }

    /// Next unused `frag_<n>` name. Every call consumes a counter value.
    pub fn next_default_name(&mut self) -> String {
        loop {
            let name = format!("{}{}", names::FRAGMENT_PREFIX, self.created);
            self.created += 1;
            if !self.contains(&name) {
                return name;
            }
        }
    }

    // ── Lookup ──────────────────────────────────────────────────────────

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.fragments.iter().map(|f| f.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fragments.iter().position(|f| f.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Fragment> {
        self.fragments.iter_mut().find(|f| f.name == name)
    }

    pub fn active(&self) -> &Fragment {
        &self.fragments[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Fragment {
        &mut self.fragments[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn set_active(&mut self, name: &str) -> Result<()> {
        let idx = self
            .position(name)
            .ok_or_else(|| FragError::not_found(format!("fragment '{name}'")))?;
        self.active = idx;
        Ok(())
    }

    /// Flattened line index of the cursor: every preceding fragment's code
    /// and output, then the active fragment's row.
    pub fn cursor_line(&self) -> usize {
        let before: usize = self.fragments[..self.active]
            .iter()
            .map(Fragment::height)
            .sum();
        before + self.active().edit.row
    }

    /// Total flattened line count.
    pub fn line_count(&self) -> usize {
        self.fragments.iter().map(Fragment::height).sum()
    }

    // ── Text editing ────────────────────────────────────────────────────

    pub fn insert_char(&mut self, ch: char) {
        let f = self.active_mut();
        let row = f.edit.row;
        let at = byte_index(&f.code[row], f.edit.col);
        f.code[row].insert(at, ch);
        f.edit.col += 1;
        f.edit.executed = false;
    }

    /// Insert text at the cursor; newlines split the line.
    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\n' => self.split_line(),
                '\r' => {}
                c => self.insert_char(c),
            }
        }
    }

    /// Backspace. At column 0 the line joins the previous one.
    pub fn delete_before(&mut self) {
        let f = self.active_mut();
        let row = f.edit.row;
        if f.edit.col > 0 {
            let at = byte_index(&f.code[row], f.edit.col - 1);
            f.code[row].remove(at);
            f.edit.col -= 1;
        } else if row > 0 {
            let line = f.code.remove(row);
            f.edit.row -= 1;
            f.edit.col = char_len(&f.code[row - 1]);
            f.code[row - 1].push_str(&line);
        }
        f.edit.executed = false;
    }

    /// Delete. At end of line the following line joins this one.
    pub fn delete_at(&mut self) {
        let f = self.active_mut();
        let row = f.edit.row;
        if f.edit.col < char_len(&f.code[row]) {
            let at = byte_index(&f.code[row], f.edit.col);
            f.code[row].remove(at);
        } else if row + 1 < f.code.len() {
            let next = f.code.remove(row + 1);
            f.code[row].push_str(&next);
        }
        f.edit.executed = false;
    }

    pub fn split_line(&mut self) {
        let f = self.active_mut();
        let row = f.edit.row;
        let at = byte_index(&f.code[row], f.edit.col);
        let rest = f.code[row].split_off(at);
        f.code.insert(row + 1, rest);
        f.edit.row += 1;
        f.edit.col = 0;
        f.edit.executed = false;
    }

    /// Empty the cursor line, or remove it when it is already empty.
    pub fn clear_line(&mut self) {
        let f = self.active_mut();
        let row = f.edit.row;
        if !f.code[row].is_empty() {
            f.code[row].clear();
            f.edit.col = 0;
        } else if f.code.len() > 1 {
            f.code.remove(row);
            if row == f.code.len() {
                f.edit.row -= 1;
            }
            f.clamp_cursor();
        }
        f.edit.executed = false;
    }

    /// Replace the `count` characters before the cursor with `text`.
    pub fn replace_before_cursor(&mut self, count: usize, text: &str) {
        let f = self.active_mut();
        let row = f.edit.row;
        let count = count.min(f.edit.col);
        let start = byte_index(&f.code[row], f.edit.col - count);
        let end = byte_index(&f.code[row], f.edit.col);
        f.code[row].replace_range(start..end, text);
        f.edit.col = f.edit.col - count + char_len(text);
        f.edit.executed = false;
    }

    // ── Cursor movement ─────────────────────────────────────────────────

    /// Move the cursor one step. Up on the first line and down on the last
    /// line move focus to the neighbouring fragment; down past the end of the
    /// document appends a fresh fragment unless the current one is blank.
    /// Returns false when nothing moved.
    pub fn move_cursor(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Left => {
                let f = self.active_mut();
                if f.edit.col == 0 {
                    return false;
                }
                f.edit.col -= 1;
                true
            }
            Direction::Right => {
                let f = self.active_mut();
                if f.edit.col >= f.line_len(f.edit.row) {
                    return false;
                }
                f.edit.col += 1;
                true
            }
            Direction::Up => {
                let f = self.active_mut();
                if f.edit.row > 0 {
                    f.edit.row -= 1;
                    f.clamp_cursor();
                    true
                } else {
                    self.focus(Direction::Up)
                }
            }
            Direction::Down => {
                let f = self.active_mut();
                if f.edit.row + 1 < f.code.len() {
                    f.edit.row += 1;
                    f.clamp_cursor();
                    true
                } else if self.active + 1 < self.fragments.len() {
                    self.active += 1;
                    true
                } else if !self.active().is_blank() {
                    let name = self.next_default_name();
                    tracing::debug!("cursor left the document, appending {name}");
                    self.fragments.push(Fragment::new(name));
                    self.active = self.fragments.len() - 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn home(&mut self) {
        self.active_mut().edit.col = 0;
    }

    pub fn end(&mut self) {
        let f = self.active_mut();
        f.edit.col = f.line_len(f.edit.row);
    }

    pub fn word_left(&mut self) {
        let f = self.active_mut();
        let chars: Vec<char> = f.line().chars().collect();
        f.edit.col = word_boundary_left(&chars, f.edit.col);
    }

    pub fn word_right(&mut self) {
        let f = self.active_mut();
        let chars: Vec<char> = f.line().chars().collect();
        f.edit.col = word_boundary_right(&chars, f.edit.col);
    }

    /// Move the cursor row by `step` within the active fragment.
    pub fn page_cursor(&mut self, direction: Direction, step: usize) {
        let f = self.active_mut();
        match direction {
            Direction::Up | Direction::Left => f.edit.row = f.edit.row.saturating_sub(step),
            Direction::Down | Direction::Right => {
                f.edit.row = (f.edit.row + step).min(f.code.len() - 1)
            }
        }
        f.clamp_cursor();
    }

    /// Focus the previous (Up/Left) or next (Down/Right) fragment without
    /// touching either fragment's cursor.
    pub fn focus(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Up | Direction::Left if self.active > 0 => {
                self.active -= 1;
                true
            }
            Direction::Down | Direction::Right if self.active + 1 < self.fragments.len() => {
                self.active += 1;
                true
            }
            _ => false,
        }
    }

    /// Move the cursor to the first line containing `term`, searching from
    /// the cursor row down and wrapping to the top.
    pub fn find(&mut self, term: &str) -> bool {
        if term.is_empty() {
            return false;
        }
        let f = self.active_mut();
        let row = f.edit.row;
        let hits: Vec<(usize, usize)> = f
            .code
            .iter()
            .enumerate()
            .filter_map(|(i, line)| line.find(term).map(|b| (i, char_index(line, b))))
            .collect();
        let hit = hits
            .iter()
            .find(|(i, _)| *i >= row)
            .or_else(|| hits.first())
            .copied();
        match hit {
            Some((r, c)) => {
                f.edit.row = r;
                f.edit.col = c;
                true
            }
            None => false,
        }
    }

    // ── Fragment structure ──────────────────────────────────────────────

    /// Append an empty fragment. Focus is unchanged.
    pub fn create_fragment(&mut self, name: impl Into<String>) -> Result<usize> {
        let name = name.into();
        if self.contains(&name) {
            return Err(FragError::conflict(format!("fragment '{name}'")));
        }
        tracing::debug!("creating fragment {name}");
        self.fragments.push(Fragment::new(name));
        Ok(self.fragments.len() - 1)
    }

    /// Add a prepared fragment. With `overwrite` an existing fragment of the
    /// same name is replaced where it stands.
    pub fn add_fragment(&mut self, fragment: Fragment, overwrite: bool) -> Result<usize> {
        match self.position(&fragment.name) {
            Some(idx) if overwrite => {
                self.fragments[idx] = fragment;
                Ok(idx)
            }
            Some(_) => Err(FragError::conflict(format!("fragment '{}'", fragment.name))),
            None => {
                self.fragments.push(fragment);
                Ok(self.fragments.len() - 1)
            }
        }
    }

    /// Remove a fragment. The last remaining fragment is emptied instead.
    pub fn delete_fragment(&mut self, name: &str) -> Result<()> {
        let idx = self
            .position(name)
            .ok_or_else(|| FragError::not_found(format!("fragment '{name}'")))?;
        if self.fragments.len() == 1 {
            self.fragments[0].clear();
            return Ok(());
        }
        tracing::debug!("deleting fragment {name}");
        self.remove_at(idx);
        Ok(())
    }

    pub fn delete_active(&mut self) {
        let name = self.active().name.clone();
        // The active fragment is always present.
        let _ = self.delete_fragment(&name);
    }

    /// Move the lines below `at_row` of the active fragment into a new
    /// fragment named `<name>_split_<k>`. Returns the new name.
    pub fn split_fragment(&mut self, at_row: usize) -> Option<String> {
        if at_row + 1 >= self.active().code.len() {
            return None;
        }
        let base = self.active().name.clone();
        let name = (0..)
            .map(|k| format!("{base}{}{k}", names::SPLIT_INFIX))
            .find(|candidate| !self.contains(candidate))?;
        let f = self.active_mut();
        let tail = f.code.split_off(at_row + 1);
        f.clamp_cursor();
        f.edit.executed = false;
        tracing::debug!("split {base} at row {at_row} into {name}");
        self.fragments.push(Fragment::with_code(name.clone(), tail));
        Some(name)
    }

    /// Append `b`'s lines to `a` and delete `b`.
    pub fn merge_fragments(&mut self, a: &str, b: &str) -> Result<()> {
        if a == b {
            return Err(FragError::refused("cannot merge a fragment into itself"));
        }
        let ia = self
            .position(a)
            .ok_or_else(|| FragError::not_found(format!("fragment '{a}'")))?;
        let ib = self
            .position(b)
            .ok_or_else(|| FragError::not_found(format!("fragment '{b}'")))?;
        let b_was_active = ib == self.active;
        let merged = self.remove_at(ib);
        let ia = if ib < ia { ia - 1 } else { ia };
        let target = &mut self.fragments[ia];
        target.code.extend(merged.code);
        target.edit.executed = target.edit.executed && merged.edit.executed;
        if b_was_active {
            self.active = ia;
        }
        tracing::debug!("merged {b} into {a}");
        Ok(())
    }

    /// Rename a fragment; it moves to the end of document order.
    pub fn rename_fragment(&mut self, old: &str, new: &str, overwrite: bool) -> Result<()> {
        let idx = self
            .position(old)
            .ok_or_else(|| FragError::not_found(format!("fragment '{old}'")))?;
        if old != new && self.contains(new) && !overwrite {
            return Err(FragError::conflict(format!("fragment '{new}'")));
        }
        let was_active = idx == self.active;
        let active_name = self.active().name.clone();

        let mut fragment = self.fragments.remove(idx);
        if let Some(existing) = self.position(new) {
            self.fragments.remove(existing);
        }
        fragment.name = new.to_string();
        self.fragments.push(fragment);

        let last = self.fragments.len() - 1;
        self.active = if was_active {
            last
        } else {
            self.position(&active_name).unwrap_or(last)
        };
        tracing::debug!("renamed {old} to {new}");
        Ok(())
    }

    /// Rebuild document order from indices into the current order. Repeated
    /// indices keep their first position; fragments not named are dropped.
    pub fn reorder_fragments(&mut self, order: &[usize]) -> Result<()> {
        if order.is_empty() {
            return Err(FragError::refused("an ordering must keep at least one fragment"));
        }
        if let Some(bad) = order.iter().find(|&&i| i >= self.fragments.len()) {
            return Err(FragError::not_found(format!("fragment number {bad}")));
        }
        let active_name = self.active().name.clone();
        let mut slots: Vec<Option<Fragment>> = self.fragments.drain(..).map(Some).collect();
        self.fragments = order.iter().filter_map(|&i| slots[i].take()).collect();
        self.active = self.position(&active_name).unwrap_or(0);
        Ok(())
    }

    /// Swap the active fragment with its previous (Up) or next (Down)
    /// neighbour in document order.
    pub fn move_fragment(&mut self, direction: Direction) -> bool {
        let idx = self.active;
        let other = match direction {
            Direction::Up | Direction::Left if idx > 0 => idx - 1,
            Direction::Down | Direction::Right if idx + 1 < self.fragments.len() => idx + 1,
            _ => return false,
        };
        let mut order: Vec<usize> = (0..self.fragments.len()).collect();
        order.swap(idx, other);
        self.reorder_fragments(&order).is_ok()
    }

    pub fn toggle_detached(&mut self) -> bool {
        let f = self.active_mut();
        f.detached = !f.detached;
        f.detached
    }

    pub fn clear_outputs(&mut self) {
        for f in &mut self.fragments {
            f.out.clear();
        }
    }

    pub fn reset_run_state(&mut self) {
        for f in &mut self.fragments {
            f.reset_run_state();
        }
    }

    /// Replace the active fragment with its neighbouring history snapshot.
    /// Unsaved edits are overwritten.
    pub fn restore_revision(&mut self, direction: Direction, history: &HistoryStore) -> bool {
        let f = self.active();
        match history.navigate(&f.name, f.revision, direction) {
            Some(snapshot) => {
                tracing::debug!("restoring {} r {:?}", snapshot.name, snapshot.revision);
                *self.active_mut() = snapshot;
                true
            }
            None => false,
        }
    }

    // ── Detached runs ───────────────────────────────────────────────────

    /// Take a fragment out of the document for a detached run. The
    /// document may be left empty until [`Document::attach`].
    pub(crate) fn detach(&mut self, idx: usize) -> Fragment {
        let fragment = self.fragments.remove(idx);
        if self.active > idx || self.active >= self.fragments.len() {
            self.active = self.active.saturating_sub(1);
        }
        fragment
    }

    /// Re-append a detached fragment and focus it.
    pub(crate) fn attach(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
        self.active = self.fragments.len() - 1;
    }

    /// Remove by index, moving focus to the following fragment or the
    /// preceding one when the last was removed.
    fn remove_at(&mut self, idx: usize) -> Fragment {
        let fragment = self.fragments.remove(idx);
        if idx < self.active || self.active >= self.fragments.len() {
            self.active = self.active.saturating_sub(1);
        }
        fragment
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn word_boundary_left(chars: &[char], pos: usize) -> usize {
    let mut i = pos.min(chars.len());
    // Skip whitespace
    while i > 0 && chars[i - 1] == ' ' {
        i -= 1;
    }
    // Skip word characters
    while i > 0 && chars[i - 1] != ' ' {
        i -= 1;
    }
    i
}

fn word_boundary_right(chars: &[char], pos: usize) -> usize {
    let len = chars.len();
    if pos >= len {
        return len;
    }
    let mut i = pos;
    while i < len && chars[i] != ' ' {
        i += 1;
    }
    while i < len && chars[i] == ' ' {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(lines: &[&str]) -> Document {
        let mut doc = Document::new();
        doc.active_mut()
            .set_code(lines.iter().map(|s| s.to_string()).collect());
        doc
    }

    #[test]
    fn test_insert_and_backspace() {
        let mut doc = Document::new();
        for c in "abc".chars() {
            doc.insert_char(c);
        }
        assert_eq!(doc.active().code, vec!["abc".to_string()]);
        assert_eq!(doc.active().edit.col, 3);
        doc.delete_before();
        assert_eq!(doc.active().code[0], "ab");
        assert_eq!(doc.active().edit.col, 2);
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut doc = doc_with(&["foo", "bar"]);
        doc.active_mut().edit.row = 1;
        doc.delete_before();
        assert_eq!(doc.active().code, vec!["foobar".to_string()]);
        assert_eq!((doc.active().edit.row, doc.active().edit.col), (0, 3));
    }

    #[test]
    fn test_delete_at_end_of_line_joins_next() {
        let mut doc = doc_with(&["foo", "bar"]);
        doc.end();
        doc.delete_at();
        assert_eq!(doc.active().code, vec!["foobar".to_string()]);
        assert_eq!(doc.active().edit.col, 3);
    }

    #[test]
    fn test_split_line_moves_cursor() {
        let mut doc = doc_with(&["hello world"]);
        doc.active_mut().edit.col = 5;
        doc.split_line();
        assert_eq!(
            doc.active().code,
            vec!["hello".to_string(), " world".to_string()]
        );
        assert_eq!((doc.active().edit.row, doc.active().edit.col), (1, 0));
    }

    #[test]
    fn test_clear_line_then_remove() {
        let mut doc = doc_with(&["a", "b"]);
        doc.active_mut().edit.row = 1;
        doc.active_mut().edit.col = 1;
        doc.clear_line();
        assert_eq!(doc.active().code, vec!["a".to_string(), String::new()]);
        assert_eq!(doc.active().edit.col, 0);
        doc.clear_line();
        assert_eq!(doc.active().code, vec!["a".to_string()]);
        assert_eq!(doc.active().edit.row, 0);
    }

    #[test]
    fn test_down_past_end_creates_fragment_only_when_not_blank() {
        let mut doc = Document::new();
        assert!(!doc.move_cursor(Direction::Down));
        assert_eq!(doc.len(), 1);

        doc.insert_char('x');
        assert!(doc.move_cursor(Direction::Down));
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.active().name, "frag_1");
    }

    #[test]
    fn test_up_from_first_line_keeps_other_cursor() {
        let mut doc = doc_with(&["one", "two"]);
        doc.active_mut().edit.row = 1;
        doc.create_fragment("b").unwrap();
        doc.set_active("b").unwrap();
        assert!(doc.move_cursor(Direction::Up));
        assert_eq!(doc.active().name, "frag_0");
        assert_eq!(doc.active().edit.row, 1);
    }

    #[test]
    fn test_vertical_move_clamps_column() {
        let mut doc = doc_with(&["long line", "ab"]);
        doc.end();
        doc.move_cursor(Direction::Down);
        assert_eq!(doc.active().edit.col, 2);
    }

    #[test]
    fn test_create_fragment_conflict() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.create_fragment("frag_0"),
            Err(FragError::NamingConflict(_))
        ));
    }

    #[test]
    fn test_delete_active_focuses_following() {
        let mut doc = Document::new();
        doc.create_fragment("b").unwrap();
        doc.create_fragment("c").unwrap();
        doc.set_active("b").unwrap();
        doc.delete_active();
        assert_eq!(doc.active().name, "c");
        doc.delete_active();
        assert_eq!(doc.active().name, "frag_0");
    }

    #[test]
    fn test_delete_non_active_keeps_focus() {
        let mut doc = Document::new();
        doc.create_fragment("b").unwrap();
        doc.set_active("b").unwrap();
        doc.delete_fragment("frag_0").unwrap();
        assert_eq!(doc.active().name, "b");
    }

    #[test]
    fn test_split_fragment_names_avoid_collisions() {
        let mut doc = doc_with(&["a", "b", "c"]);
        doc.create_fragment("frag_0_split_0").unwrap();
        let name = doc.split_fragment(0).unwrap();
        assert_eq!(name, "frag_0_split_1");
        assert_eq!(doc.active().code, vec!["a".to_string()]);
        assert_eq!(
            doc.get(&name).unwrap().code,
            vec!["b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_split_on_last_line_is_noop() {
        let mut doc = doc_with(&["a", "b"]);
        assert!(doc.split_fragment(1).is_none());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_merge_requires_both() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.merge_fragments("frag_0", "nope"),
            Err(FragError::NotFound(_))
        ));
        assert!(matches!(
            doc.merge_fragments("frag_0", "frag_0"),
            Err(FragError::Refused(_))
        ));
    }

    #[test]
    fn test_merge_combines_executed() {
        let mut doc = doc_with(&["a"]);
        doc.active_mut().edit.executed = true;
        doc.create_fragment("b").unwrap();
        doc.merge_fragments("frag_0", "b").unwrap();
        assert_eq!(doc.len(), 1);
        assert!(!doc.active().edit.executed);
        assert_eq!(doc.active().code, vec!["a".to_string(), String::new()]);
    }

    #[test]
    fn test_rename_moves_last_and_respects_overwrite() {
        let mut doc = Document::new();
        doc.create_fragment("b").unwrap();
        assert!(matches!(
            doc.rename_fragment("frag_0", "b", false),
            Err(FragError::NamingConflict(_))
        ));
        doc.rename_fragment("frag_0", "main", false).unwrap();
        assert_eq!(doc.names(), vec!["b".to_string(), "main".to_string()]);
        assert_eq!(doc.active().name, "main");

        doc.rename_fragment("main", "b", true).unwrap();
        assert_eq!(doc.names(), vec!["b".to_string()]);
        assert!(matches!(
            doc.rename_fragment("gone", "x", false),
            Err(FragError::NotFound(_))
        ));
    }

    #[test]
    fn test_reorder_rejects_bad_index() {
        let mut doc = Document::new();
        doc.create_fragment("b").unwrap();
        assert!(doc.reorder_fragments(&[0, 5]).is_err());
        doc.reorder_fragments(&[1, 0]).unwrap();
        assert_eq!(doc.names(), vec!["b".to_string(), "frag_0".to_string()]);
        assert_eq!(doc.active().name, "frag_0");
    }

    #[test]
    fn test_move_fragment_swaps_neighbours() {
        let mut doc = Document::new();
        doc.create_fragment("b").unwrap();
        doc.create_fragment("c").unwrap();
        doc.set_active("c").unwrap();
        assert!(doc.move_fragment(Direction::Up));
        assert_eq!(doc.names(), vec!["frag_0", "c", "b"]);
        assert_eq!(doc.active().name, "c");
        assert!(doc.move_fragment(Direction::Up));
        assert!(!doc.move_fragment(Direction::Up));
    }

    #[test]
    fn test_find_wraps() {
        let mut doc = doc_with(&["let x = 1;", "let y = 2;", "x + y"]);
        doc.active_mut().edit.row = 1;
        assert!(doc.find("x"));
        assert_eq!((doc.active().edit.row, doc.active().edit.col), (2, 0));
        doc.active_mut().edit.row = 2;
        assert!(doc.find("= 1"));
        assert_eq!((doc.active().edit.row, doc.active().edit.col), (0, 6));
        assert!(!doc.find("zzz"));
    }

    #[test]
    fn test_replace_before_cursor() {
        let mut doc = doc_with(&["x = uti"]);
        doc.end();
        doc.replace_before_cursor(3, "util");
        assert_eq!(doc.active().code[0], "x = util");
        assert_eq!(doc.active().edit.col, 8);
    }

    #[test]
    fn test_word_jumps() {
        let mut doc = doc_with(&["one two three"]);
        doc.word_right();
        assert_eq!(doc.active().edit.col, 4);
        doc.end();
        doc.word_left();
        assert_eq!(doc.active().edit.col, 8);
    }

    #[test]
    fn test_word_left_stops_after_leading_space() {
        let mut doc = doc_with(&[" a"]);
        doc.end();
        doc.word_left();
        assert_eq!(doc.active().edit.col, 1);
        doc.word_left();
        assert_eq!(doc.active().edit.col, 0);
    }

    #[test]
    fn test_page_cursor_clamps() {
        let lines: Vec<String> = (0..5).map(|i| "x".repeat(i)).collect();
        let mut doc = Document::new();
        doc.active_mut().set_code(lines);
        doc.active_mut().edit.row = 4;
        doc.end();
        doc.page_cursor(Direction::Up, 10);
        assert_eq!((doc.active().edit.row, doc.active().edit.col), (0, 0));
        doc.page_cursor(Direction::Down, 2);
        assert_eq!(doc.active().edit.row, 2);
        doc.page_cursor(Direction::Down, 10);
        assert_eq!(doc.active().edit.row, 4);
    }

    #[test]
    fn test_cursor_line_counts_output() {
        let mut doc = doc_with(&["a", "b"]);
        doc.active_mut().out = vec!["=> 1".into()];
        doc.create_fragment("b").unwrap();
        doc.set_active("b").unwrap();
        assert_eq!(doc.cursor_line(), 3);
        assert_eq!(doc.line_count(), 4);
    }

    #[test]
    fn test_default_names_are_never_reused() {
        let mut doc = Document::new();
        doc.insert_char('x');
        doc.move_cursor(Direction::Down);
        doc.delete_active();
        doc.insert_char('y');
        doc.move_cursor(Direction::Down);
        assert_eq!(doc.active().name, "frag_2");
    }
}
