use serde::{Deserialize, Serialize};

/// Cursor and run state of a fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditState {
    /// Index into `code`
    pub row: usize,
    /// Character (not byte) index into `code[row]`
    pub col: usize,
    /// Current text has been run since the last modification
    pub executed: bool,
    /// The last run failed
    pub error: bool,
}

/// A single independently editable and executable unit of source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub name: String,
    /// Index into this fragment's history, `None` until the first successful run
    pub revision: Option<usize>,
    /// Removed from the document while it runs and re-appended afterwards
    pub detached: bool,
    pub code: Vec<String>,
    pub out: Vec<String>,
    pub edit: EditState,
}

impl Fragment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            revision: None,
            detached: false,
            code: vec![String::new()],
            out: Vec::new(),
            edit: EditState::default(),
        }
    }

    pub fn with_code(name: impl Into<String>, code: Vec<String>) -> Self {
        let mut fragment = Self::new(name);
        fragment.set_code(code);
        fragment
    }

    /// Replace the code, keeping at least one line and the cursor in range.
    pub fn set_code(&mut self, code: Vec<String>) {
        self.code = if code.is_empty() {
            vec![String::new()]
        } else {
            code
        };
        self.clamp_cursor();
    }

    /// The line the cursor is on.
    pub fn line(&self) -> &str {
        &self.code[self.edit.row]
    }

    pub fn line_len(&self, row: usize) -> usize {
        self.code.get(row).map(|l| char_len(l)).unwrap_or(0)
    }

    /// Text on the cursor line before the cursor.
    pub fn before_cursor(&self) -> &str {
        let line = self.line();
        &line[..byte_index(line, self.edit.col)]
    }

    /// Text on the cursor line from the cursor on.
    pub fn after_cursor(&self) -> &str {
        let line = self.line();
        &line[byte_index(line, self.edit.col)..]
    }

    /// True when every line is empty.
    pub fn is_blank(&self) -> bool {
        self.code.iter().all(|l| l.is_empty())
    }

    pub fn source(&self) -> String {
        self.code.join("\n")
    }

    pub fn clamp_cursor(&mut self) {
        if self.code.is_empty() {
            self.code.push(String::new());
        }
        if self.edit.row >= self.code.len() {
            self.edit.row = self.code.len() - 1;
        }
        let len = self.line_len(self.edit.row);
        if self.edit.col > len {
            self.edit.col = len;
        }
    }

    /// Empty the fragment in place, keeping its name, history position and
    /// detached flag.
    pub fn clear(&mut self) {
        self.code = vec![String::new()];
        self.out.clear();
        self.edit.row = 0;
        self.edit.col = 0;
        self.edit.executed = false;
    }

    /// Forget run state but keep the code.
    pub fn reset_run_state(&mut self) {
        self.edit.executed = false;
        self.out.clear();
    }

    /// Number of rendered lines: code followed by output.
    pub fn height(&self) -> usize {
        self.code.len() + self.out.len()
    }
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the `col`-th character, or the end of the string.
pub(crate) fn byte_index(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map(|(i, _)| i).unwrap_or(s.len())
}

/// Character index of a byte offset produced by `str::find`.
pub(crate) fn char_index(s: &str, byte: usize) -> usize {
    s[..byte].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fragment_has_one_empty_line() {
        let f = Fragment::new("frag_0");
        assert_eq!(f.code, vec![String::new()]);
        assert_eq!(f.revision, None);
        assert!(f.is_blank());
    }

    #[test]
    fn test_set_code_never_leaves_empty_code() {
        let mut f = Fragment::new("a");
        f.set_code(Vec::new());
        assert_eq!(f.code.len(), 1);
    }

    #[test]
    fn test_clamp_cursor_after_shrink() {
        let mut f = Fragment::with_code("a", vec!["hello".into(), "world!".into()]);
        f.edit.row = 1;
        f.edit.col = 6;
        f.set_code(vec!["hi".into()]);
        assert_eq!((f.edit.row, f.edit.col), (0, 2));
    }

    #[test]
    fn test_cursor_split_is_char_based() {
        let mut f = Fragment::with_code("a", vec!["héllo".into()]);
        f.edit.col = 2;
        assert_eq!(f.before_cursor(), "hé");
        assert_eq!(f.after_cursor(), "llo");
    }

    #[test]
    fn test_clear_keeps_identity() {
        let mut f = Fragment::with_code("a", vec!["x".into(), "y".into()]);
        f.detached = true;
        f.revision = Some(2);
        f.out.push("=> 1".into());
        f.clear();
        assert_eq!(f.code, vec![String::new()]);
        assert!(f.out.is_empty());
        assert!(f.detached);
        assert_eq!(f.revision, Some(2));
    }
}
