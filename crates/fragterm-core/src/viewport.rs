use crate::constants::layout::{BOTTOM_MARGIN, TOP_MARGIN};

/// Visible window onto the flattened rendering of a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    /// First visible line of the flattened buffer
    pub first_line: usize,
    /// Flattened line count as of the last update
    pub doc_height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            first_line: 0,
            doc_height: 0,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Largest useful `first_line`: the last line may sit just above the
    /// bottom margin. Zero when the document fits.
    pub fn max_first_line(&self) -> usize {
        (self.doc_height + BOTTOM_MARGIN + 1).saturating_sub(self.height)
    }

    /// Scroll so the cursor line stays clear of both edges, then clamp.
    pub fn follow_cursor(&mut self, cursor_line: usize, doc_height: usize) {
        self.doc_height = doc_height;

        if self.height <= TOP_MARGIN + BOTTOM_MARGIN + 1 {
            // No room for margins; just keep the cursor line on screen.
            self.first_line = cursor_line.saturating_sub(self.height.saturating_sub(1) / 2);
            return;
        }

        if cursor_line < self.first_line + TOP_MARGIN {
            self.first_line = cursor_line.saturating_sub(TOP_MARGIN);
        }
        let max_row = self.height - 1 - BOTTOM_MARGIN;
        if cursor_line > self.first_line + max_row {
            self.first_line = cursor_line - max_row;
        }
        self.first_line = self.first_line.min(self.max_first_line());
    }

    /// Free scroll: move the window without touching the cursor.
    pub fn scroll(&mut self, delta: isize) {
        let target = if delta < 0 {
            self.first_line.saturating_sub(delta.unsigned_abs())
        } else {
            self.first_line.saturating_add(delta as usize)
        };
        self.first_line = target.min(self.max_first_line());
    }

    /// Range of flattened line indices currently visible.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let end = (self.first_line + self.height).min(self.doc_height);
        self.first_line.min(end)..end
    }

    /// Screen row of a flattened line, if it is visible.
    pub fn screen_row(&self, line: usize) -> Option<usize> {
        line.checked_sub(self.first_line)
            .filter(|&row| row < self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}
