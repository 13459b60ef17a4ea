use unicode_width::UnicodeWidthStr;

use crate::constants::layout::GUTTER_WIDTH;
use crate::context::Context;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Code { row: usize },
    Output,
}

/// One visible line of the flattened buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderLine {
    /// Index of the owning fragment in document order
    pub fragment: usize,
    pub kind: LineKind,
    pub text: String,
}

/// Per-fragment state the gutter and colours are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentMarker {
    pub name: String,
    pub revision: Option<usize>,
    pub executed: bool,
    pub error: bool,
    pub detached: bool,
    pub active: bool,
    /// Alternates between neighbouring fragments
    pub parity: bool,
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderModel {
    pub context: String,
    pub fragments: Vec<FragmentMarker>,
    pub lines: Vec<RenderLine>,
    /// Full code of every fragment with lines on screen, by fragment index.
    /// Highlighting needs the rows scrolled out of view too.
    pub visible_code: Vec<(usize, Vec<String>)>,
    /// Flattened index of `lines[0]`
    pub first_line: usize,
    pub doc_height: usize,
    /// Screen column and row of the cursor, if it is on screen
    pub cursor: Option<(u16, u16)>,
    pub highlight: bool,
    pub status: String,
    pub echo: Vec<String>,
}

impl RenderModel {
    /// Full code of fragment `index`, if any of it is on screen.
    pub fn fragment_code(&self, index: usize) -> Option<&[String]> {
        self.visible_code
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, code)| code.as_slice())
    }

    /// Flatten `context` (code then output, fragment after fragment) and
    /// slice out what the viewport shows.
    pub fn build(context: &Context, viewport: &Viewport, show_cursor: bool) -> Self {
        let doc = &context.document;
        let active = doc.active_index();

        let fragments = doc
            .fragments()
            .iter()
            .enumerate()
            .map(|(i, f)| FragmentMarker {
                name: f.name.clone(),
                revision: f.revision,
                executed: f.edit.executed,
                error: f.edit.error,
                detached: f.detached,
                active: i == active,
                parity: i % 2 == 1,
            })
            .collect();

        let range = viewport.visible_range();
        let mut lines = Vec::with_capacity(range.len());
        let mut line = 0;
        'outer: for (i, f) in doc.fragments().iter().enumerate() {
            if line + f.height() <= range.start {
                line += f.height();
                continue;
            }
            let code = f
                .code
                .iter()
                .enumerate()
                .map(|(row, text)| (LineKind::Code { row }, text));
            let out = f.out.iter().map(|text| (LineKind::Output, text));
            for (kind, text) in code.chain(out) {
                if line >= range.end {
                    break 'outer;
                }
                if line >= range.start {
                    lines.push(RenderLine {
                        fragment: i,
                        kind,
                        text: text.clone(),
                    });
                }
                line += 1;
            }
        }

        let mut visible_code: Vec<(usize, Vec<String>)> = Vec::new();
        for l in &lines {
            if visible_code.last().map(|(i, _)| *i) != Some(l.fragment) {
                visible_code.push((l.fragment, doc.fragments()[l.fragment].code.clone()));
            }
        }

        let cursor = if show_cursor {
            let f = doc.active();
            viewport.screen_row(doc.cursor_line()).and_then(|row| {
                let x = u16::try_from(f.before_cursor().width() + GUTTER_WIDTH).ok()?;
                let y = u16::try_from(row).ok()?;
                Some((x, y))
            })
        } else {
            None
        };

        Self {
            context: context.name().to_string(),
            fragments,
            lines,
            visible_code,
            first_line: viewport.first_line,
            doc_height: doc.line_count(),
            cursor,
            highlight: context.options.highlight,
            status: String::new(),
            echo: Vec::new(),
        }
    }
}
