use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

use fragterm_core::constants::defaults;

/// Syntax highlighting for fragment code.
pub struct CodeHighlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
    extension: String,
}

impl CodeHighlighter {
    /// `extension` picks the grammar (`sh`, `py`, ...). Unknown grammars
    /// highlight as plain text; unknown themes fall back to the default one.
    pub fn new(extension: &str, theme_name: &str) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = themes
            .remove(theme_name)
            .or_else(|| themes.remove(defaults::HIGHLIGHT_THEME))
            .unwrap_or_default();
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
            extension: extension.to_string(),
        }
    }

    /// Highlight consecutive lines of one fragment. `None` when the grammar
    /// fails on any line; callers draw plain text then.
    pub fn highlight(&self, lines: &[&str]) -> Option<Vec<Vec<Span<'static>>>> {
        let syntax = self
            .syntaxes
            .find_syntax_by_extension(&self.extension)
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());
        let mut h = HighlightLines::new(syntax, &self.theme);

        let mut out = Vec::with_capacity(lines.len());
        for line in lines {
            let text = format!("{line}\n");
            let ranges = match h.highlight_line(&text, &self.syntaxes) {
                Ok(ranges) => ranges,
                Err(e) => {
                    tracing::debug!("highlighting failed: {e}");
                    return None;
                }
            };
            let spans = ranges
                .into_iter()
                .filter_map(|(style, piece)| {
                    let piece = piece.trim_end_matches('\n');
                    if piece.is_empty() {
                        return None;
                    }
                    Some(Span::styled(piece.to_string(), convert_style(style)))
                })
                .collect();
            out.push(spans);
        }
        Some(out)
    }
}

fn convert_style(style: syntect::highlighting::Style) -> Style {
    let fg = style.foreground;
    let mut out = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}
