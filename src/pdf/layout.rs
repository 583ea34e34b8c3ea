use std::iter::Peekable;
use std::str::SplitWhitespace;

use crate::fonts::FontEntry;

/// Line pitch presets, as multiples of the font size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineSpacing {
    /// 1.1 × size, used for body text.
    Normal,
    /// 1.0 × size, used in project entries.
    Dense,
}

impl LineSpacing {
    pub fn factor(self) -> f32 {
        match self {
            LineSpacing::Normal => 1.1,
            LineSpacing::Dense => 1.0,
        }
    }
}

pub fn line_height(font_size: f32, spacing: LineSpacing) -> f32 {
    font_size * spacing.factor()
}

/// Greedy word-boundary wrapper. Yields one line at a time so callers can
/// page-break between lines; runs of whitespace collapse to one space.
pub struct LineWrapper<'a> {
    words: Peekable<SplitWhitespace<'a>>,
    font: &'a FontEntry,
    font_size: f32,
    max_width: f32,
}

impl Iterator for LineWrapper<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let first = self.words.next()?;
        let space_w = self.font.space_width(self.font_size);
        let mut line = first.to_string();
        // An overlong word is left alone on its line rather than split.
        let mut current_x = self.font.text_width(first, self.font_size);

        while let Some(&word) = self.words.peek() {
            let ww = self.font.text_width(word, self.font_size);
            let proposed_x = current_x + space_w;
            if proposed_x + ww > self.max_width {
                break;
            }
            line.push(' ');
            line.push_str(word);
            current_x = proposed_x + ww;
            self.words.next();
        }
        Some(line)
    }
}

pub fn wrap_text<'a>(text: &'a str, font: &'a FontEntry, font_size: f32, max_width: f32) -> LineWrapper<'a> {
    LineWrapper {
        words: text.split_whitespace().peekable(),
        font,
        font_size,
        max_width,
    }
}
