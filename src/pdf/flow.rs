//! Pagination-aware building blocks shared by the section renderers. Each
//! wrapped line is checked against the page bottom before it is drawn.

use super::canvas::{Canvas, TextStyle};
use super::cursor::PageCursor;
use super::layout::{LineSpacing, line_height, wrap_text};
use crate::style::Rgb;

const BULLET: &str = "•";

/// Draws `text` wrapped to `max_width` starting at the cursor. Returns the
/// number of lines drawn.
pub(crate) fn draw_wrapped(
    canvas: &mut Canvas<'_>,
    cursor: &mut PageCursor,
    text: &str,
    x: f32,
    max_width: f32,
    style: TextStyle,
    spacing: LineSpacing,
) -> usize {
    let lh = line_height(style.size, spacing);
    let mut count = 0;
    for line in wrap_text(text, canvas.font(style.weight), style.size, max_width) {
        let y = cursor.ensure_space(canvas, lh);
        canvas.text(x, y, &line, style);
        cursor.advance(lh);
        count += 1;
    }
    count
}

/// Horizontal placement of a bulleted paragraph.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BulletLayout {
    pub bullet_x: f32,
    pub text_x: f32,
    pub max_width: f32,
}

/// Like [`draw_wrapped`], with a bullet beside the first line. The bullet
/// always shares a page with that line.
pub(crate) fn draw_bulleted(
    canvas: &mut Canvas<'_>,
    cursor: &mut PageCursor,
    text: &str,
    layout: BulletLayout,
    style: TextStyle,
    spacing: LineSpacing,
) -> usize {
    let lh = line_height(style.size, spacing);
    let mut count = 0;
    for line in wrap_text(text, canvas.font(style.weight), style.size, layout.max_width) {
        let y = cursor.ensure_space(canvas, lh);
        if count == 0 {
            canvas.text(layout.bullet_x, y, BULLET, style);
        }
        canvas.text(layout.text_x, y, &line, style);
        cursor.advance(lh);
        count += 1;
    }
    count
}

/// A bold label in a fixed-width column followed by a wrapped value, e.g.
/// "Technologies:  Rust, Tokio". The label sits on the value's first line.
pub(crate) struct LabelRow<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub x: f32,
    pub label_width: f32,
    pub value_width: f32,
}

pub(crate) fn draw_label_row(
    canvas: &mut Canvas<'_>,
    cursor: &mut PageCursor,
    row: &LabelRow<'_>,
    label_style: TextStyle,
    value_style: TextStyle,
    spacing: LineSpacing,
) -> usize {
    let lh = line_height(value_style.size, spacing).max(line_height(label_style.size, spacing));
    let value_x = row.x + row.label_width;
    let mut count = 0;
    for line in wrap_text(row.value, canvas.font(value_style.weight), value_style.size, row.value_width) {
        let y = cursor.ensure_space(canvas, lh);
        if count == 0 {
            canvas.text(row.x, y, row.label, label_style);
        }
        canvas.text(value_x, y, &line, value_style);
        cursor.advance(lh);
        count += 1;
    }
    count
}

/// Horizontal rule at the cursor. Dropped when the cursor already sits
/// below the body area, where the rule would only mark a page end.
pub(crate) fn divider(canvas: &mut Canvas<'_>, cursor: &PageCursor, x1: f32, x2: f32, width: f32, color: Rgb) {
    if cursor.fits(0.0) {
        let y = cursor.y();
        canvas.line(x1, y, x2, y, width, color);
    }
}
