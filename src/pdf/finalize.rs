use chrono::NaiveDate;

use super::canvas::{Align, Canvas, TextStyle};
use super::cursor::PageGeometry;
use crate::i18n::{Translate, keys};
use crate::style::Rgb;

const FOOTER_SIZE: f32 = 10.0;
const FOOTER_OFFSET: f32 = 20.0;

/// Stamps "Page i of N" centred near the bottom of every page. Runs once
/// the page count is final.
pub fn stamp_page_numbers(canvas: &mut Canvas<'_>, tr: &dyn Translate, geometry: &PageGeometry, color: Rgb) {
    let total = canvas.page_count();
    let total_s = total.to_string();
    let style = TextStyle::regular(FOOTER_SIZE, color);
    for i in 0..total {
        let page = (i + 1).to_string();
        let text = tr.format(keys::PAGE_FOOTER, &[("page", &page), ("total", &total_s)]);
        canvas.stamp_text(
            i,
            geometry.page_width / 2.0,
            geometry.page_height - FOOTER_OFFSET,
            &text,
            style,
            Align::Center,
        );
    }
}

/// `CV_<Name>_<YYYY-MM-DD>.pdf`, with each run of whitespace in the name
/// replaced by one underscore.
pub fn output_filename(name: &str, date: NaiveDate) -> String {
    let name = name.split_whitespace().collect::<Vec<_>>().join("_");
    format!("CV_{name}_{}.pdf", date.format("%Y-%m-%d"))
}
