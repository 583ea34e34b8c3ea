use crate::fonts::{FontEntry, FontSet, Weight};
use crate::style::Rgb;

/// Horizontal anchoring of a text run relative to the x it is drawn at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub weight: Weight,
    pub size: f32,
    pub color: Rgb,
}

impl TextStyle {
    pub fn regular(size: f32, color: Rgb) -> Self {
        Self {
            weight: Weight::Regular,
            size,
            color,
        }
    }

    pub fn bold(size: f32, color: Rgb) -> Self {
        Self {
            weight: Weight::Bold,
            size,
            color,
        }
    }
}

/// Fill, outline and corner radius of a rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RectPaint {
    pub radius: f32,
    pub fill: Option<Rgb>,
    pub stroke: Option<(Rgb, f32)>,
}

impl RectPaint {
    pub fn fill(color: Rgb) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    pub fn rounded(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn stroked(mut self, color: Rgb, width: f32) -> Self {
        self.stroke = Some((color, width));
        self
    }
}

/// A text run. `x` is the left edge after alignment, `y` the baseline
/// measured from the top of the page.
#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub weight: Weight,
    pub size: f32,
    pub color: Rgb,
    pub width: f32,
}

/// One recorded drawing operation. Coordinates grow downwards from the top
/// edge; conversion to PDF space happens at serialisation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text(TextItem),
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        fill: Option<Rgb>,
        stroke: Option<(Rgb, f32)>,
    },
    /// The avatar, scaled into the given box.
    Image { x: f32, y: f32, w: f32, h: f32 },
    Link {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        url: String,
    },
}

impl DrawOp {
    /// Lowest point the operation reaches, in top-down coordinates. Text is
    /// measured at its baseline.
    pub fn bottom(&self) -> f32 {
        match self {
            DrawOp::Text(t) => t.y,
            DrawOp::Line { y1, y2, .. } => y1.max(*y2),
            DrawOp::Rect { y, h, .. } | DrawOp::Image { y, h, .. } | DrawOp::Link { y, h, .. } => {
                y + h
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    /// Body content, in drawing order.
    pub ops: Vec<DrawOp>,
    /// Page furniture added after layout (footers). Never part of the body.
    pub stamps: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &TextItem> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn stamp_texts(&self) -> impl Iterator<Item = &TextItem> {
        self.stamps.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Link { url, .. } => Some(url.as_str()),
            _ => None,
        })
    }

    pub fn has_image(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, DrawOp::Image { .. }))
    }
}

/// Append-only drawing surface. Body operations always land on the last
/// page; stamps can target any page.
pub struct Canvas<'f> {
    fonts: &'f FontSet,
    pages: Vec<Page>,
}

impl<'f> Canvas<'f> {
    pub fn new(fonts: &'f FontSet) -> Self {
        Self {
            fonts,
            pages: vec![Page::default()],
        }
    }

    pub fn fonts(&self) -> &'f FontSet {
        self.fonts
    }

    pub fn font(&self, weight: Weight) -> &'f FontEntry {
        self.fonts.get(weight)
    }

    pub fn text_width(&self, text: &str, style: TextStyle) -> f32 {
        self.font(style.weight).text_width(text, style.size)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn add_page(&mut self) {
        self.pages.push(Page::default());
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn make_text(&self, x: f32, y: f32, text: &str, style: TextStyle, align: Align) -> TextItem {
        let width = self.text_width(text, style);
        let x = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        TextItem {
            x,
            y,
            text: text.to_string(),
            weight: style.weight,
            size: style.size,
            color: style.color,
            width,
        }
    }

    /// Draws left-aligned text and returns its width. Empty strings draw
    /// nothing.
    pub fn text(&mut self, x: f32, y: f32, text: &str, style: TextStyle) -> f32 {
        self.text_aligned(x, y, text, style, Align::Left)
    }

    pub fn text_aligned(&mut self, x: f32, y: f32, text: &str, style: TextStyle, align: Align) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        let item = self.make_text(x, y, text, style, align);
        let width = item.width;
        self.push(DrawOp::Text(item));
        width
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Rgb) {
        self.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        });
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.rect(x, y, w, h, RectPaint::fill(color));
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: RectPaint) {
        self.push(DrawOp::Rect {
            x,
            y,
            w,
            h,
            radius: paint.radius,
            fill: paint.fill,
            stroke: paint.stroke,
        });
    }

    pub fn image(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.push(DrawOp::Image { x, y, w, h });
    }

    /// Clickable area over a text run drawn at baseline `y` in `style`.
    pub fn link(&mut self, x: f32, y: f32, w: f32, style: TextStyle, url: &str) {
        if url.is_empty() {
            return;
        }
        let ascent = self.font(style.weight).ascent(style.size);
        self.push(DrawOp::Link {
            x,
            y: y - ascent,
            w,
            h: ascent + style.size * 0.25,
            url: url.to_string(),
        });
    }

    /// Adds text to a page's stamp layer. Out-of-range pages are ignored.
    pub fn stamp_text(&mut self, page: usize, x: f32, y: f32, text: &str, style: TextStyle, align: Align) {
        if text.is_empty() {
            return;
        }
        let item = self.make_text(x, y, text, style, align);
        if let Some(p) = self.pages.get_mut(page) {
            p.stamps.push(DrawOp::Text(item));
        }
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}
