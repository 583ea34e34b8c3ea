use super::canvas::Canvas;

/// Page size and margins in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageGeometry {
    /// A4 portrait (8.27 × 11.69 in) with 42 pt margins all round.
    pub const A4: Self = Self {
        page_width: 595.28,
        page_height: 841.89,
        margin_top: 42.0,
        margin_bottom: 42.0,
        margin_left: 42.0,
        margin_right: 42.0,
    };

    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    pub fn right_edge(&self) -> f32 {
        self.page_width - self.margin_right
    }

    /// Lowest y body content may reach.
    pub fn bottom_limit(&self) -> f32 {
        self.page_height - self.margin_bottom
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Vertical write position for one export. Every block asks
/// [`PageCursor::ensure_space`] before drawing, so body content never runs
/// past [`PageGeometry::bottom_limit`].
#[derive(Clone, Debug)]
pub struct PageCursor {
    page_index: usize,
    y: f32,
    geometry: PageGeometry,
    break_offset: f32,
}

impl PageCursor {
    /// Offset below the top margin where the first page starts.
    pub const FIRST_PAGE_OFFSET: f32 = 10.0;
    /// Offset below the top margin where continuation pages start.
    pub const BREAK_OFFSET: f32 = 20.0;

    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            page_index: 0,
            y: geometry.margin_top + Self::FIRST_PAGE_OFFSET,
            geometry,
            break_offset: Self::BREAK_OFFSET,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    /// Top of the body area on a continuation page.
    pub fn page_top(&self) -> f32 {
        self.geometry.margin_top + self.break_offset
    }

    pub fn fits(&self, required: f32) -> bool {
        self.y + required <= self.geometry.bottom_limit()
    }

    /// Starts a new page when `required` points do not fit below the current
    /// position. Returns the y to draw at.
    pub fn ensure_space(&mut self, canvas: &mut Canvas<'_>, required: f32) -> f32 {
        if !self.fits(required) {
            self.break_page(canvas);
        }
        self.y
    }

    /// Unconditional page break.
    pub fn break_page(&mut self, canvas: &mut Canvas<'_>) -> f32 {
        canvas.add_page();
        self.page_index = canvas.page_count() - 1;
        self.y = self.page_top();
        log::trace!("page break → page {}", self.page_index + 1);
        self.y
    }

    /// Moves down without a bound check. The next `ensure_space` catches any
    /// overflow.
    pub fn advance(&mut self, delta: f32) {
        self.y += delta;
    }

    /// Raises the position to at least `y`.
    pub fn advance_to(&mut self, y: f32) {
        self.y = self.y.max(y);
    }

    /// Joins parallel columns: continues below the deepest one.
    pub fn converge(&mut self, column_ys: &[f32]) {
        if let Some(max) = column_ys.iter().copied().reduce(f32::max) {
            self.y = max;
        }
    }
}
