use super::blocks::{SectionBlock, SkillCategory, printable_sections};
use super::canvas::{Align, Canvas, RectPaint, TextStyle};
use super::cursor::{PageCursor, PageGeometry};
use super::flow::{BulletLayout, LabelRow, divider, draw_bulleted, draw_label_row, draw_wrapped};
use super::layout::{LineSpacing, line_height, wrap_text};
use crate::fonts::FontSet;
use crate::i18n::{Translate, keys};
use crate::model::{CvDocument, Education, PersonalInfo, Project, WorkExperience};
use crate::style::{DurationPlacement, HeaderStyle, SectionHeaderStyle, SkillItemStyle, Style};

const SECTION_SPACING: f32 = 20.0;
const SUB_SECTION_SPACING: f32 = 15.0;
const SECTION_HEADER_HEIGHT: f32 = 32.0;
const LABEL_WIDTH: f32 = 85.0;
const COLUMN_GUTTER: f32 = 20.0;
const CONTACT_JOINER: &str = "  •  ";
/// Space between the avatar frame and the contact lines.
const AVATAR_CLEARANCE: f32 = 16.0;
const INLINE_DURATION_GAP: f32 = 8.0;
const SKILL_BULLET: &str = "• ";

fn normal(size: f32) -> f32 {
    line_height(size, LineSpacing::Normal)
}

fn dense(size: f32) -> f32 {
    line_height(size, LineSpacing::Dense)
}

/// What the composer needs beyond the CV itself.
pub struct ComposeOptions<'a> {
    pub style: &'a Style,
    pub translator: &'a dyn Translate,
    pub geometry: PageGeometry,
    /// Reserve the header frame and emit an image op for the avatar.
    pub has_avatar: bool,
    pub include_minor_projects: bool,
}

/// Lays out the whole CV onto a fresh canvas. Stamps are not added here.
pub fn compose_cv<'f>(cv: &CvDocument, fonts: &'f FontSet, opts: &ComposeOptions<'_>) -> Canvas<'f> {
    let mut canvas = Canvas::new(fonts);
    let mut cursor = PageCursor::new(opts.geometry);
    let mut renderer = SectionRenderer {
        canvas: &mut canvas,
        cursor: &mut cursor,
        style: opts.style,
        tr: opts.translator,
        has_avatar: opts.has_avatar,
    };
    for block in printable_sections(cv, opts.include_minor_projects) {
        let before = renderer.canvas.page_count();
        renderer.render(&block);
        log::debug!(
            "{} block: pages {}..={}, y={:.1}",
            block.kind(),
            before,
            renderer.canvas.page_count(),
            renderer.cursor.y(),
        );
    }
    canvas
}

struct SkillLine {
    /// First line of an item; carries the bullet.
    first: bool,
    text: String,
}

struct ContactSegment {
    text: String,
    url: Option<String>,
}

struct SectionRenderer<'a, 'f> {
    canvas: &'a mut Canvas<'f>,
    cursor: &'a mut PageCursor,
    style: &'a Style,
    tr: &'a dyn Translate,
    has_avatar: bool,
}

impl SectionRenderer<'_, '_> {
    fn geometry(&self) -> PageGeometry {
        *self.cursor.geometry()
    }

    fn render(&mut self, block: &SectionBlock<'_>) {
        match block {
            SectionBlock::Header(info) => self.header(info),
            SectionBlock::Summary(text) => self.summary(text),
            SectionBlock::Education(entries) => self.education(entries),
            SectionBlock::Experience(entries) => self.experience(entries),
            SectionBlock::Skills(categories) => self.skills(categories),
            SectionBlock::Projects(projects) => self.projects(projects),
        }
    }

    fn header(&mut self, info: &PersonalInfo) {
        let g = self.geometry();
        let m = g.margin_left;
        let p = self.style.palette;
        let band_h = g.margin_top * 3.8;

        self.canvas.fill_rect(0.0, 0.0, g.page_width, band_h, p.header_bg);
        if self.style.header == HeaderStyle::Hairline {
            self.canvas.line(m, band_h, g.right_edge(), band_h, 0.6, p.accent);
        }

        let mut y = self.cursor.y();
        let prefix = info
            .prefix
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| self.tr.translate(s));
        let full_name = match prefix {
            Some(prefix) => format!("{prefix} {}", info.name.trim()),
            None => info.name.trim().to_string(),
        };
        self.canvas.text(m, y, &full_name, TextStyle::bold(26.0, p.header_name));

        y += normal(24.0) * 0.7;
        self.canvas.text(m, y, &info.title, TextStyle::regular(15.0, p.header_title));
        if self.style.header == HeaderStyle::Hairline {
            self.canvas.line(m, y + 6.0, m + 120.0, y + 6.0, 1.0, p.accent_bar);
        }

        y += 14.0;
        self.tags(info, y - 10.0);
        y += 10.0;

        if self.has_avatar {
            self.avatar_frame();
        }

        y += normal(16.0) * 0.8;
        y = self.contact(info, y);

        let mut bottom = (y + normal(11.0) * 1.2).max(self.style.avatar_top + self.style.avatar_size + 24.0);
        if self.style.header == HeaderStyle::Band {
            bottom = bottom.max(band_h + 10.0);
        }
        self.cursor.advance_to(bottom + 15.0);
    }

    /// Rounded chips under the title: "city, country" and
    /// "workType • workLocation".
    fn tags(&mut self, info: &PersonalInfo, tag_y: f32) {
        let p = self.style.palette;
        let tag_style = TextStyle::regular(10.0, p.tag_text);
        let location = info
            .location
            .as_ref()
            .filter(|l| !l.city.is_empty() || !l.country.is_empty())
            .map(|l| format!("{}, {}", l.city, l.country));
        let availability = info
            .availability
            .as_ref()
            .filter(|a| !a.work_type.is_empty() || !a.work_location.is_empty())
            .map(|a| format!("{} • {}", a.work_type, a.work_location));

        let mut tag_x = self.geometry().margin_left;
        for tag in [location, availability].into_iter().flatten() {
            let w = self.canvas.text_width(&tag, tag_style) + 12.0;
            self.canvas
                .rect(tag_x, tag_y, w, 16.0, RectPaint::fill(p.tag_bg).rounded(6.0));
            self.canvas.text(tag_x + 6.0, tag_y + 11.0, &tag, tag_style);
            tag_x += w + 6.0;
        }
    }

    fn avatar_frame(&mut self) {
        let g = self.geometry();
        let p = self.style.palette;
        let size = self.style.avatar_size;
        let x = g.right_edge() - size;
        let y = self.style.avatar_top;

        self.canvas.rect(
            x + 2.0,
            y + 2.0,
            size,
            size,
            RectPaint::fill(p.avatar_shadow).rounded(10.0),
        );
        self.canvas.rect(
            x,
            y,
            size,
            size,
            RectPaint::fill([0xff, 0xff, 0xff])
                .rounded(12.0)
                .stroked(p.accent, 0.8),
        );
        self.canvas.image(x + 4.0, y + 4.0, size - 8.0, size - 8.0);
    }

    fn contact_segments(&self, info: &PersonalInfo) -> Vec<ContactSegment> {
        let c = &info.contact;
        let mut segments = Vec::new();
        if let Some(dob) = info.date_of_birth.as_deref().filter(|s| !s.is_empty()) {
            segments.push(ContactSegment {
                text: dob.to_string(),
                url: None,
            });
        }
        if !c.phone.is_empty() {
            segments.push(ContactSegment {
                text: c.phone.clone(),
                url: None,
            });
        }
        if !c.email.is_empty() {
            segments.push(ContactSegment {
                text: c.email.clone(),
                url: Some(format!("mailto:{}", c.email)),
            });
        }
        if !c.linkedin.is_empty() {
            segments.push(ContactSegment {
                text: self.tr.translate(keys::LINKEDIN),
                url: Some(c.linkedin.clone()),
            });
        }
        segments
    }

    /// Contact details on at most two lines left of the avatar. Segments are
    /// never split: the first one that overflows line one starts line two,
    /// and everything after it follows there. Returns the last baseline.
    fn contact(&mut self, info: &PersonalInfo, y: f32) -> f32 {
        let g = self.geometry();
        let m = g.margin_left;
        let p = self.style.palette;
        let on_band = self.style.header == HeaderStyle::Band;
        let plain = TextStyle::regular(11.0, if on_band { p.header_title } else { p.subtext });
        let link = TextStyle::regular(11.0, if on_band { p.header_name } else { p.link });

        let max_width = g.right_edge() - (self.style.avatar_size + 8.0) - AVATAR_CLEARANCE - m;
        let joiner_w = self.canvas.text_width(CONTACT_JOINER, plain);

        let mut first: Vec<ContactSegment> = Vec::new();
        let mut second: Vec<ContactSegment> = Vec::new();
        let mut used = 0.0;
        for seg in self.contact_segments(info) {
            let w = self.canvas.text_width(&seg.text, plain);
            if second.is_empty() && (first.is_empty() || used + joiner_w + w <= max_width) {
                used += if first.is_empty() { w } else { joiner_w + w };
                first.push(seg);
            } else {
                second.push(seg);
            }
        }

        let mut y = y;
        self.contact_line(&first, y, plain, link);
        if !second.is_empty() {
            y += normal(11.0);
            self.contact_line(&second, y, plain, link);
        }
        y
    }

    fn contact_line(&mut self, segments: &[ContactSegment], y: f32, plain: TextStyle, link: TextStyle) {
        let mut x = self.geometry().margin_left;
        for (i, seg) in segments.iter().enumerate() {
            if i > 0 {
                x += self.canvas.text(x, y, CONTACT_JOINER, plain);
            }
            match &seg.url {
                Some(url) => {
                    let w = self.canvas.text(x, y, &seg.text, link);
                    self.canvas.link(x, y, w, link, url);
                    x += w;
                }
                None => x += self.canvas.text(x, y, &seg.text, plain),
            }
        }
    }

    fn summary(&mut self, text: &str) {
        let g = self.geometry();
        let style = TextStyle::regular(12.0, self.style.palette.text);
        draw_wrapped(
            self.canvas,
            self.cursor,
            text,
            g.margin_left,
            g.content_width(),
            style,
            LineSpacing::Normal,
        );
        self.cursor.advance(SUB_SECTION_SPACING);
    }

    /// Section title. `first_block` is the height of the section's first
    /// unit (entry head, skills cell); the title only goes on a page that
    /// can also hold it.
    fn section_header(&mut self, key: &str, first_block: f32) {
        let g = self.geometry();
        let m = g.margin_left;
        let p = self.style.palette;
        let title = self.tr.translate(key);
        let title_style = TextStyle::bold(15.0, p.primary);

        // A block taller than a whole page is reserved only up to the page.
        let usable = g.bottom_limit() - self.cursor.page_top() - SECTION_HEADER_HEIGHT;
        let reserve = SECTION_HEADER_HEIGHT + first_block.max(normal(13.0)).min(usable);

        self.cursor.advance(SECTION_SPACING);
        let y = self.cursor.ensure_space(self.canvas, reserve);
        match self.style.section_header {
            SectionHeaderStyle::AccentBar => {
                self.canvas.fill_rect(m, y - 6.0, 4.0, 18.0, p.accent_bar);
                self.canvas.text(m + 12.0, y + 6.0, &title, title_style);
                self.canvas.line(m, y + 14.0, g.right_edge(), y + 14.0, 0.6, p.accent);
            }
            SectionHeaderStyle::Tinted => {
                self.canvas.rect(
                    m,
                    y - 8.0,
                    g.content_width(),
                    22.0,
                    RectPaint::fill(p.section_bg).rounded(4.0),
                );
                self.canvas.fill_rect(m, y - 8.0, 4.0, 22.0, p.accent_bar);
                self.canvas.text(m + 12.0, y + 7.0, &title, title_style);
            }
        }
        self.cursor.advance(24.0);
    }

    /// Duration next to a lead text that is `lead_width` wide at `y`.
    fn duration(&mut self, y: f32, lead_width: f32, text: &str, size: f32) {
        let g = self.geometry();
        let style = TextStyle::regular(size, self.style.palette.subtext);
        match self.style.durations {
            DurationPlacement::RightAligned => {
                self.canvas.text_aligned(g.right_edge(), y, text, style, Align::Right);
            }
            DurationPlacement::Inline => {
                let x = g.margin_left + lead_width + INLINE_DURATION_GAP;
                self.canvas.text(x, y, text, style);
            }
        }
    }

    fn education(&mut self, entries: &[Education]) {
        let entry_head = normal(14.0) + normal(12.0);
        self.section_header(keys::EDUCATION, entry_head);
        let g = self.geometry();
        let m = g.margin_left;
        let p = self.style.palette;
        let present = self.tr.translate(keys::PRESENT);

        for (i, edu) in entries.iter().enumerate() {
            let y = self.cursor.ensure_space(self.canvas, entry_head);
            let w = self
                .canvas
                .text(m, y, &edu.institution, TextStyle::bold(13.0, p.primary));
            let duration = edu.duration_label(&present).unwrap_or_default();
            self.duration(y, w, &duration, 13.0);

            self.cursor.advance(normal(14.0));
            let degree = self.tr.format(
                keys::DEGREE_IN_FIELD,
                &[("degree", &edu.degree), ("field", &edu.field)],
            );
            self.canvas.text(
                m,
                self.cursor.y(),
                &degree,
                TextStyle::regular(12.0, p.title_grey),
            );

            self.cursor.advance(SUB_SECTION_SPACING);
            if i + 1 < entries.len() {
                let y = self.cursor.y() - 10.0;
                self.canvas
                    .line(m + 40.0, y, g.right_edge() - 40.0, y, 0.5, p.accent);
            }
        }
    }

    fn experience(&mut self, entries: &[WorkExperience]) {
        let g = self.geometry();
        let m = g.margin_left;
        let p = self.style.palette;
        let present = self.tr.translate(keys::PRESENT);
        let body = TextStyle::regular(12.0, p.text);
        let bullets = BulletLayout {
            bullet_x: m + 4.0,
            text_x: m + 12.0,
            max_width: g.content_width() - 22.0,
        };
        let company_lh = normal(17.0);
        let position_gap = normal(14.0) * 1.2;
        // Company, position and the first responsibility line stay together.
        let entry_head = company_lh + position_gap + normal(body.size);
        self.section_header(keys::EXPERIENCE, entry_head);

        for (i, exp) in entries.iter().enumerate() {
            let y = self.cursor.ensure_space(self.canvas, entry_head);
            let w = self
                .canvas
                .text(m, y, &exp.company, TextStyle::bold(16.0, p.primary));
            let duration = exp.duration_label(&present).unwrap_or_default();
            self.duration(y, w, &duration, 12.0);

            self.cursor.advance(company_lh);
            self.canvas.text(
                m,
                self.cursor.y(),
                &exp.position,
                TextStyle::regular(13.0, p.text),
            );
            self.cursor.advance(position_gap);

            for (j, resp) in exp.responsibilities.iter().enumerate() {
                if j > 0 {
                    self.cursor.advance(20.0 - normal(body.size));
                }
                draw_bulleted(self.canvas, self.cursor, resp, bullets, body, LineSpacing::Normal);
            }

            if i + 1 < entries.len() {
                self.cursor.advance(5.0);
                divider(self.canvas, self.cursor, m, g.right_edge(), 0.6, p.accent);
                self.cursor.advance(25.0);
            }
        }
    }

    /// Skills grid: categories are dealt round-robin into columns, each
    /// column tracking its own y. A cell that does not fit starts a new page
    /// for every column. The cursor continues below the deepest column.
    fn skills(&mut self, categories: &[SkillCategory<'_>]) {
        let g = self.geometry();
        let p = self.style.palette;
        let n = self.style.skill_columns.max(1);
        let col_w = (g.content_width() - COLUMN_GUTTER * (n - 1) as f32) / n as f32;
        let label_style = TextStyle::bold(12.0, p.primary);
        let item_style = match self.style.skill_items {
            SkillItemStyle::Bullet => TextStyle::regular(10.0, p.text),
            SkillItemStyle::Bold => TextStyle::bold(10.0, p.text),
        };
        let label_gap = normal(16.0);
        let item_lh = normal(13.0);
        let cell_gap = 26.0 - label_gap;

        // Bulleted items hang their continuation lines under the text.
        let indent = match self.style.skill_items {
            SkillItemStyle::Bullet => self.canvas.text_width(SKILL_BULLET, item_style),
            SkillItemStyle::Bold => 0.0,
        };
        let font = self.canvas.font(item_style.weight);
        let cells: Vec<Vec<SkillLine>> = categories
            .iter()
            .map(|cat| {
                cat.items
                    .iter()
                    .flat_map(|item| {
                        wrap_text(item, font, item_style.size, col_w - indent)
                            .enumerate()
                            .map(|(j, text)| SkillLine { first: j == 0, text })
                    })
                    .collect()
            })
            .collect();
        let cell_height = |lines: &[SkillLine]| label_gap + lines.len() as f32 * item_lh;

        let first_cell = cells.first().map(|c| cell_height(c)).unwrap_or(0.0);
        self.section_header(keys::TECHNICAL_SKILLS, first_cell);

        let mut col_y = vec![self.cursor.y(); n];
        for (i, (cat, lines)) in categories.iter().zip(&cells).enumerate() {
            let col = i % n;
            let x = g.margin_left + col as f32 * (col_w + COLUMN_GUTTER);
            let required = cell_height(lines);

            if col_y[col] + required > g.bottom_limit() && col_y[col] > self.cursor.page_top() {
                let top = self.cursor.break_page(self.canvas);
                col_y.iter_mut().for_each(|y| *y = top);
            }

            let mut y = col_y[col];
            let label = self.tr.translate(&cat.label);
            self.canvas.text(x, y, &label, label_style);
            y += label_gap;
            for line in lines {
                if line.first && indent > 0.0 {
                    self.canvas.text(x, y, SKILL_BULLET, item_style);
                }
                self.canvas.text(x + indent, y, &line.text, item_style);
                y += item_lh;
            }
            col_y[col] = y + cell_gap;
        }
        self.cursor.converge(&col_y);
    }

    fn projects(&mut self, projects: &[&Project]) {
        let g = self.geometry();
        let m = g.margin_left;
        let p = self.style.palette;
        let body = TextStyle::regular(11.0, p.text);
        let label_style = TextStyle::bold(11.0, p.primary);
        let name_lh = dense(12.0) + 4.0;
        let bullets = BulletLayout {
            bullet_x: m + 5.0,
            text_x: m + 15.0,
            max_width: g.content_width() - 15.0,
        };
        let value_width = g.content_width() - LABEL_WIDTH - 30.0;
        let entry_head = name_lh + normal(body.size);
        self.section_header(keys::PROJECTS, entry_head);

        for (i, project) in projects.iter().enumerate() {
            let y = self.cursor.ensure_space(self.canvas, entry_head);
            let w = self
                .canvas
                .text(m, y, &project.name, TextStyle::bold(12.0, p.primary));
            if !project.duration.is_empty() {
                self.duration(y, w, &project.duration, 11.0);
            }
            self.cursor.advance(name_lh);

            if !project.description.trim().is_empty() {
                draw_bulleted(
                    self.canvas,
                    self.cursor,
                    &project.description,
                    bullets,
                    body,
                    LineSpacing::Normal,
                );
                self.cursor.advance(8.0);
            }

            let rows = [
                (keys::TECHNOLOGIES, project.technologies.join(", ")),
                (keys::ENVIRONMENT, project.environment.join(", ")),
                (keys::ROLE, project.role.clone()),
            ];
            for (key, value) in rows.iter().filter(|(_, v)| !v.trim().is_empty()) {
                let label = format!("{}:", self.tr.translate(key));
                let row = LabelRow {
                    label: &label,
                    value,
                    x: m,
                    label_width: LABEL_WIDTH,
                    value_width,
                };
                draw_label_row(self.canvas, self.cursor, &row, label_style, body, LineSpacing::Dense);
                self.cursor.advance(dense(6.0));
            }

            if i + 1 < projects.len() {
                self.cursor.advance(5.0);
                divider(self.canvas, self.cursor, m, g.right_edge(), 1.0, p.accent);
                self.cursor.advance(20.0);
            }
        }

        self.cursor.advance(20.0);
        let note = self.tr.translate(keys::ADDITIONAL_PROJECTS);
        let y = self.cursor.ensure_space(self.canvas, normal(11.0));
        self.canvas.text_aligned(
            g.page_width / 2.0,
            y,
            &note,
            TextStyle::regular(11.0, p.subtext),
            Align::Center,
        );
        self.cursor.advance(25.0);
    }
}
