mod common;

use folio_pdf::i18n::{Catalog, Language};
use folio_pdf::model::{CvDocument, Education, SkillList};
use folio_pdf::style::{Style, StylePreset};
use folio_pdf::{Canvas, ComposeOptions, FontSet, Page, PageCursor, PageGeometry, compose_cv, render_cv};

#[test]
fn ensure_space_is_idempotent_when_it_fits() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let mut cursor = PageCursor::new(PageGeometry::A4);
    let start = cursor.y();
    assert_eq!(start, 42.0 + PageCursor::FIRST_PAGE_OFFSET);

    assert_eq!(cursor.ensure_space(&mut canvas, 100.0), start);
    assert_eq!(cursor.ensure_space(&mut canvas, 100.0), start);
    assert_eq!(canvas.page_count(), 1);
    assert_eq!(cursor.page_index(), 0);
}

#[test]
fn ensure_space_breaks_to_page_top() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let g = PageGeometry::A4;
    let mut cursor = PageCursor::new(g);

    cursor.advance(g.bottom_limit() - cursor.y() - 10.0);
    assert!(cursor.fits(9.5));
    assert!(!cursor.fits(10.5));

    let y = cursor.ensure_space(&mut canvas, 30.0);
    assert_eq!(y, g.margin_top + PageCursor::BREAK_OFFSET);
    assert_eq!(cursor.page_index(), 1);
    assert_eq!(canvas.page_count(), 2);
}

#[test]
fn advance_has_no_bound_check() {
    let fonts = FontSet::builtin();
    let mut canvas = Canvas::new(&fonts);
    let mut cursor = PageCursor::new(PageGeometry::A4);
    cursor.advance(2000.0);
    assert!(cursor.y() > PageGeometry::A4.page_height);
    assert_eq!(canvas.page_count(), 1);
    cursor.ensure_space(&mut canvas, 0.0);
    assert_eq!(canvas.page_count(), 2);
}

#[test]
fn converge_takes_deepest_column() {
    let mut cursor = PageCursor::new(PageGeometry::A4);
    cursor.converge(&[120.0, 340.5, 200.0]);
    assert_eq!(cursor.y(), 340.5);
    cursor.converge(&[]);
    assert_eq!(cursor.y(), 340.5);
}

#[test]
fn body_never_crosses_bottom_margin() {
    common::init_logger();
    let cv = common::sample_cv();
    let limit = PageGeometry::A4.bottom_limit();
    for preset in [StylePreset::Classic, StylePreset::Banner] {
        for language in [Language::English, Language::Vietnamese] {
            let mut opts = common::options(language);
            opts.style = preset;
            let rendered =
                render_cv(&cv, &opts, &Catalog::builtin(language)).expect("render");
            assert!(rendered.page_count() > 1);
            for (i, page) in rendered.pages.iter().enumerate() {
                for op in &page.ops {
                    assert!(
                        op.bottom() <= limit + 1e-3,
                        "{preset} {language} page {}: {op:?} below {limit}",
                        i + 1
                    );
                }
            }
        }
    }
}

/// Enough categories that the grid cannot finish on the page it starts on.
fn skill_heavy_cv(categories: usize) -> CvDocument {
    let mut cv = common::sample_cv();
    cv.skills.technical_skills.clear();
    for i in 0..categories {
        let items = (0..5).map(|j| format!("Skill {i}-{j}")).collect();
        cv.skills
            .technical_skills
            .insert(format!("category{i}"), SkillList::Many(items));
    }
    cv
}

#[test]
fn skills_grid_breaks_all_columns_together() {
    let cv = skill_heavy_cv(30);
    let fonts = FontSet::builtin();
    let tr = Catalog::builtin(Language::English);
    for preset in [StylePreset::Classic, StylePreset::Banner] {
        let style = Style::preset(preset);
        let opts = ComposeOptions {
            style: &style,
            translator: &tr,
            geometry: PageGeometry::A4,
            has_avatar: false,
            include_minor_projects: true,
        };
        let canvas = compose_cv(&cv, &fonts, &opts);
        let pages = canvas.pages();
        let page_top = PageGeometry::A4.margin_top + PageCursor::BREAK_OFFSET;

        let first = common::page_of(pages, "Category0").expect("first category drawn");
        let last = common::page_of(pages, "Category29").expect("last category drawn");
        assert!(last > first, "{preset}: grid should span pages");

        // Every continuation page of the grid restarts all columns at the top.
        for page in &pages[first + 1..=last] {
            let label_ys: Vec<f32> = page
                .texts()
                .filter(|t| t.text.starts_with("Category"))
                .map(|t| t.y)
                .collect();
            let top = label_ys.iter().copied().fold(f32::INFINITY, f32::min);
            assert_eq!(top, page_top, "{preset}: continuation page starts mid-page");
            let columns = page
                .texts()
                .filter(|t| t.text.starts_with("Category") && t.y == page_top)
                .count();
            let expected = style.skill_columns.min(label_ys.len());
            assert_eq!(columns, expected, "{preset}: a column started late");
        }
    }
}

#[test]
fn content_after_skills_clears_every_column() {
    let mut cv = skill_heavy_cv(3);
    // Make the first column much deeper than the second.
    let tall = (0..15).map(|j| format!("Tall {j}")).collect();
    cv.skills
        .technical_skills
        .insert("category0".into(), SkillList::Many(tall));

    let fonts = FontSet::builtin();
    let tr = Catalog::builtin(Language::English);
    let style = Style::preset(StylePreset::Classic);
    let opts = ComposeOptions {
        style: &style,
        translator: &tr,
        geometry: PageGeometry::A4,
        has_avatar: false,
        include_minor_projects: true,
    };
    let canvas = compose_cv(&cv, &fonts, &opts);
    let pages = canvas.pages();

    let title_page = common::page_of(pages, "Projects").expect("projects title");
    let title = pages[title_page]
        .texts()
        .find(|t| t.text == "Projects")
        .expect("projects title");
    let deepest_skill = pages[title_page]
        .texts()
        .filter(|t| t.text.starts_with("Tall") || t.text.starts_with("Skill"))
        .map(|t| t.y)
        .fold(f32::NEG_INFINITY, f32::max);
    assert!(
        title.y > deepest_skill,
        "projects title at {} overlaps skills down to {deepest_skill}",
        title.y
    );
}

fn compose_pages(cv: &CvDocument, preset: StylePreset) -> Vec<Page> {
    let fonts = FontSet::builtin();
    let tr = Catalog::builtin(Language::English);
    let style = Style::preset(preset);
    let opts = ComposeOptions {
        style: &style,
        translator: &tr,
        geometry: PageGeometry::A4,
        has_avatar: false,
        include_minor_projects: true,
    };
    compose_cv(cv, &fonts, &opts).into_pages()
}

#[test]
fn section_titles_never_end_a_page() {
    const TITLES: [&str; 4] = ["Education", "Experience", "Technical Skills", "Projects"];
    let base = common::sample_cv();
    let responsibility = base.experience.work_experience[0].responsibilities[0].clone();
    let mut orphans = Vec::new();

    for preset in [StylePreset::Classic, StylePreset::Banner] {
        for extra_education in 0..9 {
            for responsibilities in 0..41 {
                let mut cv = base.clone();
                for k in 0..extra_education {
                    cv.education.education.push(Education {
                        institution: format!("Extra School {k}"),
                        degree: "Certificate".into(),
                        field: "Testing".into(),
                        start_date: "2008".into(),
                        end_date: Some("2009".into()),
                        ..Education::default()
                    });
                }
                cv.experience.work_experience[2].responsibilities =
                    vec![responsibility.clone(); responsibilities];

                for (i, page) in compose_pages(&cv, preset).iter().enumerate() {
                    if let Some(last) = page.texts().last()
                        && TITLES.contains(&last.text.as_str())
                    {
                        orphans.push(format!(
                            "{preset} edu+{extra_education} resp={responsibilities}: \
                             '{}' ends page {}",
                            last.text,
                            i + 1
                        ));
                    }
                }
            }
        }
    }
    assert!(orphans.is_empty(), "{} stranded titles, e.g. {:?}", orphans.len(), orphans.first());
}

#[test]
fn long_skill_items_hang_under_their_text() {
    let mut cv = common::sample_cv();
    cv.skills.technical_skills.clear();
    let long = "Distributed tracing with OpenTelemetry collectors and tail sampling across regions";
    cv.skills.technical_skills.insert(
        "observability".into(),
        SkillList::Many(vec![long.into(), "Grafana".into()]),
    );

    let pages = compose_pages(&cv, StylePreset::Classic);
    let page = common::page_of(&pages, "Observability").expect("skills page");
    let texts: Vec<_> = pages[page].texts().collect();
    let label = texts
        .iter()
        .find(|t| t.text == "Observability")
        .expect("category label");
    let bullets: Vec<_> = texts.iter().filter(|t| t.text == "• " && t.y > label.y).collect();
    assert_eq!(bullets.len(), 2, "one bullet per item, not per line");

    let first = texts
        .iter()
        .find(|t| t.text.starts_with("Distributed"))
        .expect("first line");
    let continuation: Vec<_> = texts
        .iter()
        .filter(|t| t.y > first.y && t.y < bullets[1].y && t.x > label.x)
        .collect();
    assert!(!continuation.is_empty(), "long item should wrap");
    for line in continuation {
        assert_eq!(line.x, first.x, "{:?} starts under the bullet", line.text);
    }
    assert_eq!(bullets[0].x, label.x);
    assert!(first.x > bullets[0].x);
    assert_eq!(bullets[0].y, first.y);
}
