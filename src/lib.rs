mod assets;
pub mod config;
mod data;
mod error;
mod fonts;
pub mod i18n;
pub mod model;
mod pdf;
pub mod style;

pub use assets::{AvatarImage, ImageFormat, load_avatar};
pub use config::{AssetDir, ExportOptions, FontOptions};
pub use data::{load_cv, load_cv_file};
pub use error::Error;
pub use fonts::{FontEntry, FontSet, Weight};
pub use pdf::blocks::{SectionBlock, SkillCategory, format_category, printable_projects, printable_sections};
pub use pdf::canvas::{Align, Canvas, DrawOp, Page, RectPaint, TextItem, TextStyle};
pub use pdf::cursor::{PageCursor, PageGeometry};
pub use pdf::layout::{LineSpacing, LineWrapper, line_height, wrap_text};
pub use pdf::sections::{ComposeOptions, compose_cv};
pub use pdf::{DocumentInfo, output_filename, stamp_page_numbers};

use std::path::{Path, PathBuf};
use std::time::Instant;

use i18n::{Catalog, Translate};
use model::CvDocument;
use style::Style;

/// A finished export: the PDF bytes plus the laid-out pages they were
/// serialised from.
#[derive(Clone, Debug)]
pub struct RenderedCv {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub pages: Vec<Page>,
    /// Family of the regular face the text was measured and drawn with.
    pub font_family: String,
}

impl RenderedCv {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lays out and serialises a CV. Invalid data is rejected before any
/// drawing; font and avatar trouble is logged and worked around.
pub fn render_cv(cv: &CvDocument, options: &ExportOptions, tr: &dyn Translate) -> Result<RenderedCv, Error> {
    let t0 = Instant::now();

    cv.validate()?;
    let fonts = FontSet::select(options.language, &options.fonts);
    let t_fonts = t0.elapsed();

    let avatar = load_avatar(options.avatar.as_deref());
    let t_assets = t0.elapsed();

    let style = Style::preset(options.style);
    let geometry = PageGeometry::A4;
    let compose = ComposeOptions {
        style: &style,
        translator: tr,
        geometry,
        has_avatar: avatar.is_some(),
        include_minor_projects: options.include_minor_projects,
    };
    let mut canvas = compose_cv(cv, &fonts, &compose);
    stamp_page_numbers(&mut canvas, tr, &geometry, style.palette.subtext);
    let pages = canvas.into_pages();
    let t_layout = t0.elapsed();

    let info = DocumentInfo::for_cv(&cv.personal_info.name);
    let bytes = pdf::render(&pages, &fonts, avatar.as_ref(), &geometry, &info)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: fonts={:.1}ms, assets={:.1}ms, layout={:.1}ms, render={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_assets - t_fonts).as_secs_f64() * 1000.0,
        (t_layout - t_assets).as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        pages.len(),
        bytes.len(),
    );

    Ok(RenderedCv {
        filename: output_filename(&cv.personal_info.name, options.date),
        bytes,
        pages,
        font_family: fonts.family().to_string(),
    })
}

/// Renders `cv` and writes it into `out_dir` under its dated filename.
/// Nothing is written unless rendering succeeds.
pub fn export_cv(
    cv: &CvDocument,
    options: &ExportOptions,
    tr: &dyn Translate,
    out_dir: &Path,
) -> Result<PathBuf, Error> {
    let rendered = render_cv(cv, options, tr)?;
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(&rendered.filename);
    std::fs::write(&path, &rendered.bytes).map_err(Error::Io)?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}

/// Loads CV data and translations from an assets directory, then exports.
pub fn export_assets(assets: &AssetDir, options: &ExportOptions, out_dir: &Path) -> Result<PathBuf, Error> {
    let cv = load_cv(&assets.json_dir(), options.language)?;
    let catalog = Catalog::load_or_builtin(&assets.i18n_dir(), options.language);
    export_cv(&cv, options, &catalog, out_dir)
}
