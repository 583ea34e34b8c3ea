use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::i18n::Language;
use crate::style::StylePreset;

/// Where fonts come from for each language.
#[derive(Clone, Debug, Default)]
pub struct FontOptions {
    /// System font family for the default language. `None` uses Helvetica.
    pub latin_family: Option<String>,
    /// Unicode-capable TrueType file for the alternate language.
    pub unicode_font: Option<PathBuf>,
    /// Bold companion of `unicode_font`; the regular face is reused when absent.
    pub unicode_font_bold: Option<PathBuf>,
}

/// Settings for one export call.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub language: Language,
    pub style: StylePreset,
    pub fonts: FontOptions,
    /// Image drawn in the header frame. Load failures are logged, not fatal.
    pub avatar: Option<PathBuf>,
    /// Keep projects flagged `minor`. Projects flagged `excludeFromPdf` are
    /// dropped regardless.
    pub include_minor_projects: bool,
    /// Date embedded in the output filename.
    pub date: NaiveDate,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            style: StylePreset::default(),
            fonts: FontOptions::default(),
            avatar: None,
            include_minor_projects: true,
            date: chrono::Local::now().date_naive(),
        }
    }
}

/// Layout of an assets directory, mirroring the web app's `assets/` tree:
/// `json/`, `i18n/`, `images/avatar.jpeg`, `fonts/Roboto_VN.ttf`.
#[derive(Clone, Debug)]
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub const AVATAR: &'static str = "images/avatar.jpeg";
    pub const UNICODE_FONT: &'static str = "fonts/Roboto_VN.ttf";
    pub const UNICODE_FONT_BOLD: &'static str = "fonts/Roboto_VN-Bold.ttf";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn json_dir(&self) -> PathBuf {
        self.root.join("json")
    }

    pub fn i18n_dir(&self) -> PathBuf {
        self.root.join("i18n")
    }

    /// Options with the conventional avatar and Unicode font locations filled
    /// in. A missing avatar or regular font is reported when the export tries
    /// to load it; the optional bold font is only set when present.
    pub fn default_options(&self) -> ExportOptions {
        let bold = self.root.join(Self::UNICODE_FONT_BOLD);
        ExportOptions {
            avatar: Some(self.root.join(Self::AVATAR)),
            fonts: FontOptions {
                latin_family: None,
                unicode_font: Some(self.root.join(Self::UNICODE_FONT)),
                unicode_font_bold: bold.is_file().then_some(bold),
            },
            ..ExportOptions::default()
        }
    }
}
