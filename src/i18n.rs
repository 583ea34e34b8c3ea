use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::Error;

/// Display language of the exported CV.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Language {
    #[default]
    #[cfg_attr(feature = "cli", value(name = "en"))]
    English,
    #[cfg_attr(feature = "cli", value(name = "vi"))]
    Vietnamese,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Vietnamese => "vi",
        }
    }

    /// Suffix inserted before `.json` in localized asset names (`skills.vi.json`).
    pub fn asset_suffix(self) -> &'static str {
        match self {
            Language::English => "",
            Language::Vietnamese => ".vi",
        }
    }

    /// Picks the language from a locale tag such as `vi_VN.UTF-8`; anything
    /// that is not Vietnamese is English.
    pub fn from_locale(tag: &str) -> Self {
        if tag.to_ascii_lowercase().starts_with("vi") {
            Language::Vietnamese
        } else {
            Language::English
        }
    }

    /// Language from `LANG`/`LC_ALL`, English when neither is set.
    pub fn detect() -> Self {
        ["LC_ALL", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|v| !v.is_empty())
            .map(|v| Language::from_locale(&v))
            .unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "vi" | "vietnamese" => Ok(Language::Vietnamese),
            other => Err(Error::Config(format!("unsupported language: {other}"))),
        }
    }
}

/// String lookup for section headings and field labels.
pub trait Translate {
    /// Returns the translation for `key`, or `key` itself when unknown.
    fn translate(&self, key: &str) -> String;

    /// Translates `key` and substitutes `{{name}}` placeholders.
    fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut out = self.translate(key);
        for (name, value) in args {
            out = out.replace(&format!("{{{{{name}}}}}"), value);
        }
        out
    }
}

pub mod keys {
    pub const EDUCATION: &str = "Education";
    pub const EXPERIENCE: &str = "Experience";
    pub const TECHNICAL_SKILLS: &str = "Technical Skills";
    pub const PROJECTS: &str = "Projects";
    pub const TECHNOLOGIES: &str = "Technologies";
    pub const ENVIRONMENT: &str = "Environment";
    pub const ROLE: &str = "Role";
    pub const PRESENT: &str = "Present";
    pub const LINKEDIN: &str = "LinkedIn";
    pub const DEGREE_IN_FIELD: &str = "DegreeInField";
    pub const PAGE_FOOTER: &str = "PdfPageFooter";
    pub const ADDITIONAL_PROJECTS: &str = "PdfAdditionalProjects";
}

const ENGLISH_DEFAULTS: &[(&str, &str)] = &[
    (keys::EDUCATION, "Education"),
    (keys::EXPERIENCE, "Experience"),
    (keys::TECHNICAL_SKILLS, "Technical Skills"),
    (keys::PROJECTS, "Projects"),
    (keys::TECHNOLOGIES, "Technologies"),
    (keys::ENVIRONMENT, "Environment"),
    (keys::ROLE, "Role"),
    (keys::PRESENT, "Present"),
    (keys::LINKEDIN, "LinkedIn"),
    (keys::DEGREE_IN_FIELD, "{{degree}} in {{field}}"),
    (keys::PAGE_FOOTER, "Page {{page}} of {{total}}"),
    (keys::ADDITIONAL_PROJECTS, "There are additional projects not shown here."),
];

const VIETNAMESE_DEFAULTS: &[(&str, &str)] = &[
    (keys::EDUCATION, "Học vấn"),
    (keys::EXPERIENCE, "Kinh nghiệm"),
    (keys::TECHNICAL_SKILLS, "Kỹ năng kỹ thuật"),
    (keys::PROJECTS, "Dự án"),
    (keys::TECHNOLOGIES, "Công nghệ"),
    (keys::ENVIRONMENT, "Môi trường"),
    (keys::ROLE, "Vai trò"),
    (keys::PRESENT, "Hiện tại"),
    (keys::DEGREE_IN_FIELD, "{{degree}} ngành {{field}}"),
    (keys::PAGE_FOOTER, "Trang {{page}} / {{total}}"),
    (keys::ADDITIONAL_PROJECTS, "Còn nhiều dự án khác không được liệt kê ở đây."),
    ("Mr.", "Ông"),
    ("Ms.", "Bà"),
];

/// Translation table for one language. Lookup order: loaded entries, the
/// built-in table for the language, the English built-ins, the key.
#[derive(Clone, Debug)]
pub struct Catalog {
    language: Language,
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn builtin(language: Language) -> Self {
        Self {
            language,
            entries: HashMap::new(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Loads `<dir>/<code>.json`, a flat `{ "key": "text" }` map. Nested
    /// objects are flattened with dotted keys.
    pub fn load(dir: &Path, language: Language) -> Result<Self, Error> {
        let path = dir.join(format!("{}.json", language.code()));
        let text = std::fs::read_to_string(&path)?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|source| Error::Json {
                path: path.clone(),
                source,
            })?;
        let mut entries = HashMap::new();
        flatten("", &value, &mut entries);
        log::debug!("Loaded {} translations from {}", entries.len(), path.display());
        Ok(Self { language, entries })
    }

    /// Like [`Catalog::load`], but a missing or broken file only costs the
    /// custom entries.
    pub fn load_or_builtin(dir: &Path, language: Language) -> Self {
        Self::load(dir, language).unwrap_or_else(|e| {
            log::warn!("Translations for {language} unavailable ({e}), using built-in labels");
            Self::builtin(language)
        })
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    fn builtin_table(&self) -> &'static [(&'static str, &'static str)] {
        match self.language {
            Language::English => ENGLISH_DEFAULTS,
            Language::Vietnamese => VIETNAMESE_DEFAULTS,
        }
    }
}

fn flatten(prefix: &str, value: &serde_json::Value, out: &mut HashMap<String, String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten(&key, v, out);
            }
        }
        serde_json::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        _ => {}
    }
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

impl Translate for Catalog {
    fn translate(&self, key: &str) -> String {
        if let Some(v) = self.entries.get(key) {
            return v.clone();
        }
        lookup(self.builtin_table(), key)
            .or_else(|| lookup(ENGLISH_DEFAULTS, key))
            .unwrap_or(key)
            .to_string()
    }
}
