use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::i18n::Language;
use crate::model::CvDocument;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
    })?;
    serde_json::from_str(&text).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// One language's CV: a combined `cv<suffix>.json` if present, otherwise the
/// five per-section files.
fn load_language(dir: &Path, language: Language) -> Result<CvDocument, Error> {
    let suffix = language.asset_suffix();
    let combined = dir.join(format!("cv{suffix}.json"));
    if combined.is_file() {
        return read_json(&combined);
    }
    let file = |name: &str| dir.join(format!("{name}{suffix}.json"));
    Ok(CvDocument {
        personal_info: read_json(&file("personal-info"))?,
        experience: read_json(&file("experience"))?,
        education: read_json(&file("education"))?,
        skills: read_json(&file("skills"))?,
        projects: read_json(&file("projects"))?,
    })
}

/// Loads the CV for `language` from a directory of JSON assets. A broken or
/// incomplete Vietnamese set falls back to English; when nothing loads the
/// result is [`Error::DataUnavailable`].
pub fn load_cv(dir: &Path, language: Language) -> Result<CvDocument, Error> {
    let t0 = std::time::Instant::now();
    let result = match load_language(dir, language) {
        Ok(cv) => Ok(cv),
        Err(e) if language != Language::English => {
            log::error!("Error loading {language} CV: {e}; falling back to English");
            load_language(dir, Language::English)
        }
        Err(e) => Err(e),
    };
    let cv = result.map_err(|e| {
        log::error!("Error loading CV from {}: {e}", dir.display());
        Error::DataUnavailable(e.to_string())
    })?;
    log::info!(
        "Loaded CV for {language} from {} in {:.1}ms",
        dir.display(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    Ok(cv)
}

/// Loads a single combined CV file.
pub fn load_cv_file(path: &Path) -> Result<CvDocument, Error> {
    read_json(path).map_err(|e| Error::DataUnavailable(e.to_string()))
}
