use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub address: String,
    pub district: String,
    pub city: String,
    pub country: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub linkedin: String,
    pub github: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpokenLanguage {
    pub name: String,
    pub level: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Availability {
    pub status: String,
    pub work_type: String,     // Full-time | Part-time | Contract
    pub work_location: String, // Remote | Hybrid | Onsite
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub prefix: Option<String>,
    pub name: String,
    pub title: String,
    pub date_of_birth: Option<String>,
    pub location: Option<Location>,
    pub contact: Contact,
    pub languages: Vec<SpokenLanguage>,
    pub summary: String,
    pub short_summary: Option<String>,
    pub professional_highlights: Vec<String>,
    pub interests: Vec<String>,
    pub availability: Option<Availability>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInfo {
    pub description: String,
    pub address: String,
    pub website: String,
    pub contact: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub current: bool,
    pub location: String,
    #[serde(rename = "type")]
    pub employment_type: String,
    pub description: String,
    pub responsibilities: Vec<String>,
    pub achievements: Vec<String>,
    pub company_info: Option<CompanyInfo>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub current: bool,
    pub description: Option<String>,
}

/// A category value in `technicalSkills`: normally a list, but a bare string
/// is accepted as a single skill.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillList {
    Many(Vec<String>),
    One(String),
}

impl SkillList {
    pub fn items(&self) -> &[String] {
        match self {
            SkillList::Many(v) => v,
            SkillList::One(s) => std::slice::from_ref(s),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub expires: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skills {
    /// Category → skills, in source order.
    pub technical_skills: IndexMap<String, SkillList>,
    pub soft_skills: Vec<String>,
    pub languages: IndexMap<String, String>,
    pub certifications: Vec<Certification>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Active,
    Completed,
    Maintenance,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectLink {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub label: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub name: String,
    pub company: Option<String>,
    pub duration: String,
    pub description: String,
    pub scope: Option<String>,
    pub technologies: Vec<String>,
    pub environment: Vec<String>,
    pub role: String,
    pub status: Option<ProjectStatus>,
    pub team_size: Option<u32>,
    pub links: Vec<ProjectLink>,
    pub achievements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub minor: bool,
    pub exclude_from_pdf: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceSection {
    pub work_experience: Vec<WorkExperience>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationSection {
    pub education: Vec<Education>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectsSection {
    pub projects: Vec<Project>,
}

/// The whole CV as loaded for one language. Each field mirrors one JSON asset.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvDocument {
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub experience: ExperienceSection,
    #[serde(default)]
    pub education: EducationSection,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub projects: ProjectsSection,
}

/// Renders "<start> - <end>", with `present` standing in for an open end.
/// An explicit end date wins over the `current` flag.
fn tenure(start: &str, end: Option<&str>, current: bool, present: &str) -> Option<String> {
    match end.map(str::trim).filter(|e| !e.is_empty()) {
        Some(end) => Some(format!("{start} - {end}")),
        None if current => Some(format!("{start} - {present}")),
        None => None,
    }
}

impl WorkExperience {
    pub fn duration_label(&self, present: &str) -> Option<String> {
        tenure(&self.start_date, self.end_date.as_deref(), self.current, present)
    }
}

impl Education {
    pub fn duration_label(&self, present: &str) -> Option<String> {
        tenure(&self.start_date, self.end_date.as_deref(), self.current, present)
    }
}

impl CvDocument {
    /// Checks the invariants layout relies on. Runs before any drawing.
    pub fn validate(&self) -> Result<(), Error> {
        if self.personal_info.name.trim().is_empty() {
            return Err(Error::InvalidCv("personal info has no name".into()));
        }
        for exp in &self.experience.work_experience {
            if exp.duration_label("").is_none() {
                return Err(Error::InvalidCv(format!(
                    "experience at {} has neither an end date nor current=true",
                    exp.company
                )));
            }
        }
        for edu in &self.education.education {
            if edu.duration_label("").is_none() {
                return Err(Error::InvalidCv(format!(
                    "education at {} has neither an end date nor current=true",
                    edu.institution
                )));
            }
        }
        Ok(())
    }
}
