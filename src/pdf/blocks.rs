use crate::model::{CvDocument, Education, PersonalInfo, Project, WorkExperience};

/// One skills cell: a display label and its items.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillCategory<'a> {
    pub key: &'a str,
    pub label: String,
    pub items: &'a [String],
}

/// A printable unit of the CV, in the order it appears on paper.
#[derive(Clone, Debug)]
pub enum SectionBlock<'a> {
    Header(&'a PersonalInfo),
    Summary(&'a str),
    Education(&'a [Education]),
    Experience(&'a [WorkExperience]),
    Skills(Vec<SkillCategory<'a>>),
    Projects(Vec<&'a Project>),
}

impl SectionBlock<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            SectionBlock::Header(_) => "header",
            SectionBlock::Summary(_) => "summary",
            SectionBlock::Education(_) => "education",
            SectionBlock::Experience(_) => "experience",
            SectionBlock::Skills(_) => "skills",
            SectionBlock::Projects(_) => "projects",
        }
    }
}

/// "backendFrameworks" → "Backend Frameworks". Splits before every capital.
pub fn format_category(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in key.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Projects that go on paper: `excludeFromPdf` entries are always dropped,
/// `minor` ones on request; the rest are listed newest first, i.e. reversed
/// from source order.
pub fn printable_projects(projects: &[Project], include_minor: bool) -> Vec<&Project> {
    projects
        .iter()
        .filter(|p| !p.exclude_from_pdf)
        .filter(|p| include_minor || !p.minor)
        .rev()
        .collect()
}

/// Flattens the CV into its printable blocks in fixed order: header,
/// summary, education, experience, skills, projects. Summary is omitted
/// when empty; every other section is always present.
pub fn printable_sections(cv: &CvDocument, include_minor: bool) -> Vec<SectionBlock<'_>> {
    let mut blocks = vec![SectionBlock::Header(&cv.personal_info)];

    let summary = cv.personal_info.summary.trim();
    if !summary.is_empty() {
        blocks.push(SectionBlock::Summary(summary));
    }

    blocks.push(SectionBlock::Education(&cv.education.education));
    blocks.push(SectionBlock::Experience(&cv.experience.work_experience));

    let skills = cv
        .skills
        .technical_skills
        .iter()
        .map(|(key, list)| SkillCategory {
            key,
            label: format_category(key),
            items: list.items(),
        })
        .collect();
    blocks.push(SectionBlock::Skills(skills));

    blocks.push(SectionBlock::Projects(printable_projects(
        &cv.projects.projects,
        include_minor,
    )));
    blocks
}
