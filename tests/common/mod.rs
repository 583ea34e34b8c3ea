#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use folio_pdf::i18n::Language;
use folio_pdf::model::CvDocument;
use folio_pdf::{ExportOptions, Page, TextItem};
use serde_json::{Value, json};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Scratch directory: tests/output/<name>/, emptied first.
pub fn output_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("tests/output").join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create output dir");
    dir
}

pub fn fixed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).expect("valid date")
}

/// Built-in fonts, no avatar, fixed date: output depends only on the CV.
pub fn options(language: Language) -> ExportOptions {
    ExportOptions {
        language,
        date: fixed_date(),
        ..ExportOptions::default()
    }
}

const RESPONSIBILITY: &str = "Designed and maintained the event ingestion pipeline that \
    processes several million records per day, coordinating schema changes with three \
    downstream teams and keeping end-to-end latency under two seconds at peak load";

pub fn personal_info_json() -> Value {
    json!({
        "prefix": "Mr.",
        "name": "Nguyen Van An",
        "title": "Senior Software Engineer",
        "dateOfBirth": "1990-01-01",
        "location": { "address": "12 Le Loi", "district": "District 1", "city": "Ho Chi Minh City", "country": "Vietnam" },
        "contact": {
            "phone": "+84 123 456 789",
            "email": "an.nguyen@example.com",
            "linkedin": "https://www.linkedin.com/in/an-nguyen",
            "github": "https://github.com/an-nguyen"
        },
        "languages": [{ "name": "English", "level": "Fluent" }],
        "summary": "Backend engineer with ten years of experience building data-heavy services. \
            Comfortable across the stack, from database tuning to API design, with a focus on \
            reliability and clear operational ownership.",
        "professionalHighlights": [],
        "interests": ["Running"],
        "availability": { "status": "Open", "workType": "Full-time", "workLocation": "Remote" }
    })
}

pub fn experience_json() -> Value {
    json!({
        "workExperience": [
            {
                "company": "Acme Data",
                "position": "Lead Engineer",
                "startDate": "Jan 2022",
                "current": true,
                "location": "Remote",
                "type": "Full-time",
                "description": "",
                "responsibilities": vec![RESPONSIBILITY; 10],
                "achievements": []
            },
            {
                "company": "Globex",
                "position": "Software Engineer",
                "startDate": "Mar 2019",
                "endDate": "Dec 2021",
                "current": false,
                "location": "Hanoi",
                "type": "Full-time",
                "description": "",
                "responsibilities": ["Built billing integrations.", "Ran the on-call rotation."],
                "achievements": []
            },
            {
                "company": "Initech",
                "position": "Junior Developer",
                "startDate": "Jun 2016",
                "endDate": "Feb 2019",
                "location": "Da Nang",
                "type": "Full-time",
                "description": "",
                "responsibilities": ["Maintained internal reporting tools."],
                "achievements": []
            }
        ]
    })
}

pub fn education_json() -> Value {
    json!({
        "education": [
            {
                "institution": "University of Science",
                "degree": "Master",
                "field": "Computer Science",
                "startDate": "2014",
                "endDate": "2016"
            },
            {
                "institution": "Polytechnic University",
                "degree": "Bachelor",
                "field": "Software Engineering",
                "startDate": "2010",
                "endDate": "2014"
            }
        ]
    })
}

pub fn skills_json() -> Value {
    json!({
        "technicalSkills": {
            "programmingLanguages": ["Rust", "Go", "TypeScript", "Python", "SQL"],
            "backendFrameworks": ["Axum", "Actix", "Gin", "NestJS", "FastAPI"],
            "databases": ["PostgreSQL", "Redis", "ClickHouse", "MongoDB", "SQLite"],
            "devOpsTools": ["Docker", "Kubernetes", "Terraform", "GitHub Actions", "Grafana"]
        },
        "softSkills": ["Mentoring"],
        "languages": { "english": "Fluent" },
        "certifications": []
    })
}

pub fn projects_json() -> Value {
    let project = |name: &str, exclude: bool| {
        json!({
            "name": name,
            "duration": "2023",
            "description": "Internal platform used by several product teams to ship features faster.",
            "technologies": ["Rust", "PostgreSQL", "Kafka"],
            "environment": ["Linux", "AWS"],
            "role": "Tech lead",
            "links": [],
            "achievements": [],
            "responsibilities": [],
            "excludeFromPdf": exclude
        })
    };
    json!({
        "projects": [
            project("Project One", false),
            project("Project Two", false),
            project("Secret Project", true),
            project("Project Four", false),
            project("Project Five", false)
        ]
    })
}

pub fn cv_json() -> Value {
    json!({
        "personalInfo": personal_info_json(),
        "experience": experience_json(),
        "education": education_json(),
        "skills": skills_json(),
        "projects": projects_json()
    })
}

/// Two education entries, three jobs (one with ten long responsibilities),
/// four skill categories of five, five projects with one excluded.
pub fn sample_cv() -> CvDocument {
    serde_json::from_value(cv_json()).expect("sample CV deserializes")
}

/// Writes the five per-section JSON files into `dir` with the language's
/// suffix (`skills.vi.json`).
pub fn write_cv_files(dir: &Path, language: Language, name: &str) {
    fs::create_dir_all(dir).expect("create json dir");
    let suffix = language.asset_suffix();
    let mut info = personal_info_json();
    info["name"] = json!(name);
    let files = [
        ("personal-info", info),
        ("experience", experience_json()),
        ("education", education_json()),
        ("skills", skills_json()),
        ("projects", projects_json()),
    ];
    for (stem, value) in files {
        let path = dir.join(format!("{stem}{suffix}.json"));
        fs::write(&path, serde_json::to_string_pretty(&value).expect("serialize")).expect("write json");
    }
}

pub fn body_texts(page: &Page) -> Vec<&str> {
    page.texts().map(|t| t.text.as_str()).collect()
}

/// Every body text on every page, in drawing order.
pub fn all_texts(pages: &[Page]) -> Vec<String> {
    pages
        .iter()
        .flat_map(|p| p.texts().map(|t| t.text.clone()))
        .collect()
}

/// Index of the first page whose body contains `needle` verbatim.
pub fn page_of(pages: &[Page], needle: &str) -> Option<usize> {
    pages.iter().position(|p| p.texts().any(|t| t.text == needle))
}

pub fn find_text<'a>(pages: &'a [Page], needle: &str) -> Option<&'a TextItem> {
    pages.iter().flat_map(|p| p.texts()).find(|t| t.text == needle)
}
