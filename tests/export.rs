mod common;

use folio_pdf::i18n::{Catalog, Language, Translate};
use folio_pdf::style::StylePreset;
use folio_pdf::{Error, PageGeometry, export_cv, output_filename, render_cv};
use rayon::prelude::*;

fn english() -> Catalog {
    Catalog::builtin(Language::English)
}

#[test]
fn end_to_end_scenario() {
    common::init_logger();
    let cv = common::sample_cv();
    let rendered = render_cv(&cv, &common::options(Language::English), &english()).expect("render");

    assert!(rendered.page_count() >= 2, "got {} pages", rendered.page_count());
    assert!(rendered.bytes.starts_with(b"%PDF"));
    let count = format!("/Count {}", rendered.page_count());
    assert!(
        rendered.bytes.windows(count.len()).any(|w| w == count.as_bytes()),
        "page tree should say {count}"
    );
    assert_eq!(rendered.font_family, "Helvetica");

    let texts = common::all_texts(&rendered.pages);
    assert!(!texts.iter().any(|t| t.contains("Secret Project")));

    let order: Vec<&str> = texts
        .iter()
        .map(String::as_str)
        .filter(|t| t.starts_with("Project "))
        .collect();
    assert_eq!(order, ["Project Five", "Project Four", "Project Two", "Project One"]);

    for label in ["Education", "Experience", "Technical Skills", "Projects"] {
        assert!(texts.iter().any(|t| t == label), "missing section {label}");
    }
    assert!(texts.iter().any(|t| t == "There are additional projects not shown here."));
    assert!(texts.iter().any(|t| t == "Master in Computer Science"));
    assert!(texts.iter().any(|t| t == "Mr. Nguyen Van An"));
}

#[test]
fn long_experience_entry_crosses_a_page() {
    let cv = common::sample_cv();
    let rendered = render_cv(&cv, &common::options(Language::English), &english()).expect("render");
    let pages = &rendered.pages;

    let company_page = common::page_of(pages, "Acme Data").expect("company drawn");
    let next_company = common::page_of(pages, "Globex").expect("next company drawn");
    assert!(
        next_company > company_page,
        "ten responsibilities should push the next entry onto a later page"
    );

    // Bullets for the long entry appear on both sides of the break.
    let bullets_on = |i: usize| pages[i].texts().filter(|t| t.text == "•").count();
    assert!(bullets_on(company_page) > 0);
    assert!(bullets_on(company_page + 1) > 0);
    assert!((company_page..=next_company).map(bullets_on).sum::<usize>() >= 10);
}

#[test]
fn durations_render_present_or_literal_end() {
    let cv = common::sample_cv();
    let rendered = render_cv(&cv, &common::options(Language::English), &english()).expect("render");
    let texts = common::all_texts(&rendered.pages);
    assert!(texts.iter().any(|t| t == "Jan 2022 - Present"));
    assert!(texts.iter().any(|t| t == "Mar 2019 - Dec 2021"));
    assert!(texts.iter().any(|t| t == "2014 - 2016"));

    let vi = Catalog::builtin(Language::Vietnamese);
    let rendered = render_cv(&cv, &common::options(Language::Vietnamese), &vi).expect("render");
    let texts = common::all_texts(&rendered.pages);
    assert!(texts.iter().any(|t| t == "Jan 2022 - Hiện tại"));
}

#[test]
fn open_ended_entry_is_rejected_before_drawing() {
    let mut cv = common::sample_cv();
    cv.experience.work_experience[1].end_date = None;
    cv.experience.work_experience[1].current = false;

    let out = common::output_dir("export_invalid");
    let err = export_cv(&cv, &common::options(Language::English), &english(), &out).unwrap_err();
    assert!(matches!(err, Error::InvalidCv(_)), "got {err:?}");
    let written = std::fs::read_dir(&out).expect("read output dir").count();
    assert_eq!(written, 0, "nothing may be written for invalid data");
}

#[test]
fn every_page_gets_a_centred_footer() {
    let cv = common::sample_cv();
    let g = PageGeometry::A4;
    for preset in [StylePreset::Classic, StylePreset::Banner] {
        let mut opts = common::options(Language::English);
        opts.style = preset;
        let rendered = render_cv(&cv, &opts, &english()).expect("render");
        let n = rendered.page_count();
        for (i, page) in rendered.pages.iter().enumerate() {
            let stamps: Vec<_> = page.stamp_texts().collect();
            assert_eq!(stamps.len(), 1, "{preset} page {}", i + 1);
            let footer = stamps[0];
            assert_eq!(footer.text, format!("Page {} of {n}", i + 1));
            assert!((footer.x + footer.width / 2.0 - g.page_width / 2.0).abs() < 1e-3);
            assert!((footer.y - (g.page_height - 20.0)).abs() < 1e-3);
            assert_eq!(footer.size, 10.0);
            assert!(!page.texts().any(|t| t.text.starts_with("Page ")));
        }
    }
}

#[test]
fn repeated_exports_are_identical() {
    let cv = common::sample_cv();
    let opts = common::options(Language::English);
    let first = render_cv(&cv, &opts, &english()).expect("render");
    let second = render_cv(&cv, &opts, &english()).expect("render");
    assert_eq!(first.page_count(), second.page_count());
    assert_eq!(first.pages, second.pages);
    assert_eq!(common::all_texts(&first.pages), common::all_texts(&second.pages));
}

#[test]
fn parallel_exports_do_not_interfere() {
    let cv = common::sample_cv();
    let jobs: Vec<(StylePreset, Language)> = [StylePreset::Classic, StylePreset::Banner]
        .into_iter()
        .flat_map(|s| [Language::English, Language::Vietnamese].map(|l| (s, l)))
        .collect();

    let render = |(style, language): (StylePreset, Language)| {
        let mut opts = common::options(language);
        opts.style = style;
        let rendered = render_cv(&cv, &opts, &Catalog::builtin(language)).expect("render");
        common::all_texts(&rendered.pages)
    };

    let sequential: Vec<Vec<String>> = jobs.iter().copied().map(render).collect();
    let parallel: Vec<Vec<String>> = (0..4)
        .into_par_iter()
        .flat_map(|_| jobs.par_iter().copied().map(render).collect::<Vec<_>>())
        .collect();

    for (i, texts) in parallel.iter().enumerate() {
        assert_eq!(texts, &sequential[i % jobs.len()]);
    }
}

#[test]
fn contact_overflow_moves_remaining_segments_to_second_line() {
    let mut cv = common::sample_cv();
    cv.personal_info.contact.email =
        "averyveryverylongemailaddressforthetest@example-company.com".into();
    let rendered = render_cv(&cv, &common::options(Language::English), &english()).expect("render");
    let pages = &rendered.pages;

    let dob = common::find_text(pages, "1990-01-01").expect("dob");
    let phone = common::find_text(pages, "+84 123 456 789").expect("phone");
    let email = common::find_text(pages, &cv.personal_info.contact.email).expect("email");
    let linkedin = common::find_text(pages, "LinkedIn").expect("linkedin");

    assert_eq!(dob.y, phone.y);
    assert!(email.y > dob.y, "overflowing email starts line two");
    assert_eq!(linkedin.y, email.y, "segments after the overflow stay on line two");

    let links: Vec<&str> = pages[0].links().collect();
    assert!(links.contains(&format!("mailto:{}", cv.personal_info.contact.email).as_str()));
    assert!(links.contains(&"https://www.linkedin.com/in/an-nguyen"));
}

#[test]
fn short_contact_details_stay_on_one_line() {
    let cv = common::sample_cv();
    let rendered = render_cv(&cv, &common::options(Language::English), &english()).expect("render");
    let pages = &rendered.pages;
    let dob = common::find_text(pages, "1990-01-01").expect("dob");
    let linkedin = common::find_text(pages, "LinkedIn").expect("linkedin");
    assert_eq!(dob.y, linkedin.y);
    assert!(linkedin.x > dob.x);
}

#[test]
fn missing_unicode_font_falls_back_to_helvetica() {
    common::init_logger();
    let cv = common::sample_cv();
    let mut opts = common::options(Language::Vietnamese);
    opts.fonts.unicode_font = Some("/nonexistent/Roboto_VN.ttf".into());
    let vi = Catalog::builtin(Language::Vietnamese);
    let rendered = render_cv(&cv, &opts, &vi).expect("font trouble is not fatal");

    assert_eq!(rendered.font_family, "Helvetica");
    let texts = common::all_texts(&rendered.pages);
    assert!(texts.iter().any(|t| t == "Học vấn"));
    assert!(texts.iter().any(|t| t == "Ông Nguyen Van An"));
    let footer = rendered.pages[0].stamp_texts().next().expect("footer");
    assert_eq!(footer.text, format!("Trang 1 / {}", rendered.page_count()));
}

#[test]
fn missing_avatar_is_tolerated() {
    let cv = common::sample_cv();
    let mut opts = common::options(Language::English);
    opts.avatar = Some("/nonexistent/avatar.jpeg".into());
    let rendered = render_cv(&cv, &opts, &english()).expect("avatar trouble is not fatal");
    assert!(!rendered.pages[0].has_image());
}

#[test]
fn png_avatar_is_embedded() {
    let out = common::output_dir("export_avatar");
    let avatar = out.join("avatar.png");
    image::RgbaImage::from_pixel(16, 16, image::Rgba([200, 120, 40, 128]))
        .save(&avatar)
        .expect("write avatar");

    let cv = common::sample_cv();
    let mut opts = common::options(Language::English);
    opts.avatar = Some(avatar);
    let rendered = render_cv(&cv, &opts, &english()).expect("render");
    assert!(rendered.pages[0].has_image());
    assert!(rendered.bytes.windows(4).any(|w| w == b"/Im1"));
    assert!(rendered.bytes.windows(6).any(|w| w == b"/SMask"));
}

#[test]
fn durations_follow_the_preset() {
    let cv = common::sample_cv();
    let g = PageGeometry::A4;

    let classic = render_cv(&cv, &common::options(Language::English), &english()).expect("render");
    let duration = common::find_text(&classic.pages, "2014 - 2016").expect("duration");
    assert!((duration.x + duration.width - g.right_edge()).abs() < 1e-3);

    let mut opts = common::options(Language::English);
    opts.style = StylePreset::Banner;
    let banner = render_cv(&cv, &opts, &english()).expect("render");
    let institution = common::find_text(&banner.pages, "University of Science").expect("institution");
    let duration = common::find_text(&banner.pages, "2014 - 2016").expect("duration");
    assert_eq!(duration.y, institution.y);
    assert!((duration.x - (institution.x + institution.width + 8.0)).abs() < 1e-3);
}

#[test]
fn skill_columns_follow_the_preset() {
    let cv = common::sample_cv();
    for (preset, columns) in [(StylePreset::Classic, 2), (StylePreset::Banner, 3)] {
        let mut opts = common::options(Language::English);
        opts.style = preset;
        let rendered = render_cv(&cv, &opts, &english()).expect("render");
        let labels = ["Programming Languages", "Backend Frameworks", "Databases", "Dev Ops Tools"];
        let mut xs: Vec<f32> = labels
            .iter()
            .map(|l| common::find_text(&rendered.pages, l).expect("label").x)
            .collect();
        xs.sort_by(f32::total_cmp);
        xs.dedup();
        assert_eq!(xs.len(), columns, "{preset}");
    }
}

#[test]
fn translations_override_labels() {
    let cv = common::sample_cv();
    let mut catalog = english();
    catalog.insert("Education", "Studies");
    catalog.insert("PdfPageFooter", "{{page}}/{{total}}");
    assert_eq!(catalog.translate("Education"), "Studies");

    let rendered = render_cv(&cv, &common::options(Language::English), &catalog).expect("render");
    let texts = common::all_texts(&rendered.pages);
    assert!(texts.iter().any(|t| t == "Studies"));
    assert!(!texts.iter().any(|t| t == "Education"));
    let footer = rendered.pages[0].stamp_texts().next().expect("footer");
    assert_eq!(footer.text, format!("1/{}", rendered.page_count()));
}

#[test]
fn export_writes_dated_file() {
    let cv = common::sample_cv();
    let out = common::output_dir("export_file");
    let path = export_cv(&cv, &common::options(Language::English), &english(), &out).expect("export");
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("CV_Nguyen_Van_An_2024-05-17.pdf")
    );
    let bytes = std::fs::read(&path).expect("read back");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn filename_collapses_whitespace() {
    let date = common::fixed_date();
    assert_eq!(output_filename("Nguyen  Van\tAn", date), "CV_Nguyen_Van_An_2024-05-17.pdf");
    assert_eq!(output_filename("Jane", date), "CV_Jane_2024-05-17.pdf");
}
