pub mod blocks;
pub mod canvas;
pub mod cursor;
mod finalize;
mod flow;
pub mod layout;
pub mod sections;

use std::collections::BTreeSet;

use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::assets::{AvatarImage, ImageFormat};
use crate::error::Error;
use crate::fonts::{EmbeddedFont, FontSet, Weight, register_font};
use crate::style::Rgb;

use canvas::{DrawOp, Page};
use cursor::PageGeometry;

pub use finalize::{output_filename, stamp_page_numbers};

const AVATAR_XOBJECT: &str = "Im1";

/// Fields of the document information dictionary.
#[derive(Clone, Debug)]
pub struct DocumentInfo {
    pub title: String,
    pub subject: String,
    pub author: String,
    pub keywords: String,
    pub creator: String,
}

impl DocumentInfo {
    pub fn for_cv(author: &str) -> Self {
        Self {
            title: "CV".into(),
            subject: "Curriculum Vitae".into(),
            author: author.to_string(),
            keywords: "CV, Resume".into(),
            creator: env!("CARGO_PKG_NAME").into(),
        }
    }
}

fn rgb(c: Rgb) -> (f32, f32, f32) {
    (c[0] as f32 / 255.0, c[1] as f32 / 255.0, c[2] as f32 / 255.0)
}

fn used_chars(pages: &[Page], weight: Weight) -> BTreeSet<char> {
    pages
        .iter()
        .flat_map(|p| p.ops.iter().chain(p.stamps.iter()))
        .filter_map(|op| match op {
            DrawOp::Text(t) if t.weight == weight => Some(t.text.chars()),
            _ => None,
        })
        .flatten()
        .collect()
}

/// Writes the avatar as an image XObject. JPEG data goes in as-is; PNG
/// pixels are re-encoded as Flate RGB with an optional soft mask.
fn embed_avatar(pdf: &mut Pdf, img: &AvatarImage, alloc: &mut impl FnMut() -> Ref) -> Option<Ref> {
    let xobj_ref = alloc();
    match img.format {
        ImageFormat::Jpeg => {
            let mut xobj = pdf.image_xobject(xobj_ref, &img.data);
            xobj.filter(Filter::DctDecode);
            xobj.width(img.pixel_width as i32);
            xobj.height(img.pixel_height as i32);
            match img.components {
                1 => xobj.color_space().device_gray(),
                4 => xobj.color_space().device_cmyk(),
                _ => xobj.color_space().device_rgb(),
            };
            xobj.bits_per_component(8);
        }
        ImageFormat::Png => {
            let Some(rgba) = img.rgba.as_ref() else {
                log::error!("Avatar PNG was not decoded, leaving it out");
                return None;
            };
            let (w, h) = (rgba.width(), rgba.height());
            let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

            let rgb_data: Vec<u8> = rgba
                .pixels()
                .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
                .collect();
            let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

            let smask_ref = if has_alpha {
                let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
                let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(w as i32);
                mask.height(h as i32);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                Some(mask_ref)
            } else {
                None
            };

            let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w as i32);
            xobj.height(h as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
        }
    }
    Some(xobj_ref)
}

/// Rectangle path with circular-ish corners, from a top-left origin in PDF
/// space (y grows upwards, so the rectangle extends down from `top`).
fn rounded_rect_path(content: &mut Content, x: f32, top: f32, w: f32, h: f32, r: f32) {
    let r = r.min(w / 2.0).min(h / 2.0);
    if r <= 0.0 {
        content.rect(x, top - h, w, h);
        return;
    }
    // Bezier handle length for a quarter circle.
    let k = r * 0.552_284_8;
    let (left, right, bottom) = (x, x + w, top - h);
    content.move_to(left + r, top);
    content.line_to(right - r, top);
    content.cubic_to(right - r + k, top, right, top - r + k, right, top - r);
    content.line_to(right, bottom + r);
    content.cubic_to(right, bottom + r - k, right - r + k, bottom, right - r, bottom);
    content.line_to(left + r, bottom);
    content.cubic_to(left + r - k, bottom, left, bottom + r - k, left, bottom + r);
    content.line_to(left, top - r);
    content.cubic_to(left, top - r + k, left + r - k, top, left + r, top);
    content.close_path();
}

struct PageFonts<'a> {
    regular: Option<&'a EmbeddedFont>,
    bold: Option<&'a EmbeddedFont>,
}

impl PageFonts<'_> {
    fn get(&self, weight: Weight) -> Option<&EmbeddedFont> {
        match weight {
            Weight::Regular => self.regular,
            Weight::Bold => self.bold,
        }
    }
}

fn draw_op(
    content: &mut Content,
    op: &DrawOp,
    fonts: &PageFonts<'_>,
    has_avatar: bool,
    page_height: f32,
    links: &mut Vec<(Rect, String)>,
) {
    let flip = |y: f32| page_height - y;
    match op {
        DrawOp::Text(t) => {
            let Some(font) = fonts.get(t.weight) else {
                return;
            };
            let (r, g, b) = rgb(t.color);
            content
                .begin_text()
                .set_font(Name(font.pdf_name.as_bytes()), t.size)
                .set_fill_rgb(r, g, b)
                .next_line(t.x, flip(t.y))
                .show(Str(&font.encode(&t.text)))
                .end_text();
        }
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        } => {
            let (r, g, b) = rgb(*color);
            content.save_state();
            content.set_line_width(*width);
            content.set_stroke_rgb(r, g, b);
            content.move_to(*x1, flip(*y1));
            content.line_to(*x2, flip(*y2));
            content.stroke();
            content.restore_state();
        }
        DrawOp::Rect {
            x,
            y,
            w,
            h,
            radius,
            fill,
            stroke,
        } => {
            if fill.is_none() && stroke.is_none() {
                return;
            }
            content.save_state();
            if let Some(c) = fill {
                let (r, g, b) = rgb(*c);
                content.set_fill_rgb(r, g, b);
            }
            if let Some((c, width)) = stroke {
                let (r, g, b) = rgb(*c);
                content.set_stroke_rgb(r, g, b);
                content.set_line_width(*width);
            }
            rounded_rect_path(content, *x, flip(*y), *w, *h, *radius);
            match (fill, stroke) {
                (Some(_), Some(_)) => content.fill_nonzero_and_stroke(),
                (Some(_), None) => content.fill_nonzero(),
                _ => content.stroke(),
            };
            content.restore_state();
        }
        DrawOp::Image { x, y, w, h } => {
            if !has_avatar {
                return;
            }
            content.save_state();
            content.transform([*w, 0.0, 0.0, *h, *x, flip(*y + *h)]);
            content.x_object(Name(AVATAR_XOBJECT.as_bytes()));
            content.restore_state();
        }
        DrawOp::Link { x, y, w, h, url } => {
            links.push((Rect::new(*x, flip(*y + *h), *x + *w, flip(*y)), url.clone()));
        }
    }
}

/// Serialises laid-out pages into a PDF. Body operations are drawn first,
/// stamps on top.
pub fn render(
    pages: &[Page],
    fonts: &FontSet,
    avatar: Option<&AvatarImage>,
    geometry: &PageGeometry,
    info: &DocumentInfo,
) -> Result<Vec<u8>, Error> {
    if pages.is_empty() {
        return Err(Error::Pdf("nothing to render".into()));
    }
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Phase 1: fonts, subset to what the pages actually use
    let mut embedded: Vec<EmbeddedFont> = Vec::new();
    for (weight, name) in [(Weight::Regular, "F1"), (Weight::Bold, "F2")] {
        let chars = used_chars(pages, weight);
        if chars.is_empty() {
            continue;
        }
        embedded.push(register_font(
            &mut pdf,
            fonts.get(weight),
            name.to_string(),
            &mut alloc,
            &chars,
        ));
    }
    let page_fonts = PageFonts {
        regular: embedded.iter().find(|f| f.pdf_name == "F1"),
        bold: embedded.iter().find(|f| f.pdf_name == "F2"),
    };
    let t_fonts = t0.elapsed();

    // Phase 2: avatar
    let wants_avatar = pages.iter().any(Page::has_image);
    let avatar_ref = match avatar {
        Some(img) if wants_avatar => embed_avatar(&mut pdf, img, &mut alloc),
        _ => None,
    };
    let t_images = t0.elapsed();

    // Phase 3: content streams
    let n = pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let mut page_links: Vec<Vec<(Rect, String)>> = Vec::with_capacity(n);

    for (i, page) in pages.iter().enumerate() {
        let mut content = Content::new();
        let mut links = Vec::new();
        for op in page.ops.iter().chain(page.stamps.iter()) {
            draw_op(
                &mut content,
                op,
                &page_fonts,
                avatar_ref.is_some(),
                geometry.page_height,
                &mut links,
            );
        }
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
        page_links.push(links);
    }
    let t_content = t0.elapsed();

    // Phase 4: annotations, page tree, info
    let page_annot_refs: Vec<Vec<Ref>> = page_links
        .iter()
        .map(|links| {
            links
                .iter()
                .map(|(rect, url)| {
                    let annot_ref = alloc();
                    let mut annot = pdf.annotation(annot_ref);
                    annot
                        .subtype(AnnotationType::Link)
                        .rect(*rect)
                        .border(0.0, 0.0, 0.0, None);
                    annot
                        .action()
                        .action_type(ActionType::Uri)
                        .uri(Str(url.as_bytes()));
                    annot_ref
                })
                .collect()
        })
        .collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, geometry.page_width, geometry.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        if !page_annot_refs[i].is_empty() {
            page.annotations(page_annot_refs[i].iter().copied());
        }
        let mut resources = page.resources();
        {
            let mut font_dict = resources.fonts();
            for font in &embedded {
                font_dict.pair(Name(font.pdf_name.as_bytes()), font.font_ref);
            }
        }
        if let Some(xobj_ref) = avatar_ref {
            resources
                .x_objects()
                .pair(Name(AVATAR_XOBJECT.as_bytes()), xobj_ref);
        }
    }

    pdf.document_info(info_id)
        .title(TextStr(&info.title))
        .subject(TextStr(&info.subject))
        .author(TextStr(&info.author))
        .keywords(TextStr(&info.keywords))
        .creator(TextStr(&info.creator));

    let t_assembly = t0.elapsed();
    log::info!(
        "Render phases: font_embed={:.1}ms, images={:.1}ms, content={:.1}ms, assembly={:.1}ms ({} pages)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_images - t_fonts).as_secs_f64() * 1000.0,
        (t_content - t_images).as_secs_f64() * 1000.0,
        (t_assembly - t_content).as_secs_f64() * 1000.0,
        n,
    );

    Ok(pdf.finish())
}
