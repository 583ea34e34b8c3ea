use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::config::FontOptions;
use crate::i18n::Language;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weight {
    Regular,
    Bold,
}

#[derive(Clone, Debug)]
enum FontSource {
    /// One of the standard 14 Helvetica faces, never embedded.
    Builtin,
    TrueType { data: Arc<Vec<u8>>, face_index: u32 },
}

/// Metrics for one face, ready for measurement before anything is embedded.
#[derive(Clone, Debug)]
pub struct FontEntry {
    family: String,
    weight: Weight,
    source: FontSource,
    widths_1000: Vec<f32>,
    char_widths_1000: HashMap<char, f32>,
    ascender_ratio: f32,
}

impl FontEntry {
    /// Built-in Helvetica (or Helvetica-Bold) with approximate widths.
    pub fn builtin(weight: Weight) -> Self {
        Self {
            family: "Helvetica".into(),
            weight,
            source: FontSource::Builtin,
            widths_1000: helvetica_widths(weight),
            char_widths_1000: HashMap::new(),
            ascender_ratio: 0.718,
        }
    }

    /// Parses a TrueType/OpenType face and caches the advance width of every
    /// character its Unicode cmap covers.
    pub fn from_truetype(family: &str, weight: Weight, data: Vec<u8>, face_index: u32) -> Option<Self> {
        let face = Face::parse(&data, face_index).ok()?;
        let units = face.units_per_em() as f32;

        let mut codepoints = Vec::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if subtable.is_unicode() {
                    subtable.codepoints(|cp| codepoints.push(cp));
                }
            }
        }

        let mut char_widths_1000 = HashMap::with_capacity(codepoints.len());
        for ch in codepoints.into_iter().filter_map(char::from_u32) {
            if let Some(adv) = face.glyph_index(ch).and_then(|gid| face.glyph_hor_advance(gid)) {
                char_widths_1000.insert(ch, adv as f32 / units * 1000.0);
            }
        }
        if char_widths_1000.is_empty() {
            return None;
        }

        let widths_1000 = (32u8..=255u8)
            .map(|byte| {
                char_widths_1000
                    .get(&winansi_to_char(byte))
                    .copied()
                    .unwrap_or(0.0)
            })
            .collect();
        let ascender_ratio = face.ascender() as f32 / units;

        Some(Self {
            family: family.to_string(),
            weight,
            source: FontSource::TrueType {
                data: Arc::new(data),
                face_index,
            },
            widths_1000,
            char_widths_1000,
            ascender_ratio,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.source, FontSource::Builtin)
    }

    /// Width of a single character in 1000-units. Uses the per-char cache,
    /// falls back to the WinAnsi table.
    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        if let Some(&w) = self.char_widths_1000.get(&ch) {
            return w;
        }
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub fn space_width(&self, font_size: f32) -> f32 {
        self.char_width_1000(' ') * font_size / 1000.0
    }

    /// Height above the baseline at `font_size`.
    pub fn ascent(&self, font_size: f32) -> f32 {
        self.ascender_ratio * font_size
    }
}

/// The regular and bold faces selected for one export. Selection never
/// changes once layout has started.
#[derive(Clone, Debug)]
pub struct FontSet {
    pub regular: FontEntry,
    pub bold: FontEntry,
}

impl FontSet {
    pub fn builtin() -> Self {
        Self {
            regular: FontEntry::builtin(Weight::Regular),
            bold: FontEntry::builtin(Weight::Bold),
        }
    }

    pub fn get(&self, weight: Weight) -> &FontEntry {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }

    pub fn family(&self) -> &str {
        self.regular.family()
    }

    /// Latin family for English, the Unicode font file for Vietnamese.
    /// Any failure falls back to Helvetica; font trouble never aborts an export.
    pub fn select(language: Language, options: &FontOptions) -> Self {
        let t0 = std::time::Instant::now();
        let set = match language {
            Language::English => match options.latin_family.as_deref() {
                Some(family) => Self::from_system(family),
                None => Self::builtin(),
            },
            Language::Vietnamese => match options.unicode_font.as_deref() {
                Some(path) => Self::from_files(path, options.unicode_font_bold.as_deref()),
                None => {
                    log::warn!("No Unicode font configured for {language}, using Helvetica");
                    Self::builtin()
                }
            },
        };
        log::debug!(
            "Font selection for {language}: {} → {:.1}ms",
            set.family(),
            t0.elapsed().as_secs_f64() * 1000.0,
        );
        set
    }

    fn from_system(family: &str) -> Self {
        let load = |bold: bool| {
            let (path, face_index) = find_font_file(family, bold, false)?;
            let data = std::fs::read(&path).ok()?;
            let weight = if bold { Weight::Bold } else { Weight::Regular };
            FontEntry::from_truetype(family, weight, data, face_index)
        };
        match load(false) {
            Some(regular) => {
                let bold = load(true).unwrap_or_else(|| {
                    log::debug!("No bold face for {family}, reusing regular");
                    FontEntry {
                        weight: Weight::Bold,
                        ..regular.clone()
                    }
                });
                Self { regular, bold }
            }
            None => {
                log::warn!("Font not found: {family} — using Helvetica");
                Self::builtin()
            }
        }
    }

    fn from_files(regular_path: &Path, bold_path: Option<&Path>) -> Self {
        let load = |path: &Path, weight: Weight| -> Result<FontEntry, String> {
            let data = std::fs::read(path).map_err(|e| e.to_string())?;
            let family = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Unicode")
                .to_string();
            FontEntry::from_truetype(&family, weight, data, 0)
                .ok_or_else(|| "not a usable TrueType font".to_string())
        };
        let regular = match load(regular_path, Weight::Regular) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!(
                    "Could not register {}: {e} — using Helvetica",
                    regular_path.display()
                );
                return Self::builtin();
            }
        };
        let bold = bold_path
            .and_then(|p| {
                load(p, Weight::Bold)
                    .map_err(|e| log::warn!("Could not register {}: {e}", p.display()))
                    .ok()
            })
            .unwrap_or_else(|| FontEntry {
                weight: Weight::Bold,
                ..regular.clone()
            });
        Self { regular, bold }
    }
}

/// (lowercase family name, bold, italic) -> (file path, face index within TTC)
type FontLookup = HashMap<(String, bool, bool), (PathBuf, u32)>;

static FONT_INDEX: OnceLock<FontLookup> = OnceLock::new();

fn font_family_name(face: &Face) -> Option<String> {
    // ID 1 (Family) keeps "Candara Light" apart from "Candara".
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

fn read_font_style(data: &[u8], face_index: u32) -> Option<(String, bool, bool)> {
    let face = Face::parse(data, face_index).ok()?;
    let family = font_family_name(&face)?;
    Some((family, face.is_bold(), face.is_italic()))
}

fn font_directories() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    if let Ok(val) = std::env::var("FOLIO_FONTS") {
        let sep = if cfg!(windows) { ';' } else { ':' };
        dirs.extend(
            val.split(sep)
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        );
    }

    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            dirs.push("C:\\Windows\\Fonts".into());
        }
    }

    dirs
}

fn is_font_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("ttf" | "otf" | "ttc")
    )
}

fn scan_font_dirs() -> FontLookup {
    let t0 = std::time::Instant::now();
    let mut index = FontLookup::new();
    let mut files_scanned = 0u32;
    let mut visited = std::collections::HashSet::new();

    let mut stack = font_directories();
    while let Some(dir) = stack.pop() {
        if !visited.insert(dir.clone()) {
            continue;
        }
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if !is_font_file(&path) {
                continue;
            }
            files_scanned += 1;
            let Ok(file) = std::fs::File::open(&path) else {
                continue;
            };
            // SAFETY: font files are opened read-only and not modified while mapped.
            let Ok(data) = (unsafe { Mmap::map(&file) }) else {
                continue;
            };
            let face_count = ttf_parser::fonts_in_collection(&data).unwrap_or(1);
            for face_idx in 0..face_count {
                if let Some((family, bold, italic)) = read_font_style(&data, face_idx) {
                    index
                        .entry((family.to_lowercase(), bold, italic))
                        .or_insert((path.clone(), face_idx));
                }
            }
        }
    }

    log::info!(
        "Font scan: {:.1}ms, {} files parsed → {} entries",
        t0.elapsed().as_secs_f64() * 1000.0,
        files_scanned,
        index.len(),
    );

    index
}

/// Look up a font file by family name and style.
/// Falls back to the regular variant if the requested bold/italic is not available.
fn find_font_file(font_name: &str, bold: bool, italic: bool) -> Option<(PathBuf, u32)> {
    let index = FONT_INDEX.get_or_init(scan_font_dirs);
    let key = font_name.to_lowercase();
    index
        .get(&(key.clone(), bold, italic))
        .or_else(|| {
            if bold || italic {
                index.get(&(key, false, false))
            } else {
                None
            }
        })
        .cloned()
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
/// Bytes 0x80-0x9F are remapped; all others map directly to their Unicode codepoint.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}', // bullet
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// UTF-8 to WinAnsi bytes for built-in fonts; unmappable characters are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.push((gid >> 8) as u8);
        out.push((gid & 0xFF) as u8);
    }
    out
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi chars 32..=255.
fn helvetica_widths(weight: Weight) -> Vec<f32> {
    let bold = weight == Weight::Bold;
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,                          // space
            33..=47 => 333.0,                     // punctuation
            48..=57 => 556.0,                     // digits
            58..=64 => 333.0,                     // more punctuation
            73 | 74 => 278.0,                     // I J (narrow uppercase)
            77 => 833.0,                          // M (wide)
            65..=90 => if bold { 722.0 } else { 667.0 },
            91..=96 => 333.0,                     // brackets etc.
            102 | 105 | 106 | 108 | 116 => if bold { 333.0 } else { 278.0 },
            109 | 119 => if bold { 889.0 } else { 833.0 },
            97..=122 => if bold { 611.0 } else { 556.0 },
            0x95 => 350.0,                        // bullet
            _ => 556.0,
        })
        .collect()
}

/// A face as it ended up in the PDF.
pub(crate) struct EmbeddedFont {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    /// Present for CID fonts; built-ins are WinAnsi-encoded.
    pub(crate) char_to_gid: Option<HashMap<char, u16>>,
}

impl EmbeddedFont {
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

/// Embed a TrueType/OpenType font as a CIDFont (Type0 composite) with Identity-H encoding.
/// The font data is subsetted to only include glyphs used in the document.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    font_name: &str,
    font_data: &[u8],
    face_index: u32,
    used_chars: &BTreeSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<HashMap<char, u16>> {
    let face = Face::parse(font_data, face_index).ok()?;
    let descriptor_ref = alloc();
    let data_ref = alloc();

    let units = face.units_per_em() as f32;
    let to_1000 = |v: f32| v / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| to_1000(h as f32))
        .unwrap_or(700.0);
    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        to_1000(bb.x_min as f32),
        to_1000(bb.y_min as f32),
        to_1000(bb.x_max as f32),
        to_1000(bb.y_max as f32),
    );

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut gid_widths: Vec<(u16, f32)> = Vec::new();
    for &ch in used_chars {
        if let Some(gid) = face.glyph_index(ch) {
            let new_gid = remapper.remap(gid.0);
            char_to_gid.insert(ch, new_gid);
            let w = face
                .glyph_hor_advance(gid)
                .map(|adv| to_1000(adv as f32))
                .unwrap_or(0.0);
            gid_widths.push((new_gid, w));
        }
    }
    gid_widths.sort_by_key(|&(gid, _)| gid);
    gid_widths.dedup_by_key(|&mut (gid, _)| gid);

    let subset_data = subsetter::subset(font_data, face_index, &remapper).unwrap_or_else(|e| {
        log::warn!("Font subsetting failed for {font_name}: {e} — embedding full font");
        font_data.to_vec()
    });

    let data_len = i32::try_from(subset_data.len()).ok()?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name: String = font_name.chars().filter(|c| !c.is_whitespace()).collect();

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(to_1000(face.ascender() as f32))
        .descent(to_1000(face.descender() as f32))
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let system_info = || pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };

    let cid_font_ref = alloc();
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info());
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let tounicode_ref = alloc();
    let cmap_name = format!("{ps_name}-UTF16");
    let mut cmap = pdf_writer::types::UnicodeCmap::new(Name(cmap_name.as_bytes()), system_info());
    for &ch in used_chars {
        if let Some(&new_gid) = char_to_gid.get(&ch) {
            cmap.pair(new_gid, ch);
        }
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Some(char_to_gid)
}

fn builtin_base_font(weight: Weight) -> &'static [u8] {
    match weight {
        Weight::Regular => b"Helvetica",
        Weight::Bold => b"Helvetica-Bold",
    }
}

pub(crate) fn register_font(
    pdf: &mut Pdf,
    entry: &FontEntry,
    pdf_name: String,
    alloc: &mut impl FnMut() -> Ref,
    used_chars: &BTreeSet<char>,
) -> EmbeddedFont {
    let t0 = std::time::Instant::now();
    let font_ref = alloc();

    let char_to_gid = match &entry.source {
        FontSource::TrueType { data, face_index } => {
            let embedded = embed_truetype(
                pdf,
                font_ref,
                &entry.family,
                data,
                *face_index,
                used_chars,
                alloc,
            );
            if embedded.is_none() {
                log::warn!("Embedding {} failed — using Helvetica", entry.family);
            }
            embedded
        }
        FontSource::Builtin => None,
    };

    if char_to_gid.is_none() {
        pdf.type1_font(font_ref)
            .base_font(Name(builtin_base_font(entry.weight)))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    log::debug!(
        "register_font: {} {:?} ({} chars) → {:.1}ms",
        entry.family,
        entry.weight,
        used_chars.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    EmbeddedFont {
        pdf_name,
        font_ref,
        char_to_gid,
    }
}
