use std::collections::{HashMap, HashSet};
use std::path::Path;

use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::config::Branding;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontRole {
    Regular,
    Bold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
}

impl BuiltinFont {
    fn base_name(self) -> &'static [u8] {
        match self {
            BuiltinFont::Helvetica => b"Helvetica",
            BuiltinFont::HelveticaBold => b"Helvetica-Bold",
        }
    }

    /// Approximate advance widths at 1000 units/em for a WinAnsi byte.
    fn width_1000(self, byte: u8) -> f32 {
        let bold = self == BuiltinFont::HelveticaBold;
        match byte {
            32 => 278.0,
            33..=47 => 333.0,
            48..=57 => 556.0,
            58..=64 => 333.0,
            73 => 278.0,
            74 => if bold { 556.0 } else { 500.0 },
            77 => 833.0,
            65..=90 => if bold { 722.0 } else { 667.0 },
            91..=96 => 333.0,
            102 | 105 | 106 | 108 | 116 => if bold { 333.0 } else { 278.0 },
            109 | 119 => if bold { 889.0 } else { 833.0 },
            97..=122 => if bold { 611.0 } else { 556.0 },
            0x85 => 1000.0, // ellipsis
            _ => 556.0,
        }
    }
}

/// A face used for measuring during layout and for embedding at serialization.
#[derive(Clone)]
pub enum FontFace {
    Builtin(BuiltinFont),
    TrueType(TrueTypeFace),
}

#[derive(Clone)]
pub struct TrueTypeFace {
    pub family: String,
    data: Vec<u8>,
    face_index: u32,
    ascender_ratio: f32,
    line_h_ratio: f32,
}

impl TrueTypeFace {
    fn parse(data: Vec<u8>, face_index: u32, fallback_name: &str) -> Option<Self> {
        let face = Face::parse(&data, face_index).ok()?;
        let units = face.units_per_em() as f32;
        let family = font_family_name(&face).unwrap_or_else(|| fallback_name.to_string());
        let line_gap = face.line_gap() as f32;
        let line_h_ratio =
            (face.ascender() as f32 - face.descender() as f32 + line_gap) / units;
        let ascender_ratio = face.ascender() as f32 / units;
        Some(Self {
            family,
            data,
            face_index,
            ascender_ratio,
            line_h_ratio,
        })
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, self.face_index).ok()
    }
}

fn font_family_name(face: &Face) -> Option<String> {
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

impl FontFace {
    /// Load a TrueType/OpenType file, falling back to `fallback` when the file
    /// is missing or cannot be parsed.
    pub fn load_or(path: &Path, fallback: BuiltinFont) -> FontFace {
        let data = match std::fs::read(path) {
            Ok(d) => d,
            Err(e) => {
                log::warn!(
                    "Font {} unreadable ({e}), using {}",
                    path.display(),
                    String::from_utf8_lossy(fallback.base_name())
                );
                return FontFace::Builtin(fallback);
            }
        };
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Embedded");
        match TrueTypeFace::parse(data, 0, stem) {
            Some(tt) => {
                log::debug!("Loaded font {} from {}", tt.family, path.display());
                FontFace::TrueType(tt)
            }
            None => {
                log::warn!(
                    "Font {} is not a valid TrueType/OpenType file, using {}",
                    path.display(),
                    String::from_utf8_lossy(fallback.base_name())
                );
                FontFace::Builtin(fallback)
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontFace::Builtin(_))
    }

    pub fn ascender_ratio(&self) -> f32 {
        match self {
            FontFace::Builtin(_) => 0.75,
            FontFace::TrueType(tt) => tt.ascender_ratio,
        }
    }

    pub fn line_height(&self, font_size: f32) -> f32 {
        match self {
            FontFace::Builtin(_) => font_size * 1.2,
            FontFace::TrueType(tt) => font_size * tt.line_h_ratio,
        }
    }

    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        match self {
            FontFace::Builtin(b) => to_winansi_bytes(text)
                .iter()
                .filter(|&&byte| byte >= 32)
                .map(|&byte| b.width_1000(byte) * font_size / 1000.0)
                .sum(),
            FontFace::TrueType(tt) => {
                let Some(face) = tt.face() else {
                    return 0.0;
                };
                let units = face.units_per_em() as f32;
                text.chars()
                    .filter_map(|ch| face.glyph_index(ch))
                    .filter_map(|gid| face.glyph_hor_advance(gid))
                    .map(|adv| adv as f32 / units * font_size)
                    .sum()
            }
        }
    }

    /// Greedy word wrap. A word wider than `max_width` gets a line of its own.
    pub fn wrap(&self, text: &str, font_size: f32, max_width: f32) -> Vec<String> {
        let space_w = self.text_width(" ", font_size);
        let mut lines: Vec<String> = Vec::new();
        for paragraph in text.split('\n') {
            let mut current = String::new();
            let mut current_w = 0.0f32;
            for word in paragraph.split_whitespace() {
                let ww = self.text_width(word, font_size);
                if current.is_empty() {
                    current.push_str(word);
                    current_w = ww;
                } else if current_w + space_w + ww > max_width {
                    lines.push(std::mem::take(&mut current));
                    current.push_str(word);
                    current_w = ww;
                } else {
                    current.push(' ');
                    current.push_str(word);
                    current_w += space_w + ww;
                }
            }
            lines.push(current);
        }
        lines
    }
}

/// The two faces a report uses.
#[derive(Clone)]
pub struct FontSet {
    pub regular: FontFace,
    pub bold: FontFace,
}

impl FontSet {
    pub fn builtin() -> Self {
        Self {
            regular: FontFace::Builtin(BuiltinFont::Helvetica),
            bold: FontFace::Builtin(BuiltinFont::HelveticaBold),
        }
    }

    pub fn load(branding: &Branding) -> Self {
        let t0 = std::time::Instant::now();
        let regular = branding
            .regular_font
            .as_deref()
            .map(|p| FontFace::load_or(p, BuiltinFont::Helvetica))
            .unwrap_or(FontFace::Builtin(BuiltinFont::Helvetica));
        let bold = branding
            .bold_font
            .as_deref()
            .map(|p| FontFace::load_or(p, BuiltinFont::HelveticaBold))
            .unwrap_or(FontFace::Builtin(BuiltinFont::HelveticaBold));
        log::debug!(
            "FontSet::load → {:.1}ms",
            t0.elapsed().as_secs_f64() * 1000.0
        );
        Self { regular, bold }
    }

    pub fn get(&self, role: FontRole) -> &FontFace {
        match role {
            FontRole::Regular => &self.regular,
            FontRole::Bold => &self.bold,
        }
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

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes. Unmappable
/// characters become `?`.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match char_to_winansi(c) {
            0 if (c as u32) < 0x20 => b' ',
            0 => b'?',
            b => b,
        })
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

/// A font written into the PDF, ready to encode text for content streams.
pub(crate) struct EmbeddedFont {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
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
    tt: &TrueTypeFace,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<HashMap<char, u16>> {
    let face = tt.face()?;
    let descriptor_ref = alloc();
    let data_ref = alloc();

    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut gid_widths: Vec<(u16, f32)> = Vec::new();
    let mut chars: Vec<char> = used_chars.iter().copied().collect();
    chars.sort_unstable();
    for ch in chars {
        if let Some(gid) = face.glyph_index(ch) {
            let new_gid = remapper.remap(gid.0);
            char_to_gid.insert(ch, new_gid);
            let w = face
                .glyph_hor_advance(gid)
                .map(|adv| adv as f32 / units * 1000.0)
                .unwrap_or(0.0);
            gid_widths.push((new_gid, w));
        }
    }

    let subset_data = subsetter::subset(&tt.data, tt.face_index, &remapper)
        .unwrap_or_else(|e| {
            log::warn!("Font subsetting failed for {}: {e}, embedding full font", tt.family);
            tt.data.clone()
        });

    let data_len = i32::try_from(subset_data.len()).ok()?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name = tt.family.replace(' ', "");

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let cid_font_ref = alloc();
    let system_info = pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        gid_widths.sort_by_key(|&(gid, _)| gid);
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let tounicode_ref = alloc();
    let cmap_name = format!("{}-UTF16", ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: pdf_writer::Str(b"Adobe"),
            ordering: pdf_writer::Str(b"Identity"),
            supplement: 0,
        },
    );
    for (&ch, &new_gid) in &char_to_gid {
        cmap.pair(new_gid, ch);
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

fn write_type1(pdf: &mut Pdf, font_ref: Ref, builtin: BuiltinFont) {
    pdf.type1_font(font_ref)
        .base_font(Name(builtin.base_name()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
}

pub(crate) fn register_font(
    pdf: &mut Pdf,
    face: &FontFace,
    role: FontRole,
    pdf_name: String,
    alloc: &mut impl FnMut() -> Ref,
    used_chars: &HashSet<char>,
) -> EmbeddedFont {
    let t0 = std::time::Instant::now();
    let font_ref = alloc();

    let char_to_gid = match face {
        FontFace::Builtin(b) => {
            write_type1(pdf, font_ref, *b);
            None
        }
        FontFace::TrueType(tt) => {
            let embedded = embed_truetype(pdf, font_ref, tt, used_chars, alloc);
            if embedded.is_none() {
                let fallback = match role {
                    FontRole::Regular => BuiltinFont::Helvetica,
                    FontRole::Bold => BuiltinFont::HelveticaBold,
                };
                log::warn!("Embedding {} failed, using built-in font", tt.family);
                write_type1(pdf, font_ref, fallback);
            }
            embedded
        }
    };

    log::debug!(
        "register_font: {pdf_name} {role:?} → {:.1}ms",
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    EmbeddedFont {
        pdf_name,
        font_ref,
        char_to_gid,
    }
}
