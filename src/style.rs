use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub type Rgb = [u8; 3];

/// The two observed rendering variants of the CV.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum StylePreset {
    /// White header with accent underline, two-column bulleted skills,
    /// right-aligned durations.
    #[default]
    Classic,
    /// Coloured header band, three-column bold skills, inline durations.
    Banner,
}

impl fmt::Display for StylePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StylePreset::Classic => "classic",
            StylePreset::Banner => "banner",
        })
    }
}

impl FromStr for StylePreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(StylePreset::Classic),
            "banner" => Ok(StylePreset::Banner),
            other => Err(Error::Config(format!("unknown style preset: {other}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub primary: Rgb,
    pub text: Rgb,
    pub link: Rgb,
    pub subtext: Rgb,
    pub accent: Rgb,
    pub accent_bar: Rgb,
    pub title_grey: Rgb,
    pub header_bg: Rgb,
    pub header_name: Rgb,
    pub header_title: Rgb,
    pub tag_bg: Rgb,
    pub tag_text: Rgb,
    pub section_bg: Rgb,
    pub avatar_shadow: Rgb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderStyle {
    /// White band, hairline below, accent rule under the title.
    Hairline,
    /// Filled band in the palette's header colour.
    Band,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionHeaderStyle {
    /// Accent bar to the left of the title and a hairline below it.
    AccentBar,
    /// Tinted bar spanning the content width behind the title.
    Tinted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurationPlacement {
    RightAligned,
    Inline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillItemStyle {
    Bullet,
    Bold,
}

/// Everything that differs between presets. Geometry shared by all presets
/// lives with the cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub preset: StylePreset,
    pub palette: Palette,
    pub header: HeaderStyle,
    pub section_header: SectionHeaderStyle,
    pub skill_columns: usize,
    pub skill_items: SkillItemStyle,
    pub durations: DurationPlacement,
    /// Side of the square avatar frame, in points.
    pub avatar_size: f32,
    /// Distance from the top edge to the avatar frame.
    pub avatar_top: f32,
}

const CLASSIC_PALETTE: Palette = Palette {
    primary: [0x0f, 0x17, 0x2a],
    text: [0x1f, 0x29, 0x37],
    link: [0x1d, 0x4e, 0xd8],
    subtext: [0x64, 0x74, 0x8b],
    accent: [0xe5, 0xe7, 0xeb],
    accent_bar: [0x1d, 0x4e, 0xd8],
    title_grey: [0x33, 0x41, 0x55],
    header_bg: [0xff, 0xff, 0xff],
    header_name: [0x0f, 0x17, 0x2a],
    header_title: [0x33, 0x41, 0x55],
    tag_bg: [0xee, 0xf2, 0xff],
    tag_text: [0x1e, 0x3a, 0x8a],
    section_bg: [0xff, 0xff, 0xff],
    avatar_shadow: [0xf3, 0xf4, 0xf6],
};

const BANNER_PALETTE: Palette = Palette {
    primary: [0x1e, 0x3a, 0x8a],
    text: [0x1f, 0x29, 0x37],
    link: [0x1d, 0x4e, 0xd8],
    subtext: [0x64, 0x74, 0x8b],
    accent: [0xe5, 0xe7, 0xeb],
    accent_bar: [0x1e, 0x3a, 0x8a],
    title_grey: [0x33, 0x41, 0x55],
    header_bg: [0x1e, 0x3a, 0x8a],
    header_name: [0xff, 0xff, 0xff],
    header_title: [0xc7, 0xd2, 0xfe],
    tag_bg: [0x31, 0x4e, 0xa8],
    tag_text: [0xff, 0xff, 0xff],
    section_bg: [0xee, 0xf2, 0xff],
    avatar_shadow: [0x17, 0x2e, 0x6e],
};

impl Style {
    pub fn preset(preset: StylePreset) -> Self {
        match preset {
            StylePreset::Classic => Self {
                preset,
                palette: CLASSIC_PALETTE,
                header: HeaderStyle::Hairline,
                section_header: SectionHeaderStyle::AccentBar,
                skill_columns: 2,
                skill_items: SkillItemStyle::Bullet,
                durations: DurationPlacement::RightAligned,
                avatar_size: 102.0,
                avatar_top: 46.0,
            },
            StylePreset::Banner => Self {
                preset,
                palette: BANNER_PALETTE,
                header: HeaderStyle::Band,
                section_header: SectionHeaderStyle::Tinted,
                skill_columns: 3,
                skill_items: SkillItemStyle::Bold,
                durations: DurationPlacement::Inline,
                avatar_size: 88.0,
                avatar_top: 36.0,
            },
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::preset(StylePreset::default())
    }
}
