use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ScaleBarError, ScaleBarResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn from_rgba8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self::rgba(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
            f64::from(alpha) / 255.0,
        )
    }

    /// Parses a color name, `#rgb`, `#rrggbb`, `#rrggbbaa` or `none`.
    pub fn parse(value: &str) -> ScaleBarResult<Self> {
        let trimmed = value.trim();
        let lowered = trimmed.to_ascii_lowercase();
        if let Some(hex) = lowered.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| invalid_color(value));
        }
        named_color(&lowered).ok_or_else(|| invalid_color(value))
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    /// Whether drawing with this color leaves any mark.
    #[must_use]
    pub fn is_visible(self) -> bool {
        self.alpha > 0.0
    }

    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            channel(self.red),
            channel(self.green),
            channel(self.blue),
            channel(self.alpha),
        ]
    }

    pub fn validate(self) -> ScaleBarResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ScaleBarError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_visible() {
            return f.write_str("none");
        }
        let [r, g, b, a] = self.to_rgba8();
        if a == u8::MAX {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

fn invalid_color(value: &str) -> ScaleBarError {
    ScaleBarError::InvalidData(format!("`{value}` is not a valid color"))
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |index: usize| u8::from_str_radix(&hex[index..=index], 16).ok().map(|v| v * 17);
    let byte = |index: usize| u8::from_str_radix(&hex[index..index + 2], 16).ok();
    match hex.len() {
        3 => Some(Color::from_rgba8(nibble(0)?, nibble(1)?, nibble(2)?, u8::MAX)),
        6 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, u8::MAX)),
        8 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Color> {
    let [r, g, b] = match name {
        "none" | "transparent" => return Some(Color::TRANSPARENT),
        "k" | "black" => [0, 0, 0],
        "w" | "white" => [255, 255, 255],
        "r" | "red" => [255, 0, 0],
        "g" | "green" => [0, 128, 0],
        "b" | "blue" => [0, 0, 255],
        "c" | "cyan" | "aqua" => [0, 255, 255],
        "m" | "magenta" | "fuchsia" => [255, 0, 255],
        "y" | "yellow" => [255, 255, 0],
        "gray" | "grey" => [128, 128, 128],
        "darkgray" | "darkgrey" => [169, 169, 169],
        "lightgray" | "lightgrey" => [211, 211, 211],
        "dimgray" | "dimgrey" => [105, 105, 105],
        "silver" => [192, 192, 192],
        "whitesmoke" => [245, 245, 245],
        "gainsboro" => [220, 220, 220],
        "orange" => [255, 165, 0],
        "gold" => [255, 215, 0],
        "purple" => [128, 0, 128],
        "brown" => [165, 42, 42],
        "pink" => [255, 192, 203],
        "navy" => [0, 0, 128],
        "teal" => [0, 128, 128],
        "olive" => [128, 128, 0],
        "maroon" => [128, 0, 0],
        "lime" => [0, 255, 0],
        "beige" => [245, 245, 220],
        "ivory" => [255, 255, 240],
        "tan" => [210, 180, 140],
        "tab:blue" => [31, 119, 180],
        "tab:orange" => [255, 127, 14],
        "tab:green" => [44, 160, 44],
        "tab:red" => [214, 39, 40],
        "tab:purple" => [148, 103, 189],
        "tab:brown" => [140, 86, 75],
        "tab:pink" => [227, 119, 194],
        "tab:gray" | "tab:grey" => [127, 127, 127],
        "tab:olive" => [188, 189, 34],
        "tab:cyan" => [23, 190, 207],
        _ => return None,
    };
    Some(Color::from_rgba8(r, g, b, u8::MAX))
}

/// Stroke end style for line primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    /// Square cap extending half the stroke width past each end.
    Projecting,
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
    pub cap: LineCap,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
            cap: LineCap::Butt,
        }
    }

    #[must_use]
    pub const fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn validate(self) -> ScaleBarResult<()> {
        if !self.x1.is_finite()
            || !self.y1.is_finite()
            || !self.x2.is_finite()
            || !self.y2.is_finite()
        {
            return Err(ScaleBarError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(ScaleBarError::InvalidData(
                "line stroke width must be finite and >= 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Draw command for one filled and optionally outlined rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_color: Color,
    pub border_color: Color,
    pub border_width: f64,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill_color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill_color,
            border_color: Color::TRANSPARENT,
            border_width: 0.0,
        }
    }

    #[must_use]
    pub const fn with_border(mut self, border_color: Color, border_width: f64) -> Self {
        self.border_color = border_color;
        self.border_width = border_width;
        self
    }

    pub fn validate(self) -> ScaleBarResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ScaleBarError::InvalidData(
                "rect coordinates must be finite".to_owned(),
            ));
        }
        if !self.width.is_finite() || !self.height.is_finite() || self.width < 0.0 || self.height < 0.0
        {
            return Err(ScaleBarError::InvalidData(
                "rect size must be finite and >= 0".to_owned(),
            ));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(ScaleBarError::InvalidData(
                "rect border width must be finite and >= 0".to_owned(),
            ));
        }
        self.fill_color.validate()?;
        self.border_color.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextHAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical text alignment relative to `TextPrimitive::y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextVAlign {
    Top,
    Center,
    /// Middle of the ascent above the baseline.
    CenterBaseline,
    Baseline,
    #[default]
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Numeric font weight on the 100..=900 CSS scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const REGULAR: Self = Self(400);
    pub const BOLD: Self = Self(700);

    pub fn parse(name: &str) -> ScaleBarResult<Self> {
        let weight = match name.trim().to_ascii_lowercase().as_str() {
            "ultralight" | "thin" => 100,
            "extra light" | "extralight" => 200,
            "light" => 300,
            "normal" | "regular" | "book" | "roman" => 400,
            "medium" => 500,
            "semibold" | "demibold" | "demi" => 600,
            "bold" => 700,
            "heavy" | "extra bold" | "extrabold" => 800,
            "black" => 900,
            other => other.parse::<u16>().map_err(|_| {
                ScaleBarError::config("fontweight", format!("unknown font weight `{name}`"))
            })?,
        };
        Self::from_numeric(weight)
    }

    pub fn from_numeric(weight: u16) -> ScaleBarResult<Self> {
        if weight > 1000 {
            return Err(ScaleBarError::config(
                "fontweight",
                format!("numeric font weight must be in [0, 1000], got {weight}"),
            ));
        }
        Ok(Self(weight))
    }

    #[must_use]
    pub const fn is_bold(self) -> bool {
        self.0 >= 600
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::REGULAR
    }
}

impl Serialize for FontWeight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.0)
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Numeric(u16),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Numeric(weight) => Self::from_numeric(weight),
            Raw::Name(name) => Self::parse(&name),
        }
        .map_err(serde::de::Error::custom)
    }
}

/// Generic font family; backends map it to a concrete face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    Serif,
    #[default]
    SansSerif,
    Cursive,
    Fantasy,
    Monospace,
}

impl FontFamily {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Serif => "serif",
            Self::SansSerif => "sans-serif",
            Self::Cursive => "cursive",
            Self::Fantasy => "fantasy",
            Self::Monospace => "monospace",
        }
    }
}

/// Font selection carried by text primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct FontSpec {
    pub family: FontFamily,
    pub style: FontStyle,
    pub weight: FontWeight,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    pub v_align: TextVAlign,
    pub font: FontSpec,
    /// Counter-clockwise rotation around the anchor, in degrees.
    pub rotation_deg: f64,
    /// Halo drawn behind the glyphs; zero disables it.
    pub stroke_width_px: f64,
    pub stroke_color: Color,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
            v_align: TextVAlign::default(),
            font: FontSpec::default(),
            rotation_deg: 0.0,
            stroke_width_px: 0.0,
            stroke_color: Color::TRANSPARENT,
        }
    }

    #[must_use]
    pub fn with_v_align(mut self, v_align: TextVAlign) -> Self {
        self.v_align = v_align;
        self
    }

    #[must_use]
    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke_width_px: f64, stroke_color: Color) -> Self {
        self.stroke_width_px = stroke_width_px;
        self.stroke_color = stroke_color;
        self
    }

    pub fn validate(&self) -> ScaleBarResult<()> {
        if self.text.is_empty() {
            return Err(ScaleBarError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() || !self.rotation_deg.is_finite() {
            return Err(ScaleBarError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ScaleBarError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        if !self.stroke_width_px.is_finite() || self.stroke_width_px < 0.0 {
            return Err(ScaleBarError::InvalidData(
                "text stroke width must be finite and >= 0".to_owned(),
            ));
        }
        self.color.validate()?;
        self.stroke_color.validate()
    }
}
