// File: crates/linetool-core/src/options.rs
// Summary: Style option records, per-kind defaults and the array-aware deep merge.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use skia_safe as skia;

use crate::tool::kind::ToolKind;

pub const DEFAULT_FONT_FAMILY: &str = "Trebuchet MS, Roboto, Ubuntu, sans-serif";

// ---- color ------------------------------------------------------------------

/// RGBA color serialized as `#rrggbb` / `#rrggbbaa`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with the alpha channel replaced by `alpha` in [0, 1].
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8, ..self }
    }

    pub fn to_skia(self) -> skia::Color {
        skia::Color::from_argb(self.a, self.r, self.g, self.b)
    }

    pub fn parse(text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#')?;
        let value = u32::from_str_radix(hex, 16).ok()?;
        match hex.len() {
            6 => Some(Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)),
            8 => Some(Self::rgba((value >> 24) as u8, (value >> 16) as u8, (value >> 8) as u8, value as u8)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Color::parse(&text).ok_or_else(|| serde::de::Error::custom(format!("invalid color: {text}")))
    }
}

// ---- style enums ------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LineStyle {
    Solid,
    Dotted,
    Dashed,
    LargeDashed,
    SparseDotted,
    SmallDashed,
}

impl LineStyle {
    /// Dash intervals in multiples of the (scaled) line width.
    pub fn dash_pattern(self, line_width: f64) -> Vec<f32> {
        let w = line_width as f32;
        match self {
            LineStyle::Solid => Vec::new(),
            LineStyle::Dotted => vec![w, w],
            LineStyle::Dashed => vec![2.0 * w, 2.0 * w],
            LineStyle::LargeDashed => vec![6.0 * w, 6.0 * w],
            LineStyle::SparseDotted => vec![w, 4.0 * w],
            LineStyle::SmallDashed => vec![2.0 * w, w],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LineEnd {
    Normal,
    Arrow,
    Circle,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LineJoin {
    Bevel,
    Round,
    Miter,
}

impl LineJoin {
    pub fn to_skia(self) -> skia::paint::Join {
        match self {
            LineJoin::Bevel => skia::paint::Join::Bevel,
            LineJoin::Round => skia::paint::Join::Round,
            LineJoin::Miter => skia::paint::Join::Miter,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn to_skia(self) -> skia::paint::Cap {
        match self {
            LineCap::Butt => skia::paint::Cap::Butt,
            LineCap::Round => skia::paint::Cap::Round,
            LineCap::Square => skia::paint::Cap::Square,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TextAlignment {
    Start,
    Center,
    End,
    Left,
    Right,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BoxVerticalAlignment {
    Top,
    Middle,
    Bottom,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BoxHorizontalAlignment {
    Left,
    Center,
    Right,
}

// ---- nested records ---------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ExtendOptions {
    pub left: bool,
    pub right: bool,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct EndOptions {
    pub left: LineEnd,
    pub right: LineEnd,
}

impl Default for EndOptions {
    fn default() -> Self {
        Self { left: LineEnd::Normal, right: LineEnd::Normal }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct ShadowOptions {
    pub blur: f64,
    pub color: Color,
    pub offset: Vec2,
}

impl Default for ShadowOptions {
    fn default() -> Self {
        Self { blur: 0.0, color: Color::rgb(255, 255, 255), offset: Vec2::default() }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct BorderOptions {
    pub color: Color,
    pub width: f64,
    pub radius: f64,
    pub highlight: bool,
    pub style: LineStyle,
}

impl Default for BorderOptions {
    fn default() -> Self {
        Self { color: Color::rgb(0x29, 0x62, 0xff), width: 1.0, radius: 0.0, highlight: false, style: LineStyle::Solid }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct BackgroundOptions {
    pub color: Color,
    pub inflation: Vec2,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self { color: Color::rgb(0x29, 0x62, 0xff).with_alpha(0.2), inflation: Vec2::default() }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct BoxAlignment {
    pub vertical: BoxVerticalAlignment,
    pub horizontal: BoxHorizontalAlignment,
}

impl Default for BoxAlignment {
    fn default() -> Self {
        Self { vertical: BoxVerticalAlignment::Top, horizontal: BoxHorizontalAlignment::Left }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TextBoxOptions {
    pub alignment: BoxAlignment,
    pub angle: f64,
    pub scale: f64,
    pub offset: Option<Vec2>,
    pub padding: Option<Vec2>,
    pub max_height: Option<f64>,
    pub shadow: Option<ShadowOptions>,
    pub border: Option<BorderOptions>,
    pub background: Option<BackgroundOptions>,
}

impl Default for TextBoxOptions {
    fn default() -> Self {
        Self {
            alignment: BoxAlignment::default(),
            angle: 0.0,
            scale: 1.0,
            offset: None,
            padding: None,
            max_height: None,
            shadow: None,
            border: None,
            background: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TextFontOptions {
    pub color: Color,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub family: String,
}

impl Default for TextFontOptions {
    fn default() -> Self {
        Self {
            color: Color::rgb(0x29, 0x62, 0xff),
            size: 12.0,
            bold: false,
            italic: false,
            family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TextOptions {
    pub value: String,
    pub alignment: TextAlignment,
    pub font: TextFontOptions,
    #[serde(rename = "box")]
    pub box_layout: TextBoxOptions,
    pub padding: f64,
    pub word_wrap_width: f64,
    pub force_text_align: bool,
    pub force_calculate_max_line_width: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            value: String::new(),
            alignment: TextAlignment::Left,
            font: TextFontOptions::default(),
            box_layout: TextBoxOptions::default(),
            padding: 0.0,
            word_wrap_width: 0.0,
            force_text_align: false,
            force_calculate_max_line_width: false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LineOptions {
    pub color: Color,
    pub width: f64,
    pub style: LineStyle,
    pub join: LineJoin,
    pub cap: LineCap,
    pub end: EndOptions,
    pub extend: ExtendOptions,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            color: Color::rgb(0x29, 0x62, 0xff),
            width: 1.0,
            style: LineStyle::Solid,
            join: LineJoin::Miter,
            cap: LineCap::Butt,
            end: EndOptions::default(),
            extend: ExtendOptions::default(),
        }
    }
}

/// Background + border + per-side extension shared by rectangle-like shapes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ShapeOptions {
    pub background: Option<BackgroundOptions>,
    pub border: Option<BorderOptions>,
    pub extend: ExtendOptions,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        let purple = Color::rgb(0x9c, 0x27, 0xb0);
        Self {
            background: Some(BackgroundOptions { color: purple.with_alpha(0.2), inflation: Vec2::default() }),
            border: Some(BorderOptions { color: purple, ..BorderOptions::default() }),
            extend: ExtendOptions::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PriceRangeShapeOptions {
    pub background: Option<BackgroundOptions>,
    pub border: Option<BorderOptions>,
    pub extend: ExtendOptions,
    pub show_center_vertical_line: bool,
    pub show_center_horizontal_line: bool,
    pub center_horizontal_line_width: f64,
    pub center_horizontal_line_style: LineStyle,
}

impl Default for PriceRangeShapeOptions {
    fn default() -> Self {
        let base = ShapeOptions::default();
        Self {
            background: base.background,
            border: base.border,
            extend: ExtendOptions::default(),
            show_center_vertical_line: true,
            show_center_horizontal_line: false,
            center_horizontal_line_width: 1.0,
            center_horizontal_line_style: LineStyle::Dashed,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FibLevel {
    pub coeff: f64,
    pub color: Color,
    pub opacity: f64,
    pub distance_from_coeff_enabled: bool,
    pub distance_from_coeff: f64,
}

impl Default for FibLevel {
    fn default() -> Self {
        Self {
            coeff: 0.0,
            color: Color::rgb(0x78, 0x7b, 0x86),
            opacity: 0.0,
            distance_from_coeff_enabled: false,
            distance_from_coeff: 0.0,
        }
    }
}

fn fib_level(coeff: f64, color: Color) -> FibLevel {
    FibLevel { coeff, color, ..FibLevel::default() }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DepthCalcMethod {
    /// Scale both sides against the larger of the two maxima.
    Combined,
    /// Scale bids and asks against their own maxima.
    Independent,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct DepthLevel {
    pub price: f64,
    pub total_size: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct MarketDepthData {
    pub bids: Vec<DepthLevel>,
    pub asks: Vec<DepthLevel>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketDepthOptions {
    pub line_length: f64,
    pub line_width: f64,
    pub line_style: LineStyle,
    pub line_bid_color: Color,
    pub line_ask_color: Color,
    pub line_offset: f64,
    pub timestamp_start_offset: f64,
    pub total_calc_method: DepthCalcMethod,
    pub data: MarketDepthData,
}

impl Default for MarketDepthOptions {
    fn default() -> Self {
        Self {
            line_length: 100.0,
            line_width: 1.0,
            line_style: LineStyle::Solid,
            line_bid_color: Color::rgb(0x08, 0x99, 0x81),
            line_ask_color: Color::rgb(0xf2, 0x36, 0x45),
            line_offset: 0.0,
            timestamp_start_offset: 0.0,
            total_calc_method: DepthCalcMethod::Combined,
            data: MarketDepthData::default(),
        }
    }
}

// ---- per-tool option records ------------------------------------------------

/// Line plus optional label; trend-line family, axis lines and callout.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LineLabelToolOptions {
    pub visible: bool,
    pub editable: bool,
    pub line: LineOptions,
    pub text: TextOptions,
}

impl Default for LineLabelToolOptions {
    fn default() -> Self {
        Self { visible: true, editable: true, line: LineOptions::default(), text: TextOptions::default() }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CrossLineToolOptions {
    pub visible: bool,
    pub editable: bool,
    pub line: LineOptions,
}

impl Default for CrossLineToolOptions {
    fn default() -> Self {
        Self { visible: true, editable: true, line: LineOptions::default() }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ParallelChannelToolOptions {
    pub visible: bool,
    pub editable: bool,
    pub channel_line: LineOptions,
    pub middle_line: LineOptions,
    pub show_middle_line: bool,
    pub extend: ExtendOptions,
    pub background: Option<BackgroundOptions>,
}

impl Default for ParallelChannelToolOptions {
    fn default() -> Self {
        let blue = Color::rgb(0x29, 0x62, 0xff);
        Self {
            visible: true,
            editable: true,
            channel_line: LineOptions::default(),
            middle_line: LineOptions { style: LineStyle::Dashed, ..LineOptions::default() },
            show_middle_line: true,
            extend: ExtendOptions::default(),
            background: Some(BackgroundOptions { color: blue.with_alpha(0.2), inflation: Vec2::default() }),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct FibRetracementToolOptions {
    pub visible: bool,
    pub editable: bool,
    pub line: LineOptions,
    pub extend: ExtendOptions,
    pub levels: Vec<FibLevel>,
}

impl Default for FibRetracementToolOptions {
    fn default() -> Self {
        Self {
            visible: true,
            editable: true,
            line: LineOptions::default(),
            extend: ExtendOptions::default(),
            levels: vec![
                fib_level(0.0, Color::rgb(0x78, 0x7b, 0x86)),
                fib_level(0.236, Color::rgb(0xf2, 0x36, 0x45)),
                fib_level(0.382, Color::rgb(0x81, 0xc7, 0x84)),
                fib_level(0.5, Color::rgb(0x4c, 0xaf, 0x50)),
                fib_level(0.618, Color::rgb(0x08, 0x99, 0x81)),
                fib_level(0.786, Color::rgb(0x64, 0xb5, 0xf6)),
                fib_level(1.0, Color::rgb(0x78, 0x7b, 0x86)),
                fib_level(1.618, Color::rgb(0x29, 0x62, 0xff)),
                fib_level(2.618, Color::rgb(0xf2, 0x36, 0x45)),
                fib_level(3.618, Color::rgb(0x9c, 0x27, 0xb0)),
                fib_level(4.236, Color::rgb(0xe9, 0x1e, 0x63)),
            ],
        }
    }
}

/// Rectangle and circle: a shape record plus an optional label.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ShapeToolOptions {
    pub visible: bool,
    pub editable: bool,
    pub shape: ShapeOptions,
    pub text: TextOptions,
}

impl Default for ShapeToolOptions {
    fn default() -> Self {
        Self { visible: true, editable: true, shape: ShapeOptions::default(), text: TextOptions::default() }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PriceRangeToolOptions {
    pub visible: bool,
    pub editable: bool,
    pub price_range: PriceRangeShapeOptions,
    pub text: TextOptions,
}

impl Default for PriceRangeToolOptions {
    fn default() -> Self {
        Self {
            visible: true,
            editable: true,
            price_range: PriceRangeShapeOptions::default(),
            text: TextOptions::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TriangleToolOptions {
    pub visible: bool,
    pub editable: bool,
    pub triangle: ShapeOptions,
}

impl Default for TriangleToolOptions {
    fn default() -> Self {
        let orange = Color::rgb(0xf5, 0x7c, 0x00);
        Self {
            visible: true,
            editable: true,
            triangle: ShapeOptions {
                background: Some(BackgroundOptions { color: orange.with_alpha(0.2), inflation: Vec2::default() }),
                border: Some(BorderOptions { color: orange, ..BorderOptions::default() }),
                extend: ExtendOptions::default(),
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionToolOptions {
    pub visible: bool,
    pub editable: bool,
    pub entry_stop_rectangle: ShapeOptions,
    pub entry_target_rectangle: ShapeOptions,
    pub entry_stop_text: TextOptions,
    pub entry_target_text: TextOptions,
}

impl Default for PositionToolOptions {
    fn default() -> Self {
        let red = Color::rgb(0xf2, 0x36, 0x45);
        let green = Color::rgb(0x08, 0x99, 0x81);
        let stop_rect = ShapeOptions {
            background: Some(BackgroundOptions { color: red.with_alpha(0.2), inflation: Vec2::default() }),
            border: Some(BorderOptions { color: red, ..BorderOptions::default() }),
            extend: ExtendOptions::default(),
        };
        let target_rect = ShapeOptions {
            background: Some(BackgroundOptions { color: green.with_alpha(0.2), inflation: Vec2::default() }),
            border: Some(BorderOptions { color: green, ..BorderOptions::default() }),
            extend: ExtendOptions::default(),
        };
        let label = |color: Color| TextOptions {
            font: TextFontOptions { color, size: 11.0, ..TextFontOptions::default() },
            alignment: TextAlignment::Center,
            box_layout: TextBoxOptions {
                alignment: BoxAlignment { vertical: BoxVerticalAlignment::Middle, horizontal: BoxHorizontalAlignment::Center },
                ..TextBoxOptions::default()
            },
            ..TextOptions::default()
        };
        Self {
            visible: true,
            editable: true,
            entry_stop_rectangle: stop_rect,
            entry_target_rectangle: target_rect,
            entry_stop_text: label(red),
            entry_target_text: label(green),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BrushToolOptions {
    pub visible: bool,
    pub editable: bool,
    pub line: LineOptions,
    pub background: Option<BackgroundOptions>,
}

impl Default for BrushToolOptions {
    fn default() -> Self {
        Self {
            visible: true,
            editable: true,
            line: LineOptions {
                color: Color::rgb(0x00, 0xbc, 0xd4),
                join: LineJoin::Round,
                ..LineOptions::default()
            },
            background: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PathToolOptions {
    pub visible: bool,
    pub editable: bool,
    pub line: LineOptions,
}

impl Default for PathToolOptions {
    fn default() -> Self {
        Self { visible: true, editable: true, line: LineOptions::default() }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TextToolOptions {
    pub visible: bool,
    pub editable: bool,
    pub text: TextOptions,
}

impl Default for TextToolOptions {
    fn default() -> Self {
        Self {
            visible: true,
            editable: true,
            text: TextOptions { value: "Text".to_string(), ..TextOptions::default() },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketDepthToolOptions {
    pub visible: bool,
    pub editable: bool,
    pub text: TextOptions,
    pub market_depth: MarketDepthOptions,
}

impl Default for MarketDepthToolOptions {
    fn default() -> Self {
        Self {
            visible: true,
            editable: true,
            text: TextOptions {
                font: TextFontOptions { size: 11.0, ..TextFontOptions::default() },
                ..TextOptions::default()
            },
            market_depth: MarketDepthOptions::default(),
        }
    }
}

// ---- tool options union -----------------------------------------------------

/// Options payload for one tool instance, keyed by option shape. Several tool
/// kinds share a shape and differ only in their defaults.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolOptions {
    Line(LineLabelToolOptions),
    CrossLine(CrossLineToolOptions),
    ParallelChannel(ParallelChannelToolOptions),
    FibRetracement(FibRetracementToolOptions),
    Shape(ShapeToolOptions),
    PriceRange(PriceRangeToolOptions),
    Triangle(TriangleToolOptions),
    Position(PositionToolOptions),
    Brush(BrushToolOptions),
    Path(PathToolOptions),
    Text(TextToolOptions),
    MarketDepth(MarketDepthToolOptions),
}

macro_rules! each_options {
    ($self:expr, $o:ident => $body:expr) => {
        match $self {
            ToolOptions::Line($o) => $body,
            ToolOptions::CrossLine($o) => $body,
            ToolOptions::ParallelChannel($o) => $body,
            ToolOptions::FibRetracement($o) => $body,
            ToolOptions::Shape($o) => $body,
            ToolOptions::PriceRange($o) => $body,
            ToolOptions::Triangle($o) => $body,
            ToolOptions::Position($o) => $body,
            ToolOptions::Brush($o) => $body,
            ToolOptions::Path($o) => $body,
            ToolOptions::Text($o) => $body,
            ToolOptions::MarketDepth($o) => $body,
        }
    };
}

impl ToolOptions {
    pub fn visible(&self) -> bool {
        each_options!(self, o => o.visible)
    }

    pub fn editable(&self) -> bool {
        each_options!(self, o => o.editable)
    }

    pub fn to_value(&self) -> Value {
        each_options!(self, o => serde_json::to_value(o).expect("options serialize to JSON"))
    }

    /// Defaults for a tool kind, faithful to the original defaults table.
    pub fn defaults_for(kind: ToolKind) -> ToolOptions {
        match kind {
            ToolKind::TrendLine => ToolOptions::Line(LineLabelToolOptions::default()),
            ToolKind::Ray => ToolOptions::Line(LineLabelToolOptions {
                line: LineOptions { extend: ExtendOptions { left: false, right: true }, ..LineOptions::default() },
                ..LineLabelToolOptions::default()
            }),
            ToolKind::Arrow => ToolOptions::Line(LineLabelToolOptions {
                line: LineOptions {
                    end: EndOptions { left: LineEnd::Normal, right: LineEnd::Arrow },
                    ..LineOptions::default()
                },
                ..LineLabelToolOptions::default()
            }),
            ToolKind::ExtendedLine => ToolOptions::Line(LineLabelToolOptions {
                line: LineOptions { extend: ExtendOptions { left: true, right: true }, ..LineOptions::default() },
                ..LineLabelToolOptions::default()
            }),
            ToolKind::HorizontalLine => ToolOptions::Line(LineLabelToolOptions {
                line: LineOptions { extend: ExtendOptions { left: true, right: true }, ..LineOptions::default() },
                ..LineLabelToolOptions::default()
            }),
            ToolKind::HorizontalRay => ToolOptions::Line(LineLabelToolOptions {
                line: LineOptions { extend: ExtendOptions { left: false, right: true }, ..LineOptions::default() },
                ..LineLabelToolOptions::default()
            }),
            ToolKind::VerticalLine => ToolOptions::Line(LineLabelToolOptions::default()),
            ToolKind::CrossLine => ToolOptions::CrossLine(CrossLineToolOptions::default()),
            ToolKind::Callout => ToolOptions::Line(callout_defaults()),
            ToolKind::ParallelChannel => ToolOptions::ParallelChannel(ParallelChannelToolOptions::default()),
            ToolKind::FibRetracement => ToolOptions::FibRetracement(FibRetracementToolOptions::default()),
            ToolKind::Rectangle | ToolKind::Circle => ToolOptions::Shape(ShapeToolOptions::default()),
            ToolKind::PriceRange => ToolOptions::PriceRange(PriceRangeToolOptions::default()),
            ToolKind::Triangle => ToolOptions::Triangle(TriangleToolOptions::default()),
            ToolKind::LongShortPosition => ToolOptions::Position(PositionToolOptions::default()),
            ToolKind::Brush => ToolOptions::Brush(BrushToolOptions::default()),
            ToolKind::Highlighter => ToolOptions::Brush(BrushToolOptions {
                line: LineOptions {
                    color: Color::rgb(0xf2, 0x36, 0x45).with_alpha(0.15),
                    width: 20.0,
                    join: LineJoin::Round,
                    cap: LineCap::Round,
                    ..LineOptions::default()
                },
                ..BrushToolOptions::default()
            }),
            ToolKind::Path => ToolOptions::Path(PathToolOptions::default()),
            ToolKind::Text => ToolOptions::Text(TextToolOptions::default()),
            ToolKind::MarketDepth => ToolOptions::MarketDepth(MarketDepthToolOptions::default()),
        }
    }

    /// Defaults for `kind` overlaid with a partial options payload.
    pub fn from_value(kind: ToolKind, patch: &Value) -> Result<ToolOptions, serde_json::Error> {
        let defaults = Self::defaults_for(kind);
        let mut base = defaults.to_value();
        merge_values(&mut base, patch);
        Self::shape_from_value(kind, base)
    }

    /// Merge a partial payload into these options in place.
    pub fn apply(&mut self, patch: &Value) -> Result<(), serde_json::Error> {
        let mut base = self.to_value();
        merge_values(&mut base, patch);
        let updated = Self::shape_from_value_like(self, base)?;
        *self = updated;
        Ok(())
    }

    fn shape_from_value(kind: ToolKind, value: Value) -> Result<ToolOptions, serde_json::Error> {
        Ok(match Self::defaults_for(kind) {
            ToolOptions::Line(_) => ToolOptions::Line(serde_json::from_value(value)?),
            ToolOptions::CrossLine(_) => ToolOptions::CrossLine(serde_json::from_value(value)?),
            ToolOptions::ParallelChannel(_) => ToolOptions::ParallelChannel(serde_json::from_value(value)?),
            ToolOptions::FibRetracement(_) => ToolOptions::FibRetracement(serde_json::from_value(value)?),
            ToolOptions::Shape(_) => ToolOptions::Shape(serde_json::from_value(value)?),
            ToolOptions::PriceRange(_) => ToolOptions::PriceRange(serde_json::from_value(value)?),
            ToolOptions::Triangle(_) => ToolOptions::Triangle(serde_json::from_value(value)?),
            ToolOptions::Position(_) => ToolOptions::Position(serde_json::from_value(value)?),
            ToolOptions::Brush(_) => ToolOptions::Brush(serde_json::from_value(value)?),
            ToolOptions::Path(_) => ToolOptions::Path(serde_json::from_value(value)?),
            ToolOptions::Text(_) => ToolOptions::Text(serde_json::from_value(value)?),
            ToolOptions::MarketDepth(_) => ToolOptions::MarketDepth(serde_json::from_value(value)?),
        })
    }

    fn shape_from_value_like(like: &ToolOptions, value: Value) -> Result<ToolOptions, serde_json::Error> {
        Ok(match like {
            ToolOptions::Line(_) => ToolOptions::Line(serde_json::from_value(value)?),
            ToolOptions::CrossLine(_) => ToolOptions::CrossLine(serde_json::from_value(value)?),
            ToolOptions::ParallelChannel(_) => ToolOptions::ParallelChannel(serde_json::from_value(value)?),
            ToolOptions::FibRetracement(_) => ToolOptions::FibRetracement(serde_json::from_value(value)?),
            ToolOptions::Shape(_) => ToolOptions::Shape(serde_json::from_value(value)?),
            ToolOptions::PriceRange(_) => ToolOptions::PriceRange(serde_json::from_value(value)?),
            ToolOptions::Triangle(_) => ToolOptions::Triangle(serde_json::from_value(value)?),
            ToolOptions::Position(_) => ToolOptions::Position(serde_json::from_value(value)?),
            ToolOptions::Brush(_) => ToolOptions::Brush(serde_json::from_value(value)?),
            ToolOptions::Path(_) => ToolOptions::Path(serde_json::from_value(value)?),
            ToolOptions::Text(_) => ToolOptions::Text(serde_json::from_value(value)?),
            ToolOptions::MarketDepth(_) => ToolOptions::MarketDepth(serde_json::from_value(value)?),
        })
    }
}

macro_rules! options_accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub fn $name(&self) -> Option<&$ty> {
            match self {
                ToolOptions::$variant(inner) => Some(inner),
                _ => None,
            }
        }
    };
}

impl ToolOptions {
    options_accessor!(as_line, Line, LineLabelToolOptions);
    options_accessor!(as_cross_line, CrossLine, CrossLineToolOptions);
    options_accessor!(as_channel, ParallelChannel, ParallelChannelToolOptions);
    options_accessor!(as_fib, FibRetracement, FibRetracementToolOptions);
    options_accessor!(as_shape, Shape, ShapeToolOptions);
    options_accessor!(as_price_range, PriceRange, PriceRangeToolOptions);
    options_accessor!(as_triangle, Triangle, TriangleToolOptions);
    options_accessor!(as_position, Position, PositionToolOptions);
    options_accessor!(as_brush, Brush, BrushToolOptions);
    options_accessor!(as_path, Path, PathToolOptions);
    options_accessor!(as_text, Text, TextToolOptions);
    options_accessor!(as_market_depth, MarketDepth, MarketDepthToolOptions);
}

fn callout_defaults() -> LineLabelToolOptions {
    let blue = Color::rgba(74, 144, 226, 255);
    LineLabelToolOptions {
        visible: true,
        editable: true,
        line: LineOptions {
            width: 2.0,
            color: blue,
            end: EndOptions { left: LineEnd::Arrow, right: LineEnd::Normal },
            ..LineOptions::default()
        },
        text: TextOptions {
            value: "this is some text".to_string(),
            word_wrap_width: 150.0,
            force_calculate_max_line_width: true,
            font: TextFontOptions { color: Color::rgb(255, 255, 255), size: 14.0, ..TextFontOptions::default() },
            box_layout: TextBoxOptions {
                alignment: BoxAlignment {
                    vertical: BoxVerticalAlignment::Middle,
                    horizontal: BoxHorizontalAlignment::Center,
                },
                offset: Some(Vec2::default()),
                padding: Some(Vec2::default()),
                max_height: Some(500.0),
                shadow: Some(ShadowOptions::default()),
                border: Some(BorderOptions { color: blue, width: 4.0, radius: 20.0, ..BorderOptions::default() }),
                background: Some(BackgroundOptions {
                    color: Color::rgba(19, 73, 133, 255),
                    inflation: Vec2::new(10.0, 10.0),
                }),
                ..TextBoxOptions::default()
            },
            ..TextOptions::default()
        },
    }
}

// ---- deep merge -------------------------------------------------------------

/// Deep merge of `src` into `dst`.
///
/// Arrays merge index-wise and a shorter source array truncates the
/// destination, so no stale tail elements survive the merge.
pub fn merge_values(dst: &mut Value, src: &Value) {
    match (dst, src) {
        (Value::Object(dst_map), Value::Object(src_map)) => {
            for (key, src_value) in src_map {
                match dst_map.get_mut(key) {
                    Some(dst_value) => merge_values(dst_value, src_value),
                    None => {
                        dst_map.insert(key.clone(), src_value.clone());
                    }
                }
            }
        }
        (Value::Array(dst_items), Value::Array(src_items)) => {
            if src_items.len() < dst_items.len() {
                dst_items.truncate(src_items.len());
            }
            for (i, src_item) in src_items.iter().enumerate() {
                if i < dst_items.len() {
                    merge_values(&mut dst_items[i], src_item);
                } else {
                    dst_items.push(src_item.clone());
                }
            }
        }
        (dst_slot, src_value) => {
            *dst_slot = src_value.clone();
        }
    }
}
