use serde::Deserialize;

use crate::draw::Color;
use crate::error::{Result, invalid};

pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

pub fn mm(value: f32) -> f32 {
    value * POINTS_PER_MM
}

pub const A4_WIDTH: f32 = 595.2756;
pub const A4_HEIGHT: f32 = 841.8898;

/// Relative column widths. Each list must sum to 1.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ContentColumnRatios {
    /// Label / value split inside one key-value slot.
    pub key_value: [f32; 2],
    /// Label / stars split of a rating row.
    pub rating: [f32; 2],
    /// Brand / title / meta columns of the header.
    pub header: [f32; 3],
}

impl Default for ContentColumnRatios {
    fn default() -> Self {
        Self {
            key_value: [0.4, 0.6],
            rating: [0.36, 0.64],
            header: [0.345, 0.46, 0.195],
        }
    }
}

fn check_ratios(name: &str, ratios: &[f32]) -> Result<()> {
    if ratios.iter().any(|r| !r.is_finite() || *r <= 0.0) {
        return Err(invalid(format!("column ratios {name} must be positive: {ratios:?}")));
    }
    let sum: f32 = ratios.iter().sum();
    if (sum - 1.0).abs() > 1e-3 {
        return Err(invalid(format!("column ratios {name} sum to {sum}, expected 1")));
    }
    Ok(())
}

/// Fixed page shape. Top and bottom margins are both `margin`; the footer
/// band sits directly above the bottom margin.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub footer_band_height: f32,
    pub content_column_ratios: ContentColumnRatios,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin: mm(18.0),
            footer_band_height: mm(15.0),
            content_column_ratios: ContentColumnRatios::default(),
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Vertical space available to content on every page.
    pub fn usable_height(&self) -> f32 {
        self.page_height - 2.0 * self.margin - self.footer_band_height
    }

    /// Largest cursor value (measured from the page top) content may reach.
    pub fn content_limit(&self) -> f32 {
        self.page_height - self.margin - self.footer_band_height
    }

    pub fn validate(&self) -> Result<()> {
        let dims = [
            ("pageWidth", self.page_width),
            ("pageHeight", self.page_height),
            ("margin", self.margin),
            ("footerBandHeight", self.footer_band_height),
        ];
        for (name, v) in dims {
            if !v.is_finite() || v < 0.0 {
                return Err(invalid(format!("{name} must be finite and non-negative, got {v}")));
            }
        }
        if self.content_width() <= 0.0 || self.usable_height() <= 0.0 {
            return Err(invalid(format!(
                "page {}x{} leaves no content area with margin {} and footer band {}",
                self.page_width, self.page_height, self.margin, self.footer_band_height
            )));
        }
        let ratios = &self.content_column_ratios;
        check_ratios("keyValue", &ratios.key_value)?;
        check_ratios("rating", &ratios.rating)?;
        check_ratios("header", &ratios.header)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Palette {
    pub primary: Color,
    pub accent: Color,
    pub text: Color,
    pub label: Color,
    pub meta: Color,
    pub footer_text: Color,
    pub page_background: Color,
    pub card_background: Color,
    pub border: Color,
    pub star_fill: Color,
    pub star_stroke: Color,
    pub star_empty_fill: Color,
    pub star_empty_stroke: Color,
    pub rating_caption: Color,
    pub icon_detail: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Color(0x00, 0x4a, 0x99),
            accent: Color(0x3b, 0x82, 0xf6),
            text: Color::BLACK,
            label: Color(0x4a, 0x4a, 0x4a),
            meta: Color(0x55, 0x55, 0x55),
            footer_text: Color(0x66, 0x66, 0x66),
            page_background: Color(0xe8, 0xf4, 0xf8),
            card_background: Color::WHITE,
            border: Color(0xe0, 0xe0, 0xe0),
            star_fill: Color(0xfb, 0xbf, 0x24),
            star_stroke: Color(0xf5, 0x9e, 0x0b),
            star_empty_fill: Color(0xf3, 0xf4, 0xf6),
            star_empty_stroke: Color(0xd1, 0xd5, 0xdb),
            rating_caption: Color(0x6b, 0x72, 0x80),
            icon_detail: Color::WHITE,
        }
    }
}

/// Font sizes in points.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Typography {
    pub title: f32,
    pub section: f32,
    pub body: f32,
    pub small: f32,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            title: 13.5,
            section: 10.5,
            body: 9.0,
            small: 8.25,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Email,
    Phone,
    Web,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactItem {
    pub kind: ContactKind,
    pub text: String,
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IconStyle {
    #[default]
    Filled,
    Outline,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branding {
    pub brand_text: String,
    pub report_title: String,
    /// Left, center and right footer items.
    pub contacts: [ContactItem; 3],
    pub disclaimer: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            brand_text: "InspectionWale\nRebranded from Whizzcheck".into(),
            report_title: "Vehicle Inspection Report".into(),
            contacts: [
                ContactItem {
                    kind: ContactKind::Email,
                    text: "hello@inspectionwale.com".into(),
                    color: Color(0xef, 0x44, 0x44),
                },
                ContactItem {
                    kind: ContactKind::Phone,
                    text: "9167558998".into(),
                    color: Color(0x22, 0xc5, 0x5e),
                },
                ContactItem {
                    kind: ContactKind::Web,
                    text: "inspectionwale.com".into(),
                    color: Color(0x3b, 0x82, 0xf6),
                },
            ],
            disclaimer: "Professional vehicle inspection report. Valid for 2 days or 20 km.".into(),
        }
    }
}

pub const MIN_SMALL_FONT_SIZE: f32 = 2.0;

/// Visual variation injected into the single layout engine.
#[derive(Clone, Debug, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    pub palette: Palette,
    pub typography: Typography,
    pub branding: Branding,
    pub icon_style: IconStyle,
}

impl Style {
    pub fn validate(&self) -> Result<()> {
        let t = &self.typography;
        for (name, size) in [
            ("title", t.title),
            ("section", t.section),
            ("body", t.body),
            ("small", t.small),
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(invalid(format!("font size {name} must be positive, got {size}")));
            }
        }
        // Footer label and disclaimer are set 1pt and 2pt below `small`.
        if t.small <= MIN_SMALL_FONT_SIZE {
            return Err(invalid(format!(
                "font size small must exceed {MIN_SMALL_FONT_SIZE}, got {}",
                t.small
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportConfig {
    pub geometry: PageGeometry,
    pub style: Style,
}

impl ReportConfig {
    /// Parse a JSON configuration; omitted sections fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ReportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        self.style.validate()
    }
}
