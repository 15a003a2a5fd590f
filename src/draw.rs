//! Backend-agnostic drawing commands. Pages are buffered as ordered command
//! lists so they can be replayed after pagination has finished.

use std::sync::Arc;

use serde::Deserialize;

use crate::error::{Error, Result, invalid};
use crate::fonts::FontStyle;
use crate::model::ImageAsset;
use crate::shapes::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Color = Color(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color(0, 0, 0);

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid(format!("colour {hex:?} is not #rrggbb")));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| invalid(format!("colour {hex:?} is not #rrggbb")))
        };
        Ok(Color(channel(0)?, channel(2)?, channel(4)?))
    }

    pub(crate) fn unit_rgb(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Color::from_hex(&value)
    }
}

/// Axis-aligned rectangle in PDF user space (origin bottom-left).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Paint {
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

impl Paint {
    pub fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    pub fn stroke(color: Color, width: f32) -> Self {
        Self {
            fill: None,
            stroke: Some(Stroke { color, width }),
        }
    }

    pub fn fill_and_stroke(fill: Color, stroke: Color, width: f32) -> Self {
        Self {
            fill: Some(fill),
            stroke: Some(Stroke {
                color: stroke,
                width,
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub x: f32,
    /// Baseline y.
    pub y: f32,
    pub text: String,
    pub font: FontStyle,
    pub size: f32,
    pub color: Color,
}

#[derive(Clone, Debug)]
pub enum DrawCommand {
    Rect { rect: Rect, paint: Paint },
    Polygon { points: Vec<Point>, paint: Paint },
    Circle { center: Point, radius: f32, paint: Paint },
    Line { from: Point, to: Point, stroke: Stroke },
    Text(TextRun),
    Image { asset: Arc<ImageAsset>, rect: Rect },
}

/// Ordered, replayable list of drawing commands for one page.
#[derive(Clone, Debug, Default)]
pub struct PageBuffer {
    commands: Vec<DrawCommand>,
}

impl PageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn extend(&mut self, other: &PageBuffer) {
        self.commands.extend(other.commands.iter().cloned());
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text(run) => Some(run),
            _ => None,
        })
    }

    pub fn rect(&mut self, rect: Rect, paint: Paint) {
        self.push(DrawCommand::Rect { rect, paint });
    }

    pub fn polygon(&mut self, points: &[Point], paint: Paint) {
        self.push(DrawCommand::Polygon {
            points: points.to_vec(),
            paint,
        });
    }

    pub fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.push(DrawCommand::Line { from, to, stroke });
    }

    pub fn text(&mut self, run: TextRun) {
        if !run.text.is_empty() {
            self.push(DrawCommand::Text(run));
        }
    }
}

/// Consumer of replayed pages. The PDF writer is one implementation; tests
/// use recording backends.
pub trait DrawingBackend {
    type Output;

    fn begin_page(&mut self, width: f32, height: f32) -> Result<()>;
    fn draw(&mut self, command: &DrawCommand) -> Result<()>;
    fn end_page(&mut self) -> Result<()>;
    fn finish(self) -> Result<Self::Output>;
}
