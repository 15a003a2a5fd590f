//! Parametric vector shapes: rating stars and the small contact icons drawn in
//! the footer. Everything here is pure geometry; colour is applied by callers.

use crate::error::{Result, invalid};

pub const STAR_POINTS: usize = 10;
pub const INNER_RADIUS_RATIO: f32 = 0.4;
pub const MAX_RATING: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

fn star_vertex(cx: f32, cy: f32, radius: f32, i: usize) -> Point {
    let angle = ((i as f32) * 36.0 - 90.0).to_radians();
    let r = if i % 2 == 0 {
        radius
    } else {
        radius * INNER_RADIUS_RATIO
    };
    Point::new(cx + r * angle.cos(), cy + r * angle.sin())
}

/// Five-pointed star as 10 vertices alternating outer and inner radius,
/// starting at -90° and advancing 36° per vertex.
pub fn star(cx: f32, cy: f32, radius: f32) -> [Point; STAR_POINTS] {
    std::array::from_fn(|i| star_vertex(cx, cy, radius, i))
}

/// Left half of `star`: vertices 5..=9 followed by vertex 0.
/// Vertices 0 and 5 sit on the vertical axis, so this closes cleanly.
pub fn half_star(cx: f32, cy: f32, radius: f32) -> [Point; 6] {
    std::array::from_fn(|i| star_vertex(cx, cy, radius, (i + 5) % STAR_POINTS))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StarCounts {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl StarCounts {
    pub fn total(&self) -> u8 {
        self.full + u8::from(self.half) + self.empty
    }
}

/// Split a 0..=5 score into full, half and empty stars.
pub fn rating_to_stars(score: f32) -> Result<StarCounts> {
    if !score.is_finite() || !(0.0..=MAX_RATING).contains(&score) {
        return Err(invalid(format!("rating {score} is outside 0..=5")));
    }
    let full = score.floor();
    let half = score - full >= 0.5;
    let full = full as u8;
    Ok(StarCounts {
        full,
        half,
        empty: 5 - full - u8::from(half),
    })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Rect { x: f32, y: f32, width: f32, height: f32 },
    Circle { center: Point, radius: f32 },
    Line { from: Point, to: Point },
}

/// Which colour slot of an icon a mark uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconLayer {
    Base,
    Detail,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mark {
    pub shape: Primitive,
    pub layer: IconLayer,
    pub filled: bool,
}

fn mark(shape: Primitive, layer: IconLayer, filled: bool) -> Mark {
    Mark {
        shape,
        layer,
        filled,
    }
}

/// Envelope: filled body, outlined flap with a V fold. `size` is the body width.
pub fn envelope_icon(center: Point, size: f32) -> Vec<Mark> {
    let (w, h) = (size, size * 0.75);
    let (iw, ih) = (w * 0.75, h * 0.66);
    let (ix, iy) = (center.x - iw / 2.0, center.y - ih / 2.0);
    let fold = Point::new(center.x, center.y - ih * 0.1);
    vec![
        mark(
            Primitive::Rect {
                x: center.x - w / 2.0,
                y: center.y - h / 2.0,
                width: w,
                height: h,
            },
            IconLayer::Base,
            true,
        ),
        mark(
            Primitive::Rect {
                x: ix,
                y: iy,
                width: iw,
                height: ih,
            },
            IconLayer::Detail,
            false,
        ),
        mark(
            Primitive::Line {
                from: Point::new(ix, iy + ih),
                to: fold,
            },
            IconLayer::Detail,
            false,
        ),
        mark(
            Primitive::Line {
                from: Point::new(ix + iw, iy + ih),
                to: fold,
            },
            IconLayer::Detail,
            false,
        ),
    ]
}

/// Phone: filled disc with a handset slab and earpiece bar.
pub fn phone_icon(center: Point, size: f32) -> Vec<Mark> {
    let r = size / 2.0;
    let (hw, hh) = (r * 0.5, r * 1.2);
    vec![
        mark(Primitive::Circle { center, radius: r }, IconLayer::Base, true),
        mark(
            Primitive::Rect {
                x: center.x - hw / 2.0,
                y: center.y - hh / 2.0,
                width: hw,
                height: hh,
            },
            IconLayer::Detail,
            true,
        ),
        mark(
            Primitive::Rect {
                x: center.x - hw / 4.0,
                y: center.y + hh / 2.0 - r * 0.25,
                width: hw / 2.0,
                height: r * 0.12,
            },
            IconLayer::Base,
            true,
        ),
    ]
}

/// Globe: filled disc, outlined inner ring and a meridian/equator cross.
pub fn globe_icon(center: Point, size: f32) -> Vec<Mark> {
    let r = size / 2.0;
    let inner = r * 0.65;
    vec![
        mark(Primitive::Circle { center, radius: r }, IconLayer::Base, true),
        mark(
            Primitive::Circle {
                center,
                radius: inner,
            },
            IconLayer::Detail,
            false,
        ),
        mark(
            Primitive::Line {
                from: Point::new(center.x, center.y - inner),
                to: Point::new(center.x, center.y + inner),
            },
            IconLayer::Detail,
            false,
        ),
        mark(
            Primitive::Line {
                from: Point::new(center.x - inner, center.y),
                to: Point::new(center.x + inner, center.y),
            },
            IconLayer::Detail,
            false,
        ),
    ]
}
