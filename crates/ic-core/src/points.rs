//! Point lists for line and freehand elements.
//!
//! Serialized as an SVG-style string: `"x1,y1 x2,y2 …"`. Coordinates are
//! relative to the owning element's `(x, y)`.

use crate::error::ModelError;
use crate::geometry::Bounds;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use winnow::ascii::{float, multispace0, multispace1};
use winnow::combinator::{alt, delimited, separated, separated_pair};
use winnow::prelude::*;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointList(pub SmallVec<[(f64, f64); 8]>);

impl PointList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(points: Vec<(f64, f64)>) -> Self {
        Self(SmallVec::from_vec(points))
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.0.push((x, y));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<(f64, f64)> {
        self.0.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.0.iter()
    }

    /// Tight bounds around the points.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.0)
    }

    /// Shift every point by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.0 {
            p.0 += dx;
            p.1 += dy;
        }
    }

    /// Parse the serialized form.
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        let points = point_list
            .parse(s)
            .map_err(|e| ModelError::InvalidPoints(e.to_string()))?;
        if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(ModelError::InvalidPoints(format!("non-finite coordinate in {s:?}")));
        }
        Ok(Self::from_vec(points))
    }

    /// Emit the serialized form.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::with_capacity(self.0.len() * 8);
        for (i, (x, y)) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&format!("{x},{y}"));
        }
        out
    }
}

fn point_list(input: &mut &str) -> ModalResult<Vec<(f64, f64)>> {
    delimited(multispace0, separated(0.., point, multispace1), multispace0).parse_next(input)
}

fn point(input: &mut &str) -> ModalResult<(f64, f64)> {
    separated_pair(float, alt((',', ' ')), float).parse_next(input)
}

impl Serialize for PointList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_svg_string())
    }
}

impl<'de> Deserialize<'de> for PointList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PointList::parse(&s).map_err(serde::de::Error::custom)
    }
}
