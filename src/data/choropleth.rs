use std::sync::Arc;

use super::aggregate::Aggregate;
use super::geometry::{Coord, Geometry};
use super::model::ProvinceShape;

// ---------------------------------------------------------------------------
// Colour domain
// ---------------------------------------------------------------------------

/// Fixed `(min, max)` range of the colour scale.
///
/// Derived from the unfiltered aggregate so the legend does not move when
/// filters change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorDomain {
    pub min: f64,
    pub max: f64,
}

impl ColorDomain {
    /// Min / max percentage over the entries of `global`. `(0, 0)` when empty.
    pub fn from_aggregate(global: &Aggregate) -> Self {
        let mut values = global.iter().map(|e| e.percentage);
        let Some(first) = values.next() else {
            return ColorDomain { min: 0.0, max: 0.0 };
        };
        let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        ColorDomain { min, max }
    }

    /// Position of `value` inside the domain, clamped to `[0, 1]`.
    /// A degenerate domain maps everything to the middle.
    pub fn normalize(&self, value: f64) -> f32 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0) as f32
    }
}

// ---------------------------------------------------------------------------
// Bound provinces
// ---------------------------------------------------------------------------

/// One map region with the statistic it is coloured by.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundProvince {
    pub province: String,
    pub geometry: Option<Arc<Geometry>>,
    pub count: usize,
    pub percentage: f64,
}

impl BoundProvince {
    /// Where to place the province label; `None` for absent or empty geometry.
    pub fn label_anchor(&self) -> Option<Coord> {
        self.geometry.as_deref().and_then(Geometry::centroid)
    }
}

/// Everything the map needs for one refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethLayer {
    pub provinces: Vec<BoundProvince>,
    pub domain: ColorDomain,
}

/// Join the filtered percentages onto every province of the complete dataset.
///
/// `shapes` fixes the province set and order; provinces missing from
/// `filtered` get count and percentage `0`. The colour domain comes from
/// `global` only.
pub fn bind(shapes: &[ProvinceShape], filtered: &Aggregate, global: &Aggregate) -> ChoroplethLayer {
    let provinces = shapes
        .iter()
        .map(|shape| BoundProvince {
            province: shape.province.clone(),
            geometry: shape.geometry.clone(),
            count: filtered.count_of(&shape.province),
            percentage: filtered.percentage_of(&shape.province),
        })
        .collect();

    ChoroplethLayer {
        provinces,
        domain: ColorDomain::from_aggregate(global),
    }
}
