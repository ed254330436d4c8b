//! Layout engine.
//!
//! Maps snapshot entries onto a polar grid: four 90° sectors, one per
//! quadrant in clockwise order starting at the positive x axis, and four
//! concentric bands, one per ring. The output carries everything a renderer
//! needs (coordinates, band radii, colours, legend indices) so it never has
//! to redo the geometry.
//!
//! Angles are in radians in screen space (y grows downwards), so increasing
//! angles run clockwise on screen.

use std::cmp::Reverse;
use std::f64::consts::FRAC_PI_2;

use radar_config::{LayoutConfig, RingColors};
use radar_core::entities::{RadarSnapshot, TechnologyEntry};
use radar_core::enums::{Movement, PlacementMode, Quadrant, Ring};
use radar_core::errors::RadarError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::service::RadarService;
use crate::store::RadarStore;

/// Fraction of a sector's angular span a dot may occupy, away from the dividers.
const ANGLE_MARGIN: (f64, f64) = (0.1, 0.9);
/// Fraction of a band's radial depth a dot may occupy, away from the circles.
const RADIUS_MARGIN: (f64, f64) = (0.15, 0.85);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One technology placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedEntry {
    /// 1-based legend number.
    pub index: u32,
    pub id: String,
    pub name: String,
    pub ring: Ring,
    pub movement: Movement,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadrantLayout {
    pub quadrant: Quadrant,
    pub label: String,
    pub start_angle: f64,
    pub end_angle: f64,
    pub entries: Vec<PlacedEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingLayout {
    pub ring: Ring,
    pub name: String,
    pub inner_radius: f64,
    pub radius: f64,
    pub color: String,
}

/// Complete geometry for one rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarLayout {
    pub width: u32,
    pub height: u32,
    pub center: Point,
    pub radius: f64,
    pub quadrants: Vec<QuadrantLayout>,
    pub rings: Vec<RingLayout>,
}

impl RadarLayout {
    /// All placed entries in legend order.
    pub fn entries(&self) -> impl Iterator<Item = &PlacedEntry> {
        self.quadrants.iter().flat_map(|q| q.entries.iter())
    }
}

#[derive(Debug, Clone)]
pub struct LayoutEngine {
    placement: PlacementMode,
    min_canvas: u32,
    colors: RingColors,
}

impl LayoutEngine {
    #[must_use]
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            placement: config.placement,
            min_canvas: config.min_canvas,
            colors: config.colors.clone(),
        }
    }

    #[must_use]
    pub const fn with_placement(mut self, placement: PlacementMode) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub const fn placement(&self) -> PlacementMode {
        self.placement
    }

    /// Lay out a snapshot on a `width` × `height` canvas.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::Validation` if either dimension is below the
    /// configured minimum.
    pub fn layout(
        &self,
        snapshot: &RadarSnapshot,
        width: u32,
        height: u32,
    ) -> Result<RadarLayout, RadarError> {
        self.layout_entries(&snapshot.entries, width, height)
    }

    /// Lay out arbitrary entries.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::Validation` if either dimension is below the
    /// configured minimum.
    pub fn layout_entries(
        &self,
        entries: &[TechnologyEntry],
        width: u32,
        height: u32,
    ) -> Result<RadarLayout, RadarError> {
        if width < self.min_canvas || height < self.min_canvas {
            return Err(RadarError::invalid(format!(
                "canvas {width}x{height} is smaller than the {min}x{min} minimum",
                min = self.min_canvas
            )));
        }

        let center = Point {
            x: f64::from(width) / 2.0,
            y: f64::from(height) / 2.0,
        };
        let radius = f64::from(width.min(height)) / 2.0;

        let mut ordered: Vec<&TechnologyEntry> = entries.iter().collect();
        ordered.sort_by_cached_key(|e| {
            (e.quadrant.sector_index(), Reverse(e.ring.rank()), e.name.to_lowercase())
        });

        let mut quadrants: Vec<QuadrantLayout> = Quadrant::ALL
            .iter()
            .map(|q| {
                let (start_angle, end_angle) = sector(*q);
                QuadrantLayout {
                    quadrant: *q,
                    label: q.label().to_string(),
                    start_angle,
                    end_angle,
                    entries: Vec::new(),
                }
            })
            .collect();

        let mut thread_rng = rand::thread_rng();
        for (index, entry) in (1u32..).zip(ordered) {
            let (angle, distance) = match self.placement {
                PlacementMode::Random => polar_position(&mut thread_rng, entry, radius),
                PlacementMode::Deterministic => {
                    polar_position(&mut StdRng::seed_from_u64(id_seed(&entry.id)), entry, radius)
                }
            };
            quadrants[entry.quadrant.sector_index()]
                .entries
                .push(PlacedEntry {
                    index,
                    id: entry.id.clone(),
                    name: entry.name.clone(),
                    ring: entry.ring,
                    movement: entry.movement,
                    x: distance.mul_add(angle.cos(), center.x),
                    y: distance.mul_add(angle.sin(), center.y),
                });
        }

        let rings = Ring::ALL
            .iter()
            .map(|r| RingLayout {
                ring: *r,
                name: r.as_str().to_string(),
                inner_radius: radius * r.inner_fraction(),
                radius: radius * r.outer_fraction(),
                color: self.colors.for_ring(*r).to_string(),
            })
            .collect();

        debug!(
            width,
            height,
            entries = entries.len(),
            placement = ?self.placement,
            "radar laid out"
        );
        Ok(RadarLayout {
            width,
            height,
            center,
            radius,
            quadrants,
            rings,
        })
    }
}

/// Angular span of a quadrant's sector.
fn sector(quadrant: Quadrant) -> (f64, f64) {
    #[allow(clippy::cast_precision_loss)]
    let index = quadrant.sector_index() as f64;
    (index * FRAC_PI_2, (index + 1.0) * FRAC_PI_2)
}

/// Angle and distance from the center for one entry, strictly inside its
/// sector and band.
fn polar_position<R: Rng>(rng: &mut R, entry: &TechnologyEntry, radius: f64) -> (f64, f64) {
    let (start, end) = sector(entry.quadrant);
    let angle = start + (end - start) * rng.gen_range(ANGLE_MARGIN.0..ANGLE_MARGIN.1);

    let inner = radius * entry.ring.inner_fraction();
    let outer = radius * entry.ring.outer_fraction();
    let distance = inner + (outer - inner) * rng.gen_range(RADIUS_MARGIN.0..RADIUS_MARGIN.1);
    (angle, distance)
}

/// Placement seed: the first eight bytes of SHA-256 over the id.
fn id_seed(id: &str) -> u64 {
    let digest = Sha256::digest(id.as_bytes());
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed)
}

impl<S: RadarStore> RadarService<S> {
    /// Lay out a stored snapshot with the configured engine.
    ///
    /// # Errors
    ///
    /// Returns `RadarError::NotFound` for an unknown snapshot, or
    /// `RadarError::Validation` for an undersized canvas.
    pub async fn layout_snapshot(
        &self,
        id: &str,
        width: u32,
        height: u32,
    ) -> Result<RadarLayout, RadarError> {
        let snapshot: RadarSnapshot = self.fetch(id).await?;
        self.layout_engine().layout(&snapshot, width, height)
    }
}
