//! In-memory nearest-neighbor indexes.
//!
//! Both indexes are built once at startup, then shared read-only behind an
//! `Arc` — concurrent request handlers never need locking. The dataset is
//! small enough that every query is a full scan; distance sorting uses
//! `total_cmp`, which is stable, so records at equal distance keep their
//! load order.

use serde::Serialize;

use kerbside_core::models::{
    ParkingLot, ParkingSpot, RADIUS_M_MAX, RADIUS_M_MIN, SPOT_LIMIT_MAX, SPOT_LIMIT_MIN,
};

use crate::availability::lot_probability;
use crate::geo::haversine_m;

/// A spot enriched with its distance from the query center.
#[derive(Debug, Clone, Serialize)]
pub struct SpotHit {
    #[serde(flatten)]
    pub spot: ParkingSpot,
    pub distance_m: f64,
}

/// A lot enriched with distance and its availability probability.
#[derive(Debug, Clone, Serialize)]
pub struct LotHit {
    pub id: String,
    pub label: String,
    pub lat: f64,
    pub lon: f64,
    pub distance_m: f64,
    pub probability: f64,
}

/// Read-only collection of normalized parking spots.
#[derive(Debug, Default)]
pub struct SpotIndex {
    spots: Vec<ParkingSpot>,
}

impl SpotIndex {
    #[must_use]
    pub fn new(spots: Vec<ParkingSpot>) -> Self {
        Self { spots }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// Rank all spots by distance from `(lat, lon)`, optionally filtered to
    /// `radius_m`, truncated to `k` results.
    #[must_use]
    pub fn nearby(&self, lat: f64, lon: f64, radius_m: Option<f64>, k: usize) -> Vec<SpotHit> {
        let mut hits: Vec<SpotHit> = self
            .spots
            .iter()
            .filter_map(|spot| {
                let distance_m = haversine_m(lat, lon, spot.lat, spot.lon);
                if radius_m.is_some_and(|r| distance_m > r) {
                    return None;
                }
                Some(SpotHit {
                    spot: spot.clone(),
                    distance_m,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        hits.truncate(k);
        hits
    }
}

/// Read-only collection of centroid-reduced parking lots.
#[derive(Debug, Default)]
pub struct LotIndex {
    lots: Vec<ParkingLot>,
}

impl LotIndex {
    #[must_use]
    pub fn new(lots: Vec<ParkingLot>) -> Self {
        Self { lots }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    /// Rank lots by distance and attach the availability probability.
    ///
    /// Radius and limit are clamped here, server-side, so no caller can
    /// force an unbounded scan or payload.
    #[must_use]
    pub fn nearby_with_scores(
        &self,
        lat: f64,
        lon: f64,
        radius_m: f64,
        limit: usize,
    ) -> Vec<LotHit> {
        let radius_m = radius_m.clamp(f64::from(RADIUS_M_MIN), f64::from(RADIUS_M_MAX));
        let limit = limit.clamp(SPOT_LIMIT_MIN, SPOT_LIMIT_MAX);

        let mut hits: Vec<LotHit> = self
            .lots
            .iter()
            .filter_map(|lot| {
                let distance_m = haversine_m(lat, lon, lot.lat, lot.lon);
                if distance_m > radius_m {
                    return None;
                }
                Some(LotHit {
                    id: lot.id.clone(),
                    label: lot.label.clone(),
                    lat: lot.lat,
                    lon: lot.lon,
                    distance_m,
                    probability: lot_probability(lot.accessible_spaces, lot.capacity),
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        hits.truncate(limit);
        hits
    }
}
