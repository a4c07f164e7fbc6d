//! Great-circle distance.
//!
//! This is the ranking key for every nearby query, so it sticks to the
//! standard haversine formulation with the conventional mean Earth radius.

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two (lat, lon) pairs in degrees.
#[must_use]
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINGSTON_CITY_HALL: (f64, f64) = (44.2290, -76.4810);
    const QUEENS_UNIVERSITY: (f64, f64) = (44.2253, -76.4951);

    #[test]
    fn distance_to_self_is_zero() {
        let d = haversine_m(44.2312, -76.4860, 44.2312, -76.4860);
        assert!(d.abs() < 1e-9, "expected 0, got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_m(
            KINGSTON_CITY_HALL.0,
            KINGSTON_CITY_HALL.1,
            QUEENS_UNIVERSITY.0,
            QUEENS_UNIVERSITY.1,
        );
        let ba = haversine_m(
            QUEENS_UNIVERSITY.0,
            QUEENS_UNIVERSITY.1,
            KINGSTON_CITY_HALL.0,
            KINGSTON_CITY_HALL.1,
        );
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn city_hall_to_queens_is_roughly_a_kilometre() {
        let d = haversine_m(
            KINGSTON_CITY_HALL.0,
            KINGSTON_CITY_HALL.1,
            QUEENS_UNIVERSITY.0,
            QUEENS_UNIVERSITY.1,
        );
        assert!(
            (900.0..1_600.0).contains(&d),
            "expected ~1.2 km, got {d} m"
        );
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_m(44.0, -76.5, 45.0, -76.5);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }
}
