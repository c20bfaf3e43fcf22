use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in meters (haversine).
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Midpoint used to center the map before any fix is known.
    pub fn midpoint(&self, other: &Coordinate) -> Coordinate {
        Coordinate::new((self.lat + other.lat) / 2.0, (self.lng + other.lng) / 2.0)
    }

    /// Routing services speak longitude-first.
    pub fn from_lng_lat(pair: [f64; 2]) -> Coordinate {
        Coordinate::new(pair[1], pair[0])
    }

    pub fn as_lat_lng(&self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let p = Coordinate::new(37.5448, 127.0568);
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn test_station_to_storage_is_a_short_walk() {
        let station = Coordinate::new(37.5462, 127.0553);
        let storage = Coordinate::new(37.5448, 127.0568);
        let d = station.distance_to(&storage);
        // about 200 m apart
        assert!(d > 150.0 && d < 250.0, "got {}", d);
        assert!((d - storage.distance_to(&station)).abs() < 1e-6);
    }

    #[test]
    fn test_seoul_busan() {
        let seoul = Coordinate::new(37.5665, 126.9780);
        let busan = Coordinate::new(35.1796, 129.0756);
        let km = seoul.distance_to(&busan) / 1000.0;
        assert!(km > 310.0 && km < 335.0, "got {}", km);
    }

    #[test]
    fn test_lng_lat_order() {
        let c = Coordinate::from_lng_lat([127.0568, 37.5448]);
        assert_eq!(c.lat, 37.5448);
        assert_eq!(c.lng, 127.0568);
        assert_eq!(c.as_lat_lng(), [37.5448, 127.0568]);
    }
}
