use core::convert::TryFrom;
use core::fmt;

pub mod latitude;
pub mod longitude;

pub use latitude::Latitude;
pub use longitude::Longitude;

const TENTH_SECONDS_PER_DEGREE: f64 = 36000.0;
const EARTH_RADIUS: f64 = 6_371_000.0; // meters

#[derive(Default, Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Position {
    pub latitude: Latitude,
    pub longitude: Longitude,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude: Latitude(latitude), longitude: Longitude(longitude) }
    }

    /// Great-circle distance in meters
    pub fn distance(&self, other: &Self) -> f64 {
        let (lat1, lat2) = (self.latitude.0.to_radians(), other.latitude.0.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude.0 - self.longitude.0).to_radians();
        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS * a.sqrt().min(1.0).asin()
    }
}

/// Parses "N40°19'48.0 W008°32'44.2"
impl TryFrom<&str> for Position {
    type Error = ();

    fn try_from(string: &str) -> Result<Self, ()> {
        let mut split = string.split_whitespace();
        let latitude = Latitude::try_from(split.next().ok_or(())?)?;
        let longitude = Longitude::try_from(split.next().ok_or(())?)?;
        match split.next() {
            Some(_) => Err(()),
            None => Ok(Self { latitude, longitude }),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.latitude, self.longitude)
    }
}

mod test {
    #[test]
    fn test_distance() {
        use super::Position;

        let origin = Position::new(0.0, 0.0);
        assert_eq!(origin.distance(&origin), 0.0);

        let one_degree = origin.distance(&Position::new(0.0, 1.0));
        assert!((one_degree - 111_194.9).abs() < 1.0);

        let a = Position::new(47.3977, 8.5456);
        let b = Position::new(47.3987, 8.5456);
        assert!((a.distance(&b) - 111.2).abs() < 0.5);
        assert_eq!(a.distance(&b), b.distance(&a));
    }

    #[test]
    fn test_serialize_position() {
        use serde_json::json;

        use super::Position;

        let position = Position::new(40.33, -8.5456);
        let expected = json!({"latitude": "N40°19'48.0", "longitude": "W008°32'44.2"});
        assert_eq!(expected, serde_json::to_value(&position).unwrap());
        let parsed: Position = serde_json::from_value(expected).unwrap();
        assert_eq!(format!("{}", parsed), "N40°19'48.0 W008°32'44.2");
    }

    #[test]
    fn test_parse_position() {
        use core::convert::TryFrom;

        use super::Position;

        let position = Position::try_from("N47°23'51.7  E008°32'44.2").unwrap();
        assert_eq!(format!("{}", position), "N47°23'51.7 E008°32'44.2");
        assert!(Position::try_from("N47°23'51.7").is_err());
        assert!(Position::try_from("E008°32'44.2 N47°23'51.7").is_err());
    }
}
