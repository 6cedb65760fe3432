use core::fmt;

use heapless::Vec;

use super::coordinate::Position;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlightMode {
    Manual,
    Acro,
    Angle,
    Horizon,
    #[serde(rename = "rth")]
    RTH,
    Sim,
}

impl Default for FlightMode {
    fn default() -> Self {
        Self::Manual
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let string = match self {
            Self::Manual => "MANUAL",
            Self::Acro => "ACRO",
            Self::Angle => "ANGLE",
            Self::Horizon => "HORIZON",
            Self::RTH => "RTH",
            Self::Sim => "SIM",
        };
        f.write_str(string)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Camera {
    Main,
    Secondary,
}

impl Default for Camera {
    fn default() -> Self {
        Self::Main
    }
}

impl fmt::Display for Camera {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Main => "MAIN",
            Self::Secondary => "SEC",
        })
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct TelemetrySample {
    pub pitch: f32, // degree
    pub roll: f32,  // degree
    pub heading: f32,
    pub airspeed: f32,     // m/s
    pub altitude: f32,     // meter
    pub ground_speed: f32, // m/s
    pub latitude: f64,
    pub longitude: f64,
    pub satellites: u8,
    pub battery: f32, // volt
    pub mode: FlightMode,
    pub camera: Camera,

    pub temperature: f32,
    pub pressure: f32,
    pub air_temperature: f32,
    pub air_pressure: f32,
    pub mag_x: f32,
    pub mag_y: f32,
    pub mag_z: f32,
}

pub const MAX_NUMERIC_FIELDS: usize = 16;

pub type Substituted = Vec<&'static str, MAX_NUMERIC_FIELDS>;

macro_rules! numeric_fields {
    ($($field:ident),+) => {
        impl TelemetrySample {
            pub const NUMERIC_FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];

            /// Every non-finite field takes the value held by `fallback`, every finite field is
            /// recorded into `fallback`. Returns names of substituted fields.
            pub fn sanitize(&mut self, fallback: &mut Self) -> Substituted {
                let mut substituted = Substituted::new();
                $(
                    if self.$field.is_finite() {
                        fallback.$field = self.$field;
                    } else {
                        self.$field = fallback.$field;
                        substituted.push(stringify!($field)).ok();
                    }
                )+
                substituted
            }

            pub fn is_finite(&self) -> bool {
                true $(&& self.$field.is_finite())+
            }
        }
    };
}

numeric_fields! {
    pitch, roll, heading, airspeed, altitude, ground_speed, latitude, longitude, battery,
    temperature, pressure, air_temperature, air_pressure, mag_x, mag_y, mag_z
}

impl TelemetrySample {
    pub fn position(&self) -> Position {
        Position::new(self.latitude, self.longitude)
    }
}

mod test {
    #[test]
    fn test_sanitize() {
        use super::TelemetrySample;

        let mut fallback = TelemetrySample { pitch: 1.0, roll: 2.0, ..Default::default() };
        let mut sample = TelemetrySample {
            pitch: f32::NAN,
            roll: 5.0,
            altitude: f32::INFINITY,
            longitude: f64::NEG_INFINITY,
            ..Default::default()
        };
        let substituted = sample.sanitize(&mut fallback);
        assert_eq!(&substituted[..], &["pitch", "altitude", "longitude"]);
        assert_eq!(sample.pitch, 1.0);
        assert_eq!(sample.roll, 5.0);
        assert_eq!(sample.altitude, 0.0);
        assert_eq!(fallback.pitch, 1.0);
        assert_eq!(fallback.roll, 5.0);
        assert!(sample.is_finite());
    }

    #[test]
    fn test_numeric_fields() {
        use super::{TelemetrySample, MAX_NUMERIC_FIELDS};

        assert!(TelemetrySample::NUMERIC_FIELDS.len() <= MAX_NUMERIC_FIELDS);
        assert!(!TelemetrySample { mag_z: f32::NAN, ..Default::default() }.is_finite());
    }

    #[test]
    fn test_serialize_sample() {
        use serde_json::json;

        use super::TelemetrySample;

        let value = serde_json::to_value(&TelemetrySample::default()).unwrap();
        assert_eq!(value["mode"], json!("manual"));
        assert_eq!(value["camera"], json!("main"));
        assert_eq!(value["satellites"], json!(0));
    }
}
