pub trait Velocity {}
pub trait Distance {}

macro_rules! units {
    ($($class:ident => ($value:expr, $name:expr, $trait:ty)),+) => {
        $(
            #[derive(Copy, Clone, Default, Debug, PartialEq)]
            pub struct $class;

            impl Into<f32> for $class {
                fn into(self) -> f32 {
                    $value
                }
            }

            impl core::fmt::Display for $class {
                fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                    write!(f, $name)
                }
            }

            impl $trait for $class {}
        )+
    };
}

macro_rules! velocity_units {
    ($($class:ident => ($value:expr, $name:literal)),+) => {
        units!{$($class => ($value, $name, Velocity)),+}
    }
}

// Base unit is m/s
velocity_units! {
    MpS => (1.0, "M/S"),
    Knot => (1852.0 / 3600.0, "KT")
}

macro_rules! distance_units {
    ($($class:ident => ($value:expr, $name:literal)),+) => {
        units!{$($class => ($value, $name, Distance)),+}
    }
}

// Base unit is meter
distance_units! {
    Meter => (1.0, "M"),
    Feet => (0.3048, "FT")
}

pub fn convert<F: Into<f32>, T: Into<f32>>(value: f32, from: F, to: T) -> f32 {
    value * from.into() / to.into()
}

/// Units the tapes are labelled in
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitSystem {
    Metric,
    Aviation,
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self::Aviation
    }
}

impl UnitSystem {
    pub fn speed(self, mps: f32) -> f32 {
        match self {
            Self::Metric => mps,
            Self::Aviation => convert(mps, MpS, Knot),
        }
    }

    pub fn altitude(self, meters: f32) -> f32 {
        match self {
            Self::Metric => meters,
            Self::Aviation => convert(meters, Meter, Feet),
        }
    }

    pub fn speed_unit(self) -> &'static str {
        match self {
            Self::Metric => "M/S",
            Self::Aviation => "KT",
        }
    }

    pub fn altitude_unit(self) -> &'static str {
        match self {
            Self::Metric => "M",
            Self::Aviation => "FT",
        }
    }
}

mod test {
    #[test]
    fn test_convert() {
        use super::{convert, Feet, Knot, Meter, MpS, UnitSystem};

        assert_eq!(convert(100.0, Meter, Meter), 100.0);
        assert_eq!(convert(10.0, MpS, Knot).round(), 19.0);
        assert_eq!((convert(100.0, Meter, Feet) * 100.0).round(), 32808.0);
        assert_eq!(UnitSystem::Aviation.speed(10.0).round(), 19.0);
        assert_eq!(UnitSystem::Metric.altitude(120.5), 120.5);
        assert_eq!(format!("{}", Knot), "KT");
    }
}
