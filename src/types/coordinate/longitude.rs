use core::{
    convert::TryFrom,
    fmt::{self, Write},
};

use heapless::String;

use super::TENTH_SECONDS_PER_DEGREE;

#[derive(Default, Copy, Clone, Debug, PartialEq)]
pub struct Longitude(pub f64); // in degrees, east positive

impl TryFrom<&str> for Longitude {
    type Error = ();

    fn try_from(string: &str) -> Result<Self, ()> {
        let (left, right) = string.split_once('°').ok_or(())?;
        let mut chars = left.chars();
        let positive = match chars.next() {
            Some('E') => true,
            Some('W') => false,
            _ => return Err(()),
        };
        let degree: u8 = chars.as_str().parse().map_err(|_| ())?;

        let (left, right) = right.split_once('\'').ok_or(())?;
        let minute: u8 = left.parse().map_err(|_| ())?;
        let second: f64 = right.parse().map_err(|_| ())?;
        if degree > 180 || minute >= 60 || !(0.0..60.0).contains(&second) {
            return Err(());
        }
        let value = degree as f64 + minute as f64 / 60.0 + second / 3600.0;
        if value > 180.0 {
            return Err(());
        }
        Ok(Self(if positive { value } else { -value }))
    }
}

impl fmt::Display for Longitude {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ew = if self.0 >= 0.0 { "E" } else { "W" };
        let tenths = (self.0.abs() * TENTH_SECONDS_PER_DEGREE).round() as u64;
        let (degree, minute) = (tenths / 36000, (tenths / 600) % 60);
        let tenths = tenths % 600;
        write!(f, "{}{:03}°{:02}'{:02}.{}", ew, degree, minute, tenths / 10, tenths % 10)
    }
}

impl serde::Serialize for Longitude {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut string = String::<16>::new();
        write!(string, "{}", self).ok();
        serializer.serialize_str(string.as_str())
    }
}

impl<'a> serde::Deserialize<'a> for Longitude {
    fn deserialize<D: serde::Deserializer<'a>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::string::String as serde::Deserialize>::deserialize(deserializer)?;
        Longitude::try_from(s.as_str())
            .map_err(|_| <D::Error as serde::de::Error>::custom("Not longitude"))
    }
}

mod test {
    #[test]
    fn test_longitude() {
        use core::convert::TryFrom;

        use super::Longitude;

        assert!(Longitude::try_from("E00°00'00").is_ok());
        assert!(Longitude::try_from("E180°00'00").is_ok());
        assert!(Longitude::try_from("W180°00'00").is_ok());
        assert!(Longitude::try_from("E00°00'10.5").is_ok());
        assert!(Longitude::try_from("E00°00'60").is_err());
        assert!(Longitude::try_from("E00°60'00").is_err());
        assert!(Longitude::try_from("E181°00'00").is_err());
        assert!(Longitude::try_from("N00°01'00").is_err());
        assert!(Longitude::try_from("S00°01'00").is_err());

        let longitude = Longitude::try_from("E008°32'44.2").unwrap();
        assert_eq!("E008°32'44.2", format!("{}", longitude));
        assert_eq!("W008°32'44.2", format!("{}", Longitude(-longitude.0)));
    }
}
