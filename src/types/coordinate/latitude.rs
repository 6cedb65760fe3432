use core::{
    convert::TryFrom,
    fmt::{self, Write},
};

use heapless::String;

use super::TENTH_SECONDS_PER_DEGREE;

#[derive(Default, Copy, Clone, Debug, PartialEq)]
pub struct Latitude(pub f64); // in degrees, north positive

impl TryFrom<&str> for Latitude {
    type Error = ();

    fn try_from(string: &str) -> Result<Self, ()> {
        let (left, right) = string.split_once('°').ok_or(())?;
        let mut chars = left.chars();
        let positive = match chars.next() {
            Some('N') => true,
            Some('S') => false,
            _ => return Err(()),
        };
        let degree: u8 = chars.as_str().parse().map_err(|_| ())?;

        let (left, right) = right.split_once('\'').ok_or(())?;
        let minute: u8 = left.parse().map_err(|_| ())?;
        let second: f64 = right.parse().map_err(|_| ())?;
        if degree > 90 || minute >= 60 || !(0.0..60.0).contains(&second) {
            return Err(());
        }
        let value = degree as f64 + minute as f64 / 60.0 + second / 3600.0;
        if value > 90.0 {
            return Err(());
        }
        Ok(Self(if positive { value } else { -value }))
    }
}

impl fmt::Display for Latitude {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ns = if self.0 >= 0.0 { "N" } else { "S" };
        let tenths = (self.0.abs() * TENTH_SECONDS_PER_DEGREE).round() as u64;
        let (degree, minute) = (tenths / 36000, (tenths / 600) % 60);
        let tenths = tenths % 600;
        write!(f, "{}{:02}°{:02}'{:02}.{}", ns, degree, minute, tenths / 10, tenths % 10)
    }
}

impl serde::Serialize for Latitude {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut string = String::<16>::new();
        write!(string, "{}", self).ok();
        serializer.serialize_str(string.as_str())
    }
}

impl<'a> serde::Deserialize<'a> for Latitude {
    fn deserialize<D: serde::Deserializer<'a>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::string::String as serde::Deserialize>::deserialize(deserializer)?;
        Latitude::try_from(s.as_str())
            .map_err(|_| <D::Error as serde::de::Error>::custom("Not latitude"))
    }
}

mod test {
    #[test]
    fn test_latitude() {
        use core::convert::TryFrom;

        use super::Latitude;

        assert!(Latitude::try_from("N00°00'00").is_ok());
        assert!(Latitude::try_from("N90°00'00").is_ok());
        assert!(Latitude::try_from("S90°00'00").is_ok());
        assert!(Latitude::try_from("N00°00'59.9").is_ok());
        assert!(Latitude::try_from("N00°00'60").is_err());
        assert!(Latitude::try_from("N00°60'00").is_err());
        assert!(Latitude::try_from("N91°00'00").is_err());
        assert!(Latitude::try_from("N90°00'01").is_err());
        assert!(Latitude::try_from("E00°01'00").is_err());
        assert!(Latitude::try_from("W00°01'00").is_err());

        let latitude = Latitude::try_from("N40°19'48.5").unwrap();
        assert_eq!("N40°19'48.5", format!("{}", latitude));
        assert_eq!("S40°19'48.5", format!("{}", Latitude(-latitude.0)));
    }
}
