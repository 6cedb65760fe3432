pub mod unit;

pub use unit::UnitSystem;

/// Normalizes any angle in degrees into [0, 360)
pub fn normalize_degree(degree: f32) -> f32 {
    let normalized = degree.rem_euclid(360.0);
    if normalized >= 360.0 {
        return 0.0;
    }
    normalized
}

mod test {
    #[test]
    fn test_normalize_degree() {
        use super::normalize_degree;

        assert_eq!(normalize_degree(0.0), 0.0);
        assert_eq!(normalize_degree(360.0), 0.0);
        assert_eq!(normalize_degree(-90.0), 270.0);
        assert_eq!(normalize_degree(450.0), 90.0);
    }
}
