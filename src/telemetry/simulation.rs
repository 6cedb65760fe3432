use core::f64::consts::PI;
use std::time::Duration;

use super::{LastKnownGood, TelemetrySource};
use crate::types::{
    coordinate::Position, measurement::normalize_degree, FlightMode, TelemetrySample,
};

const ORBIT_RADIUS: f64 = 200.0; // meter
const METERS_PER_DEGREE: f64 = 111_194.9;

/// Synthetic telemetry as a function of elapsed time
pub struct SimulationClock {
    home: Position,
    step: Duration,
    elapsed: Duration,
    last: LastKnownGood,
}

impl SimulationClock {
    pub fn new(home: Position, step: Duration) -> Self {
        Self { home, step, elapsed: Duration::default(), last: LastKnownGood::default() }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Roll sweeps [-30, 30], pitch [-15, 15], while orbiting around home
    pub fn sample_at(&self, elapsed: Duration) -> TelemetrySample {
        let t = elapsed.as_secs_f32();
        let orbit = elapsed.as_secs_f64() * 2.0 * PI / 120.0;
        let latitude = self.home.latitude.0 + ORBIT_RADIUS * orbit.sin() / METERS_PER_DEGREE;
        let parallel = self.home.latitude.0.to_radians().cos().max(0.01);
        let east = ORBIT_RADIUS * (1.0 - orbit.cos()) / (METERS_PER_DEGREE * parallel);
        let longitude = self.home.longitude.0 + east;
        let airspeed = 20.0 + 5.0 * (0.2 * t).sin();
        TelemetrySample {
            pitch: 15.0 * (0.3 * t).sin(),
            roll: 30.0 * (0.5 * t).sin(),
            heading: normalize_degree(t * 3.0),
            airspeed,
            altitude: 100.0 + 20.0 * (0.1 * t).sin(),
            ground_speed: airspeed * 0.9,
            latitude,
            longitude,
            satellites: 12,
            battery: (16.8 - 0.002 * t).max(13.2),
            mode: FlightMode::Sim,
            temperature: 25.0,
            pressure: 1013.25,
            air_temperature: 20.0,
            air_pressure: 1013.25,
            ..Default::default()
        }
    }
}

impl TelemetrySource for SimulationClock {
    fn poll(&mut self) -> Option<TelemetrySample> {
        self.elapsed += self.step;
        Some(self.last.validate(self.sample_at(self.elapsed)))
    }
}

mod test {
    #[test]
    fn test_simulation_range() {
        use std::time::Duration;

        use super::SimulationClock;
        use crate::telemetry::TelemetrySource;
        use crate::types::coordinate::Position;

        let home = Position::new(47.3977, 8.5456);
        let mut clock = SimulationClock::new(home, Duration::from_millis(40));
        for _ in 0..2000 {
            let sample = clock.poll().unwrap();
            assert!(sample.is_finite());
            assert!((-30.0..=30.0).contains(&sample.roll));
            assert!((-15.0..=15.0).contains(&sample.pitch));
            assert!((0.0..360.0).contains(&sample.heading));
            assert!(sample.position().distance(&home) <= 401.0);
        }
        assert_eq!(clock.elapsed(), Duration::from_secs(80));
    }

    #[test]
    fn test_starts_at_home() {
        use std::time::Duration;

        use super::SimulationClock;
        use crate::types::coordinate::Position;

        let home = Position::new(47.3977, 8.5456);
        let clock = SimulationClock::new(home, Duration::from_millis(40));
        let sample = clock.sample_at(Duration::default());
        assert_eq!(sample.position(), home);
        assert_eq!(sample.roll, 0.0);
    }
}
