pub mod ingestor;
pub mod simulation;

pub use ingestor::{SerialTelemetry, TelemetryIngestor, FRAME_SIZE};
pub use simulation::SimulationClock;

use crate::types::{measurement::normalize_degree, TelemetrySample};

pub trait TelemetrySource {
    /// Never blocks; `None` means no update this frame
    fn poll(&mut self) -> Option<TelemetrySample>;
}

/// Most recent validated value of every telemetry field
#[derive(Copy, Clone, Debug, Default)]
pub struct LastKnownGood(TelemetrySample);

impl LastKnownGood {
    pub fn get(&self) -> &TelemetrySample {
        &self.0
    }

    /// Substitutes invalid fields of `sample` and retains its valid ones.
    pub fn validate(&mut self, mut sample: TelemetrySample) -> TelemetrySample {
        let substituted = sample.sanitize(&mut self.0);
        if !substituted.is_empty() {
            debug!("Non-finite telemetry {:?} replaced by last known good", substituted);
        }
        sample
    }

    /// Derives heading from the horizontal magnetometer axes, keeping the last heading when the
    /// field vector has no horizontal component.
    pub fn update_heading(&mut self, sample: &mut TelemetrySample) {
        if sample.mag_x == 0.0 && sample.mag_y == 0.0 {
            sample.heading = self.0.heading;
            return;
        }
        let heading = normalize_degree(sample.mag_y.atan2(sample.mag_x).to_degrees());
        sample.heading = heading;
        self.0.heading = heading;
    }
}

mod test {
    #[test]
    fn test_update_heading() {
        use super::LastKnownGood;
        use crate::types::TelemetrySample;

        let mut last = LastKnownGood::default();
        let mut sample = TelemetrySample { mag_x: 0.0, mag_y: 1.0, ..Default::default() };
        last.update_heading(&mut sample);
        assert!((sample.heading - 90.0).abs() < 1e-3);

        let mut sample = TelemetrySample { mag_x: 0.0, mag_y: -1.0, ..Default::default() };
        last.update_heading(&mut sample);
        assert!((sample.heading - 270.0).abs() < 1e-3);
        let heading = sample.heading;

        let mut sample = TelemetrySample { heading: 12.0, ..Default::default() };
        last.update_heading(&mut sample);
        assert_eq!(sample.heading, heading);
        assert_eq!(last.get().heading, heading);
    }
}
