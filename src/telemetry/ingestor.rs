use super::{LastKnownGood, TelemetrySource};
use crate::hal::ByteSource;
use crate::types::TelemetrySample;

const NUM_FIELDS: usize = 11;
/// 11 packed native-endian f32
pub const FRAME_SIZE: usize = NUM_FIELDS * 4;
pub const DEFAULT_MAX_BUFFERED_FRAMES: usize = 16;

/// Field order on the wire
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(usize)]
pub enum Field {
    Pitch = 0,
    Roll,
    Temperature,
    Pressure,
    Altitude,
    Airspeed,
    AirTemperature,
    AirPressure,
    MagX,
    MagY,
    MagZ,
}

pub fn decode_frame(frame: &[u8; FRAME_SIZE]) -> [f32; NUM_FIELDS] {
    let mut values = [0f32; NUM_FIELDS];
    for (value, bytes) in values.iter_mut().zip(frame.chunks_exact(4)) {
        *value = f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }
    values
}

pub struct TelemetryIngestor {
    buffer: Vec<u8>,
    max_buffered_frames: usize,
    last: LastKnownGood,
}

impl Default for TelemetryIngestor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BUFFERED_FRAMES)
    }
}

impl TelemetryIngestor {
    pub fn new(max_buffered_frames: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(FRAME_SIZE * 2),
            max_buffered_frames: max_buffered_frames.max(1),
            last: LastKnownGood::default(),
        }
    }

    pub fn last_known_good(&self) -> &TelemetrySample {
        self.last.get()
    }

    /// Number of bytes waiting for a complete frame
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Drops any partially received frame, e.g. after the link was re-opened
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Buffers `bytes` and decodes at most one frame from the head of the buffer.
    pub fn ingest(&mut self, bytes: &[u8]) -> Option<TelemetrySample> {
        self.buffer.extend_from_slice(bytes);
        self.drop_backlog();
        if self.buffer.len() < FRAME_SIZE {
            return None;
        }

        let mut frame = [0u8; FRAME_SIZE];
        frame.copy_from_slice(&self.buffer[..FRAME_SIZE]);
        self.buffer.drain(..FRAME_SIZE);
        let sample = self.decode(&frame);
        trace!("Received telemetry {:?}", sample);
        Some(sample)
    }

    fn drop_backlog(&mut self) {
        let frames = self.buffer.len() / FRAME_SIZE;
        if frames <= self.max_buffered_frames {
            return;
        }
        let dropped = frames - self.max_buffered_frames;
        self.buffer.drain(..dropped * FRAME_SIZE);
        warn!("Telemetry backlog, {} frames dropped", dropped);
    }

    fn decode(&mut self, frame: &[u8; FRAME_SIZE]) -> TelemetrySample {
        let values = decode_frame(frame);
        let mut sample = *self.last.get();
        sample.pitch = values[Field::Pitch as usize];
        sample.roll = values[Field::Roll as usize];
        sample.temperature = values[Field::Temperature as usize];
        sample.pressure = values[Field::Pressure as usize];
        sample.altitude = values[Field::Altitude as usize];
        sample.airspeed = values[Field::Airspeed as usize];
        sample.air_temperature = values[Field::AirTemperature as usize];
        sample.air_pressure = values[Field::AirPressure as usize];
        sample.mag_x = values[Field::MagX as usize];
        sample.mag_y = values[Field::MagY as usize];
        sample.mag_z = values[Field::MagZ as usize];

        let mut sample = self.last.validate(sample);
        self.last.update_heading(&mut sample);
        sample
    }
}

/// Telemetry arriving over a serial link
pub struct SerialTelemetry<B> {
    source: B,
    ingestor: TelemetryIngestor,
    chunk: Vec<u8>,
}

impl<B: ByteSource> SerialTelemetry<B> {
    pub fn new(source: B, max_buffered_frames: usize) -> Self {
        let ingestor = TelemetryIngestor::new(max_buffered_frames);
        let chunk = vec![0u8; FRAME_SIZE * ingestor.max_buffered_frames];
        Self { source, ingestor, chunk }
    }

    pub fn ingestor(&self) -> &TelemetryIngestor {
        &self.ingestor
    }
}

impl<B: ByteSource> TelemetrySource for SerialTelemetry<B> {
    fn poll(&mut self) -> Option<TelemetrySample> {
        let size = match self.source.read_available(&mut self.chunk) {
            Ok(size) => size,
            Err(e) => {
                warn!("Read telemetry failed: {}", e);
                0
            }
        };
        self.ingestor.ingest(&self.chunk[..size])
    }
}

mod test {
    #[cfg(test)]
    fn frame(values: [f32; 11]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    #[test]
    fn test_short_frame() {
        use super::{TelemetryIngestor, FRAME_SIZE};
        use crate::types::TelemetrySample;

        let mut ingestor = TelemetryIngestor::default();
        let bytes = frame([1.0; 11]);
        assert_eq!(ingestor.ingest(&bytes[..FRAME_SIZE - 1]), None);
        assert_eq!(ingestor.last_known_good(), &TelemetrySample::default());
        assert_eq!(ingestor.buffered(), FRAME_SIZE - 1);

        let sample = ingestor.ingest(&bytes[FRAME_SIZE - 1..]).unwrap();
        assert_eq!(sample.pitch, 1.0);
        assert_eq!(ingestor.buffered(), 0);
        assert_eq!(ingestor.ingest(&[]), None);
    }

    #[test]
    fn test_finite_fields() {
        use super::TelemetryIngestor;

        let mut ingestor = TelemetryIngestor::default();
        let values = [5.0, -10.0, 25.0, 1013.0, 120.0, 22.5, 18.0, 1012.0, 0.0, 0.3, -0.1];
        let sample = ingestor.ingest(&frame(values)).unwrap();
        assert_eq!(sample.pitch, 5.0);
        assert_eq!(sample.roll, -10.0);
        assert_eq!(sample.temperature, 25.0);
        assert_eq!(sample.pressure, 1013.0);
        assert_eq!(sample.altitude, 120.0);
        assert_eq!(sample.airspeed, 22.5);
        assert_eq!(sample.air_temperature, 18.0);
        assert_eq!(sample.air_pressure, 1012.0);
        assert_eq!((sample.mag_x, sample.mag_y, sample.mag_z), (0.0, 0.3, -0.1));

        let last = ingestor.last_known_good();
        assert_eq!(last.pitch, 5.0);
        assert_eq!(last.altitude, 120.0);
        assert_eq!(last.mag_z, -0.1);
        assert!((sample.heading - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_non_finite_fields() {
        use super::TelemetryIngestor;

        let mut ingestor = TelemetryIngestor::default();
        ingestor.ingest(&frame([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0]));

        let nan = f32::NAN;
        let inf = f32::INFINITY;
        let values = [nan, 20.0, inf, 40.0, -inf, 60.0, 70.0, nan, 90.0, 100.0, 110.0];
        let sample = ingestor.ingest(&frame(values)).unwrap();
        assert_eq!(sample.pitch, 1.0);
        assert_eq!(sample.roll, 20.0);
        assert_eq!(sample.temperature, 3.0);
        assert_eq!(sample.altitude, 5.0);
        assert_eq!(sample.air_pressure, 8.0);
        assert!(sample.is_finite());

        let last = ingestor.last_known_good();
        assert_eq!(last.pitch, 1.0);
        assert_eq!(last.roll, 20.0);
        assert_eq!(last.temperature, 3.0);
        assert_eq!(last.pressure, 40.0);
        assert_eq!(last.altitude, 5.0);
        assert_eq!(last.air_pressure, 8.0);
        assert_eq!(last.mag_z, 110.0);
    }

    #[test]
    fn test_nan_before_any_valid_frame() {
        use super::TelemetryIngestor;

        let mut ingestor = TelemetryIngestor::default();
        let sample = ingestor.ingest(&frame([f32::NAN; 11])).unwrap();
        assert!(sample.is_finite());
        assert_eq!(sample.pitch, 0.0);
        assert_eq!(sample.heading, 0.0);
    }

    #[test]
    fn test_one_frame_per_call() {
        use super::TelemetryIngestor;

        let mut ingestor = TelemetryIngestor::default();
        let mut bytes = frame([1.0; 11]);
        bytes.extend(frame([2.0; 11]));
        bytes.extend(&frame([3.0; 11])[..10]);
        assert_eq!(ingestor.ingest(&bytes).unwrap().pitch, 1.0);
        assert_eq!(ingestor.ingest(&[]).unwrap().pitch, 2.0);
        assert_eq!(ingestor.ingest(&[]), None);
        assert_eq!(ingestor.buffered(), 10);
        ingestor.reset();
        assert_eq!(ingestor.buffered(), 0);
    }

    #[test]
    fn test_backlog() {
        use super::{TelemetryIngestor, FRAME_SIZE};

        let mut ingestor = TelemetryIngestor::new(4);
        let bytes: Vec<u8> = (0..6).flat_map(|i| frame([i as f32; 11])).collect();
        assert_eq!(ingestor.ingest(&bytes).unwrap().pitch, 2.0);
        assert_eq!(ingestor.buffered(), 3 * FRAME_SIZE);
    }

    #[test]
    #[cfg(target_endian = "little")]
    fn test_wire_fixture() {
        use hex_literal::hex;

        use super::{decode_frame, FRAME_SIZE};

        let frame: [u8; FRAME_SIZE] = hex!(
            "0000803f 000000c0 0000c841 00407d44 0000f042 0000b441
             00009041 00007d44 00000000 00000000 0000c07f"
        );
        let values = decode_frame(&frame);
        assert_eq!(&values[..8], &[1.0, -2.0, 25.0, 1013.0, 120.0, 22.5, 18.0, 1012.0]);
        assert!(values[10].is_nan());
    }

    #[test]
    fn test_serial_telemetry() {
        use std::io::Cursor;

        use super::SerialTelemetry;
        use crate::hal::Reader;
        use crate::telemetry::TelemetrySource;

        let mut bytes = frame([3.0; 11]);
        bytes.extend(&frame([4.0; 11])[..20]);
        let mut serial = SerialTelemetry::new(Reader(Cursor::new(bytes)), 16);
        assert_eq!(serial.poll().unwrap().roll, 3.0);
        assert_eq!(serial.poll(), None);
        assert_eq!(serial.ingestor().buffered(), 20);
    }
}
