#[macro_use]
extern crate log;
extern crate fpv_hud;

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Read, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use embedded_graphics::prelude::*;
use fpv_hud::hal::{ByteSource, Command, CommandSource, Error, Presenter, Reader, VideoFeed};
use fpv_hud::osd::style::{fill, rect};
use fpv_hud::osd::{Color, Surface};

const SKY: Color = Color(70, 110, 160);
const GROUND: Color = Color(90, 70, 40);
const STRIPE: Color = Color(120, 120, 120);
const CHECKER: usize = 32;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Pattern {
    /// Sky over ground with a drifting stripe
    Landscape,
    Checker,
}

/// Camera stand-in producing a moving test pattern
pub struct SyntheticFeed {
    width: usize,
    height: usize,
    pattern: Pattern,
    frame: usize,
    limit: Option<usize>,
}

impl SyntheticFeed {
    pub fn new(width: usize, height: usize, pattern: Pattern) -> Self {
        Self { width, height, pattern, frame: 0, limit: None }
    }

    /// Feed disconnects after `limit` frames
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn draw(&self) -> Surface {
        let (width, height) = (self.width, self.height);
        let mut surface = Surface::new(width, height);
        match self.pattern {
            Pattern::Landscape => {
                let (w, h) = (width as i32, height as i32);
                rect(0, 0, w, h / 2).into_styled(fill(SKY)).draw(&mut surface).ok();
                rect(0, h / 2, w, h - h / 2).into_styled(fill(GROUND)).draw(&mut surface).ok();
                let x = (self.frame * 4 % width.max(1)) as i32;
                rect(x, 0, 8, h).into_styled(fill(STRIPE)).draw(&mut surface).ok();
            }
            Pattern::Checker => {
                for y in 0..height {
                    for x in 0..width {
                        let dark = ((x + self.frame) / CHECKER + y / CHECKER) % 2 == 0;
                        let color = if dark { Color(30, 30, 30) } else { Color(90, 90, 90) };
                        surface.set(x as i32, y as i32, color);
                    }
                }
            }
        }
        surface
    }
}

impl VideoFeed for SyntheticFeed {
    fn acquire(&mut self) -> Result<Surface, Error> {
        if self.limit.map(|limit| self.frame >= limit).unwrap_or(false) {
            return Err(Error::Unavailable("synthetic camera"));
        }
        let surface = self.draw();
        self.frame += 1;
        Ok(surface)
    }
}

/// Paces a recorded byte stream to what an 8N1 serial link delivers per poll interval
pub struct SerialReplay<R> {
    reader: Reader<R>,
    budget: usize,
}

impl<R: Read> SerialReplay<R> {
    pub fn new(inner: R, baud_rate: u32, interval: Duration) -> Self {
        let budget = (baud_rate as f64 / 10.0 * interval.as_secs_f64()).max(1.0) as usize;
        Self { reader: Reader(inner), budget }
    }
}

impl<R: Read> ByteSource for SerialReplay<R> {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let size = buf.len().min(self.budget);
        self.reader.read_available(&mut buf[..size])
    }
}

pub fn write_ppm(surface: &Surface, writer: &mut impl Write) -> io::Result<()> {
    write!(writer, "P6\n{} {}\n255\n", surface.width(), surface.height())?;
    writer.write_all(surface.as_bytes())
}

/// Stores every n-th frame as binary PPM, or discards frames without a directory
pub struct SnapshotPresenter {
    dir: Option<PathBuf>,
    every: usize,
    frames: usize,
}

impl SnapshotPresenter {
    pub fn new(dir: Option<PathBuf>, every: usize) -> Self {
        Self { dir, every: every.max(1), frames: 0 }
    }
}

impl Presenter for SnapshotPresenter {
    fn present(&mut self, surface: &Surface) -> Result<(), Error> {
        self.frames += 1;
        let dir = match self.dir.as_ref() {
            Some(dir) if self.frames % self.every == 0 => dir,
            _ => return Ok(()),
        };
        let path = dir.join(format!("frame-{:06}.ppm", self.frames));
        let mut writer = BufWriter::new(File::create(&path)?);
        write_ppm(surface, &mut writer)?;
        writer.flush()?;
        debug!("Snapshot written to {}", path.display());
        Ok(())
    }
}

/// Key presses read from stdin on a helper thread, one command per character
pub struct StdinCommands {
    receiver: Receiver<Command>,
}

impl StdinCommands {
    pub fn spawn() -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("Read stdin failed: {}", e);
                        return;
                    }
                };
                for key in line.chars() {
                    if sender.send(Command::from(key)).is_err() {
                        return;
                    }
                }
            }
            trace!("Stdin closed");
        });
        Self { receiver }
    }

    pub fn from_receiver(receiver: Receiver<Command>) -> Self {
        Self { receiver }
    }
}

impl CommandSource for StdinCommands {
    fn poll(&mut self, timeout: Duration) -> Option<Command> {
        match self.receiver.recv_timeout(timeout) {
            Ok(command) => Some(command),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

mod test {
    #[test]
    fn test_synthetic_feed() {
        use fpv_hud::hal::{Error, VideoFeed};

        use super::{Pattern, SyntheticFeed, GROUND, SKY};

        let mut feed = SyntheticFeed::new(64, 48, Pattern::Landscape).with_limit(2);
        let surface = feed.acquire().unwrap();
        assert_eq!((surface.width(), surface.height()), (64, 48));
        assert_eq!(surface.get(40, 0), Some(SKY));
        assert_eq!(surface.get(40, 47), Some(GROUND));
        assert!(feed.acquire().is_ok());
        assert!(matches!(feed.acquire(), Err(Error::Unavailable(_))));

        let mut feed = SyntheticFeed::new(64, 64, Pattern::Checker);
        let first = feed.acquire().unwrap();
        assert_ne!(first.get(0, 0), first.get(32, 0));
        assert_ne!(feed.acquire().unwrap(), first);
    }

    #[test]
    fn test_serial_replay() {
        use std::io::Cursor;
        use std::time::Duration;

        use fpv_hud::hal::ByteSource;

        use super::SerialReplay;

        let bytes = Cursor::new(vec![0u8; 100]);
        let mut replay = SerialReplay::new(bytes, 9600, Duration::from_millis(40));
        let mut buf = [0u8; 64];
        assert_eq!(replay.read_available(&mut buf).unwrap(), 38);
        assert_eq!(replay.read_available(&mut buf).unwrap(), 38);
        assert_eq!(replay.read_available(&mut buf).unwrap(), 24);
        assert_eq!(replay.read_available(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_write_ppm() {
        use fpv_hud::osd::{Color, Surface};

        use super::write_ppm;

        let surface = Surface::filled(2, 1, Color(1, 2, 3));
        let mut bytes = Vec::new();
        write_ppm(&surface, &mut bytes).unwrap();
        assert_eq!(&bytes[..11], b"P6\n2 1\n255\n");
        assert_eq!(&bytes[11..], &[1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_snapshot_presenter() {
        use fpv_hud::hal::Presenter;
        use fpv_hud::osd::Surface;

        use super::SnapshotPresenter;

        let dir = std::env::temp_dir().join(format!("fpv-hud-snapshot-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut presenter = SnapshotPresenter::new(Some(dir.clone()), 2);
        let surface = Surface::new(4, 4);
        for _ in 0..4 {
            presenter.present(&surface).unwrap();
        }
        assert!(!dir.join("frame-000001.ppm").exists());
        assert!(dir.join("frame-000002.ppm").exists());
        assert_eq!(std::fs::metadata(dir.join("frame-000004.ppm")).unwrap().len(), 11 + 4 * 4 * 3);
        std::fs::remove_dir_all(&dir).unwrap();

        let mut presenter = SnapshotPresenter::new(Some(dir.join("missing")), 1);
        assert!(presenter.present(&surface).is_err());
    }

    #[test]
    fn test_commands() {
        use std::sync::mpsc;
        use std::time::Duration;

        use fpv_hud::hal::{Command, CommandSource};

        use super::StdinCommands;

        let (sender, receiver) = mpsc::channel();
        let mut commands = StdinCommands::from_receiver(receiver);
        sender.send(Command::from('s')).unwrap();
        sender.send(Command::from('q')).unwrap();
        assert_eq!(commands.poll(Duration::from_millis(1)), Some(Command::Swap));
        assert_eq!(commands.poll(Duration::from_millis(1)), Some(Command::Quit));
        assert_eq!(commands.poll(Duration::from_millis(1)), None);
        drop(sender);
        assert_eq!(commands.poll(Duration::from_millis(1)), None);
    }
}
