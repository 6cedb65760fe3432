use std::io::{self, Read};

use super::Error;

/// Non-blocking byte stream, typically a serial link
pub trait ByteSource {
    /// Copies whatever is buffered into `buf`, returning 0 when nothing is pending.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Error>;
}

/// Adapts any `std::io::Read` configured for non-blocking or timed-out reads
pub struct Reader<R>(pub R);

impl<R: Read> ByteSource for Reader<R> {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        match self.0.read(buf) {
            Ok(size) => Ok(size),
            Err(e) => match e.kind() {
                io::ErrorKind::WouldBlock
                | io::ErrorKind::TimedOut
                | io::ErrorKind::Interrupted => Ok(0),
                _ => Err(e.into()),
            },
        }
    }
}

impl<B: ByteSource + ?Sized> ByteSource for Box<B> {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        (**self).read_available(buf)
    }
}

mod test {
    #[test]
    fn test_reader() {
        use std::io::Cursor;

        use super::{ByteSource, Reader};

        let mut reader = Reader(Cursor::new(vec![1u8, 2, 3]));
        let mut buf = [0u8; 2];
        assert_eq!(reader.read_available(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(reader.read_available(&mut buf).unwrap(), 1);
        assert_eq!(reader.read_available(&mut buf).unwrap(), 0);
    }
}
