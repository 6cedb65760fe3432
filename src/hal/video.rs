use super::Error;
use crate::osd::Surface;

pub trait VideoFeed {
    /// Blocks at most for the feed's own timeout
    fn acquire(&mut self) -> Result<Surface, Error>;
}

pub trait Presenter {
    fn present(&mut self, surface: &Surface) -> Result<(), Error>;
}
