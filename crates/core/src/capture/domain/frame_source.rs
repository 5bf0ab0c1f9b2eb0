use crate::shared::frame::Frame;

/// Opens video streams, e.g. a camera by device index.
pub trait FrameSource: Send {
    /// Opens the device and returns a live stream handle.
    fn open(&mut self, device_index: u32)
        -> Result<Box<dyn FrameStream>, Box<dyn std::error::Error>>;
}

/// An open stream of frames.
///
/// Implementations release their device in [`FrameStream::release`] and
/// again on drop; both must tolerate being called more than once.
pub trait FrameStream: Send {
    /// Reads the next frame. `Ok(None)` means the device delivered nothing
    /// this time (empty grab, end of a replay).
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the underlying device.
    fn release(&mut self);
}
