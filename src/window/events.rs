/// The window events which are relevant to the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The window has been requested to close.
    Closed,
    /// The size of the window has changed, in pixels.
    Resized(u32, u32),
}
