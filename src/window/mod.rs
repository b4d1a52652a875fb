//! Represents an OpenGL context and the window or environment around it.
//!
//! Exactly one windowed `Context` may be live in a process. It drives the
//! frame loop: `tick` pumps the OS event queue and presents the back buffer,
//! `clear` resets the color and depth buffers, and `should_close` reports
//! whether the platform asked the window to close.

pub mod events;

mod backends;

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::errors::*;
use crate::math::prelude::Vector2;
use crate::params::Params;
use crate::video::Device;

use self::backends::Visitor;
use self::events::Event;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowParams {
    /// Sets the title of window.
    pub title: String,
    /// Sets the size in *points* of the client area of the window.
    pub size: [u32; 2],
    /// Sets the multisampling level to request. A value of 0 indicates that
    /// multisampling must not be enabled.
    pub multisample: u16,
    /// Specifies whether should we have vsync.
    pub vsync: bool,
}

impl Default for WindowParams {
    fn default() -> Self {
        WindowParams {
            title: "pastel".to_owned(),
            size: [512, 512],
            multisample: 0,
            vsync: true,
        }
    }
}

static LIVE: AtomicBool = AtomicBool::new(false);

/// The frame loop state lives in cells, so that the `Device` borrowing this
/// context does not stop the loop from advancing.
pub struct Context {
    visitor: RefCell<Box<dyn Visitor>>,
    params: Params,
    events: RefCell<Vec<Event>>,
    closed: Cell<bool>,
    headless: bool,
    resized: Cell<Option<Vector2<u32>>>,
    epoch: Cell<Instant>,
    offset: Cell<f32>,
}

impl Context {
    /// Creates a window with a current OpenGL context, loads the GL function
    /// table and sets up the default render state.
    pub fn init(params: Params) -> Result<Self> {
        if LIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::ContextExists);
        }

        match Self::init_window(params) {
            Ok(ctx) => Ok(ctx),
            Err(err) => {
                error!("[Context] failed to initialize: {}", err);
                LIVE.store(false, Ordering::SeqCst);
                Err(err)
            }
        }
    }

    fn init_window(params: Params) -> Result<Self> {
        let visitor = backends::new(&params.window)?;

        unsafe {
            crate::video::backends::gl::setup(params.clear_color)?;
        }

        info!(
            "[Context] creates window {:?} ({}x{}).",
            params.window.title, params.window.size[0], params.window.size[1]
        );

        Ok(Context::from_visitor(visitor, params, false))
    }

    /// Creates a context without any window or GL context. Devices created from
    /// it record their commands instead of submitting them to a GPU.
    pub fn headless(params: Params) -> Self {
        let visitor = backends::new_headless(&params.window);
        Context::from_visitor(visitor, params, true)
    }

    fn from_visitor(visitor: Box<dyn Visitor>, params: Params, headless: bool) -> Self {
        Context {
            visitor: RefCell::new(visitor),
            params,
            events: RefCell::new(Vec::new()),
            closed: Cell::new(false),
            headless,
            resized: Cell::new(None),
            epoch: Cell::new(Instant::now()),
            offset: Cell::new(0.0),
        }
    }

    /// Polls the events of the window and presents the back buffer. Should be
    /// called once at the top of every frame.
    pub fn tick(&self) -> Result<()> {
        let mut visitor = self.visitor.borrow_mut();
        debug_assert!(visitor.is_current(), "context is not current.");

        let mut events = self.events.borrow_mut();
        visitor.poll_events(&mut events);

        for event in events.drain(..) {
            match event {
                Event::Closed => {
                    info!("[Context] close requested.");
                    self.closed.set(true);
                }
                Event::Resized(width, height) => {
                    let dimensions = Vector2::new(width, height);
                    visitor.resize(dimensions);
                    self.resized.set(Some(dimensions));
                }
            }
        }

        visitor.swap_buffers()
    }

    /// Clears the color and depth buffers of the window. The viewport follows
    /// the last resize seen by `tick`.
    pub fn clear(&self, video: &mut Device) -> Result<()> {
        if let Some(dimensions) = self.resized.take() {
            video.update_viewport(dimensions)?;
        }

        video.clear(self.params.clear_color, 1.0)
    }

    #[inline]
    pub fn should_close(&self) -> bool {
        self.closed.get()
    }

    /// Marks the window as closing, as if the platform had asked for it.
    #[inline]
    pub fn request_close(&self) {
        self.closed.set(true);
    }

    /// Returns the seconds elapsed since the clock was last reset.
    #[inline]
    pub fn time(&self) -> f32 {
        self.offset.get() + self.epoch.get().elapsed().as_secs_f32()
    }

    /// Sets the clock to `value` seconds.
    #[inline]
    pub fn reset_time(&self, value: f32) {
        self.epoch.set(Instant::now());
        self.offset.set(value);
    }

    /// Returns the size in pixels of the drawable area of the window.
    #[inline]
    pub fn dimensions(&self) -> Vector2<u32> {
        self.visitor.borrow().dimensions()
    }

    /// Returns the ratio between the backing framebuffer resolution and the
    /// window size in screen points.
    #[inline]
    pub fn device_pixel_ratio(&self) -> f32 {
        self.visitor.borrow().device_pixel_ratio()
    }

    /// Sets the GL context of this window as the current one of this thread.
    #[inline]
    pub fn make_current(&self) -> Result<()> {
        self.visitor.borrow().make_current()
    }

    #[inline]
    pub fn is_headless(&self) -> bool {
        self.headless
    }

    #[inline]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Destroys the window. Every `Device` created from this context must have
    /// been dropped before, and every GPU object freed.
    pub fn term(self) {
        drop(self);
    }

    /// Queues `event` as if the platform had sent it, for the next `tick`.
    #[cfg(test)]
    fn push_event(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if !self.headless {
            info!("[Context] terminates window {:?}.", self.params.window.title);
            LIVE.store(false, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::backends::headless::Command;

    #[test]
    fn headless_does_not_claim_slot() {
        let a = Context::headless(Params::default());
        let b = Context::headless(Params::default());
        assert!(a.is_headless() && b.is_headless());
        assert!(!LIVE.load(Ordering::SeqCst));
    }

    #[test]
    fn request_close() {
        let ctx = Context::headless(Params::default());
        assert!(!ctx.should_close());
        ctx.tick().unwrap();
        assert!(!ctx.should_close());
        ctx.request_close();
        assert!(ctx.should_close());
    }

    #[test]
    fn resize_updates_viewport() {
        let ctx = Context::headless(Params::default());
        let (mut video, journal) = Device::headless();

        ctx.push_event(Event::Resized(320, 200));
        ctx.tick().unwrap();
        assert_eq!(ctx.dimensions(), Vector2::new(320, 200));
        assert!(journal.commands().is_empty());

        ctx.clear(&mut video).unwrap();
        ctx.clear(&mut video).unwrap();

        let clear = Command::Clear {
            color: ctx.params().clear_color,
            depth: 1.0,
        };

        assert_eq!(
            journal.commands(),
            [
                Command::Viewport(Vector2::new(320, 200)),
                clear.clone(),
                clear
            ]
        );
    }

    #[test]
    fn close_event() {
        let ctx = Context::headless(Params::default());
        ctx.push_event(Event::Closed);
        assert!(!ctx.should_close());
        ctx.tick().unwrap();
        assert!(ctx.should_close());
    }
}
