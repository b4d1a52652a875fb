use std::cell::Cell;

use crate::errors::*;
use crate::math::prelude::Vector2;

use super::super::events::Event;
use super::super::WindowParams;
use super::Visitor;

pub struct HeadlessVisitor {
    dimensions: Cell<Vector2<u32>>,
}

impl HeadlessVisitor {
    pub fn new(params: &WindowParams) -> Self {
        HeadlessVisitor {
            dimensions: Cell::new(Vector2::new(params.size[0], params.size[1])),
        }
    }
}

impl Visitor for HeadlessVisitor {
    #[inline]
    fn dimensions(&self) -> Vector2<u32> {
        self.dimensions.get()
    }

    #[inline]
    fn device_pixel_ratio(&self) -> f32 {
        1.0
    }

    #[inline]
    fn resize(&self, dimensions: Vector2<u32>) {
        self.dimensions.set(dimensions);
    }

    #[inline]
    fn poll_events(&mut self, _: &mut Vec<Event>) {}

    #[inline]
    fn is_current(&self) -> bool {
        true
    }

    #[inline]
    fn make_current(&self) -> Result<()> {
        Ok(())
    }

    #[inline]
    fn swap_buffers(&self) -> Result<()> {
        Ok(())
    }
}
