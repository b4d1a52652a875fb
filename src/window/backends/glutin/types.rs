use glutin;

use super::super::super::events::Event;

pub fn from_event(source: glutin::Event, dpr: f64) -> Option<Event> {
    match source {
        glutin::Event::WindowEvent { event, .. } => from_window_event(&event, dpr),
        _ => None,
    }
}

fn from_window_event(source: &glutin::WindowEvent, dpr: f64) -> Option<Event> {
    match *source {
        glutin::WindowEvent::CloseRequested | glutin::WindowEvent::Destroyed => {
            Some(Event::Closed)
        }

        glutin::WindowEvent::Resized(size) => {
            let size = size.to_physical(dpr);
            Some(Event::Resized(size.width as u32, size.height as u32))
        }

        _ => None,
    }
}
