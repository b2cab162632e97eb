use crate::{Extent, Point};
use serde::{Deserialize, Serialize};

/// Smallest size the overlay can be pinched down to, per dimension.
pub const MIN_FRAME_DIMENSION: f32 = 200.0;
/// Gap kept between the overlay and the container edge when growing.
pub const CONTAINER_MARGIN: f32 = 40.0;
pub const DEFAULT_FRAME_SIZE: Extent = Extent::new(300.0, 200.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    Moved,
    Resized,
    /// The event was observed but the frame is locked.
    Ignored,
    LockChanged(bool),
    CloseRequested,
}

/// Clamp one dimension of a pinch-resized frame: `min(max(200, s), c - 40)`.
pub fn clamp_dimension(scaled: f32, container: f32) -> f32 {
    scaled.max(MIN_FRAME_DIMENSION).min(container - CONTAINER_MARGIN)
}

/// Position, size and lock state of the floating overlay.
///
/// `position` is the centre of the frame in container coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFrame {
    pub position: Point,
    pub size: Extent,
    pub locked: bool,
    #[serde(skip)]
    last_drag: Option<Point>,
}

impl WindowFrame {
    pub fn new(position: Point, size: Extent) -> Self {
        Self {
            position,
            size,
            locked: false,
            last_drag: None,
        }
    }

    /// Default-sized frame centred in `container`.
    pub fn centered_in(container: Extent) -> Self {
        Self::new(container.center(), DEFAULT_FRAME_SIZE)
    }

    pub fn last_drag(&self) -> Option<Point> {
        self.last_drag
    }

    /// Pointer moved during a drag gesture.
    pub fn drag_changed(&mut self, location: Point) -> FrameEvent {
        if self.locked {
            return FrameEvent::Ignored;
        }
        if let Some(last) = self.last_drag {
            self.position.x += location.x - last.x;
            self.position.y += location.y - last.y;
        }
        self.last_drag = Some(location);
        FrameEvent::Moved
    }

    pub fn drag_ended(&mut self) {
        self.last_drag = None;
    }

    /// Pinch gesture update. `scale` multiplies the current size.
    pub fn magnify(&mut self, scale: f32, container: Extent) -> FrameEvent {
        if self.locked {
            return FrameEvent::Ignored;
        }
        self.size = Extent::new(
            clamp_dimension(self.size.width * scale, container.width),
            clamp_dimension(self.size.height * scale, container.height),
        );
        FrameEvent::Resized
    }

    pub fn toggle_lock(&mut self) -> FrameEvent {
        self.locked = !self.locked;
        tracing::debug!(locked = self.locked, "overlay lock toggled");
        FrameEvent::LockChanged(self.locked)
    }

    /// Ask the owner to hide the overlay. Visibility lives with the owner.
    pub fn close(&mut self) -> FrameEvent {
        self.last_drag = None;
        FrameEvent::CloseRequested
    }
}
