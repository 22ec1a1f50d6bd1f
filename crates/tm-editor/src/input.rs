//! Input abstraction layer.
//!
//! Hosts normalize mouse, touch, and stylus input into `PointerEvent`s in
//! canvas pixels. One pointer at a time; multi-touch pinch arrives as
//! `Scroll` with a zoom factor.

use tm_core::ScreenPoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed (mouse down, touch start, pencil contact).
    Press { x: f32, y: f32 },

    /// Pointer moved, pressed or not.
    Move { x: f32, y: f32 },

    /// Pointer released.
    Release { x: f32, y: f32 },

    /// The platform took the pointer away (touch cancel, focus loss).
    Cancel,

    /// Wheel or pinch.
    Scroll {
        x: f32,
        y: f32,
        /// Zoom factor (1.0 = no change; >1 = zoom in).
        zoom: f32,
    },
}

impl PointerEvent {
    pub fn press(x: f32, y: f32) -> Self {
        Self::Press { x, y }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::Move { x, y }
    }

    pub fn release(x: f32, y: f32) -> Self {
        Self::Release { x, y }
    }

    /// Screen position, if the event carries one.
    pub fn position(&self) -> Option<ScreenPoint> {
        match *self {
            Self::Press { x, y }
            | Self::Move { x, y }
            | Self::Release { x, y }
            | Self::Scroll { x, y, .. } => Some(ScreenPoint::new(x, y)),
            Self::Cancel => None,
        }
    }
}
