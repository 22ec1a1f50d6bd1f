pub mod canvas;
pub mod commands;
pub mod events;
pub mod input;
pub mod interaction;
pub mod shortcuts;
pub mod tools;

pub use canvas::MapCanvas;
pub use events::MapEvent;
pub use input::PointerEvent;
pub use interaction::{Board, Gesture, Interaction};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::ToolMode;
