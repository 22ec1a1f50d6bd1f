//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. `key` is the
//! host's logical key value (e.g. `"z"`, `"Escape"`).

use crate::tools::ToolMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    Tool(ToolMode),

    // ── Fog history ──
    Undo,
    Redo,

    // ── View ──
    ZoomIn,
    ZoomOut,
    ResetView,
    ToggleGrid,
    ToggleDmView,

    /// Abort the gesture in progress.
    Cancel,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action. On macOS `meta` is ⌘; elsewhere
    /// `ctrl` plays the same role. Returns `None` for unbound combos.
    pub fn resolve(key: &str, ctrl: bool, shift: bool, _alt: bool, meta: bool) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetView),
                _ => None,
            };
        }

        if shift {
            return match key {
                "+" => Some(ShortcutAction::ZoomIn),
                _ => None,
            };
        }

        match key {
            "v" | "V" => Some(ShortcutAction::Tool(ToolMode::Select)),
            "h" | "H" | " " => Some(ShortcutAction::Tool(ToolMode::Pan)),
            "m" | "M" => Some(ShortcutAction::Tool(ToolMode::Move)),
            "l" | "L" => Some(ShortcutAction::Tool(ToolMode::MeasureLine)),
            "c" | "C" => Some(ShortcutAction::Tool(ToolMode::MeasureCone)),
            "o" | "O" => Some(ShortcutAction::Tool(ToolMode::MeasureCircle)),
            "q" | "Q" => Some(ShortcutAction::Tool(ToolMode::MeasureSquare)),
            "r" | "R" => Some(ShortcutAction::Tool(ToolMode::RevealFog)),
            "f" | "F" => Some(ShortcutAction::Tool(ToolMode::HideFog)),
            "t" | "T" => Some(ShortcutAction::Tool(ToolMode::PlaceToken)),
            "g" | "G" => Some(ShortcutAction::ToggleGrid),
            "d" | "D" => Some(ShortcutAction::ToggleDmView),
            "=" | "+" => Some(ShortcutAction::ZoomIn),
            "-" => Some(ShortcutAction::ZoomOut),
            "Escape" => Some(ShortcutAction::Cancel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_keys() {
        assert_eq!(
            ShortcutMap::resolve("r", false, false, false, false),
            Some(ShortcutAction::Tool(ToolMode::RevealFog))
        );
        assert_eq!(
            ShortcutMap::resolve("Q", false, false, false, false),
            Some(ShortcutAction::Tool(ToolMode::MeasureSquare))
        );
    }

    #[test]
    fn undo_redo_on_both_platforms() {
        assert_eq!(
            ShortcutMap::resolve("z", true, false, false, false),
            Some(ShortcutAction::Undo)
        );
        assert_eq!(
            ShortcutMap::resolve("z", false, false, false, true),
            Some(ShortcutAction::Undo)
        );
        assert_eq!(
            ShortcutMap::resolve("Z", false, true, false, true),
            Some(ShortcutAction::Redo)
        );
        assert_eq!(
            ShortcutMap::resolve("y", true, false, false, false),
            Some(ShortcutAction::Redo)
        );
    }

    #[test]
    fn modifiers_shadow_single_keys() {
        // ⌘R is the host's reload, not the reveal tool.
        assert_eq!(ShortcutMap::resolve("r", true, false, false, false), None);
        assert_eq!(
            ShortcutMap::resolve("Escape", false, false, false, false),
            Some(ShortcutAction::Cancel)
        );
        assert_eq!(ShortcutMap::resolve("x", false, false, false, false), None);
    }
}
