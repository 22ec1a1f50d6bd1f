//! Tool modes.
//!
//! Exactly one tool is active; it decides how a press/move/release gesture
//! is interpreted by the interaction state machine.

use tm_core::MeasureKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolMode {
    #[default]
    Select,
    Pan,
    Move,
    MeasureLine,
    MeasureCone,
    MeasureCircle,
    MeasureSquare,
    RevealFog,
    HideFog,
    PlaceToken,
}

impl ToolMode {
    pub const ALL: [ToolMode; 10] = [
        ToolMode::Select,
        ToolMode::Pan,
        ToolMode::Move,
        ToolMode::MeasureLine,
        ToolMode::MeasureCone,
        ToolMode::MeasureCircle,
        ToolMode::MeasureSquare,
        ToolMode::RevealFog,
        ToolMode::HideFog,
        ToolMode::PlaceToken,
    ];

    /// Host-facing name.
    pub fn name(self) -> &'static str {
        match self {
            ToolMode::Select => "select",
            ToolMode::Pan => "pan",
            ToolMode::Move => "move",
            ToolMode::MeasureLine => "measureLine",
            ToolMode::MeasureCone => "measureCone",
            ToolMode::MeasureCircle => "measureCircle",
            ToolMode::MeasureSquare => "measureSquare",
            ToolMode::RevealFog => "revealFog",
            ToolMode::HideFog => "hideFog",
            ToolMode::PlaceToken => "placeToken",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn measure_kind(self) -> Option<MeasureKind> {
        match self {
            ToolMode::MeasureLine => Some(MeasureKind::Line),
            ToolMode::MeasureCone => Some(MeasureKind::Cone),
            ToolMode::MeasureCircle => Some(MeasureKind::Circle),
            ToolMode::MeasureSquare => Some(MeasureKind::Square),
            _ => None,
        }
    }

    pub fn is_measure(self) -> bool {
        self.measure_kind().is_some()
    }

    /// `Some(true)` for reveal, `Some(false)` for hide.
    pub fn fog_reveals(self) -> Option<bool> {
        match self {
            ToolMode::RevealFog => Some(true),
            ToolMode::HideFog => Some(false),
            _ => None,
        }
    }

    pub fn is_fog(self) -> bool {
        self.fog_reveals().is_some()
    }
}

impl std::fmt::Display for ToolMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
