/// Keyboard shortcuts for the player and overlay
use eframe::egui;

/// Keyboard command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    // Playback
    TogglePlay,
    Reset,
    StepBackward,
    StepForward,

    // Overlay
    ToggleFloating,
    ToggleLock,

    // Script
    ToggleEdit,
    NewScript,
}

impl KeyCommand {
    pub const ALL: [KeyCommand; 8] = [
        Self::TogglePlay,
        Self::Reset,
        Self::StepBackward,
        Self::StepForward,
        Self::ToggleFloating,
        Self::ToggleLock,
        Self::ToggleEdit,
        Self::NewScript,
    ];

    /// Check if keyboard input matches this command
    pub fn check(&self, ctx: &egui::Context) -> bool {
        ctx.input(|i| match self {
            Self::TogglePlay => i.key_pressed(egui::Key::Space),
            Self::Reset => i.key_pressed(egui::Key::Home),
            Self::StepBackward => {
                i.key_pressed(egui::Key::ArrowUp) || i.key_pressed(egui::Key::PageUp)
            }
            Self::StepForward => {
                i.key_pressed(egui::Key::ArrowDown) || i.key_pressed(egui::Key::PageDown)
            }
            Self::ToggleFloating => i.key_pressed(egui::Key::F) && !i.modifiers.command,
            Self::ToggleLock => i.key_pressed(egui::Key::L) && !i.modifiers.command,
            Self::ToggleEdit => i.key_pressed(egui::Key::E) && !i.modifiers.command,
            Self::NewScript => i.modifiers.command && i.key_pressed(egui::Key::N),
        })
    }

    /// Commands pressed this frame. Empty while a text field has focus.
    pub fn pressed(ctx: &egui::Context) -> Vec<Self> {
        if ctx.wants_keyboard_input() {
            return Vec::new();
        }
        Self::ALL.into_iter().filter(|c| c.check(ctx)).collect()
    }

    pub fn description(&self) -> &str {
        match self {
            Self::TogglePlay => "Play/Pause",
            Self::Reset => "Back to Top",
            Self::StepBackward => "Step Backward",
            Self::StepForward => "Step Forward",
            Self::ToggleFloating => "Floating Window",
            Self::ToggleLock => "Lock Floating Window",
            Self::ToggleEdit => "Edit Script",
            Self::NewScript => "New Script",
        }
    }

    pub fn shortcut_text(&self) -> &str {
        match self {
            Self::TogglePlay => "Space",
            Self::Reset => "Home",
            Self::StepBackward => "↑ / PgUp",
            Self::StepForward => "↓ / PgDn",
            Self::ToggleFloating => "F",
            Self::ToggleLock => "L",
            Self::ToggleEdit => "E",
            Self::NewScript => "Cmd+N",
        }
    }
}
