use bevy::prelude::*;

/// Input surface of the focus controller. Trigger it with `Commands::trigger`.
#[derive(Debug, Copy, Clone, PartialEq, Event)]
pub enum FocusCommand {
    /// Toward the central body (index decreases)
    NavigateIn,
    /// Away from the central body (index increases)
    NavigateOut,
    SetFocus(i64),
    SetViewAngle(f32),
}
