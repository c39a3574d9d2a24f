//! User input for the attractor.
//!
//! Every control the host exposes becomes a [`Command`], applied between
//! frames by [`SimulationLoop::apply`](crate::SimulationLoop::apply).
//! [`Input`] translates raw `winit` window events into commands for hosts
//! built on `winit`; other hosts construct commands directly.
//!
//! # Default bindings
//!
//! | Key / gesture | Command |
//! |---------------|---------|
//! | `R` | [`Command::Reset`] |
//! | `Space` | [`Command::SpawnNow`] |
//! | `S` | [`Command::ToggleStable`] |
//! | `A` | [`Command::ToggleAutoSpawn`] |
//! | `F` | [`Command::Fit`] |
//! | `+` / `=` , `-` | [`Command::ZoomIn`], [`Command::ZoomOut`] |
//! | `]` , `[` | [`Command::RaiseSpawnLevel`], [`Command::LowerSpawnLevel`] |
//! | arrows | alpha (left/right) and beta (up/down) by one step |
//! | mouse wheel | zoom |
//! | left drag | orbit |

use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Theme as WinitTheme;

use crate::params::PARAM_STEP;

/// Radians of orbit per pixel of drag.
const ORBIT_SENSITIVITY: f64 = 0.005;

/// A discrete user action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Reseed every particle.
    Reset,
    /// Spawn a random batch now.
    SpawnNow,
    ZoomIn,
    ZoomOut,
    /// Frame all heads and trails.
    Fit,
    ToggleAutoSpawn,
    RaiseSpawnLevel,
    LowerSpawnLevel,
    SetAlpha(f64),
    SetBeta(f64),
    /// Change alpha by a signed amount.
    NudgeAlpha(f64),
    /// Change beta by a signed amount.
    NudgeBeta(f64),
    SetStable(bool),
    ToggleStable,
    /// Host dark-mode flag changed.
    SetDarkTheme(bool),
    /// Host viewport changed size (debounced before it takes effect).
    Resize { width: u32, height: u32 },
    /// Rotate the camera about its target.
    Orbit { d_yaw: f64, d_pitch: f64 },
}

/// Command bound to a physical key, if any.
pub fn command_for_key(key: KeyCode) -> Option<Command> {
    let cmd = match key {
        KeyCode::KeyR => Command::Reset,
        KeyCode::Space => Command::SpawnNow,
        KeyCode::KeyS => Command::ToggleStable,
        KeyCode::KeyA => Command::ToggleAutoSpawn,
        KeyCode::KeyF => Command::Fit,
        KeyCode::Equal | KeyCode::NumpadAdd => Command::ZoomIn,
        KeyCode::Minus | KeyCode::NumpadSubtract => Command::ZoomOut,
        KeyCode::BracketRight => Command::RaiseSpawnLevel,
        KeyCode::BracketLeft => Command::LowerSpawnLevel,
        KeyCode::ArrowRight => Command::NudgeAlpha(PARAM_STEP),
        KeyCode::ArrowLeft => Command::NudgeAlpha(-PARAM_STEP),
        KeyCode::ArrowUp => Command::NudgeBeta(PARAM_STEP),
        KeyCode::ArrowDown => Command::NudgeBeta(-PARAM_STEP),
        _ => return None,
    };
    Some(cmd)
}

/// Zoom command for a wheel movement. Scrolling up zooms in.
pub fn command_for_scroll(delta: MouseScrollDelta) -> Option<Command> {
    let scroll = match delta {
        MouseScrollDelta::LineDelta(_, y) => y as f64,
        MouseScrollDelta::PixelDelta(pos) => pos.y * 0.1,
    };
    if scroll > 0.0 {
        Some(Command::ZoomIn)
    } else if scroll < 0.0 {
        Some(Command::ZoomOut)
    } else {
        None
    }
}

/// Translates `winit` window events into commands, tracking drag state.
#[derive(Debug, Default)]
pub struct Input {
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Command for a window event, if it maps to one.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<Command> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return None;
                }
                match event.physical_key {
                    PhysicalKey::Code(code) => command_for_key(code),
                    _ => None,
                }
            }
            WindowEvent::MouseWheel { delta, .. } => command_for_scroll(*delta),
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_button(*button, *state);
                None
            }
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(position.x, position.y),
            WindowEvent::Resized(size) => Some(Command::Resize {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::ThemeChanged(theme) => {
                Some(Command::SetDarkTheme(*theme == WinitTheme::Dark))
            }
            _ => None,
        }
    }

    /// Track the left button for orbit drags.
    pub fn mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.dragging = state == ElementState::Pressed;
            if !self.dragging {
                self.last_cursor = None;
            }
        }
    }

    /// Orbit command for a cursor move while dragging.
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> Option<Command> {
        if !self.dragging {
            return None;
        }
        let cmd = self.last_cursor.map(|(lx, ly)| Command::Orbit {
            d_yaw: -(x - lx) * ORBIT_SENSITIVITY,
            d_pitch: (y - ly) * ORBIT_SENSITIVITY,
        });
        self.last_cursor = Some((x, y));
        cmd
    }
}
