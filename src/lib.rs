//! Ghost Flap - an endless side-scrolling flap-through-the-gaps arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, contacts, spawning, game loop)
//! - `runner`: Frame accumulator that drives fixed simulation ticks
//! - `settings`: Data-driven tuning loaded from JSON
//! - `session`: Log of the runs finished since launch

pub mod runner;
pub mod session;
pub mod settings;
pub mod sim;

pub use runner::Game;
pub use session::{RunRecord, SessionLog};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default visible area (portrait phone, in points)
    pub const SCREEN_WIDTH: f32 = 390.0;
    pub const SCREEN_HEIGHT: f32 = 844.0;

    /// Downward acceleration (9.8 m/s² at 150 points per meter)
    pub const GRAVITY: f32 = 1470.0;
    /// Upward impulse applied on every flap
    pub const FLAP_IMPULSE: f32 = 90.0;
    /// Character mass; impulse / mass gives the flap velocity
    pub const CHARACTER_MASS: f32 = 0.18;

    /// Character sprite size and collision radius (half the sprite height)
    pub const CHARACTER_WIDTH: f32 = 60.0;
    pub const CHARACTER_HEIGHT: f32 = 70.0;
    pub const CHARACTER_RADIUS: f32 = CHARACTER_HEIGHT / 2.0;

    /// Ground strip height
    pub const GROUND_HEIGHT: f32 = 90.0;

    /// Wall sprite size (after the half-scale applied to the art)
    pub const WALL_WIDTH: f32 = 52.0;
    pub const WALL_HEIGHT: f32 = 500.0;
    /// Vertical distance from pair centre to each wall centre
    pub const WALL_CENTER_OFFSET: f32 = 350.0;
    /// Score zone size
    pub const SCORE_ZONE_SIZE: f32 = 50.0;
    /// Horizontal spawn offset past the right edge
    pub const SPAWN_X_OFFSET: f32 = 25.0;

    /// Seconds between successful spawns
    pub const SPAWN_INTERVAL_SECS: f32 = 3.0;
    /// Seconds before re-checking when a pair is still on screen
    pub const SPAWN_RETRY_SECS: f32 = 1.0;
    /// Maximum vertical offset of a pair from the screen midline
    pub const GAP_JITTER: f32 = 200.0;
    /// Travel time per unit of distance
    pub const SCROLL_SECS_PER_UNIT: f32 = 0.008;
    /// Extra travel past the left edge before removal
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Restart control size and reveal time
    pub const RESTART_WIDTH: f32 = 200.0;
    pub const RESTART_HEIGHT: f32 = 100.0;
    pub const RESTART_REVEAL_SECS: f32 = 0.3;

    /// Score label distance below the top edge
    pub const SCORE_LABEL_INSET: f32 = 100.0;
}

/// Convert a duration in seconds to whole simulation ticks (at least one)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    ((secs / consts::SIM_DT).round() as u64).max(1)
}

/// Convert a tick count back to seconds
#[inline]
pub fn ticks_to_secs(ticks: u64) -> f32 {
    ticks as f32 * consts::SIM_DT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secs_to_ticks() {
        assert_eq!(secs_to_ticks(3.0), 360);
        assert_eq!(secs_to_ticks(1.0), 120);
        assert_eq!(secs_to_ticks(0.3), 36);
        // Never schedule into the current tick
        assert_eq!(secs_to_ticks(0.0), 1);
    }

    #[test]
    fn test_ticks_round_trip() {
        assert!((ticks_to_secs(secs_to_ticks(2.5)) - 2.5).abs() < 0.001);
    }
}
