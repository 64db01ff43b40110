//! Controller output actions.
//!
//! Each poll step returns a bounded list of actions describing every
//! side effect of that iteration. The controller stays pure (and
//! host-testable); the [`crate::exec::Effects`] executor applies the
//! actions to hardware, including the blocking dwells.

use heapless::Vec;

use gumdrop_protocol::Report;

use crate::render::Screen;
use crate::traits::Rgb;

/// Maximum actions one poll step can emit. Sized with headroom over
/// the worst single-iteration burst (a verdict line, a candy-lock
/// expiry, and a button press landing in the same pass).
pub const MAX_ACTIONS: usize = 24;

/// Action list for one poll step
pub type Actions = Vec<Action, MAX_ACTIONS>;

/// One side effect requested by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send one line to the host
    Send(Report),
    /// Set the eye indicator color
    SetEyes(Rgb),
    /// Redraw the display
    Show(Screen),
    /// Redraw the display, then dwell (blocking) before continuing
    ShowFor { screen: Screen, dwell_ms: u16 },
    /// Sound the 3-pulse warning pattern (blocking)
    PlayWarning,
    /// Play the completion melody (blocking)
    PlayMelody,
    /// Run the servo dispense sequence (blocking)
    Dispense,
}
