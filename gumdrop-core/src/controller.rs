//! The central poll-loop controller.
//!
//! One `poll` call is one loop iteration: it consumes at most one
//! parsed serial line and the current button levels, advances every
//! timer against the caller-supplied clock, and returns the bounded
//! action list describing this iteration's side effects. The
//! controller itself never touches hardware and never blocks, which
//! keeps the whole state machine host-testable.
//!
//! Evaluation order within one iteration is fixed: serial command,
//! red-eye revert, punitive lock (early-returns while held), candy
//! lock expiry, buttons, session countdown.

use heapless::String;

use gumdrop_protocol::{Command, Report, MAX_LINE_LEN};

use crate::actions::{Action, Actions};
use crate::clock::Instant;
use crate::config::Tunables;
use crate::locks::TimedWindow;
use crate::render::{self, CountdownCache, LockFlash};
use crate::session::SessionTimer;
use crate::state::{Event, Mode};
use crate::traits::Rgb;

/// Sampled button levels for one poll (true = pressed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonState {
    pub up: bool,
    pub down: bool,
    pub enter: bool,
}

impl ButtonState {
    /// No button pressed
    pub const RELEASED: Self = Self {
        up: false,
        down: false,
        enter: false,
    };
}

/// Device controller: all state behind the poll loop
pub struct Controller {
    tunables: Tunables,
    mode: Mode,
    focus_time_s: u16,
    session: Option<SessionTimer>,
    lock: Option<TimedWindow>,
    candy_lock: Option<TimedWindow>,
    eyes_red_since: Option<Instant>,
    countdown_cache: CountdownCache,
    lock_flash: LockFlash,
    last_press: Option<Instant>,
    last_remaining_trace: Option<Instant>,
}

impl Controller {
    pub fn new(tunables: Tunables) -> Self {
        Self {
            mode: Mode::Idle,
            focus_time_s: tunables.focus_default_s,
            session: None,
            lock: None,
            candy_lock: None,
            eyes_red_since: None,
            countdown_cache: CountdownCache::new(),
            lock_flash: LockFlash::new(tunables.flash_half_period_ms),
            last_press: None,
            last_remaining_trace: None,
            tunables,
        }
    }

    /// Current primary mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Currently configured session length (seconds)
    pub fn focus_time_s(&self) -> u16 {
        self.focus_time_s
    }

    /// Power-up actions: white eyes, readiness banner, idle screen
    pub fn boot(&mut self) -> Actions {
        let mut out = Actions::new();
        emit(&mut out, Action::SetEyes(Rgb::WHITE));
        emit(&mut out, Action::Send(Report::Ready));
        emit(&mut out, Action::Show(render::set_time(self.focus_time_s)));
        out
    }

    /// Run one loop iteration
    pub fn poll(&mut self, now: Instant, line: Option<&str>, buttons: ButtonState) -> Actions {
        let mut out = Actions::new();

        if let Some(line) = line {
            self.handle_line(now, line, &mut out);
        }

        self.tick_eyes(now, &mut out);

        // The punitive lock suppresses everything below it
        if self.tick_punitive_lock(now, &mut out) {
            return out;
        }

        self.tick_candy_lock(now, &mut out);
        self.handle_buttons(now, buttons, &mut out);
        self.tick_session(now, &mut out);

        out
    }

    // ---- serial commands ---------------------------------------------

    fn handle_line(&mut self, now: Instant, line: &str, out: &mut Actions) {
        // Every line is echoed, recognized or not
        let mut echo: String<MAX_LINE_LEN> = String::new();
        for c in line.chars() {
            if echo.push(c).is_err() {
                break;
            }
        }
        emit(out, Action::Send(Report::Echo(echo)));

        let Some(command) = Command::parse(line) else {
            return;
        };

        match command {
            Command::Buzzer => {
                emit(out, Action::PlayWarning);
                emit(out, Action::Send(Report::WarningPlayed));
                emit(out, Action::SetEyes(Rgb::RED));
                self.eyes_red_since = Some(now);
            }
            Command::Heartbeat => {
                emit(out, Action::Send(Report::HeartbeatOk));
            }
            Command::Distraction { count, site } => {
                // Display truncates to one row; the serial trace keeps
                // the full site name
                emit(
                    out,
                    Action::ShowFor {
                        screen: render::distraction(count, site.as_str()),
                        dwell_ms: 1000,
                    },
                );
                emit(out, Action::Send(Report::DistractionShown { site }));
            }
            Command::Extend { minutes } => {
                if self.mode.in_session() {
                    if let Some(session) = self.session.as_mut() {
                        session.extend_minutes(minutes);
                        emit(
                            out,
                            Action::ShowFor {
                                screen: render::session_extended(minutes),
                                dwell_ms: 1000,
                            },
                        );
                        emit(out, Action::Send(Report::SessionExtended { minutes }));
                    }
                }
            }
            Command::CandyLock { minutes } => {
                self.candy_lock =
                    Some(TimedWindow::open(now, u32::from(minutes) * 60_000));
                emit(out, Action::SetEyes(Rgb::RED));
                emit(
                    out,
                    Action::ShowFor {
                        screen: render::candy_lock_engaged(minutes),
                        dwell_ms: 1000,
                    },
                );
                emit(out, Action::Send(Report::CandyLockEngaged { minutes }));
            }
            Command::EndSession => {
                if self.mode.in_session() {
                    self.mode = self.mode.transition(Event::SessionCut);
                    self.session = None;
                    emit(
                        out,
                        Action::ShowFor {
                            screen: render::session_ended(),
                            dwell_ms: 2000,
                        },
                    );
                    emit(out, Action::Send(Report::SessionCut));
                    emit(out, Action::Send(Report::Done));
                }
            }
            Command::Summary { count } => {
                emit(
                    out,
                    Action::ShowFor {
                        screen: render::summary(count),
                        dwell_ms: 2000,
                    },
                );
                emit(out, Action::Send(Report::SummaryShown { count }));
            }
            Command::Lock => {
                self.mode = self.mode.transition(Event::LockEngaged);
                self.session = None;
                self.lock = Some(TimedWindow::open(now, self.tunables.lock_ms));
                self.lock_flash.reset(now);
                emit(
                    out,
                    Action::Send(Report::LockEngaged {
                        seconds: self.tunables.lock_ms / 1000,
                    }),
                );
            }
            Command::Success => self.handle_success(now, out),
            Command::Fail => self.handle_fail(now, out),
        }
    }

    fn handle_success(&mut self, now: Instant, out: &mut Actions) {
        if self.mode != Mode::AwaitingVerdict {
            return;
        }
        self.mode = self.mode.transition(Event::VerdictSuccess);

        emit(out, Action::Send(Report::VerdictSuccess));
        emit(out, Action::PlayMelody);
        emit(
            out,
            Action::ShowFor {
                screen: render::great_job(),
                dwell_ms: 2000,
            },
        );

        if let Some(candy) = self.candy_lock {
            // Candy stays locked: no dispense, show how long is left
            emit(
                out,
                Action::ShowFor {
                    screen: render::candy_lock_wait(candy.remaining_secs(now)),
                    dwell_ms: 2000,
                },
            );
        } else {
            emit(out, Action::Send(Report::Dispensing));
            emit(out, Action::Show(render::dispensing()));
            emit(out, Action::Dispense);
            emit(
                out,
                Action::ShowFor {
                    screen: render::dispensed(),
                    dwell_ms: 2000,
                },
            );
            self.push_time_display(now, out);
        }

        emit(out, Action::SetEyes(Rgb::WHITE));
    }

    fn handle_fail(&mut self, now: Instant, out: &mut Actions) {
        if self.mode != Mode::AwaitingVerdict {
            return;
        }
        self.mode = self.mode.transition(Event::VerdictFail);

        emit(out, Action::Send(Report::VerdictFail));
        emit(
            out,
            Action::ShowFor {
                screen: render::session_failed(),
                dwell_ms: 2000,
            },
        );
        emit(out, Action::SetEyes(Rgb::WHITE));
        self.push_time_display(now, out);
    }

    // ---- timers ------------------------------------------------------

    /// Revert the transient red eyes once the override elapses. The
    /// candy lock holds the eyes red, so the revert waits it out.
    fn tick_eyes(&mut self, now: Instant, out: &mut Actions) {
        let Some(since) = self.eyes_red_since else {
            return;
        };
        if self.candy_lock.is_some() {
            return;
        }
        if now.elapsed_since(since) >= self.tunables.eyes_red_ms {
            self.eyes_red_since = None;
            emit(out, Action::SetEyes(self.resting_eye_color()));
        }
    }

    /// Returns true while the punitive lock holds the device, in which
    /// case the rest of the iteration is skipped.
    fn tick_punitive_lock(&mut self, now: Instant, out: &mut Actions) -> bool {
        if !self.mode.is_locked() {
            return false;
        }
        let Some(window) = self.lock else {
            return false;
        };

        if window.expired(now) {
            self.mode = self.mode.transition(Event::LockExpired);
            self.lock = None;
            emit(out, Action::Send(Report::LockExpired));
            emit(out, Action::SetEyes(Rgb::WHITE));
            self.push_time_display(now, out);
        } else if let Some(screen) = self.lock_flash.update(now, window.remaining_ms(now)) {
            emit(out, Action::Show(screen));
        }
        true
    }

    fn tick_candy_lock(&mut self, now: Instant, out: &mut Actions) {
        let Some(window) = self.candy_lock else {
            return;
        };
        if window.expired(now) {
            self.candy_lock = None;
            emit(out, Action::Send(Report::CandyLockExpired));
            emit(out, Action::SetEyes(self.resting_eye_color()));
        }
    }

    // ---- buttons -----------------------------------------------------

    fn handle_buttons(&mut self, now: Instant, buttons: ButtonState, out: &mut Actions) {
        if !self.mode.buttons_allowed() {
            return;
        }

        if buttons.up && self.press_allowed(now) {
            self.focus_time_s =
                (self.focus_time_s + self.tunables.focus_step_s).min(self.tunables.focus_max_s);
            emit(
                out,
                Action::Send(Report::FocusTimeChanged {
                    seconds: self.focus_time_s,
                }),
            );
            self.push_time_display(now, out);
            self.last_press = Some(now);
        }

        if buttons.down && self.focus_time_s > self.tunables.focus_min_s && self.press_allowed(now)
        {
            self.focus_time_s = self
                .focus_time_s
                .saturating_sub(self.tunables.focus_step_s)
                .max(self.tunables.focus_min_s);
            emit(
                out,
                Action::Send(Report::FocusTimeChanged {
                    seconds: self.focus_time_s,
                }),
            );
            self.push_time_display(now, out);
            self.last_press = Some(now);
        }

        if buttons.enter && self.press_allowed(now) {
            self.mode = self.mode.transition(Event::StartPressed);
            self.session = Some(SessionTimer::begin(now, self.focus_time_s));
            self.countdown_cache.reset();
            self.last_remaining_trace = Some(now);
            emit(
                out,
                Action::Send(Report::SessionStarted {
                    seconds: self.focus_time_s,
                }),
            );
            emit(out, Action::SetEyes(Rgb::GREEN));
            emit(
                out,
                Action::ShowFor {
                    screen: render::session_starting(),
                    dwell_ms: 2000,
                },
            );
            self.last_press = Some(now);
        }
    }

    fn press_allowed(&self, now: Instant) -> bool {
        match self.last_press {
            Some(last) => now.elapsed_since(last) >= self.tunables.debounce_ms,
            None => true,
        }
    }

    // ---- session countdown -------------------------------------------

    fn tick_session(&mut self, now: Instant, out: &mut Actions) {
        if !self.mode.in_session() {
            return;
        }
        let Some(session) = self.session else {
            return;
        };

        if session.expired(now) {
            self.mode = self.mode.transition(Event::DeadlineReached);
            self.session = None;
            emit(out, Action::Send(Report::SessionComplete));
            emit(out, Action::Send(Report::Done));
            emit(out, Action::Show(render::session_done()));
            return;
        }

        let remaining = session.remaining_ms(now);
        if let Some(screen) = self.countdown_cache.update(remaining) {
            emit(out, Action::Show(screen));
        }

        if let Some(last) = self.last_remaining_trace {
            if now.elapsed_since(last) > self.tunables.remaining_trace_ms {
                emit(
                    out,
                    Action::Send(Report::TimeRemaining {
                        seconds: remaining / 1000,
                    }),
                );
                self.last_remaining_trace = Some(now);
            }
        }
    }

    // ---- shared ------------------------------------------------------

    fn resting_eye_color(&self) -> Rgb {
        if self.mode.in_session() {
            Rgb::GREEN
        } else {
            Rgb::WHITE
        }
    }

    /// Redraw the idle time display; while the candy lock is active the
    /// remaining-lock card is interleaved before settling on the idle
    /// screen.
    fn push_time_display(&self, now: Instant, out: &mut Actions) {
        let idle = render::set_time(self.focus_time_s);
        if let Some(candy) = self.candy_lock {
            emit(
                out,
                Action::ShowFor {
                    screen: idle.clone(),
                    dwell_ms: 1000,
                },
            );
            emit(
                out,
                Action::ShowFor {
                    screen: render::candy_lock_left(candy.remaining_secs(now)),
                    dwell_ms: 2000,
                },
            );
            emit(out, Action::Show(idle));
        } else {
            emit(out, Action::Show(idle));
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(Tunables::default())
    }
}

/// Push one action; a dropped action would break the serial contract,
/// so overflow trips an assertion in debug builds
fn emit(out: &mut Actions, action: Action) {
    let _overflow = out.push(action).is_err();
    debug_assert!(!_overflow, "action list overflow");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Screen;
    use heapless::Vec;

    fn ms(v: u32) -> Instant {
        Instant::from_millis(v)
    }

    fn controller() -> Controller {
        Controller::new(Tunables::default())
    }

    fn tick(c: &mut Controller, at: u32) -> Actions {
        c.poll(ms(at), None, ButtonState::RELEASED)
    }

    fn line(c: &mut Controller, at: u32, text: &str) -> Actions {
        c.poll(ms(at), Some(text), ButtonState::RELEASED)
    }

    fn press(c: &mut Controller, at: u32, buttons: ButtonState) -> Actions {
        c.poll(ms(at), None, buttons)
    }

    const UP: ButtonState = ButtonState {
        up: true,
        down: false,
        enter: false,
    };
    const DOWN: ButtonState = ButtonState {
        up: false,
        down: true,
        enter: false,
    };
    const ENTER: ButtonState = ButtonState {
        up: false,
        down: false,
        enter: true,
    };

    fn reports(actions: &Actions) -> Vec<Report, { crate::actions::MAX_ACTIONS }> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Send(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    fn screens(actions: &Actions) -> Vec<Screen, { crate::actions::MAX_ACTIONS }> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Show(s) => Some(s.clone()),
                Action::ShowFor { screen, .. } => Some(screen.clone()),
                _ => None,
            })
            .collect()
    }

    fn has_dispense(actions: &Actions) -> bool {
        actions.iter().any(|a| matches!(a, Action::Dispense))
    }

    /// Drive an idle controller into AwaitingVerdict: start at `at`,
    /// run the default 20 s session to its deadline.
    fn run_to_verdict(c: &mut Controller, at: u32) -> u32 {
        press(c, at, ENTER);
        let deadline = at + 20_000;
        let actions = tick(c, deadline);
        assert!(reports(&actions).contains(&Report::Done));
        assert_eq!(c.mode(), Mode::AwaitingVerdict);
        deadline
    }

    #[test]
    fn test_boot_sequence() {
        let mut c = controller();
        let actions = c.boot();
        assert_eq!(
            actions.as_slice(),
            &[
                Action::SetEyes(Rgb::WHITE),
                Action::Send(Report::Ready),
                Action::Show(render::set_time(20)),
            ]
        );
    }

    #[test]
    fn test_echo_is_always_first() {
        let mut c = controller();
        for text in ["heartbeat", "lock", "garbage!", "success"] {
            let actions = line(&mut c, 100, text);
            match &actions[0] {
                Action::Send(Report::Echo(echoed)) => assert_eq!(echoed.as_str(), text),
                other => panic!("expected echo first, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_heartbeat() {
        let mut c = controller();
        let actions = line(&mut c, 100, "heartbeat");
        assert_eq!(reports(&actions)[1], Report::HeartbeatOk);
    }

    #[test]
    fn test_unknown_line_is_echo_only() {
        let mut c = controller();
        let actions = line(&mut c, 100, "frobnicate");
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn test_up_adjusts_and_debounces() {
        let mut c = controller();

        let actions = press(&mut c, 1_000, UP);
        assert!(reports(&actions).contains(&Report::FocusTimeChanged { seconds: 25 }));

        // Within the debounce window: ignored
        let actions = press(&mut c, 1_100, UP);
        assert!(actions.is_empty());
        assert_eq!(c.focus_time_s(), 25);

        // Past the window: accepted again
        press(&mut c, 1_200, UP);
        assert_eq!(c.focus_time_s(), 30);
    }

    #[test]
    fn test_up_clamps_at_max_but_still_reports() {
        let tunables = Tunables {
            focus_default_s: 3595,
            ..Tunables::default()
        };
        let mut c = Controller::new(tunables);

        press(&mut c, 1_000, UP);
        assert_eq!(c.focus_time_s(), 3600);

        // At the cap the press is still acknowledged
        let actions = press(&mut c, 2_000, UP);
        assert_eq!(c.focus_time_s(), 3600);
        assert!(reports(&actions).contains(&Report::FocusTimeChanged { seconds: 3600 }));
    }

    #[test]
    fn test_down_stops_at_min() {
        let tunables = Tunables {
            focus_default_s: 10,
            ..Tunables::default()
        };
        let mut c = Controller::new(tunables);

        press(&mut c, 1_000, DOWN);
        assert_eq!(c.focus_time_s(), 5);

        // At the floor the press is a complete no-op
        let actions = press(&mut c, 2_000, DOWN);
        assert!(actions.is_empty());
        assert_eq!(c.focus_time_s(), 5);
    }

    #[test]
    fn test_enter_starts_session() {
        let mut c = controller();
        let actions = press(&mut c, 1_000, ENTER);

        assert_eq!(c.mode(), Mode::Running);
        assert!(reports(&actions).contains(&Report::SessionStarted { seconds: 20 }));
        assert!(actions.contains(&Action::SetEyes(Rgb::GREEN)));

        // Buttons are dead while running
        let actions = press(&mut c, 2_000, UP);
        assert!(reports(&actions).is_empty());
        assert_eq!(c.focus_time_s(), 20);
    }

    #[test]
    fn test_countdown_renders_and_traces() {
        let mut c = controller();
        press(&mut c, 0, ENTER);

        // First tick draws the countdown
        let actions = tick(&mut c, 500);
        let shown = screens(&actions);
        assert_eq!(shown[0].bottom.as_str(), " 0m 19s");

        // Same displayed second: no redraw
        assert!(tick(&mut c, 900).is_empty());

        // Trace appears once the 10 s interval elapses
        let actions = tick(&mut c, 10_500);
        assert!(reports(&actions).contains(&Report::TimeRemaining { seconds: 9 }));

        // And not again until another interval passes
        let actions = tick(&mut c, 11_500);
        assert!(reports(&actions).is_empty());
    }

    #[test]
    fn test_session_completes_with_exactly_one_done() {
        let mut c = controller();
        press(&mut c, 0, ENTER);

        let actions = tick(&mut c, 20_000);
        let sent = reports(&actions);
        assert_eq!(
            sent.as_slice(),
            &[Report::SessionComplete, Report::Done]
        );
        assert_eq!(c.mode(), Mode::AwaitingVerdict);

        // Idle-waiting polls emit nothing further
        assert!(tick(&mut c, 21_000).is_empty());
        assert!(tick(&mut c, 300_000).is_empty());
    }

    #[test]
    fn test_extend_moves_deadline() {
        let mut c = controller();
        press(&mut c, 0, ENTER);

        let actions = line(&mut c, 10_000, "extend_10");
        assert!(reports(&actions).contains(&Report::SessionExtended { minutes: 10 }));

        // Old deadline passes without completing
        let actions = tick(&mut c, 25_000);
        assert!(!reports(&actions).contains(&Report::Done));
        assert_eq!(c.mode(), Mode::Running);

        // New deadline: 20 s + 600 s
        let actions = tick(&mut c, 620_000);
        assert!(reports(&actions).contains(&Report::Done));
    }

    #[test]
    fn test_extend_ignored_when_idle() {
        let mut c = controller();
        let actions = line(&mut c, 1_000, "extend_20");
        assert_eq!(actions.len(), 1); // echo only
    }

    #[test]
    fn test_end_session_cuts_to_verdict() {
        let mut c = controller();
        press(&mut c, 0, ENTER);

        let actions = line(&mut c, 5_000, "end_session");
        let sent = reports(&actions);
        assert!(sent.contains(&Report::SessionCut));
        assert!(sent.contains(&Report::Done));
        assert_eq!(c.mode(), Mode::AwaitingVerdict);

        // fail resolves back to idle
        let actions = line(&mut c, 6_000, "fail");
        assert!(reports(&actions).contains(&Report::VerdictFail));
        assert_eq!(c.mode(), Mode::Idle);
    }

    #[test]
    fn test_success_dispenses_when_unlocked() {
        let mut c = controller();
        let deadline = run_to_verdict(&mut c, 0);

        let actions = line(&mut c, deadline + 1_000, "success");
        assert!(has_dispense(&actions));
        assert!(actions.contains(&Action::PlayMelody));
        assert!(reports(&actions).contains(&Report::Dispensing));
        // Eyes settle white at the end
        assert_eq!(actions.last(), Some(&Action::SetEyes(Rgb::WHITE)));
        assert_eq!(c.mode(), Mode::Idle);
    }

    #[test]
    fn test_verdict_ignored_outside_waiting() {
        let mut c = controller();
        let actions = line(&mut c, 100, "success");
        assert_eq!(actions.len(), 1); // echo only
        assert_eq!(c.mode(), Mode::Idle);
    }

    #[test]
    fn test_candy_lock_blocks_dispense() {
        let mut c = controller();
        line(&mut c, 0, "candy_lock_10");
        let deadline = run_to_verdict(&mut c, 1_000);

        let actions = line(&mut c, deadline + 1_000, "success");
        assert!(!has_dispense(&actions));
        assert!(actions.contains(&Action::PlayMelody));
        let shown = screens(&actions);
        assert!(shown
            .iter()
            .any(|s| s.top.as_str() == "Candy is locked!"));

        // The missed dispense is not made up when the lock expires
        let actions = tick(&mut c, 600_000);
        assert!(reports(&actions).contains(&Report::CandyLockExpired));
        assert!(!has_dispense(&actions));
        assert!(!has_dispense(&tick(&mut c, 601_000)));

        // A later session's success dispenses normally
        let deadline = run_to_verdict(&mut c, 700_000);
        let actions = line(&mut c, deadline + 1_000, "success");
        assert!(has_dispense(&actions));
    }

    #[test]
    fn test_candy_lock_engage_and_rearm() {
        let mut c = controller();
        let actions = line(&mut c, 0, "candy_lock_10");
        assert!(reports(&actions).contains(&Report::CandyLockEngaged { minutes: 10 }));
        assert!(actions.contains(&Action::SetEyes(Rgb::RED)));

        // Re-arm at 5 min for 20 min: expires at 25 min, not 10
        line(&mut c, 300_000, "candy_lock_20");
        assert!(tick(&mut c, 600_000).is_empty());

        let actions = tick(&mut c, 1_500_000);
        let sent = reports(&actions);
        assert!(sent.contains(&Report::CandyLockExpired));
        assert!(actions.contains(&Action::SetEyes(Rgb::WHITE)));
    }

    #[test]
    fn test_punitive_lock_suppresses_and_expires() {
        let mut c = controller();
        press(&mut c, 0, ENTER);

        let actions = line(&mut c, 5_000, "lock");
        assert!(reports(&actions).contains(&Report::LockEngaged { seconds: 30 }));
        assert_eq!(c.mode(), Mode::Locked);

        // Buttons are dead; the flash renders instead
        let actions = press(&mut c, 6_000, UP);
        assert!(reports(&actions).is_empty());
        assert_eq!(c.focus_time_s(), 20);

        // Commands still reach the handler ahead of the lock gate
        let actions = line(&mut c, 7_000, "heartbeat");
        assert!(reports(&actions).contains(&Report::HeartbeatOk));

        // The cancelled session never completes
        let actions = tick(&mut c, 25_000);
        assert!(!reports(&actions).contains(&Report::Done));

        // Expiry restores idle
        let actions = tick(&mut c, 35_000);
        let sent = reports(&actions);
        assert!(sent.contains(&Report::LockExpired));
        assert!(actions.contains(&Action::SetEyes(Rgb::WHITE)));
        assert_eq!(c.mode(), Mode::Idle);
        assert_eq!(
            screens(&actions).last().map(|s| s.top.as_str()),
            Some("Set Time:")
        );
    }

    #[test]
    fn test_lock_flash_renders_while_held() {
        let mut c = controller();
        line(&mut c, 0, "lock");

        // Flash starts in the blank phase
        let actions = tick(&mut c, 5);
        assert_eq!(screens(&actions).as_slice(), &[Screen::blank()]);

        // After a half-period the countdown shows
        let actions = tick(&mut c, 600);
        let shown = screens(&actions);
        assert_eq!(shown[0].top.as_str(), "*** LOCKED ***");
        assert_eq!(shown[0].bottom.as_str(), "Unlock in: 29s");
    }

    #[test]
    fn test_buzzer_red_eyes_revert() {
        let mut c = controller();
        let actions = line(&mut c, 1_000, "buzzer");
        assert!(actions.contains(&Action::PlayWarning));
        assert!(actions.contains(&Action::SetEyes(Rgb::RED)));

        // Not yet
        assert!(tick(&mut c, 3_500).is_empty());

        // Revert to white when idle
        let actions = tick(&mut c, 4_000);
        assert_eq!(actions.as_slice(), &[Action::SetEyes(Rgb::WHITE)]);
    }

    #[test]
    fn test_buzzer_reverts_to_green_in_session() {
        let mut c = controller();
        press(&mut c, 0, ENTER);
        line(&mut c, 1_000, "buzzer");

        let actions = tick(&mut c, 4_000);
        assert!(actions.contains(&Action::SetEyes(Rgb::GREEN)));
    }

    #[test]
    fn test_candy_lock_defers_red_eye_revert() {
        let mut c = controller();
        line(&mut c, 0, "candy_lock_10");
        line(&mut c, 1_000, "buzzer");

        // Well past the 3 s override, but the candy lock holds red
        let actions = tick(&mut c, 10_000);
        assert!(actions.is_empty());

        // Revert happens after the candy lock clears
        let actions = tick(&mut c, 600_000);
        assert!(reports(&actions).contains(&Report::CandyLockExpired));
        let actions = tick(&mut c, 600_100);
        assert_eq!(actions.as_slice(), &[Action::SetEyes(Rgb::WHITE)]);
    }

    #[test]
    fn test_distraction_truncates_display_not_serial() {
        let mut c = controller();
        let actions = line(&mut c, 100, "distraction_3_a-very-long-site-name.example.com");

        let shown = screens(&actions);
        assert_eq!(shown[0].top.as_str(), "Distraction #3");
        assert_eq!(shown[0].bottom.as_str(), "a-very-long-site");

        let full = reports(&actions).iter().any(|r| {
            matches!(r, Report::DistractionShown { site }
                if site.as_str() == "a-very-long-site-name.example.com")
        });
        assert!(full);
    }

    #[test]
    fn test_summary_card() {
        let mut c = controller();
        let actions = line(&mut c, 100, "summary_7");
        assert!(reports(&actions).contains(&Report::SummaryShown { count: 7 }));
        assert_eq!(screens(&actions)[0].bottom.as_str(), "Distractions: 7");
    }

    #[test]
    fn test_fail_with_candy_lock_interleaves_idle_screen() {
        let mut c = controller();
        line(&mut c, 0, "candy_lock_10");
        let deadline = run_to_verdict(&mut c, 1_000);

        let actions = line(&mut c, deadline + 1_000, "fail");
        let shown = screens(&actions);
        // failed card, idle card, lock-remaining card, idle card
        assert_eq!(shown[0].top.as_str(), "Session failed!");
        assert_eq!(shown[1].top.as_str(), "Set Time:");
        assert!(shown[2].bottom.as_str().ends_with("left"));
        assert_eq!(shown[3].top.as_str(), "Set Time:");
    }

    #[test]
    fn test_busy_iteration_keeps_every_action() {
        let mut c = controller();
        line(&mut c, 0, "candy_lock_10");
        run_to_verdict(&mut c, 1_000);

        // Verdict line, candy-lock expiry, and a button press all land
        // in the same pass; every serial line must still come out
        let actions = c.poll(ms(600_000), Some("fail"), UP);
        match &actions[0] {
            Action::Send(Report::Echo(echoed)) => assert_eq!(echoed.as_str(), "fail"),
            other => panic!("expected echo first, got {:?}", other),
        }
        let sent = reports(&actions);
        assert!(sent.contains(&Report::VerdictFail));
        assert!(sent.contains(&Report::CandyLockExpired));
        assert!(sent.contains(&Report::FocusTimeChanged { seconds: 25 }));
    }

    #[test]
    fn test_session_survives_clock_wraparound() {
        let mut c = controller();
        let start = u32::MAX - 10_000;
        c.poll(Instant::from_millis(start), None, ENTER);
        assert_eq!(c.mode(), Mode::Running);

        // 10 s after start, across the wrap: still running
        let actions = c.poll(ms(0), None, ButtonState::RELEASED);
        assert!(!reports(&actions).contains(&Report::Done));

        // 20 s after start: completes
        let actions = c.poll(ms(10_001), None, ButtonState::RELEASED);
        assert!(reports(&actions).contains(&Report::Done));
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_focus_time_stays_bounded(presses in proptest::collection::vec(0u8..2u8, 1..80)) {
            let mut c = controller();
            let mut now = 0u32;
            for p in &presses {
                now += 250;
                let buttons = if *p == 0 { UP } else { DOWN };
                c.poll(ms(now), None, buttons);
                prop_assert!((5..=3600).contains(&c.focus_time_s()));
                prop_assert_eq!(c.focus_time_s() % 5, 0);
            }
        }
    }
}
