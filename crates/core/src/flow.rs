//! Intro / terms / content sequencer.
//!
//! The landing page walks a strictly linear path:
//!
//! ```text
//! Intro -> EyeReveal -> EyeOpen -> Terms -> Content -> Complete
//!                          |                   ^
//!                          +-------------------+  (terms already accepted)
//! ```
//!
//! Transitions come from two sources: animation callbacks reported by the
//! browser ([`FlowEvent`]) and fixed-duration timers owned by the controller.
//! Timers are stored as absolute deadlines so the controller can live in a
//! session between requests; [`FlowController::advance`] applies whatever is
//! due. Every timer can be cancelled, and each stage that waits on an
//! animation carries a stall deadline so a callback that never arrives
//! cannot strand the visitor on the intro.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::notice::Notice;
use crate::storage::{KeyValueStore, keys};

/// Position in the intro sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Intro,
    EyeReveal,
    EyeOpen,
    Terms,
    Content,
    Complete,
}

impl Stage {
    /// Stages that wait on a browser animation callback.
    #[must_use]
    pub const fn awaits_animation(self) -> bool {
        matches!(self, Self::Intro | Self::EyeReveal | Self::EyeOpen)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Intro => "intro",
            Self::EyeReveal => "eyeReveal",
            Self::EyeOpen => "eyeOpen",
            Self::Terms => "terms",
            Self::Content => "content",
            Self::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Something the browser reports back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowEvent {
    /// Particle/logo intro animation finished.
    IntroFinished,
    /// Eye-opening animation finished.
    EyeOpenFinished,
    AcceptTerms,
    DeclineTerms,
    /// Page torn down; drop pending timers.
    Cancel,
}

/// Durations driving the timed transitions, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTimings {
    /// `EyeReveal` -> `EyeOpen`.
    pub eye_reveal_ms: u32,
    /// Eye animation finished -> `Terms`.
    pub terms_delay_ms: u32,
    /// `Content` -> `Complete`.
    pub settle_ms: u32,
    /// Longest wait for an animation callback before falling back.
    pub stall_timeout_ms: u32,
}

impl Default for FlowTimings {
    fn default() -> Self {
        Self {
            eye_reveal_ms: 1000,
            terms_delay_ms: 1000,
            settle_ms: 1000,
            stall_timeout_ms: 15_000,
        }
    }
}

/// A scheduled transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTimer {
    pub target: Stage,
    pub due_at: DateTime<Utc>,
}

/// The intro sequencer for one visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowController {
    stage: Stage,
    terms_accepted: bool,
    timer: Option<PendingTimer>,
    stall_deadline: Option<DateTime<Utc>>,
    timings: FlowTimings,
}

impl FlowController {
    /// Start a fresh sequence at `Intro`.
    #[must_use]
    pub fn new(terms_accepted: bool, timings: FlowTimings, now: DateTime<Utc>) -> Self {
        let mut controller = Self {
            stage: Stage::Intro,
            terms_accepted,
            timer: None,
            stall_deadline: None,
            timings,
        };
        controller.enter(Stage::Intro, now);
        controller
    }

    /// A controller that starts at `Complete` (direct visits to the shop).
    #[must_use]
    pub const fn skip_intro(terms_accepted: bool, timings: FlowTimings) -> Self {
        Self {
            stage: Stage::Complete,
            terms_accepted,
            timer: None,
            stall_deadline: None,
            timings,
        }
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub const fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    #[must_use]
    pub const fn pending_timer(&self) -> Option<PendingTimer> {
        self.timer
    }

    #[must_use]
    pub const fn stall_deadline(&self) -> Option<DateTime<Utc>> {
        self.stall_deadline
    }

    #[must_use]
    pub const fn timings(&self) -> FlowTimings {
        self.timings
    }

    /// Restore a controller persisted with [`save`](Self::save).
    ///
    /// Missing or unreadable state yields `None`.
    pub fn load(storage: &impl KeyValueStore) -> Option<Self> {
        let raw = match storage.get(keys::FLOW) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read flow state");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .map_err(|e| tracing::warn!(error = %e, "Discarding unreadable flow state"))
            .ok()
    }

    /// Persist under the `flow` key. Failures are logged, not returned.
    pub fn save(&self, storage: &mut impl KeyValueStore) {
        let result = serde_json::to_string(self)
            .map_err(|e| e.to_string())
            .and_then(|json| storage.set(keys::FLOW, json).map_err(|e| e.to_string()));
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to save flow state");
        }
    }

    /// Apply every timer and stall fallback due at `now`.
    ///
    /// Returns the stages entered, in order.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Vec<Stage> {
        let mut entered = Vec::new();

        loop {
            let timer = self.timer.filter(|t| t.due_at <= now);
            let stall = self.stall_deadline.filter(|d| *d <= now);

            match (timer, stall) {
                (Some(t), Some(s)) if s < t.due_at => self.fall_back(s, &mut entered),
                (Some(t), _) => {
                    self.timer = None;
                    self.enter(t.target, t.due_at);
                    entered.push(t.target);
                    self.push_short_circuit(&mut entered, t.target);
                }
                (None, Some(s)) => self.fall_back(s, &mut entered),
                (None, None) => break,
            }
        }

        entered
    }

    /// Apply an event at `now`, after first applying anything already due.
    ///
    /// Returns a notice for the visitor when the event produces one.
    pub fn handle(&mut self, event: FlowEvent, now: DateTime<Utc>) -> Option<Notice> {
        self.advance(now);

        match event {
            FlowEvent::IntroFinished => {
                self.intro_finished(now);
                None
            }
            FlowEvent::EyeOpenFinished => {
                self.eye_open_finished(now);
                None
            }
            FlowEvent::AcceptTerms => self.accept_terms(now),
            FlowEvent::DeclineTerms => self.decline_terms(),
            FlowEvent::Cancel => {
                self.cancel();
                None
            }
        }
    }

    /// Intro animation done: show the eye, open it after a short pause.
    ///
    /// Returns `false` when not in `Intro`.
    pub fn intro_finished(&mut self, now: DateTime<Utc>) -> bool {
        if self.stage != Stage::Intro {
            tracing::debug!(stage = %self.stage, "Ignoring intro_finished");
            return false;
        }
        self.enter(Stage::EyeReveal, now);
        self.schedule(Stage::EyeOpen, self.timings.eye_reveal_ms, now);
        true
    }

    /// Eye animation done: show the terms after a short pause.
    ///
    /// Returns `false` when not in `EyeOpen` or already scheduled.
    pub fn eye_open_finished(&mut self, now: DateTime<Utc>) -> bool {
        if self.stage != Stage::EyeOpen || self.timer.is_some() {
            tracing::debug!(stage = %self.stage, "Ignoring eye_open_finished");
            return false;
        }
        self.schedule(Stage::Terms, self.timings.terms_delay_ms, now);
        true
    }

    /// Visitor accepted the terms.
    pub fn accept_terms(&mut self, now: DateTime<Utc>) -> Option<Notice> {
        if self.stage != Stage::Terms {
            tracing::debug!(stage = %self.stage, "Ignoring accept_terms");
            return None;
        }
        self.terms_accepted = true;
        self.enter(Stage::Content, now);
        Some(Notice::welcome())
    }

    /// Visitor declined the terms. The gate stays up.
    #[must_use]
    pub fn decline_terms(&self) -> Option<Notice> {
        (self.stage == Stage::Terms).then(Notice::terms_required)
    }

    /// Drop the pending timer and stall deadline.
    pub fn cancel(&mut self) {
        self.timer = None;
        self.stall_deadline = None;
    }

    /// Milliseconds until the next timed transition, if any.
    #[must_use]
    pub fn next_check_in(&self, now: DateTime<Utc>) -> Option<i64> {
        let timer = self.timer.map(|t| t.due_at);
        let next = match (timer, self.stall_deadline) {
            (Some(t), Some(s)) => Some(t.min(s)),
            (t, s) => t.or(s),
        }?;
        Some((next - now).num_milliseconds().max(0))
    }

    #[must_use]
    pub fn show_intro(&self) -> bool {
        self.stage == Stage::Intro
    }

    #[must_use]
    pub fn show_eye_reveal(&self) -> bool {
        matches!(self.stage, Stage::EyeReveal | Stage::EyeOpen)
    }

    #[must_use]
    pub fn eyes_opened(&self) -> bool {
        self.stage == Stage::EyeOpen
    }

    #[must_use]
    pub fn show_terms(&self) -> bool {
        self.stage == Stage::Terms
    }

    #[must_use]
    pub fn page_visible(&self) -> bool {
        matches!(self.stage, Stage::Content | Stage::Complete)
    }

    fn enter(&mut self, stage: Stage, at: DateTime<Utc>) {
        tracing::debug!(from = %self.stage, to = %stage, "Flow stage transition");
        self.stage = stage;
        self.timer = None;
        self.stall_deadline = stage
            .awaits_animation()
            .then(|| at + ms(self.timings.stall_timeout_ms));

        match stage {
            Stage::EyeOpen if self.terms_accepted => self.enter(Stage::Content, at),
            Stage::Content => self.schedule(Stage::Complete, self.timings.settle_ms, at),
            _ => {}
        }
    }

    fn schedule(&mut self, target: Stage, delay_ms: u32, now: DateTime<Utc>) {
        self.timer = Some(PendingTimer {
            target,
            due_at: now + ms(delay_ms),
        });
    }

    fn fall_back(&mut self, at: DateTime<Utc>, entered: &mut Vec<Stage>) {
        let target = if self.terms_accepted {
            Stage::Complete
        } else {
            Stage::Terms
        };
        tracing::warn!(stage = %self.stage, to = %target, "Animation stalled, falling back");
        self.enter(target, at);
        entered.push(target);
    }

    /// Record the extra stage when entering `EyeOpen` jumped straight on.
    fn push_short_circuit(&self, entered: &mut Vec<Stage>, target: Stage) {
        if target == Stage::EyeOpen && self.stage == Stage::Content {
            entered.push(Stage::Content);
        }
    }
}

fn ms(millis: u32) -> TimeDelta {
    TimeDelta::milliseconds(i64::from(millis))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notice::NoticeVariant;
    use crate::storage::MemoryStorage;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn at(millis: i64) -> DateTime<Utc> {
        t0() + TimeDelta::milliseconds(millis)
    }

    /// Drive a controller through the animation callbacks up to `EyeOpen`.
    fn to_eye_open(terms_accepted: bool) -> FlowController {
        let mut flow = FlowController::new(terms_accepted, FlowTimings::default(), t0());
        assert!(flow.intro_finished(at(9_000)));
        flow.advance(at(10_000));
        flow
    }

    #[test]
    fn test_first_visit_reaches_terms_before_content() {
        let mut flow = FlowController::new(false, FlowTimings::default(), t0());
        assert_eq!(flow.stage(), Stage::Intro);
        assert!(flow.show_intro());

        flow.handle(FlowEvent::IntroFinished, at(8_800));
        assert_eq!(flow.stage(), Stage::EyeReveal);
        assert!(flow.show_eye_reveal());
        assert!(!flow.eyes_opened());

        // Timer not due yet
        assert!(flow.advance(at(9_500)).is_empty());
        assert_eq!(flow.advance(at(9_800)), vec![Stage::EyeOpen]);
        assert!(flow.eyes_opened());

        flow.handle(FlowEvent::EyeOpenFinished, at(12_000));
        assert_eq!(flow.stage(), Stage::EyeOpen);
        assert_eq!(flow.advance(at(13_000)), vec![Stage::Terms]);
        assert!(flow.show_terms());
        assert!(!flow.page_visible());

        let notice = flow.handle(FlowEvent::AcceptTerms, at(20_000)).unwrap();
        assert_eq!(notice.title, "Welcome!");
        assert_eq!(flow.stage(), Stage::Content);
        assert!(flow.terms_accepted());
        assert!(flow.page_visible());

        assert_eq!(flow.advance(at(21_000)), vec![Stage::Complete]);
        assert!(flow.stage().is_terminal());
        assert!(flow.pending_timer().is_none());
        assert!(flow.stall_deadline().is_none());
    }

    #[test]
    fn test_returning_visitor_skips_terms() {
        let mut flow = FlowController::new(true, FlowTimings::default(), t0());
        flow.intro_finished(at(9_000));
        let entered = flow.advance(at(10_000));
        assert_eq!(entered, vec![Stage::EyeOpen, Stage::Content]);
        assert_eq!(flow.stage(), Stage::Content);

        assert_eq!(flow.advance(at(11_000)), vec![Stage::Complete]);
    }

    #[test]
    fn test_returning_visitor_never_sees_terms() {
        let mut flow = to_eye_open(true);
        let mut seen = vec![flow.stage()];
        for step in 0..40 {
            seen.extend(flow.advance(at(10_000 + step * 500)));
        }
        assert!(!seen.contains(&Stage::Terms));
        assert_eq!(flow.stage(), Stage::Complete);
    }

    #[test]
    fn test_decline_keeps_terms_up() {
        let mut flow = to_eye_open(false);
        flow.eye_open_finished(at(10_500));
        flow.advance(at(11_500));
        assert_eq!(flow.stage(), Stage::Terms);

        let notice = flow.handle(FlowEvent::DeclineTerms, at(12_000)).unwrap();
        assert_eq!(notice.variant, NoticeVariant::Destructive);
        assert_eq!(notice.title, "Terms Required");
        assert_eq!(flow.stage(), Stage::Terms);

        // Terms never time out
        assert!(flow.advance(at(600_000)).is_empty());
        assert_eq!(flow.stage(), Stage::Terms);
    }

    #[test]
    fn test_out_of_order_events_are_ignored() {
        let mut flow = FlowController::new(false, FlowTimings::default(), t0());
        assert!(!flow.eye_open_finished(at(100)));
        assert!(flow.accept_terms(at(100)).is_none());
        assert!(flow.decline_terms().is_none());
        assert_eq!(flow.stage(), Stage::Intro);

        flow.intro_finished(at(200));
        assert!(!flow.intro_finished(at(300)));
        assert_eq!(flow.stage(), Stage::EyeReveal);
    }

    #[test]
    fn test_eye_open_finished_schedules_once() {
        let mut flow = to_eye_open(false);
        assert!(flow.eye_open_finished(at(10_100)));
        let first = flow.pending_timer().unwrap();
        assert!(!flow.eye_open_finished(at(10_600)));
        assert_eq!(flow.pending_timer().unwrap(), first);
    }

    #[test]
    fn test_stalled_intro_falls_back_to_terms() {
        let mut flow = FlowController::new(false, FlowTimings::default(), t0());
        // intro callback never arrives
        assert!(flow.advance(at(14_999)).is_empty());
        assert_eq!(flow.advance(at(15_000)), vec![Stage::Terms]);
        assert!(flow.show_terms());
    }

    #[test]
    fn test_stall_falls_back_to_complete_when_accepted() {
        let timings = FlowTimings {
            stall_timeout_ms: 5_000,
            ..FlowTimings::default()
        };
        let mut flow = FlowController::new(true, timings, t0());
        assert_eq!(flow.advance(at(5_000)), vec![Stage::Complete]);

        // Cancelled controllers never fall back
        let mut flow = FlowController::new(true, timings, t0());
        flow.intro_finished(at(1_000));
        flow.cancel();
        assert!(flow.advance(at(60_000)).is_empty());
        assert_eq!(flow.stage(), Stage::EyeReveal);
    }

    #[test]
    fn test_stalled_eye_open_waits_for_animation() {
        let mut flow = to_eye_open(false);
        assert_eq!(flow.stage(), Stage::EyeOpen);
        // EyeOpen entered at 10_000 (timer due time), stall 15s later
        assert!(flow.advance(at(24_999)).is_empty());
        assert_eq!(flow.advance(at(25_000)), vec![Stage::Terms]);
    }

    #[test]
    fn test_cancel_stops_timers() {
        let mut flow = FlowController::new(false, FlowTimings::default(), t0());
        flow.intro_finished(at(1_000));
        assert!(flow.pending_timer().is_some());

        flow.handle(FlowEvent::Cancel, at(1_100));
        assert!(flow.pending_timer().is_none());
        assert!(flow.next_check_in(at(1_100)).is_none());
        assert!(flow.advance(at(100_000)).is_empty());
        assert_eq!(flow.stage(), Stage::EyeReveal);
    }

    #[test]
    fn test_handle_applies_due_timers_first() {
        let mut flow = to_eye_open(false);
        flow.eye_open_finished(at(10_000));
        // Accept arrives after the terms timer was due but before any poll
        let notice = flow.handle(FlowEvent::AcceptTerms, at(11_200));
        assert!(notice.is_some());
        assert_eq!(flow.stage(), Stage::Content);
    }

    #[test]
    fn test_skip_intro_is_complete() {
        let flow = FlowController::skip_intro(false, FlowTimings::default());
        assert_eq!(flow.stage(), Stage::Complete);
        assert!(flow.page_visible());
        assert!(flow.next_check_in(t0()).is_none());
    }

    #[test]
    fn test_next_check_in_reports_earliest_deadline() {
        let mut flow = FlowController::new(false, FlowTimings::default(), t0());
        assert_eq!(flow.next_check_in(t0()), Some(15_000));

        flow.intro_finished(at(2_000));
        assert_eq!(flow.next_check_in(at(2_000)), Some(1_000));
        assert_eq!(flow.next_check_in(at(5_000)), Some(0));
    }

    #[test]
    fn test_controller_survives_serialization() {
        let mut flow = FlowController::new(false, FlowTimings::default(), t0());
        flow.intro_finished(at(500));

        let json = serde_json::to_string(&flow).unwrap();
        let mut restored: FlowController = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, flow);
        assert_eq!(restored.advance(at(1_500)), vec![Stage::EyeOpen]);
    }

    #[test]
    fn test_event_wire_names() {
        let event: FlowEvent = serde_json::from_str("\"eye_open_finished\"").unwrap();
        assert_eq!(event, FlowEvent::EyeOpenFinished);
        assert_eq!(serde_json::to_string(&Stage::EyeReveal).unwrap(), "\"eyeReveal\"");
    }

    #[test]
    fn test_save_and_load_through_storage() {
        let mut storage = MemoryStorage::new();
        assert!(FlowController::load(&storage).is_none());

        let flow = FlowController::new(true, FlowTimings::default(), t0());
        flow.save(&mut storage);
        assert_eq!(FlowController::load(&storage).unwrap(), flow);

        let corrupt = MemoryStorage::new().with(keys::FLOW, "{not json");
        assert!(FlowController::load(&corrupt).is_none());
    }
}
