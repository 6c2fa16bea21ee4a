//! Timed session state machine.
//!
//! A session walks `Loading -> Active -> Ended`. Every timer (the one-second
//! countdown, the widget feedback window and the delay before the next
//! exercise) is driven from [`GameSession::advance`], so dropping the session
//! drops its timers with it.

use std::time::Duration;

use crate::answer::{AnswerWidget, DragAndDrop, Feedback, MultipleChoice};
use crate::api::ApiError;
use crate::config::{Config, GameMode};
use crate::model::{Exercise, ProgressReport, SelectionParams};
use crate::results::Outcome;

pub const ADVANCE_DELAY: Duration = Duration::from_millis(1000);
pub const POINTS_PER_CORRECT: u32 = 10;

const SECOND: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Every exercise was reached
    Exhausted,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Active,
    Ended(EndReason),
}

/// Notable transitions reported back to the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Answered { correct: bool },
    Advanced { index: usize },
    Ended(EndReason),
}

#[derive(Debug)]
pub struct GameSession {
    id: u64,
    params: SelectionParams,
    mode: GameMode,
    session_secs: u32,
    phase: Phase,
    exercises: Vec<Exercise>,
    current_index: usize,
    score: u32,
    stars: u32,
    time_left: u32,
    since_last_second: Duration,
    widget: Option<AnswerWidget>,
    advancing: Option<Duration>,
    cursor: usize,
}

impl GameSession {
    pub fn loading(id: u64, params: SelectionParams, config: &Config) -> Self {
        Self {
            id,
            params,
            mode: config.mode,
            session_secs: config.session_secs,
            phase: Phase::Loading,
            exercises: Vec::new(),
            current_index: 0,
            score: 0,
            stars: 0,
            time_left: config.session_secs,
            since_last_second: Duration::ZERO,
            widget: None,
            advancing: None,
            cursor: 0,
        }
    }

    /// Apply the exercise fetch result. Errors are handed back untouched so
    /// the caller can abandon the session.
    pub fn on_loaded(
        &mut self,
        result: Result<Vec<Exercise>, ApiError>,
    ) -> Result<Vec<SessionEvent>, ApiError> {
        if self.phase != Phase::Loading {
            return Ok(Vec::new());
        }
        self.exercises = result?;
        self.phase = Phase::Active;
        self.current_index = 0;
        self.score = 0;
        self.stars = 0;
        self.time_left = self.session_secs;
        self.since_last_second = Duration::ZERO;
        self.rebuild_widget();

        let mut events = Vec::new();
        self.check_end(&mut events);
        Ok(events)
    }

    pub fn advance(&mut self, dt: Duration) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.phase != Phase::Active {
            return events;
        }

        self.since_last_second += dt;
        while self.since_last_second >= SECOND {
            self.since_last_second -= SECOND;
            self.time_left = self.time_left.saturating_sub(1);
        }

        if let Some(remaining) = self.advancing {
            let remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                self.advancing = None;
                self.current_index += 1;
                self.rebuild_widget();
                events.push(SessionEvent::Advanced {
                    index: self.current_index,
                });
            } else {
                self.advancing = Some(remaining);
            }
        } else if let Some(correct) = self.widget.as_mut().and_then(|w| w.advance(dt)) {
            self.apply_answer(correct);
            events.push(SessionEvent::Answered { correct });
        }

        self.check_end(&mut events);
        events
    }

    fn apply_answer(&mut self, correct: bool) {
        if correct {
            self.score += POINTS_PER_CORRECT;
            self.stars = (self.current_index as u32 + 1) / 3;
        }
        self.advancing = Some(ADVANCE_DELAY);
    }

    // Exhaustion wins over timeout when both hold on the same tick.
    fn check_end(&mut self, events: &mut Vec<SessionEvent>) {
        if self.phase != Phase::Active {
            return;
        }
        let reason = if self.current_index >= self.exercises.len() {
            EndReason::Exhausted
        } else if self.time_left == 0 {
            EndReason::TimedOut
        } else {
            return;
        };
        self.phase = Phase::Ended(reason);
        self.widget = None;
        self.advancing = None;
        events.push(SessionEvent::Ended(reason));
    }

    fn rebuild_widget(&mut self) {
        self.cursor = 0;
        self.widget = self.exercises.get(self.current_index).map(|exercise| match self.mode {
            GameMode::Multiple => AnswerWidget::Multiple(MultipleChoice::new(exercise)),
            GameMode::Drag => AnswerWidget::Drag(DragAndDrop::new(exercise)),
        });
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    pub fn accepts_input(&self) -> bool {
        self.phase == Phase::Active && self.advancing.is_none()
    }

    fn widget_for_input(&mut self) -> Option<&mut AnswerWidget> {
        if !self.accepts_input() {
            return None;
        }
        self.widget.as_mut()
    }

    pub fn select(&mut self, index: usize) -> Option<Feedback> {
        match self.widget_for_input()? {
            AnswerWidget::Multiple(w) => w.select(index),
            AnswerWidget::Drag(_) => None,
        }
    }

    pub fn click(&mut self, index: usize) -> Option<Feedback> {
        match self.widget_for_input()? {
            AnswerWidget::Multiple(w) => w.select(index),
            AnswerWidget::Drag(w) => w.click(index),
        }
    }

    pub fn pick(&mut self, index: usize) -> bool {
        match self.widget_for_input() {
            Some(AnswerWidget::Drag(w)) => w.pick(index),
            _ => false,
        }
    }

    pub fn drop_on_target(&mut self) -> Option<Feedback> {
        match self.widget_for_input()? {
            AnswerWidget::Drag(w) => w.drop_on_target(),
            AnswerWidget::Multiple(_) => None,
        }
    }

    pub fn cancel_drag(&mut self) -> bool {
        match self.widget.as_mut() {
            Some(AnswerWidget::Drag(w)) if w.dragging().is_some() => {
                w.cancel_drag();
                true
            }
            _ => false,
        }
    }

    /// Move the highlighted option, wrapping at both ends
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.widget.as_ref().map_or(0, |w| w.options().len());
        if len == 0 {
            return;
        }
        let len = len as isize;
        self.cursor = (self.cursor as isize + delta).rem_euclid(len) as usize;
    }

    pub fn set_cursor(&mut self, index: usize) {
        let len = self.widget.as_ref().map_or(0, |w| w.options().len());
        if index < len {
            self.cursor = index;
        }
    }

    /// Enter on the highlighted option: select it, or drop what is being dragged
    pub fn commit_cursor(&mut self) -> Option<Feedback> {
        let dragging = matches!(&self.widget, Some(AnswerWidget::Drag(w)) if w.dragging().is_some());
        if dragging {
            self.drop_on_target()
        } else {
            self.click(self.cursor)
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn params(&self) -> SelectionParams {
        self.params
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.exercises.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total(&self) -> usize {
        self.exercises.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn widget(&self) -> Option<&AnswerWidget> {
        self.widget.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_advancing(&self) -> bool {
        self.advancing.is_some()
    }

    /// "Ejercicio 3 de 10"
    pub fn progress_text(&self) -> String {
        format!(
            "Ejercicio {} de {}",
            (self.current_index + 1).min(self.total().max(1)),
            self.total()
        )
    }

    pub fn question(&self) -> Option<String> {
        self.current_exercise()
            .map(|exercise| exercise.question(self.params.operation))
    }

    pub fn outcome(&self) -> Outcome {
        Outcome {
            score: self.score,
            stars: self.stars,
            completed: self.current_index,
            total: self.exercises.len(),
        }
    }

    pub fn progress_report(&self, user_id: &str) -> ProgressReport {
        ProgressReport {
            user_id: user_id.to_string(),
            age_group: self.params.age_group,
            operation: self.params.operation,
            level: self.params.level,
            score: self.score,
            stars: self.stars,
            completed_exercises: self.current_index as u32,
        }
    }
}
