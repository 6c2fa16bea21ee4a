//! Answer widgets: multiple choice and drag-and-drop.
//!
//! Both widgets accept a commit, show feedback for [`FEEDBACK_WINDOW`], then
//! report `is_correct` exactly once from [`advance`](MultipleChoice::advance)
//! and reset themselves for the next exercise.

use std::time::Duration;

use crate::model::{AnswerValue, Exercise};

pub const FEEDBACK_WINDOW: Duration = Duration::from_millis(800);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
}

impl Feedback {
    fn from_correct(is_correct: bool) -> Self {
        if is_correct {
            Feedback::Correct
        } else {
            Feedback::Incorrect
        }
    }

    pub fn is_correct(self) -> bool {
        self == Feedback::Correct
    }

    pub fn message(self) -> &'static str {
        match self {
            Feedback::Correct => "¡Correcto! 🎉",
            Feedback::Incorrect => "¡Inténtalo de nuevo! 💪",
        }
    }
}

/// A committed answer waiting for its feedback window to elapse
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Pending {
    index: usize,
    feedback: Feedback,
    remaining: Duration,
}

impl Pending {
    fn new(index: usize, feedback: Feedback) -> Self {
        Self {
            index,
            feedback,
            remaining: FEEDBACK_WINDOW,
        }
    }

    /// Returns true once the window has fully elapsed
    fn tick(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        self.remaining.is_zero()
    }
}

#[derive(Debug, Clone)]
pub struct MultipleChoice {
    options: Vec<AnswerValue>,
    correct: AnswerValue,
    pending: Option<Pending>,
}

impl MultipleChoice {
    pub fn new(exercise: &Exercise) -> Self {
        Self {
            options: exercise.options.clone(),
            correct: exercise.correct_answer.clone(),
            pending: None,
        }
    }

    pub fn options(&self) -> &[AnswerValue] {
        &self.options
    }

    pub fn selected(&self) -> Option<usize> {
        self.pending.map(|p| p.index)
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.pending.map(|p| p.feedback)
    }

    pub fn is_locked(&self) -> bool {
        self.pending.is_some()
    }

    /// Commit the option at `index`. Ignored while feedback is showing.
    pub fn select(&mut self, index: usize) -> Option<Feedback> {
        if self.pending.is_some() {
            return None;
        }
        let option = self.options.get(index)?;
        let feedback = Feedback::from_correct(*option == self.correct);
        self.pending = Some(Pending::new(index, feedback));
        Some(feedback)
    }

    pub fn advance(&mut self, dt: Duration) -> Option<bool> {
        let pending = self.pending.as_mut()?;
        if !pending.tick(dt) {
            return None;
        }
        let is_correct = pending.feedback.is_correct();
        self.pending = None;
        Some(is_correct)
    }
}

#[derive(Debug, Clone)]
pub struct DragAndDrop {
    options: Vec<AnswerValue>,
    correct: AnswerValue,
    dragging: Option<usize>,
    dropped: Option<Pending>,
}

impl DragAndDrop {
    pub fn new(exercise: &Exercise) -> Self {
        Self {
            options: exercise.options.clone(),
            correct: exercise.correct_answer.clone(),
            dragging: None,
            dropped: None,
        }
    }

    pub fn options(&self) -> &[AnswerValue] {
        &self.options
    }

    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    /// Option currently sitting on the drop target
    pub fn dropped(&self) -> Option<usize> {
        self.dropped.map(|p| p.index)
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.dropped.map(|p| p.feedback)
    }

    /// Start dragging the option at `index`
    pub fn pick(&mut self, index: usize) -> bool {
        if index >= self.options.len() {
            return false;
        }
        self.dragging = Some(index);
        true
    }

    pub fn cancel_drag(&mut self) {
        self.dragging = None;
    }

    pub fn drop_on_target(&mut self) -> Option<Feedback> {
        let index = self.dragging?;
        Some(self.commit(index))
    }

    pub fn click(&mut self, index: usize) -> Option<Feedback> {
        if index >= self.options.len() {
            return None;
        }
        Some(self.commit(index))
    }

    // A commit inside the feedback window replaces the previous one and
    // restarts the window; only the latest commit is ever reported.
    fn commit(&mut self, index: usize) -> Feedback {
        let feedback = Feedback::from_correct(self.options[index] == self.correct);
        self.dropped = Some(Pending::new(index, feedback));
        feedback
    }

    pub fn advance(&mut self, dt: Duration) -> Option<bool> {
        let pending = self.dropped.as_mut()?;
        if !pending.tick(dt) {
            return None;
        }
        let is_correct = pending.feedback.is_correct();
        self.dropped = None;
        self.dragging = None;
        Some(is_correct)
    }
}

/// The widget presenting the current exercise
#[derive(Debug, Clone)]
pub enum AnswerWidget {
    Multiple(MultipleChoice),
    Drag(DragAndDrop),
}

impl AnswerWidget {
    pub fn options(&self) -> &[AnswerValue] {
        match self {
            AnswerWidget::Multiple(w) => w.options(),
            AnswerWidget::Drag(w) => w.options(),
        }
    }

    pub fn feedback(&self) -> Option<Feedback> {
        match self {
            AnswerWidget::Multiple(w) => w.feedback(),
            AnswerWidget::Drag(w) => w.feedback(),
        }
    }

    pub fn advance(&mut self, dt: Duration) -> Option<bool> {
        match self {
            AnswerWidget::Multiple(w) => w.advance(dt),
            AnswerWidget::Drag(w) => w.advance(dt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise() -> Exercise {
        Exercise::new(3, 4, vec![5, 7, 9, 2], 7)
    }

    #[test]
    fn multiple_choice_correct_selection_reports_true() {
        let mut widget = MultipleChoice::new(&exercise());
        assert_eq!(widget.select(1), Some(Feedback::Correct));
        assert_eq!(widget.feedback().map(Feedback::message), Some("¡Correcto! 🎉"));
        assert_eq!(widget.advance(Duration::from_millis(799)), None);
        assert_eq!(widget.advance(Duration::from_millis(1)), Some(true));
        assert_eq!(widget.selected(), None);
        assert_eq!(widget.feedback(), None);
    }

    #[test]
    fn multiple_choice_every_wrong_option_reports_false() {
        for index in [0, 2, 3] {
            let mut widget = MultipleChoice::new(&exercise());
            assert_eq!(widget.select(index), Some(Feedback::Incorrect));
            assert_eq!(widget.advance(FEEDBACK_WINDOW), Some(false));
        }
    }

    #[test]
    fn multiple_choice_ignores_reselection_while_locked() {
        let mut widget = MultipleChoice::new(&exercise());
        widget.select(0);
        assert!(widget.is_locked());
        assert_eq!(widget.select(1), None);
        assert_eq!(widget.selected(), Some(0));
        assert_eq!(widget.advance(FEEDBACK_WINDOW), Some(false));
        // Reported once only
        assert_eq!(widget.advance(FEEDBACK_WINDOW), None);
    }

    #[test]
    fn multiple_choice_ignores_out_of_range() {
        let mut widget = MultipleChoice::new(&exercise());
        assert_eq!(widget.select(10), None);
        assert!(!widget.is_locked());
    }

    #[test]
    fn drag_and_drop_drop_and_click_share_contract() {
        let mut dragged = DragAndDrop::new(&exercise());
        assert!(dragged.pick(1));
        assert_eq!(dragged.drop_on_target(), Some(Feedback::Correct));
        assert_eq!(dragged.dropped(), Some(1));

        let mut clicked = DragAndDrop::new(&exercise());
        assert_eq!(clicked.click(1), Some(Feedback::Correct));

        assert_eq!(dragged.advance(FEEDBACK_WINDOW), Some(true));
        assert_eq!(clicked.advance(FEEDBACK_WINDOW), Some(true));
        assert_eq!(dragged.dragging(), None);
        assert_eq!(dragged.dropped(), None);
    }

    #[test]
    fn drag_and_drop_drop_without_drag_is_ignored() {
        let mut widget = DragAndDrop::new(&exercise());
        assert_eq!(widget.drop_on_target(), None);
        assert_eq!(widget.advance(FEEDBACK_WINDOW), None);
    }

    #[test]
    fn drag_and_drop_new_commit_overwrites_and_reports_once() {
        let mut widget = DragAndDrop::new(&exercise());
        widget.click(0);
        assert_eq!(widget.advance(Duration::from_millis(500)), None);
        widget.click(1);
        assert_eq!(widget.dropped(), Some(1));
        // Window restarted by the second commit
        assert_eq!(widget.advance(Duration::from_millis(500)), None);
        assert_eq!(widget.advance(Duration::from_millis(300)), Some(true));
        assert_eq!(widget.advance(FEEDBACK_WINDOW), None);
    }

    #[test]
    fn drag_and_drop_cancel_clears_drag() {
        let mut widget = DragAndDrop::new(&exercise());
        widget.pick(2);
        widget.cancel_drag();
        assert_eq!(widget.drop_on_target(), None);
        assert!(!widget.pick(9));
    }
}
