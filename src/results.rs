//! End-of-session summary.

use crate::game::POINTS_PER_CORRECT;

/// What a finished session hands to the results screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub score: u32,
    pub stars: u32,
    /// Exercises reached before the session ended
    pub completed: usize,
    pub total: usize,
}

impl Outcome {
    pub fn performance_message(&self) -> &'static str {
        performance_message(self.completed, self.total)
    }

    pub fn accuracy_percent(&self) -> u32 {
        accuracy_percent(self.score, self.completed)
    }
}

/// Share of the session reached, in percent. Zero when empty.
pub fn completion_percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

pub fn performance_message(completed: usize, total: usize) -> &'static str {
    let percentage = completion_percent(completed, total);
    if percentage >= 100.0 {
        "¡PERFECTO! 🎉"
    } else if percentage >= 80.0 {
        "¡Excelente trabajo! 🌟"
    } else if percentage >= 60.0 {
        "¡Muy bien! 👏"
    } else if percentage >= 40.0 {
        "¡Buen intento! 💪"
    } else {
        "¡Sigue practicando! 📚"
    }
}

/// Correct answers over exercises reached, rounded.
pub fn accuracy_percent(score: u32, completed: usize) -> u32 {
    if completed == 0 {
        return 0;
    }
    let ratio = f64::from(score) / (completed as f64 * f64::from(POINTS_PER_CORRECT));
    (ratio * 100.0).round() as u32
}
