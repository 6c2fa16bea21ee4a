//! Three-step selection flow: age group, operation, level.

use crate::model::{AgeGroup, Level, Operation, ProgressRecord, SelectionParams};

pub const FETCH_FAILED_NOTICE: &str = "Hubo un error al cargar los ejercicios";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    AgeGroup,
    Operation,
    Level,
}

impl Step {
    pub fn title(self) -> &'static str {
        match self {
            Step::AgeGroup => "Elige tu grupo de edad",
            Step::Operation => "¿Qué quieres practicar?",
            Step::Level => "Elige el nivel de dificultad",
        }
    }

    pub fn option_count(self) -> usize {
        match self {
            Step::AgeGroup => AgeGroup::ALL.len(),
            Step::Operation => Operation::ALL.len(),
            Step::Level => Level::ALL.len(),
        }
    }
}

/// Result of picking a card on the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Advanced(Step),
    Start(SelectionParams),
    Ignored,
}

/// Past sessions as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistorySummary {
    pub sessions: usize,
    pub best_score: u32,
    pub total_stars: u32,
}

impl HistorySummary {
    pub fn from_records(records: &[ProgressRecord]) -> Self {
        Self {
            sessions: records.len(),
            best_score: records.iter().map(|r| r.score).max().unwrap_or(0),
            total_stars: records.iter().map(|r| r.stars).sum(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    age_group: Option<AgeGroup>,
    operation: Option<Operation>,
    cursor: usize,
    notice: Option<String>,
    history: Option<HistorySummary>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            age_group: None,
            operation: None,
            cursor: 0,
            notice: None,
            history: None,
        }
    }

    pub fn step(&self) -> Step {
        match (self.age_group, self.operation) {
            (None, _) => Step::AgeGroup,
            (Some(_), None) => Step::Operation,
            (Some(_), Some(_)) => Step::Level,
        }
    }

    pub fn age_group(&self) -> Option<AgeGroup> {
        self.age_group
    }

    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.step().option_count() as isize;
        self.cursor = (self.cursor as isize + delta).rem_euclid(len) as usize;
    }

    pub fn choose_cursor(&mut self) -> Choice {
        self.choose(self.cursor)
    }

    pub fn choose(&mut self, index: usize) -> Choice {
        if self.notice.is_some() {
            return Choice::Ignored;
        }
        match (self.age_group, self.operation) {
            (None, _) => match AgeGroup::ALL.get(index) {
                Some(&group) => {
                    self.age_group = Some(group);
                    self.cursor = 0;
                    Choice::Advanced(Step::Operation)
                }
                None => Choice::Ignored,
            },
            (Some(_), None) => match Operation::ALL.get(index) {
                Some(&op) => {
                    self.operation = Some(op);
                    self.cursor = 0;
                    Choice::Advanced(Step::Level)
                }
                None => Choice::Ignored,
            },
            (Some(age_group), Some(operation)) => match Level::ALL.get(index) {
                Some(&level) => Choice::Start(SelectionParams {
                    age_group,
                    operation,
                    level,
                }),
                None => Choice::Ignored,
            },
        }
    }

    /// Step back, clearing the previous step's choice. Returns false on the
    /// first step.
    pub fn back(&mut self) -> bool {
        let moved = match self.step() {
            Step::AgeGroup => false,
            Step::Operation => {
                self.age_group = None;
                true
            }
            Step::Level => {
                self.operation = None;
                true
            }
        };
        if moved {
            self.cursor = 0;
        }
        moved
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Block the dashboard until the notice is acknowledged
    pub fn show_notice(&mut self, text: &str) {
        self.notice = Some(text.to_string());
    }

    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    pub fn history(&self) -> Option<HistorySummary> {
        self.history
    }

    pub fn set_history(&mut self, history: Option<HistorySummary>) {
        self.history = history;
    }
}
