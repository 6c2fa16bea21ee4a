use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate answer as served by the backend.
///
/// Options are integers in practice, but the wire format allows strings too.
/// Comparison is strict: `7` and `"7"` are different answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Number(n) => write!(f, "{n}"),
            AnswerValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for AnswerValue {
    fn from(n: i64) -> Self {
        AnswerValue::Number(n)
    }
}

impl From<i32> for AnswerValue {
    fn from(n: i32) -> Self {
        AnswerValue::Number(i64::from(n))
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Text(s.to_string())
    }
}

/// One arithmetic question with its candidate answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub number1: i64,
    pub number2: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    pub correct_answer: AnswerValue,
    pub options: Vec<AnswerValue>,
}

impl Exercise {
    pub fn new<V: Into<AnswerValue>>(
        number1: i64,
        number2: i64,
        options: Vec<V>,
        correct_answer: V,
    ) -> Self {
        Self {
            number1,
            number2,
            operation: None,
            correct_answer: correct_answer.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_correct(&self, value: &AnswerValue) -> bool {
        *value == self.correct_answer
    }

    /// "3 + 4 = ?"
    pub fn question(&self, operation: Operation) -> String {
        format!(
            "{} {} {} = ?",
            self.number1,
            operation.symbol(),
            self.number2
        )
    }
}

/// Identity handed out by the backend at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub age: u8,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
pub enum AgeGroup {
    #[serde(rename = "3-5")]
    #[strum(serialize = "3-5")]
    Toddler,
    #[serde(rename = "7-9")]
    #[strum(serialize = "7-9")]
    Child,
    #[serde(rename = "10-12")]
    #[strum(serialize = "10-12")]
    Preteen,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 3] = [AgeGroup::Toddler, AgeGroup::Child, AgeGroup::Preteen];

    pub fn id(self) -> &'static str {
        match self {
            AgeGroup::Toddler => "3-5",
            AgeGroup::Child => "7-9",
            AgeGroup::Preteen => "10-12",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Toddler => "3-5 años",
            AgeGroup::Child => "7-9 años",
            AgeGroup::Preteen => "10-12 años",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            AgeGroup::Toddler => "🧸",
            AgeGroup::Child => "🎮",
            AgeGroup::Preteen => "🚀",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.id() == id)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    Suma,
    Resta,
    Multiplicacion,
    Division,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Suma,
        Operation::Resta,
        Operation::Multiplicacion,
        Operation::Division,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Operation::Suma => "suma",
            Operation::Resta => "resta",
            Operation::Multiplicacion => "multiplicacion",
            Operation::Division => "division",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Operation::Suma => "Suma",
            Operation::Resta => "Resta",
            Operation::Multiplicacion => "Multiplicación",
            Operation::Division => "División",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Suma => "+",
            Operation::Resta => "-",
            Operation::Multiplicacion => "×",
            Operation::Division => "÷",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.id() == id)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Facil,
    Intermedio,
    Dificil,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Facil, Level::Intermedio, Level::Dificil];

    pub fn id(self) -> &'static str {
        match self {
            Level::Facil => "facil",
            Level::Intermedio => "intermedio",
            Level::Dificil => "dificil",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::Facil => "Fácil",
            Level::Intermedio => "Intermedio",
            Level::Dificil => "Difícil",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.id() == id)
    }
}

/// The three choices made on the dashboard that seed a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionParams {
    pub age_group: AgeGroup,
    pub operation: Operation,
    pub level: Level,
}

/// Body of `POST /api/progress`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub user_id: String,
    pub age_group: AgeGroup,
    pub operation: Operation,
    pub level: Level,
    pub score: u32,
    pub stars: u32,
    pub completed_exercises: u32,
}

/// A stored progress row as returned by `GET /api/users/{id}/progress`.
///
/// Selection fields stay strings so rows written by other clients still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: String,
    pub age_group: String,
    pub operation: String,
    pub level: String,
    pub score: u32,
    pub stars: u32,
    pub completed_exercises: u32,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_values_compare_strictly() {
        let exercise = Exercise::new(3, 4, vec![5, 7, 9, 2], 7);
        assert!(exercise.is_correct(&AnswerValue::Number(7)));
        assert!(!exercise.is_correct(&AnswerValue::Number(5)));
        assert!(!exercise.is_correct(&AnswerValue::Text("7".into())));
    }

    #[test]
    fn exercise_deserializes_backend_payload() {
        let json = r#"{"number1":12,"number2":3,"operation":"division","correct_answer":4,"options":[4,6,2,9]}"#;
        let exercise: Exercise = serde_json::from_str(json).unwrap();
        assert_eq!(exercise.number1, 12);
        assert_eq!(exercise.operation.as_deref(), Some("division"));
        assert_eq!(exercise.correct_answer, AnswerValue::Number(4));
        assert_eq!(exercise.options.len(), 4);
    }

    #[test]
    fn exercise_accepts_string_options() {
        let json = r#"{"number1":1,"number2":1,"correct_answer":"dos","options":["uno","dos"]}"#;
        let exercise: Exercise = serde_json::from_str(json).unwrap();
        assert_eq!(exercise.correct_answer, AnswerValue::Text("dos".into()));
        assert_eq!(exercise.options[0].to_string(), "uno");
    }

    #[test]
    fn question_uses_operation_symbol() {
        let exercise = Exercise::new(6, 2, vec![3, 4], 3);
        assert_eq!(exercise.question(Operation::Division), "6 ÷ 2 = ?");
        assert_eq!(exercise.question(Operation::Multiplicacion), "6 × 2 = ?");
    }

    #[test]
    fn wire_ids_match_display() {
        for group in AgeGroup::ALL {
            assert_eq!(group.to_string(), group.id());
            assert_eq!(AgeGroup::from_id(group.id()), Some(group));
        }
        for op in Operation::ALL {
            assert_eq!(op.to_string(), op.id());
            assert_eq!(Operation::from_id(op.id()), Some(op));
        }
        for level in Level::ALL {
            assert_eq!(level.to_string(), level.id());
            assert_eq!(Level::from_id(level.id()), Some(level));
        }
        assert_eq!(AgeGroup::from_id("13-15"), None);
    }

    #[test]
    fn progress_report_serializes_wire_ids() {
        let report = ProgressReport {
            user_id: "u1".into(),
            age_group: AgeGroup::Preteen,
            operation: Operation::Multiplicacion,
            level: Level::Dificil,
            score: 70,
            stars: 2,
            completed_exercises: 8,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["age_group"], "10-12");
        assert_eq!(value["operation"], "multiplicacion");
        assert_eq!(value["level"], "dificil");
        assert_eq!(value["completed_exercises"], 8);
    }

    #[test]
    fn user_ignores_extra_fields() {
        let json = r#"{"id":"abc","name":"Ana","age":7,"created_at":"2024-05-01T10:00:00Z"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.name, "Ana");
        assert_eq!(user.age, 7);
    }
}
