//! Name and age capture.

pub const MIN_AGE: u8 = 3;
pub const MAX_AGE: u8 = 12;
pub const NAME_MAX_CHARS: usize = 30;
pub const AGE_MAX_DIGITS: usize = 3;

pub const LOADING_TEXT: &str = "Cargando...";
pub const CREATE_FAILED_TEXT: &str = "Hubo un error. Intenta de nuevo.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("Por favor, ingresa tu nombre y edad")]
    MissingFields,
    #[error("Esta aplicación es para niños de 3 a 12 años")]
    AgeOutOfRange,
}

/// Check the form before anything is sent to the backend.
/// Returns the trimmed name and the parsed age.
pub fn validate_login(name: &str, age_text: &str) -> Result<(String, u8), LoginError> {
    let name = name.trim();
    let age_text = age_text.trim();
    if name.is_empty() || age_text.is_empty() {
        return Err(LoginError::MissingFields);
    }
    let age: u8 = age_text.parse().map_err(|_| LoginError::AgeOutOfRange)?;
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(LoginError::AgeOutOfRange);
    }
    Ok((name.to_string(), age))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Name,
    Age,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub name: String,
    pub age: String,
    pub focus: Field,
    loading: bool,
    message: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn toggle_focus(&mut self) {
        if self.loading {
            return;
        }
        self.focus = match self.focus {
            Field::Name => Field::Age,
            Field::Age => Field::Name,
        };
    }

    pub fn focus(&mut self, field: Field) {
        if !self.loading {
            self.focus = field;
        }
    }

    /// Typed character for the focused field; returns whether it was accepted
    pub fn push_char(&mut self, c: char) -> bool {
        if self.loading {
            return false;
        }
        match self.focus {
            Field::Name if self.name.chars().count() < NAME_MAX_CHARS && !c.is_control() => {
                self.name.push(c);
                true
            }
            Field::Age if self.age.len() < AGE_MAX_DIGITS && c.is_ascii_digit() => {
                self.age.push(c);
                true
            }
            _ => false,
        }
    }

    pub fn backspace(&mut self) {
        if self.loading {
            return;
        }
        match self.focus {
            Field::Name => self.name.pop(),
            Field::Age => self.age.pop(),
        };
    }

    /// Validate and, if the input is acceptable, enter the loading state.
    pub fn submit(&mut self) -> Option<(String, u8)> {
        if self.loading {
            return None;
        }
        match validate_login(&self.name, &self.age) {
            Ok(valid) => {
                self.loading = true;
                self.message = None;
                Some(valid)
            }
            Err(err) => {
                self.message = Some(err.to_string());
                None
            }
        }
    }

    pub fn create_failed(&mut self) {
        self.loading = false;
        self.message = Some(CREATE_FAILED_TEXT.to_string());
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
    }
}
