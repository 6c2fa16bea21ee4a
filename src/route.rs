use std::fmt;
use std::str::FromStr;

use crate::context::AppContext;
use crate::model::{AgeGroup, Level, Operation, SelectionParams};

/// Addressable screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Game(SelectionParams),
    Results,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteParseError {
    #[error("unknown route: {0}")]
    Unknown(String),
    #[error("unknown {kind} in route: {value}")]
    BadSegment { kind: &'static str, value: String },
}

impl Route {
    pub fn parse(path: &str) -> Result<Self, RouteParseError> {
        path.parse()
    }

    /// Resolve where a navigation actually lands given who is logged in.
    pub fn guard(self, ctx: &AppContext) -> Route {
        match (self, ctx.is_logged_in()) {
            (_, false) => Route::Login,
            (Route::Login, true) => Route::Dashboard,
            (route, true) => route,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => f.write_str("/"),
            Route::Dashboard => f.write_str("/dashboard"),
            Route::Game(p) => write!(
                f,
                "/game/{}/{}/{}",
                p.age_group.id(),
                p.operation.id(),
                p.level.id()
            ),
            Route::Results => f.write_str("/results"),
        }
    }
}

impl FromStr for Route {
    type Err = RouteParseError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = path
            .trim_end_matches('/')
            .split('/')
            .skip(1)
            .collect();
        if !path.starts_with('/') {
            return Err(RouteParseError::Unknown(path.to_string()));
        }
        match segments[..] {
            [] => Ok(Route::Login),
            ["dashboard"] => Ok(Route::Dashboard),
            ["results"] => Ok(Route::Results),
            ["game", age_group, operation, level] => {
                let bad = |kind, value: &str| RouteParseError::BadSegment {
                    kind,
                    value: value.to_string(),
                };
                Ok(Route::Game(SelectionParams {
                    age_group: AgeGroup::from_id(age_group)
                        .ok_or_else(|| bad("age group", age_group))?,
                    operation: Operation::from_id(operation)
                        .ok_or_else(|| bad("operation", operation))?,
                    level: Level::from_id(level).ok_or_else(|| bad("level", level))?,
                }))
            }
            _ => Err(RouteParseError::Unknown(path.to_string())),
        }
    }
}
