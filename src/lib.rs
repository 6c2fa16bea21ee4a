// Library surface for the binary, headless integration tests and reuse.
pub mod answer;
pub mod api;
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod effects;
pub mod game;
pub mod login;
pub mod model;
pub mod results;
pub mod route;
pub mod runtime;
pub mod sound;
pub mod ui;
