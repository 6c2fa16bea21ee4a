//! Application shell: owns every screen's state, turns input and backend
//! replies into state changes, and hands side effects back as [`Command`]s.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::api::ApiError;
use crate::celebration::{Confetti, BURST_PARTICLES, SHOWER_PARTICLES};
use crate::config::{Config, GameMode};
use crate::context::AppContext;
use crate::dashboard::{Choice, Dashboard, HistorySummary, FETCH_FAILED_NOTICE};
use crate::game::{GameSession, Phase, SessionEvent};
use crate::login::{Field, LoginForm};
use crate::model::{Exercise, ProgressRecord, ProgressReport, SelectionParams, User};
use crate::results::Outcome;
use crate::route::Route;
use crate::runtime::AppEvent;
use crate::sound::SoundCue;
use crate::ui::layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
    Game,
    Results,
}

/// Side effects requested by the app, carried out by [`crate::effects::Effects`]
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateUser {
        name: String,
        age: u8,
    },
    FetchExercises {
        session: u64,
        params: SelectionParams,
        count: usize,
    },
    SubmitProgress(ProgressReport),
    LoadHistory {
        user_id: String,
    },
    Play(SoundCue),
    Quit,
}

/// Result of a backend call, posted back to the UI thread
#[derive(Debug, Clone)]
pub enum BackendReply {
    UserCreated(Result<User, ApiError>),
    ExercisesLoaded {
        session: u64,
        result: Result<Vec<Exercise>, ApiError>,
    },
    ProgressSubmitted(Result<(), ApiError>),
    HistoryLoaded {
        user_id: String,
        result: Result<Vec<ProgressRecord>, ApiError>,
    },
}

pub struct App {
    pub config: Config,
    pub ctx: AppContext,
    pub screen: Screen,
    pub login: LoginForm,
    pub dashboard: Dashboard,
    pub session: Option<GameSession>,
    pub outcome: Outcome,
    pub confetti: Confetti,
    area: Rect,
    next_session: u64,
    /// Option the mouse went down on, while it is held
    pressed: Option<usize>,
    pointer: Option<(u16, u16)>,
}

impl App {
    pub fn new(config: Config, area: Rect) -> Self {
        Self {
            config,
            ctx: AppContext::new(),
            screen: Screen::Login,
            login: LoginForm::new(),
            dashboard: Dashboard::new(),
            session: None,
            outcome: Outcome::default(),
            confetti: Confetti::new(area.width, area.height),
            area,
            next_session: 0,
            pressed: None,
            pointer: None,
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Mouse position while an option is being dragged
    pub fn drag_pointer(&self) -> Option<(u16, u16)> {
        self.pointer
    }

    pub fn route(&self) -> Route {
        match self.screen {
            Screen::Login => Route::Login,
            Screen::Dashboard => Route::Dashboard,
            Screen::Game => match &self.session {
                Some(session) => Route::Game(session.params()),
                None => Route::Dashboard,
            },
            Screen::Results => Route::Results,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.area = Rect::new(0, 0, width, height);
        self.confetti.resize(width, height);
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Command> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Mouse(mouse) => self.handle_mouse(mouse),
            AppEvent::Resize(w, h) => {
                self.resize(w, h);
                Vec::new()
            }
            AppEvent::Tick => Vec::new(),
            AppEvent::Backend(reply) => self.handle_reply(reply),
        }
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    /// Go to `route`, subject to the login guard, running its entry actions.
    pub fn navigate(&mut self, route: Route) -> Vec<Command> {
        let route = route.guard(&self.ctx);
        tracing::debug!(%route, "navigate");
        self.pressed = None;
        self.pointer = None;
        let mut commands = Vec::new();
        match route {
            Route::Login => {
                self.session = None;
                self.login = LoginForm::new();
                self.screen = Screen::Login;
            }
            Route::Dashboard => {
                self.session = None;
                self.dashboard = Dashboard::new();
                self.screen = Screen::Dashboard;
                if let Some(user) = self.ctx.user() {
                    commands.push(Command::LoadHistory {
                        user_id: user.id.clone(),
                    });
                }
            }
            Route::Game(params) => {
                self.next_session += 1;
                let session = GameSession::loading(self.next_session, params, &self.config);
                tracing::info!(
                    session = session.id(),
                    route = %route,
                    mode = %self.config.mode,
                    "session loading"
                );
                commands.push(Command::FetchExercises {
                    session: session.id(),
                    params,
                    count: self.config.exercise_count,
                });
                self.session = Some(session);
                self.confetti.clear();
                self.screen = Screen::Game;
            }
            Route::Results => {
                self.session = None;
                self.screen = Screen::Results;
                self.confetti.shower(SHOWER_PARTICLES);
                commands.push(Command::Play(SoundCue::Finish));
            }
        }
        commands
    }

    fn play_again(&mut self) -> Vec<Command> {
        self.navigate(Route::Dashboard)
    }

    fn logout(&mut self) -> Vec<Command> {
        if let Some(user) = self.ctx.logout() {
            tracing::info!(user_id = %user.id, "logged out");
        }
        self.navigate(Route::Login)
    }

    fn abandon_session(&mut self) -> Vec<Command> {
        if let Some(session) = &self.session {
            tracing::info!(session = session.id(), "session abandoned");
        }
        self.navigate(Route::Dashboard)
    }

    fn finish_session(&mut self) -> Vec<Command> {
        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        self.outcome = session.outcome();
        tracing::info!(
            session = session.id(),
            phase = ?session.phase(),
            score = self.outcome.score,
            stars = self.outcome.stars,
            completed = self.outcome.completed,
            total = self.outcome.total,
            "session ended"
        );
        let mut commands = Vec::new();
        if let Some(user) = self.ctx.user() {
            commands.push(Command::SubmitProgress(session.progress_report(&user.id)));
        }
        commands.extend(self.navigate(Route::Results));
        commands
    }

    fn session_events(&mut self, events: Vec<SessionEvent>) -> Vec<Command> {
        let mut commands = Vec::new();
        for event in events {
            match event {
                SessionEvent::Answered { correct: true } => {
                    commands.push(Command::Play(SoundCue::Correct));
                    self.confetti.burst(BURST_PARTICLES);
                }
                SessionEvent::Answered { correct: false } => {
                    commands.push(Command::Play(SoundCue::Incorrect));
                }
                SessionEvent::Advanced { index } => {
                    tracing::debug!(index, "next exercise");
                }
                SessionEvent::Ended(_) => commands.extend(self.finish_session()),
            }
        }
        commands
    }

    /// Drive every timer by `dt`
    pub fn advance(&mut self, dt: Duration) -> Vec<Command> {
        self.confetti.advance(dt);
        if self.screen != Screen::Game {
            return Vec::new();
        }
        let events = match self.session.as_mut() {
            Some(session) => session.advance(dt),
            None => return Vec::new(),
        };
        self.session_events(events)
    }

    // =========================================================================
    // BACKEND REPLIES
    // =========================================================================

    pub fn handle_reply(&mut self, reply: BackendReply) -> Vec<Command> {
        match reply {
            BackendReply::UserCreated(result) => {
                if self.screen != Screen::Login || !self.login.is_loading() {
                    return Vec::new();
                }
                match result {
                    Ok(user) => {
                        tracing::info!(user_id = %user.id, age = user.age, "logged in");
                        self.ctx.login(user);
                        let mut commands = vec![Command::Play(SoundCue::Welcome)];
                        commands.extend(self.navigate(Route::Dashboard));
                        commands
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "create user failed");
                        self.login.create_failed();
                        Vec::new()
                    }
                }
            }
            BackendReply::ExercisesLoaded { session, result } => {
                let Some(current) = self.session.as_mut().filter(|s| s.id() == session) else {
                    tracing::debug!(session, "stale exercise reply ignored");
                    return Vec::new();
                };
                match current.on_loaded(result) {
                    Ok(events) => {
                        tracing::info!(session, exercises = current.total(), "session started");
                        self.session_events(events)
                    }
                    Err(e) => {
                        tracing::warn!(session, error = %e, "exercise fetch failed");
                        let commands = self.navigate(Route::Dashboard);
                        self.dashboard.show_notice(FETCH_FAILED_NOTICE);
                        commands
                    }
                }
            }
            BackendReply::ProgressSubmitted(result) => {
                match result {
                    Ok(()) => tracing::debug!("progress saved"),
                    Err(e) => tracing::warn!(error = %e, "progress submission failed"),
                }
                Vec::new()
            }
            BackendReply::HistoryLoaded { user_id, result } => {
                let current = self.ctx.user().is_some_and(|u| u.id == user_id);
                if !current || self.screen != Screen::Dashboard {
                    return Vec::new();
                }
                match result {
                    Ok(records) => self
                        .dashboard
                        .set_history(Some(HistorySummary::from_records(&records))),
                    Err(e) => {
                        tracing::debug!(error = %e, "history unavailable");
                        self.dashboard.set_history(None);
                    }
                }
                Vec::new()
            }
        }
    }

    // =========================================================================
    // KEYBOARD
    // =========================================================================

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![Command::Quit];
        }
        match self.screen {
            Screen::Login => self.login_key(key),
            Screen::Dashboard => self.dashboard_key(key),
            Screen::Game => self.game_key(key),
            Screen::Results => self.results_key(key),
        }
    }

    fn submit_login(&mut self) -> Vec<Command> {
        match self.login.submit() {
            Some((name, age)) => {
                tracing::info!(age, "creating user");
                vec![Command::CreateUser { name, age }]
            }
            None => Vec::new(),
        }
    }

    fn login_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => vec![Command::Quit],
            KeyCode::Enter => self.submit_login(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login.toggle_focus();
                Vec::new()
            }
            KeyCode::Backspace => {
                self.login.backspace();
                Vec::new()
            }
            KeyCode::Char(c) => {
                if self.login.push_char(c) {
                    self.login.dismiss_message();
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn choice(&mut self, choice: Choice) -> Vec<Command> {
        match choice {
            Choice::Advanced(_) => vec![Command::Play(SoundCue::Select)],
            Choice::Start(params) => {
                let mut commands = vec![Command::Play(SoundCue::Start)];
                commands.extend(self.navigate(Route::Game(params)));
                commands
            }
            Choice::Ignored => Vec::new(),
        }
    }

    fn dashboard_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if self.dashboard.notice().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dashboard.dismiss_notice();
            }
            return Vec::new();
        }
        match key.code {
            KeyCode::Left | KeyCode::Up => self.dashboard.move_cursor(-1),
            KeyCode::Right | KeyCode::Down => self.dashboard.move_cursor(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let choice = self.dashboard.choose_cursor();
                return self.choice(choice);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                let choice = self.dashboard.choose(index);
                return self.choice(choice);
            }
            KeyCode::Backspace | KeyCode::Char('b') => {
                self.dashboard.back();
            }
            KeyCode::Char('m') => {
                self.config.mode = self.config.mode.toggled();
                tracing::info!(mode = %self.config.mode, "answer mode changed");
            }
            KeyCode::Esc => {
                if !self.dashboard.back() {
                    return vec![Command::Quit];
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn game_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.code == KeyCode::Esc {
            let cancelled = self.session.as_mut().is_some_and(|s| s.cancel_drag());
            if cancelled {
                return Vec::new();
            }
            return self.abandon_session();
        }
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if session.phase() != Phase::Active {
            return Vec::new();
        }
        match key.code {
            KeyCode::Left | KeyCode::Up => session.move_cursor(-1),
            KeyCode::Right | KeyCode::Down => session.move_cursor(1),
            KeyCode::Enter => {
                session.commit_cursor();
            }
            KeyCode::Char(' ') => match session.mode() {
                GameMode::Multiple => {
                    session.commit_cursor();
                }
                GameMode::Drag => {
                    if !session.pick(session.cursor()) {
                        tracing::debug!("pick ignored");
                    }
                }
            },
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                session.set_cursor(index);
                session.click(index);
            }
            _ => {}
        }
        Vec::new()
    }

    fn results_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('r') => self.play_again(),
            KeyCode::Esc | KeyCode::Char('x') => self.logout(),
            KeyCode::Char('q') => vec![Command::Quit],
            _ => Vec::new(),
        }
    }

    // =========================================================================
    // MOUSE
    // =========================================================================

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Vec<Command> {
        let (column, row) = (mouse.column, mouse.row);
        match self.screen {
            Screen::Login => {
                if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                    return Vec::new();
                }
                let layout = layout::login(self.area);
                match layout::hit(&[layout.name, layout.age, layout.submit], column, row) {
                    Some(0) => self.login.focus(Field::Name),
                    Some(1) => self.login.focus(Field::Age),
                    Some(_) => return self.submit_login(),
                    None => {}
                }
                Vec::new()
            }
            Screen::Dashboard => {
                if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                    return Vec::new();
                }
                if self.dashboard.dismiss_notice() {
                    return Vec::new();
                }
                let layout = layout::dashboard(self.area, self.dashboard.step().option_count());
                if layout::hit(&[layout.back], column, row).is_some() {
                    self.dashboard.back();
                    return Vec::new();
                }
                match layout::hit(&layout.cards, column, row) {
                    Some(index) => {
                        let choice = self.dashboard.choose(index);
                        self.choice(choice)
                    }
                    None => Vec::new(),
                }
            }
            Screen::Game => {
                self.game_mouse(mouse);
                Vec::new()
            }
            Screen::Results => {
                if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                    return Vec::new();
                }
                match layout::hit(&layout::results(self.area).buttons, column, row) {
                    Some(0) => self.play_again(),
                    Some(_) => self.logout(),
                    None => Vec::new(),
                }
            }
        }
    }

    // Press on an option picks it up (drag mode) or selects it (multiple
    // choice). Releasing over the drop zone drops it; releasing on the same
    // option counts as a click.
    fn game_mouse(&mut self, mouse: MouseEvent) {
        let area = self.area;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(widget) = session.widget() else {
            return;
        };
        let layout = layout::game(area, widget.options().len(), session.mode());
        let over_option = layout::hit(&layout.options, mouse.column, mouse.row);
        let over_drop = layout
            .drop_zone
            .is_some_and(|zone| layout::hit(&[zone], mouse.column, mouse.row).is_some());

        match (mouse.kind, session.mode()) {
            (MouseEventKind::Down(MouseButton::Left), GameMode::Multiple) => {
                if let Some(index) = over_option {
                    session.set_cursor(index);
                    session.select(index);
                }
            }
            (MouseEventKind::Down(MouseButton::Left), GameMode::Drag) => {
                if let Some(index) = over_option {
                    if session.pick(index) {
                        session.set_cursor(index);
                        self.pressed = Some(index);
                        self.pointer = Some((mouse.column, mouse.row));
                    }
                }
            }
            (MouseEventKind::Drag(MouseButton::Left), GameMode::Drag) => {
                if self.pressed.is_some() {
                    self.pointer = Some((mouse.column, mouse.row));
                }
            }
            (MouseEventKind::Up(MouseButton::Left), GameMode::Drag) => {
                let pressed = self.pressed.take();
                self.pointer = None;
                if over_drop {
                    session.drop_on_target();
                } else if over_option.is_some() && over_option == pressed {
                    session.cancel_drag();
                    if let Some(index) = pressed {
                        session.click(index);
                    }
                } else {
                    session.cancel_drag();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::FEEDBACK_WINDOW;
    use crate::game::ADVANCE_DELAY;
    use crate::model::{AgeGroup, Level, Operation};
    use assert_matches::assert_matches;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn user() -> User {
        User {
            id: "u1".into(),
            name: "Ana".into(),
            age: 7,
        }
    }

    fn params() -> SelectionParams {
        SelectionParams {
            age_group: AgeGroup::Child,
            operation: Operation::Suma,
            level: Level::Facil,
        }
    }

    fn exercises(n: i64) -> Vec<Exercise> {
        (0..n)
            .map(|i| Exercise::new(i, 1, vec![i, i + 1, i + 2], i + 1))
            .collect()
    }

    fn logged_in() -> App {
        let mut app = App::new(Config::default(), Rect::new(0, 0, 100, 30));
        app.ctx.login(user());
        app.navigate(Route::Dashboard);
        app
    }

    fn in_game(n: i64) -> App {
        let mut app = logged_in();
        app.navigate(Route::Game(params()));
        let session = app.session.as_ref().unwrap().id();
        app.handle_reply(BackendReply::ExercisesLoaded {
            session,
            result: Ok(exercises(n)),
        });
        app
    }

    #[test]
    fn login_flow_creates_user_then_opens_dashboard() {
        let mut app = App::new(Config::default(), Rect::new(0, 0, 100, 30));
        type_str(&mut app, "Ana");
        app.handle_key(key(KeyCode::Tab));
        type_str(&mut app, "7");
        let commands = app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            commands,
            vec![Command::CreateUser {
                name: "Ana".into(),
                age: 7
            }]
        );
        assert!(app.login.is_loading());

        let commands = app.handle_reply(BackendReply::UserCreated(Ok(user())));
        assert_eq!(
            commands,
            vec![
                Command::Play(SoundCue::Welcome),
                Command::LoadHistory {
                    user_id: "u1".into()
                }
            ]
        );
        assert_eq!(app.screen, Screen::Dashboard);
    }

    #[test]
    fn invalid_login_issues_no_network_call() {
        let mut app = App::new(Config::default(), Rect::new(0, 0, 100, 30));
        type_str(&mut app, "Ana");
        app.handle_key(key(KeyCode::Tab));
        type_str(&mut app, "15");
        assert!(app.handle_key(key(KeyCode::Enter)).is_empty());
        assert_eq!(
            app.login.message(),
            Some("Esta aplicación es para niños de 3 a 12 años")
        );
    }

    #[test]
    fn failed_user_creation_keeps_form_interactive() {
        let mut app = App::new(Config::default(), Rect::new(0, 0, 100, 30));
        type_str(&mut app, "Ana");
        app.handle_key(key(KeyCode::Tab));
        type_str(&mut app, "7");
        app.handle_key(key(KeyCode::Enter));
        app.handle_reply(BackendReply::UserCreated(Err(ApiError::Request("down".into()))));
        assert_eq!(app.screen, Screen::Login);
        assert!(!app.login.is_loading());
        assert_eq!(app.login.message(), Some("Hubo un error. Intenta de nuevo."));
    }

    #[test]
    fn guard_sends_anonymous_navigation_to_login() {
        let mut app = App::new(Config::default(), Rect::new(0, 0, 100, 30));
        assert!(app.navigate(Route::Game(params())).is_empty());
        assert_eq!(app.screen, Screen::Login);
        assert!(app.session.is_none());
    }

    #[test]
    fn dashboard_keys_start_a_session() {
        let mut app = logged_in();
        assert_eq!(app.handle_key(key(KeyCode::Char('2'))), vec![Command::Play(SoundCue::Select)]);
        assert_eq!(app.handle_key(key(KeyCode::Enter)), vec![Command::Play(SoundCue::Select)]);
        let commands = app.handle_key(key(KeyCode::Char('1')));
        assert_matches!(commands.as_slice(), [
            Command::Play(SoundCue::Start),
            Command::FetchExercises { session: 1, count: 10, .. },
        ]);
        assert_eq!(app.route().to_string(), "/game/7-9/suma/facil");
    }

    #[test]
    fn fetch_failure_returns_to_dashboard_with_notice() {
        let mut app = logged_in();
        app.navigate(Route::Game(params()));
        app.handle_reply(BackendReply::ExercisesLoaded {
            session: 1,
            result: Err(ApiError::Status {
                status: 500,
                body: String::new(),
            }),
        });
        assert_eq!(app.screen, Screen::Dashboard);
        assert_eq!(app.dashboard.notice(), Some(FETCH_FAILED_NOTICE));
        assert!(app.session.is_none());
    }

    #[test]
    fn stale_exercise_reply_is_ignored() {
        let mut app = logged_in();
        app.navigate(Route::Game(params()));
        app.handle_key(key(KeyCode::Esc));
        app.navigate(Route::Game(params()));
        app.handle_reply(BackendReply::ExercisesLoaded {
            session: 1,
            result: Ok(exercises(3)),
        });
        assert_eq!(app.session.as_ref().map(|s| s.phase()), Some(Phase::Loading));
    }

    #[test]
    fn answering_plays_cue_and_bursts_confetti() {
        let mut app = in_game(3);
        app.handle_key(key(KeyCode::Char('2')));
        let commands = app.advance(FEEDBACK_WINDOW);
        assert_eq!(commands, vec![Command::Play(SoundCue::Correct)]);
        assert!(app.confetti.is_active());
        assert_eq!(app.session.as_ref().map(|s| s.score()), Some(10));
    }

    #[test]
    fn finished_session_submits_progress_and_shows_results() {
        let mut app = in_game(1);
        app.handle_key(key(KeyCode::Char('2')));
        app.advance(FEEDBACK_WINDOW);
        let commands = app.advance(ADVANCE_DELAY);
        assert_matches!(commands.as_slice(), [
            Command::SubmitProgress(report),
            Command::Play(SoundCue::Finish),
        ] if report.score == 10 && report.completed_exercises == 1);
        assert_eq!(app.screen, Screen::Results);
        assert_eq!(app.outcome.completed, 1);
    }

    #[test]
    fn timeout_ends_session() {
        let mut app = in_game(10);
        let commands = app.advance(Duration::from_secs(60));
        assert_matches!(commands.first(), Some(Command::SubmitProgress(r)) if r.completed_exercises == 0);
        assert_eq!(app.screen, Screen::Results);
    }

    #[test]
    fn results_actions() {
        let mut app = in_game(1);
        app.advance(Duration::from_secs(60));
        let commands = app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.screen, Screen::Dashboard);
        assert_matches!(commands.as_slice(), [Command::LoadHistory { .. }]);
        assert!(app.ctx.is_logged_in());

        app.screen = Screen::Results;
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Login);
        assert!(!app.ctx.is_logged_in());
    }

    #[test]
    fn mode_toggle_applies_to_next_session() {
        let mut app = logged_in();
        app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(app.config.mode, GameMode::Drag);
        app.navigate(Route::Game(params()));
        assert_eq!(app.session.as_ref().map(|s| s.mode()), Some(GameMode::Drag));
    }

    #[test]
    fn mouse_drag_onto_drop_zone_commits() {
        let mut app = logged_in();
        app.config.mode = GameMode::Drag;
        app.navigate(Route::Game(params()));
        app.handle_reply(BackendReply::ExercisesLoaded {
            session: 1,
            result: Ok(exercises(2)),
        });
        let layout = layout::game(app.area(), 3, GameMode::Drag);
        let option = layout.options[1];
        let zone = layout.drop_zone.unwrap();
        let mouse = |kind, column, row| MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), option.x + 1, option.y + 1));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), zone.x + 1, zone.y + 1));
        assert_eq!(app.drag_pointer(), Some((zone.x + 1, zone.y + 1)));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), zone.x + 1, zone.y + 1));
        assert_eq!(app.advance(FEEDBACK_WINDOW), vec![Command::Play(SoundCue::Correct)]);
    }

    #[test]
    fn ctrl_c_quits_from_any_screen() {
        let mut app = logged_in();
        let commands = app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(commands, vec![Command::Quit]);
    }
}
