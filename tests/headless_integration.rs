use std::sync::Arc;
use std::time::Duration;

use brickmath::api::StubApi;
use brickmath::app::{App, Screen};
use brickmath::config::{Config, GameMode};
use brickmath::dashboard::FETCH_FAILED_NOTICE;
use brickmath::effects::{Effects, Flow};
use brickmath::game::Phase;
use brickmath::model::Exercise;
use brickmath::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use brickmath::sound::{RecordingSink, SoundCue};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

// Simulated time per loop iteration, independent of the real tick interval
const STEP: Duration = Duration::from_millis(100);
const MAX_STEPS: usize = 2_000;

// Headless driver: the real Runner/Effects loop with a stub backend and
// keystrokes injected through the event channel.
struct Harness {
    app: App,
    runner: Runner<TestEventSource, FixedTicker>,
    effects: Effects,
    api: Arc<StubApi>,
    sink: RecordingSink,
}

impl Harness {
    fn new(config: Config, api: StubApi) -> Self {
        let api = Arc::new(api);
        let sink = RecordingSink::new();
        let runner = Runner::new(
            TestEventSource::new(),
            FixedTicker::new(Duration::from_millis(1)),
        );
        let effects = Effects::new(api.clone(), runner.sender(), Box::new(sink.clone()));
        Self {
            app: App::new(config, Rect::new(0, 0, 100, 30)),
            runner,
            effects,
            api,
            sink,
        }
    }

    fn send(&self, code: KeyCode) {
        self.runner
            .sender()
            .send(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
            .unwrap();
    }

    fn type_str(&self, s: &str) {
        for c in s.chars() {
            self.send(KeyCode::Char(c));
        }
    }

    fn step(&mut self) -> Flow {
        let event = self.runner.step();
        let mut commands = self.app.advance(STEP);
        commands.extend(self.app.handle_event(event));
        self.effects.run(commands)
    }

    fn pump_until(&mut self, done: impl Fn(&Harness) -> bool) -> bool {
        for _ in 0..MAX_STEPS {
            if done(self) {
                return true;
            }
            if self.step() == Flow::Quit {
                return done(self);
            }
        }
        done(self)
    }

    fn log_in(&mut self) {
        self.type_str("Ana");
        self.send(KeyCode::Tab);
        self.type_str("7");
        self.send(KeyCode::Enter);
        assert!(self.pump_until(|h| h.app.screen == Screen::Dashboard));
    }

    fn start_game(&mut self) {
        self.type_str("111");
        assert!(self.pump_until(|h| h.app.screen == Screen::Game));
    }

    fn wait_active(&mut self) {
        assert!(self.pump_until(|h| h
            .app
            .session
            .as_ref()
            .is_some_and(|s| s.phase() == Phase::Active)));
    }

    fn wait_for_exercise(&mut self, index: usize) {
        assert!(self.pump_until(|h| h.app.screen != Screen::Game
            || h.app.session.as_ref().is_some_and(|s| s.current_index() == index && !s.is_advancing())));
    }
}

// Correct option always sits in the second slot
fn exercises(n: i64) -> Vec<Exercise> {
    (1..=n)
        .map(|i| Exercise::new(i, i, vec![2 * i - 1, 2 * i, 2 * i + 1], 2 * i))
        .collect()
}

#[test]
fn full_session_reaches_results_and_saves_progress() {
    let mut h = Harness::new(Config::default(), StubApi::new(exercises(3)));
    h.log_in();
    assert_eq!(h.api.created_users(), vec![("Ana".to_string(), 7)]);
    assert_eq!(h.app.ctx.user().map(|u| u.id.as_str()), Some("stub-1"));

    h.start_game();
    h.wait_active();
    for i in 0..3 {
        h.wait_for_exercise(i);
        h.send(KeyCode::Char('2'));
        assert!(h.pump_until(|h| h.app.screen != Screen::Game
            || h.app.session.as_ref().is_some_and(|s| s.is_advancing())));
    }

    assert!(h.pump_until(|h| h.app.screen == Screen::Results));
    assert_eq!(h.app.outcome.score, 30);
    assert_eq!(h.app.outcome.stars, 1);
    assert_eq!(h.app.outcome.completed, 3);
    assert_eq!(h.app.outcome.total, 3);

    assert!(h.pump_until(|h| !h.api.submitted().is_empty()));
    let report = &h.api.submitted()[0];
    assert_eq!(report.user_id, "stub-1");
    assert_eq!(report.score, 30);
    assert_eq!(report.completed_exercises, 3);

    let played = h.sink.played();
    assert_eq!(played.first(), Some(&SoundCue::Welcome));
    assert_eq!(played.iter().filter(|c| **c == SoundCue::Correct).count(), 3);
    assert_eq!(played.last(), Some(&SoundCue::Finish));
}

#[test]
fn play_again_shows_saved_history() {
    let mut h = Harness::new(Config::default(), StubApi::new(exercises(1)));
    h.log_in();
    h.start_game();
    h.wait_active();
    h.send(KeyCode::Char('1'));
    assert!(h.pump_until(|h| h.app.screen == Screen::Results));
    assert!(h.pump_until(|h| !h.api.submitted().is_empty()));

    h.send(KeyCode::Enter);
    assert!(h.pump_until(|h| h.app.dashboard.history().is_some()));
    let history = h.app.dashboard.history().unwrap();
    assert_eq!(history.sessions, 1);
    assert_eq!(history.best_score, 0);
}

#[test]
fn exercise_fetch_failure_returns_to_dashboard() {
    let mut h = Harness::new(Config::default(), StubApi::new(exercises(3)).failing_exercises());
    h.log_in();
    h.start_game();
    assert!(h.pump_until(|h| h.app.dashboard.notice().is_some()));
    assert_eq!(h.app.screen, Screen::Dashboard);
    assert_eq!(h.app.dashboard.notice(), Some(FETCH_FAILED_NOTICE));

    // Enter acknowledges the notice
    h.send(KeyCode::Enter);
    assert!(h.pump_until(|h| h.app.dashboard.notice().is_none()));
}

#[test]
fn user_creation_failure_keeps_login_open() {
    let mut h = Harness::new(Config::default(), StubApi::new(Vec::new()).failing_users());
    h.type_str("Ana");
    h.send(KeyCode::Tab);
    h.type_str("7");
    h.send(KeyCode::Enter);
    assert!(h.pump_until(|h| h.app.login.message().is_some() && !h.app.login.is_loading()));
    assert_eq!(h.app.screen, Screen::Login);
    assert!(!h.app.ctx.is_logged_in());
}

#[test]
fn progress_failure_still_shows_results() {
    let mut h = Harness::new(Config::default(), StubApi::new(exercises(1)).failing_progress());
    h.log_in();
    h.start_game();
    h.wait_active();
    h.send(KeyCode::Char('2'));
    assert!(h.pump_until(|h| h.app.screen == Screen::Results));
    for _ in 0..20 {
        h.step();
    }
    assert_eq!(h.app.screen, Screen::Results);
    assert_eq!(h.app.outcome.score, 10);
    assert!(h.api.submitted().is_empty());
}

#[test]
fn countdown_ends_an_unanswered_session() {
    let config = Config {
        session_secs: 2,
        ..Config::default()
    };
    let mut h = Harness::new(config, StubApi::new(exercises(5)));
    h.log_in();
    h.start_game();
    h.wait_active();
    assert!(h.pump_until(|h| h.app.screen == Screen::Results));
    assert_eq!(h.app.outcome.completed, 0);
    assert_eq!(h.app.outcome.total, 5);
    assert_eq!(h.app.outcome.accuracy_percent(), 0);
}

#[test]
fn drag_mode_with_keyboard() {
    let config = Config {
        mode: GameMode::Drag,
        ..Config::default()
    };
    let mut h = Harness::new(config, StubApi::new(exercises(2)));
    h.log_in();
    h.start_game();
    h.wait_active();

    // pick the second card, then drop it on the target
    h.send(KeyCode::Right);
    h.send(KeyCode::Char(' '));
    h.send(KeyCode::Enter);
    h.wait_for_exercise(1);
    assert_eq!(h.app.session.as_ref().map(|s| s.score()), Some(10));

    // the first card is wrong
    h.send(KeyCode::Left);
    h.send(KeyCode::Char(' '));
    h.send(KeyCode::Enter);
    assert!(h.pump_until(|h| h.app.screen == Screen::Results));
    assert_eq!(h.app.outcome.score, 10);
    assert_eq!(h.app.outcome.completed, 2);
    assert!(h.sink.played().contains(&SoundCue::Incorrect));
}

#[test]
fn escape_on_login_quits() {
    let mut h = Harness::new(Config::default(), StubApi::default());
    h.send(KeyCode::Esc);
    let mut flow = Flow::Continue;
    for _ in 0..10 {
        flow = h.step();
        if flow == Flow::Quit {
            break;
        }
    }
    assert_eq!(flow, Flow::Quit);
}
