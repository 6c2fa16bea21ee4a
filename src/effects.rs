use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use crate::api::ApiClient;
use crate::app::{BackendReply, Command};
use crate::runtime::AppEvent;
use crate::sound::SoundSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Carries out [`Command`]s. Backend calls run on short-lived worker threads
/// and post a [`BackendReply`] into the UI thread's event queue.
pub struct Effects {
    api: Arc<dyn ApiClient>,
    replies: Sender<AppEvent>,
    sound: Box<dyn SoundSink>,
}

impl Effects {
    pub fn new(api: Arc<dyn ApiClient>, replies: Sender<AppEvent>, sound: Box<dyn SoundSink>) -> Self {
        Self { api, replies, sound }
    }

    pub fn run(&mut self, commands: Vec<Command>) -> Flow {
        let mut flow = Flow::Continue;
        for command in commands {
            match command {
                Command::Quit => flow = Flow::Quit,
                Command::Play(cue) => self.sound.play(cue),
                Command::CreateUser { name, age } => {
                    self.spawn(move |api| BackendReply::UserCreated(api.create_user(&name, age)))
                }
                Command::FetchExercises {
                    session,
                    params,
                    count,
                } => self.spawn(move |api| BackendReply::ExercisesLoaded {
                    session,
                    result: api.fetch_exercises(&params, count),
                }),
                Command::SubmitProgress(report) => {
                    self.spawn(move |api| BackendReply::ProgressSubmitted(api.submit_progress(&report)))
                }
                Command::LoadHistory { user_id } => self.spawn(move |api| {
                    let result = api.user_progress(&user_id);
                    BackendReply::HistoryLoaded { user_id, result }
                }),
            }
        }
        flow
    }

    fn spawn<F>(&self, call: F)
    where
        F: FnOnce(&dyn ApiClient) -> BackendReply + Send + 'static,
    {
        let api = Arc::clone(&self.api);
        let replies = self.replies.clone();
        thread::spawn(move || {
            let reply = call(api.as_ref());
            if replies.send(AppEvent::Backend(reply)).is_err() {
                tracing::debug!("event loop gone, backend reply dropped");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StubApi;
    use crate::model::Exercise;
    use crate::sound::{RecordingSink, SoundCue};
    use assert_matches::assert_matches;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn quit_stops_the_loop_and_cues_play_inline() {
        let (tx, _rx) = mpsc::channel();
        let sink = RecordingSink::new();
        let mut effects = Effects::new(Arc::new(StubApi::default()), tx, Box::new(sink.clone()));
        assert_eq!(effects.run(vec![Command::Play(SoundCue::Select)]), Flow::Continue);
        assert_eq!(effects.run(vec![Command::Quit]), Flow::Quit);
        assert_eq!(sink.played(), vec![SoundCue::Select]);
    }

    #[test]
    fn backend_reply_arrives_on_channel() {
        let (tx, rx) = mpsc::channel();
        let api = StubApi::new(vec![Exercise::new(1, 1, vec![2, 3], 2)]);
        let mut effects = Effects::new(Arc::new(api), tx, Box::new(crate::sound::Muted));
        effects.run(vec![Command::CreateUser {
            name: "Ana".into(),
            age: 7,
        }]);
        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_matches!(
            event,
            AppEvent::Backend(BackendReply::UserCreated(Ok(user))) if user.name == "Ana"
        );
    }
}
