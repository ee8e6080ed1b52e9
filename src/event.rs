use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};

use crate::r#gen::{GenClient, GenError};
use crate::model::{QuizQuestion, QuizSettings, StudyPlan, StudyPlanSettings};

/// What the speech audio was requested for, so the result can be labeled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeechKind {
    Question,
    Explanation,
}

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize(#[allow(dead_code)] u16, #[allow(dead_code)] u16),
    /// Terminal outcome of the single outstanding quiz generation request.
    QuizReady(Result<Vec<QuizQuestion>, GenError>),
    /// Terminal outcome of the single outstanding plan generation request.
    PlanReady(Result<StudyPlan, GenError>),
    SpeechReady(SpeechKind, Result<Vec<u8>, GenError>),
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        thread::spawn(move || {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => {
                            if input_tx.send(AppEvent::Key(key)).is_err() {
                                return;
                            }
                        }
                        Ok(Event::Resize(w, h)) => {
                            if input_tx.send(AppEvent::Resize(w, h)).is_err() {
                                return;
                            }
                        }
                        _ => {}
                    }
                } else if input_tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, tx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }

    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }
}

/// Run one blocking quiz generation on a worker thread and post its single
/// terminal outcome. The flow controller guarantees at most one of these is
/// outstanding at a time.
pub fn spawn_quiz_generation(
    client: GenClient,
    settings: QuizSettings,
    tx: mpsc::Sender<AppEvent>,
) {
    thread::spawn(move || {
        let outcome = client.generate_quiz(&settings);
        let _ = tx.send(AppEvent::QuizReady(outcome));
    });
}

pub fn spawn_plan_generation(
    client: GenClient,
    settings: StudyPlanSettings,
    tx: mpsc::Sender<AppEvent>,
) {
    thread::spawn(move || {
        let outcome = client.generate_study_plan(&settings);
        let _ = tx.send(AppEvent::PlanReady(outcome));
    });
}

pub fn spawn_speech_generation(
    client: GenClient,
    kind: SpeechKind,
    text: String,
    tx: mpsc::Sender<AppEvent>,
) {
    thread::spawn(move || {
        let outcome = client.generate_speech(&text);
        let _ = tx.send(AppEvent::SpeechReady(kind, outcome));
    });
}
