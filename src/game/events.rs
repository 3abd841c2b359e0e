use anyhow::Result;
use log::{debug, warn};
use serde::Serialize;

use crate::config::{Difficulty, GameMode};
use crate::model::NotationSystem;

/// Typed challenge-progress event. Delivery is fire-and-forget best effort;
/// a failing sink never disturbs the round that emitted the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChallengeEvent {
    BattleStarted { count: u32 },
    ScorePoints { amount: u32 },
    DominateNotes { count: u32 },
}

impl ChallengeEvent {
    /// Type key as the progress backend expects it.
    pub fn key(self) -> &'static str {
        match self {
            Self::BattleStarted { .. } => "battle-started",
            Self::ScorePoints { .. } => "score-points",
            Self::DominateNotes { .. } => "dominate-notes",
        }
    }

    /// Numeric amount attached to the event.
    pub fn amount(self) -> u32 {
        match self {
            Self::BattleStarted { count } | Self::DominateNotes { count } => count,
            Self::ScorePoints { amount } => amount,
        }
    }
}

/// Aggregate handed to the session-persistence collaborator when a round ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub game_mode: GameMode,
    pub difficulty: Difficulty,
    pub notation_system: NotationSystem,
    pub score: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    /// Rounded percentage; 0 when no questions were answered.
    pub accuracy: u32,
    pub duration_seconds: i64,
}

/// Challenge-progress collaborator.
pub trait ProgressSink {
    fn on_event(&mut self, event: ChallengeEvent) -> Result<()>;
}

/// Session-persistence collaborator. Receives one summary per finished round.
pub trait SessionSink {
    fn on_session_end(&mut self, summary: &SessionSummary) -> Result<()>;
}

/// Haptic/audio feedback collaborator. Only learns whether the answer was
/// correct; how that is rendered is not this crate's concern.
pub trait FeedbackSink {
    fn on_answer(&mut self, was_correct: bool) -> Result<()>;
}

/// No-op sinks for rounds wired to nothing.
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn on_event(&mut self, _event: ChallengeEvent) -> Result<()> {
        Ok(())
    }
}

pub struct NullSessionSink;

impl SessionSink for NullSessionSink {
    fn on_session_end(&mut self, _summary: &SessionSummary) -> Result<()> {
        Ok(())
    }
}

pub struct NullFeedbackSink;

impl FeedbackSink for NullFeedbackSink {
    fn on_answer(&mut self, _was_correct: bool) -> Result<()> {
        Ok(())
    }
}

/// Sinks that report through the `log` facade; the demo binary's wiring.
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn on_event(&mut self, event: ChallengeEvent) -> Result<()> {
        debug!("progress: {} +{}", event.key(), event.amount());
        Ok(())
    }
}

pub struct LogFeedbackSink;

impl FeedbackSink for LogFeedbackSink {
    fn on_answer(&mut self, was_correct: bool) -> Result<()> {
        debug!("feedback: correct={was_correct}");
        Ok(())
    }
}

/// Dispatch helpers. Sink failures are logged and swallowed here so scoring
/// continues even when a downstream collaborator is broken.
pub(crate) fn dispatch_progress(sink: &mut dyn ProgressSink, event: ChallengeEvent) {
    if let Err(err) = sink.on_event(event) {
        warn!("progress sink failed for {}: {err:#}", event.key());
    }
}

pub(crate) fn dispatch_session(sink: &mut dyn SessionSink, summary: &SessionSummary) {
    if let Err(err) = sink.on_session_end(summary) {
        warn!("session sink failed: {err:#}");
    }
}

pub(crate) fn dispatch_feedback(sink: &mut dyn FeedbackSink, was_correct: bool) {
    if let Err(err) = sink.on_answer(was_correct) {
        warn!("feedback sink failed: {err:#}");
    }
}
