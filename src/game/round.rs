use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::config::GameSettings;
use crate::game::events::{
    ChallengeEvent, FeedbackSink, NullFeedbackSink, NullProgressSink, NullSessionSink,
    ProgressSink, SessionSink, SessionSummary, dispatch_feedback, dispatch_progress,
    dispatch_session,
};
use crate::game::question::{Question, QuestionBuilder};

/// Base points for a correct answer and the per-streak bonus.
const BASE_POINTS: u32 = 10;
const STREAK_BONUS: u32 = 2;

/// Scoring and streak state for one round.
///
/// Mutated exclusively through [`RoundEngine`] operations; the rhythm
/// engine routes its slot outcomes through the same path.
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    pub score: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub is_game_active: bool,
    pub question: Question,
}

impl RoundState {
    /// Accuracy as a rounded percentage; 0 before any question was answered.
    pub fn accuracy(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        let ratio = f64::from(self.correct_answers) / f64::from(self.total_questions);
        (ratio * 100.0).round() as u32
    }

    pub fn incorrect_answers(&self) -> u32 {
        self.total_questions - self.correct_answers
    }
}

/// Round lifecycle: Idle -> Active -> Idle, re-entrant.
///
/// Owns the [`RoundState`] and every mutation of it. Collaborators
/// (challenge progress, session persistence, feedback) are injected at
/// construction so the wiring is statically visible.
pub struct RoundEngine {
    settings: GameSettings,
    state: RoundState,
    builder: QuestionBuilder,
    /// Set on start_game, read on end_game. Owned by the instance so
    /// coexisting rounds can never share a start timestamp.
    session_start: Option<DateTime<Utc>>,
    progress: Box<dyn ProgressSink>,
    session: Box<dyn SessionSink>,
    feedback: Box<dyn FeedbackSink>,
}

impl RoundEngine {
    pub fn new(
        settings: GameSettings,
        builder: QuestionBuilder,
        progress: Box<dyn ProgressSink>,
        session: Box<dyn SessionSink>,
        feedback: Box<dyn FeedbackSink>,
    ) -> Self {
        Self {
            settings,
            state: RoundState::default(),
            builder,
            session_start: None,
            progress,
            session,
            feedback,
        }
    }

    /// Engine with no collaborators attached.
    pub fn detached(settings: GameSettings, builder: QuestionBuilder) -> Self {
        Self::new(
            settings,
            builder,
            Box::new(NullProgressSink),
            Box::new(NullSessionSink),
            Box::new(NullFeedbackSink),
        )
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn question(&self) -> &Question {
        &self.state.question
    }

    /// Start (or restart) a round. Zeroes every counter from any prior
    /// round and reports one battle-started event.
    pub fn start_game(&mut self) {
        self.state = RoundState {
            is_game_active: true,
            ..RoundState::default()
        };
        self.session_start = Some(Utc::now());
        info!("round started: {:?}", self.settings.game_mode);
        dispatch_progress(
            self.progress.as_mut(),
            ChallengeEvent::BattleStarted { count: 1 },
        );
    }

    /// Judge a submitted answer against the current question and score it.
    ///
    /// Both sides are sorted before comparison, so the check is
    /// order-insensitive even for sequence questions; see
    /// `sequence_answer_order_is_ignored` in tests/round_test.rs.
    /// An answer against an empty question always scores incorrect.
    pub fn submit_answer(&mut self, answer: &[String]) -> bool {
        let correct = answers_match(answer, &self.state.question.correct_answer);
        self.state.question.answered = true;
        self.state.question.user_answer = Some(answer.to_vec());
        self.apply_outcome(correct);
        correct
    }

    /// Clear the current question without generating a replacement, so the
    /// answer feedback can stay visible until the next rotation.
    pub fn next_question(&mut self) {
        self.state.question = Question::empty();
    }

    /// Generate and install a fresh question; reports one played note.
    pub fn generate_new_question(&mut self) -> &Question {
        let question = self.builder.build(&self.settings);
        debug!("question {} installed ({} notes)", question.id, question.notes.len());
        self.state.question = question;
        dispatch_progress(
            self.progress.as_mut(),
            ChallengeEvent::DominateNotes { count: 1 },
        );
        &self.state.question
    }

    /// Score one rhythm slot outcome through the shared scoring path.
    /// Correct hits also report the identified note to the progress sink.
    /// Returns the points awarded.
    pub fn score_slot(&mut self, correct: bool) -> u32 {
        let points = self.apply_outcome(correct);
        if correct {
            dispatch_progress(
                self.progress.as_mut(),
                ChallengeEvent::DominateNotes { count: 1 },
            );
        }
        points
    }

    /// End the round: hand the summary to the session collaborator and
    /// return to idle. A no-op when no round is active.
    pub fn end_game(&mut self) {
        if !self.state.is_game_active {
            return;
        }
        let duration_seconds = self
            .session_start
            .map(|start| Utc::now().signed_duration_since(start).num_seconds())
            .unwrap_or(0);
        let summary = SessionSummary {
            game_mode: self.settings.game_mode,
            difficulty: self.settings.difficulty,
            notation_system: self.settings.notation_system,
            score: self.state.score,
            streak: self.state.streak,
            max_streak: self.state.max_streak,
            total_questions: self.state.total_questions,
            correct_answers: self.state.correct_answers,
            accuracy: self.state.accuracy(),
            duration_seconds,
        };
        dispatch_session(self.session.as_mut(), &summary);
        info!(
            "round ended: score {} accuracy {}%",
            summary.score, summary.accuracy
        );
        self.state.is_game_active = false;
        self.state.question = Question::empty();
        self.session_start = None;
    }

    /// Explicit streak penalty. Leaves score and counters untouched.
    pub fn reset_streak(&mut self) {
        self.state.streak = 0;
    }

    /// The one correct/incorrect scoring path shared by question answers
    /// and rhythm slots. Returns the points awarded.
    fn apply_outcome(&mut self, correct: bool) -> u32 {
        let mut points = 0;
        if correct {
            points = BASE_POINTS + self.state.streak * STREAK_BONUS;
            self.state.streak += 1;
            self.state.score += points;
            self.state.correct_answers += 1;
            dispatch_progress(
                self.progress.as_mut(),
                ChallengeEvent::ScorePoints { amount: points },
            );
        } else {
            self.state.streak = 0;
        }
        self.state.max_streak = self.state.max_streak.max(self.state.streak);
        self.state.total_questions += 1;
        dispatch_feedback(self.feedback.as_mut(), correct);
        points
    }
}

/// Sorted-set equality over note identifiers. An empty expected list never
/// matches, so answers against a cleared question always score incorrect.
fn answers_match(submitted: &[String], expected: &[String]) -> bool {
    if expected.is_empty() {
        return false;
    }
    let mut submitted = submitted.to_vec();
    let mut expected = expected.to_vec();
    submitted.sort();
    expected.sort();
    submitted == expected
}
