mod events;
mod generator;
mod question;
mod round;

pub use events::{
    ChallengeEvent, FeedbackSink, LogFeedbackSink, LogProgressSink, NullFeedbackSink,
    NullProgressSink, NullSessionSink, ProgressSink, SessionSink, SessionSummary,
};
pub use generator::NoteGenerator;
pub use question::{Question, QuestionBuilder};
pub use round::{RoundEngine, RoundState};
