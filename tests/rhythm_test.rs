use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use solfa::config::{GameMode, GameSettings};
use solfa::game::{
    NoteGenerator, NullFeedbackSink, NullProgressSink, QuestionBuilder, RoundEngine, SessionSink,
    SessionSummary,
};
use solfa::model::Clef;
use solfa::model::note::NoteName;
use solfa::rhythm::{RhythmConfig, RhythmEngine, RhythmPhase, SubmitOutcome};

const SWEEP_START_MS: i64 = 3_000;

struct SummarySink(Rc<RefCell<Vec<SessionSummary>>>);

impl SessionSink for SummarySink {
    fn on_session_end(&mut self, summary: &SessionSummary) -> Result<()> {
        self.0.borrow_mut().push(summary.clone());
        Ok(())
    }
}

fn rhythm_engine(seed: u64) -> (RhythmEngine, Rc<RefCell<Vec<SessionSummary>>>) {
    let summaries = Rc::new(RefCell::new(Vec::new()));
    let settings = GameSettings::default().with_game_mode(GameMode::Rhythm);
    let round = RoundEngine::new(
        settings,
        QuestionBuilder::new(NoteGenerator::with_seed(Clef::Treble, seed)),
        Box::new(NullProgressSink),
        Box::new(SummarySink(Rc::clone(&summaries))),
        Box::new(NullFeedbackSink),
    );
    let mut generator = NoteGenerator::with_seed(Clef::Treble, seed);
    let engine = RhythmEngine::new(RhythmConfig::default(), &mut generator, round);
    (engine, summaries)
}

/// Step the clock in 16 ms ticks, answering every pending slot as soon as
/// its window opens.
fn play_through(engine: &mut RhythmEngine, answer: impl Fn(NoteName) -> Option<NoteName>) {
    engine.start(0);
    let mut now = 0;
    while engine.phase() != RhythmPhase::Results {
        now += 16;
        assert!(now < 60_000, "round failed to terminate");
        engine.update(now);
        if engine.phase() != RhythmPhase::Sweeping {
            continue;
        }

        let config = *engine.config();
        let position = engine.cursor().position();
        let local = (position / config.slot_width).floor() as usize;
        if local >= config.slot_count {
            continue;
        }
        if position - local as f64 * config.slot_width >= config.slot_width / 2.0 {
            continue;
        }
        let index = engine.cursor().segment_index() * config.slot_count + local;
        if index >= engine.slots().len() || engine.slots()[index].answered() {
            continue;
        }
        if let Some(name) = answer(engine.slots()[index].note.name) {
            engine.submit_answer(name, now);
        }
    }
}

#[test]
fn perfect_round_hits_every_slot() {
    let (mut engine, summaries) = rhythm_engine(31);
    play_through(&mut engine, Some);

    assert_eq!(engine.hit_count(), 20);
    assert_eq!(engine.missed_count(), 0);
    // 20 consecutive correct answers: sum of 10 + 2i for i in 0..20.
    assert_eq!(engine.state().score, 580);
    assert_eq!(engine.state().max_streak, 20);

    let summaries = summaries.borrow();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].accuracy, 100);
    assert_eq!(summaries[0].total_questions, 20);
    assert_eq!(summaries[0].max_streak, 20);
}

#[test]
fn silent_round_misses_every_slot() {
    let (mut engine, summaries) = rhythm_engine(32);
    play_through(&mut engine, |_| None);

    assert_eq!(engine.hit_count(), 0);
    assert_eq!(engine.missed_count(), 20);
    assert_eq!(engine.state().score, 0);
    assert_eq!(engine.state().max_streak, 0);

    let summaries = summaries.borrow();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].accuracy, 0);
    assert_eq!(summaries[0].total_questions, 20);
}

#[test]
fn wrong_answers_spend_slots_without_points() {
    let (mut engine, _summaries) = rhythm_engine(33);
    play_through(&mut engine, |right| {
        NoteName::ALL.iter().copied().find(|name| *name != right)
    });

    assert_eq!(engine.hit_count(), 0);
    assert_eq!(engine.missed_count(), 20);
    assert_eq!(engine.state().score, 0);
    assert_eq!(engine.state().total_questions, 20);
}

#[test]
fn window_boundary_is_inclusive() {
    let (mut engine, _summaries) = rhythm_engine(34);
    engine.start(0);
    engine.update(SWEEP_START_MS);
    assert_eq!(engine.phase(), RhythmPhase::Sweeping);

    // 500 ms into the sweep the cursor sits at 35.0, exactly half a slot
    // width from slot 1's center: accepted.
    let name = engine.slots()[1].note.name;
    let outcome = engine.submit_answer(name, SWEEP_START_MS + 500);
    assert_eq!(outcome, SubmitOutcome::Hit { points: 10 });
}

#[test]
fn just_outside_the_window_is_discarded() {
    let (mut engine, _summaries) = rhythm_engine(34);
    engine.start(0);
    engine.update(SWEEP_START_MS);

    // One millisecond earlier the cursor is at ~34.93, a hair beyond half
    // a slot width from slot 1's center: discarded.
    let name = engine.slots()[1].note.name;
    let outcome = engine.submit_answer(name, SWEEP_START_MS + 499);
    assert_eq!(outcome, SubmitOutcome::OutOfWindow);
    assert_eq!(engine.state().score, 0);
}

#[test]
fn duplicate_submissions_never_score_twice() {
    let (mut engine, _summaries) = rhythm_engine(35);
    engine.start(0);
    engine.update(SWEEP_START_MS);

    let name = engine.slots()[0].note.name;
    assert_eq!(
        engine.submit_answer(name, SWEEP_START_MS + 100),
        SubmitOutcome::Hit { points: 10 }
    );
    let score = engine.state().score;
    let questions = engine.state().total_questions;

    assert_eq!(
        engine.submit_answer(name, SWEEP_START_MS + 120),
        SubmitOutcome::Duplicate
    );
    assert_eq!(engine.state().score, score);
    assert_eq!(engine.state().total_questions, questions);
}

#[test]
fn aborting_mid_sweep_stops_scoring_and_reports_once() {
    let (mut engine, summaries) = rhythm_engine(36);
    engine.start(0);
    engine.update(SWEEP_START_MS);
    let name = engine.slots()[0].note.name;
    engine.submit_answer(name, SWEEP_START_MS + 100);

    engine.abort();
    assert_eq!(engine.phase(), RhythmPhase::Results);
    assert_eq!(summaries.borrow().len(), 1);
    assert_eq!(summaries.borrow()[0].total_questions, 1);

    // A timer that fires after teardown must not score anything.
    engine.update(SWEEP_START_MS + 50_000);
    assert_eq!(
        engine.submit_answer(name, SWEEP_START_MS + 50_000),
        SubmitOutcome::Ignored
    );
    assert_eq!(summaries.borrow().len(), 1);
    assert_eq!(summaries.borrow()[0].total_questions, 1);
}

#[test]
fn streak_survives_segment_handoff() {
    let (mut engine, _summaries) = rhythm_engine(37);
    play_through(&mut engine, Some);

    // Hits continue across the segment boundary, so the streak keeps
    // compounding instead of resetting at slot 10.
    assert_eq!(engine.state().max_streak, 20);
    assert_eq!(engine.cursor().segment_index(), 1);
}
