use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use solfa::config::{Difficulty, GameMode, GameSettings};
use solfa::game::{
    LogFeedbackSink, LogProgressSink, NoteGenerator, Question, QuestionBuilder, RoundEngine,
    SessionSink, SessionSummary,
};
use solfa::model::note::NoteName;
use solfa::model::{Clef, NotationSystem};
use solfa::rhythm::{RhythmConfig, RhythmEngine, RhythmPhase};
use solfa::traits::{Clock, ManualClock, SystemClock};

/// Run one simulated round of the staff-reading trainer and print the
/// session summary as JSON.
#[derive(Parser)]
#[command(name = "solfa", version, about)]
struct Args {
    /// Game mode to simulate.
    #[arg(long, value_enum, default_value = "single-note")]
    mode: GameMode,

    /// Difficulty level.
    #[arg(long, value_enum, default_value = "beginner")]
    difficulty: Difficulty,

    /// Note-name notation.
    #[arg(long, value_enum, default_value = "letter")]
    notation: NotationSystem,

    /// Clef for generated notes.
    #[arg(long, value_enum, default_value = "treble")]
    clef: Clef,

    /// RNG seed for a reproducible round.
    #[arg(long)]
    seed: Option<u64>,

    /// Questions to play outside rhythm mode.
    #[arg(long, default_value_t = 10)]
    questions: u32,

    /// Chance the simulated player answers correctly.
    #[arg(long, default_value_t = 0.85)]
    accuracy: f64,

    /// Sweep rhythm rounds against the wall clock instead of a stepped one.
    #[arg(long)]
    realtime: bool,
}

/// Session sink that keeps the summary for printing after the round.
struct CaptureSessionSink(Rc<RefCell<Option<SessionSummary>>>);

impl SessionSink for CaptureSessionSink {
    fn on_session_end(&mut self, summary: &SessionSummary) -> Result<()> {
        *self.0.borrow_mut() = Some(summary.clone());
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = GameSettings::default()
        .with_game_mode(args.mode)
        .with_difficulty(args.difficulty)
        .with_notation(args.notation);
    let seed = args.seed.unwrap_or_else(rand::random);
    let accuracy = if args.accuracy.is_finite() {
        args.accuracy.clamp(0.0, 1.0)
    } else {
        0.85
    };
    info!("simulating {:?} round with seed {seed}", settings.game_mode);

    let captured = Rc::new(RefCell::new(None));
    let round = RoundEngine::new(
        settings.clone(),
        QuestionBuilder::new(NoteGenerator::with_seed(args.clef, seed)),
        Box::new(LogProgressSink),
        Box::new(CaptureSessionSink(Rc::clone(&captured))),
        Box::new(LogFeedbackSink),
    );
    let mut player = StdRng::seed_from_u64(seed.wrapping_add(0x5eed));

    match settings.game_mode {
        GameMode::Rhythm => run_rhythm(round, &args, seed, accuracy, &mut player),
        _ => run_questions(round, args.questions, accuracy, &mut player),
    }

    match captured.borrow().as_ref() {
        Some(summary) => println!("{}", serde_json::to_string_pretty(summary)?),
        None => println!("no summary emitted"),
    }
    Ok(())
}

/// Play a fixed number of single-note or sequence questions.
fn run_questions(mut round: RoundEngine, questions: u32, accuracy: f64, player: &mut StdRng) {
    round.start_game();
    for _ in 0..questions {
        round.generate_new_question();
        let answer = if player.gen_bool(accuracy) {
            round.question().correct_answer.clone()
        } else {
            wrong_answer(round.question())
        };
        round.submit_answer(&answer);
        round.next_question();
    }
    round.end_game();
}

fn wrong_answer(question: &Question) -> Vec<String> {
    question
        .options
        .iter()
        .find(|option| !question.correct_answer.contains(*option))
        .cloned()
        .into_iter()
        .collect()
}

/// Milliseconds between cursor samples in the demo loop.
const TICK_MS: i64 = 16;

/// Clock for the demo sweep: the wall clock or a hand-stepped one.
enum SweepClock {
    Live(SystemClock),
    Simulated(ManualClock),
}

impl SweepClock {
    fn start(&self) -> i64 {
        match self {
            Self::Live(clock) => clock.now_ms(),
            Self::Simulated(clock) => clock.now_ms(),
        }
    }

    /// Block (or step) until the next sample instant.
    fn tick(&self) -> i64 {
        match self {
            Self::Live(clock) => {
                thread::sleep(Duration::from_millis(TICK_MS as u64));
                clock.now_ms()
            }
            Self::Simulated(clock) => {
                clock.advance(TICK_MS);
                clock.now_ms()
            }
        }
    }
}

/// Play a rhythm round, answering each slot as its window opens.
fn run_rhythm(round: RoundEngine, args: &Args, seed: u64, accuracy: f64, player: &mut StdRng) {
    let mut generator = NoteGenerator::with_seed(args.clef, seed.wrapping_add(1));
    let mut engine = RhythmEngine::new(RhythmConfig::default(), &mut generator, round);
    let clock = if args.realtime {
        SweepClock::Live(SystemClock::new())
    } else {
        SweepClock::Simulated(ManualClock::new())
    };
    engine.start(clock.start());

    while engine.phase() != RhythmPhase::Results {
        let now = clock.tick();
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
        // Only the first half of a slot accepts answers.
        if position - local as f64 * config.slot_width >= config.slot_width / 2.0 {
            continue;
        }
        let index = engine.cursor().segment_index() * config.slot_count + local;
        if index >= engine.slots().len() || engine.slots()[index].answered() {
            continue;
        }

        let right = engine.slots()[index].note.name;
        let name = if player.gen_bool(accuracy) {
            right
        } else {
            NoteName::ALL
                .iter()
                .copied()
                .find(|candidate| *candidate != right)
                .unwrap_or(right)
        };
        engine.submit_answer(name, now);
    }
}
