use log::{debug, info};

use crate::game::{NoteGenerator, RoundEngine, RoundState};
use crate::model::note::NoteName;
use crate::rhythm::cursor::{Cursor, SlotRuler};
use crate::rhythm::slot::{NoteSlot, SlotState};

/// Countdown before the first sweep: purely cosmetic, no scoring.
pub const COUNTDOWN_TICKS: i64 = 3;
pub const COUNTDOWN_TICK_MS: i64 = 1_000;

/// Phase of a rhythm round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RhythmPhase {
    /// Ticking down before the first sweep.
    Countdown,
    /// Cursor sweeping the current segment.
    Sweeping,
    /// Every slot resolved or every sweep finished; input is no longer
    /// scored.
    Results,
}

/// Geometry and pacing of a rhythm round.
#[derive(Debug, Clone, Copy)]
pub struct RhythmConfig {
    /// Slots per staff segment.
    pub slot_count: usize,
    /// Width of one slot in cursor units.
    pub slot_width: f64,
    /// Time for one full segment sweep.
    pub sweep_duration_ms: i64,
    /// Notes generated for the whole round, across all segments.
    pub total_notes: usize,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            slot_count: 10,
            slot_width: 35.0,
            sweep_duration_ms: 5_000,
            total_notes: 20,
        }
    }
}

/// What became of one answer submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Matched the live slot's note.
    Hit { points: u32 },
    /// Reached the live slot but named the wrong note; the slot is spent.
    Incorrect,
    /// Cursor was outside every hit window; discarded without scoring.
    OutOfWindow,
    /// The targeted slot was already resolved; discarded.
    Duplicate,
    /// No sweep in progress (countdown, results, or round torn down).
    Ignored,
}

/// Drives the timed sweep over the staff segments and resolves slots.
///
/// All timing is pulled from the `now_ms` arguments; the engine registers
/// no callbacks and owns no timers, so tearing a round down cannot leak a
/// live listener. Scoring always goes through the round engine, which owns
/// the only mutation path for [`RoundState`].
pub struct RhythmEngine {
    config: RhythmConfig,
    ruler: SlotRuler,
    round: RoundEngine,
    slots: Vec<NoteSlot>,
    phase: RhythmPhase,
    cursor: Cursor,
    /// Start of the countdown or of the current segment's sweep.
    phase_start_ms: Option<i64>,
    /// Set on early teardown; every later call is a guarded no-op.
    over: bool,
}

impl RhythmEngine {
    /// Create a round. The full note list is generated up front; slot
    /// indices are contiguous across segments.
    pub fn new(config: RhythmConfig, generator: &mut NoteGenerator, round: RoundEngine) -> Self {
        let difficulty = round.settings().difficulty;
        let notes = generator.generate_many(config.total_notes, difficulty);
        Self {
            ruler: SlotRuler::new(config.slot_width, config.slot_count),
            config,
            round,
            slots: notes.into_iter().map(NoteSlot::new).collect(),
            phase: RhythmPhase::Countdown,
            cursor: Cursor::default(),
            phase_start_ms: None,
            over: false,
        }
    }

    pub fn phase(&self) -> RhythmPhase {
        self.phase
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn slots(&self) -> &[NoteSlot] {
        &self.slots
    }

    pub fn state(&self) -> &RoundState {
        self.round.state()
    }

    pub fn config(&self) -> &RhythmConfig {
        &self.config
    }

    pub fn segment_count(&self) -> usize {
        self.slots.len().div_ceil(self.config.slot_count)
    }

    pub fn hit_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.state == SlotState::Hit)
            .count()
    }

    pub fn missed_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.state == SlotState::Missed)
            .count()
    }

    /// Countdown ticks still to display; 0 outside the countdown phase.
    pub fn countdown_ticks_remaining(&self, now_ms: i64) -> i64 {
        match (self.phase, self.phase_start_ms) {
            (RhythmPhase::Countdown, Some(start)) => {
                let elapsed = (now_ms - start).max(0);
                (COUNTDOWN_TICKS - elapsed / COUNTDOWN_TICK_MS).max(0)
            }
            _ => 0,
        }
    }

    /// Begin the countdown. Starts the underlying round and reports the
    /// battle start; calling again on a running round is a no-op.
    pub fn start(&mut self, now_ms: i64) {
        if self.over || self.phase_start_ms.is_some() {
            return;
        }
        self.round.start_game();
        self.phase = RhythmPhase::Countdown;
        self.phase_start_ms = Some(now_ms);
        info!(
            "rhythm round started: {} slots over {} segments",
            self.slots.len(),
            self.segment_count()
        );
    }

    /// Advance the cursor to `now_ms` and resolve everything the sweep has
    /// passed. Safe to call after teardown; late timer callbacks are
    /// guarded no-ops.
    pub fn update(&mut self, now_ms: i64) {
        if self.over || self.phase == RhythmPhase::Results {
            return;
        }
        let Some(phase_start) = self.phase_start_ms else {
            return;
        };
        match self.phase {
            RhythmPhase::Countdown => {
                if now_ms - phase_start >= COUNTDOWN_TICKS * COUNTDOWN_TICK_MS {
                    self.phase = RhythmPhase::Sweeping;
                    self.phase_start_ms = Some(now_ms);
                    debug!("sweep started: segment 0");
                }
            }
            RhythmPhase::Sweeping => self.update_sweep(phase_start, now_ms),
            RhythmPhase::Results => {}
        }
    }

    /// Submit an answer for the slot under the cursor.
    ///
    /// Out-of-window and duplicate submissions are discarded without
    /// touching any state. A submission and the passed-slot check racing
    /// for the same slot resolve first-come-first-served: whichever sets
    /// the slot out of Pending wins and the other is a no-op.
    pub fn submit_answer(&mut self, name: NoteName, now_ms: i64) -> SubmitOutcome {
        // The sweep is sampled at the submission instant, so any slot the
        // cursor has already passed resolves before the answer is judged.
        self.update(now_ms);

        if self.over || self.phase != RhythmPhase::Sweeping {
            return SubmitOutcome::Ignored;
        }

        let position = self.cursor.position();
        let local = self.ruler.nearest_index(position);
        let distance = self.ruler.window_distance(position, local);
        if !self.ruler.within_window(distance) {
            debug!("answer at {position:.1} outside any hit window, discarded");
            return SubmitOutcome::OutOfWindow;
        }

        let (segment_start, segment_end) = self.segment_bounds(self.cursor.segment_index());
        let index = segment_start + local;
        if index >= segment_end {
            // Final segment can hold fewer slots than the ruler sweeps.
            debug!("answer targets empty slot position {local}, discarded");
            return SubmitOutcome::OutOfWindow;
        }
        if self.slots[index].answered() {
            return SubmitOutcome::Duplicate;
        }

        let correct = self.slots[index].note.name == name;
        self.slots[index].state = if correct {
            SlotState::Hit
        } else {
            SlotState::Missed
        };
        let points = self.round.score_slot(correct);
        debug!(
            "slot {index} {}: answered {name:?}",
            if correct { "hit" } else { "missed" }
        );

        if self.all_answered() {
            self.enter_results();
        }

        if correct {
            SubmitOutcome::Hit { points }
        } else {
            SubmitOutcome::Incorrect
        }
    }

    /// Tear the round down early. Stops the sweep before any further
    /// scoring can occur; the session summary is still emitted once.
    pub fn abort(&mut self) {
        if self.over {
            return;
        }
        self.over = true;
        self.phase = RhythmPhase::Results;
        self.round.end_game();
        info!("rhythm round aborted");
    }

    fn update_sweep(&mut self, phase_start: i64, now_ms: i64) {
        let elapsed = (now_ms - phase_start).max(0);
        let progress =
            (elapsed as f64 / self.config.sweep_duration_ms as f64).clamp(0.0, 1.0);
        self.cursor
            .set_position(self.ruler.segment_width() * progress);

        self.resolve_passed(self.ruler.passed_index(self.cursor.position()));
        if self.all_answered() {
            self.enter_results();
            return;
        }

        if elapsed >= self.config.sweep_duration_ms {
            self.complete_segment(now_ms);
        }
    }

    /// Resolve, in index order, every pending slot the cursor has passed.
    fn resolve_passed(&mut self, local_limit: usize) {
        let (segment_start, segment_end) = self.segment_bounds(self.cursor.segment_index());
        let segment_len = segment_end - segment_start;
        for local in 0..local_limit.min(segment_len) {
            let index = segment_start + local;
            if self.slots[index].state.is_pending() {
                self.slots[index].state = SlotState::Missed;
                self.round.score_slot(false);
                debug!("slot {index} passed without an answer, missed");
            }
        }
        if segment_len > 0 {
            self.cursor
                .observe_slot(local_limit.min(segment_len - 1));
        }
    }

    /// Close out the segment the cursor just finished sweeping.
    fn complete_segment(&mut self, now_ms: i64) {
        // The final sample window can be too coarse to catch the last
        // slots; resolve everything left in this segment before handoff.
        self.resolve_passed(self.config.slot_count);

        let next_segment = self.cursor.segment_index() + 1;
        if next_segment < self.segment_count() && !self.all_answered() {
            self.cursor.advance_segment();
            self.phase_start_ms = Some(now_ms);
            debug!("sweep started: segment {next_segment}");
        } else {
            self.enter_results();
        }
    }

    fn enter_results(&mut self) {
        self.phase = RhythmPhase::Results;
        info!(
            "rhythm round finished: {} hit, {} missed, score {}",
            self.hit_count(),
            self.missed_count(),
            self.state().score
        );
        self.round.end_game();
    }

    fn segment_bounds(&self, segment: usize) -> (usize, usize) {
        let start = segment * self.config.slot_count;
        let end = (start + self.config.slot_count).min(self.slots.len());
        (start.min(end), end)
    }

    fn all_answered(&self) -> bool {
        self.slots.iter().all(NoteSlot::answered)
    }
}
