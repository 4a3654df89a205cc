//! Simulated progress for the plan-generation call.
//!
//! The backend offers no progress events, yet generation can take 15-45+
//! seconds depending on how many plants were selected. The simulator
//! animates a step sequence and a percentage from elapsed time against an
//! estimate, and the percentage stays strictly below 90 until the real
//! response arrives and `finalize` is called. The simulator can never
//! reach 100% on its own: it has no way to know the call has finished.
//!
//! Timers here are armed deadlines checked by the runtime loop's `tick`,
//! not OS timers. `finalize` and `cancel` both disarm everything, so no
//! recurring callback can survive either transition.

use std::time::{Duration, Instant};

/// Estimate constants, matched to observed backend latency:
/// a fixed startup cost plus a per-plant cost.
const BASE_SECS: f64 = 8.0;
const PER_PLANT_SECS: f64 = 1.5;

/// Percentage tick cadence.
const TICK: Duration = Duration::from_millis(200);

/// Rotating status message cadence - slower than the percentage tick so
/// the text is readable.
const MESSAGE_INTERVAL: Duration = Duration::from_secs(3);

/// Displayed percentage ceiling before finalize. Strictly below 90 so the
/// bar visibly waits for the real completion rather than sitting at a
/// number that looks finished.
const PERCENT_CAP: f64 = 89.0;

/// The fixed step sequence, mirroring the phases of the generation
/// pipeline, with proportional weights summing to 1.
const STEPS: [(&str, f64); 5] = [
    ("Analyzing your growing region", 0.10),
    ("Matching plants to your climate", 0.25),
    ("Generating planting schedules", 0.30),
    ("Writing growing instructions", 0.25),
    ("Assembling your garden plan", 0.10),
];

/// Rotating human-readable phase descriptions, independent of the
/// percentage tick.
const PHASE_MESSAGES: [&str; 6] = [
    "Consulting the almanac...",
    "Checking frost dates...",
    "Pairing up companion plants...",
    "Sketching garden beds...",
    "Double-checking sun requirements...",
    "Almost there, worth the wait...",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Active,
    Done,
}

#[derive(Debug)]
struct Running {
    started_at: Instant,
    estimated: Duration,
    last_tick: Instant,
    last_message_at: Instant,
    message_idx: usize,
    current_step: usize,
    percent: f64,
}

#[derive(Debug, Default)]
enum SimState {
    #[default]
    Inactive,
    Running(Running),
    Finalized,
}

#[derive(Debug, Default)]
pub struct ProgressSimulator {
    state: SimState,
}

impl ProgressSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimated total duration for `selection_count` plants.
    pub fn estimate(selection_count: usize) -> Duration {
        Duration::from_secs_f64(BASE_SECS + PER_PLANT_SECS * selection_count as f64)
    }

    /// Begin simulating. Arms the percentage tick and the message rotation.
    pub fn start(&mut self, selection_count: usize, now: Instant) {
        self.state = SimState::Running(Running {
            started_at: now,
            estimated: Self::estimate(selection_count),
            last_tick: now,
            last_message_at: now,
            message_idx: 0,
            current_step: 0,
            percent: 0.0,
        });
    }

    /// Advance the simulation if the tick interval has elapsed. Returns
    /// whether anything visible changed. Call from the runtime loop.
    pub fn tick(&mut self, now: Instant) -> bool {
        let SimState::Running(run) = &mut self.state else {
            return false;
        };

        let mut changed = false;

        if now.duration_since(run.last_tick) >= TICK {
            run.last_tick = now;
            let elapsed = now.duration_since(run.started_at).as_secs_f64();
            let estimated = run.estimated.as_secs_f64();

            // Monotone non-decreasing, strictly below the cap until finalize.
            let raw = (elapsed / estimated) * 100.0;
            run.percent = run.percent.max(raw.min(PERCENT_CAP));

            // Walk cumulative step durations to find the active step.
            let mut cumulative = 0.0;
            let mut step = STEPS.len() - 1;
            for (i, (_, weight)) in STEPS.iter().enumerate() {
                cumulative += weight * estimated;
                if elapsed < cumulative {
                    step = i;
                    break;
                }
            }
            run.current_step = step;
            changed = true;
        }

        if now.duration_since(run.last_message_at) >= MESSAGE_INTERVAL {
            run.last_message_at = now;
            run.message_idx = (run.message_idx + 1) % PHASE_MESSAGES.len();
            changed = true;
        }

        changed
    }

    /// The real response arrived: jump to 100%, mark every step done and
    /// disarm all timers. Idempotent, and expected to land before the
    /// simulated sequence finishes - that is the common case.
    pub fn finalize(&mut self) {
        self.state = SimState::Finalized;
    }

    /// User-initiated abort: disarm timers without completion visuals.
    pub fn cancel(&mut self) {
        self.state = SimState::Inactive;
    }

    /// Number of armed recurring deadlines. Zero after `finalize` or
    /// `cancel` on every exit path.
    pub fn pending_timers(&self) -> usize {
        match self.state {
            SimState::Running(_) => 2, // percentage tick + message rotation
            _ => 0,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SimState::Running(_))
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.state, SimState::Finalized)
    }

    /// Current displayed percentage.
    pub fn percent(&self) -> f64 {
        match &self.state {
            SimState::Inactive => 0.0,
            SimState::Running(run) => run.percent,
            SimState::Finalized => 100.0,
        }
    }

    /// Current rotating phase message.
    pub fn message(&self) -> &'static str {
        match &self.state {
            SimState::Running(run) => PHASE_MESSAGES[run.message_idx],
            SimState::Finalized => "Your garden plan is ready",
            SimState::Inactive => "",
        }
    }

    /// Step labels with their current status, for rendering.
    pub fn steps(&self) -> Vec<(&'static str, StepStatus)> {
        STEPS
            .iter()
            .enumerate()
            .map(|(i, (label, _))| {
                let status = match &self.state {
                    SimState::Inactive => StepStatus::Pending,
                    SimState::Finalized => StepStatus::Done,
                    SimState::Running(run) => {
                        if i < run.current_step {
                            StepStatus::Done
                        } else if i == run.current_step {
                            StepStatus::Active
                        } else {
                            StepStatus::Pending
                        }
                    }
                };
                (*label, status)
            })
            .collect()
    }
}
