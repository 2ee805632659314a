//! Manual icon rotation driver
//!
//! The main button's icon is not animated by the [`AnimationEngine`]: rotating
//! the whole button would drag every view anchored to it. Instead the icon
//! angle is stepped by hand in fixed [`STEP_INTERVAL_MS`] increments (about
//! 100 steps per second), interpolating linearly between the phase's start
//! and end angles.
//!
//! A [`RotationPlan`] is a list of phases, each optionally preceded by a delay.
//! The driver emits [`DriverEvent::Rotated`] for every step and one
//! [`DriverEvent::Finished`] after the last phase.
//!
//! # Clocks
//!
//! - [`DriverClock::Background`]: a timer thread computes the steps and sends
//!   them over a channel. The thread never touches views; the UI thread drains
//!   the channel in [`RotationDriver::poll`] and applies the angles itself.
//! - [`DriverClock::Frame`]: the same plan is stepped from `poll` using the
//!   frame delta. Deterministic, used by tests and the headless simulator.
//!
//! Starting a new plan, [`RotationDriver::cancel`], and dropping the driver
//! all stop the previous plan. Messages already in flight from a cancelled
//! plan are discarded by generation.
//!
//! [`AnimationEngine`]: crate::AnimationEngine

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use smallvec::SmallVec;

/// Period of one manual rotation step
pub const STEP_INTERVAL_MS: u64 = 10;

const EPSILON: f32 = 0.01;

/// One linear rotation segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationPhase {
    /// Wait before the first step of this phase
    pub delay_ms: u64,
    pub from_degrees: f32,
    pub to_degrees: f32,
    pub duration_ms: u64,
}

impl RotationPhase {
    pub fn new(from_degrees: f32, to_degrees: f32, duration_ms: u64) -> Self {
        Self {
            delay_ms: 0,
            from_degrees,
            to_degrees,
            duration_ms,
        }
    }

    pub fn after(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// Ordered rotation phases played back to back
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RotationPlan {
    phases: SmallVec<[RotationPhase; 2]>,
}

impl RotationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(phase: RotationPhase) -> Self {
        Self::new().then(phase)
    }

    pub fn then(mut self, phase: RotationPhase) -> Self {
        self.phases.push(phase);
        self
    }

    pub fn phases(&self) -> &[RotationPhase] {
        &self.phases
    }

    /// Nominal running time including delays
    pub fn duration_ms(&self) -> u64 {
        self.phases.iter().map(|p| p.delay_ms + p.duration_ms).sum()
    }

    /// Angle the icon rests at after the plan
    pub fn end_degrees(&self) -> Option<f32> {
        self.phases.last().map(|p| p.to_degrees)
    }
}

/// Output of the driver, applied on the UI thread
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DriverEvent {
    /// Set the icon rotation to this angle
    Rotated(f32),
    /// The plan completed; carries the generation returned by `start`
    Finished(u64),
}

/// How the driver is clocked
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverClock {
    /// Timer thread, messages marshalled to the UI thread through a channel
    #[default]
    Background,
    /// Stepped by the caller's frame delta
    Frame,
}

/// Linear stepper for one phase
#[derive(Clone, Debug)]
struct PhaseStepper {
    current: f32,
    end: f32,
    degrees_per_step: f32,
}

impl PhaseStepper {
    fn new(phase: &RotationPhase) -> Self {
        let total = (phase.to_degrees - phase.from_degrees).abs();
        let degrees_per_step = if phase.duration_ms == 0 {
            total
        } else {
            total / phase.duration_ms as f32 * STEP_INTERVAL_MS as f32
        };
        Self {
            current: phase.from_degrees,
            end: phase.to_degrees,
            degrees_per_step,
        }
    }

    /// Move one step toward the end; returns the new angle and whether done
    fn step(&mut self) -> (f32, bool) {
        self.current = if self.end > self.current {
            (self.current + self.degrees_per_step).min(self.end)
        } else {
            (self.current - self.degrees_per_step).max(self.end)
        };
        let done = (self.end - self.current).abs() < EPSILON;
        if done {
            self.current = self.end;
        }
        (self.current, done)
    }
}

#[derive(Clone, Debug)]
enum CursorState {
    Waiting { remaining_ms: i64 },
    Rotating(PhaseStepper),
}

/// Playback position inside a plan, advanced one step at a time
#[derive(Clone, Debug)]
struct PlanCursor {
    phases: SmallVec<[RotationPhase; 2]>,
    index: usize,
    state: Option<CursorState>,
    generation: u64,
    carry_ms: f32,
}

impl PlanCursor {
    fn new(plan: RotationPlan, generation: u64) -> Self {
        let mut cursor = Self {
            phases: plan.phases,
            index: 0,
            state: None,
            generation,
            carry_ms: 0.0,
        };
        cursor.enter_phase();
        cursor
    }

    fn enter_phase(&mut self) {
        self.state = self.phases.get(self.index).map(|phase| {
            if phase.delay_ms > 0 {
                CursorState::Waiting {
                    remaining_ms: phase.delay_ms as i64,
                }
            } else {
                CursorState::Rotating(PhaseStepper::new(phase))
            }
        });
    }

    fn is_done(&self) -> bool {
        self.state.is_none()
    }

    /// Perform one timer step
    fn step(&mut self, events: &mut Vec<DriverEvent>) {
        match self.state.as_mut() {
            None => {}
            Some(CursorState::Waiting { remaining_ms }) => {
                *remaining_ms -= STEP_INTERVAL_MS as i64;
                if *remaining_ms <= 0 {
                    let phase = self.phases[self.index];
                    self.state = Some(CursorState::Rotating(PhaseStepper::new(&phase)));
                }
            }
            Some(CursorState::Rotating(stepper)) => {
                let (angle, done) = stepper.step();
                events.push(DriverEvent::Rotated(angle));
                if done {
                    self.index += 1;
                    self.enter_phase();
                    if self.is_done() {
                        events.push(DriverEvent::Finished(self.generation));
                    }
                }
            }
        }
    }

    /// Step as many whole intervals as `elapsed_ms` covers
    fn advance(&mut self, elapsed_ms: f32, events: &mut Vec<DriverEvent>) {
        self.carry_ms += elapsed_ms;
        while self.carry_ms >= STEP_INTERVAL_MS as f32 && !self.is_done() {
            self.carry_ms -= STEP_INTERVAL_MS as f32;
            self.step(events);
        }
    }
}

struct Worker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Worker {
    fn spawn(mut cursor: PlanCursor, tx: Sender<(u64, DriverEvent)>) -> Option<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let generation = cursor.generation;

        let spawned = thread::Builder::new()
            .name("efab-icon-rotation".to_string())
            .spawn(move || {
                let interval = Duration::from_millis(STEP_INTERVAL_MS);
                let mut events = Vec::with_capacity(2);
                while !thread_stop.load(Ordering::Relaxed) && !cursor.is_done() {
                    thread::sleep(interval);
                    if thread_stop.load(Ordering::Relaxed) {
                        break;
                    }
                    cursor.step(&mut events);
                    for event in events.drain(..) {
                        if tx.send((generation, event)).is_err() {
                            // Receiver gone, nobody left to rotate for
                            return;
                        }
                    }
                }
            });

        match spawned {
            Ok(handle) => Some(Self { stop, handle }),
            Err(err) => {
                tracing::warn!("RotationDriver: failed to spawn timer thread: {}", err);
                None
            }
        }
    }

    fn stop(self) {
        self.stop.store(true, Ordering::Relaxed);
        let _ = self.handle.join();
    }
}

/// Steps icon rotation plans on its own clock
pub struct RotationDriver {
    clock: DriverClock,
    generation: u64,
    running: bool,
    cursor: Option<PlanCursor>,
    worker: Option<Worker>,
    tx: Sender<(u64, DriverEvent)>,
    rx: Receiver<(u64, DriverEvent)>,
}

impl RotationDriver {
    pub fn new(clock: DriverClock) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            clock,
            generation: 0,
            running: false,
            cursor: None,
            worker: None,
            tx,
            rx,
        }
    }

    pub fn clock(&self) -> DriverClock {
        self.clock
    }

    /// Start `plan`, cancelling whatever was running, and return its generation
    pub fn start(&mut self, plan: RotationPlan) -> u64 {
        self.cancel();
        self.generation += 1;
        self.running = true;

        let cursor = PlanCursor::new(plan, self.generation);
        tracing::trace!(
            "RotationDriver: start generation {} ({:?} clock)",
            self.generation,
            self.clock
        );

        match self.clock {
            DriverClock::Frame => self.cursor = Some(cursor),
            DriverClock::Background => match Worker::spawn(cursor.clone(), self.tx.clone()) {
                Some(worker) => self.worker = Some(worker),
                // Fall back to frame stepping rather than never finishing
                None => self.cursor = Some(cursor),
            },
        }

        self.generation
    }

    /// Stop the running plan; no further events are delivered for it
    pub fn cancel(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.stop();
        }
        self.cursor = None;
        if self.running {
            tracing::trace!("RotationDriver: cancel generation {}", self.generation);
        }
        self.running = false;
    }

    /// True until the running plan's `Finished` event has been polled
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Collect the events due since the last poll
    ///
    /// Call on the UI thread once per frame. In frame mode `elapsed_ms`
    /// advances the plan; in background mode it is ignored and the channel is
    /// drained.
    pub fn poll(&mut self, elapsed_ms: f32) -> Vec<DriverEvent> {
        let mut events = Vec::new();

        if let Some(cursor) = self.cursor.as_mut() {
            cursor.advance(elapsed_ms, &mut events);
            if cursor.is_done() {
                self.cursor = None;
            }
        }

        while let Ok((generation, event)) = self.rx.try_recv() {
            if generation == self.generation && self.running {
                events.push(event);
            }
        }

        if events
            .iter()
            .any(|e| matches!(e, DriverEvent::Finished(g) if *g == self.generation))
        {
            self.running = false;
            if let Some(worker) = self.worker.take() {
                worker.stop();
            }
        }

        events
    }
}

impl Default for RotationDriver {
    fn default() -> Self {
        Self::new(DriverClock::default())
    }
}

impl Drop for RotationDriver {
    fn drop(&mut self) {
        self.cancel();
    }
}
