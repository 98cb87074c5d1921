//! Playback controller: drives the four-stage pipeline visualization while
//! the real catalog fetch runs underneath.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Instant;

use super::fetch::{CatalogProduct, FetchError, ProductFetcher};
use super::gate::StepGate;
use super::stage::{initial_stages, set_all, set_status, Stage, StageStatus};
use super::trace::TraceLog;

/// Scheduling mode for simulated stage delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    /// Stages advance on speed-scaled timers.
    Auto,
    /// Stages advance only when `step()` releases the gate.
    Manual,
}

impl PlaybackMode {
    pub fn toggled(self) -> Self {
        match self {
            PlaybackMode::Auto => PlaybackMode::Manual,
            PlaybackMode::Manual => PlaybackMode::Auto,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackMode::Auto => "auto",
            PlaybackMode::Manual => "manual",
        }
    }
}

/// Bounds for the speed multiplier; `set_speed` clamps into this range.
pub const MIN_SPEED: f64 = 0.5;
pub const MAX_SPEED: f64 = 3.0;

/// Floor for any simulated delay, regardless of speed.
pub const MIN_WAIT_MS: u64 = 50;

/// Nominal simulated delays per hop (the real call is never scaled).
const FRONTEND_DELAY_MS: u64 = 700;
const PROXY_DELAY_MS: u64 = 500;
const STORE_DELAY_MS: u64 = 400;

const STATUS_CONNECTING: &str = "Connecting to service...";

/// Scale a nominal delay by the speed multiplier, with a floor.
pub fn effective_wait_ms(nominal_ms: u64, speed: f64) -> u64 {
    let scaled = (nominal_ms as f64 * speed).round() as u64;
    scaled.max(MIN_WAIT_MS)
}

/// Everything the rendering layer observes. One instance per mounted
/// player; mutated only by [`PipelinePlayer`], except `mode` and `speed`
/// which are settable configuration consulted at the start of each wait.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub mode: PlaybackMode,
    pub speed: f64,
    pub playing: bool,
    pub stages: Vec<Stage>,
    pub log: TraceLog,
    pub response_time_ms: Option<u64>,
    pub last_fetched: Option<DateTime<Utc>>,
    pub status: String,
    pub error: Option<String>,
}

impl PlaybackState {
    fn new() -> Self {
        Self {
            mode: PlaybackMode::Auto,
            speed: 1.0,
            playing: false,
            stages: initial_stages(),
            log: TraceLog::new(),
            response_time_ms: None,
            last_fetched: None,
            status: STATUS_CONNECTING.to_string(),
            error: None,
        }
    }

    /// Return to the pre-run slate. `mode`, `speed`, and `last_fetched`
    /// survive.
    fn reinit(&mut self) {
        self.playing = false;
        self.stages = initial_stages();
        self.log.clear();
        self.response_time_ms = None;
        self.status = STATUS_CONNECTING.to_string();
        self.error = None;
    }
}

/// Errors surfaced by [`PipelinePlayer::run`]. Fetch failures are also
/// written into the state before the run returns, so a rendering layer
/// only ever observes state.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlayerError {
    /// `run()` was called while a run was already in flight.
    #[error("a playback run is already in flight")]
    AlreadyRunning,
    /// The run was abandoned by a reset or a newer run; its remaining
    /// writes were discarded.
    #[error("playback run superseded by reset")]
    Superseded,
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// One playback instance: owns the state, the suspension gate, and the
/// run-generation counter that keeps stale runs from writing into a reset
/// state. Methods take `&self`; share behind an `Arc` so `step()` and
/// `reset()` can be called while `run()` is suspended.
pub struct PipelinePlayer {
    state: RwLock<PlaybackState>,
    gate: StepGate,
    generation: AtomicU64,
    fetcher: Arc<dyn ProductFetcher>,
}

impl PipelinePlayer {
    pub fn new(fetcher: Arc<dyn ProductFetcher>) -> Self {
        Self {
            state: RwLock::new(PlaybackState::new()),
            gate: StepGate::new(),
            generation: AtomicU64::new(0),
            fetcher,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PlaybackState {
        self.state.read().clone()
    }

    /// Whether a manual wait is currently armed (the "step" control should
    /// be enabled).
    pub fn is_waiting(&self) -> bool {
        self.gate.is_armed()
    }

    /// Clear stages, log, timing, and error back to the initial slate.
    /// Does not touch `mode` or `speed`. Any in-flight run is abandoned:
    /// the generation bump makes its remaining writes stale and dropping
    /// the gate slot wakes a manually suspended wait.
    ///
    /// The bump happens under the state write lock so it is ordered
    /// against `run()`'s generation capture; a run can never observe the
    /// cleared state while holding a generation newer than this reset.
    pub fn reset(&self) {
        let mut state = self.state.write();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.gate.clear();
        state.reinit();
    }

    /// Flip between auto and manual. Takes effect from the next wait; a
    /// wait already in progress is unaffected.
    pub fn toggle_mode(&self) -> PlaybackMode {
        let mut state = self.state.write();
        state.mode = state.mode.toggled();
        state.mode
    }

    /// Set the speed multiplier, clamped to [`MIN_SPEED`]..=[`MAX_SPEED`].
    /// Effective for waits begun after the call.
    pub fn set_speed(&self, value: f64) -> f64 {
        let value = value.clamp(MIN_SPEED, MAX_SPEED);
        self.state.write().speed = value;
        value
    }

    /// Release a pending manual wait. Safe to call spuriously; returns
    /// whether a wait was actually released.
    pub fn step(&self) -> bool {
        self.gate.release()
    }

    /// Execute one playback pass. Rejects re-entry while a run is in
    /// flight. On success returns the fetched products; on fetch failure
    /// all four stages are marked `error` and the error is returned after
    /// being recorded in the state.
    pub async fn run(&self) -> Result<Vec<CatalogProduct>, PlayerError> {
        // The generation is captured in the same critical section as the
        // reentrancy check; a reset interleaving here would otherwise be
        // ordered before the capture and this run would overwrite it.
        let run = {
            let mut state = self.state.write();
            if state.playing {
                return Err(PlayerError::AlreadyRunning);
            }
            state.reinit();
            state.playing = true;
            state.status = "Request in flight...".to_string();
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        let started = Instant::now();

        let result = self.drive(run, started).await;
        if let Err(PlayerError::Fetch(error)) = &result {
            self.fail(run, error);
        }
        let _ = self.with_state(run, |state| state.playing = false);
        result
    }

    /// The run state machine over stage indices 0..3.
    async fn drive(&self, run: u64, started: Instant) -> Result<Vec<CatalogProduct>, PlayerError> {
        // Stage 0: frontend.
        self.with_state(run, |state| {
            state.stages = set_status(&state.stages, 0, StageStatus::Active);
            state.log.append("Frontend initialized");
        })?;
        self.wait(run, FRONTEND_DELAY_MS).await?;
        self.with_state(run, |state| {
            state.stages = set_status(&state.stages, 0, StageStatus::Complete);
            state.log.append("Request passed to proxy");
        })?;

        // Stage 1: proxy.
        self.with_state(run, |state| {
            state.stages = set_status(&state.stages, 1, StageStatus::Active);
        })?;
        self.wait(run, PROXY_DELAY_MS).await?;
        self.with_state(run, |state| {
            state.stages = set_status(&state.stages, 1, StageStatus::Complete);
            state.log.append("Proxy forwarded request to service");
        })?;

        // Stage 2: service plus the real call. Not speed-scaled and not
        // manually gated; completion means the response status arrived.
        self.with_state(run, |state| {
            state.stages = set_status(&state.stages, 2, StageStatus::Active);
            state.log.append("Service received request; calling store");
        })?;
        let call_started = Instant::now();
        let pending = self.fetcher.send().await?;
        let call_ms = call_started.elapsed().as_millis();
        self.with_state(run, |state| {
            state.stages = set_status(&state.stages, 2, StageStatus::Complete);
            state.log.append(format!("Store responded in {call_ms} ms"));
        })?;

        // Stage 3: store. The simulated delay and the body read are a
        // join, not a race: the stage never completes before the data
        // actually arrived.
        self.with_state(run, |state| {
            state.stages = set_status(&state.stages, 3, StageStatus::Active);
            state.log.append("Reading response body");
        })?;
        let (body, waited) = futures::join!(pending.products(), self.wait(run, STORE_DELAY_MS));
        waited?;
        let products = body?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let count = products.len();
        self.with_state(run, |state| {
            state.stages = set_status(&state.stages, 3, StageStatus::Complete);
            state.response_time_ms = Some(elapsed_ms);
            state.last_fetched = Some(Utc::now());
            state.status = format!("Loaded {count} products in {elapsed_ms} ms");
            state.log.append(format!("Loaded {count} products"));
        })?;

        Ok(products)
    }

    /// Suspend the run for one simulated hop. Mode and speed are read here,
    /// at the start of the wait, so mid-run changes affect only later waits.
    async fn wait(&self, run: u64, nominal_ms: u64) -> Result<(), PlayerError> {
        let (mode, speed) = {
            let state = self.state.read();
            (state.mode, state.speed)
        };
        let effective = effective_wait_ms(nominal_ms, speed);

        match mode {
            PlaybackMode::Auto => {
                tokio::time::sleep(Duration::from_millis(effective)).await;
            }
            PlaybackMode::Manual => {
                self.with_state(run, |state| {
                    state
                        .log
                        .append(format!("Waiting for manual step ({effective} ms delay held)"));
                })?;
                // Resolves on release, or with an error when reset drops
                // the slot; either way the generation check decides.
                let _ = self.gate.arm().await;
            }
        }
        self.check(run)
    }

    /// Uniform failure propagation: every stage shows the error.
    fn fail(&self, run: u64, error: &FetchError) {
        tracing::warn!(%error, "playback run failed");
        let message = format!("Request failed: {error}");
        let _ = self.with_state(run, |state| {
            state.stages = set_all(&state.stages, StageStatus::Error);
            state.log.append(message.clone());
            state.status = message.clone();
            state.error = Some(message);
            state.playing = false;
        });
    }

    fn check(&self, run: u64) -> Result<(), PlayerError> {
        if self.generation.load(Ordering::SeqCst) == run {
            Ok(())
        } else {
            Err(PlayerError::Superseded)
        }
    }

    /// Mutate the state iff this run is still current. The generation is
    /// re-read under the write lock, so a completed reset can never be
    /// overwritten by a stale run.
    fn with_state<F>(&self, run: u64, f: F) -> Result<(), PlayerError>
    where
        F: FnOnce(&mut PlaybackState),
    {
        let mut state = self.state.write();
        if self.generation.load(Ordering::SeqCst) != run {
            return Err(PlayerError::Superseded);
        }
        f(&mut state);
        Ok(())
    }
}

impl std::fmt::Debug for PipelinePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelinePlayer")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}
