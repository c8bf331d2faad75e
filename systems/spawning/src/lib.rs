#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Resource spawning system that seeds every round and tops the maze up with
//! timed batches.

use std::time::Duration;

use community_maze_core::{CellCoord, Command, Event, ResourceKind};
use log::debug;
use rand::{seq::SliceRandom, Rng};

const DEFAULT_SPAWN_INTERVAL: Duration = Duration::from_millis(900);
const DEFAULT_BATCH_SIZE: usize = 2;
const DEFAULT_MAX_RESOURCES: usize = 60;
const DEFAULT_INITIAL_PER_KIND: usize = 6;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    spawn_interval: Duration,
    batch_size: usize,
    max_resources: usize,
    initial_per_kind: usize,
}

impl Config {
    /// Creates a new configuration using the provided cadence and limits.
    #[must_use]
    pub const fn new(
        spawn_interval: Duration,
        batch_size: usize,
        max_resources: usize,
        initial_per_kind: usize,
    ) -> Self {
        Self {
            spawn_interval,
            batch_size,
            max_resources,
            initial_per_kind,
        }
    }

    /// Returns the configuration with a different batch cadence.
    #[must_use]
    pub const fn with_spawn_interval(self, spawn_interval: Duration) -> Self {
        Self {
            spawn_interval,
            ..self
        }
    }

    /// Returns the configuration with a different resource cap.
    #[must_use]
    pub const fn with_max_resources(self, max_resources: usize) -> Self {
        Self {
            max_resources,
            ..self
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            DEFAULT_SPAWN_INTERVAL,
            DEFAULT_BATCH_SIZE,
            DEFAULT_MAX_RESOURCES,
            DEFAULT_INITIAL_PER_KIND,
        )
    }
}

/// Pure system that emits resource spawn commands.
#[derive(Debug)]
pub struct Spawning<R> {
    config: Config,
    accumulator: Duration,
    rng: R,
}

impl<R: Rng> Spawning<R> {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config, rng: R) -> Self {
        Self {
            config,
            accumulator: Duration::ZERO,
            rng,
        }
    }

    /// Consumes events and the free-cell set to emit spawn commands.
    ///
    /// A `GameStarted` event seeds the configured amount of every resource
    /// kind. Otherwise simulated time accumulates until the interval elapses,
    /// at which point one batch of random kinds is emitted and the timer
    /// restarts from zero. No batch pushes the maze past its resource cap.
    pub fn handle(
        &mut self,
        events: &[Event],
        free_cells: &[CellCoord],
        resource_count: usize,
        out: &mut Vec<Command>,
    ) {
        let mut available = free_cells.to_vec();
        let mut remaining = self.config.max_resources.saturating_sub(resource_count);
        let mut elapsed = Duration::ZERO;

        for event in events {
            match event {
                Event::GameStarted { .. } => {
                    self.accumulator = Duration::ZERO;
                    let before = out.len();
                    for kind in ResourceKind::ALL {
                        for _ in 0..self.config.initial_per_kind {
                            if !self.spawn(kind, &mut available, &mut remaining, out) {
                                break;
                            }
                        }
                    }
                    debug!("seeded {} resources", out.len() - before);
                }
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                _ => {}
            }
        }

        if elapsed.is_zero() || self.config.spawn_interval.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(elapsed);
        if self.accumulator < self.config.spawn_interval {
            return;
        }
        self.accumulator = Duration::ZERO;

        for _ in 0..self.config.batch_size {
            let Some(kind) = ResourceKind::ALL.choose(&mut self.rng).copied() else {
                break;
            };
            if !self.spawn(kind, &mut available, &mut remaining, out) {
                break;
            }
        }
    }

    /// Places one resource on a random available cell, reporting whether
    /// room was left for it.
    fn spawn(
        &mut self,
        kind: ResourceKind,
        available: &mut Vec<CellCoord>,
        remaining: &mut usize,
        out: &mut Vec<Command>,
    ) -> bool {
        if *remaining == 0 || available.is_empty() {
            return false;
        }
        let index = self.rng.gen_range(0..available.len());
        let cell = available.swap_remove(index);
        *remaining -= 1;
        out.push(Command::SpawnResource { cell, kind });
        true
    }
}
