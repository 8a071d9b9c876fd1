use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::color::random_vivid;
use crate::firework::LaunchParams;
use crate::pattern::{HEART_EXTENT, heart_points};
use crate::rng::RandomSource;
use crate::schedule::{Scheduler, TimerId};
use crate::show::Show;

impl LaunchParams {
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R, width: f32, height: f32) -> Self {
        Self {
            x: rng.range(0.0, width),
            y: height,
            color: random_vivid(rng),
            rise_speed: -rng.range(1.0, 7.0),
            particle_size: rng.range(2.0, 5.0),
        }
    }
}

const HEART_RISE_SPEED: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    #[default]
    Bulk, // volley, then one shell per interval
    Burst,
    Idle, // wait for a key
}

impl TriggerMode {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "bulk" => Some(TriggerMode::Bulk),
            "burst" => Some(TriggerMode::Burst),
            "idle" => Some(TriggerMode::Idle),
            _ => None,
        }
    }

    pub fn action(self) -> Option<Action> {
        match self {
            TriggerMode::Bulk => Some(Action::Bulk),
            TriggerMode::Burst => Some(Action::Burst),
            TriggerMode::Idle => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Launch,
    Bulk,
    Burst,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchPolicy {
    pub bulk_initial: usize,
    pub bulk_interval: Duration,
    pub burst_count: usize,
    pub burst_spacing: Duration,
}

impl Default for LaunchPolicy {
    fn default() -> Self {
        Self {
            bulk_initial: 30,
            bulk_interval: Duration::from_millis(200),
            burst_count: 5,
            burst_spacing: Duration::from_secs(1),
        }
    }
}

/// Produces launches for a [`Show`]; has no say in how the show ticks.
#[derive(Debug)]
pub struct Launcher {
    policy: LaunchPolicy,
    bounds: (f32, f32),
    periodic: Option<TimerId>,
    bulk_fired: bool,
}

impl Launcher {
    pub fn new(policy: LaunchPolicy, width: f32, height: f32) -> Self {
        Self {
            policy,
            bounds: (width, height),
            periodic: None,
            bulk_fired: false,
        }
    }

    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.bounds = (width, height);
    }

    pub fn launch_random<R: RandomSource>(&self, show: &mut Show<R>) {
        let (width, height) = self.bounds;
        let params = LaunchParams::random(show.rng_mut(), width, height);
        show.launch(params);
    }

    /// Launches `count` shells of one color laid out along a heart outline.
    pub fn launch_heart<R: RandomSource>(&self, show: &mut Show<R>, count: usize) {
        let (width, height) = self.bounds;
        let scale = width / 20.0;
        // lowest point of the outline sits 50 units above the bottom edge
        let center = (width / 2.0, height - HEART_EXTENT * 0.3 * scale);
        let color = random_vivid(show.rng_mut());
        for (x, y) in heart_points(count, center, scale) {
            show.launch(LaunchParams {
                x,
                y,
                color,
                rise_speed: -HEART_RISE_SPEED,
                particle_size: 3.0,
            });
        }
        info!(count, "heart volley launched");
    }

    /// Launches the initial volley and starts the periodic launch.
    /// Only the first call does anything; later calls return `None`.
    pub fn trigger_bulk<R: RandomSource>(
        &mut self,
        show: &mut Show<R>,
        scheduler: &mut Scheduler<Action>,
    ) -> Option<TimerId> {
        if self.bulk_fired {
            warn!("bulk launch already triggered, ignoring");
            return None;
        }
        self.bulk_fired = true;

        for _ in 0..self.policy.bulk_initial {
            self.launch_random(show);
        }
        let id = scheduler.schedule_every(self.policy.bulk_interval, Action::Launch);
        self.periodic = Some(id);

        info!(
            initial = self.policy.bulk_initial,
            interval_ms = self.policy.bulk_interval.as_millis() as u64,
            "bulk launch started"
        );
        Some(id)
    }

    /// Queues `burst_count` single launches, `burst_spacing` apart, the first immediately.
    pub fn trigger_burst(&mut self, scheduler: &mut Scheduler<Action>) -> Vec<TimerId> {
        info!(count = self.policy.burst_count, "burst launch queued");
        (0..self.policy.burst_count)
            .map(|i| scheduler.schedule_once(self.policy.burst_spacing * i as u32, Action::Launch))
            .collect()
    }

    pub fn stop(&mut self, scheduler: &mut Scheduler<Action>) -> bool {
        match self.periodic.take() {
            Some(id) => {
                let cancelled = scheduler.cancel(id);
                if cancelled {
                    info!("periodic launch stopped");
                }
                cancelled
            }
            None => false,
        }
    }

    pub fn periodic_handle(&self) -> Option<TimerId> {
        self.periodic
    }

    pub fn handle<R: RandomSource>(
        &mut self,
        action: Action,
        show: &mut Show<R>,
        scheduler: &mut Scheduler<Action>,
    ) {
        match action {
            Action::Launch => self.launch_random(show),
            Action::Bulk => {
                self.trigger_bulk(show, scheduler);
            }
            Action::Burst => {
                self.trigger_burst(scheduler);
            }
        }
    }
}
