//! Repeating spawn timer
//!
//! At most one timer is ever live. `start` retires whatever was running and
//! hands back a fresh handle; handles from retired timers are inert.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_SPAWN_CATCHUP;

/// Handle to a started timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActiveTimer {
    handle: TimerHandle,
    period: f32,
    /// Time left until the next fire
    remaining: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnScheduler {
    active: Option<ActiveTimer>,
    generation: u32,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any running timer and start a new one firing every `period`
    ///
    /// The first fire happens one full period after the start.
    pub fn start(&mut self, period: f32) -> TimerHandle {
        if let Some(old) = self.active.take() {
            log::debug!("Spawn timer {:?} replaced", old.handle);
        }
        self.generation += 1;
        let handle = TimerHandle(self.generation);
        self.active = Some(ActiveTimer {
            handle,
            period,
            remaining: period,
        });
        handle
    }

    /// Cancel the timer behind `handle`; stale handles do nothing
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        if self.is_active(handle) {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.active.as_ref().is_some_and(|t| t.handle == handle)
    }

    pub fn active_count(&self) -> usize {
        usize::from(self.active.is_some())
    }

    /// Advance the clock by `dt`, returning how many times the timer fired
    ///
    /// At most `MAX_SPAWN_CATCHUP` fires are reported per call.
    pub fn advance(&mut self, dt: f32) -> u32 {
        let Some(timer) = self.active.as_mut() else {
            return 0;
        };
        if timer.period <= 0.0 {
            return 0;
        }

        timer.remaining -= dt;
        let mut fires = 0;
        while timer.remaining <= 0.0 && fires < MAX_SPAWN_CATCHUP {
            fires += 1;
            timer.remaining += timer.period;
        }
        if timer.remaining <= 0.0 {
            log::warn!("Spawn timer fell behind by {}s, dropping backlog", -timer.remaining);
            let phase = timer.remaining.rem_euclid(timer.period);
            timer.remaining = if phase > 0.0 { phase } else { timer.period };
        }
        fires
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(scheduler: &mut SpawnScheduler, duration: f32, dt: f32) -> u32 {
        let steps = (duration / dt).round() as u32;
        (0..steps).map(|_| scheduler.advance(dt)).sum()
    }

    #[test]
    fn test_idle_scheduler_never_fires() {
        let mut scheduler = SpawnScheduler::new();
        assert_eq!(scheduler.advance(100.0), 0);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_fires_once_per_period() {
        let mut scheduler = SpawnScheduler::new();
        scheduler.start(3.0);
        assert_eq!(run(&mut scheduler, 30.0, 1.0), 10);
    }

    #[test]
    fn test_first_fire_waits_a_period() {
        let mut scheduler = SpawnScheduler::new();
        scheduler.start(3.0);
        assert_eq!(scheduler.advance(2.5), 0);
        assert_eq!(scheduler.advance(0.5), 1);
    }

    #[test]
    fn test_double_start_keeps_one_timer() {
        let mut scheduler = SpawnScheduler::new();
        let first = scheduler.start(3.0);
        let second = scheduler.start(3.0);

        assert_eq!(scheduler.active_count(), 1);
        assert!(!scheduler.is_active(first));
        assert!(scheduler.is_active(second));
        assert_eq!(run(&mut scheduler, 30.0, 1.0), 10);
    }

    #[test]
    fn test_restart_resets_phase() {
        let mut scheduler = SpawnScheduler::new();
        scheduler.start(3.0);
        assert_eq!(scheduler.advance(2.0), 0);
        scheduler.start(3.0);
        // Would have fired at t=3 under the old timer
        assert_eq!(scheduler.advance(2.0), 0);
        assert_eq!(scheduler.advance(1.0), 1);
    }

    #[test]
    fn test_stale_handle_cancel_is_noop() {
        let mut scheduler = SpawnScheduler::new();
        let first = scheduler.start(3.0);
        let second = scheduler.start(3.0);

        assert!(!scheduler.cancel(first));
        assert!(scheduler.is_active(second));
        assert!(scheduler.cancel(second));
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(scheduler.advance(10.0), 0);
    }

    #[test]
    fn test_large_step_fires_multiple() {
        let mut scheduler = SpawnScheduler::new();
        scheduler.start(3.0);
        assert_eq!(scheduler.advance(9.0), 3);
    }

    #[test]
    fn test_stalled_frame_is_capped() {
        let mut scheduler = SpawnScheduler::new();
        scheduler.start(3.0);
        assert_eq!(scheduler.advance(3.0e6), MAX_SPAWN_CATCHUP);
        // Huge steps where adding a period no longer changes the f32 total
        assert_eq!(scheduler.advance(1.0e8), MAX_SPAWN_CATCHUP);
        // Back to one fire per period afterwards
        assert_eq!(scheduler.advance(3.0), 1);
        assert_eq!(scheduler.advance(3.0), 1);
    }
}
