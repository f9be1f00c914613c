//! Keyed loop registry

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Shortest period a loop may use
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Timing of a repeating loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSpec {
    /// Time between ticks
    pub period: Duration,
    /// Delay before the first tick (zero fires immediately)
    pub initial_delay: Duration,
    /// Stop after this many ticks
    pub max_ticks: Option<u64>,
}

impl LoopSpec {
    /// Tick now and then every `period`
    pub fn every(period: Duration) -> Self {
        Self {
            period,
            initial_delay: Duration::ZERO,
            max_ticks: None,
        }
    }

    /// Tick exactly once after `delay`
    pub fn once_after(delay: Duration) -> Self {
        Self {
            period: delay,
            initial_delay: delay,
            max_ticks: Some(1),
        }
    }

    /// Delay the first tick
    pub fn after(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Limit the number of ticks
    pub fn times(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }
}

/// Registry of repeating loops keyed by a logical identifier.
///
/// Invariant: at most one live loop per key. Clones share the same set of
/// loops, so any clone can stop a loop another clone started.
#[derive(Clone)]
pub struct LoopRegistry {
    /// Runtime the loops are spawned on
    handle: Handle,
    /// Running loop tasks by key
    loops: Arc<Mutex<HashMap<String, JoinHandle<()>>>>,
}

impl LoopRegistry {
    /// Create a registry that spawns onto `handle`
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            loops: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a registry on the current runtime.
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, JoinHandle<()>>> {
        self.loops.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a loop under `key`, cancelling any loop already running there
    pub fn start<F>(&self, key: impl Into<String>, spec: LoopSpec, tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        let key = key.into();
        let mut loops = self.lock();
        loops.retain(|_, handle| !handle.is_finished());
        let task = self.spawn(spec, tick);
        if let Some(previous) = loops.insert(key.clone(), task) {
            previous.abort();
            debug!("Replaced loop {}", key);
        } else {
            debug!("Started loop {} every {:?}", key, spec.period);
        }
    }

    /// Start a loop only if none is running under `key`.
    ///
    /// Returns `false` when a loop was already active. The check and the
    /// insert happen under one lock.
    pub fn start_if_idle<F>(&self, key: impl Into<String>, spec: LoopSpec, tick: F) -> bool
    where
        F: FnMut() + Send + 'static,
    {
        let key = key.into();
        let mut loops = self.lock();
        if loops.get(&key).is_some_and(|handle| !handle.is_finished()) {
            debug!("Loop {} already active", key);
            return false;
        }
        loops.retain(|_, handle| !handle.is_finished());
        let task = self.spawn(spec, tick);
        loops.insert(key.clone(), task);
        debug!("Started loop {} every {:?}", key, spec.period);
        true
    }

    fn spawn<F>(&self, spec: LoopSpec, mut tick: F) -> JoinHandle<()>
    where
        F: FnMut() + Send + 'static,
    {
        let period = spec.period.max(MIN_PERIOD);
        self.handle.spawn(async move {
            if !spec.initial_delay.is_zero() {
                tokio::time::sleep(spec.initial_delay).await;
            }
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut fired: u64 = 0;
            loop {
                ticker.tick().await;
                tick();
                fired += 1;
                if spec.max_ticks.is_some_and(|max| fired >= max) {
                    break;
                }
            }
        })
    }

    /// Cancel the loop under `key`; returns whether one was running
    pub fn stop(&self, key: &str) -> bool {
        match self.lock().remove(key) {
            Some(handle) => {
                let was_running = !handle.is_finished();
                handle.abort();
                if was_running {
                    debug!("Stopped loop {}", key);
                }
                was_running
            }
            None => false,
        }
    }

    /// Cancel every loop; returns how many were running
    pub fn stop_all(&self) -> usize {
        let drained: Vec<(String, JoinHandle<()>)> = self.lock().drain().collect();
        let mut stopped = 0;
        for (_, handle) in drained {
            if !handle.is_finished() {
                stopped += 1;
            }
            handle.abort();
        }
        if stopped > 0 {
            info!("Stopped {} active loops", stopped);
        }
        stopped
    }

    /// Whether a loop is running under `key`
    pub fn is_active(&self, key: &str) -> bool {
        self.lock().get(key).is_some_and(|handle| !handle.is_finished())
    }

    /// Keys with a running loop, sorted
    pub fn active_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lock()
            .iter()
            .filter(|(_, handle)| !handle.is_finished())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Number of running loops
    pub fn active_count(&self) -> usize {
        self.lock().values().filter(|handle| !handle.is_finished()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        (count, move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    async fn wait(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_immediately_then_periodically() {
        let registry = LoopRegistry::current();
        let (count, tick) = counter();
        registry.start("card", LoopSpec::every(Duration::from_secs(2)), tick);

        wait(10).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        wait(4_500).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_loop() {
        let registry = LoopRegistry::current();
        let (fast, fast_tick) = counter();
        let (slow, slow_tick) = counter();

        registry.start("temperature", LoopSpec::every(Duration::from_secs(1)), fast_tick);
        registry.start("temperature", LoopSpec::every(Duration::from_secs(2)), slow_tick);
        assert_eq!(registry.active_count(), 1);

        wait(5_500).await;
        // replaced before its first poll
        assert_eq!(fast.load(Ordering::SeqCst), 0);
        assert_eq!(slow.load(Ordering::SeqCst), 3);
        assert_eq!(registry.active_keys(), vec!["temperature".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_if_idle() {
        let registry = LoopRegistry::current();
        let (first, first_tick) = counter();
        let (second, second_tick) = counter();

        assert!(registry.start_if_idle("air", LoopSpec::every(Duration::from_secs(3)), first_tick));
        assert!(!registry.start_if_idle("air", LoopSpec::every(Duration::from_secs(3)), second_tick));

        wait(10).await;
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_start_if_idle_concurrent_callers() {
        let registry = LoopRegistry::current();
        let (count, _) = counter();

        let started: usize = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|_| {
                    let registry = registry.clone();
                    let count = count.clone();
                    scope.spawn(move || {
                        registry.start_if_idle("temperature", LoopSpec::every(Duration::from_secs(60)), move || {
                            count.fetch_add(1, Ordering::SeqCst);
                        })
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).filter(|s| *s).count()
        });
        assert_eq!(started, 1);

        wait(100).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(registry.active_count(), 1);
        registry.stop_all();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_and_stop_all() {
        let registry = LoopRegistry::current();
        for key in ["a", "b", "c", "d"] {
            let (_, tick) = counter();
            registry.start(key, LoopSpec::every(Duration::from_secs(1)), tick);
        }
        assert!(registry.stop("b"));
        assert!(!registry.stop("b"));
        assert_eq!(registry.active_count(), 3);

        assert_eq!(registry.stop_all(), 3);
        assert_eq!(registry.active_count(), 0);
        assert!(registry.active_keys().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_loop_no_longer_ticks() {
        let registry = LoopRegistry::current();
        let (count, tick) = counter();
        registry.start("humidity", LoopSpec::every(Duration::from_secs(1)), tick);
        wait(1_500).await;
        registry.stop("humidity");
        wait(5_000).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_finishes() {
        let registry = LoopRegistry::current();
        let (count, tick) = counter();
        registry.start("dismiss", LoopSpec::once_after(Duration::from_secs(8)), tick);

        wait(7_000).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(registry.is_active("dismiss"));

        wait(2_000).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!registry.is_active("dismiss"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_limited_loop() {
        let registry = LoopRegistry::current();
        let (count, tick) = counter();
        registry.start(
            "test",
            LoopSpec::every(Duration::from_secs(2)).after(Duration::from_secs(2)).times(4),
            tick,
        );
        wait(20_000).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);
        assert_eq!(registry.active_count(), 0);
    }
}
