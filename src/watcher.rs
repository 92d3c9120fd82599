// SPDX-License-Identifier: MIT
//! Connectivity watcher.
//!
//! Translates the host's connectivity signal into [`ConnectivityEvent`]s.
//! The capability probe at spawn time fixes the operating mode: poll the
//! flag on an interval, relay native notifications from one target, or wire
//! nothing when the host offers no flag.
//!
//! Every emission is confirmed against a fresh flag read and diffed against
//! the last emitted state, so subscribers never see two consecutive events
//! of the same kind without a real transition in between.

use crate::broadcaster::StatusBroadcaster;
use crate::capability::{HostCapabilities, NativeTarget, WatchMode};
use crate::config::WatchConfig;
use crate::host::{HostSignals, NativeSignal, OnlineFlag};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A connectivity transition, as seen by subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

impl ConnectivityEvent {
    fn from_flag(online: bool) -> Self {
        if online {
            Self::Online
        } else {
            Self::Offline
        }
    }
}

impl std::fmt::Display for ConnectivityEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// Diff a freshly read flag value against the last emitted state.
///
/// Returns the event to emit, if any, and records `now` as the new last
/// state. Emitting only through here is what upholds the no-consecutive-
/// duplicates guarantee in both operating modes.
fn transition(last: &mut bool, now: bool) -> Option<ConnectivityEvent> {
    if *last == now {
        return None;
    }
    *last = now;
    Some(ConnectivityEvent::from_flag(now))
}

fn emit_transition(broadcaster: &StatusBroadcaster, event: ConnectivityEvent) {
    match event {
        ConnectivityEvent::Online => info!("connection online"),
        ConnectivityEvent::Offline => warn!("connection offline"),
    }
    broadcaster.emit(event);
}

/// Watches the host connectivity signal and feeds a broadcast channel.
///
/// One background task per watcher (none in `Disabled` mode). Dropping the
/// watcher or calling [`shutdown`](Self::shutdown) stops the task; no events
/// are emitted afterwards.
pub struct ConnectivityWatcher {
    flag: Arc<dyn OnlineFlag>,
    broadcaster: StatusBroadcaster,
    mode: WatchMode,
    default_online: bool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectivityWatcher {
    /// Probe capabilities, resolve the operating mode, and start the
    /// background task feeding the broadcaster.
    ///
    /// `native_events` declares whether the host pushes native notifications
    /// and on which target; flag support is probed from `flag` itself. Must
    /// be called from within a tokio runtime.
    pub fn spawn(
        flag: Arc<dyn OnlineFlag>,
        signals: HostSignals,
        native_events: Option<NativeTarget>,
        config: WatchConfig,
    ) -> Self {
        let caps = HostCapabilities::probe(flag.as_ref(), native_events);
        let mode = WatchMode::resolve(caps);
        let broadcaster = StatusBroadcaster::new(config.event_capacity);
        let default_online = config.default_online;
        let last = flag.read().unwrap_or(default_online);

        let task = match mode {
            WatchMode::Polling => Some(spawn_poller(
                Arc::clone(&flag),
                broadcaster.clone(),
                config.poll_interval(),
                last,
            )),
            WatchMode::NativeOnBroadTarget => Some(spawn_relay(
                Arc::clone(&flag),
                broadcaster.clone(),
                signals.subscribe(NativeTarget::Broad),
                last,
            )),
            WatchMode::NativeOnGlobalTarget => Some(spawn_relay(
                Arc::clone(&flag),
                broadcaster.clone(),
                signals.subscribe(NativeTarget::Global),
                last,
            )),
            WatchMode::Disabled => None,
        };

        info!(mode = %mode, online = last, "connectivity watcher started");

        Self {
            flag,
            broadcaster,
            mode,
            default_online,
            task: Mutex::new(task),
        }
    }

    /// Current flag value, or the configured default when the host has no
    /// queryable flag.
    pub fn is_online(&self) -> bool {
        self.flag.read().unwrap_or(self.default_online)
    }

    /// The operating mode resolved at spawn time.
    pub fn mode(&self) -> WatchMode {
        self.mode
    }

    /// Subscribe to connectivity events.
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectivityEvent> {
        self.broadcaster.subscribe()
    }

    /// Wait until the watcher observes an online state.
    ///
    /// Returns immediately when already online; otherwise awaits the next
    /// `Online` event. In `Disabled` mode with an offline default this waits
    /// forever — a flag-less host never emits.
    pub async fn wait_until_online(&self) {
        // Subscribe before the check so a transition between the two is not
        // missed.
        let mut rx = self.broadcaster.subscribe();
        if self.is_online() {
            return;
        }
        loop {
            match rx.recv().await {
                Ok(ConnectivityEvent::Online) => return,
                Ok(ConnectivityEvent::Offline) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    if self.is_online() {
                        return;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => return,
            }
        }
    }

    /// Stop the background task. Idempotent; no events are emitted after
    /// this returns.
    pub fn shutdown(&self) {
        let task = self.task.lock().ok().and_then(|mut slot| slot.take());
        if let Some(task) = task {
            task.abort();
            info!(mode = %self.mode, "connectivity watcher stopped");
        }
    }
}

impl Drop for ConnectivityWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for ConnectivityWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityWatcher")
            .field("mode", &self.mode)
            .finish()
    }
}

/// Background task for polling mode: sample the flag each tick, emit on
/// change.
fn spawn_poller(
    flag: Arc<dyn OnlineFlag>,
    broadcaster: StatusBroadcaster,
    interval: std::time::Duration,
    mut last: bool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately; consume it so the first real
        // sample lands one interval after start.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            // A flag that stops reading mid-life counts as unchanged.
            let now = flag.read().unwrap_or(last);
            debug!(online = now, "connectivity poll");
            if let Some(event) = transition(&mut last, now) {
                emit_transition(&broadcaster, event);
            }
        }
    })
}

/// Background task for native mode: relay host signals from one target,
/// confirmed against a fresh flag read.
fn spawn_relay(
    flag: Arc<dyn OnlineFlag>,
    broadcaster: StatusBroadcaster,
    mut signals: broadcast::Receiver<NativeSignal>,
    mut last: bool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match signals.recv().await {
                Ok(signal) => {
                    let now = flag.read().unwrap_or(last);
                    if now != matches!(signal, NativeSignal::Online) {
                        debug!(signal = ?signal, online = now, "native signal contradicts flag; ignored");
                        continue;
                    }
                    if let Some(event) = transition(&mut last, now) {
                        emit_transition(&broadcaster, event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "native signal receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn transition_emits_only_on_change() {
        let mut last = true;
        assert_eq!(transition(&mut last, true), None);
        assert_eq!(
            transition(&mut last, false),
            Some(ConnectivityEvent::Offline)
        );
        assert_eq!(transition(&mut last, false), None);
        assert_eq!(transition(&mut last, true), Some(ConnectivityEvent::Online));
    }

    #[test]
    fn event_display_names() {
        assert_eq!(ConnectivityEvent::Online.to_string(), "online");
        assert_eq!(ConnectivityEvent::Offline.to_string(), "offline");
    }

    proptest! {
        /// Folding any flag sample sequence through the differ never yields
        /// two consecutive events of the same kind.
        #[test]
        fn no_consecutive_duplicate_events(
            start: bool,
            samples in proptest::collection::vec(any::<bool>(), 0..64),
        ) {
            let mut last = start;
            let mut events = Vec::new();
            for sample in samples {
                if let Some(event) = transition(&mut last, sample) {
                    events.push(event);
                }
            }
            for pair in events.windows(2) {
                prop_assert_ne!(pair[0], pair[1]);
            }
        }
    }
}
