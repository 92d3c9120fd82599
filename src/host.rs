// SPDX-License-Identifier: MIT
//! Injected host signal sources.
//!
//! The watcher never inspects a real environment directly. Hosts inject a
//! flag implementation ([`OnlineFlag`]) and, where supported, fire native
//! notifications through [`HostSignals`]. Tests drive both the same way a
//! host would.

use crate::capability::NativeTarget;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

const SIGNAL_CHANNEL_CAPACITY: usize = 64;

/// A native connectivity notification as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeSignal {
    Online,
    Offline,
}

/// Queryable online/offline flag.
pub trait OnlineFlag: Send + Sync {
    /// Current flag value, or `None` when the host has no such flag.
    fn read(&self) -> Option<bool>;
}

/// Stock flag backed by an `AtomicBool`.
///
/// Cheaply cloneable — all clones share the same value, so the host keeps a
/// handle to flip after the watcher starts.
#[derive(Debug, Clone)]
pub struct SharedFlag {
    value: Arc<AtomicBool>,
}

impl SharedFlag {
    pub fn new(online: bool) -> Self {
        Self {
            value: Arc::new(AtomicBool::new(online)),
        }
    }

    pub fn set(&self, online: bool) {
        self.value.store(online, Ordering::SeqCst);
    }

    pub fn get(&self) -> bool {
        self.value.load(Ordering::SeqCst)
    }
}

impl OnlineFlag for SharedFlag {
    fn read(&self) -> Option<bool> {
        Some(self.get())
    }
}

/// Capability-absent flag: always reads `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFlag;

impl OnlineFlag for NoFlag {
    fn read(&self) -> Option<bool> {
        None
    }
}

/// Native notification source with one channel per delivery target.
///
/// The host fires signals on whichever target it actually uses; the watcher
/// subscribes to the single target its resolved mode names. The two targets
/// are mechanically identical.
#[derive(Debug, Clone)]
pub struct HostSignals {
    broad: broadcast::Sender<NativeSignal>,
    global: broadcast::Sender<NativeSignal>,
}

impl Default for HostSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl HostSignals {
    pub fn new() -> Self {
        let (broad, _) = broadcast::channel(SIGNAL_CHANNEL_CAPACITY);
        let (global, _) = broadcast::channel(SIGNAL_CHANNEL_CAPACITY);
        Self { broad, global }
    }

    /// Fire a signal on the given target.
    ///
    /// No subscribers is fine — the signal is dropped, matching a host firing
    /// into an environment nobody listens to.
    pub fn fire(&self, target: NativeTarget, signal: NativeSignal) {
        let _ = self.sender(target).send(signal);
    }

    /// Subscribe to signals delivered on the given target.
    pub fn subscribe(&self, target: NativeTarget) -> broadcast::Receiver<NativeSignal> {
        self.sender(target).subscribe()
    }

    fn sender(&self, target: NativeTarget) -> &broadcast::Sender<NativeSignal> {
        match target {
            NativeTarget::Broad => &self.broad,
            NativeTarget::Global => &self.global,
        }
    }
}
