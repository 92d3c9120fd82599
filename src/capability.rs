// SPDX-License-Identifier: MIT
//! Host capability probe and operating-mode resolution.
//!
//! The host either exposes a queryable online/offline flag, native change
//! notifications on one of two targets, both, or neither. The combination is
//! probed once at construction and resolved into a [`WatchMode`] by a pure
//! function; the mode never changes for the lifetime of a watcher.

use crate::host::OnlineFlag;
use serde::{Deserialize, Serialize};

/// Which target the host delivers native connectivity notifications on.
///
/// Some hosts fire change notifications on a broad, document-level target;
/// others on the global, window-level target. The watcher treats the two
/// symmetrically — the distinction only selects which channel to subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeTarget {
    Broad,
    Global,
}

/// What the host environment offers, probed once at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    /// The host exposes a queryable online/offline flag.
    pub online_flag: bool,
    /// The host pushes native change notifications, and on which target.
    pub native_events: Option<NativeTarget>,
}

impl HostCapabilities {
    /// Probe a flag implementation: a `None` read means the capability is
    /// absent. Native-notification support cannot be probed from the flag
    /// and is declared by the host.
    pub fn probe(flag: &dyn OnlineFlag, native_events: Option<NativeTarget>) -> Self {
        Self {
            online_flag: flag.read().is_some(),
            native_events,
        }
    }
}

/// Operating mode of a watcher, fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchMode {
    /// Sample the flag on a fixed interval and emit on change.
    Polling,
    /// Relay native notifications delivered on the broad target.
    NativeOnBroadTarget,
    /// Relay native notifications delivered on the global target.
    NativeOnGlobalTarget,
    /// The host offers no queryable flag — nothing is wired, nothing emits.
    Disabled,
}

impl WatchMode {
    /// Resolve the operating mode from probed capabilities.
    ///
    /// Without a queryable flag the watcher has nothing to report and wires
    /// nothing, even when native notifications are available: every emission
    /// is confirmed against a flag read, so a flag-less host cannot produce
    /// events.
    pub fn resolve(caps: HostCapabilities) -> Self {
        if !caps.online_flag {
            return Self::Disabled;
        }
        match caps.native_events {
            Some(NativeTarget::Broad) => Self::NativeOnBroadTarget,
            Some(NativeTarget::Global) => Self::NativeOnGlobalTarget,
            None => Self::Polling,
        }
    }
}

impl std::fmt::Display for WatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Polling => write!(f, "polling"),
            Self::NativeOnBroadTarget => write!(f, "native_broad"),
            Self::NativeOnGlobalTarget => write!(f, "native_global"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}
