// SPDX-License-Identifier: MIT
//! Online/offline status watcher.
//!
//! Translates a host environment's connectivity signal into discrete
//! [`ConnectivityEvent`]s fanned out to subscribers over a broadcast channel.
//! The host provides up to two signals: a queryable boolean flag and, where
//! supported, native push notifications of flag transitions delivered on one
//! of two targets. A capability probe at construction fixes the operating
//! mode for the watcher's lifetime:
//!
//! - **Polling** — sample the flag on a fixed interval and emit on change.
//! - **Native** (broad or global target) — relay host notifications,
//!   confirmed against a fresh flag read.
//! - **Disabled** — the host has no queryable flag; nothing is emitted.
//!
//! Absent capabilities are configuration variants, not errors.
//!
//! # Example
//! ```rust,ignore
//! use connwatch::{ConnectivityWatcher, HostSignals, SharedFlag, WatchConfig};
//! use std::sync::Arc;
//!
//! let flag = SharedFlag::new(true);
//! let watcher = ConnectivityWatcher::spawn(
//!     Arc::new(flag.clone()),
//!     HostSignals::new(),
//!     None, // no native notifications — polling mode
//!     WatchConfig::default(),
//! );
//!
//! let mut events = watcher.subscribe();
//! flag.set(false);
//! // events.recv().await == Ok(ConnectivityEvent::Offline)
//! ```

pub mod broadcaster;
pub mod capability;
pub mod config;
pub mod host;
pub mod watcher;

pub use broadcaster::StatusBroadcaster;
pub use capability::{HostCapabilities, NativeTarget, WatchMode};
pub use config::{ConfigError, WatchConfig};
pub use host::{HostSignals, NativeSignal, NoFlag, OnlineFlag, SharedFlag};
pub use watcher::{ConnectivityEvent, ConnectivityWatcher};
