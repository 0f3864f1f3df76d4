// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Watchpost - Personal Safety Monitor
//!
//! Fuses three independent risk sources into one security level:
//! - movement anomalies (high speed, sudden stop from high speed)
//! - weather hazard alerts for the current position
//! - a manual SOS override
//!
//! A `danger` level raises an edge-triggered emergency that sounds an alarm,
//! opens the emergency modal and resolves the local emergency number.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐  Position   ┌────────────────────────────────────┐
//! │ PositionManager │ ──────────▶ │              Monitor               │
//! └─────────────────┘             │  MovementDetector ─┐               │
//! ┌─────────────────┐  ToggleSos  │                    ├─▶ aggregate   │
//! │  SOS / Dismiss  │ ──────────▶ │  classify(hazards) ┘       │       │
//! └─────────────────┘             │                            ▼       │
//!                                 │           EmergencyLifecycle ─▶ UI │
//!                                 └──────┬──────────────────▲──────────┘
//!                                spawned │                  │ EventBus
//!                                        ▼                  │
//!                          ┌────────────────┐   ┌───────────────────┐
//!                          │ HazardFeed     │   │ ContactResolver   │
//!                          │ (zone cache)   │   │ (contact cache)   │
//!                          └────────────────┘   └───────────────────┘
//! ```

pub mod cache;
pub mod config;
pub mod core;
pub mod detection;
pub mod emergency;
pub mod feeds;
pub mod security;
pub mod sensors;
pub mod ui;

// Re-exports for convenience
pub use config::Config;
pub use self::core::{EventBus, Monitor, MonitorEvent, Scheduler};
pub use detection::{Level, SecurityLevel};
pub use emergency::{ContactInfo, ContactResolver, EmergencyState};
pub use feeds::{HazardFeed, Geocoder, LookupError};
pub use sensors::{PositionManager, Sample};
pub use ui::{ConsolePresenter, Presenter};

/// Watchpost version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Watchpost name
pub const NAME: &str = "Watchpost";

