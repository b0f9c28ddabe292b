//! Workspace re-export crate.
//!
//! Host applications can depend on `bienestar-workspace` and pick a feature
//! instead of wiring each workspace crate individually:
//!
//! - `desktop-shims` (default): the full [`core_service`] façade with the
//!   desktop HTTP and file-system bridges.
//! - `headless`: only the catalog and playback state machines, for hosts that
//!   bring every bridge themselves.

#[cfg(feature = "desktop-shims")]
pub use core_service;

#[cfg(feature = "desktop-shims")]
pub use core_service::{CoreDependencies, CoreService};

#[cfg(feature = "headless")]
pub use core_catalog;

#[cfg(feature = "headless")]
pub use core_playback;
