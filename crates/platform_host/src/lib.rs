//! Typed host-domain contracts shared by the desktop runtime and its host adapters.
//!
//! This crate is the boundary for services the runtime consumes but does not implement itself:
//! delayed delivery of transition timers and the light/dark theme preference. Browser adapters
//! live next to the runtime behind `wasm32` gates; everything here is target-independent.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod theme;
pub mod timers;

pub use theme::{ThemeMode, ThemePreference};
pub use timers::{TimerHost, TimerId, VirtualTimerQueue};
