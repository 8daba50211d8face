//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (e.g., `core-harness`, `bridge-desktop`). Host
//! applications can depend on `fsmoke-workspace` with the default
//! `desktop-bridge` feature and get a runnable smoke harness without wiring
//! each crate individually.
