//! # Desktop Bridge Implementation
//!
//! Default implementation of the file-system bridge for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides a production-ready implementation of
//! [`FileSystemBridge`](bridge_traits::fs::FileSystemBridge) using
//! `tokio::fs` under a sandbox root directory. The well-known device
//! directories (`Download`, `Music`, `AppStorage`) live inside the sandbox
//! and are created on demand, which keeps the smoke harness from ever
//! touching the real user profile.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::SandboxFileSystem;
//! use bridge_traits::FileSystemBridge;
//!
//! #[tokio::main]
//! async fn main() {
//!     let fs = SandboxFileSystem::new();
//!     let download = fs.download_directory().await.unwrap();
//!     println!("sandbox download dir: {}", download.display());
//! }
//! ```

mod filesystem;

pub use filesystem::SandboxFileSystem;
