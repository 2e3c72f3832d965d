//! # autofetch
//!
//! Keeps a git working tree up to date with its remotes by running
//! `git -C <folder> fetch` on a repeating timer.
//!
//! The daemon (`autofetchd`) owns the settings, the timer and the panel. The
//! CLI (`autofetch`) sends it one request per invocation over a Unix socket.
//!
//! ## Layout
//!
//! - [`config`]: the three `autoGitFetch.*` settings and where they live
//! - [`core`]: fetch runner, scheduler and the user-facing actions
//! - [`panel`]: settings rendered as display rows
//! - [`daemon`], [`cli`]: both ends of the socket

pub mod cli;
pub mod config;
pub mod core;
pub mod daemon;
pub mod exec;
pub mod git;
pub mod log;
pub mod notifications;
pub mod panel;
