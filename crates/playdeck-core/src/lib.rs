//! Playdeck Core - Playlist transport logic
//!
//! This crate provides the playback controller behind a page of audio
//! tracks: play/pause, next/previous with history, loop, shuffle, and the
//! shared progress bar. The page itself is reached through the traits in
//! [`media`], so the same controller drives the browser and the headless
//! driver.

pub mod command;
pub mod config;
pub mod controller;
pub mod headless;
pub mod media;
pub mod state;

pub use command::{ Command, CommandError, SeekTarget };
pub use config::{ Config, ConfigError, Labels, PageConfig };
pub use controller::PlaybackController;
pub use media::{ MediaElement, ProgressClick, Surface, Track };
pub use state::{ History, PlaybackState };
