//! Display labels and page selectors
//!
//! Every string the controller writes and every selector the browser binding
//! uses to find elements. All fields have defaults, so a config file only
//! needs the values it overrides.

use std::fs;
use std::path::Path;

use serde::{ Deserialize, Serialize };
use thiserror::Error;


/// Errors that can occur while loading configuration.
#[derive( Debug, Error )]
pub enum ConfigError {
    #[error( "IO error: {0}" )]
    Io( #[from] std::io::Error ),

    #[error( "Invalid config: {0}" )]
    Parse( #[from] serde_json::Error ),
}


/// Text written to buttons and labels.
#[derive( Debug, Clone, PartialEq, Eq, Serialize, Deserialize )]
#[serde( default )]
pub struct Labels {
    pub track_play: String,
    pub track_pause: String,
    pub global_play: String,
    pub global_pause: String,
    pub loop_on: String,
    pub loop_off: String,
    pub shuffle_on: String,
    pub shuffle_off: String,

    /// Title used when a track has no title element.
    pub unknown_title: String,
}


impl Default for Labels {
    fn default() -> Self {
        Self {
            track_play: "Play".into(),
            track_pause: "Pause".into(),
            global_play: "▶ Play".into(),
            global_pause: "⏸ Pause".into(),
            loop_on: "🔁 Loop: On".into(),
            loop_off: "🔁 Loop: Off".into(),
            shuffle_on: "🔀 Shuffle: On".into(),
            shuffle_off: "🔀 Shuffle: Off".into(),
            unknown_title: "(unknown)".into(),
        }
    }
}


impl Labels {
    pub fn track_button( &self, playing: bool ) -> &str {
        if playing { &self.track_pause } else { &self.track_play }
    }


    pub fn global_button( &self, playing: bool ) -> &str {
        if playing { &self.global_pause } else { &self.global_play }
    }


    pub fn loop_indicator( &self, enabled: bool ) -> &str {
        if enabled { &self.loop_on } else { &self.loop_off }
    }


    pub fn shuffle_indicator( &self, enabled: bool ) -> &str {
        if enabled { &self.shuffle_on } else { &self.shuffle_off }
    }
}


/// How the browser binding finds and wires page elements.
#[derive( Debug, Clone, PartialEq, Eq, Serialize, Deserialize )]
#[serde( default )]
pub struct PageConfig {
    /// Selector for the media elements, in document order.
    pub media: String,

    /// Selector of the ancestor that groups one track's elements.
    pub song_container: String,

    /// Title element inside the song container.
    pub title: String,

    /// Play/pause button inside the song container.
    pub track_button: String,

    pub progress_container_id: String,
    pub progress_bar_id: String,
    pub now_playing_id: String,
    pub global_button_id: String,
    pub loop_button_id: String,
    pub shuffle_button_id: String,

    // Optional transport buttons; listeners are only attached when present
    pub next_button_id: String,
    pub prev_button_id: String,
    pub stop_button_id: String,

    /// Attach click listeners to the buttons. Leave off for pages that call
    /// the exported functions from inline `onclick` handlers.
    pub wire_buttons: bool,
}


impl Default for PageConfig {
    fn default() -> Self {
        Self {
            media: "audio".into(),
            song_container: ".song".into(),
            title: ".song-title".into(),
            track_button: ".controls button".into(),
            progress_container_id: "global-progress-container".into(),
            progress_bar_id: "global-progress-bar".into(),
            now_playing_id: "now-playing".into(),
            global_button_id: "globalPlayBtn".into(),
            loop_button_id: "loopBtn".into(),
            shuffle_button_id: "shuffleBtn".into(),
            next_button_id: "nextBtn".into(),
            prev_button_id: "prevBtn".into(),
            stop_button_id: "stopBtn".into(),
            wire_buttons: false,
        }
    }
}


/// Complete configuration.
#[derive( Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize )]
#[serde( default )]
pub struct Config {
    pub labels: Labels,
    pub page: PageConfig,
}


impl Config {
    /// Parses a JSON document. Missing fields keep their defaults.
    pub fn from_json( json: &str ) -> Result<Self, ConfigError> {
        Ok( serde_json::from_str( json )? )
    }


    /// Reads and parses a JSON config file.
    pub fn load( path: &Path ) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string( path )?;
        let config = Self::from_json( &contents )?;
        tracing::debug!( "Loaded config from {:?}", path );
        Ok( config )
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json( r#"{ "labels": { "track_play": "Go" } }"# ).unwrap();
        assert_eq!( config.labels.track_play, "Go" );
        assert_eq!( config.labels.track_pause, "Pause" );
        assert_eq!( config.page, PageConfig::default() );
    }


    #[test]
    fn test_empty_object_is_default() {
        assert_eq!( Config::from_json( "{}" ).unwrap(), Config::default() );
    }


    #[test]
    fn test_invalid_json() {
        let result = Config::from_json( "{ labels" );
        assert!( matches!( result, Err( ConfigError::Parse( _ ) ) ) );
    }


    #[test]
    fn test_label_selection() {
        let labels = Labels::default();
        assert_eq!( labels.global_button( true ), "⏸ Pause" );
        assert_eq!( labels.global_button( false ), "▶ Play" );
        assert_eq!( labels.shuffle_indicator( true ), "🔀 Shuffle: On" );
        assert_eq!( labels.loop_indicator( false ), "🔁 Loop: Off" );
    }
}
