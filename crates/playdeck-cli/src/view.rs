//! Rendering of the simulated page.

use std::fmt::Write;

use playdeck_core::headless::{ MemorySurface, SimulatedMedia };
use playdeck_core::{ MediaElement, PlaybackState, Track };
use serde::Serialize;


/// Width of the text progress bar, in cells.
const BAR_WIDTH: usize = 20;


/// Snapshot of everything visible on the page.
#[derive( Debug, Serialize )]
pub struct PageView<'a> {
    pub surface: &'a MemorySurface,
    pub state: &'a PlaybackState,
    pub tracks: Vec<TrackView<'a>>,
}


/// One track row.
#[derive( Debug, Serialize )]
pub struct TrackView<'a> {
    pub title: &'a str,
    pub position: f64,
    pub duration: f64,
    pub paused: bool,
}


impl<'a> PageView<'a> {
    pub fn new( surface: &'a MemorySurface, state: &'a PlaybackState, tracks: &'a [ Track<SimulatedMedia> ] ) -> Self {
        let tracks = tracks
            .iter()
            .map( |track| TrackView {
                title: &track.title,
                position: track.media.current_time(),
                duration: track.media.duration(),
                paused: track.media.is_paused(),
            })
            .collect();

        Self { surface, state, tracks }
    }


    /// Renders the page as plain text.
    pub fn to_text( &self ) -> String {
        let surface = self.surface;
        let mut out = String::new();

        let _ = writeln!(
            out,
            "[{}]  {}  {}",
            surface.global_button, surface.loop_indicator, surface.shuffle_indicator
        );
        let _ = writeln!(
            out,
            "Now playing: {:<24} {} {:>3.0}%",
            surface.now_playing,
            progress_bar( surface.progress ),
            surface.progress
        );

        for ( index, track ) in self.tracks.iter().enumerate() {
            let marker = if self.state.is_current( index ) { ">" } else { " " };
            let button = surface.track_buttons.get( index ).map( String::as_str ).unwrap_or( "" );
            let _ = writeln!(
                out,
                "{} {:>2} [{:<5}] {} ({})",
                marker,
                index,
                button,
                track.title,
                format_time( track.position, track.duration )
            );
        }

        let _ = write!( out, "history: {:?}", self.state.history.as_slice() );
        out
    }
}


fn progress_bar( percent: f64 ) -> String {
    let filled = ( ( percent.clamp( 0.0, 100.0 ) / 100.0 ) * BAR_WIDTH as f64 ).round() as usize;
    format!( "[{}{}]", "#".repeat( filled ), "-".repeat( BAR_WIDTH - filled ) )
}


fn format_time( position: f64, duration: f64 ) -> String {
    let clock = |secs: f64| {
        let secs = secs.max( 0.0 ) as u64;
        format!( "{}:{:02}", secs / 60, secs % 60 )
    };

    if duration.is_finite() {
        format!( "{} / {}", clock( position ), clock( duration ) )
    } else {
        format!( "{} / --:--", clock( position ) )
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_progress_bar() {
        assert_eq!( progress_bar( 0.0 ), format!( "[{}]", "-".repeat( BAR_WIDTH ) ) );
        assert_eq!( progress_bar( 50.0 ), format!( "[{}{}]", "#".repeat( 10 ), "-".repeat( 10 ) ) );
        assert_eq!( progress_bar( 150.0 ), format!( "[{}]", "#".repeat( BAR_WIDTH ) ) );
    }


    #[test]
    fn test_format_time() {
        assert_eq!( format_time( 75.0, 200.0 ), "1:15 / 3:20" );
        assert_eq!( format_time( 5.0, f64::NAN ), "0:05 / --:--" );
    }


    #[test]
    fn test_text_marks_current_track() {
        let mut surface = MemorySurface::new( 2 );
        surface.track_buttons = vec![ "Play".into(), "Pause".into() ];
        let mut state = PlaybackState::new();
        state.cursor = Some( 1 );
        state.history.record( 1 );
        let tracks = vec![
            Track::new( SimulatedMedia::new( 60.0 ), "First" ),
            Track::new( SimulatedMedia::new( 60.0 ), "Second" ),
        ];

        let text = PageView::new( &surface, &state, &tracks ).to_text();
        assert!( text.contains( ">  1 [Pause] Second" ) );
        assert!( text.contains( "   0 [Play ] First" ) );
        assert!( text.ends_with( "history: [1]" ) );
    }
}
