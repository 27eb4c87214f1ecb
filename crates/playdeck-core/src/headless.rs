//! In-memory page for running the controller without a browser.
//!
//! `SimulatedMedia` keeps a position and a paused flag and can be moved
//! forward in time; `MemorySurface` records whatever the controller last
//! wrote. Used by the CLI driver and by tests.

use rand::Rng;
use serde::Serialize;

use crate::controller::PlaybackController;
use crate::media::{ MediaElement, Surface };


/// A media element with a virtual clock.
#[derive( Debug, Clone, PartialEq, Serialize )]
pub struct SimulatedMedia {
    position: f64,
    duration: f64,
    paused: bool,
}


impl SimulatedMedia {
    /// Creates a paused element at position zero. Pass NaN for an unknown
    /// duration.
    pub fn new( duration: f64 ) -> Self {
        Self {
            position: 0.0,
            duration,
            paused: true,
        }
    }


    /// Moves the clock forward while playing.
    ///
    /// @returns the unused seconds if the element reached its end (it is
    /// then paused), None otherwise
    pub fn advance( &mut self, seconds: f64 ) -> Option<f64> {
        if self.paused {
            return None;
        }
        let duration = self.known_duration()?;

        let target = self.position + seconds;
        if target < duration {
            self.position = target;
            return None;
        }

        self.position = duration;
        self.paused = true;
        Some( target - duration )
    }


    pub fn is_ended( &self ) -> bool {
        self.known_duration().is_some_and( |duration| self.position >= duration )
    }
}


impl MediaElement for SimulatedMedia {
    fn play( &mut self ) {
        // Playing an ended element starts it over
        if self.is_ended() {
            self.position = 0.0;
        }
        self.paused = false;
    }


    fn pause( &mut self ) {
        self.paused = true;
    }


    fn is_paused( &self ) -> bool {
        self.paused
    }


    fn current_time( &self ) -> f64 {
        self.position
    }


    fn set_current_time( &mut self, seconds: f64 ) {
        self.position = match self.known_duration() {
            Some( duration ) => seconds.clamp( 0.0, duration ),
            None => seconds.max( 0.0 ),
        };
    }


    fn duration( &self ) -> f64 {
        self.duration
    }
}


/// Records the latest value of every display output.
#[derive( Debug, Clone, Default, PartialEq, Serialize )]
pub struct MemorySurface {
    pub track_buttons: Vec<String>,
    pub global_button: String,
    pub now_playing: String,
    pub loop_indicator: String,
    pub shuffle_indicator: String,
    pub progress: f64,
}


impl MemorySurface {
    /// Creates a surface with one button slot per track.
    pub fn new( track_count: usize ) -> Self {
        Self {
            track_buttons: vec![ String::new(); track_count ],
            ..Self::default()
        }
    }
}


impl Surface for MemorySurface {
    fn set_track_button( &mut self, index: usize, label: &str ) {
        if let Some( slot ) = self.track_buttons.get_mut( index ) {
            label.clone_into( slot );
        }
    }


    fn set_global_button( &mut self, label: &str ) {
        label.clone_into( &mut self.global_button );
    }


    fn set_now_playing( &mut self, title: &str ) {
        title.clone_into( &mut self.now_playing );
    }


    fn set_loop_indicator( &mut self, label: &str ) {
        label.clone_into( &mut self.loop_indicator );
    }


    fn set_shuffle_indicator( &mut self, label: &str ) {
        label.clone_into( &mut self.shuffle_indicator );
    }


    fn set_progress( &mut self, percent: f64 ) {
        self.progress = percent;
    }
}


impl<S: Surface, R: Rng> PlaybackController<SimulatedMedia, S, R> {
    /// Lets `seconds` of wall time pass.
    ///
    /// The playing track reports a time update; if it runs out, the ended
    /// event fires and any remaining time is spent on whatever plays next.
    /// Stops early once a track end no longer consumes any time.
    pub fn advance( &mut self, seconds: f64 ) {
        let mut remaining = seconds;

        while remaining > 0.0 {
            let Some( index ) = self.playing_index() else { break };
            let ended = self.tracks_mut()[ index ].media.advance( remaining );

            self.on_time_update( index );
            match ended {
                Some( left ) => {
                    tracing::debug!( "Track {} ended", index );
                    self.on_track_ended( index );
                    if left >= remaining {
                        tracing::debug!( "Track {} is too short to advance through", index );
                        break;
                    }
                    remaining = left;
                }
                None => break,
            }
        }
    }
}


#[cfg( test )]
mod tests {
    use super::*;
    use crate::config::Labels;
    use crate::media::Track;
    use rand::rngs::StdRng;
    use rand::SeedableRng;


    #[test]
    fn test_advance_paused_does_nothing() {
        let mut media = SimulatedMedia::new( 10.0 );
        assert_eq!( media.advance( 4.0 ), None );
        assert_eq!( media.current_time(), 0.0 );
    }


    #[test]
    fn test_advance_to_end() {
        let mut media = SimulatedMedia::new( 10.0 );
        media.play();
        assert_eq!( media.advance( 4.0 ), None );
        assert_eq!( media.advance( 7.5 ), Some( 1.5 ) );
        assert!( media.is_paused() );
        assert!( media.is_ended() );

        media.play();
        assert_eq!( media.current_time(), 0.0 );
    }


    #[test]
    fn test_unknown_duration_never_ends() {
        let mut media = SimulatedMedia::new( f64::NAN );
        media.play();
        assert_eq!( media.advance( 1000.0 ), None );
        assert_eq!( media.known_duration(), None );
    }


    #[test]
    fn test_advance_through_vanishing_track_returns() {
        let tracks = vec![ Track::new( SimulatedMedia::new( 1e-300 ), "Blip" ) ];
        let mut c = PlaybackController::with_rng(
            tracks,
            MemorySurface::new( 1 ),
            Labels::default(),
            StdRng::seed_from_u64( 3 ),
        );
        c.toggle_loop();
        c.play_track( 0 );

        c.advance( 5.0 );

        assert_eq!( c.playing_index(), Some( 0 ) );
        assert_eq!( c.history(), &[ 0 ] );
    }


    #[test]
    fn test_surface_ignores_missing_button() {
        let mut surface = MemorySurface::new( 1 );
        surface.set_track_button( 3, "Pause" );
        surface.set_track_button( 0, "Pause" );
        assert_eq!( surface.track_buttons, vec![ "Pause" ] );
    }
}
