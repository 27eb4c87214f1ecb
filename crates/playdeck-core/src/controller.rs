//! Playback controller
//!
//! Owns the track list, the playback state, and the page surface. Every
//! user action and media event is funneled through one of its methods;
//! invalid input is ignored rather than reported.

use rand::rngs::StdRng;
use rand::{ Rng, SeedableRng };

use crate::command::{ Command, SeekTarget };
use crate::config::Labels;
use crate::media::{ MediaElement, ProgressClick, Surface, Track };
use crate::state::PlaybackState;


/// Transport controller for a fixed list of tracks.
#[derive( Debug )]
pub struct PlaybackController<M, S, R = StdRng> {
    tracks: Vec<Track<M>>,
    surface: S,
    labels: Labels,
    state: PlaybackState,
    rng: R,
}


impl<M: MediaElement, S: Surface> PlaybackController<M, S, StdRng> {
    /// Creates a controller with an entropy-seeded shuffle source.
    pub fn new( tracks: Vec<Track<M>>, surface: S, labels: Labels ) -> Self {
        Self::with_rng( tracks, surface, labels, StdRng::from_entropy() )
    }
}


impl<M: MediaElement, S: Surface, R: Rng> PlaybackController<M, S, R> {
    /// Creates a controller using `rng` for shuffle picks.
    ///
    /// The surface is brought in line with the stopped state immediately.
    pub fn with_rng( tracks: Vec<Track<M>>, surface: S, labels: Labels, rng: R ) -> Self {
        let mut controller = Self {
            tracks,
            surface,
            labels,
            state: PlaybackState::new(),
            rng,
        };

        controller.refresh_display();
        controller.refresh_indicators();
        tracing::debug!( "Controller bound to {} tracks", controller.tracks.len() );
        controller
    }


    /// Starts the track at `index` from the beginning, stopping all others.
    pub fn play_track( &mut self, index: usize ) {
        if index >= self.tracks.len() {
            tracing::debug!( "Ignoring play of track {} (have {})", index, self.tracks.len() );
            return;
        }

        self.start( index );
        self.state.history.record( index );
    }


    /// Play/pause button of a single track.
    pub fn toggle_track( &mut self, index: usize ) {
        if index >= self.tracks.len() {
            tracing::debug!( "Ignoring toggle of track {}", index );
            return;
        }

        if self.state.is_current( index ) {
            self.flip( index );
        } else {
            self.play_track( index );
        }
    }


    /// Global play/pause button.
    pub fn toggle_global( &mut self ) {
        match self.state.cursor {
            Some( index ) => self.flip( index ),
            None if self.state.shuffle_enabled => {
                if let Some( index ) = self.random_index( None ) {
                    self.play_track( index );
                }
            }
            None => self.play_track( 0 ),
        }
    }


    /// Moves to the next track, honoring shuffle and loop.
    pub fn next_track( &mut self ) {
        if self.state.shuffle_enabled {
            if let Some( index ) = self.random_index( self.state.cursor ) {
                self.play_track( index );
            }
            return;
        }

        let next = self.state.cursor.map_or( 0, |current| current + 1 );
        if next < self.tracks.len() {
            self.play_track( next );
        } else if self.state.loop_enabled {
            self.play_track( 0 );
        } else {
            tracing::debug!( "Already at the last track" );
        }
    }


    /// Goes back through history, or to the preceding track when there is
    /// nothing to go back to.
    pub fn prev_track( &mut self ) {
        if let Some( index ) = self.state.history.step_back() {
            self.start( index );
            return;
        }

        match self.state.cursor {
            Some( current ) if current > 0 => self.play_track( current - 1 ),
            _ if self.state.loop_enabled && !self.tracks.is_empty() => {
                self.play_track( self.tracks.len() - 1 );
            }
            _ => tracing::debug!( "No previous track" ),
        }
    }


    /// Stops playback and forgets the history. Loop and shuffle are kept.
    pub fn stop( &mut self ) {
        if let Some( index ) = self.state.cursor {
            self.tracks[ index ].media.rewind();
        }

        self.state.cursor = None;
        self.state.history.clear();
        self.refresh_display();
        self.surface.set_progress( 0.0 );
    }


    pub fn toggle_loop( &mut self ) {
        self.state.loop_enabled = !self.state.loop_enabled;
        self.surface.set_loop_indicator( self.labels.loop_indicator( self.state.loop_enabled ) );
    }


    pub fn toggle_shuffle( &mut self ) {
        self.state.shuffle_enabled = !self.state.shuffle_enabled;
        self.surface.set_shuffle_indicator( self.labels.shuffle_indicator( self.state.shuffle_enabled ) );
    }


    /// Called when the track at `index` finished playing on its own.
    ///
    /// Advances like [`Self::next_track`] relative to the ended track. When
    /// there is nowhere to go the display returns to stopped, but history is
    /// kept so "previous" still works. Events from any track other than the
    /// selected one are ignored.
    pub fn on_track_ended( &mut self, index: usize ) {
        if !self.state.is_current( index ) {
            tracing::debug!( "Ignoring end of inactive track {}", index );
            return;
        }

        if self.state.shuffle_enabled {
            if let Some( next ) = self.random_index( Some( index ) ) {
                self.play_track( next );
            }
        } else if index + 1 < self.tracks.len() {
            self.play_track( index + 1 );
        } else if self.state.loop_enabled {
            self.play_track( 0 );
        } else {
            tracing::debug!( "Reached the end of the list" );
            self.tracks[ index ].media.pause();
            self.state.cursor = None;
            self.refresh_display();
        }
    }


    /// Called whenever a track reports a new playback position.
    pub fn on_time_update( &mut self, index: usize ) {
        if self.state.is_current( index ) {
            self.sync_progress();
        }
    }


    /// Seeks the active track to where the progress container was clicked.
    pub fn on_progress_click( &mut self, click: ProgressClick ) {
        if self.state.cursor.is_none() {
            return;
        }

        if let Some( fraction ) = click.fraction() {
            self.seek_fraction( fraction );
        }
    }


    /// Seeks the active track to `fraction` (0.0 to 1.0) of its duration.
    pub fn seek_fraction( &mut self, fraction: f64 ) {
        let Some( index ) = self.state.cursor else { return };
        let media = &mut self.tracks[ index ].media;

        match media.known_duration() {
            Some( duration ) => {
                media.set_current_time( fraction.clamp( 0.0, 1.0 ) * duration );
                self.sync_progress();
            }
            None => tracing::debug!( "Cannot seek track {} with unknown duration", index ),
        }
    }


    /// Seeks the active track to an absolute position in seconds.
    pub fn seek_to( &mut self, seconds: f64 ) {
        let Some( index ) = self.state.cursor else { return };
        let media = &mut self.tracks[ index ].media;

        if let Some( duration ) = media.known_duration() {
            media.set_current_time( seconds.clamp( 0.0, duration ) );
            self.sync_progress();
        }
    }


    /// Runs a transport command.
    ///
    /// @returns false for commands the controller does not handle itself
    pub fn execute( &mut self, command: &Command ) -> bool {
        match command {
            Command::Toggle => self.toggle_global(),
            Command::Track { index } => self.toggle_track( *index ),
            Command::Select { index } => self.play_track( *index ),
            Command::Next => self.next_track(),
            Command::Prev => self.prev_track(),
            Command::Stop => self.stop(),
            Command::Loop => self.toggle_loop(),
            Command::Shuffle => self.toggle_shuffle(),
            Command::Seek { target: SeekTarget::Fraction( fraction ) } => self.seek_fraction( *fraction ),
            Command::Seek { target: SeekTarget::Position( position ) } => self.seek_to( position.as_secs_f64() ),
            Command::Tick { .. } | Command::Status | Command::Help | Command::Quit => return false,
        }
        true
    }


    /// Rewrites track buttons, the global button, and the now-playing label
    /// from the current state and each track's paused flag.
    pub fn refresh_display( &mut self ) {
        let playing = self.playing_index();

        for index in 0..self.tracks.len() {
            self.surface.set_track_button( index, self.labels.track_button( playing == Some( index ) ) );
        }
        self.surface.set_global_button( self.labels.global_button( playing.is_some() ) );

        let title = self.state.cursor
            .and_then( |index| self.tracks.get( index ) )
            .map( |track| track.title.as_str() )
            .unwrap_or( "" );
        self.surface.set_now_playing( title );
    }


    pub fn state( &self ) -> &PlaybackState {
        &self.state
    }


    pub fn current_index( &self ) -> Option<usize> {
        self.state.cursor
    }


    pub fn history( &self ) -> &[usize] {
        self.state.history.as_slice()
    }


    pub fn loop_enabled( &self ) -> bool {
        self.state.loop_enabled
    }


    pub fn shuffle_enabled( &self ) -> bool {
        self.state.shuffle_enabled
    }


    /// Index of the selected track if it is actually playing.
    pub fn playing_index( &self ) -> Option<usize> {
        self.state.cursor
            .filter( |&index| self.tracks.get( index ).is_some_and( |track| !track.media.is_paused() ) )
    }


    pub fn tracks( &self ) -> &[Track<M>] {
        &self.tracks
    }


    pub fn len( &self ) -> usize {
        self.tracks.len()
    }


    pub fn is_empty( &self ) -> bool {
        self.tracks.is_empty()
    }


    pub fn surface( &self ) -> &S {
        &self.surface
    }


    pub fn surface_mut( &mut self ) -> &mut S {
        &mut self.surface
    }


    pub( crate ) fn tracks_mut( &mut self ) -> &mut [Track<M>] {
        &mut self.tracks
    }


    fn start( &mut self, index: usize ) {
        for track in &mut self.tracks {
            track.media.rewind();
        }

        self.state.cursor = Some( index );
        self.tracks[ index ].media.play();
        tracing::debug!( "Playing track {}: {}", index, self.tracks[ index ].title );

        self.refresh_display();
        self.sync_progress();
    }


    fn flip( &mut self, index: usize ) {
        let media = &mut self.tracks[ index ].media;
        if media.is_paused() {
            media.play();
        } else {
            media.pause();
        }
        self.refresh_display();
    }


    fn refresh_indicators( &mut self ) {
        self.surface.set_loop_indicator( self.labels.loop_indicator( self.state.loop_enabled ) );
        self.surface.set_shuffle_indicator( self.labels.shuffle_indicator( self.state.shuffle_enabled ) );
    }


    fn sync_progress( &mut self ) {
        let Some( index ) = self.state.cursor else { return };
        let media = &self.tracks[ index ].media;

        if let Some( duration ) = media.known_duration() {
            let percent = media.current_time() / duration * 100.0;
            tracing::trace!( "Track {} at {:.1}%", index, percent );
            self.surface.set_progress( percent );
        }
    }


    /// Uniform pick over all tracks, avoiding `exclude` unless it is the
    /// only track.
    fn random_index( &mut self, exclude: Option<usize> ) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }

        match exclude {
            Some( skip ) if len > 1 && skip < len => {
                let pick = self.rng.gen_range( 0..len - 1 );
                Some( if pick >= skip { pick + 1 } else { pick } )
            }
            _ => Some( self.rng.gen_range( 0..len ) ),
        }
    }
}


#[cfg( test )]
mod tests {
    use super::*;
    use crate::headless::{ MemorySurface, SimulatedMedia };


    type TestController = PlaybackController<SimulatedMedia, MemorySurface, StdRng>;


    fn controller( count: usize ) -> TestController {
        let tracks = ( 0..count )
            .map( |i| Track::new( SimulatedMedia::new( 120.0 ), format!( "Song {}", i ) ) )
            .collect();
        PlaybackController::with_rng(
            tracks,
            MemorySurface::new( count ),
            Labels::default(),
            StdRng::seed_from_u64( 7 ),
        )
    }


    fn playing_buttons( c: &TestController ) -> usize {
        c.surface().track_buttons.iter().filter( |label| *label == "Pause" ).count()
    }


    #[test]
    fn test_initial_display() {
        let c = controller( 2 );
        let surface = c.surface();
        assert_eq!( surface.track_buttons, vec![ "Play", "Play" ] );
        assert_eq!( surface.global_button, "▶ Play" );
        assert_eq!( surface.now_playing, "" );
        assert_eq!( surface.loop_indicator, "🔁 Loop: Off" );
        assert_eq!( surface.shuffle_indicator, "🔀 Shuffle: Off" );
        assert_eq!( c.current_index(), None );
    }


    #[test]
    fn test_play_track_single_playing() {
        let mut c = controller( 3 );
        c.play_track( 0 );
        c.play_track( 2 );

        assert_eq!( c.current_index(), Some( 2 ) );
        assert_eq!( c.surface().track_buttons, vec![ "Play", "Play", "Pause" ] );
        assert_eq!( c.surface().global_button, "⏸ Pause" );
        assert_eq!( c.surface().now_playing, "Song 2" );
        assert!( c.tracks()[ 0 ].media.is_paused() );
        assert!( !c.tracks()[ 2 ].media.is_paused() );
        assert_eq!( c.history(), &[ 0, 2 ] );
    }


    #[test]
    fn test_play_track_rewinds_others() {
        let mut c = controller( 2 );
        c.play_track( 0 );
        c.seek_fraction( 0.5 );
        c.play_track( 1 );
        assert_eq!( c.tracks()[ 0 ].media.current_time(), 0.0 );
    }


    #[test]
    fn test_play_track_out_of_range_ignored() {
        let mut c = controller( 2 );
        c.play_track( 5 );
        assert_eq!( c.current_index(), None );
        assert!( c.history().is_empty() );
        assert_eq!( playing_buttons( &c ), 0 );
    }


    #[test]
    fn test_replay_same_track_not_recorded_twice() {
        let mut c = controller( 2 );
        c.play_track( 1 );
        c.play_track( 1 );
        assert_eq!( c.history(), &[ 1 ] );
    }


    #[test]
    fn test_toggle_track_pauses_and_resumes() {
        let mut c = controller( 2 );
        c.toggle_track( 1 );
        assert_eq!( c.playing_index(), Some( 1 ) );

        c.toggle_track( 1 );
        assert_eq!( c.current_index(), Some( 1 ) );
        assert_eq!( c.playing_index(), None );
        assert_eq!( c.surface().track_buttons[ 1 ], "Play" );
        assert_eq!( c.surface().global_button, "▶ Play" );
        assert_eq!( c.surface().now_playing, "Song 1" );

        c.toggle_track( 1 );
        assert_eq!( c.surface().track_buttons[ 1 ], "Pause" );
        assert_eq!( c.surface().global_button, "⏸ Pause" );
        assert_eq!( c.history(), &[ 1 ] );
    }


    #[test]
    fn test_toggle_track_out_of_range_ignored() {
        let mut c = controller( 2 );
        c.play_track( 0 );
        let state = c.state().clone();
        let surface = c.surface().clone();

        c.toggle_track( 9 );

        assert_eq!( c.state(), &state );
        assert_eq!( c.surface(), &surface );
        assert_eq!( c.playing_index(), Some( 0 ) );
    }


    #[test]
    fn test_toggle_other_track_switches() {
        let mut c = controller( 2 );
        c.toggle_track( 0 );
        c.toggle_track( 1 );
        assert_eq!( c.playing_index(), Some( 1 ) );
        assert_eq!( c.history(), &[ 0, 1 ] );
    }


    #[test]
    fn test_toggle_global_starts_at_zero() {
        let mut c = controller( 3 );
        c.toggle_global();
        assert_eq!( c.current_index(), Some( 0 ) );

        c.toggle_global();
        assert_eq!( c.playing_index(), None );
        assert_eq!( c.surface().track_buttons[ 0 ], "Play" );
    }


    #[test]
    fn test_toggle_global_with_shuffle_picks_valid_index() {
        let mut c = controller( 4 );
        c.toggle_shuffle();
        c.toggle_global();
        let index = c.current_index().unwrap();
        assert!( index < 4 );
        assert_eq!( c.history(), &[ index ] );
    }


    #[test]
    fn test_toggle_global_empty_list() {
        let mut c = controller( 0 );
        c.toggle_global();
        c.toggle_shuffle();
        c.toggle_global();
        c.next_track();
        c.prev_track();
        assert_eq!( c.current_index(), None );
    }


    #[test]
    fn test_next_at_end_without_loop_is_noop() {
        let mut c = controller( 2 );
        c.play_track( 1 );
        let before = c.state().clone();
        c.next_track();
        assert_eq!( c.state(), &before );
        assert_eq!( c.playing_index(), Some( 1 ) );
    }


    #[test]
    fn test_next_at_end_with_loop_wraps() {
        let mut c = controller( 2 );
        c.toggle_loop();
        c.play_track( 1 );
        c.next_track();
        assert_eq!( c.current_index(), Some( 0 ) );
        assert_eq!( c.history(), &[ 1, 0 ] );
    }


    #[test]
    fn test_next_from_stopped_plays_first() {
        let mut c = controller( 2 );
        c.next_track();
        assert_eq!( c.current_index(), Some( 0 ) );
    }


    #[test]
    fn test_shuffle_next_never_repeats() {
        let mut c = controller( 5 );
        c.toggle_shuffle();
        c.play_track( 2 );
        for _ in 0..50 {
            let before = c.current_index();
            c.next_track();
            assert_ne!( c.current_index(), before );
        }
    }


    #[test]
    fn test_shuffle_single_track_repeats() {
        let mut c = controller( 1 );
        c.toggle_shuffle();
        c.play_track( 0 );
        c.next_track();
        assert_eq!( c.current_index(), Some( 0 ) );
        assert_eq!( c.history(), &[ 0 ] );
    }


    #[test]
    fn test_prev_pops_history() {
        let mut c = controller( 4 );
        c.play_track( 3 );
        c.play_track( 1 );
        c.play_track( 2 );

        c.prev_track();
        assert_eq!( c.current_index(), Some( 1 ) );
        assert_eq!( c.history(), &[ 3, 1 ] );
        assert_eq!( c.surface().now_playing, "Song 1" );

        c.prev_track();
        assert_eq!( c.current_index(), Some( 3 ) );
        assert_eq!( c.history(), &[ 3 ] );
    }


    #[test]
    fn test_prev_fallback_decrements_and_records() {
        let mut c = controller( 3 );
        c.play_track( 2 );
        c.prev_track();
        assert_eq!( c.current_index(), Some( 1 ) );
        assert_eq!( c.history(), &[ 2, 1 ] );
    }


    #[test]
    fn test_prev_fallback_at_start() {
        let mut c = controller( 3 );
        c.play_track( 0 );
        c.prev_track();
        assert_eq!( c.current_index(), Some( 0 ) );

        c.toggle_loop();
        c.prev_track();
        assert_eq!( c.current_index(), Some( 2 ) );
    }


    #[test]
    fn test_prev_from_stopped_with_loop_plays_last() {
        let mut c = controller( 3 );
        c.toggle_loop();
        c.prev_track();
        assert_eq!( c.current_index(), Some( 2 ) );
    }


    #[test]
    fn test_stop_resets_everything_but_flags() {
        let mut c = controller( 3 );
        c.toggle_loop();
        c.play_track( 0 );
        c.play_track( 1 );
        c.seek_fraction( 0.5 );
        c.stop();

        assert_eq!( c.current_index(), None );
        assert!( c.history().is_empty() );
        assert!( c.loop_enabled() );
        assert_eq!( c.tracks()[ 1 ].media.current_time(), 0.0 );
        assert!( c.tracks()[ 1 ].media.is_paused() );
        assert_eq!( c.surface().track_buttons, vec![ "Play", "Play", "Play" ] );
        assert_eq!( c.surface().global_button, "▶ Play" );
        assert_eq!( c.surface().now_playing, "" );
        assert_eq!( c.surface().progress, 0.0 );
    }


    #[test]
    fn test_stop_when_stopped() {
        let mut c = controller( 2 );
        c.stop();
        assert_eq!( c.current_index(), None );
    }


    #[test]
    fn test_indicator_toggles_round_trip() {
        let mut c = controller( 1 );
        c.toggle_loop();
        assert_eq!( c.surface().loop_indicator, "🔁 Loop: On" );
        c.toggle_loop();
        assert_eq!( c.surface().loop_indicator, "🔁 Loop: Off" );

        c.toggle_shuffle();
        assert_eq!( c.surface().shuffle_indicator, "🔀 Shuffle: On" );
        c.toggle_shuffle();
        assert_eq!( c.surface().shuffle_indicator, "🔀 Shuffle: Off" );
        assert_eq!( c.current_index(), None );
    }


    #[test]
    fn test_ended_advances() {
        let mut c = controller( 2 );
        c.play_track( 0 );
        c.on_track_ended( 0 );
        assert_eq!( c.current_index(), Some( 1 ) );
    }


    #[test]
    fn test_ended_last_without_loop_keeps_history() {
        let mut c = controller( 2 );
        c.play_track( 0 );
        c.play_track( 1 );
        c.on_track_ended( 1 );

        assert_eq!( c.current_index(), None );
        assert_eq!( c.history(), &[ 0, 1 ] );
        assert_eq!( c.surface().global_button, "▶ Play" );
        assert_eq!( c.surface().now_playing, "" );
    }


    #[test]
    fn test_ended_last_with_loop_wraps() {
        let mut c = controller( 2 );
        c.toggle_loop();
        c.play_track( 1 );
        c.on_track_ended( 1 );
        assert_eq!( c.current_index(), Some( 0 ) );
    }


    #[test]
    fn test_ended_with_shuffle_avoids_ended_track() {
        let mut c = controller( 3 );
        c.toggle_shuffle();
        for _ in 0..20 {
            c.play_track( 1 );
            c.on_track_ended( 1 );
            assert_ne!( c.current_index(), Some( 1 ) );
        }
    }


    #[test]
    fn test_time_update_only_for_active_track() {
        let mut c = controller( 2 );
        c.play_track( 0 );
        c.tracks_mut()[ 0 ].media.set_current_time( 30.0 );
        c.tracks_mut()[ 1 ].media.set_current_time( 90.0 );

        c.on_time_update( 1 );
        assert_eq!( c.surface().progress, 0.0 );

        c.on_time_update( 0 );
        assert_eq!( c.surface().progress, 25.0 );
    }


    #[test]
    fn test_time_update_unknown_duration_skipped() {
        let tracks = vec![ Track::new( SimulatedMedia::new( f64::NAN ), "Stream" ) ];
        let mut c = PlaybackController::with_rng(
            tracks,
            MemorySurface::new( 1 ),
            Labels::default(),
            StdRng::seed_from_u64( 1 ),
        );
        c.play_track( 0 );
        c.surface_mut().progress = 12.0;
        c.on_time_update( 0 );
        c.seek_fraction( 0.5 );
        assert_eq!( c.surface().progress, 12.0 );
        assert_eq!( c.tracks()[ 0 ].media.current_time(), 0.0 );
    }


    #[test]
    fn test_progress_click_seeks() {
        let mut c = controller( 1 );
        c.play_track( 0 );
        c.on_progress_click( ProgressClick { client_x: 60.0, rect_left: 10.0, rect_width: 200.0 } );
        assert_eq!( c.tracks()[ 0 ].media.current_time(), 30.0 );
        assert_eq!( c.surface().progress, 25.0 );
    }


    #[test]
    fn test_progress_click_unknown_duration() {
        let tracks = vec![ Track::new( SimulatedMedia::new( f64::NAN ), "Stream" ) ];
        let mut c = PlaybackController::with_rng(
            tracks,
            MemorySurface::new( 1 ),
            Labels::default(),
            StdRng::seed_from_u64( 1 ),
        );
        c.play_track( 0 );
        c.surface_mut().progress = 12.0;

        c.on_progress_click( ProgressClick { client_x: 60.0, rect_left: 10.0, rect_width: 200.0 } );

        assert_eq!( c.tracks()[ 0 ].media.current_time(), 0.0 );
        assert_eq!( c.surface().progress, 12.0 );
        assert_eq!( c.playing_index(), Some( 0 ) );
    }


    #[test]
    fn test_progress_click_when_stopped() {
        let mut c = controller( 1 );
        c.on_progress_click( ProgressClick { client_x: 60.0, rect_left: 10.0, rect_width: 200.0 } );
        assert_eq!( c.tracks()[ 0 ].media.current_time(), 0.0 );
    }


    #[test]
    fn test_execute_dispatch() {
        let mut c = controller( 3 );
        assert!( c.execute( &Command::Select { index: 2 } ) );
        assert!( c.execute( &Command::Prev ) );
        assert_eq!( c.current_index(), Some( 1 ) );
        assert!( c.execute( &Command::Seek { target: SeekTarget::Fraction( 0.5 ) } ) );
        assert_eq!( c.tracks()[ 1 ].media.current_time(), 60.0 );
        assert!( !c.execute( &Command::Status ) );
        assert!( !c.execute( &Command::Tick { seconds: 1.0 } ) );
    }
}
