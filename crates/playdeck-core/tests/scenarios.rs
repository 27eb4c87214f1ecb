use playdeck_core::headless::{ MemorySurface, SimulatedMedia };
use playdeck_core::{ Labels, MediaElement, PlaybackController, Track };
use rand::rngs::StdRng;
use rand::SeedableRng;


type Controller = PlaybackController<SimulatedMedia, MemorySurface, StdRng>;


fn page( durations: &[ f64 ] ) -> Controller {
    let tracks = durations
        .iter()
        .enumerate()
        .map( |( i, &duration )| Track::new( SimulatedMedia::new( duration ), format!( "Track {}", i ) ) )
        .collect();
    PlaybackController::with_rng(
        tracks,
        MemorySurface::new( durations.len() ),
        Labels::default(),
        StdRng::seed_from_u64( 42 ),
    )
}


fn playing_count( c: &Controller ) -> usize {
    c.tracks().iter().filter( |track| !track.media.is_paused() ).count()
}


#[test]
fn next_prev_next_keeps_history_short() {
    let mut c = page( &[ 60.0, 60.0, 60.0 ] );

    c.toggle_global();
    assert_eq!( c.current_index(), Some( 0 ) );
    assert_eq!( c.history(), &[ 0 ] );

    c.next_track();
    assert_eq!( c.current_index(), Some( 1 ) );
    assert_eq!( c.history(), &[ 0, 1 ] );

    c.prev_track();
    assert_eq!( c.current_index(), Some( 0 ) );
    assert_eq!( c.history(), &[ 0 ] );

    c.next_track();
    assert_eq!( c.current_index(), Some( 1 ) );
    assert_eq!( c.history(), &[ 0, 1 ] );
}


#[test]
fn album_plays_through_and_stops() {
    let mut c = page( &[ 10.0, 20.0, 30.0 ] );
    c.toggle_global();

    c.advance( 15.0 );
    assert_eq!( c.current_index(), Some( 1 ) );
    assert_eq!( c.surface().now_playing, "Track 1" );
    assert_eq!( c.surface().progress, 25.0 );

    c.advance( 100.0 );
    assert_eq!( c.current_index(), None );
    assert_eq!( c.history(), &[ 0, 1, 2 ] );
    assert_eq!( c.surface().global_button, "▶ Play" );
    assert_eq!( c.surface().now_playing, "" );
    assert_eq!( playing_count( &c ), 0 );

    // History survives the natural end
    c.prev_track();
    assert_eq!( c.current_index(), Some( 1 ) );
}


#[test]
fn loop_wraps_after_last_track_ends() {
    let mut c = page( &[ 10.0, 10.0 ] );
    c.toggle_loop();
    c.play_track( 1 );

    c.advance( 12.0 );
    assert_eq!( c.current_index(), Some( 0 ) );
    assert_eq!( c.tracks()[ 0 ].media.current_time(), 2.0 );
    assert_eq!( c.surface().progress, 20.0 );
}


#[test]
fn paused_track_does_not_advance() {
    let mut c = page( &[ 10.0, 10.0 ] );
    c.toggle_global();
    c.advance( 4.0 );
    c.toggle_global();
    c.advance( 50.0 );

    assert_eq!( c.current_index(), Some( 0 ) );
    assert_eq!( c.tracks()[ 0 ].media.current_time(), 4.0 );
    assert_eq!( c.surface().track_buttons, vec![ "Play", "Play" ] );
}


#[test]
fn stop_after_play_clears_everything() {
    let mut c = page( &[ 10.0, 10.0, 10.0 ] );
    c.toggle_shuffle();
    c.toggle_global();
    c.next_track();
    c.advance( 3.0 );

    c.stop();
    assert_eq!( c.current_index(), None );
    assert!( c.history().is_empty() );
    assert_eq!( playing_count( &c ), 0 );
    assert!( c.shuffle_enabled() );
}


proptest::proptest! {
    #[test]
    fn display_and_history_invariants_hold(
        ops in proptest::collection::vec(( 0u8..11, 0usize..6 ), 1..150 )
    ) {
        let mut c = page( &[ 10.0, 25.0, 5.0, 40.0 ] );

        for ( op, arg ) in ops {
            match op {
                0 => c.play_track( arg ),
                1 => c.toggle_track( arg ),
                2 => c.toggle_global(),
                3 => c.next_track(),
                4 => c.prev_track(),
                5 => c.stop(),
                6 => c.toggle_loop(),
                7 => c.toggle_shuffle(),
                8 => c.advance( arg as f64 * 7.0 ),
                9 => c.seek_fraction( arg as f64 / 5.0 ),
                _ => c.on_track_ended( arg ),
            }

            let history = c.history();
            proptest::prop_assert!( history.windows( 2 ).all( |pair| pair[ 0 ] != pair[ 1 ] ) );
            proptest::prop_assert!( history.iter().all( |&i| i < c.len() ) );

            proptest::prop_assert!( playing_count( &c ) <= 1 );
            if c.current_index().is_none() {
                proptest::prop_assert_eq!( playing_count( &c ), 0 );
            }

            let pause_labels = c.surface().track_buttons.iter().filter( |label| *label == "Pause" ).count();
            proptest::prop_assert_eq!( pause_labels, playing_count( &c ) );

            let global = if playing_count( &c ) == 1 { "⏸ Pause" } else { "▶ Play" };
            proptest::prop_assert_eq!( c.surface().global_button.as_str(), global );
        }
    }


    #[test]
    fn prev_walks_back_through_selections(
        picks in proptest::collection::vec( 0usize..5, 2..20 ),
        steps in 1usize..20,
    ) {
        let mut c = page( &[ 30.0; 5 ] );
        for &pick in &picks {
            c.play_track( pick );
        }

        let recorded = c.history().to_vec();
        let k = steps.min( recorded.len() - 1 );
        for _ in 0..k {
            c.prev_track();
        }

        proptest::prop_assert_eq!( c.current_index(), Some( recorded[ recorded.len() - 1 - k ] ) );
        proptest::prop_assert_eq!( c.history(), &recorded[ ..recorded.len() - k ] );
    }
}
