//! Command-line argument parsing for Playdeck.

use std::path::PathBuf;

use clap::{ ArgAction, Parser };


/// Default length of a track given without a duration, in seconds.
const DEFAULT_DURATION: f64 = 180.0;

/// Shortest track the simulated clock accepts, in seconds.
const MIN_DURATION: f64 = 0.001;


/// Playdeck - drive the playlist controller against a simulated page.
#[derive( Parser, Debug )]
#[command( name = "playdeck" )]
#[command( version, about, long_about = None )]
pub struct Args {
    /// Track on the page as "Title=seconds" (seconds optional). Repeatable.
    #[arg( short, long = "track", value_name = "TITLE[=SECS]", value_parser = parse_track_spec )]
    pub tracks: Vec<TrackSpec>,

    /// Config file with labels and selectors (JSON).
    #[arg( short, long )]
    pub config: Option<PathBuf>,

    /// Read commands from a file instead of stdin.
    #[arg( short, long )]
    pub script: Option<PathBuf>,

    /// Seed for shuffle picks.
    #[arg( long )]
    pub seed: Option<u64>,

    /// Print the page as JSON after each command.
    #[arg( long )]
    pub json: bool,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg( short, long, action = ArgAction::Count )]
    pub verbose: u8,
}


/// A track given on the command line.
#[derive( Debug, Clone, PartialEq )]
pub struct TrackSpec {
    pub title: String,
    pub duration: f64,
}


fn parse_track_spec( s: &str ) -> Result<TrackSpec, String> {
    let ( title, duration ) = match s.rsplit_once( '=' ) {
        Some(( title, secs )) => {
            let duration: f64 = secs.trim().parse()
                .map_err( |_| format!( "invalid duration '{}'", secs ) )?;
            if !( duration.is_finite() && duration > 0.0 ) {
                return Err( format!( "duration must be positive, got {}", secs ) );
            }
            if duration < MIN_DURATION {
                return Err( format!( "duration must be at least {} seconds, got {}", MIN_DURATION, secs ) );
            }
            ( title, duration )
        }
        None => ( s, DEFAULT_DURATION ),
    };

    let title = title.trim();
    if title.is_empty() {
        return Err( "track title is empty".into() );
    }

    Ok( TrackSpec { title: title.to_string(), duration } )
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_track_spec_with_duration() {
        let spec = parse_track_spec( "Intro = 42.5" ).unwrap();
        assert_eq!( spec, TrackSpec { title: "Intro".into(), duration: 42.5 } );
    }


    #[test]
    fn test_track_spec_default_duration() {
        let spec = parse_track_spec( "Outro" ).unwrap();
        assert_eq!( spec.duration, DEFAULT_DURATION );
    }


    #[test]
    fn test_track_spec_rejects_bad_duration() {
        assert!( parse_track_spec( "Song=abc" ).is_err() );
        assert!( parse_track_spec( "Song=0" ).is_err() );
        assert!( parse_track_spec( "Song=1e-300" ).is_err() );
        assert!( parse_track_spec( "Song=0.0005" ).is_err() );
        assert!( parse_track_spec( "Song=0.001" ).is_ok() );
        assert!( parse_track_spec( "=10" ).is_err() );
    }


    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([ "playdeck", "-t", "A=10", "--track", "B", "--seed", "3", "-vv" ]).unwrap();
        assert_eq!( args.tracks.len(), 2 );
        assert_eq!( args.seed, Some( 3 ) );
        assert_eq!( args.verbose, 2 );
        assert!( !args.json );
    }
}
