//! Transport command parsing.
//!
//! Commands are single lines of text, e.g. `next`, `track 2`, `seek 40%`.
//! The transport subset is run by `PlaybackController::execute`; the rest
//! is left to whatever drives the controller.

use std::time::Duration;

use thiserror::Error;


/// Errors that can occur during command parsing.
#[derive( Debug, Error )]
pub enum CommandError {
    #[error( "Unknown command: {0}" )]
    Unknown( String ),

    #[error( "Invalid argument: {0}" )]
    InvalidArgument( String ),

    #[error( "Missing argument: {0}" )]
    MissingArgument( String ),
}


/// Where a seek should land.
#[derive( Debug, Clone, Copy, PartialEq )]
pub enum SeekTarget {
    /// Fraction of the duration, 0.0 to 1.0.
    Fraction( f64 ),

    /// Absolute position.
    Position( Duration ),
}


/// Parsed command.
#[derive( Debug, Clone, PartialEq )]
pub enum Command {
    // Transport
    Toggle,
    Track { index: usize },
    Select { index: usize },
    Next,
    Prev,
    Stop,
    Loop,
    Shuffle,
    Seek { target: SeekTarget },

    // Driver
    Tick { seconds: f64 },
    Status,
    Help,
    Quit,
}


impl Command {
    /// Parses one command line.
    ///
    /// @param input - The command text, without a leading `/`
    ///
    /// @returns The parsed command or an error
    pub fn parse( input: &str ) -> Result<Self, CommandError> {
        let input = input.trim();
        let mut parts = input.splitn( 2, ' ' );
        let cmd = parts.next().unwrap_or( "" ).to_lowercase();
        let args = parts.next().map( |s| s.trim() );

        match cmd.as_str() {
            "play" | "pause" | "toggle" | "p" => Ok( Command::Toggle ),
            "track" | "t" => {
                let index = parse_index( args )?;
                Ok( Command::Track { index } )
            }
            "select" | "sel" => {
                let index = parse_index( args )?;
                Ok( Command::Select { index } )
            }
            "next" | "n" => Ok( Command::Next ),
            "prev" | "previous" | "pr" => Ok( Command::Prev ),
            "stop" | "st" => Ok( Command::Stop ),
            "loop" | "l" => Ok( Command::Loop ),
            "shuffle" | "sh" => Ok( Command::Shuffle ),
            "seek" | "sk" => {
                let arg = args
                    .ok_or_else( || CommandError::MissingArgument( "seek position".into() ) )?;
                let target = parse_seek( arg )?;
                Ok( Command::Seek { target } )
            }

            "tick" | "wait" => {
                let arg = args
                    .ok_or_else( || CommandError::MissingArgument( "seconds".into() ) )?;
                let seconds: f64 = arg.parse()
                    .ok()
                    .filter( |s: &f64| s.is_finite() && *s >= 0.0 )
                    .ok_or_else( || CommandError::InvalidArgument( format!( "Invalid seconds: {}", arg ) ) )?;
                Ok( Command::Tick { seconds } )
            }
            "status" | "s" => Ok( Command::Status ),
            "help" | "h" | "?" => Ok( Command::Help ),
            "quit" | "q" | "exit" => Ok( Command::Quit ),

            "" => Err( CommandError::Unknown( "empty command".into() ) ),
            other => Err( CommandError::Unknown( other.to_string() ) ),
        }
    }


    /// Returns a brief description of the command for help text.
    pub fn description( &self ) -> &'static str {
        match self {
            Command::Toggle => "Toggle global play/pause",
            Command::Track { .. } => "Toggle play/pause of one track",
            Command::Select { .. } => "Play a track from the start",
            Command::Next => "Next track",
            Command::Prev => "Previous track",
            Command::Stop => "Stop playback and clear history",
            Command::Loop => "Toggle loop",
            Command::Shuffle => "Toggle shuffle",
            Command::Seek { .. } => "Seek the active track",
            Command::Tick { .. } => "Let time pass",
            Command::Status => "Show the page",
            Command::Help => "Show help",
            Command::Quit => "Quit",
        }
    }
}


fn parse_index( args: Option<&str> ) -> Result<usize, CommandError> {
    let arg = args.ok_or_else( || CommandError::MissingArgument( "track index".into() ) )?;
    arg.parse()
        .map_err( |_| CommandError::InvalidArgument( format!( "Invalid track index: {}", arg ) ) )
}


/// Parses a seek target: "40%", "1:30", or plain seconds.
fn parse_seek( s: &str ) -> Result<SeekTarget, CommandError> {
    let s = s.trim();

    if let Some( percent ) = s.strip_suffix( '%' ) {
        let percent: f64 = percent.trim().parse()
            .map_err( |_| CommandError::InvalidArgument( format!( "Invalid percent: {}", s ) ) )?;
        if !( 0.0..=100.0 ).contains( &percent ) {
            return Err( CommandError::InvalidArgument( format!( "Percent out of range: {}", s ) ) );
        }
        return Ok( SeekTarget::Fraction( percent / 100.0 ) );
    }

    parse_time( s ).map( SeekTarget::Position )
}


/// Parses a time string like "1:30" or "90" into a Duration.
///
/// @param s - Time string in format "MM:SS", "M:SS", or just seconds
///
/// @returns Duration or error
fn parse_time( s: &str ) -> Result<Duration, CommandError> {
    let s = s.trim();

    if let Some(( min, sec )) = s.split_once( ':' ) {
        let minutes: u64 = min.parse()
            .map_err( |_| CommandError::InvalidArgument( format!( "Invalid minutes: {}", min ) ) )?;
        let seconds: u64 = sec.parse()
            .map_err( |_| CommandError::InvalidArgument( format!( "Invalid seconds: {}", sec ) ) )?;
        let total = minutes.checked_mul( 60 )
            .and_then( |m| m.checked_add( seconds ) )
            .ok_or_else( || CommandError::InvalidArgument( format!( "Time out of range: {}", s ) ) )?;
        Ok( Duration::from_secs( total ) )
    } else {
        let seconds: u64 = s.parse()
            .map_err( |_| CommandError::InvalidArgument( format!( "Invalid time: {}", s ) ) )?;
        Ok( Duration::from_secs( seconds ) )
    }
}


/// Returns help text listing all available commands.
pub fn help_text() -> &'static str {
    r#"Transport:
  play            Toggle global play/pause   [toggle, p]
  track <n>       Toggle play/pause of track n
  select <n>      Play track n from the start
  next            Next track                 [n]
  prev            Previous track             [pr]
  stop            Stop and clear history     [st]
  loop            Toggle loop                [l]
  shuffle         Toggle shuffle             [sh]
  seek <pos>      Seek (40%, 1:30, or 90)

Driver:
  tick <secs>     Let time pass              [wait]
  status          Show the page              [s]
  help            Show this help             [?]
  quit            Exit                       [q]"#
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_parse_toggle_aliases() {
        for input in [ "play", "pause", "toggle", "P" ] {
            assert_eq!( Command::parse( input ).unwrap(), Command::Toggle );
        }
    }


    #[test]
    fn test_parse_track() {
        let cmd = Command::parse( "track 2" ).unwrap();
        assert_eq!( cmd, Command::Track { index: 2 } );
    }


    #[test]
    fn test_parse_select() {
        let cmd = Command::parse( "  sel 0 " ).unwrap();
        assert_eq!( cmd, Command::Select { index: 0 } );
    }


    #[test]
    fn test_parse_track_bad_index() {
        let result = Command::parse( "track two" );
        assert!( matches!( result, Err( CommandError::InvalidArgument( _ ) ) ) );
    }


    #[test]
    fn test_parse_seek_percent() {
        let cmd = Command::parse( "seek 40%" ).unwrap();
        assert_eq!( cmd, Command::Seek { target: SeekTarget::Fraction( 0.4 ) } );
    }


    #[test]
    fn test_parse_seek_percent_out_of_range() {
        let result = Command::parse( "seek 140%" );
        assert!( matches!( result, Err( CommandError::InvalidArgument( _ ) ) ) );
    }


    #[test]
    fn test_parse_seek_time() {
        let cmd = Command::parse( "seek 1:30" ).unwrap();
        assert_eq!( cmd, Command::Seek { target: SeekTarget::Position( Duration::from_secs( 90 ) ) } );
    }


    #[test]
    fn test_parse_seek_time_out_of_range() {
        let result = Command::parse( "seek 307445734561825861:00" );
        assert!( matches!( result, Err( CommandError::InvalidArgument( _ ) ) ) );

        let result = Command::parse( "seek 307445734561825860:99999" );
        assert!( matches!( result, Err( CommandError::InvalidArgument( _ ) ) ) );
    }


    #[test]
    fn test_parse_seek_seconds() {
        let cmd = Command::parse( "sk 45" ).unwrap();
        assert_eq!( cmd, Command::Seek { target: SeekTarget::Position( Duration::from_secs( 45 ) ) } );
    }


    #[test]
    fn test_parse_tick() {
        let cmd = Command::parse( "tick 2.5" ).unwrap();
        assert_eq!( cmd, Command::Tick { seconds: 2.5 } );
    }


    #[test]
    fn test_parse_tick_negative() {
        let result = Command::parse( "tick -3" );
        assert!( matches!( result, Err( CommandError::InvalidArgument( _ ) ) ) );
    }


    #[test]
    fn test_parse_unknown() {
        let result = Command::parse( "foobar" );
        assert!( matches!( result, Err( CommandError::Unknown( _ ) ) ) );
    }


    #[test]
    fn test_parse_missing_arg() {
        let result = Command::parse( "seek" );
        assert!( matches!( result, Err( CommandError::MissingArgument( _ ) ) ) );
    }
}
