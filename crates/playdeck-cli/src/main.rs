//! Playdeck CLI - headless driver for the playlist controller

mod cli;
mod settings;
mod view;

use std::fs::File;
use std::io::{ self, BufRead, BufReader };

use anyhow::{ Context, Result };
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::Level;

use cli::Args;
use playdeck_core::{
    command,
    headless::{ MemorySurface, SimulatedMedia },
    Command, PlaybackController, Track,
};
use view::PageView;


type Deck = PlaybackController<SimulatedMedia, MemorySurface, StdRng>;


/// Installs the stderr log subscriber.
fn init_logging( verbosity: u8 ) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level( level )
        .with_writer( io::stderr )
        .with_target( false )
        .init();
}


/// Builds the simulated page from the command line.
fn build_deck( args: &Args, config: playdeck_core::Config ) -> Deck {
    let tracks: Vec<_> = args.tracks
        .iter()
        .map( |spec| Track::new( SimulatedMedia::new( spec.duration ), spec.title.clone() ) )
        .collect();

    if tracks.is_empty() {
        tracing::warn!( "No tracks given; every transport command will be ignored" );
    }

    let rng = match args.seed {
        Some( seed ) => StdRng::seed_from_u64( seed ),
        None => StdRng::from_entropy(),
    };

    let surface = MemorySurface::new( tracks.len() );
    PlaybackController::with_rng( tracks, surface, config.labels, rng )
}


/// Prints the page in the requested format.
fn print_page( deck: &Deck, json: bool ) -> Result<()> {
    let page = PageView::new( deck.surface(), deck.state(), deck.tracks() );

    if json {
        println!( "{}", serde_json::to_string( &page ).context( "Failed to serialize page" )? );
    } else {
        println!( "{}\n", page.to_text() );
    }
    Ok(())
}


/// Runs one command.
///
/// @returns false when the driver should exit
fn run_command( deck: &mut Deck, cmd: &Command, json: bool ) -> Result<bool> {
    match cmd {
        Command::Quit => return Ok( false ),
        Command::Help => {
            println!( "{}", command::help_text() );
            return Ok( true );
        }
        Command::Status => {}
        Command::Tick { seconds } => deck.advance( *seconds ),
        transport => {
            deck.execute( transport );
        }
    }

    print_page( deck, json )?;
    Ok( true )
}


fn main() -> Result<()> {
    let args = Args::parse();
    init_logging( args.verbose );

    let config = settings::load( args.config.as_deref() )?;
    let mut deck = build_deck( &args, config );

    let input: Box<dyn BufRead> = match &args.script {
        Some( path ) => {
            let file = File::open( path )
                .with_context( || format!( "Failed to open script {}", path.display() ) )?;
            Box::new( BufReader::new( file ) )
        }
        None => Box::new( io::stdin().lock() ),
    };

    print_page( &deck, args.json )?;

    for ( line_no, line ) in input.lines().enumerate() {
        let line = line.context( "Failed to read command" )?;
        let trimmed = line.trim();

        // Skip blank lines and comments
        if trimmed.is_empty() || trimmed.starts_with( '#' ) {
            continue;
        }

        let cmd = match Command::parse( trimmed.trim_start_matches( '/' ) ) {
            Ok( cmd ) => cmd,
            Err( e ) => {
                tracing::warn!( "line {}: {}", line_no + 1, e );
                continue;
            }
        };

        tracing::info!( "{}: {}", cmd.description(), trimmed );
        if !run_command( &mut deck, &cmd, args.json )? {
            break;
        }
    }

    Ok(())
}
