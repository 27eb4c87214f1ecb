//! Config file discovery
//!
//! An explicit `--config` must load. Otherwise the per-user config file is
//! used when present, and a broken one falls back to defaults with a warning.

use std::path::{ Path, PathBuf };

use anyhow::{ Context, Result };
use playdeck_core::Config;


/// Returns the path to the per-user config file.
fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map( |p| p.join( "playdeck" ).join( "config.json" ) )
}


/// Loads the config named on the command line, or the per-user one.
pub fn load( explicit: Option<&Path> ) -> Result<Config> {
    if let Some( path ) = explicit {
        return Config::load( path )
            .with_context( || format!( "Failed to load config {}", path.display() ) );
    }

    let path = match config_path() {
        Some( p ) => p,
        None => return Ok( Config::default() ),
    };

    if !path.exists() {
        return Ok( Config::default() );
    }

    match Config::load( &path ) {
        Ok( config ) => Ok( config ),
        Err( e ) => {
            tracing::warn!( "Ignoring config {:?}: {}", path, e );
            Ok( Config::default() )
        }
    }
}
