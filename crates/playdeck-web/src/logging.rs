//! Browser console output for `tracing`.
//!
//! Each formatted event is buffered and handed to the console method that
//! matches its level when the writer is dropped.

use std::io;

use tracing::{ Level, Metadata };
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;


/// Buffers one event.
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}


impl io::Write for ConsoleWriter {
    fn write( &mut self, buf: &[ u8 ] ) -> io::Result<usize> {
        self.buffer.extend_from_slice( buf );
        Ok( buf.len() )
    }


    fn flush( &mut self ) -> io::Result<()> {
        Ok(())
    }
}


impl Drop for ConsoleWriter {
    fn drop( &mut self ) {
        if self.buffer.is_empty() {
            return;
        }

        let text = String::from_utf8_lossy( &self.buffer );
        let message = JsValue::from_str( text.trim_end() );
        match self.level {
            Level::ERROR => console::error_1( &message ),
            Level::WARN => console::warn_1( &message ),
            Level::INFO => console::info_1( &message ),
            _ => console::debug_1( &message ),
        }
    }
}


/// `MakeWriter` that routes by event level.
#[derive( Debug, Clone, Copy, Default )]
pub struct MakeConsoleWriter;


impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;


    fn make_writer( &'a self ) -> Self::Writer {
        ConsoleWriter { level: Level::INFO, buffer: Vec::new() }
    }


    fn make_writer_for( &'a self, meta: &Metadata<'_> ) -> Self::Writer {
        ConsoleWriter { level: *meta.level(), buffer: Vec::new() }
    }
}


/// Installs the console subscriber. Later calls are no-ops.
pub fn init( level: Level ) {
    let result = tracing_subscriber::fmt()
        .with_writer( MakeConsoleWriter )
        .with_max_level( level )
        .with_ansi( false )
        .with_target( false )
        .without_time()
        .try_init();

    if result.is_err() {
        tracing::debug!( "Console logging already installed" );
    }
}
