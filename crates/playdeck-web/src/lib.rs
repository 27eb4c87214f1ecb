//! Playdeck Web - browser binding for the playlist controller
//!
//! Binds the page's `<audio>` elements and transport controls to a
//! `PlaybackController`. Media events and progress clicks are always wired;
//! buttons are either wired here (`wire_buttons`) or call the exported
//! functions from inline `onclick` handlers.

mod dom;
mod logging;

use std::cell::RefCell;
use std::rc::Rc;

use playdeck_core::{ Config, ConfigError, PageConfig, PlaybackController, ProgressClick, Track };
use thiserror::Error;
use tracing::Level;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{ Document, Element, EventTarget, HtmlAudioElement, HtmlElement, MouseEvent, Node };

use dom::{ AudioHandle, DomSurface };


/// Errors that can occur while binding a page.
#[derive( Debug, Error )]
pub enum BindError {
    #[error( "No document available" )]
    NoDocument,

    #[error( "Invalid selector: {0}" )]
    Selector( String ),

    #[error( "Missing required element #{0}" )]
    MissingElement( String ),

    #[error( "Playdeck is already started" )]
    AlreadyStarted,

    #[error( transparent )]
    Config( #[from] ConfigError ),
}


impl From<BindError> for JsValue {
    fn from( e: BindError ) -> Self {
        JsValue::from_str( &e.to_string() )
    }
}


type WebController = PlaybackController<AudioHandle, DomSurface>;


/// A bound page: the controller plus what is needed to route events to it.
struct Page {
    controller: RefCell<WebController>,
    containers: Vec<Option<Element>>,
    progress_container: Option<HtmlElement>,
}


impl Page {
    /// Runs `f` against the controller unless it is already borrowed.
    fn with_controller( &self, f: impl FnOnce( &mut WebController ) ) {
        match self.controller.try_borrow_mut() {
            Ok( mut controller ) => f( &mut controller ),
            Err( _ ) => tracing::trace!( "Controller busy, dropping event" ),
        }
    }


    /// Index of the track whose song container holds `element`.
    fn track_of( &self, element: &Element ) -> Option<usize> {
        let node: &Node = element;
        self.containers.iter().position( |container| {
            container.as_ref().is_some_and( |c| c.contains( Some( node ) ) )
        })
    }
}


thread_local! {
    static PAGE: RefCell<Option<Rc<Page>>> = const { RefCell::new( None ) };
}


fn with_page( f: impl FnOnce( &Page ) ) {
    let page = PAGE.with( |slot| slot.borrow().clone() );
    match page {
        Some( page ) => f( &page ),
        None => tracing::warn!( "Playdeck is not started" ),
    }
}


fn element_by_id( document: &Document, id: &str ) -> Option<HtmlElement> {
    document.get_element_by_id( id )?.dyn_into::<HtmlElement>().ok()
}


fn optional_element( document: &Document, id: &str ) -> Option<HtmlElement> {
    let element = element_by_id( document, id );
    if element.is_none() {
        tracing::debug!( "No #{} on the page", id );
    }
    element
}


/// Adds an event listener that lives as long as the page.
fn listen( target: &EventTarget, event: &str, handler: impl FnMut( web_sys::Event ) + 'static ) {
    let closure = Closure::wrap( Box::new( handler ) as Box<dyn FnMut( web_sys::Event )> );
    if let Err( e ) = target.add_event_listener_with_callback( event, closure.as_ref().unchecked_ref() ) {
        tracing::warn!( "Failed to listen for {}: {:?}", event, e );
    }
    closure.forget();
}


/// Discovers the tracks and controls and builds the controller.
fn bind( document: &Document, config: Config ) -> Result<Page, BindError> {
    let page_config: &PageConfig = &config.page;

    let global_button = element_by_id( document, &page_config.global_button_id )
        .ok_or_else( || BindError::MissingElement( page_config.global_button_id.clone() ) )?;

    let nodes = document.query_selector_all( &page_config.media )
        .map_err( |_| BindError::Selector( page_config.media.clone() ) )?;

    let mut tracks = Vec::new();
    let mut containers = Vec::new();
    let mut track_buttons = Vec::new();

    for i in 0..nodes.length() {
        let Some( audio ) = nodes.item( i ).and_then( |node| node.dyn_into::<HtmlAudioElement>().ok() ) else {
            continue;
        };

        let container = audio.closest( &page_config.song_container ).ok().flatten();
        let find = |selector: &str| {
            container.as_ref().and_then( |c| c.query_selector( selector ).ok().flatten() )
        };

        let title = find( &page_config.title )
            .and_then( |el| el.text_content() )
            .map( |text| text.trim().to_string() )
            .unwrap_or_else( || config.labels.unknown_title.clone() );
        let button = find( &page_config.track_button )
            .and_then( |el| el.dyn_into::<HtmlElement>().ok() );

        if container.is_none() {
            tracing::warn!( "Track {} has no {} container", tracks.len(), page_config.song_container );
        }

        tracks.push( Track::new( AudioHandle::new( audio ), title ) );
        containers.push( container );
        track_buttons.push( button );
    }

    let surface = DomSurface {
        track_buttons,
        global_button: Some( global_button ),
        now_playing: optional_element( document, &page_config.now_playing_id ),
        loop_button: optional_element( document, &page_config.loop_button_id ),
        shuffle_button: optional_element( document, &page_config.shuffle_button_id ),
        progress_bar: optional_element( document, &page_config.progress_bar_id ),
    };

    let progress_container = optional_element( document, &page_config.progress_container_id );
    let controller = PlaybackController::new( tracks, surface, config.labels );
    tracing::info!( "Bound {} tracks", controller.len() );

    Ok( Page {
        controller: RefCell::new( controller ),
        containers,
        progress_container,
    })
}


/// Wires media events and the progress container.
fn wire_media( page: &Rc<Page> ) {
    let elements: Vec<HtmlAudioElement> = page.controller.borrow()
        .tracks()
        .iter()
        .map( |track| track.media.element().clone() )
        .collect();

    for ( index, audio ) in elements.iter().enumerate() {
        let on_time = Rc::clone( page );
        listen( audio, "timeupdate", move |_| {
            on_time.with_controller( |c| c.on_time_update( index ) );
        });

        let on_end = Rc::clone( page );
        listen( audio, "ended", move |_| {
            on_end.with_controller( |c| c.on_track_ended( index ) );
        });
    }

    if let Some( container ) = &page.progress_container {
        let on_click = Rc::clone( page );
        let target = container.clone();
        listen( container, "click", move |event| {
            let Some( mouse ) = event.dyn_ref::<MouseEvent>() else { return };
            let rect = target.get_bounding_client_rect();
            let click = ProgressClick {
                client_x: f64::from( mouse.client_x() ),
                rect_left: rect.left(),
                rect_width: rect.width(),
            };
            on_click.with_controller( |c| c.on_progress_click( click ) );
        });
    }
}


/// Wires per-track and transport buttons.
fn wire_buttons( page: &Rc<Page>, document: &Document, page_config: &PageConfig ) {
    let buttons: Vec<Option<HtmlElement>> = page.controller.borrow().surface().track_buttons.clone();
    for ( index, button ) in buttons.into_iter().enumerate() {
        let Some( button ) = button else { continue };
        let on_click = Rc::clone( page );
        listen( &button, "click", move |_| {
            on_click.with_controller( |c| c.toggle_track( index ) );
        });
    }

    let transport: [ ( &str, fn( &mut WebController ) ); 6 ] = [
        ( page_config.global_button_id.as_str(), WebController::toggle_global ),
        ( page_config.next_button_id.as_str(), WebController::next_track ),
        ( page_config.prev_button_id.as_str(), WebController::prev_track ),
        ( page_config.stop_button_id.as_str(), WebController::stop ),
        ( page_config.loop_button_id.as_str(), WebController::toggle_loop ),
        ( page_config.shuffle_button_id.as_str(), WebController::toggle_shuffle ),
    ];

    for ( id, action ) in transport {
        let Some( button ) = element_by_id( document, id ) else { continue };
        let on_click = Rc::clone( page );
        listen( &button, "click", move |_| {
            on_click.with_controller( action );
        });
    }
}


fn is_started() -> bool {
    PAGE.with( |slot| slot.borrow().is_some() )
}


/// Binds the page. Only the first call binds; later calls fail.
fn start_page( config: Config ) -> Result<(), BindError> {
    if is_started() {
        return Err( BindError::AlreadyStarted );
    }

    logging::init( Level::INFO );

    let document = web_sys::window()
        .and_then( |w| w.document() )
        .ok_or( BindError::NoDocument )?;

    let page_config = config.page.clone();
    let page = Rc::new( bind( &document, config )? );

    wire_media( &page );
    if page_config.wire_buttons {
        wire_buttons( &page, &document, &page_config );
    }

    PAGE.with( |slot| *slot.borrow_mut() = Some( page ) );
    Ok(())
}


/// Binds the page with the default labels and selectors.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    start_page( Config::default() ).map_err( JsValue::from )
}


/// Binds the page with a JSON config; omitted fields keep their defaults.
#[wasm_bindgen( js_name = startWithConfig )]
pub fn start_with_config( json: &str ) -> Result<(), JsValue> {
    let config = Config::from_json( json ).map_err( BindError::from )?;
    start_page( config ).map_err( JsValue::from )
}


/// Per-track button handler; `element` is the button or anything else
/// inside the track's song container.
#[wasm_bindgen( js_name = togglePlay )]
pub fn toggle_play( element: &Element ) {
    with_page( |page| match page.track_of( element ) {
        Some( index ) => page.with_controller( |c| c.toggle_track( index ) ),
        None => tracing::warn!( "togglePlay called outside any track" ),
    });
}


#[wasm_bindgen( js_name = toggleGlobalPlay )]
pub fn toggle_global_play() {
    with_page( |page| page.with_controller( WebController::toggle_global ) );
}


#[wasm_bindgen( js_name = nextTrack )]
pub fn next_track() {
    with_page( |page| page.with_controller( WebController::next_track ) );
}


#[wasm_bindgen( js_name = prevTrack )]
pub fn prev_track() {
    with_page( |page| page.with_controller( WebController::prev_track ) );
}


#[wasm_bindgen( js_name = stopPlayback )]
pub fn stop_playback() {
    with_page( |page| page.with_controller( WebController::stop ) );
}


#[wasm_bindgen( js_name = toggleLoop )]
pub fn toggle_loop() {
    with_page( |page| page.with_controller( WebController::toggle_loop ) );
}


#[wasm_bindgen( js_name = toggleShuffle )]
pub fn toggle_shuffle() {
    with_page( |page| page.with_controller( WebController::toggle_shuffle ) );
}


#[cfg( test )]
mod tests {
    use super::*;


    fn empty_page() -> Page {
        Page {
            controller: RefCell::new( PlaybackController::new( Vec::new(), DomSurface::default(), Config::default().labels ) ),
            containers: Vec::new(),
            progress_container: None,
        }
    }


    #[test]
    fn test_second_start_is_refused() {
        assert!( !is_started() );
        PAGE.with( |slot| *slot.borrow_mut() = Some( Rc::new( empty_page() ) ) );
        assert!( is_started() );

        let result = start_page( Config::default() );
        assert!( matches!( result, Err( BindError::AlreadyStarted ) ) );
        assert_eq!( BindError::AlreadyStarted.to_string(), "Playdeck is already started" );
    }
}
