//! DOM implementations of the controller's boundary traits.

use playdeck_core::{ MediaElement, Surface };
use wasm_bindgen_futures::JsFuture;
use web_sys::{ HtmlAudioElement, HtmlElement };


/// An `<audio>` element on the page.
#[derive( Debug, Clone )]
pub struct AudioHandle {
    element: HtmlAudioElement,
}


impl AudioHandle {
    pub fn new( element: HtmlAudioElement ) -> Self {
        Self { element }
    }


    pub fn element( &self ) -> &HtmlAudioElement {
        &self.element
    }
}


impl MediaElement for AudioHandle {
    fn play( &mut self ) {
        // Rejected when autoplay is blocked or the source fails to load
        match self.element.play() {
            Ok( promise ) => {
                let src = self.element.current_src();
                wasm_bindgen_futures::spawn_local( async move {
                    if let Err( e ) = JsFuture::from( promise ).await {
                        tracing::warn!( "play() rejected for {}: {:?}", src, e );
                    }
                });
            }
            Err( e ) => tracing::warn!( "play() failed: {:?}", e ),
        }
    }


    fn pause( &mut self ) {
        if let Err( e ) = self.element.pause() {
            tracing::warn!( "pause() failed: {:?}", e );
        }
    }


    fn is_paused( &self ) -> bool {
        self.element.paused()
    }


    fn current_time( &self ) -> f64 {
        self.element.current_time()
    }


    fn set_current_time( &mut self, seconds: f64 ) {
        self.element.set_current_time( seconds );
    }


    fn duration( &self ) -> f64 {
        self.element.duration()
    }
}


/// Page elements the controller writes to. Missing ones are skipped.
#[derive( Debug, Default )]
pub struct DomSurface {
    pub track_buttons: Vec<Option<HtmlElement>>,
    pub global_button: Option<HtmlElement>,
    pub now_playing: Option<HtmlElement>,
    pub loop_button: Option<HtmlElement>,
    pub shuffle_button: Option<HtmlElement>,
    pub progress_bar: Option<HtmlElement>,
}


fn set_text( element: Option<&HtmlElement>, text: &str ) {
    if let Some( element ) = element {
        element.set_text_content( Some( text ) );
    }
}


impl Surface for DomSurface {
    fn set_track_button( &mut self, index: usize, label: &str ) {
        set_text( self.track_buttons.get( index ).and_then( Option::as_ref ), label );
    }


    fn set_global_button( &mut self, label: &str ) {
        set_text( self.global_button.as_ref(), label );
    }


    fn set_now_playing( &mut self, title: &str ) {
        set_text( self.now_playing.as_ref(), title );
    }


    fn set_loop_indicator( &mut self, label: &str ) {
        set_text( self.loop_button.as_ref(), label );
    }


    fn set_shuffle_indicator( &mut self, label: &str ) {
        set_text( self.shuffle_button.as_ref(), label );
    }


    fn set_progress( &mut self, percent: f64 ) {
        if let Some( bar ) = &self.progress_bar {
            if let Err( e ) = bar.style().set_property( "width", &format!( "{}%", percent ) ) {
                tracing::warn!( "Failed to set progress width: {:?}", e );
            }
        }
    }
}
