//! Boundary traits between the controller and the host page.
//!
//! `MediaElement` is one playable resource (an `<audio>` element in the
//! browser), `Surface` is everything the controller writes back to the page.


/// A playable media resource.
///
/// Times are in seconds. `duration` returns NaN while unknown, matching the
/// browser media API.
pub trait MediaElement {
    fn play( &mut self );

    fn pause( &mut self );

    fn is_paused( &self ) -> bool;

    fn current_time( &self ) -> f64;

    fn set_current_time( &mut self, seconds: f64 );

    fn duration( &self ) -> f64;


    /// Pauses and moves back to the start.
    fn rewind( &mut self ) {
        self.pause();
        self.set_current_time( 0.0 );
    }


    /// Duration when it is usable for progress math.
    fn known_duration( &self ) -> Option<f64> {
        let duration = self.duration();
        ( duration.is_finite() && duration > 0.0 ).then_some( duration )
    }
}


/// Display outputs written by the controller.
///
/// Per-track buttons are addressed by track index; implementations skip
/// tracks that have no button.
pub trait Surface {
    fn set_track_button( &mut self, index: usize, label: &str );

    fn set_global_button( &mut self, label: &str );

    fn set_now_playing( &mut self, title: &str );

    fn set_loop_indicator( &mut self, label: &str );

    fn set_shuffle_indicator( &mut self, label: &str );

    /// Sets the shared progress bar width, in percent.
    fn set_progress( &mut self, percent: f64 );
}


/// A media handle bound to its display title.
#[derive( Debug, Clone )]
pub struct Track<M> {
    pub media: M,
    pub title: String,
}


impl<M> Track<M> {
    pub fn new( media: M, title: impl Into<String> ) -> Self {
        Self { media, title: title.into() }
    }
}


/// Position of a click on the progress container, in client pixels.
#[derive( Debug, Clone, Copy, PartialEq )]
pub struct ProgressClick {
    pub client_x: f64,
    pub rect_left: f64,
    pub rect_width: f64,
}


impl ProgressClick {
    /// Horizontal fraction of the click inside the container, clamped to [0, 1].
    ///
    /// None when the container has no usable width.
    pub fn fraction( &self ) -> Option<f64> {
        if !self.rect_width.is_finite() || self.rect_width <= 0.0 {
            return None;
        }

        let fraction = ( self.client_x - self.rect_left ) / self.rect_width;
        fraction.is_finite().then( || fraction.clamp( 0.0, 1.0 ) )
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_click_fraction() {
        let click = ProgressClick { client_x: 150.0, rect_left: 100.0, rect_width: 200.0 };
        assert_eq!( click.fraction(), Some( 0.25 ) );
    }


    #[test]
    fn test_click_fraction_clamped() {
        let left_of = ProgressClick { client_x: 90.0, rect_left: 100.0, rect_width: 200.0 };
        let right_of = ProgressClick { client_x: 400.0, rect_left: 100.0, rect_width: 200.0 };
        assert_eq!( left_of.fraction(), Some( 0.0 ) );
        assert_eq!( right_of.fraction(), Some( 1.0 ) );
    }


    #[test]
    fn test_click_fraction_zero_width() {
        let click = ProgressClick { client_x: 10.0, rect_left: 0.0, rect_width: 0.0 };
        assert_eq!( click.fraction(), None );
    }
}
