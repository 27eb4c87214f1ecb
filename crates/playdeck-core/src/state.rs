//! Playback state and selection history
//!
//! Holds the cursor, the loop/shuffle flags, and the stack of previously
//! selected tracks that backs "previous track" navigation.

use serde::Serialize;


/// Stack of previously selected track indices.
///
/// Two adjacent entries are never equal. Entries are only removed by
/// [`History::step_back`] or [`History::clear`].
#[derive( Debug, Clone, Default, PartialEq, Eq, Serialize )]
#[serde( transparent )]
pub struct History {
    entries: Vec<usize>,
}


impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }


    /// Records a selection unless it repeats the most recent entry.
    ///
    /// @returns true if the entry was appended
    pub fn record( &mut self, index: usize ) -> bool {
        if self.entries.last() == Some( &index ) {
            return false;
        }

        self.entries.push( index );
        true
    }


    /// Drops the most recent entry and returns the one before it.
    ///
    /// Returns None (and leaves the stack untouched) when fewer than two
    /// entries are recorded.
    pub fn step_back( &mut self ) -> Option<usize> {
        if self.entries.len() < 2 {
            return None;
        }

        self.entries.pop();
        self.entries.last().copied()
    }


    /// Removes every entry.
    pub fn clear( &mut self ) {
        self.entries.clear();
    }


    pub fn len( &self ) -> usize {
        self.entries.len()
    }


    pub fn is_empty( &self ) -> bool {
        self.entries.is_empty()
    }


    pub fn as_slice( &self ) -> &[usize] {
        &self.entries
    }
}


/// Mutable transport state owned by the controller.
#[derive( Debug, Clone, Default, PartialEq, Eq, Serialize )]
pub struct PlaybackState {
    /// Index of the selected track, None when stopped.
    pub cursor: Option<usize>,
    pub loop_enabled: bool,
    pub shuffle_enabled: bool,
    pub history: History,
}


impl PlaybackState {
    /// Creates the startup state: stopped, both flags off, no history.
    pub fn new() -> Self {
        Self::default()
    }


    /// Returns true if `index` is the selected track.
    pub fn is_current( &self, index: usize ) -> bool {
        self.cursor == Some( index )
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_record_skips_adjacent_duplicate() {
        let mut history = History::new();
        assert!( history.record( 2 ) );
        assert!( !history.record( 2 ) );
        assert!( history.record( 0 ) );
        assert!( history.record( 2 ) );
        assert_eq!( history.as_slice(), &[ 2, 0, 2 ] );
    }


    #[test]
    fn test_step_back_needs_two_entries() {
        let mut history = History::new();
        assert_eq!( history.step_back(), None );

        history.record( 4 );
        assert_eq!( history.step_back(), None );
        assert_eq!( history.as_slice(), &[ 4 ] );

        history.record( 1 );
        assert_eq!( history.step_back(), Some( 4 ) );
        assert_eq!( history.as_slice(), &[ 4 ] );
    }


    #[test]
    fn test_is_current() {
        let mut state = PlaybackState::new();
        assert!( !state.is_current( 0 ) );

        state.cursor = Some( 3 );
        assert!( state.is_current( 3 ) );
        assert!( !state.is_current( 0 ) );
    }
}
