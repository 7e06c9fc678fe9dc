//! Notes and the sparse per-layer tick mapping they live in

use std::collections::{BTreeMap, btree_map};

/// A single note block event
///
/// A [`Note`] knows nothing about _when_ it is played. The tick is purely the key under which
/// it is stored in a layer's [`LayerNotes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Id of the instrument in the song's [`SongInstruments`](super::SongInstruments)
    pub instrument: u8,

    /// Piano key, 0 - 87 (A0 - C8)
    pub key: u8,

    /// Volume of the note, 0 - 100
    pub velocity: u8,

    /// Stereo position, roughly -100 (left) - 100 (right)
    pub panning: i16,

    /// Fine pitch offset in cents
    pub pitch: i16,
}

impl Note {
    /// The key a note is placed on when none is given (F#3)
    pub const DEFAULT_KEY: u8 = 45;

    /// The velocity a note is placed with when none is given
    pub const DEFAULT_VELOCITY: u8 = 100;

    /// Construct a note for an instrument, with default key, velocity, panning and pitch
    pub fn new(instrument: u8) -> Self {
        Self {
            instrument,
            key: Self::DEFAULT_KEY,
            velocity: Self::DEFAULT_VELOCITY,
            panning: 0,
            pitch: 0,
        }
    }

    /// Construct a note for an instrument on a specific key
    pub fn with_key(instrument: u8, key: u8) -> Self {
        Self {
            key,
            ..Self::new(instrument)
        }
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new(0)
    }
}

impl AsRef<Note> for Note {
    fn as_ref(&self) -> &Note {
        self
    }
}

/// The notes of a single layer, keyed by tick
///
/// Absence of a key means there is no note on that tick. A layer can hold at most one note per
/// tick, so adding a note on an occupied tick replaces the occupant.
///
/// The collection is generic over the stored note type, which lets users attach their own data
/// to notes. The codec only requires `N: From<Note>` for decoding and `N: AsRef<Note>` for
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerNotes<N = Note> {
    notes: BTreeMap<u16, N>,
}

impl<N> LayerNotes<N> {
    /// Construct an empty mapping
    pub fn new() -> Self {
        Self {
            notes: BTreeMap::new(),
        }
    }

    /// The number of ticks that hold a note
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Are there _any_ notes in the layer?
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Access the note on a tick
    pub fn get(&self, tick: u16) -> Option<&N> {
        self.notes.get(&tick)
    }

    /// Access the note on a tick mutably
    pub fn get_mut(&mut self, tick: u16) -> Option<&mut N> {
        self.notes.get_mut(&tick)
    }

    /// Does a note exist on this tick?
    pub fn contains(&self, tick: u16) -> bool {
        self.notes.contains_key(&tick)
    }

    /// Place a note on a tick
    ///
    /// If a note already occupied the tick, it is returned.
    pub fn add(&mut self, tick: u16, note: N) -> Option<N> {
        self.notes.insert(tick, note)
    }

    /// Build a note with default values for an instrument and place it on a tick
    ///
    /// Returns the newly placed note so further fields can be set.
    pub fn create(&mut self, tick: u16, instrument: u8) -> &mut N
    where
        N: From<Note>,
    {
        match self.notes.entry(tick) {
            btree_map::Entry::Occupied(mut entry) => {
                entry.insert(N::from(Note::new(instrument)));
                entry.into_mut()
            }
            btree_map::Entry::Vacant(entry) => entry.insert(N::from(Note::new(instrument))),
        }
    }

    /// Remove the note on a tick, returning it if there was one
    pub fn delete(&mut self, tick: u16) -> Option<N> {
        self.notes.remove(&tick)
    }

    /// The ticks that hold a note, in ascending order
    pub fn ticks(&self) -> impl Iterator<Item = u16> + '_ {
        self.notes.keys().copied()
    }

    /// The highest tick that holds a note
    pub fn last_tick(&self) -> Option<u16> {
        self.notes.keys().next_back().copied()
    }

    /// Iterate over `(tick, note)` pairs in ascending tick order
    pub fn iter(&self) -> btree_map::Iter<'_, u16, N> {
        self.notes.iter()
    }

    /// Iterate mutably over `(tick, note)` pairs in ascending tick order
    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, u16, N> {
        self.notes.iter_mut()
    }
}

impl<N> Default for LayerNotes<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, N> IntoIterator for &'a LayerNotes<N> {
    type Item = (&'a u16, &'a N);
    type IntoIter = btree_map::Iter<'a, u16, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
