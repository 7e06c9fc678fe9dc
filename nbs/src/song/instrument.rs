//! Instruments and the id-indexed palette of a song

use log::warn;
use std::slice;
use thiserror::Error;

/// Name and sound file of every built-in instrument, in id order
const BUILT_IN: [(&str, &str); SongInstruments::BUILT_IN_COUNT] = [
    ("Harp", "harp.ogg"),
    ("Double Bass", "dbass.ogg"),
    ("Bass Drum", "bdrum.ogg"),
    ("Snare Drum", "sdrum.ogg"),
    ("Click", "click.ogg"),
    ("Guitar", "guitar.ogg"),
    ("Flute", "flute.ogg"),
    ("Bell", "bell.ogg"),
    ("Chime", "icechime.ogg"),
    ("Xylophone", "xylobone.ogg"),
    ("Iron Xylophone", "iron_xylophone.ogg"),
    ("Cow Bell", "cow_bell.ogg"),
    ("Didgeridoo", "didgeridoo.ogg"),
    ("Bit", "bit.ogg"),
    ("Banjo", "banjo.ogg"),
    ("Pling", "pling.ogg"),
];

/// A sound that notes can be played with
///
/// The sound file is an opaque reference. This crate never performs any I/O with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    id: usize,

    /// Display name, may be empty
    pub name: String,

    /// Path to the sound file, relative to the editor's sound folder
    pub sound_file: String,

    /// The key the sound file is pitched at, 0 - 87
    pub key: u8,

    /// Whether the editor's virtual piano visually presses a key when this instrument plays
    pub press_key: bool,

    built_in: bool,
}

impl Instrument {
    /// The key an instrument's sound is assumed to be pitched at when none is given (F#3)
    pub const DEFAULT_KEY: u8 = 45;

    /// Construct a custom instrument
    ///
    /// The id is assigned once the instrument is placed in a [`SongInstruments`].
    pub fn new(name: impl Into<String>, sound_file: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            sound_file: sound_file.into(),
            key: Self::DEFAULT_KEY,
            press_key: false,
            built_in: false,
        }
    }

    /// The fixed set of default instruments every song starts with
    pub fn built_in() -> Vec<Self> {
        BUILT_IN
            .iter()
            .enumerate()
            .map(|(id, (name, sound_file))| Self {
                id,
                built_in: true,
                ..Self::new(*name, *sound_file)
            })
            .collect()
    }

    /// Position of the instrument in its song's palette
    pub fn id(&self) -> usize {
        self.id
    }

    /// Is this one of the default instruments? Those can never be modified or deleted.
    pub fn is_built_in(&self) -> bool {
        self.built_in
    }
}

/// The instrument palette of a song
///
/// Instrument ids are consecutive, starting at 0. The built-in instruments occupy
/// `0..first_custom_index()` and can be neither modified nor deleted. Custom instruments
/// follow them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongInstruments {
    instruments: Vec<Instrument>,
    first_custom_index: usize,
    declared_first_custom_index: Option<u8>,
}

impl SongInstruments {
    /// The number of built-in instruments in the current format revision
    pub const BUILT_IN_COUNT: usize = 16;

    /// Construct a palette containing only the built-in instruments
    pub fn new() -> Self {
        Self::with_built_in_count(Self::BUILT_IN_COUNT)
    }

    /// Construct a palette containing the first `count` built-in instruments
    ///
    /// Older files were made with fewer built-ins, which shifts the custom instrument ids.
    /// Counts beyond [`Self::BUILT_IN_COUNT`] are clamped.
    pub fn with_built_in_count(count: usize) -> Self {
        let mut instruments = Instrument::built_in();
        instruments.truncate(count);

        Self {
            first_custom_index: instruments.len(),
            instruments,
            declared_first_custom_index: None,
        }
    }

    /// Remember a first custom index read from a file that doesn't match the built-ins
    pub(crate) fn set_declared_first_custom_index(&mut self, index: u8) {
        self.declared_first_custom_index = Some(index);
    }

    /// The first custom index to write back, if the file declared an unusual one
    pub(crate) fn declared_first_custom_index(&self) -> Option<u8> {
        self.declared_first_custom_index
    }

    /// The total number of instruments, built-in and custom
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Are there _any_ instruments?
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// The id at which built-in instruments end and custom instruments begin
    pub fn first_custom_index(&self) -> usize {
        self.first_custom_index
    }

    /// Access an instrument by id
    pub fn get(&self, id: usize) -> Option<&Instrument> {
        self.instruments.get(id)
    }

    /// Access a custom instrument by id mutably
    ///
    /// Built-in instruments are immutable, so asking for one returns [`None`].
    pub fn get_mut(&mut self, id: usize) -> Option<&mut Instrument> {
        match self.instruments.get_mut(id) {
            Some(instrument) if instrument.built_in => {
                warn!("Built-in instrument {id} cannot be modified");
                None
            }
            instrument => instrument,
        }
    }

    /// Place an instrument at an id
    ///
    /// An existing custom instrument at the id is replaced and returned. The id may be at most
    /// [`Self::len()`], because setting it any further would leave a gap in the palette.
    pub fn set(
        &mut self,
        id: usize,
        mut instrument: Instrument,
    ) -> Result<Option<Instrument>, InstrumentError> {
        let total = self.instruments.len();
        if id > total {
            return Err(InstrumentError::OutOfOrder { id, total });
        }

        if id < self.first_custom_index {
            warn!("Built-in instrument {id} cannot be modified");
            return Err(InstrumentError::BuiltIn { id });
        }

        instrument.id = id;
        instrument.built_in = false;

        if id == total {
            self.instruments.push(instrument);
            Ok(None)
        } else {
            Ok(Some(std::mem::replace(&mut self.instruments[id], instrument)))
        }
    }

    /// Append an instrument at the next free id and return it
    pub fn add(&mut self, mut instrument: Instrument) -> &mut Instrument {
        instrument.id = self.instruments.len();
        instrument.built_in = false;
        self.instruments.push(instrument);

        let last = self.instruments.len() - 1;
        &mut self.instruments[last]
    }

    /// Build a new custom instrument, append it at the next free id and return it
    pub fn create(
        &mut self,
        name: impl Into<String>,
        sound_file: impl Into<String>,
    ) -> &mut Instrument {
        self.add(Instrument::new(name, sound_file))
    }

    /// Remove a custom instrument
    ///
    /// Later instruments move down one id to keep the palette contiguous. Notes are not
    /// touched, so any note referencing a shifted id now plays a different instrument.
    ///
    /// Built-in instruments cannot be deleted: the request is logged and ignored.
    pub fn delete(&mut self, id: usize) -> Option<Instrument> {
        if id < self.first_custom_index {
            warn!("Built-in instrument {id} cannot be deleted");
            return None;
        }

        if id >= self.instruments.len() {
            return None;
        }

        let removed = self.instruments.remove(id);
        for (index, instrument) in self.instruments.iter_mut().enumerate().skip(id) {
            instrument.id = index;
        }

        Some(removed)
    }

    /// Iterate over every instrument in id order
    pub fn iter(&self) -> slice::Iter<'_, Instrument> {
        self.instruments.iter()
    }

    /// Iterate over the custom instruments in id order
    pub fn custom(&self) -> slice::Iter<'_, Instrument> {
        self.instruments[self.first_custom_index..].iter()
    }
}

impl Default for SongInstruments {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a SongInstruments {
    type Item = &'a Instrument;
    type IntoIter = slice::Iter<'a, Instrument>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Errors that might be returned from [`SongInstruments::set()`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstrumentError {
    /// Placing the instrument would leave a gap in the palette
    #[error("Instrument {id} cannot be set out of order, the palette holds {total} instruments")]
    OutOfOrder { id: usize, total: usize },

    /// Built-in instruments are immutable
    #[error("Built-in instrument {id} cannot be modified")]
    BuiltIn { id: usize },
}
