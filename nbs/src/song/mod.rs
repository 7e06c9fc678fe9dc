//! Songs and everything they're made of

pub mod instrument;
pub mod layer;
pub mod note;

pub use instrument::{Instrument, InstrumentError, SongInstruments};
pub use layer::{Layer, SongLayers};
pub use note::{LayerNotes, Note};

use crate::serde::DecodeError;
use thiserror::Error;

/// Playback looping as configured in the editor
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoopOptions {
    /// Whether the song loops at all
    pub enabled: bool,

    /// The tick playback jumps back to
    pub start_tick: u16,

    /// How many times to loop, 0 means forever
    pub total_loops: u8,
}

/// Editor auto-save settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoSaveOptions {
    pub enabled: bool,

    /// Minutes between saves
    pub interval: u8,
}

impl Default for AutoSaveOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            interval: 10,
        }
    }
}

/// Editing statistics
///
/// These are never updated by this crate; they are carried from and to files as-is.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SongStats {
    pub minutes_spent: i32,
    pub left_clicks: i32,
    pub right_clicks: i32,
    pub blocks_added: i32,
    pub blocks_removed: i32,
}

/// A note block song
///
/// A [`Song`] owns its [`SongLayers`], which in turn hold the notes placed on a tick/layer grid,
/// and its [`SongInstruments`] palette. Create an empty one with [`Song::new()`], or decode one
/// from bytes with [`decode()`](crate::decode).
///
/// ```
/// # use nbs::{Song, decode, encode, DecodeOptions, EncodeOptions};
/// let mut song = Song::new();
/// song.name = "Circles".to_string();
///
/// let harp = song.layers_mut().create();
/// harp.name = "Harp".to_string();
///
/// song.create_note(0, 0, 0)?.key = 40;
/// song.create_note(0, 4, 0)?.key = 45;
/// assert_eq!(song.length(), 5);
///
/// let bytes = encode(&song, EncodeOptions::default())?;
/// let decoded = decode(&bytes, DecodeOptions::default())?;
/// assert_eq!(decoded.name, "Circles");
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Song<N = Note> {
    /// Format revision the song is encoded with, 0 - 5
    pub version: u8,

    pub name: String,
    pub author: String,
    pub original_author: String,
    pub description: String,

    /// Name of the MIDI or schematic file the song was imported from
    pub import_name: String,

    /// Playback speed in ticks per second
    pub tempo: f32,

    /// Beats per measure, 2 - 8
    pub time_signature: u8,

    pub loop_options: LoopOptions,
    pub auto_save: AutoSaveOptions,
    pub stats: SongStats,

    pub(crate) length: u16,
    pub(crate) layers: SongLayers<N>,
    pub(crate) instruments: SongInstruments,
    pub(crate) errors: Vec<DecodeError>,
}

impl Song {
    /// The format revision new songs are written with
    pub const LATEST_VERSION: u8 = crate::serde::MAX_VERSION;

    /// Construct an empty song with default settings and the built-in instruments
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N> Song<N> {
    /// Number of ticks in a beat
    const TICKS_PER_BEAT: u16 = 4;

    /// Length of the song in ticks
    ///
    /// This is the length stored in (or inferred from) the file, raised so the last note's tick
    /// always lies within it.
    pub fn length(&self) -> u16 {
        match self.layers.last_tick() {
            Some(tick) => self.length.max(tick.saturating_add(1)),
            None => self.length,
        }
    }

    /// The length as written to a file header
    ///
    /// Files count a note on the header's length as part of the song, so the stored length only
    /// needs to reach the last tick. Decoded files keep their header value this way.
    pub(crate) fn declared_length(&self) -> u16 {
        match self.layers.last_tick() {
            Some(tick) => self.length.max(tick),
            None => self.length,
        }
    }

    /// Set the length of the song in ticks
    ///
    /// [`Self::length()`] never reports less than needed to cover the last note.
    pub fn set_length(&mut self, length: u16) {
        self.length = length;
    }

    /// The highest tick that holds a note in any layer
    pub fn last_tick(&self) -> Option<u16> {
        self.layers.last_tick()
    }

    /// Milliseconds each tick lasts at the current tempo
    pub fn time_per_tick(&self) -> f32 {
        1000.0 / self.tempo
    }

    /// Total playing time in milliseconds
    pub fn duration(&self) -> f32 {
        f32::from(self.length()) * self.time_per_tick()
    }

    /// The tick at which the measure containing the song's end finishes
    pub fn last_measure(&self) -> u32 {
        let measure = u32::from(self.time_signature.max(1)) * u32::from(Self::TICKS_PER_BEAT);
        u32::from(self.length()).div_ceil(measure) * measure
    }

    /// Is any layer set to solo?
    pub fn has_solo(&self) -> bool {
        self.layers.has_solo()
    }

    /// The layers of the song, in order
    pub fn layers(&self) -> &SongLayers<N> {
        &self.layers
    }

    /// The layers of the song, mutably
    pub fn layers_mut(&mut self) -> &mut SongLayers<N> {
        &mut self.layers
    }

    /// The instrument palette of the song
    pub fn instruments(&self) -> &SongInstruments {
        &self.instruments
    }

    /// The instrument palette of the song, mutably
    pub fn instruments_mut(&mut self) -> &mut SongInstruments {
        &mut self.instruments
    }

    /// Structural errors encountered while decoding
    ///
    /// A decoded song with errors is a best-effort partial song: everything up to the first
    /// error has been read.
    pub fn errors(&self) -> &[DecodeError] {
        &self.errors
    }

    /// Place a note on a layer, growing the song to cover the tick
    ///
    /// If a note already occupied the tick, it is returned.
    pub fn add_note(
        &mut self,
        layer: usize,
        tick: u16,
        note: N,
    ) -> Result<Option<N>, NoteTargetError> {
        let target = self
            .layers
            .get_mut(layer)
            .ok_or(NoteTargetError { layer, tick })?;

        let previous = target.notes_mut().add(tick, note);
        self.cover(tick);

        Ok(previous)
    }

    /// Build a default note for an instrument on a layer, growing the song to cover the tick
    ///
    /// Returns the newly placed note so further fields can be set.
    pub fn create_note(
        &mut self,
        layer: usize,
        tick: u16,
        instrument: u8,
    ) -> Result<&mut N, NoteTargetError>
    where
        N: From<Note>,
    {
        if layer >= self.layers.len() {
            return Err(NoteTargetError { layer, tick });
        }

        self.cover(tick);
        Ok(self.layers[layer].notes_mut().create(tick, instrument))
    }

    fn cover(&mut self, tick: u16) {
        self.length = self.length.max(tick.saturating_add(1));
    }
}

impl<N> Default for Song<N> {
    fn default() -> Self {
        Self {
            version: Song::<Note>::LATEST_VERSION,
            name: String::new(),
            author: String::new(),
            original_author: String::new(),
            description: String::new(),
            import_name: String::new(),
            tempo: 10.0,
            time_signature: 4,
            loop_options: LoopOptions::default(),
            auto_save: AutoSaveOptions::default(),
            stats: SongStats::default(),
            length: 0,
            layers: SongLayers::new(),
            instruments: SongInstruments::new(),
            errors: Vec::new(),
        }
    }
}

/// A note was addressed to a layer the song doesn't have
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Layer {layer} does not exist, cannot place a note on tick {tick}")]
pub struct NoteTargetError {
    pub layer: usize,
    pub tick: u16,
}
