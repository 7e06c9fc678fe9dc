//! Reading and writing of note block songs (`.nbs`), as made by Note Block Studio and Open Note
//! Block Studio.
//!
//! A [`Song`] is a grid of [`Note`]s, placed on ticks within ordered [`Layer`]s, along with
//! metadata, playback options and an [`Instrument`] palette. Use [`decode()`] to turn the bytes
//! of a file into a [`Song`], edit it, and [`encode()`] it back. Decoding and re-encoding a file
//! reproduces it byte for byte.
//!
//! ```no_run
//! # use nbs::{decode, encode, DecodeOptions, EncodeOptions};
//! let bytes = std::fs::read("song.nbs")?;
//! let mut song = decode(&bytes, DecodeOptions::default())?;
//!
//! song.layers_mut().create().name = "Bass".to_string();
//! std::fs::write("song.nbs", encode(&song, EncodeOptions::default())?)?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! This crate does no audio rendering or playback scheduling.

pub mod serde;
pub mod song;

pub use serde::{DecodeError, DecodeOptions, EncodeError, EncodeOptions, decode, decode_as, encode};
pub use song::{
    AutoSaveOptions, Instrument, InstrumentError, Layer, LayerNotes, LoopOptions, Note,
    NoteTargetError, Song, SongInstruments, SongLayers, SongStats,
};
