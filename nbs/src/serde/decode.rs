use super::{
    END_OF_JUMPS, EXPLICIT_LENGTH_VERSION, LAYER_LOCK_VERSION, LAYER_LOCKED, LAYER_SOLO,
    LAYER_STEREO_VERSION, LOOP_VERSION, MAX_VERSION, NOTE_DETAILS_VERSION, PANNING_OFFSET,
    VERSIONED_MARKER,
    reader::{ReadError, Reader},
};
use crate::song::{Instrument, Note, Song, SongInstruments};
use log::{debug, trace, warn};
use thiserror::Error;

/// Options for [`decode()`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Drop the layers after the last layer that holds a note
    ///
    /// Open Note Block Studio saves a number of blank layers past the last populated one.
    pub ignore_empty_layers: bool,
}

/// A note read from the note stream, waiting for its layer to exist
struct RawNote {
    tick: u16,
    layer: u16,
    note: Note,
}

/// Decode a [`Song`] from the bytes of an `.nbs` file
///
/// Only a version newer than [`MAX_VERSION`] fails outright. Any other malformed input stops
/// parsing at the offending field: the error is stored in [`Song::errors()`] and the partially
/// read song is returned, with every note read so far placed in its layer.
pub fn decode(bytes: &[u8], options: DecodeOptions) -> Result<Song, DecodeError> {
    decode_as(bytes, options)
}

/// Decode a [`Song`] whose layers store a custom note type
///
/// Every decoded [`Note`] is converted with `N::from`.
pub fn decode_as<N>(bytes: &[u8], options: DecodeOptions) -> Result<Song<N>, DecodeError>
where
    N: From<Note>,
{
    let mut reader = Reader::new(bytes);
    let mut song = Song::default();
    let mut notes = Vec::new();

    match read_song(&mut reader, &mut song, &mut notes) {
        Ok(()) => (),
        Err(error @ DecodeError::UnsupportedVersion { .. }) => return Err(error),
        Err(error) => {
            warn!("Decoding stopped early: {error}");
            song.errors.push(error);
        }
    }

    debug!(
        "Decoded version {} song with {} layer(s), {} note(s) and {} custom instrument(s)",
        song.version,
        song.layers.len(),
        notes.len(),
        song.instruments.custom().count()
    );

    let highest_tick = notes.iter().map(|raw| raw.tick).max();
    place_notes(&mut song, notes);

    // Versions without an explicit length get it from the note stream
    if (1..EXPLICIT_LENGTH_VERSION).contains(&song.version) {
        song.length = highest_tick.unwrap_or(0);
    }

    if options.ignore_empty_layers {
        song.layers.remove_trailing_empty();
    }

    Ok(song)
}

fn read_song<N>(
    reader: &mut Reader,
    song: &mut Song<N>,
    notes: &mut Vec<RawNote>,
) -> Result<(), DecodeError> {
    read_version_header(reader, song)?;

    let layer_count = reader.read_u16()?;
    read_header(reader, song)?;

    if song.version >= LOOP_VERSION {
        song.loop_options.enabled = reader.read_u8()? != 0;
        song.loop_options.total_loops = reader.read_u8()?;
        song.loop_options.start_tick = reader.read_u16()?;
    }

    read_notes(reader, song.version, notes)?;
    trace!("Read {} note(s), at byte {}", notes.len(), reader.position());

    // Files that end after the note stream carry no layer metadata
    if reader.remaining() > 0 {
        for _ in 0..layer_count {
            read_layer(reader, song)?;
        }
    }

    // ...and files from before custom instruments end after the layers
    if reader.remaining() > 0 {
        read_instruments(reader, song)?;
    }

    Ok(())
}

fn read_version_header<N>(reader: &mut Reader, song: &mut Song<N>) -> Result<(), DecodeError> {
    let mut length = reader.read_u16()?;

    if length == VERSIONED_MARKER {
        let version = reader.read_u8()?;
        if version > MAX_VERSION {
            return Err(DecodeError::UnsupportedVersion { version });
        }

        song.version = version;

        let first_custom_index = reader.read_u8()?;
        if usize::from(first_custom_index) <= SongInstruments::BUILT_IN_COUNT {
            song.instruments = SongInstruments::with_built_in_count(first_custom_index.into());
        } else {
            debug!("Keeping 16 built-in instruments for first custom index {first_custom_index}");
            song.instruments.set_declared_first_custom_index(first_custom_index);
        }

        if version >= EXPLICIT_LENGTH_VERSION {
            length = reader.read_u16()?;
        }
    } else {
        song.version = 0;
    }

    song.length = length;
    trace!("Read version header: version {}, length {length}", song.version);

    Ok(())
}

fn read_header<N>(reader: &mut Reader, song: &mut Song<N>) -> Result<(), DecodeError> {
    song.name = reader.read_string()?;
    song.author = reader.read_string()?;
    song.original_author = reader.read_string()?;
    song.description = reader.read_string()?;
    song.tempo = f32::from(reader.read_i16()?) / 100.0;
    song.auto_save.enabled = reader.read_u8()? != 0;
    song.auto_save.interval = reader.read_u8()?;
    song.time_signature = reader.read_u8()?;
    song.stats.minutes_spent = reader.read_i32()?;
    song.stats.left_clicks = reader.read_i32()?;
    song.stats.right_clicks = reader.read_i32()?;
    song.stats.blocks_added = reader.read_i32()?;
    song.stats.blocks_removed = reader.read_i32()?;
    song.import_name = reader.read_string()?;

    Ok(())
}

fn read_notes(
    reader: &mut Reader,
    version: u8,
    notes: &mut Vec<RawNote>,
) -> Result<(), DecodeError> {
    let mut tick: i64 = -1;

    loop {
        let jump = reader.read_u16()?;
        if jump == END_OF_JUMPS {
            break;
        }

        tick += i64::from(jump);

        let mut layer: i64 = -1;
        loop {
            let jump = reader.read_u16()?;
            if jump == END_OF_JUMPS {
                break;
            }

            layer += i64::from(jump);

            let (Ok(tick), Ok(layer)) = (u16::try_from(tick), u16::try_from(layer)) else {
                return Err(DecodeError::InvalidNoteTarget { tick, layer });
            };

            let mut note = Note::new(reader.read_u8()?);
            note.key = reader.read_u8()?;

            if version >= NOTE_DETAILS_VERSION {
                note.velocity = reader.read_u8()?;
                note.panning = i16::from(reader.read_u8()?) - PANNING_OFFSET;
                note.pitch = reader.read_i16()?;
            }

            notes.push(RawNote { tick, layer, note });
        }
    }

    Ok(())
}

fn read_layer<N>(reader: &mut Reader, song: &mut Song<N>) -> Result<(), DecodeError> {
    let layer = song.layers.create();
    layer.name = reader.read_string()?;

    if song.version >= LAYER_LOCK_VERSION {
        match reader.read_u8()? {
            LAYER_LOCKED => layer.is_locked = true,
            LAYER_SOLO => layer.is_solo = true,
            _ => (),
        }
    }

    layer.volume = reader.read_u8()?;

    if song.version >= LAYER_STEREO_VERSION {
        layer.stereo = i16::from(reader.read_u8()?) - PANNING_OFFSET;
    }

    Ok(())
}

fn read_instruments<N>(reader: &mut Reader, song: &mut Song<N>) -> Result<(), DecodeError> {
    let count = reader.read_u8()?;

    for _ in 0..count {
        let mut instrument = Instrument::new(reader.read_string()?, reader.read_string()?);
        instrument.key = reader.read_u8()?;
        instrument.press_key = reader.read_u8()? != 0;

        song.instruments.add(instrument);
    }

    Ok(())
}

/// Place every buffered note in its layer
///
/// The note stream may reference layers past the declared layer count; blank layers are
/// created to fill the gap.
fn place_notes<N>(song: &mut Song<N>, notes: Vec<RawNote>)
where
    N: From<Note>,
{
    for RawNote { tick, layer, note } in notes {
        let index = usize::from(layer);
        while song.layers.len() <= index {
            song.layers.create();
        }

        song.layers[index].notes_mut().add(tick, N::from(note));
        // Files count a note on the stored length as inside the song
        song.length = song.length.max(tick);
    }
}

/// Errors that might be returned from [`decode()`], or stored in [`Song::errors()`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A field could not be read from the input
    #[error("The input is truncated or corrupt")]
    TruncatedInput(#[from] ReadError),

    /// The file was written by a newer format revision than this crate understands
    #[error(
        "Version {version} is not supported, the highest supported version is {max}",
        max = MAX_VERSION
    )]
    UnsupportedVersion { version: u8 },

    /// The jumps in the note stream lead outside the addressable tick or layer range
    #[error("A note cannot be placed on tick {tick}, layer {layer}")]
    InvalidNoteTarget { tick: i64, layer: i64 },
}
