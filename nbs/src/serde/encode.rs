use super::{
    END_OF_JUMPS, EXPLICIT_LENGTH_VERSION, LAYER_LOCK_VERSION, LAYER_LOCKED, LAYER_SOLO,
    LAYER_STEREO_VERSION, LAYER_UNLOCKED, LOOP_VERSION, MAX_VERSION, NOTE_DETAILS_VERSION,
    PANNING_OFFSET, VERSIONED_MARKER,
    writer::{WriteError, Writer},
};
use crate::song::{Layer, Note, Song};
use log::{debug, trace};
use std::collections::BTreeSet;
use thiserror::Error;

/// Options for [`encode()`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Leave out the layers after the last layer that holds a note
    ///
    /// The song itself is not modified.
    pub ignore_empty_layers: bool,
}

/// Encode a [`Song`] to the bytes of an `.nbs` file
///
/// The layout follows the song's [`version`](Song::version). Fields the version doesn't have are
/// left out. Decoding a file and encoding the result reproduces the original bytes.
///
/// Encoding fails, without producing any output, if a value doesn't fit its field or a note plays
/// an instrument that isn't in the song's palette.
pub fn encode<N>(song: &Song<N>, options: EncodeOptions) -> Result<Vec<u8>, EncodeError>
where
    N: AsRef<Note>,
{
    if song.version > MAX_VERSION {
        return Err(EncodeError::UnsupportedVersion {
            version: song.version,
        });
    }

    let layers = if options.ignore_empty_layers {
        &song.layers.as_slice()[..song.layers.populated_len()]
    } else {
        song.layers.as_slice()
    };

    let mut writer = Writer::new();
    write_header(&mut writer, song, layers.len())?;
    write_notes(&mut writer, song.version, layers, song.instruments.len())?;

    for layer in layers {
        write_layer(&mut writer, song.version, layer)?;
    }

    write_instruments(&mut writer, song)?;

    debug!("Encoded version {} song into {} bytes", song.version, writer.len());
    Ok(writer.into_bytes())
}

fn write_header<N>(
    writer: &mut Writer,
    song: &Song<N>,
    layer_count: usize,
) -> Result<(), EncodeError> {
    if song.version >= 1 {
        writer.write_u16(VERSIONED_MARKER);
        writer.write_u8(song.version);

        // Keep whatever index the file was read with, even one past the built-ins
        let first_custom_index = match song.instruments.declared_first_custom_index() {
            Some(index) => index,
            None => narrow(
                "first custom instrument index",
                song.instruments.first_custom_index(),
            )?,
        };
        writer.write_u8(first_custom_index);
    }

    if song.version == 0 || song.version >= EXPLICIT_LENGTH_VERSION {
        writer.write_u16(song.declared_length());
    }

    writer.write_u16(narrow("layer count", layer_count)?);
    write_string(writer, "name", &song.name)?;
    write_string(writer, "author", &song.author)?;
    write_string(writer, "original author", &song.original_author)?;
    write_string(writer, "description", &song.description)?;
    writer.write_i16(tempo_to_wire(song.tempo)?);
    writer.write_u8(song.auto_save.enabled.into());
    writer.write_u8(song.auto_save.interval);
    writer.write_u8(song.time_signature);
    writer.write_i32(song.stats.minutes_spent);
    writer.write_i32(song.stats.left_clicks);
    writer.write_i32(song.stats.right_clicks);
    writer.write_i32(song.stats.blocks_added);
    writer.write_i32(song.stats.blocks_removed);
    write_string(writer, "import name", &song.import_name)?;

    if song.version >= LOOP_VERSION {
        writer.write_u8(song.loop_options.enabled.into());
        writer.write_u8(song.loop_options.total_loops);
        writer.write_u16(song.loop_options.start_tick);
    }

    trace!("Wrote header, {} bytes", writer.len());
    Ok(())
}

fn write_notes<N>(
    writer: &mut Writer,
    version: u8,
    layers: &[Layer<N>],
    instrument_count: usize,
) -> Result<(), EncodeError>
where
    N: AsRef<Note>,
{
    // Every tick that holds a note in at least one layer, ascending. Empty ticks get no record.
    let ticks: BTreeSet<u16> = layers.iter().flat_map(|layer| layer.notes().ticks()).collect();

    let mut last_tick = None;
    for tick in ticks {
        writer.write_u16(narrow("tick jump", jump(last_tick, usize::from(tick)))?);
        last_tick = Some(usize::from(tick));

        let mut last_layer = None;
        for (index, layer) in layers.iter().enumerate() {
            let Some(note) = layer.notes().get(tick) else {
                continue;
            };

            let note = note.as_ref();
            if usize::from(note.instrument) >= instrument_count {
                return Err(EncodeError::UnknownInstrument {
                    instrument: note.instrument,
                    tick,
                    layer: index,
                });
            }

            writer.write_u16(narrow("layer jump", jump(last_layer, index))?);
            last_layer = Some(index);

            write_note(writer, version, note)?;
        }

        writer.write_u16(END_OF_JUMPS);
    }

    writer.write_u16(END_OF_JUMPS);

    trace!("Wrote note stream, {} bytes", writer.len());
    Ok(())
}

fn write_note(writer: &mut Writer, version: u8, note: &Note) -> Result<(), EncodeError> {
    writer.write_u8(note.instrument);
    writer.write_u8(note.key);

    if version >= NOTE_DETAILS_VERSION {
        writer.write_u8(note.velocity);
        writer.write_u8(offset_panning("note panning", note.panning)?);
        writer.write_i16(note.pitch);
    }

    Ok(())
}

fn write_layer<N>(writer: &mut Writer, version: u8, layer: &Layer<N>) -> Result<(), EncodeError> {
    write_string(writer, "layer name", &layer.name)?;

    if version >= LAYER_LOCK_VERSION {
        let lock = if layer.is_solo {
            LAYER_SOLO
        } else if layer.is_locked {
            LAYER_LOCKED
        } else {
            LAYER_UNLOCKED
        };

        writer.write_u8(lock);
    }

    writer.write_u8(layer.volume);

    if version >= LAYER_STEREO_VERSION {
        writer.write_u8(offset_panning("layer stereo", layer.stereo)?);
    }

    Ok(())
}

fn write_instruments<N>(writer: &mut Writer, song: &Song<N>) -> Result<(), EncodeError> {
    let custom = song.instruments.custom();
    writer.write_u8(narrow("custom instrument count", custom.len())?);

    for instrument in custom {
        write_string(writer, "instrument name", &instrument.name)?;
        write_string(writer, "instrument sound file", &instrument.sound_file)?;
        writer.write_u8(instrument.key);
        writer.write_u8(instrument.press_key.into());
    }

    Ok(())
}

/// The distance from the last emitted position, where nothing emitted yet counts as -1
fn jump(last: Option<usize>, to: usize) -> usize {
    match last {
        Some(last) => to - last,
        None => to + 1,
    }
}

fn narrow<T>(field: &'static str, value: usize) -> Result<T, EncodeError>
where
    T: TryFrom<usize>,
{
    T::try_from(value).map_err(|_| EncodeError::ValueOutOfRange {
        field,
        value: i64::try_from(value).unwrap_or(i64::MAX),
    })
}

fn offset_panning(field: &'static str, panning: i16) -> Result<u8, EncodeError> {
    let shifted = i64::from(panning) + i64::from(PANNING_OFFSET);
    u8::try_from(shifted).map_err(|_| EncodeError::ValueOutOfRange {
        field,
        value: i64::from(panning),
    })
}

fn tempo_to_wire(tempo: f32) -> Result<i16, EncodeError> {
    let scaled = (f64::from(tempo) * 100.0).round();
    if scaled.is_finite() && (f64::from(i16::MIN)..=f64::from(i16::MAX)).contains(&scaled) {
        Ok(scaled as i16)
    } else {
        Err(EncodeError::InvalidTempo { tempo })
    }
}

fn write_string(writer: &mut Writer, field: &'static str, value: &str) -> Result<(), EncodeError> {
    writer
        .write_string(value)
        .map_err(|source| EncodeError::String { field, source })
}

/// Errors that might be returned from [`encode()`]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    /// The song claims a format revision this crate cannot write
    #[error(
        "Version {version} is not supported, the highest supported version is {max}",
        max = MAX_VERSION
    )]
    UnsupportedVersion { version: u8 },

    /// A value doesn't fit the width of its field
    #[error("The {field} {value} does not fit in its field")]
    ValueOutOfRange { field: &'static str, value: i64 },

    /// A note plays an instrument the song's palette doesn't have
    #[error("The note on tick {tick}, layer {layer} plays unknown instrument {instrument}")]
    UnknownInstrument { instrument: u8, tick: u16, layer: usize },

    /// The tempo can't be stored as hundredths in 16 bits
    #[error("A tempo of {tempo} ticks per second cannot be stored")]
    InvalidTempo { tempo: f32 },

    /// A string could not be written
    #[error("The {field} could not be written")]
    String {
        field: &'static str,
        #[source]
        source: WriteError,
    },
}
