//! Implementation of the binary `.nbs` format
//!
//! The format has gone through six revisions. Version 0 is the original Note Block Studio
//! layout; versions 1 and up are written by Open Note Block Studio and announce themselves with
//! a zero where version 0 stores the song length. Each revision adds fields:
//!
//!  * 1: version header with the first custom instrument index
//!  * 2: layer stereo
//!  * 3: explicit song length in the version header
//!  * 4: loop settings, layer lock/solo and note velocity, panning and pitch
//!  * 5: no layout changes
//!
//! Notes are stored sparsely: for every populated tick, the distance to the previous populated
//! tick, followed by the distance to the previous populated layer for each note on that tick.
//! A zero jump ends a tick, and a zero tick jump ends the note stream.

mod decode;
mod encode;
mod reader;
mod writer;

pub use decode::{DecodeError, DecodeOptions, decode, decode_as};
pub use encode::{EncodeError, EncodeOptions, encode};
pub use reader::{ReadError, Reader};
pub use writer::{WriteError, Writer};

/// The highest format revision this crate can read and write
pub const MAX_VERSION: u8 = 5;

/// Where version 0 stores the song length, later versions store this marker
const VERSIONED_MARKER: u16 = 0;

/// Ends both the tick and the layer loops of the note stream
const END_OF_JUMPS: u16 = 0;

/// Panning and stereo are stored unsigned, shifted up by this amount
const PANNING_OFFSET: i16 = 100;

const LAYER_UNLOCKED: u8 = 0;
const LAYER_LOCKED: u8 = 1;
const LAYER_SOLO: u8 = 2;

const LAYER_STEREO_VERSION: u8 = 2;
const EXPLICIT_LENGTH_VERSION: u8 = 3;
const LOOP_VERSION: u8 = 4;
const LAYER_LOCK_VERSION: u8 = 4;
const NOTE_DETAILS_VERSION: u8 = 4;
