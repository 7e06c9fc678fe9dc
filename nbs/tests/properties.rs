//! Behavior of the codec on hand-built songs and malformed input

mod common;

use common::{Bytes, default_header, default_layer, fixture};
use nbs::{
    DecodeError, DecodeOptions, EncodeError, EncodeOptions, Instrument, InstrumentError, Layer,
    Note, Song, decode, encode,
};

#[test]
fn single_note() {
    let mut song = Song::new();
    song.layers_mut().create();
    song.create_note(0, 0, 0).unwrap();

    let mut expected = default_header(5, 1, 1);
    expected.bytes(&[1, 0, 1, 0, 0, 45, 100, 100, 0, 0, 0, 0, 0, 0]);
    default_layer(&mut expected, 5);
    expected.u8(0);

    assert_eq!(encode(&song, EncodeOptions::default()).unwrap(), expected.build());
}

#[test]
fn empty_ticks_are_skipped() {
    let mut song = Song::new();
    song.version = 0;
    song.layers_mut().create();
    song.create_note(0, 0, 0).unwrap();
    song.create_note(0, 5, 0).unwrap();

    let mut expected = default_header(0, 6, 1);
    expected.bytes(&[1, 0, 1, 0, 0, 45, 0, 0, 5, 0, 1, 0, 0, 45, 0, 0, 0, 0]);
    default_layer(&mut expected, 0);
    expected.u8(0);

    assert_eq!(encode(&song, EncodeOptions::default()).unwrap(), expected.build());
}

#[test]
fn empty_song() {
    let song = Song::new();

    let mut expected = default_header(5, 0, 0);
    expected.u16(0).u8(0);

    let bytes = encode(&song, EncodeOptions::default()).unwrap();
    assert_eq!(bytes, expected.build());
    assert_eq!(decode(&bytes, DecodeOptions::default()).unwrap(), song);
}

#[test]
fn length_covers_every_note() {
    let mut song = decode(&fixture(5), DecodeOptions::default()).unwrap();

    song.add_note(2, 40, Note::with_key(3, 60)).unwrap();
    assert!(song.length() >= 41);

    song.set_length(2);
    song.layers_mut()[0].notes_mut().create(50, 0);
    assert_eq!(song.length(), 51);

    for layer in song.layers() {
        for (tick, _) in layer.notes() {
            assert!(*tick < song.length());
        }
    }
}

#[test]
fn instrument_ids_stay_contiguous() {
    let mut song = decode(&fixture(5), DecodeOptions::default()).unwrap();
    let instruments = song.instruments_mut();

    instruments.create("Glass", "glass.ogg");
    instruments.add(Instrument::new("Bell", "bell.ogg")).key = 57;
    assert_eq!(instruments.len(), 19);

    let removed = instruments.delete(17).unwrap();
    assert_eq!(removed.name, "Glass");

    for (index, instrument) in instruments.iter().enumerate() {
        assert_eq!(instrument.id(), index);
    }
    assert_eq!(instruments.get(17).unwrap().name, "Bell");

    assert_eq!(
        instruments.set(20, Instrument::new("Far", "far.ogg")),
        Err(InstrumentError::OutOfOrder { id: 20, total: 18 })
    );
    assert_eq!(
        instruments.set(0, Instrument::new("Piano", "piano.ogg")),
        Err(InstrumentError::BuiltIn { id: 0 })
    );
    assert!(instruments.get(0).unwrap().is_built_in());
}

#[test]
fn unsupported_version() {
    assert_eq!(
        decode(&[0, 0, 6, 16], DecodeOptions::default()),
        Err(DecodeError::UnsupportedVersion { version: 6 })
    );

    let mut song = Song::new();
    song.version = 6;
    assert_eq!(
        encode(&song, EncodeOptions::default()),
        Err(EncodeError::UnsupportedVersion { version: 6 })
    );
}

#[test]
fn truncated_input_keeps_what_was_read() {
    let bytes = fixture(5);
    let song = decode(&bytes[..bytes.len() - 10], DecodeOptions::default()).unwrap();

    assert_eq!(song.errors().len(), 1);
    assert!(matches!(song.errors()[0], DecodeError::TruncatedInput(_)));

    assert_eq!(song.name, "Test");
    assert_eq!(song.layers().len(), 3);
    assert_eq!(song.layers()[2].name, "Drums");
    assert_eq!(song.layers()[0].notes().len(), 2);
    assert_eq!(song.instruments().custom().count(), 0);
}

#[test]
fn truncated_note_stream_places_earlier_notes() {
    let mut bytes = default_header(5, 4, 1);
    bytes.bytes(&[1, 0, 1, 0, 0, 45, 100, 100, 0, 0, 0, 0, 4, 0, 1]);

    let song = decode(&bytes.build(), DecodeOptions::default()).unwrap();

    assert_eq!(song.errors().len(), 1);
    assert_eq!(song.layers().len(), 1);
    assert!(song.layers()[0].notes().contains(0));
    assert_eq!(song.last_tick(), Some(0));
}

#[test]
fn notes_on_undeclared_layers() {
    let mut bytes = default_header(5, 3, 1);
    bytes.bytes(&[3, 0, 3, 0, 2, 50, 100, 100, 0, 0, 0, 0, 0, 0]);
    default_layer(&mut bytes, 5);
    bytes.u8(0);

    let song = decode(&bytes.build(), DecodeOptions::default()).unwrap();

    assert!(song.errors().is_empty());
    assert_eq!(song.layers().len(), 3);
    assert_eq!(song.layers()[2].notes().get(2).map(|note| note.key), Some(50));
    assert!(song.layers()[1].notes().is_empty());
}

#[test]
fn file_without_layer_metadata() {
    let mut bytes = default_header(5, 1, 2);
    bytes.bytes(&[1, 0, 1, 0, 0, 45, 100, 100, 0, 0, 0, 0, 0, 0]);

    let song = decode(&bytes.build(), DecodeOptions::default()).unwrap();

    assert!(song.errors().is_empty());
    assert_eq!(song.layers().len(), 1);
    assert_eq!(song.layers()[0].volume, Layer::DEFAULT_VOLUME);
    assert_eq!(song.instruments().len(), 16);
}

fn song_with_blank_layers() -> Song {
    let mut song = Song::new();
    song.layers_mut().create();
    song.layers_mut().create().name = "Lead".to_string();
    song.layers_mut().create();
    song.layers_mut().create();
    song.create_note(1, 3, 0).unwrap();
    song
}

#[test]
fn ignore_empty_layers_when_encoding() {
    let song = song_with_blank_layers();
    let options = EncodeOptions {
        ignore_empty_layers: true,
    };

    let bytes = encode(&song, options).unwrap();
    assert_eq!(song.layers().len(), 4);

    let decoded = decode(&bytes, DecodeOptions::default()).unwrap();
    assert_eq!(decoded.layers().len(), 2);
    assert_eq!(decoded.layers()[1].name, "Lead");
}

#[test]
fn ignore_empty_layers_when_decoding() {
    let bytes = encode(&song_with_blank_layers(), EncodeOptions::default()).unwrap();

    let kept = decode(&bytes, DecodeOptions::default()).unwrap();
    assert_eq!(kept.layers().len(), 4);

    let options = DecodeOptions {
        ignore_empty_layers: true,
    };
    let trimmed = decode(&bytes, options).unwrap();
    assert_eq!(trimmed.layers().len(), 2);
    assert!(trimmed.layers()[0].notes().is_empty());
}

#[test]
fn text_outside_latin1() {
    let mut song = Song::new();
    song.name = "Ballade ♪".to_string();

    assert!(matches!(
        encode(&song, EncodeOptions::default()),
        Err(EncodeError::String { field: "name", .. })
    ));

    song.name = "Ballade für Elise".to_string();
    let bytes = encode(&song, EncodeOptions::default()).unwrap();
    assert_eq!(decode(&bytes, DecodeOptions::default()).unwrap().name, song.name);
}

#[test]
fn garbage_string_length() {
    let mut bytes = Bytes::new();
    bytes.u16(0).u8(5).u8(16).u16(0).u16(0).i32(-3);

    let song = decode(&bytes.build(), DecodeOptions::default()).unwrap();
    assert_eq!(song.errors().len(), 1);
    assert_eq!(song.name, "");
}

#[test]
fn note_on_the_declared_length() {
    let mut bytes = default_header(5, 3, 1);
    bytes.bytes(&[4, 0, 1, 0, 0, 45, 100, 100, 0, 0, 0, 0, 0, 0]);
    default_layer(&mut bytes, 5);
    bytes.u8(0);
    let bytes = bytes.build();

    let song = decode(&bytes, DecodeOptions::default()).unwrap();
    assert_eq!(song.last_tick(), Some(3));
    assert_eq!(song.length(), 4);
    assert_eq!(song.duration(), 400.0);

    assert_eq!(encode(&song, EncodeOptions::default()).unwrap(), bytes);
}

#[test]
fn notes_need_a_known_instrument() {
    let mut song = Song::new();
    song.layers_mut().create();
    song.create_note(0, 2, 200).unwrap();

    assert_eq!(
        encode(&song, EncodeOptions::default()),
        Err(EncodeError::UnknownInstrument {
            instrument: 200,
            tick: 2,
            layer: 0
        })
    );

    song.instruments_mut().create("Sandple", "sand.ogg");
    song.create_note(0, 2, 16).unwrap();
    assert!(encode(&song, EncodeOptions::default()).is_ok());

    // Deleting the instrument leaves the note pointing past the palette
    song.instruments_mut().delete(16);
    assert!(matches!(
        encode(&song, EncodeOptions::default()),
        Err(EncodeError::UnknownInstrument { instrument: 16, .. })
    ));
}

#[test]
fn first_custom_index_past_the_built_ins() {
    let mut bytes = fixture(5);
    bytes[3] = 20;

    let song = decode(&bytes, DecodeOptions::default()).unwrap();
    assert_eq!(song.instruments().first_custom_index(), 16);
    assert_eq!(song.instruments().get(16).unwrap().name, "Sandple");

    assert_eq!(encode(&song, EncodeOptions::default()).unwrap(), bytes);
}
