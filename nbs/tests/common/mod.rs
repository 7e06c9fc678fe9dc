#![allow(dead_code)]

/// Builds little-endian byte fixtures field by field
#[derive(Default)]
pub struct Bytes(Vec<u8>);

impl Bytes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.0.push(value);
        self
    }

    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn i16(&mut self, value: i16) -> &mut Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn i32(&mut self, value: i32) -> &mut Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn string(&mut self, value: &str) -> &mut Self {
        let bytes: Vec<u8> = value.chars().map(|c| u8::try_from(c).unwrap()).collect();
        self.i32(bytes.len() as i32);
        self.0.extend_from_slice(&bytes);
        self
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.0.extend_from_slice(bytes);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.0.clone()
    }
}

/// The header of a freshly constructed song, up to and including the loop settings
pub fn default_header(version: u8, length: u16, layers: u16) -> Bytes {
    let mut bytes = Bytes::new();

    if version >= 1 {
        bytes.u16(0).u8(version).u8(16);
    }
    if version == 0 || version >= 3 {
        bytes.u16(length);
    }

    bytes
        .u16(layers)
        .string("")
        .string("")
        .string("")
        .string("")
        .i16(1000)
        .u8(0)
        .u8(10)
        .u8(4)
        .i32(0)
        .i32(0)
        .i32(0)
        .i32(0)
        .i32(0)
        .string("");

    if version >= 4 {
        bytes.u8(0).u8(0).u16(0);
    }

    bytes
}

/// Metadata of a default layer
pub fn default_layer(bytes: &mut Bytes, version: u8) {
    bytes.string("");
    if version >= 4 {
        bytes.u8(0);
    }
    bytes.u8(100);
    if version >= 2 {
        bytes.u8(100);
    }
}

/// The first custom instrument index the fixture for a version uses
pub fn first_custom_index(version: u8) -> u8 {
    if version == 1 { 10 } else { 16 }
}

/// A small song in the layout of the given version
///
/// Three layers, notes on ticks 0, 4 and 11, a declared length of 12 (where the version stores
/// one) and a single custom instrument.
pub fn fixture(version: u8) -> Vec<u8> {
    let custom = first_custom_index(version);
    let mut bytes = Bytes::new();

    if version == 0 {
        bytes.u16(12);
    } else {
        bytes.u16(0).u8(version).u8(custom);
        if version >= 3 {
            bytes.u16(12);
        }
    }

    bytes
        .u16(3)
        .string("Test")
        .string("Encode42")
        .string("")
        .string("A small test song")
        .i16(750)
        .u8(1)
        .u8(10)
        .u8(3)
        .i32(9)
        .i32(324)
        .i32(4)
        .i32(40)
        .i32(2)
        .string("melody.mid");

    if version >= 4 {
        bytes.u8(1).u8(2).u16(4);
    }

    let note = |bytes: &mut Bytes, instrument: u8, key: u8, details: (u8, u8, i16)| {
        bytes.u8(instrument).u8(key);
        if version >= 4 {
            bytes.u8(details.0).u8(details.1).i16(details.2);
        }
    };

    // Tick 0: layers 0 and 2
    bytes.u16(1).u16(1);
    note(&mut bytes, 0, 45, (100, 100, 0));
    bytes.u16(2);
    note(&mut bytes, 9, 50, (80, 60, -10));
    bytes.u16(0);

    // Tick 4: layer 1
    bytes.u16(4).u16(2);
    note(&mut bytes, custom, 33, (100, 150, 25));
    bytes.u16(0);

    // Tick 11: layer 0
    bytes.u16(7).u16(1);
    note(&mut bytes, 1, 40, (20, 100, 0));
    bytes.u16(0);

    bytes.u16(0);

    let layers = [
        ("Melody", 0, 100, 100),
        ("Bass", 1, 80, 60),
        ("Drums", 2, 50, 140),
    ];

    for (name, lock, volume, stereo) in layers {
        bytes.string(name);
        if version >= 4 {
            bytes.u8(lock);
        }
        bytes.u8(volume);
        if version >= 2 {
            bytes.u8(stereo);
        }
    }

    bytes.u8(1).string("Sandple").string("sand.ogg").u8(45).u8(1);

    bytes.build()
}
