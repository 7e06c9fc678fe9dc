//! Layers and the ordered list a song keeps them in

use super::note::{LayerNotes, Note};
use std::{
    ops::{Index, IndexMut},
    slice,
};

/// A horizontal track of notes
///
/// Its position in the song's [`SongLayers`] is significant: the binary format addresses notes
/// by layer position, so reordering layers changes the encoded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer<N = Note> {
    /// Display name, may be empty
    pub name: String,

    /// Whether the layer is locked in the editor
    pub is_locked: bool,

    /// Whether the layer is soloed in the editor
    pub is_solo: bool,

    /// Volume percentage applied to every note in the layer
    pub volume: u8,

    /// Stereo offset, roughly -100 (left) - 100 (right)
    pub stereo: i16,

    notes: LayerNotes<N>,
}

impl Layer {
    /// The volume a layer is created with
    pub const DEFAULT_VOLUME: u8 = 100;

    /// Construct an empty, unnamed layer
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N> Layer<N> {
    /// Construct an empty layer with a name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The notes placed on this layer
    pub fn notes(&self) -> &LayerNotes<N> {
        &self.notes
    }

    /// The notes placed on this layer, mutably
    pub fn notes_mut(&mut self) -> &mut LayerNotes<N> {
        &mut self.notes
    }
}

impl<N> Default for Layer<N> {
    fn default() -> Self {
        Self {
            name: String::new(),
            is_locked: false,
            is_solo: false,
            volume: Layer::<Note>::DEFAULT_VOLUME,
            stereo: 0,
            notes: LayerNotes::new(),
        }
    }
}

/// The ordered layers of a song
///
/// Layers are positional rather than id-keyed, so deleting one shifts every layer after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongLayers<N = Note> {
    layers: Vec<Layer<N>>,
}

impl<N> SongLayers<N> {
    /// Construct an empty layer list
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// The number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Are there _any_ layers?
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Access the layer at a position
    pub fn get(&self, index: usize) -> Option<&Layer<N>> {
        self.layers.get(index)
    }

    /// Access the layer at a position mutably
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Layer<N>> {
        self.layers.get_mut(index)
    }

    /// Append a new default layer and return it
    pub fn create(&mut self) -> &mut Layer<N> {
        self.add(Layer::default())
    }

    /// Append an existing layer and return it
    pub fn add(&mut self, layer: Layer<N>) -> &mut Layer<N> {
        self.layers.push(layer);
        let last = self.layers.len() - 1;
        &mut self.layers[last]
    }

    /// Insert a layer at a position, shifting later layers back
    ///
    /// Positions past the end append the layer instead.
    pub fn insert(&mut self, index: usize, layer: Layer<N>) -> &mut Layer<N> {
        let index = index.min(self.layers.len());
        self.layers.insert(index, layer);
        &mut self.layers[index]
    }

    /// Remove the layer at a position, returning it if it existed
    pub fn delete(&mut self, index: usize) -> Option<Layer<N>> {
        (index < self.layers.len()).then(|| self.layers.remove(index))
    }

    /// The number of layers up to and including the last layer that holds any note
    pub fn populated_len(&self) -> usize {
        self.layers
            .iter()
            .rposition(|layer| !layer.notes.is_empty())
            .map_or(0, |index| index + 1)
    }

    /// Drop every layer after the last one that holds a note
    ///
    /// Only the tail is trimmed, so the positions of all populated layers stay the same.
    pub fn remove_trailing_empty(&mut self) {
        let populated = self.populated_len();
        self.layers.truncate(populated);
    }

    /// The highest tick that holds a note in any layer
    pub fn last_tick(&self) -> Option<u16> {
        self.layers
            .iter()
            .filter_map(|layer| layer.notes.last_tick())
            .max()
    }

    /// Is any layer set to solo?
    pub fn has_solo(&self) -> bool {
        self.layers.iter().any(|layer| layer.is_solo)
    }

    /// Access all layers as a slice
    pub fn as_slice(&self) -> &[Layer<N>] {
        &self.layers
    }

    /// Iterate over the layers in order
    pub fn iter(&self) -> slice::Iter<'_, Layer<N>> {
        self.layers.iter()
    }

    /// Iterate mutably over the layers in order
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Layer<N>> {
        self.layers.iter_mut()
    }
}

impl<N> Default for SongLayers<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Index<usize> for SongLayers<N> {
    type Output = Layer<N>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.layers[index]
    }
}

impl<N> IndexMut<usize> for SongLayers<N> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.layers[index]
    }
}

impl<'a, N> IntoIterator for &'a SongLayers<N> {
    type Item = &'a Layer<N>;
    type IntoIter = slice::Iter<'a, Layer<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
