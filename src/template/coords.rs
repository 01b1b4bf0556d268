/// Location of one view character inside the run list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    /// Byte offset of the character in the view.
    pub view_offset: usize,
    pub run: usize,
    /// Byte offset of the character inside its run.
    pub offset: usize,
    /// UTF-8 length of the character.
    pub len: usize,
}

/// Contiguous text view over a paragraph's runs with a per-character reverse index.
#[derive(Clone, Debug, Default)]
pub struct CoordinateMap {
    view: String,
    positions: Vec<Position>,
}

impl CoordinateMap {
    pub fn build<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut map = CoordinateMap::default();
        for (run, text) in texts.into_iter().enumerate() {
            for (offset, ch) in text.char_indices() {
                map.positions.push(Position {
                    view_offset: map.view.len() + offset,
                    run,
                    offset,
                    len: ch.len_utf8(),
                });
            }
            map.view.push_str(text);
        }
        map
    }

    pub fn view(&self) -> &str {
        &self.view
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Position of the character covering view byte `offset`.
    pub fn locate(&self, offset: usize) -> Position {
        assert!(
            offset < self.view.len(),
            "view offset {offset} outside view of {} bytes",
            self.view.len()
        );
        let index = match self
            .positions
            .binary_search_by_key(&offset, |p| p.view_offset)
        {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        self.positions[index]
    }
}
