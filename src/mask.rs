//! Boolean pixel masks stored as packed bitsets.

const WORD_BITS: usize = 64;

/// A boolean grid congruent to an image, one bit per pixel, row-major.
///
/// Masks are produced by [`crate::fill::flood_fill`] and never change once
/// they leave it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    words: Vec<u64>,
    count: usize,
}

impl Mask {
    /// Create an all-false mask.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            words: vec![0; len.div_ceil(WORD_BITS)],
            count: 0,
        }
    }

    /// Mask width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels set in the mask.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether no pixel is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether the pixel at `(x, y)` is set. Out-of-range coordinates are unset.
    #[must_use]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.get_index(self.index(x, y))
    }

    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub(crate) fn get_index(&self, idx: usize) -> bool {
        self.words[idx / WORD_BITS] & (1u64 << (idx % WORD_BITS)) != 0
    }

    /// Set the bit at `idx`; returns `false` if it was already set.
    pub(crate) fn insert_index(&mut self, idx: usize) -> bool {
        let word = &mut self.words[idx / WORD_BITS];
        let bit = 1u64 << (idx % WORD_BITS);
        if *word & bit != 0 {
            return false;
        }
        *word |= bit;
        self.count += 1;
        true
    }

    /// Iterate over the coordinates of set pixels in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width as usize;
        self.words
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w != 0)
            .flat_map(move |(wi, &w)| {
                let mut bits = w;
                std::iter::from_fn(move || {
                    if bits == 0 {
                        return None;
                    }
                    let tz = bits.trailing_zeros() as usize;
                    bits &= bits - 1;
                    Some(wi * WORD_BITS + tz)
                })
            })
            .map(move |idx| coords(idx, width))
    }

    /// Bounding box of the set pixels as `(min_x, min_y, max_x, max_y)`, inclusive.
    #[must_use]
    pub fn bounds(&self) -> Option<(u32, u32, u32, u32)> {
        self.iter().fold(None, |acc, (x, y)| match acc {
            None => Some((x, y, x, y)),
            Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
        })
    }
}

#[allow(clippy::cast_possible_truncation)]
fn coords(idx: usize, width: usize) -> (u32, u32) {
    ((idx % width) as u32, (idx / width) as u32)
}
