//! Partial masking
//!
//! Lengths are counted in `char`s. A value no longer than `n_chars` is
//! masked character for character, so the output always has the input's
//! length.

/// Which end of the value gets masked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskTransform {
    side: MaskSide,
    n_chars: usize,
    mask_char: char,
}

impl MaskTransform {
    pub fn new(side: MaskSide, n_chars: usize, mask_char: char) -> Self {
        Self {
            side,
            n_chars,
            mask_char,
        }
    }

    pub fn right(n_chars: usize, mask_char: char) -> Self {
        Self::new(MaskSide::Right, n_chars, mask_char)
    }

    pub fn left(n_chars: usize, mask_char: char) -> Self {
        Self::new(MaskSide::Left, n_chars, mask_char)
    }

    pub fn mask_str(&self, value: &str) -> String {
        let len = value.chars().count();
        if len <= self.n_chars {
            return std::iter::repeat(self.mask_char).take(len).collect();
        }

        let mask = std::iter::repeat(self.mask_char).take(self.n_chars);
        match self.side {
            MaskSide::Right => value.chars().take(len - self.n_chars).chain(mask).collect(),
            MaskSide::Left => mask.chain(value.chars().skip(self.n_chars)).collect(),
        }
    }
}
