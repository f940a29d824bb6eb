//! Placement arithmetic for the 2×2 meme grid.
//!
//! ```text
//! ┌───────────┬───────────┐
//! │           │  caption  │
//! │  no image │   ┌───┐   │
//! │           │   │QR │   │
//! ├───────────┼───────────┤
//! │           │  caption  │
//! │ yes image │   ┌───┐   │
//! │           │   │QR │   │
//! └───────────┴───────────┘
//! ```
//!
//! All divisions floor, including for negative offsets.

use crate::config::LayoutConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[cfg(test)]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + self.width as i64
            && y < self.y + self.height as i64
    }
}

/// Positions of everything drawn on a canvas of a given size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    qr_top_offset: u32,
    caption_top_offset: u32,
    divider_width: u32,
}

impl Layout {
    pub fn new(width: u32, height: u32, config: &LayoutConfig) -> Self {
        Self {
            width,
            height,
            qr_top_offset: config.qr_top_offset,
            caption_top_offset: config.caption_top_offset,
            divider_width: config.divider_width,
        }
    }

    /// Canvas twice as wide and tall as the larger of the two source images.
    pub fn for_sources(no: (u32, u32), yes: (u32, u32), config: &LayoutConfig) -> Self {
        let width = no.0.max(yes.0) * 2;
        let height = no.1.max(yes.1) * 2;
        Self::new(width, height, config)
    }

    pub fn mid_x(&self) -> u32 {
        self.width / 2
    }

    pub fn mid_y(&self) -> u32 {
        self.height / 2
    }

    /// Size every QR bitmap is resized to.
    pub fn qr_size(&self) -> (u32, u32) {
        ((self.width / 2) / 2, (self.height / 2) / 2)
    }

    /// X offset that centres something `item_width` wide in the right half.
    pub fn right_half_centre(&self, item_width: u32) -> i64 {
        let half = (self.width / 2) as i64;
        half + (half - item_width as i64).div_euclid(2)
    }

    pub fn upper_qr(&self) -> Rect {
        self.qr_rect(self.qr_top_offset as i64)
    }

    pub fn lower_qr(&self) -> Rect {
        self.qr_rect(self.mid_y() as i64 + self.qr_top_offset as i64)
    }

    fn qr_rect(&self, y: i64) -> Rect {
        let (width, height) = self.qr_size();
        Rect {
            x: self.right_half_centre(width),
            y,
            width,
            height,
        }
    }

    pub fn upper_caption(&self, text_width: u32) -> (i64, i64) {
        (
            self.right_half_centre(text_width),
            self.caption_top_offset as i64,
        )
    }

    pub fn lower_caption(&self, text_width: u32) -> (i64, i64) {
        (
            self.right_half_centre(text_width),
            self.mid_y() as i64 + self.caption_top_offset as i64,
        )
    }

    /// Full-height line centred on the vertical midline.
    pub fn vertical_divider(&self) -> Rect {
        Rect {
            x: self.mid_x() as i64 - (self.divider_width / 2) as i64,
            y: 0,
            width: self.divider_width,
            height: self.height,
        }
    }

    /// Full-width line centred on the horizontal midline.
    pub fn horizontal_divider(&self) -> Rect {
        Rect {
            x: 0,
            y: self.mid_y() as i64 - (self.divider_width / 2) as i64,
            width: self.width,
            height: self.divider_width,
        }
    }
}
