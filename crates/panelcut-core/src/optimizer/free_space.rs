use crate::types::{FreeRect, SheetDimensions};
use crate::EPSILON;

/// Tracks the unused rectangles of a single sheet.
///
/// Placements always take the top-left corner of a free rectangle and split the
/// remainder guillotine-style: one strip to the right of the panel (as tall as the
/// panel) and one strip below it (as wide as the consumed rectangle). Both strips
/// start one kerf away from the panel, so free rectangles never overlap each other
/// or any placed panel.
#[derive(Debug, Clone)]
pub(crate) struct FreeSpace {
    rects: Vec<FreeRect>,
    kerf: f64,
    min_usable: f64,
}

impl FreeSpace {
    /// Starts with the whole sheet inset by `margin` on every side.
    pub fn new(sheet: &SheetDimensions, margin: f64, kerf: f64, min_usable: f64) -> Self {
        let usable_width = sheet.width - (margin * 2.0);
        let usable_height = sheet.height - (margin * 2.0);

        let rects = if usable_width > 0.0 && usable_height > 0.0 {
            vec![FreeRect {
                x: margin,
                y: margin,
                width: usable_width,
                height: usable_height,
            }]
        } else {
            Vec::new()
        };

        Self {
            rects,
            kerf,
            min_usable,
        }
    }

    pub fn rects(&self) -> &[FreeRect] {
        &self.rects
    }

    pub fn into_rects(self) -> Vec<FreeRect> {
        self.rects
    }

    /// Free rectangles able to host a `width` x `height` panel as-is, with their index.
    pub fn find_candidates(
        &self,
        width: f64,
        height: f64,
    ) -> impl Iterator<Item = (usize, &FreeRect)> + '_ {
        self.rects
            .iter()
            .enumerate()
            .filter(move |(_, rect)| rect.can_host(width, height))
    }

    pub fn fits_anywhere(&self, width: f64, height: f64) -> bool {
        self.rects.iter().any(|rect| rect.can_host(width, height))
    }

    /// Consumes the rectangle at `index` for a panel anchored at its top-left corner.
    pub fn commit_placement(&mut self, index: usize, width: f64, height: f64) {
        let rect = self.rects.remove(index);

        let right = FreeRect {
            x: rect.x + width + self.kerf,
            y: rect.y,
            width: (rect.x + rect.width) - (rect.x + width + self.kerf),
            height,
        };
        let below = FreeRect {
            x: rect.x,
            y: rect.y + height + self.kerf,
            width: rect.width,
            height: (rect.y + rect.height) - (rect.y + height + self.kerf),
        };

        for remainder in [right, below] {
            if self.is_usable(&remainder) {
                self.rects.push(remainder);
            }
        }
    }

    fn is_usable(&self, rect: &FreeRect) -> bool {
        rect.width > EPSILON
            && rect.height > EPSILON
            && rect.width >= self.min_usable
            && rect.height >= self.min_usable
    }

    pub fn total_area(&self) -> f64 {
        self.rects.iter().map(FreeRect::area).sum()
    }
}
