use super::free_space::FreeSpace;
use super::selector::Orientation;
use crate::types::*;

/// Sheet currently being filled by the allocator.
#[derive(Debug, Clone)]
pub(super) struct OpenSheet {
    pub number: u32,
    pub dimensions: SheetDimensions,
    pub margin: f64,
    pub free_space: FreeSpace,
    pub placements: Vec<PlacedPanel>,
    pub used_area: f64,
}

impl OpenSheet {
    pub fn new(number: u32, dimensions: SheetDimensions, options: &Options) -> Self {
        Self {
            number,
            dimensions,
            margin: options.margin,
            free_space: FreeSpace::new(
                &dimensions,
                options.margin,
                options.cut_width,
                options.min_usable_size,
            ),
            placements: Vec::new(),
            used_area: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Binds `panel` to the top-left corner of the free rectangle at `rect_index`.
    pub fn commit(&mut self, panel: &UnitPanel, rect_index: usize, orientation: Orientation) {
        let rect = self.free_space.rects()[rect_index];
        let Orientation {
            width,
            height,
            rotated,
        } = orientation;

        tracing::trace!(
            sheet = self.number,
            panel = %panel.id,
            x = rect.x,
            y = rect.y,
            rotated,
            "placed panel"
        );

        self.placements.push(PlacedPanel {
            id: panel.id.clone(),
            x: rect.x,
            y: rect.y,
            width,
            height,
            rotated,
            original_width: panel.width,
            original_height: panel.height,
        });
        self.used_area += width * height;
        self.free_space.commit_placement(rect_index, width, height);
    }
}
