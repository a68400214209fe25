use super::free_space::FreeSpace;
use super::sheet::OpenSheet;
use super::*;

/// Oriented footprint of a panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Orientation {
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

/// Best next move found on a sheet.
#[derive(Debug, Clone, Copy)]
pub(super) struct Candidate {
    /// Index into the remaining-panel list
    pub panel_index: usize,
    /// Index into the sheet's free rectangles
    pub rect_index: usize,
    pub orientation: Orientation,
    pub score: f64,
}

impl Optimizer {
    /// Legal orientations of a panel: as given, then swapped when rotation is
    /// allowed and the panel is not square.
    pub(super) fn orientations(&self, panel: &UnitPanel) -> impl Iterator<Item = Orientation> {
        let upright = Orientation {
            width: panel.width,
            height: panel.height,
            rotated: false,
        };
        let can_rotate = self.request.options.allow_rotation
            && panel.allow_rotation
            && panel.width != panel.height;
        let rotated = can_rotate.then_some(Orientation {
            width: panel.height,
            height: panel.width,
            rotated: true,
        });

        std::iter::once(upright).chain(rotated)
    }

    /// Evaluates every (panel, orientation, free rectangle) triple and returns the
    /// highest scoring one. Ties keep the first candidate in evaluation order.
    pub(super) fn select_placement(
        &self,
        sheet: &OpenSheet,
        remaining: &[UnitPanel],
    ) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for (panel_index, panel) in remaining.iter().enumerate() {
            for orientation in self.orientations(panel) {
                for (rect_index, rect) in sheet
                    .free_space
                    .find_candidates(orientation.width, orientation.height)
                {
                    let score = self.score_placement(
                        sheet,
                        remaining,
                        panel_index,
                        rect_index,
                        rect,
                        orientation,
                    );

                    match best {
                        Some(current) if score <= current.score => {}
                        _ => {
                            best = Some(Candidate {
                                panel_index,
                                rect_index,
                                orientation,
                                score,
                            });
                        }
                    }
                }
            }
        }

        best
    }

    /// Weighted sum of the fit, waste, future-opportunity and utility scores.
    fn score_placement(
        &self,
        sheet: &OpenSheet,
        remaining: &[UnitPanel],
        panel_index: usize,
        rect_index: usize,
        rect: &FreeRect,
        orientation: Orientation,
    ) -> f64 {
        let weights = &self.request.options.weights;
        let area = orientation.width * orientation.height;

        let fit = self.fit_score(rect.x, rect.y);
        let waste = self.waste_score(sheet, area);
        let future = self.future_score(
            &sheet.free_space,
            remaining,
            panel_index,
            rect_index,
            orientation,
        );
        let utility = self.utility_score(area);

        weights.fit * fit + weights.waste * waste + weights.future * future + weights.utility * utility
    }

    /// Rewards placements anchored at the origin corner or along an origin edge
    /// of the usable area.
    fn fit_score(&self, x: f64, y: f64) -> f64 {
        let margin = self.request.options.margin;
        let on_left = (x - margin).abs() < EPSILON;
        let on_top = (y - margin).abs() < EPSILON;

        match (on_left, on_top) {
            (true, true) => 1.0,
            (true, false) | (false, true) => 0.5,
            (false, false) => 0.0,
        }
    }

    /// One minus the sheet's waste fraction once the panel is in.
    fn waste_score(&self, sheet: &OpenSheet, area: f64) -> f64 {
        let sheet_area = sheet.dimensions.area();
        let waste_fraction = ((sheet_area - (sheet.used_area + area)) / sheet_area).clamp(0.0, 1.0);
        1.0 - waste_fraction
    }

    /// Share (by area) of the next few remaining panels that would still fit
    /// somewhere after this placement.
    fn future_score(
        &self,
        free_space: &FreeSpace,
        remaining: &[UnitPanel],
        panel_index: usize,
        rect_index: usize,
        orientation: Orientation,
    ) -> f64 {
        let mut preview = free_space.clone();
        preview.commit_placement(rect_index, orientation.width, orientation.height);

        let mut sampled_area = 0.0;
        let mut placeable_area = 0.0;

        let upcoming = remaining
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != panel_index)
            .map(|(_, panel)| panel)
            .take(self.request.options.lookahead);

        for panel in upcoming {
            let area = panel.area();
            sampled_area += area;
            if self
                .orientations(panel)
                .any(|o| preview.fits_anywhere(o.width, o.height))
            {
                placeable_area += area;
            }
        }

        if sampled_area > 0.0 {
            placeable_area / sampled_area
        } else {
            1.0
        }
    }

    /// Panel area relative to the usable area of a sheet.
    fn utility_score(&self, area: f64) -> f64 {
        let usable = self.usable_area();
        if usable > 0.0 {
            (area / usable).min(1.0)
        } else {
            0.0
        }
    }
}
