use super::*;

impl Optimizer {
    /// Closes an open sheet and computes its utilization and waste.
    pub(super) fn finalize_sheet(&self, sheet: OpenSheet) -> Sheet {
        let sheet_area = sheet.dimensions.area();
        let used_area: f64 = sheet.placements.iter().map(PlacedPanel::area).sum();
        let waste_area = (sheet_area - used_area).max(0.0);
        let utilization = utilization(used_area, sheet_area);

        tracing::debug!(
            sheet = sheet.number,
            placed = sheet.placements.len(),
            utilization,
            free_area = sheet.free_space.total_area(),
            "closed sheet"
        );

        Sheet {
            id: format!("sheet_{}", sheet.number),
            number: sheet.number,
            width: sheet.dimensions.width,
            height: sheet.dimensions.height,
            thickness: sheet.dimensions.thickness,
            margin: sheet.margin,
            placed_panels: sheet.placements,
            free_rects: sheet.free_space.into_rects(),
            utilization,
            waste_area,
            used_area,
        }
    }

    /// Aggregates run-wide totals and optional remnant statistics.
    pub(super) fn build_result(
        &self,
        sheets: Vec<Sheet>,
        unplaced_panels: Vec<UnitPanel>,
        optimization_time_ms: f64,
    ) -> OptimizationResult {
        let total_area: f64 = sheets.iter().map(|s| s.width * s.height).sum();
        let total_used_area: f64 = sheets.iter().map(|s| s.used_area).sum();
        let total_waste: f64 = sheets.iter().map(|s| s.waste_area).sum();

        let (reusable_remnant_area, actual_waste_area) =
            match self.request.options.min_reusable_remnant_area {
                Some(min_area) => {
                    // Free rectangles never overlap, so their areas can be summed directly
                    let reusable: f64 = sheets
                        .iter()
                        .flat_map(|s| &s.free_rects)
                        .map(FreeRect::area)
                        .filter(|area| *area >= min_area)
                        .sum();
                    let reusable = reusable.min(total_waste);
                    (Some(reusable), Some(total_waste - reusable))
                }
                None => (None, None),
            };

        OptimizationResult {
            total_sheets: sheets.len() as u32,
            sheets,
            unplaced_panels,
            total_area,
            total_used_area,
            total_waste,
            total_utilization: utilization(total_used_area, total_area),
            reusable_remnant_area,
            actual_waste_area,
            optimization_time_ms,
        }
    }
}

fn utilization(used_area: f64, total_area: f64) -> f64 {
    if total_area > 0.0 {
        (used_area / total_area).min(1.0)
    } else {
        0.0
    }
}
