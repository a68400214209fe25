use crate::types::*;
use crate::EPSILON;
use std::cmp::Ordering;
use std::time::Instant;

mod free_space;
mod selector;
mod sheet;
mod summary;

use sheet::OpenSheet;

/// Packs rectangular panels onto identical stock sheets using a largest-first
/// greedy heuristic with bounded look-ahead.
pub struct Optimizer {
    request: OptimizationRequest,
}

impl Optimizer {
    /// Validates requests and builds a new optimizer instance.
    pub fn new(request: OptimizationRequest) -> Result<Self> {
        let sheet = &request.sheet;
        if !is_positive(sheet.width) || !is_positive(sheet.height) {
            return Err(OptimizerError::InvalidInput(format!(
                "Sheet dimensions must be positive, got {}x{}",
                sheet.width, sheet.height
            )));
        }

        for panel in &request.panels {
            if !is_positive(panel.width) || !is_positive(panel.height) {
                return Err(OptimizerError::InvalidInput(format!(
                    "Panel '{}' has non-positive dimensions {}x{}",
                    panel.id, panel.width, panel.height
                )));
            }
        }

        let options = &request.options;
        for (name, value) in [
            ("cut_width", options.cut_width),
            ("margin", options.margin),
            ("min_usable_size", options.min_usable_size),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(OptimizerError::InvalidInput(format!(
                    "Option '{}' must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if let Some(area) = options.min_reusable_remnant_area {
            if !area.is_finite() || area < 0.0 {
                return Err(OptimizerError::InvalidInput(format!(
                    "Option 'min_reusable_remnant_area' must be a non-negative number, got {}",
                    area
                )));
            }
        }

        let weights = options.weights.values();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || weights.iter().all(|w| *w == 0.0)
        {
            return Err(OptimizerError::InvalidInput(
                "Score weights must be non-negative and not all zero".to_string(),
            ));
        }

        let usable_width = sheet.width - (options.margin * 2.0);
        let usable_height = sheet.height - (options.margin * 2.0);
        if usable_width <= 0.0 || usable_height <= 0.0 {
            return Err(OptimizerError::InvalidInput(format!(
                "Sheet {}x{} becomes unusable after applying a margin of {}",
                sheet.width, sheet.height, options.margin
            )));
        }

        Ok(Self { request })
    }

    /// Executes the full optimization flow and returns packed sheets.
    pub fn optimize(&self) -> OptimizationResult {
        let started = Instant::now();

        self.warn_thickness_mismatch();

        let mut units = self.expand_panels();
        sort_panels(&mut units);

        tracing::debug!(
            panels = units.len(),
            sheet_width = self.request.sheet.width,
            sheet_height = self.request.sheet.height,
            "starting optimization"
        );

        let (sheets, unplaced) = self.allocate(units);
        let result = self.build_result(sheets, unplaced, started.elapsed().as_secs_f64() * 1000.0);

        tracing::info!(
            sheets = result.total_sheets,
            unplaced = result.unplaced_panels.len(),
            utilization = result.total_utilization,
            elapsed_ms = result.optimization_time_ms,
            "optimization complete"
        );

        result
    }

    /// Duplicates panels according to their requested quantity.
    fn expand_panels(&self) -> Vec<UnitPanel> {
        let mut expanded = Vec::new();
        for panel in &self.request.panels {
            for i in 0..panel.quantity {
                expanded.push(UnitPanel {
                    id: if panel.quantity > 1 {
                        format!("{}_{}", panel.id, i + 1)
                    } else {
                        panel.id.clone()
                    },
                    source_id: panel.id.clone(),
                    instance: i + 1,
                    width: panel.width,
                    height: panel.height,
                    thickness: panel.thickness,
                    allow_rotation: panel.allow_rotation,
                });
            }
        }
        expanded
    }

    /// Fills sheets one at a time until every panel is placed or a fresh sheet
    /// cannot take any of the remaining ones.
    fn allocate(&self, mut remaining: Vec<UnitPanel>) -> (Vec<Sheet>, Vec<UnitPanel>) {
        let mut sheets = Vec::new();

        while !remaining.is_empty() {
            let number = sheets.len() as u32 + 1;
            let mut sheet = OpenSheet::new(number, self.request.sheet, &self.request.options);
            tracing::debug!(sheet = number, remaining = remaining.len(), "opened sheet");

            while let Some(candidate) = self.select_placement(&sheet, &remaining) {
                let panel = remaining.remove(candidate.panel_index);
                sheet.commit(&panel, candidate.rect_index, candidate.orientation);
            }

            if sheet.is_empty() {
                // Sheets never change size, so nothing left can ever be placed.
                tracing::debug!(
                    unplaced = remaining.len(),
                    "no remaining panel fits an empty sheet"
                );
                break;
            }

            sheets.push(self.finalize_sheet(sheet));
        }

        (sheets, remaining)
    }

    /// Area left once the margin is removed from every edge.
    fn usable_area(&self) -> f64 {
        let sheet = &self.request.sheet;
        let margin = self.request.options.margin;
        (sheet.width - margin * 2.0).max(0.0) * (sheet.height - margin * 2.0).max(0.0)
    }

    fn warn_thickness_mismatch(&self) {
        let Some(sheet_thickness) = self.request.sheet.thickness else {
            return;
        };

        for panel in &self.request.panels {
            if let Some(thickness) = panel.thickness {
                if (thickness - sheet_thickness).abs() > EPSILON {
                    tracing::warn!(
                        panel = %panel.id,
                        panel_thickness = thickness,
                        sheet_thickness,
                        "panel thickness differs from stock sheet"
                    );
                }
            }
        }
    }
}

/// Largest area first, longest side breaking ties.
fn sort_panels(panels: &mut [UnitPanel]) {
    panels.sort_by(|a, b| {
        b.area()
            .partial_cmp(&a.area())
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.longest_side()
                    .partial_cmp(&a.longest_side())
                    .unwrap_or(Ordering::Equal)
            })
    });
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
