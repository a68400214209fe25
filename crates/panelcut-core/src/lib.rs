//! Rectangular cutting-stock optimizer.
//!
//! Packs a cut list of rectangular panels onto as few identical stock sheets as
//! a greedy, look-ahead heuristic can manage, and reports the layout of every
//! sheet together with utilization and waste figures.
//!
//! ```
//! use panelcut_core::{optimize, Options, Panel, SheetDimensions};
//!
//! let panels = vec![Panel::new("side", 720.0, 560.0, 2), Panel::new("shelf", 560.0, 300.0, 3)];
//! let result = optimize(panels, SheetDimensions::new(2440.0, 1220.0), Options::default()).unwrap();
//!
//! assert_eq!(result.sheets.len(), 1);
//! assert!(result.unplaced_panels.is_empty());
//! ```

pub mod optimizer;
pub mod types;

pub use optimizer::Optimizer;
pub use types::*;

/// Tolerance for geometric comparisons.
pub(crate) const EPSILON: f64 = 1e-9;

/// Runs a complete optimization for one stock sheet size.
///
/// Panels that cannot be placed end up in
/// [`OptimizationResult::unplaced_panels`]; only malformed input is an error.
pub fn optimize(
    panels: Vec<Panel>,
    sheet: SheetDimensions,
    options: Options,
) -> Result<OptimizationResult> {
    Optimizer::new(OptimizationRequest {
        sheet,
        panels,
        options,
    })
    .map(|optimizer| optimizer.optimize())
}
