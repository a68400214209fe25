//! Invariants that must hold for any cut list, checked through the public API.

use panelcut_core::{
    optimize, OptimizationResult, Options, Panel, PlacedPanel, SheetDimensions,
};

const TOLERANCE: f64 = 1e-9;

fn kitchen_cut_list() -> Vec<Panel> {
    vec![
        Panel::new("side", 720.0, 560.0, 4),
        Panel::new("bottom", 764.0, 560.0, 2),
        Panel::new("shelf", 764.0, 540.0, 4),
        Panel::new("back", 800.0, 720.0, 2),
        Panel::new("door", 716.0, 396.0, 4).with_rotation(false),
        Panel::new("drawer_front", 796.0, 176.0, 6).with_rotation(false),
        Panel::new("plinth", 1600.0, 100.0, 2),
        Panel::new("filler", 60.0, 720.0, 2),
    ]
}

fn standard_sheet() -> SheetDimensions {
    SheetDimensions::new(2440.0, 1220.0)
}

fn run(panels: Vec<Panel>, sheet: SheetDimensions, options: Options) -> OptimizationResult {
    optimize(panels, sheet, options).unwrap()
}

/// Panels are separated by at least one kerf along some axis.
fn separated(a: &PlacedPanel, b: &PlacedPanel, kerf: f64) -> bool {
    let horizontal_gap = (b.x - (a.x + a.width)).max(a.x - (b.x + b.width));
    let vertical_gap = (b.y - (a.y + a.height)).max(a.y - (b.y + b.height));
    horizontal_gap >= kerf - TOLERANCE || vertical_gap >= kerf - TOLERANCE
}

mod invariants {
    use super::*;

    #[test]
    fn test_conservation() {
        let panels = kitchen_cut_list();
        let requested: u32 = panels.iter().map(|p| p.quantity).sum();

        let result = run(panels, standard_sheet(), Options::default());

        assert_eq!(
            result.placed_count() + result.unplaced_panels.len(),
            requested as usize
        );
        assert!(result.unplaced_panels.is_empty());
        assert!(result.sheets.len() >= 2);
    }

    #[test]
    fn test_bounds() {
        let result = run(kitchen_cut_list(), standard_sheet(), Options::default());

        for sheet in &result.sheets {
            assert!((0.0..=1.0).contains(&sheet.utilization));
            assert!(sheet.waste_area >= 0.0);
            assert!(!sheet.placed_panels.is_empty());
        }
        assert!((0.0..=1.0).contains(&result.total_utilization));
        assert_eq!(result.total_sheets as usize, result.sheets.len());

        let waste: f64 = result.sheets.iter().map(|s| s.waste_area).sum();
        assert!((result.total_waste - waste).abs() < 1e-6);
    }

    #[test]
    fn test_non_overlap_with_kerf() {
        let options = Options::default();
        let kerf = options.cut_width;
        let result = run(kitchen_cut_list(), standard_sheet(), options);

        for sheet in &result.sheets {
            let placed = &sheet.placed_panels;
            for (i, a) in placed.iter().enumerate() {
                for b in &placed[i + 1..] {
                    assert!(
                        separated(a, b, kerf),
                        "{} and {} overlap on {}",
                        a.id,
                        b.id,
                        sheet.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_free_rects_do_not_overlap_panels() {
        let result = run(kitchen_cut_list(), standard_sheet(), Options::default());

        for sheet in &result.sheets {
            for rect in &sheet.free_rects {
                for panel in &sheet.placed_panels {
                    let disjoint = rect.x >= panel.x + panel.width - TOLERANCE
                        || panel.x >= rect.x + rect.width - TOLERANCE
                        || rect.y >= panel.y + panel.height - TOLERANCE
                        || panel.y >= rect.y + rect.height - TOLERANCE;
                    assert!(disjoint, "free rect overlaps {} on {}", panel.id, sheet.id);
                }
            }
        }
    }

    #[test]
    fn test_containment() {
        let options = Options::default();
        let margin = options.margin;
        let result = run(kitchen_cut_list(), standard_sheet(), options);

        for sheet in &result.sheets {
            for panel in &sheet.placed_panels {
                assert!(panel.x >= margin - TOLERANCE);
                assert!(panel.y >= margin - TOLERANCE);
                assert!(panel.x + panel.width <= sheet.width - margin + TOLERANCE);
                assert!(panel.y + panel.height <= sheet.height - margin + TOLERANCE);
            }
        }
    }

    #[test]
    fn test_rotation_legality() {
        let result = run(kitchen_cut_list(), standard_sheet(), Options::default());

        for panel in result.sheets.iter().flat_map(|s| &s.placed_panels) {
            if panel.rotated {
                assert!(!panel.id.starts_with("door") && !panel.id.starts_with("drawer_front"));
                assert_ne!(panel.original_width, panel.original_height);
                assert_eq!(panel.width, panel.original_height);
                assert_eq!(panel.height, panel.original_width);
            } else {
                assert_eq!(panel.width, panel.original_width);
                assert_eq!(panel.height, panel.original_height);
            }
        }
    }

    #[test]
    fn test_global_rotation_switch() {
        let result = run(
            kitchen_cut_list(),
            standard_sheet(),
            Options::default().with_rotation(false),
        );

        assert!(result
            .sheets
            .iter()
            .flat_map(|s| &s.placed_panels)
            .all(|p| !p.rotated));
    }

    #[test]
    fn test_determinism() {
        let first = run(kitchen_cut_list(), standard_sheet(), Options::default());
        let second = run(kitchen_cut_list(), standard_sheet(), Options::default());

        assert_eq!(
            serde_json::to_string(&first.sheets).unwrap(),
            serde_json::to_string(&second.sheets).unwrap()
        );
        assert_eq!(first.unplaced_panels, second.unplaced_panels);
    }
}

mod scenarios {
    use super::*;

    #[test]
    fn test_oversized_panel_is_unplaced() {
        let result = run(
            vec![Panel::new("slab", 3000.0, 2500.0, 1)],
            standard_sheet(),
            Options::default(),
        );

        assert!(result.sheets.is_empty());
        assert_eq!(result.unplaced_panels.len(), 1);
        assert_eq!(result.unplaced_panels[0].id, "slab");
        assert_eq!(result.total_utilization, 0.0);
        assert_eq!(result.total_waste, 0.0);
    }

    #[test]
    fn test_exact_tiling_fills_one_sheet() {
        let result = run(
            vec![Panel::new("half", 500.0, 600.0, 2)],
            SheetDimensions::new(1000.0, 600.0),
            Options::default().with_cut_width(0.0).with_margin(0.0),
        );

        assert_eq!(result.sheets.len(), 1);
        assert!(result.unplaced_panels.is_empty());
        assert!((result.sheets[0].utilization - 1.0).abs() < 1e-9);
        assert!(result.sheets[0].free_rects.is_empty());
    }

    #[test]
    fn test_exact_tiling_of_inset_region() {
        let result = run(
            vec![Panel::new("half", 490.0, 580.0, 2)],
            SheetDimensions::new(1000.0, 600.0),
            Options::default().with_cut_width(0.0),
        );

        assert_eq!(result.sheets.len(), 1);
        assert!(result.unplaced_panels.is_empty());
        assert!((result.sheets[0].used_area - 980.0 * 580.0).abs() < 1e-9);
    }

    #[test]
    fn test_overflow_opens_second_sheet() {
        let result = run(
            vec![Panel::new("part", 400.0, 300.0, 6)],
            SheetDimensions::new(1000.0, 600.0),
            Options::default(),
        );

        assert!(result.sheets.len() >= 2);
        assert!(result.unplaced_panels.is_empty());
        assert_eq!(result.placed_count(), 6);
        let numbers: Vec<u32> = result.sheets.iter().map(|s| s.number).collect();
        assert_eq!(numbers, (1..=result.sheets.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_quantity_panel_never_appears() {
        let result = run(
            vec![
                Panel::new("ghost", 300.0, 300.0, 0),
                Panel::new("real", 300.0, 200.0, 1),
            ],
            standard_sheet(),
            Options::default(),
        );

        let ids: Vec<&str> = result
            .sheets
            .iter()
            .flat_map(|s| &s.placed_panels)
            .map(|p| p.id.as_str())
            .chain(result.unplaced_panels.iter().map(|p| p.id.as_str()))
            .collect();
        assert_eq!(ids, vec!["real"]);
    }

    #[test]
    fn test_square_panels_are_never_rotated() {
        let result = run(
            vec![Panel::new("square", 200.0, 200.0, 5)],
            SheetDimensions::new(1000.0, 600.0),
            Options::default(),
        );

        assert_eq!(result.placed_count(), 5);
        assert!(result
            .sheets
            .iter()
            .flat_map(|s| &s.placed_panels)
            .all(|p| !p.rotated));
    }

    #[test]
    fn test_empty_cut_list() {
        let result = run(vec![], standard_sheet(), Options::default());

        assert!(result.sheets.is_empty());
        assert!(result.unplaced_panels.is_empty());
        assert_eq!(result.total_sheets, 0);
    }

    #[test]
    fn test_rejects_non_positive_sheet() {
        let err = optimize(
            vec![Panel::new("a", 100.0, 100.0, 1)],
            SheetDimensions::new(2440.0, -1.0),
            Options::default(),
        );
        assert!(err.is_err());
    }
}
