use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Panel to be cut - one line of the cut list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Panel {
    pub id: String,
    pub width: f64,
    pub height: f64,
    /// Informational only; every run targets a single stock thickness
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    pub quantity: u32,
    #[serde(default = "default_true")]
    pub allow_rotation: bool,
}

impl Panel {
    pub fn new(id: impl Into<String>, width: f64, height: f64, quantity: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            thickness: None,
            quantity,
            allow_rotation: true,
        }
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = Some(thickness);
        self
    }

    pub fn with_rotation(mut self, allow_rotation: bool) -> Self {
        self.allow_rotation = allow_rotation;
        self
    }
}

/// Stock sheet size used for every sheet of a run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SheetDimensions {
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
}

impl SheetDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            thickness: None,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Weights of the combined placement score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Corner/edge anchoring bonus
    pub fit: f64,
    /// Post-placement sheet waste
    pub waste: f64,
    /// Room left for the upcoming panels
    pub future: f64,
    /// Size of the placed panel itself
    pub utility: f64,
}

impl ScoreWeights {
    pub const DEFAULT_FIT: f64 = 0.3;
    pub const DEFAULT_WASTE: f64 = 0.2;
    pub const DEFAULT_FUTURE: f64 = 0.4;
    pub const DEFAULT_UTILITY: f64 = 0.1;

    pub(crate) fn values(&self) -> [f64; 4] {
        [self.fit, self.waste, self.future, self.utility]
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            fit: Self::DEFAULT_FIT,
            waste: Self::DEFAULT_WASTE,
            future: Self::DEFAULT_FUTURE,
            utility: Self::DEFAULT_UTILITY,
        }
    }
}

/// Tuning knobs for a single optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Saw kerf lost between two adjacent panels
    pub cut_width: f64,
    /// Unusable border on every edge of the sheet
    pub margin: f64,
    /// Global switch, ANDed with each panel's own flag
    pub allow_rotation: bool,
    /// Remainder rectangles narrower or shorter than this are discarded
    pub min_usable_size: f64,
    /// How many upcoming panels the future-opportunity score samples
    pub lookahead: usize,
    pub weights: ScoreWeights,
    /// Leftover rectangles at least this large count as reusable offcuts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_reusable_remnant_area: Option<f64>,
}

impl Options {
    pub const DEFAULT_CUT_WIDTH: f64 = 3.0;
    pub const DEFAULT_MARGIN: f64 = 10.0;
    pub const DEFAULT_MIN_USABLE_SIZE: f64 = 50.0;
    pub const DEFAULT_LOOKAHEAD: usize = 5;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cut_width(mut self, cut_width: f64) -> Self {
        self.cut_width = cut_width;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_rotation(mut self, allow_rotation: bool) -> Self {
        self.allow_rotation = allow_rotation;
        self
    }

    pub fn with_min_usable_size(mut self, size: f64) -> Self {
        self.min_usable_size = size;
        self
    }

    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_min_reusable_remnant_area(mut self, area: f64) -> Self {
        self.min_reusable_remnant_area = Some(area);
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            cut_width: Self::DEFAULT_CUT_WIDTH,
            margin: Self::DEFAULT_MARGIN,
            allow_rotation: true,
            min_usable_size: Self::DEFAULT_MIN_USABLE_SIZE,
            lookahead: Self::DEFAULT_LOOKAHEAD,
            weights: ScoreWeights::default(),
            min_reusable_remnant_area: None,
        }
    }
}

/// Input: what the caller provides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub sheet: SheetDimensions,
    pub panels: Vec<Panel>,
    #[serde(default)]
    pub options: Options,
}

/// One physical piece of a [`Panel`], quantity resolved to 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitPanel {
    pub id: String,
    pub source_id: String,
    /// 1-based instance number within the source panel
    pub instance: u32,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    pub allow_rotation: bool,
}

impl UnitPanel {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn longest_side(&self) -> f64 {
        self.width.max(self.height)
    }
}

/// Unused axis-aligned region of a sheet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreeRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FreeRect {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn can_host(&self, width: f64, height: f64) -> bool {
        width <= self.width + crate::EPSILON && height <= self.height + crate::EPSILON
    }
}

/// Panel bound to its final position on a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedPanel {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// True iff width/height are swapped relative to the original panel
    pub rotated: bool,
    pub original_width: f64,
    pub original_height: f64,
}

impl PlacedPanel {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Finalized stock sheet with its cutting layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    pub id: String,
    pub number: u32,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    /// Unusable border applied on every edge
    pub margin: f64,
    pub placed_panels: Vec<PlacedPanel>,
    /// Offcuts left over once the sheet was closed
    #[serde(default)]
    pub free_rects: Vec<FreeRect>,
    pub utilization: f64,
    pub waste_area: f64,
    pub used_area: f64,
}

/// Output: what the optimizer returns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub sheets: Vec<Sheet>,
    /// Pieces no sheet could host
    pub unplaced_panels: Vec<UnitPanel>,
    pub total_sheets: u32,
    pub total_area: f64,
    pub total_used_area: f64,
    pub total_waste: f64,
    /// Used area over total sheet area, 0..=1
    pub total_utilization: f64,
    /// Area of offcuts large enough to be reused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reusable_remnant_area: Option<f64>,
    /// Waste excluding reusable offcuts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_waste_area: Option<f64>,
    pub optimization_time_ms: f64,
}

impl OptimizationResult {
    pub fn placed_count(&self) -> usize {
        self.sheets.iter().map(|s| s.placed_panels.len()).sum()
    }
}

/// Error type for optimization
#[derive(Debug, thiserror::Error)]
pub enum OptimizerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
