use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PlanError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Interchangeable stock sheets of one size. `quantity` is advisory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockSpec {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_quantity", deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
}

impl StockSpec {
    pub fn new(width: f64, height: f64, quantity: u32) -> Self {
        Self {
            width,
            height,
            quantity,
        }
    }

    pub fn size(&self) -> Rect {
        Rect::new(self.width, self.height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) || !self.area().is_finite() {
            return Err(PlanError::InvalidInput(format!(
                "stock dimensions must be positive, got {}",
                self.size()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutRequest {
    pub width: f64,
    pub height: f64,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
    #[serde(default = "default_true")]
    pub can_rotate: bool,
}

impl CutRequest {
    pub fn new(width: f64, height: f64, quantity: u32) -> Self {
        Self {
            width,
            height,
            quantity,
            can_rotate: true,
        }
    }

    pub fn fixed(self) -> Self {
        Self {
            can_rotate: false,
            ..self
        }
    }

    pub fn size(&self) -> Rect {
        Rect::new(self.width, self.height)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) || !self.size().area().is_finite() {
            return Err(PlanError::InvalidInput(format!(
                "cut dimensions must be positive, got {}",
                self.size()
            )));
        }
        if self.quantity == 0 {
            return Err(PlanError::InvalidInput(format!(
                "cut {} must have a quantity of at least 1",
                self.size()
            )));
        }
        Ok(())
    }
}

/// Checks the caller-side preconditions of [`crate::solver::compute_plan`].
pub fn validate_input(stock: &StockSpec, cuts: &[CutRequest]) -> Result<()> {
    stock.validate()?;
    cuts.iter().try_for_each(CutRequest::validate)
}

/// One unit of demand. `piece` is the index of the originating [`CutRequest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitPiece {
    pub piece: usize,
    pub size: Rect,
    pub can_rotate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreeRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FreeRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Rect {
        Rect::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedCut {
    pub piece: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

impl PlacedCut {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Size as requested, undoing any rotation.
    pub fn requested_size(&self) -> Rect {
        let placed = Rect::new(self.width, self.height);
        if self.rotated { placed.rotated() } else { placed }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetResult {
    /// 1-based position of the sheet in its plan.
    pub sheet_index: usize,
    pub cuts: Vec<PlacedCut>,
    pub waste_pieces: Vec<FreeRect>,
    pub used_area: f64,
    pub waste_area: f64,
    pub efficiency_percent: f64,
    pub stock: StockSpec,
}

/// Ordering applied to the unit pieces before packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortStrategy {
    Area,
    Width,
    Height,
}

impl SortStrategy {
    /// Evaluation order; earlier strategies win ties.
    pub const ALL: [SortStrategy; 3] = [Self::Area, Self::Width, Self::Height];
}

impl std::fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Area => "area",
            Self::Width => "width",
            Self::Height => "height",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingPlan {
    pub strategy: SortStrategy,
    pub stock: StockSpec,
    pub sheets: Vec<SheetResult>,
}

impl PackingPlan {
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn total_used_area(&self) -> f64 {
        self.sheets.iter().map(|s| s.used_area).sum()
    }

    pub fn total_sheet_area(&self) -> f64 {
        self.sheets.iter().map(|s| s.stock.area()).sum()
    }

    /// Used area over total sheet area, as a ratio in `0.0..=1.0`.
    pub fn aggregate_efficiency(&self) -> f64 {
        let total = self.total_sheet_area();
        if total == 0.0 {
            return 0.0;
        }
        self.total_used_area() / total
    }

    /// True when the plan needs more sheets than the stock says are available.
    pub fn exceeds_supply(&self) -> bool {
        self.sheet_count() > self.stock.quantity as usize
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn default_true() -> bool {
    true
}

fn default_quantity() -> u32 {
    1
}

/// Accepts any JSON number with an integral value (`3` or `3.0`).
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(D::Error::custom(format!(
            "expected a non-negative integer, got {value}"
        )));
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_rotation_and_fit() {
        let r = Rect::new(60.0, 40.0);
        assert_eq!(r.rotated(), Rect::new(40.0, 60.0));
        assert!(r.fits_in(&Rect::new(60.0, 40.0)));
        assert!(!r.fits_in(&Rect::new(40.0, 60.0)));
        assert!(r.rotated().fits_in(&Rect::new(40.0, 60.0)));
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        assert!(StockSpec::new(0.0, 10.0, 1).validate().is_err());
        assert!(StockSpec::new(10.0, f64::NAN, 1).validate().is_err());
        assert!(CutRequest::new(10.0, 10.0, 0).validate().is_err());
        assert!(CutRequest::new(-1.0, 10.0, 1).validate().is_err());
        assert!(
            validate_input(
                &StockSpec::new(100.0, 100.0, 1),
                &[CutRequest::new(10.0, 10.0, 2)]
            )
            .is_ok()
        );
    }

    #[test]
    fn test_quantity_accepts_integral_floats() {
        let cut: CutRequest =
            serde_json::from_str(r#"{"width": 10, "height": 5, "quantity": 3.0}"#).unwrap();
        assert_eq!(cut.quantity, 3);
        assert!(cut.can_rotate);

        let err = serde_json::from_str::<CutRequest>(
            r#"{"width": 10, "height": 5, "quantity": 2.5}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_stock_quantity_defaults_to_one() {
        let stock: StockSpec = serde_json::from_str(r#"{"width": 244, "height": 122}"#).unwrap();
        assert_eq!(stock.quantity, 1);
    }

    #[test]
    fn test_requested_size_undoes_rotation() {
        let cut = PlacedCut {
            piece: 0,
            x: 0.0,
            y: 0.0,
            width: 50.0,
            height: 40.0,
            rotated: true,
        };
        assert_eq!(cut.requested_size(), Rect::new(40.0, 50.0));
    }

    #[test]
    fn test_empty_plan_efficiency_is_zero() {
        let plan = PackingPlan {
            strategy: SortStrategy::Area,
            stock: StockSpec::new(100.0, 100.0, 1),
            sheets: vec![],
        };
        assert_eq!(plan.aggregate_efficiency(), 0.0);
        assert!(!plan.exceeds_supply());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(88.0), 88.0);
        assert_eq!(round2(33.33333), 33.33);
        assert_eq!(round2(66.666), 66.67);
    }
}
