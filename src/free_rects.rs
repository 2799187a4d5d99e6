use crate::config::MergePolicy;
use crate::error::{PlanError, Result};
use crate::types::{FreeRect, Rect};

/// Unused regions of one sheet. Rectangles never overlap a placed cut.
#[derive(Debug, Clone)]
pub struct FreeRectSet {
    rects: Vec<FreeRect>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestFit {
    pub index: usize,
    pub rect: FreeRect,
    pub rotated: bool,
    pub score: f64,
}

impl BestFit {
    /// Size of the piece as it will be laid on the sheet.
    pub fn placed_size(&self, piece: Rect) -> Rect {
        if self.rotated { piece.rotated() } else { piece }
    }
}

impl FreeRectSet {
    pub fn new(stock: Rect) -> Self {
        Self {
            rects: vec![FreeRect::new(0.0, 0.0, stock.width, stock.height)],
        }
    }

    pub fn from_rects(rects: Vec<FreeRect>) -> Self {
        Self { rects }
    }

    pub fn rects(&self) -> &[FreeRect] {
        &self.rects
    }

    pub fn into_rects(self) -> Vec<FreeRect> {
        self.rects
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Best short-side fit. Ties keep the earliest rectangle, normal orientation first.
    pub fn find_best_fit(&self, piece: Rect, allow_rotation: bool) -> Option<BestFit> {
        let mut best: Option<BestFit> = None;

        for (index, free) in self.rects.iter().enumerate() {
            let mut consider = |placed: Rect, rotated: bool| {
                if !placed.fits_in(&free.size()) {
                    return;
                }
                let score = Self::score(placed, free.size());
                if best.is_none_or(|b| score < b.score) {
                    best = Some(BestFit {
                        index,
                        rect: *free,
                        rotated,
                        score,
                    });
                }
            };

            consider(piece, false);
            if allow_rotation {
                consider(piece.rotated(), true);
            }
        }

        best
    }

    fn score(placed: Rect, free: Rect) -> f64 {
        f64::min(free.width - placed.width, free.height - placed.height)
    }

    /// Removes the rectangle at `index` and guillotine-splits what the placed
    /// piece leaves of it. Returns the consumed rectangle.
    pub fn consume_and_split(&mut self, index: usize, placed: Rect) -> Result<FreeRect> {
        if index >= self.rects.len() {
            return Err(PlanError::InvariantViolation(format!(
                "free rectangle {index} does not exist ({} available)",
                self.rects.len()
            )));
        }
        let free = self.rects.remove(index);

        let remaining_w = free.width - placed.width;
        let remaining_h = free.height - placed.height;
        if remaining_w < 0.0 || remaining_h < 0.0 {
            return Err(PlanError::InvariantViolation(format!(
                "piece {placed} does not fit free rectangle {}",
                free.size()
            )));
        }

        let right_x = free.x + placed.width;
        let below_y = free.y + placed.height;

        if remaining_w <= remaining_h {
            // Narrow strip beside the piece, full-width strip below it.
            self.push_non_empty(FreeRect::new(right_x, free.y, remaining_w, placed.height));
            self.push_non_empty(FreeRect::new(free.x, below_y, free.width, remaining_h));
        } else {
            // Short strip below the piece, full-height strip beside it.
            self.push_non_empty(FreeRect::new(free.x, below_y, placed.width, remaining_h));
            self.push_non_empty(FreeRect::new(right_x, free.y, remaining_w, free.height));
        }

        Ok(free)
    }

    fn push_non_empty(&mut self, rect: FreeRect) {
        if rect.width > 0.0 && rect.height > 0.0 {
            self.rects.push(rect);
        }
    }

    /// One pass over all pairs, coalescing rectangles that share a full edge.
    /// Returns whether anything merged.
    pub fn merge(&mut self) -> bool {
        let mut merged = false;
        let mut i = 0;
        while i < self.rects.len() {
            let mut j = i + 1;
            while j < self.rects.len() {
                if let Some(m) = Self::try_merge(self.rects[i], self.rects[j]) {
                    self.rects[i] = m;
                    self.rects.remove(j);
                    merged = true;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
        merged
    }

    pub fn merge_with(&mut self, policy: MergePolicy) {
        match policy {
            MergePolicy::SinglePass => {
                self.merge();
            }
            MergePolicy::FixedPoint => while self.merge() {},
        }
    }

    fn try_merge(a: FreeRect, b: FreeRect) -> Option<FreeRect> {
        // Side by side: same y, same height
        if a.y == b.y && a.height == b.height {
            if a.x + a.width == b.x {
                return Some(FreeRect::new(a.x, a.y, a.width + b.width, a.height));
            }
            if b.x + b.width == a.x {
                return Some(FreeRect::new(b.x, b.y, a.width + b.width, a.height));
            }
        }
        // Stacked: same x, same width
        if a.x == b.x && a.width == b.width {
            if a.y + a.height == b.y {
                return Some(FreeRect::new(a.x, a.y, a.width, a.height + b.height));
            }
            if b.y + b.height == a.y {
                return Some(FreeRect::new(b.x, b.y, a.width, a.height + b.height));
            }
        }
        None
    }
}
