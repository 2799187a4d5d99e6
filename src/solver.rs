use rayon::prelude::*;

use crate::allocator::allocate;
use crate::config::PlannerConfig;
use crate::error::Result;
use crate::types::{CutRequest, PackingPlan, SheetResult, SortStrategy, StockSpec, UnitPiece};

pub struct Solver {
    stock: StockSpec,
    cuts: Vec<CutRequest>,
    config: PlannerConfig,
}

impl Solver {
    pub fn new(stock: StockSpec, cuts: Vec<CutRequest>, config: PlannerConfig) -> Self {
        Self {
            stock,
            cuts,
            config,
        }
    }

    /// Packs every sort strategy and keeps the plan with the highest aggregate
    /// efficiency. Ties go to the strategy evaluated first.
    pub fn solve(&self) -> Result<PackingPlan> {
        let mut best: Option<PackingPlan> = None;
        for plan in self.candidates()? {
            let better = best
                .as_ref()
                .is_none_or(|b| plan.aggregate_efficiency() > b.aggregate_efficiency());
            if better {
                best = Some(plan);
            }
        }

        Ok(best.unwrap_or_else(|| PackingPlan {
            strategy: SortStrategy::Area,
            stock: self.stock,
            sheets: vec![],
        }))
    }

    /// One plan per strategy, in [`SortStrategy::ALL`] order.
    pub fn candidates(&self) -> Result<Vec<PackingPlan>> {
        let pieces = self.expand_demands();
        let plans: Vec<Result<PackingPlan>> = if self.config.parallel {
            SortStrategy::ALL
                .par_iter()
                .map(|&strategy| self.plan_for(&pieces, strategy))
                .collect()
        } else {
            SortStrategy::ALL
                .iter()
                .map(|&strategy| self.plan_for(&pieces, strategy))
                .collect()
        };
        plans.into_iter().collect()
    }

    fn plan_for(&self, pieces: &[UnitPiece], strategy: SortStrategy) -> Result<PackingPlan> {
        let ordered = Self::order(pieces, strategy);
        let sheets = allocate(&self.stock, ordered, &self.config)?;
        let plan = PackingPlan {
            strategy,
            stock: self.stock,
            sheets,
        };
        tracing::debug!(
            %strategy,
            sheets = plan.sheet_count(),
            efficiency = plan.aggregate_efficiency(),
            "strategy evaluated"
        );
        Ok(plan)
    }

    /// One unit piece per requested quantity, in request order.
    pub fn expand_demands(&self) -> Vec<UnitPiece> {
        let mut pieces = Vec::new();
        for (index, cut) in self.cuts.iter().enumerate() {
            let unit = UnitPiece {
                piece: index,
                size: cut.size(),
                can_rotate: cut.can_rotate && self.config.allow_rotation,
            };
            pieces.extend(std::iter::repeat_n(unit, cut.quantity as usize));
        }
        pieces
    }

    /// Stable descending sort on the strategy's key.
    pub fn order(pieces: &[UnitPiece], strategy: SortStrategy) -> Vec<UnitPiece> {
        let mut ordered = pieces.to_vec();
        match strategy {
            SortStrategy::Area => ordered.sort_by(|a, b| b.size.area().total_cmp(&a.size.area())),
            SortStrategy::Width => ordered.sort_by(|a, b| b.size.width.total_cmp(&a.size.width)),
            SortStrategy::Height => {
                ordered.sort_by(|a, b| b.size.height.total_cmp(&a.size.height))
            }
        }
        ordered
    }
}

/// Computes the most material-efficient cutting plan for `cuts` on sheets of `stock`.
pub fn compute_plan(
    stock: StockSpec,
    cuts: &[CutRequest],
    allow_global_rotation: bool,
) -> Result<Vec<SheetResult>> {
    let config = PlannerConfig {
        allow_rotation: allow_global_rotation,
        ..PlannerConfig::default()
    };
    Ok(Solver::new(stock, cuts.to_vec(), config).solve()?.sheets)
}
