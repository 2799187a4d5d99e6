use crate::config::PlannerConfig;
use crate::error::Result;
use crate::free_rects::FreeRectSet;
use crate::types::{PlacedCut, SheetResult, StockSpec, UnitPiece, round2};

/// One packed sheet plus the pieces that must roll over to the next one.
#[derive(Debug, Clone)]
pub struct SheetPass {
    pub result: SheetResult,
    pub rollover: Vec<UnitPiece>,
}

/// Packs `pieces` in order onto a fresh sheet. Pieces that do not fit are
/// skipped, not fatal: later, smaller pieces may still fit.
pub fn pack_sheet(
    stock: &StockSpec,
    pieces: &[UnitPiece],
    sheet_index: usize,
    config: &PlannerConfig,
) -> Result<SheetPass> {
    let mut free = FreeRectSet::new(stock.size());
    let mut cuts = Vec::new();
    let mut rollover = Vec::new();

    for piece in pieces {
        let Some(fit) = free.find_best_fit(piece.size, piece.can_rotate) else {
            rollover.push(*piece);
            continue;
        };

        let placed = fit.placed_size(piece.size);
        let origin = free.consume_and_split(fit.index, placed)?;
        cuts.push(PlacedCut {
            piece: piece.piece,
            x: origin.x,
            y: origin.y,
            width: placed.width,
            height: placed.height,
            rotated: fit.rotated,
        });
        free.merge_with(config.merge_policy);
    }

    let waste_pieces = free
        .into_rects()
        .into_iter()
        .filter(|r| r.width >= config.min_waste_size && r.height >= config.min_waste_size)
        .collect();

    let sheet_area = stock.area();
    let used_area: f64 = cuts.iter().map(PlacedCut::area).sum();
    let result = SheetResult {
        sheet_index,
        cuts,
        waste_pieces,
        used_area,
        waste_area: sheet_area - used_area,
        efficiency_percent: round2(used_area / sheet_area * 100.0),
        stock: *stock,
    };

    tracing::debug!(
        sheet = sheet_index,
        placed = result.cuts.len(),
        rollover = rollover.len(),
        efficiency = result.efficiency_percent,
        "packed sheet"
    );

    Ok(SheetPass { result, rollover })
}
