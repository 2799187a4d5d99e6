use crate::config::PlannerConfig;
use crate::error::{PlanError, Result};
use crate::sheet::pack_sheet;
use crate::types::{SheetResult, StockSpec, UnitPiece};

/// Opens sheets until every piece is placed.
///
/// `stock.quantity` is not a cap: demand beyond supply still gets sheets, and
/// callers that need a hard limit check the returned sheet count. A pass that
/// places nothing means the leftovers can never fit, so it fails with
/// [`PlanError::UnplaceablePiece`] instead of looping.
pub fn allocate(
    stock: &StockSpec,
    pieces: Vec<UnitPiece>,
    config: &PlannerConfig,
) -> Result<Vec<SheetResult>> {
    let mut sheets = Vec::new();
    let mut unplaced = pieces;

    while !unplaced.is_empty() {
        let pass = pack_sheet(stock, &unplaced, sheets.len() + 1, config)?;

        if pass.rollover.len() == unplaced.len() {
            let piece = pass.rollover[0];
            tracing::warn!(
                piece = piece.piece,
                size = %piece.size,
                stock = %stock.size(),
                "piece cannot be placed on an empty sheet"
            );
            return Err(PlanError::UnplaceablePiece {
                width: piece.size.width,
                height: piece.size.height,
                stock_width: stock.width,
                stock_height: stock.height,
            });
        }

        sheets.push(pass.result);
        unplaced = pass.rollover;
    }

    if sheets.len() > stock.quantity as usize {
        tracing::warn!(
            sheets = sheets.len(),
            available = stock.quantity,
            "plan needs more sheets than the stock supply"
        );
    }

    Ok(sheets)
}
