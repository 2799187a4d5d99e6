use serde::{Deserialize, Serialize};

use crate::types::{Rect, SheetResult, round2};

/// Identical requested sizes, counted across the whole plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutListEntry {
    pub width: f64,
    pub height: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLine {
    pub sheet_index: usize,
    pub pieces: usize,
    pub used_area: f64,
    pub waste_area: f64,
    pub efficiency_percent: f64,
}

impl std::fmt::Display for SheetLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sheet {}: cut {} piece{} ({:.2} used, {:.2} wasted, {:.2}%)",
            self.sheet_index,
            self.pieces,
            if self.pieces == 1 { "" } else { "s" },
            self.used_area,
            self.waste_area,
            self.efficiency_percent
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub sheet_count: usize,
    pub used_area: f64,
    pub waste_area: f64,
    /// Percentage, rounded to two decimals.
    pub efficiency_percent: f64,
    /// Area of leftovers large enough to be reported as waste pieces.
    pub reusable_area: f64,
    pub sheets: Vec<SheetLine>,
    pub cut_list: Vec<CutListEntry>,
}

impl PlanSummary {
    pub fn from_sheets(sheets: &[SheetResult]) -> Self {
        let used_area: f64 = sheets.iter().map(|s| s.used_area).sum();
        let waste_area: f64 = sheets.iter().map(|s| s.waste_area).sum();
        let total = used_area + waste_area;
        let efficiency_percent = if total > 0.0 {
            round2(used_area / total * 100.0)
        } else {
            0.0
        };
        let reusable_area = sheets
            .iter()
            .flat_map(|s| &s.waste_pieces)
            .map(|w| w.size().area())
            .sum();

        let lines = sheets
            .iter()
            .map(|s| SheetLine {
                sheet_index: s.sheet_index,
                pieces: s.cuts.len(),
                used_area: s.used_area,
                waste_area: s.waste_area,
                efficiency_percent: s.efficiency_percent,
            })
            .collect();

        Self {
            sheet_count: sheets.len(),
            used_area,
            waste_area,
            efficiency_percent,
            reusable_area,
            sheets: lines,
            cut_list: group_cuts(sheets),
        }
    }
}

/// Groups placed cuts by requested size, in first-seen order.
fn group_cuts(sheets: &[SheetResult]) -> Vec<CutListEntry> {
    let mut entries: Vec<CutListEntry> = Vec::new();
    for cut in sheets.iter().flat_map(|s| &s.cuts) {
        let Rect { width, height } = cut.requested_size();
        match entries
            .iter_mut()
            .find(|e| e.width == width && e.height == height)
        {
            Some(entry) => entry.count += 1,
            None => entries.push(CutListEntry {
                width,
                height,
                count: 1,
            }),
        }
    }
    entries
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Summary: {} sheet{} used, {:.2}% efficiency, {:.2} wasted ({:.2} reusable)",
            self.sheet_count,
            if self.sheet_count == 1 { "" } else { "s" },
            self.efficiency_percent,
            self.waste_area,
            self.reusable_area
        )?;
        for line in &self.sheets {
            writeln!(f, "  {line}")?;
        }
        writeln!(f, "Cut list:")?;
        for entry in &self.cut_list {
            writeln!(f, "  {} x {}x{}", entry.count, entry.width, entry.height)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::compute_plan;
    use crate::types::{CutRequest, StockSpec};

    #[test]
    fn test_summary_totals() {
        let stock = StockSpec::new(50.0, 50.0, 2);
        let sheets = compute_plan(stock, &[CutRequest::new(10.0, 10.0, 30)], true).unwrap();
        let summary = PlanSummary::from_sheets(&sheets);
        assert_eq!(summary.sheet_count, 2);
        assert_eq!(summary.used_area, 3000.0);
        assert_eq!(summary.waste_area, 2000.0);
        assert_eq!(summary.efficiency_percent, 60.0);
        assert_eq!(
            summary.cut_list,
            vec![CutListEntry {
                width: 10.0,
                height: 10.0,
                count: 30
            }]
        );
        assert_eq!(summary.sheets[1].pieces, 5);
    }

    #[test]
    fn test_cut_list_groups_rotated_cuts_by_requested_size() {
        let stock = StockSpec::new(100.0, 50.0, 1);
        let cuts = [
            CutRequest::new(50.0, 100.0, 1),
            CutRequest::new(50.0, 100.0, 1),
            CutRequest::new(10.0, 10.0, 2),
        ];
        let sheets = compute_plan(stock, &cuts, true).unwrap();
        let summary = PlanSummary::from_sheets(&sheets);
        assert_eq!(summary.cut_list.len(), 2);
        assert_eq!(summary.cut_list[0].count, 2);
        assert_eq!(
            (summary.cut_list[0].width, summary.cut_list[0].height),
            (50.0, 100.0)
        );
    }

    #[test]
    fn test_empty_plan_summary() {
        let summary = PlanSummary::from_sheets(&[]);
        assert_eq!(summary.sheet_count, 0);
        assert_eq!(summary.efficiency_percent, 0.0);
        assert!(summary.cut_list.is_empty());
    }

    #[test]
    fn test_display_lists_sheets_and_cuts() {
        let stock = StockSpec::new(100.0, 100.0, 1);
        let sheets = compute_plan(stock, &[CutRequest::new(100.0, 100.0, 1)], true).unwrap();
        let text = PlanSummary::from_sheets(&sheets).to_string();
        assert!(text.contains("1 sheet used, 100.00% efficiency"));
        assert!(text.contains("Sheet 1: cut 1 piece (10000.00 used"));
        assert!(text.contains("1 x 100x100"));
    }
}
