use crate::types::SheetResult;

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stroke {
    Solid,
    Dotted,
}

/// ASCII diagram of one sheet: cuts as solid labelled boxes, reusable waste
/// pieces as dotted outlines. Rotated cuts carry an `r` after their label.
pub fn render_sheet(sheet: &SheetResult) -> String {
    let stock = sheet.stock;
    let scale = f64::min(MAX_WIDTH / stock.width, MAX_HEIGHT / stock.height);
    let grid_w = (stock.width * scale).round() as usize;
    let grid_h = (stock.height * scale).round() as usize;

    let mut result = format!(
        "Sheet {} ({}) - {:.2}% used\n",
        sheet.sheet_index,
        stock.size(),
        sheet.efficiency_percent
    );
    if grid_w == 0 || grid_h == 0 {
        return result;
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];
    let to_cell = |v: f64| (v * scale).round() as usize;

    for waste in &sheet.waste_pieces {
        let (sw, sh) = (to_cell(waste.width), to_cell(waste.height));
        if sw > 0 && sh > 0 {
            draw_rect(&mut grid, to_cell(waste.x), to_cell(waste.y), sw, sh, Stroke::Dotted);
        }
    }

    draw_rect(&mut grid, 0, 0, grid_w, grid_h, Stroke::Solid);

    for cut in &sheet.cuts {
        let sx = to_cell(cut.x);
        let sy = to_cell(cut.y);
        let sw = to_cell(cut.width);
        let sh = to_cell(cut.height);

        if sw == 0 || sh == 0 {
            continue;
        }

        draw_rect(&mut grid, sx, sy, sw, sh, Stroke::Solid);

        let label = format!(
            "{}x{}{}",
            cut.width,
            cut.height,
            if cut.rotated { "r" } else { "" }
        );
        let label_chars: Vec<char> = label.chars().collect();

        if sw > 2 {
            let cx = sx + sw / 2;
            let cy = sy + sh / 2;
            let start_x = cx.saturating_sub(label_chars.len() / 2);

            for (i, &ch) in label_chars.iter().enumerate() {
                let x = start_x + i;
                if x > sx && x < sx + sw && cy > sy && cy < sy + sh {
                    grid[cy][x] = ch;
                }
            }
        }
    }

    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize, stroke: Stroke) {
    let rows = grid.len();
    let cols = grid.first().map_or(0, Vec::len);

    let mut put = |row: usize, col: usize, ch: char| {
        if row >= rows || col >= cols {
            return;
        }
        let cell = &mut grid[row][col];
        *cell = match stroke {
            // Dotted outlines never overwrite solid ones
            Stroke::Dotted if *cell != ' ' => return,
            Stroke::Dotted => ch,
            Stroke::Solid => match (*cell, ch) {
                ('+', _) => '+',
                ('|', '-') | ('-', '|') => '+',
                _ => ch,
            },
        };
    };

    let (horizontal, vertical, corner) = match stroke {
        Stroke::Solid => ('-', '|', '+'),
        Stroke::Dotted => ('.', ':', '.'),
    };

    for i in x..=x + w {
        put(y, i, horizontal);
        put(y + h, i, horizontal);
    }
    for j in y..=y + h {
        put(j, x, vertical);
        put(j, x + w, vertical);
    }
    for &cx in &[x, x + w] {
        for &cy in &[y, y + h] {
            put(cy, cx, corner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::compute_plan;
    use crate::types::{CutRequest, StockSpec};

    #[test]
    fn test_render_single_piece() {
        let stock = StockSpec::new(100.0, 50.0, 1);
        let sheets = compute_plan(stock, &[CutRequest::new(100.0, 50.0, 1)], false).unwrap();
        let output = render_sheet(&sheets[0]);
        assert!(output.starts_with("Sheet 1 (100x50) - 100.00% used"));
        assert!(output.contains('+'));
        assert!(output.contains('-'));
        assert!(output.contains('|'));
        assert!(output.contains("100x50"));
        assert!(!output.contains(':'));
    }

    #[test]
    fn test_render_marks_rotation_and_waste() {
        let stock = StockSpec::new(200.0, 100.0, 1);
        let sheets = compute_plan(stock, &[CutRequest::new(60.0, 120.0, 1)], true).unwrap();
        let output = render_sheet(&sheets[0]);
        assert!(output.contains("120x60r"));
        // leftover strips are drawn dotted
        assert!(output.contains(':'));
    }

    #[test]
    fn test_render_border_survives_without_cuts() {
        let sheet = SheetResult {
            sheet_index: 1,
            cuts: vec![],
            waste_pieces: vec![],
            used_area: 0.0,
            waste_area: 10_000.0,
            efficiency_percent: 0.0,
            stock: StockSpec::new(100.0, 100.0, 1),
        };
        let output = render_sheet(&sheet);
        assert!(output.contains('+'));
    }
}
