use std::fmt;

use super::grid::Grid;
use super::slot::Slot;

const CELL_WIDTH: usize = 7;

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat((CELL_WIDTH + 1) * self.size() - 1);
        for (idx, line) in self.cells().iter().enumerate() {
            if idx > 0 {
                writeln!(f, "{rule}")?;
            }
            let row: Vec<String> = line.iter().copied().map(format_val).collect();
            writeln!(f, "{}", row.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(slot: Slot) -> String {
    match slot.value() {
        None => " ".repeat(CELL_WIDTH),
        Some(v) => format!("{v:^width$}", width = CELL_WIDTH),
    }
}
