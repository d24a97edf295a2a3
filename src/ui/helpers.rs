//! Shared rendering utilities.

/// Positions the cursor at a specific row and column.
///
/// Uses the ANSI sequence `\u{1b}[{row};{col}H`. Coordinates are 1-indexed.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}
