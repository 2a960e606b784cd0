//! ASCII rendering of the surface
//!
//! One glyph per slot: the occupant's opening move ('c' or 'd'), or '.'
//! for an empty slot, with a status line underneath.

use dilemma_core::{Position, Surface};

pub fn render(surface: &Surface) -> String {
    let width = surface.width() as usize;
    let mut out = String::with_capacity((width + 3) * (surface.height() as usize + 3));

    out.push('*');
    out.push_str(&"-".repeat(width));
    out.push_str("*\n");
    for y in 0..surface.height() as i32 {
        out.push('|');
        for x in 0..surface.width() as i32 {
            match surface.get(Position::new(x, y)) {
                Some(cell) => out.push(cell.gene().initial_move().glyph()),
                None => out.push('.'),
            }
        }
        out.push_str("|\n");
    }
    out.push('*');
    out.push_str(&"-".repeat(width));
    out.push_str("*\n");

    out.push_str(&format!(
        " population: {} | born: {} | died: {}",
        surface.population(),
        surface.total_born(),
        surface.total_died()
    ));
    out
}
