// src/decompose.rs

use terrain::prelude::XZCoords;

use crate::component::ClosedComponent;

/// Smallest accepted extent on either axis.
pub const MIN_SIDE: usize = 2;

/// Axis-aligned rectangle of columns, origin at its smallest x and z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub origin: XZCoords,
    /// Extent along x.
    pub width: u32,
    /// Extent along z.
    pub length: u32,
}

impl Rect {
    pub fn area(&self) -> u32 {
        self.width * self.length
    }

    pub fn center(&self) -> XZCoords {
        XZCoords::new(self.origin.x + (self.width / 2) as i32, self.origin.z + (self.length / 2) as i32)
    }

    pub fn cells(&self) -> impl Iterator<Item = XZCoords> + '_ {
        (0..self.length as i32)
            .flat_map(move |dz| (0..self.width as i32).map(move |dx| XZCoords::new(self.origin.x + dx, self.origin.z + dz)))
    }
}

/// Occupancy of a component's bounding box, rows along z.
struct Grid {
    width: usize,
    length: usize,
    cells: Vec<bool>,
}

impl Grid {
    fn occupied(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.width + col]
    }

    fn clear(&mut self, row: usize, col: usize, rows: usize, cols: usize) {
        for r in row..row + rows {
            let start = r * self.width + col;
            self.cells[start..start + cols].iter_mut().for_each(|c| *c = false);
        }
    }
}

/// Candidate in grid space: (row, col, rows, cols).
#[derive(Clone, Copy)]
struct Candidate {
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
}

/// Splits a closed component into maximal rectangles of at least 2x2.
///
/// Greedy: take the largest all-member rectangle, remove it, repeat. Cells
/// that fit in no 2x2 are left uncovered. Among equal areas the first one
/// found wins, scanning rows by increasing z and, within a row, closing
/// histogram bars left to right.
pub fn decompose(component: &ClosedComponent) -> Vec<Rect> {
    let members = component.members();
    if members.is_empty() {
        return Vec::new();
    }
    let bounds = component.bounds();
    let (width, length) = (bounds.width(), bounds.length());
    if width < MIN_SIDE || length < MIN_SIDE {
        return Vec::new();
    }

    let mut grid = Grid { width, length, cells: vec![false; width * length] };
    for cell in members {
        let col = (cell.x - bounds.min_x) as usize;
        let row = (cell.z - bounds.min_z) as usize;
        grid.cells[row * width + col] = true;
    }

    let mut rects = Vec::new();
    while let Some(best) = largest_rectangle(&grid) {
        grid.clear(best.row, best.col, best.rows, best.cols);
        rects.push(Rect {
            origin: XZCoords::new(bounds.min_x + best.col as i32, bounds.min_z + best.row as i32),
            width: best.cols as u32,
            length: best.rows as u32,
        });
    }
    rects
}

fn largest_rectangle(grid: &Grid) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    let mut best_area = 0;
    let mut heights = vec![0usize; grid.width];
    let mut stack: Vec<(usize, usize)> = Vec::with_capacity(grid.width + 1);

    for row in 0..grid.length {
        for (col, h) in heights.iter_mut().enumerate() {
            *h = if grid.occupied(row, col) { *h + 1 } else { 0 };
        }

        stack.clear();
        // Trailing zero bar flushes the stack.
        for (i, h) in heights.iter().copied().chain(std::iter::once(0)).enumerate() {
            let mut start = i;
            while let Some(&(index, bar)) = stack.last() {
                if bar <= h {
                    break;
                }
                stack.pop();
                let cols = i - index;
                if cols >= MIN_SIDE && bar >= MIN_SIDE && cols * bar > best_area {
                    best_area = cols * bar;
                    best = Some(Candidate { row: row + 1 - bar, col: index, rows: bar, cols });
                }
                start = index;
            }
            stack.push((start, h));
        }
    }
    best
}
