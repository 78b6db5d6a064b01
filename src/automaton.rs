use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;

// ==================== Constants ====================
/// side length of the (square) grid, border included
pub const SIZE: usize = 15;

// TABLE:
// ┌─────────────────────────── Neighbour Rule ───────────────────────────┐
// │  alive neighbours │ next state                                       │
// ├───────────────────┼──────────────────────────────────────────────────┤
// │        3          │ alive (birth, or survival)                       │
// │        2          │ unchanged (alive stays alive, dead stays dead)   │
// │   0,1,4,5,6,7,8   │ dead                                             │
// └───────────────────┴──────────────────────────────────────────────────┘
const BIRTH: u8 = 3;
const NEUTRAL: u8 = 2;

#[rustfmt::skip]
const SEED: [[u8; SIZE]; SIZE] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 1, 1, 1, 1, 1, 1, 0, 1, 1, 0, 0, 0],
    [0, 0, 0, 1, 1, 1, 1, 1, 1, 0, 1, 1, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0],
    [0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0],
    [0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0],
    [0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0],
    [0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 1, 1, 0, 1, 1, 1, 1, 1, 1, 0, 0, 0],
    [0, 0, 0, 1, 1, 0, 1, 1, 1, 1, 1, 1, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

// ==================== Structs ====================
/// Square Game of Life board
/// - `true` is alive, `false` is dead
/// - row/column 0 and SIZE - 1 are border cells : always dead, never
/// evaluated, they only exist so interior lookups never go out of bounds
/// - `Copy` : step() hands back a whole new board every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    cells: [[bool; SIZE]; SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self::dead()
    }
}

impl Grid {
    /// every cell dead
    pub fn dead() -> Self {
        Grid {
            cells: [[false; SIZE]; SIZE],
        }
    }

    /// The fixed board shown while the module loads
    pub fn seed() -> Self {
        let mut grid = Grid::dead();
        for (y, row) in SEED.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                grid.cells[y][x] = cell == 1;
            }
        }
        grid
    }

    pub fn is_border(y: usize, x: usize) -> bool {
        y == 0 || x == 0 || y == SIZE - 1 || x == SIZE - 1
    }

    /// out of range reads are dead
    pub fn get(&self, y: usize, x: usize) -> bool {
        self.cells
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// Set an interior cell
    /// - border cells are refused so the border invariant can't be broken
    pub fn set(&mut self, y: usize, x: usize, alive: bool) -> Result<()> {
        if y >= SIZE || x >= SIZE {
            bail!("Cell ({}, {}) is outside the {}x{} grid", y, x, SIZE, SIZE);
        }
        if Self::is_border(y, x) {
            bail!("Cell ({}, {}) is a border cell and must stay dead", y, x);
        }
        self.cells[y][x] = alive;
        Ok(())
    }

    /// number of alive cells among the 8 around (y, x)
    /// - cells off the board count as dead, border coordinates are fine
    pub fn neighbors(&self, y: usize, x: usize) -> u8 {
        let mut count = 0;
        for ny in y.saturating_sub(1)..=y.saturating_add(1) {
            for nx in x.saturating_sub(1)..=x.saturating_add(1) {
                if (ny, nx) != (y, x) && self.get(ny, nx) {
                    count += 1;
                }
            }
        }
        count
    }

    /// ::step computes the NEXT board from this one
    /// - pure : `self` is only read, the result is a fresh board
    /// - border cells are left dead in the result
    pub fn step(&self) -> Grid {
        let mut next = Grid::dead();
        for y in 1..SIZE - 1 {
            for x in 1..SIZE - 1 {
                next.cells[y][x] = match self.neighbors(y, x) {
                    BIRTH => true,
                    NEUTRAL => self.cells[y][x],
                    _ => false,
                };
            }
        }
        next
    }

    /// (y, x) of every alive interior cell, row major
    pub fn alive_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..SIZE - 1)
            .flat_map(|y| (1..SIZE - 1).map(move |x| (y, x)))
            .filter(move |&(y, x)| self.cells[y][x])
    }

    pub fn population(&self) -> usize {
        self.alive_cells().count()
    }

    /// Build a board from a Run Length Encoded pattern
    /// - `#` lines are comments
    /// - header `x = W, y = H[, rule = ...]` is required
    /// - the pattern is centred inside the interior
    /// - any run longer than the declared size is an error, so a config
    /// supplied pattern can never write outside the board
    pub fn from_rle(rle: &str) -> Result<Grid> {
        let mut lines = rle
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        let header = lines
            .next()
            .ok_or_else(|| anyhow!("RLE pattern has no header line"))?;
        let (width, height) = parse_header(header)
            .with_context(|| format!("Invalid RLE header : '{}'", header))?;

        let interior = SIZE - 2;
        if width > interior || height > interior {
            bail!(
                "RLE pattern is {}x{} but only {}x{} cells are available",
                width,
                height,
                interior,
                interior
            );
        }

        let offset_y = 1 + (interior - height) / 2;
        let offset_x = 1 + (interior - width) / 2;
        let mut grid = Grid::dead();

        // [count]tag, where tag is b/o/$/!; anything else non blank lands in group 3
        let token_re = Regex::new(r"(?:(\d+)?([$!a-zA-Z.]))|(\S)")?;
        let body = lines.collect::<Vec<_>>().join("");

        let mut row = 0;
        let mut col = 0;
        for token in token_re.captures_iter(&body) {
            if let Some(bad) = token.get(3) {
                bail!("Unexpected '{}' in RLE pattern", bad.as_str());
            }
            let tag = token.get(2).map(|m| m.as_str()).unwrap_or("");
            let count = match token.get(1) {
                Some(digits) => digits
                    .as_str()
                    .parse::<usize>()
                    .with_context(|| format!("RLE run count '{}' is too large", digits.as_str()))?,
                None => 1,
            };

            match tag {
                "!" => break,
                "$" => {
                    if count > height {
                        bail!("RLE skips {} rows but y = {}", count, height);
                    }
                    row += count;
                    col = 0;
                    if row > height {
                        bail!("RLE pattern is taller than the declared y = {}", height);
                    }
                }
                _ => {
                    if count > width || col + count > width {
                        bail!("RLE row {} is wider than the declared x = {}", row, width);
                    }
                    if !matches!(tag, "b" | "B" | ".") {
                        if row >= height {
                            bail!("RLE pattern is taller than the declared y = {}", height);
                        }
                        for dx in 0..count {
                            grid.cells[offset_y + row][offset_x + col + dx] = true;
                        }
                    }
                    col += count;
                }
            }
        }

        Ok(grid)
    }
}

/// `x = 3, y = 3, rule = B3/S23` -> (3, 3)
/// - only the B3/S23 rule is ever run, a declared rule is ignored
fn parse_header(header: &str) -> Result<(usize, usize)> {
    let header_re =
        Regex::new(r"^\s*x\s*=\s*(\d+)\s*,?\s*y\s*=\s*(\d+)\s*(?:,\s*rule\s*=\s*(\S+)\s*)?$")?;
    let captures = header_re
        .captures(header)
        .ok_or_else(|| anyhow!("Expected 'x = W, y = H[, rule = R]'"))?;

    let size = |index: usize| -> Result<usize> {
        let text = captures.get(index).map(|m| m.as_str()).unwrap_or("");
        text.parse::<usize>()
            .with_context(|| format!("Pattern size '{}' is too large", text))
    };
    Ok((size(1)?, size(2)?))
}
