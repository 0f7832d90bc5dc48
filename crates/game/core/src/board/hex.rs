//! Axial hex coordinates.
//!
//! Positions use the axial `(q, r)` system with the implied cube coordinate
//! `s = -q - r`. Rows are laid out pointy-top, so a rectangular court in
//! odd-row offset coordinates maps onto axial via [`Position::from_offset`].

/// Hex tile position in axial coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub q: i32,
    pub r: i32,
}

/// Axial direction vectors, clockwise from east.
const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

impl Position {
    pub const ORIGIN: Self = Self { q: 0, r: 0 };

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Converts odd-row offset coordinates (column, row) to axial.
    pub const fn from_offset(col: i32, row: i32) -> Self {
        Self {
            q: col - (row - (row & 1)) / 2,
            r: row,
        }
    }

    /// Returns the odd-row offset coordinates (column, row) of this tile.
    pub const fn to_offset(self) -> (i32, i32) {
        (self.q + (self.r - (self.r & 1)) / 2, self.r)
    }

    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    /// Hex distance in steps.
    pub fn distance(self, other: Position) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s() - other.s()).unsigned_abs();
        dq.max(dr).max(ds)
    }

    pub fn is_adjacent(self, other: Position) -> bool {
        self.distance(other) == 1
    }

    /// The six neighbouring tiles, clockwise from east.
    pub fn neighbors(self) -> [Position; 6] {
        DIRECTIONS.map(|(dq, dr)| Position::new(self.q + dq, self.r + dr))
    }

    /// All tiles within `radius` steps, including `self`, in (q, r) order.
    pub fn within(self, radius: u32) -> Vec<Position> {
        let n = radius as i32;
        let mut tiles = Vec::new();
        for dq in -n..=n {
            let lo = (-n).max(-dq - n);
            let hi = n.min(-dq + n);
            for dr in lo..=hi {
                tiles.push(Position::new(self.q + dq, self.r + dr));
            }
        }
        tiles
    }

    /// Straight hex line from `self` to `to`, both endpoints included.
    ///
    /// Samples are nudged by a small epsilon so lines along tile edges resolve
    /// to the same side every time.
    pub fn line_to(self, to: Position) -> Vec<Position> {
        let steps = self.distance(to);
        if steps == 0 {
            return vec![self];
        }

        const NUDGE: f64 = 1e-6;
        let (aq, ar, as_) = (
            self.q as f64 + NUDGE,
            self.r as f64 + NUDGE,
            self.s() as f64 - 2.0 * NUDGE,
        );
        let (bq, br, bs) = (
            to.q as f64 + NUDGE,
            to.r as f64 + NUDGE,
            to.s() as f64 - 2.0 * NUDGE,
        );

        (0..=steps)
            .map(|i| {
                let t = i as f64 / steps as f64;
                cube_round(
                    aq + (bq - aq) * t,
                    ar + (br - ar) * t,
                    as_ + (bs - as_) * t,
                )
            })
            .collect()
    }
}

fn cube_round(q: f64, r: f64, s: f64) -> Position {
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }

    Position::new(rq as i32, rr as i32)
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}
