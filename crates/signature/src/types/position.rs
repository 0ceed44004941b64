use std::fmt;

use serde::{Deserialize, Serialize};

/// A pixel address, row `m` first, column `n` second. Origin is top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct MatrixPosition {
    pub m: usize,
    pub n: usize,
}

impl MatrixPosition {
    pub const fn new(m: usize, n: usize) -> Self {
        Self { m, n }
    }

    /// Offset this position by a signed step, returning `None` when it would leave
    /// the `height` x `width` rectangle.
    pub fn offset(self, delta_m: i64, delta_n: i64, height: usize, width: usize) -> Option<Self> {
        let m = self.m as i64 + delta_m;
        let n = self.n as i64 + delta_n;
        if m < 0 || n < 0 || m >= height as i64 || n >= width as i64 {
            return None;
        }
        Some(Self::new(m as usize, n as usize))
    }
}

impl fmt::Display for MatrixPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.m, self.n)
    }
}

impl From<(usize, usize)> for MatrixPosition {
    fn from((m, n): (usize, usize)) -> Self {
        Self::new(m, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_stays_inside_bounds() {
        let origin = MatrixPosition::new(1, 1);
        assert_eq!(origin.offset(-1, -1, 3, 3), Some(MatrixPosition::new(0, 0)));
        assert_eq!(origin.offset(-2, 0, 3, 3), None);
        assert_eq!(origin.offset(0, 2, 3, 3), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(MatrixPosition::new(3, 6).to_string(), "[3,6]");
    }
}
