/// Arithmetic over a circular index space of `len` positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexCycle {
    len: usize,
}

impl IndexCycle {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Folds any integer into `[0, len)`. An empty cycle always yields 0.
    pub fn wrap(&self, index: i64) -> usize {
        if self.len == 0 {
            return 0;
        }
        index.rem_euclid(self.len as i64) as usize
    }

    pub fn advance(&self, current: usize, step: i64) -> usize {
        self.wrap(current as i64 + step)
    }

    /// Signed offset of `to` relative to `from` along the shorter way around.
    ///
    /// When both directions are equally short (even `len`, half a lap apart)
    /// the negative side wins.
    pub fn signed_distance(&self, from: usize, to: usize) -> i64 {
        if self.len == 0 {
            return 0;
        }
        let n = self.len as i64;
        let raw = self.wrap(to as i64) as i64 - self.wrap(from as i64) as i64;
        match raw * 2 {
            d if d >= n => raw - n,
            d if d < -n => raw + n,
            _ => raw,
        }
    }
}
