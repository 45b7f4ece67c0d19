//! Row decimation by absolute line number.

/// Keeps one line in every `reduce_rows`, counting the header as line 1.
///
/// Sampling is anchored to the absolute line number in the file, not to the number of data
/// rows seen: with `reduce_rows = 3` lines 3, 6, 9, ... are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decimator {
    reduce_rows: u64,
}

impl Decimator {
    /// `reduce_rows == 0` disables decimation.
    pub fn new(reduce_rows: u64) -> Self {
        Self { reduce_rows }
    }

    /// Whether the line with 1-based `line_number` is written.
    pub fn keep(&self, line_number: u64) -> bool {
        self.reduce_rows == 0 || line_number % self.reduce_rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::Decimator;

    #[test]
    fn zero_keeps_everything() {
        let d = Decimator::new(0);
        assert!((1..1000).all(|n| d.keep(n)));
    }

    #[test]
    fn one_keeps_everything() {
        let d = Decimator::new(1);
        assert!((1..1000).all(|n| d.keep(n)));
    }

    #[test]
    fn samples_by_absolute_line() {
        let d = Decimator::new(3);
        let kept: Vec<u64> = (2..=10).filter(|&n| d.keep(n)).collect();
        assert_eq!(kept, vec![3, 6, 9]);
    }
}
