use super::aggregate::GridAggregate;

pub const LEVELS: u8 = 5;

/// Intensity level 0..=4 of `count` relative to `max_count`.
///
/// Zero maps to 0. Otherwise the quartile bounds are inclusive:
/// `count <= max/4` is 1, `<= max/2` is 2, `<= 3*max/4` is 3, anything above is 4.
pub fn level_of(count: u64, max_count: u64) -> u8 {
    if count == 0 {
        return 0;
    }
    let max = max_count.max(1);
    // Integer form of `count <= q * max` avoids float rounding at the bounds.
    if count * 4 <= max {
        1
    } else if count * 2 <= max {
        2
    } else if count * 4 <= max * 3 {
        3
    } else {
        4
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    max_count: u64,
}

impl Scale {
    pub fn new(max_count: u64) -> Self {
        Self {
            max_count: max_count.max(1),
        }
    }

    pub fn for_grid(grid: &GridAggregate) -> Self {
        Self::new(grid.max_count())
    }

    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    pub fn level(&self, count: u64) -> u8 {
        level_of(count, self.max_count)
    }
}
