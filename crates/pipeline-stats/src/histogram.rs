//! Defect counts along the pipeline, as bars for distance charts.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Bars of the default distance chart.
pub const DEFAULT_BARS: usize = 40;

/// How counts inside one bar are split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StackBy {
    /// Everything in one stack.
    #[default]
    Single,
    /// One stack per defect wall side code.
    WallSide,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub start: i64,
    pub number: usize,
    /// Counts by stack key; the single stack uses key 0.
    pub stacks: BTreeMap<i64, usize>,
}

/// Histogram over `start..=start + length`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceBars {
    pub stack_by: StackBy,
    pub start: i64,
    pub length: i64,
    pub number: usize,
    pub bars: Vec<Bar>,
    pub before_start: usize,
    pub after_end: usize,
}

impl DistanceBars {
    /// `count` bars of equal width.
    pub fn equal(start: i64, length: i64, count: usize, stack_by: StackBy) -> Self {
        let count = count.max(1);
        let width = length as f64 / count as f64;
        let nodes = (0..count).map(|index| start + (index as f64 * width).floor() as i64);
        Self::with_nodes(start, length, nodes, stack_by)
    }

    /// Bars starting at `start` and at each of `nodes` inside the range,
    /// e.g. valve positions.
    pub fn segments(
        start: i64,
        length: i64,
        nodes: impl IntoIterator<Item = i64>,
        stack_by: StackBy,
    ) -> Self {
        let end = start + length;
        let inner = nodes.into_iter().filter(|node| *node > start && *node <= end);
        Self::with_nodes(start, length, std::iter::once(start).chain(inner), stack_by)
    }

    fn with_nodes(
        start: i64,
        length: i64,
        nodes: impl IntoIterator<Item = i64>,
        stack_by: StackBy,
    ) -> Self {
        let mut starts: Vec<i64> = nodes.into_iter().collect();
        starts.sort_unstable();
        starts.dedup();
        Self {
            stack_by,
            start,
            length,
            number: 0,
            bars: starts
                .into_iter()
                .map(|start| Bar {
                    start,
                    ..Bar::default()
                })
                .collect(),
            before_start: 0,
            after_end: 0,
        }
    }

    pub fn end(&self) -> i64 {
        self.start + self.length
    }

    /// Index of the bar holding `dist`; `dist` must be inside the range.
    pub fn bar_index(&self, dist: i64) -> usize {
        self.bars
            .partition_point(|bar| bar.start <= dist)
            .saturating_sub(1)
    }

    /// Counts one item at `dist` with wall side `side`.
    pub fn add(&mut self, dist: i64, side: i64) {
        if dist < self.start {
            self.before_start += 1;
            return;
        }
        if dist > self.end() {
            self.after_end += 1;
            return;
        }
        let key = match self.stack_by {
            StackBy::Single => 0,
            StackBy::WallSide => side,
        };
        let index = self.bar_index(dist);
        if let Some(bar) = self.bars.get_mut(index) {
            bar.number += 1;
            *bar.stacks.entry(key).or_default() += 1;
            self.number += 1;
        }
    }

    /// End of bar `index`: the next bar's start, or the range end.
    pub fn bar_end(&self, index: usize) -> i64 {
        self.bars
            .get(index + 1)
            .map_or(self.end(), |next| next.start)
    }
}

impl fmt::Display for DistanceBars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "total {}", self.number)?;
        for (index, bar) in self.bars.iter().enumerate() {
            write!(f, "\n{}-{}: {}", bar.start, self.bar_end(index), bar.number)?;
            if self.stack_by == StackBy::WallSide && !bar.stacks.is_empty() {
                let stacks: Vec<String> = bar
                    .stacks
                    .iter()
                    .map(|(side, count)| format!("{side}={count}"))
                    .collect();
                write!(f, " ({})", stacks.join(" "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_bars_split_the_range() {
        let bars = DistanceBars::equal(100, 1000, 4, StackBy::Single);
        let starts: Vec<i64> = bars.bars.iter().map(|bar| bar.start).collect();
        assert_eq!(starts, vec![100, 350, 600, 850]);
        assert_eq!(bars.bar_end(3), 1100);
    }

    #[test]
    fn lookup_uses_bar_starts() {
        let bars = DistanceBars::equal(0, 900, 3, StackBy::Single);
        assert_eq!(bars.bar_index(0), 0);
        assert_eq!(bars.bar_index(299), 0);
        assert_eq!(bars.bar_index(300), 1);
        assert_eq!(bars.bar_index(900), 2);
    }

    #[test]
    fn out_of_range_items_are_kept_apart() {
        let mut bars = DistanceBars::equal(100, 900, 3, StackBy::WallSide);
        bars.add(50, 1);
        bars.add(1001, 1);
        bars.add(1000, 2);
        bars.add(120, 1);
        bars.add(130, 2);
        assert_eq!(bars.before_start, 1);
        assert_eq!(bars.after_end, 1);
        assert_eq!(bars.number, 3);
        assert_eq!(bars.bars[0].stacks, BTreeMap::from([(1, 1), (2, 1)]));
        assert_eq!(
            bars.to_string(),
            "total 3\n100-400: 2 (1=1 2=1)\n400-700: 0\n700-1000: 1 (2=1)"
        );
    }

    #[test]
    fn valve_segments_ignore_outside_nodes() {
        let mut bars = DistanceBars::segments(0, 10_000, [12_000, 4000, 7000, 0], StackBy::Single);
        let starts: Vec<i64> = bars.bars.iter().map(|bar| bar.start).collect();
        assert_eq!(starts, vec![0, 4000, 7000]);
        bars.add(5000, 3);
        assert_eq!(bars.bars[1].stacks, BTreeMap::from([(0, 1)]));
    }
}
