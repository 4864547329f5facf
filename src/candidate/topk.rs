//! Top-K tracking of matched offsets.

use std::cmp::Ordering;

/// One evaluated template offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchPeak {
    /// X coordinate (column) of the template's top-left corner.
    pub x: usize,
    /// Y coordinate (row) of the template's top-left corner.
    pub y: usize,
    /// Displayed value in `[0, 255]`, brighter is better.
    pub value: u8,
    /// Raw metric score.
    pub score: f64,
}

/// Which offsets count as matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchFilter {
    /// Minimum displayed value, inclusive.
    pub threshold: u8,
    /// Keep only the best `n` matches. `None` and `Some(0)` keep all.
    pub limit: Option<usize>,
}

impl Default for MatchFilter {
    fn default() -> Self {
        Self {
            threshold: 200,
            limit: Some(5),
        }
    }
}

fn peak_cmp_desc(a: &MatchPeak, b: &MatchPeak) -> Ordering {
    b.value
        .cmp(&a.value)
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

/// Sorts peaks by descending value, earlier raster position first on ties.
pub(crate) fn sort_peaks_desc(peaks: &mut [MatchPeak]) {
    peaks.sort_by(peak_cmp_desc);
}

/// Top-K container with O(k) insertion cost.
pub(crate) struct TopK {
    k: usize,
    items: Vec<MatchPeak>,
}

impl TopK {
    pub(crate) fn new(k: usize) -> Self {
        Self {
            k,
            items: Vec::with_capacity(k),
        }
    }

    /// Pushes a peak, evicting the worst one if at capacity.
    pub(crate) fn push(&mut self, peak: MatchPeak) {
        if self.k == 0 {
            return;
        }
        if self.items.len() < self.k {
            self.items.push(peak);
            return;
        }

        let mut worst_idx = 0usize;
        for (idx, item) in self.items.iter().enumerate().skip(1) {
            if peak_cmp_desc(item, &self.items[worst_idx]) == Ordering::Greater {
                worst_idx = idx;
            }
        }

        if peak_cmp_desc(&peak, &self.items[worst_idx]) == Ordering::Less {
            self.items[worst_idx] = peak;
        }
    }

    pub(crate) fn into_sorted_desc(mut self) -> Vec<MatchPeak> {
        sort_peaks_desc(&mut self.items);
        self.items
    }
}

/// Keeps peaks at or above the filter threshold, best first, truncated to
/// the filter limit.
pub fn select_matches<I>(peaks: I, filter: &MatchFilter) -> Vec<MatchPeak>
where
    I: IntoIterator<Item = MatchPeak>,
{
    let passing = peaks
        .into_iter()
        .filter(|peak| peak.value >= filter.threshold);
    match filter.limit {
        Some(k) if k > 0 => {
            let mut topk = TopK::new(k);
            for peak in passing {
                topk.push(peak);
            }
            topk.into_sorted_desc()
        }
        _ => {
            let mut all: Vec<MatchPeak> = passing.collect();
            sort_peaks_desc(&mut all);
            all
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{select_matches, MatchFilter, MatchPeak};

    fn peak(x: usize, y: usize, value: u8) -> MatchPeak {
        MatchPeak {
            x,
            y,
            value,
            score: f64::from(value),
        }
    }

    #[test]
    fn threshold_is_inclusive_and_limit_keeps_best() {
        let peaks = vec![
            peak(0, 0, 199),
            peak(1, 0, 200),
            peak(2, 0, 250),
            peak(0, 1, 230),
            peak(1, 1, 250),
        ];
        let filter = MatchFilter {
            threshold: 200,
            limit: Some(2),
        };
        let kept = select_matches(peaks.clone(), &filter);
        assert_eq!(kept, vec![peak(2, 0, 250), peak(1, 1, 250)]);

        let all = select_matches(
            peaks,
            &MatchFilter {
                threshold: 200,
                limit: None,
            },
        );
        assert_eq!(all.len(), 4);
        assert_eq!(all[3], peak(1, 0, 200));
    }

    #[test]
    fn zero_limit_means_unlimited() {
        let peaks = (0..10).map(|x| peak(x, 0, 255));
        let filter = MatchFilter {
            threshold: 0,
            limit: Some(0),
        };
        assert_eq!(select_matches(peaks, &filter).len(), 10);
    }
}
