use std::cmp::Ordering;
use std::collections::VecDeque;

use super::data::{DataExtent, Sample};

/// Number of samples summarised by one cached extent.
const CHUNK_SIZE: usize = 512;

/// Pull interface over the samples of one series.
pub trait PlotDataSource: Send + Sync {
    /// Full extent of the data, None when empty.
    fn extent(&self) -> Option<DataExtent>;

    /// Y-range within a specific X-window (for auto-scaling Y)
    fn y_range(&self, x_min: f64, x_max: f64) -> Option<(f64, f64)>;

    /// Iterate over data within an X-window.
    fn iter_range(&self, x_min: f64, x_max: f64) -> Box<dyn Iterator<Item = Sample> + '_>;

    /// Samples to draw for an X-window, decimated down to about `max_points`.
    fn visible_samples(&self, x_min: f64, x_max: f64, max_points: usize) -> Vec<Sample> {
        let data: Vec<Sample> = self.iter_range(x_min, x_max).collect();
        crate::decimation::decimate_min_max(&data, max_points)
    }

    fn push(&mut self, sample: Sample);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn extent_of<'a>(samples: impl IntoIterator<Item = &'a Sample>) -> DataExtent {
    let mut extent = DataExtent::empty();
    for s in samples {
        extent.include(s);
    }
    extent
}

fn merge_extents<'a>(extents: impl IntoIterator<Item = &'a DataExtent>) -> Option<DataExtent> {
    let merged = extents
        .into_iter()
        .fold(DataExtent::empty(), |acc, e| acc.union(e));
    (!merged.is_empty()).then_some(merged)
}

/// True when `next` does not continue an x-ascending run after `prev`.
fn out_of_order(prev: &Sample, next: &Sample) -> bool {
    matches!(prev.x.partial_cmp(&next.x), Some(Ordering::Greater) | None)
}

fn fold_y(acc: &mut Option<(f64, f64)>, y: f64) {
    if !y.is_finite() {
        return;
    }
    *acc = Some(match *acc {
        Some((lo, hi)) => (lo.min(y), hi.max(y)),
        None => (y, y),
    });
}

/// Fixed dataset replaced wholesale on every update.
pub struct VecDataSource {
    data: Vec<Sample>,
    bounds_cache: Vec<DataExtent>,
    sorted: bool,
}

impl VecDataSource {
    pub fn new(data: Vec<Sample>) -> Self {
        let mut inst = Self {
            data,
            bounds_cache: Vec::new(),
            sorted: true,
        };
        inst.rebuild_cache();
        inst
    }

    fn rebuild_cache(&mut self) {
        self.bounds_cache = self.data.chunks(CHUNK_SIZE).map(extent_of).collect();
        self.sorted = !self.data.windows(2).any(|w| out_of_order(&w[0], &w[1]));
    }
}

impl PlotDataSource for VecDataSource {
    fn extent(&self) -> Option<DataExtent> {
        merge_extents(&self.bounds_cache)
    }

    fn y_range(&self, x_min: f64, x_max: f64) -> Option<(f64, f64)> {
        let mut acc = None;
        for (i, chunk) in self.bounds_cache.iter().enumerate() {
            if chunk.is_empty() || chunk.x_max < x_min || chunk.x_min > x_max {
                continue;
            }
            if chunk.x_min >= x_min && chunk.x_max <= x_max {
                fold_y(&mut acc, chunk.y_min);
                fold_y(&mut acc, chunk.y_max);
                continue;
            }
            let start = i * CHUNK_SIZE;
            let end = (start + CHUNK_SIZE).min(self.data.len());
            for s in &self.data[start..end] {
                if s.x >= x_min && s.x <= x_max {
                    fold_y(&mut acc, s.y);
                }
            }
        }
        acc
    }

    fn iter_range(&self, x_min: f64, x_max: f64) -> Box<dyn Iterator<Item = Sample> + '_> {
        if !self.sorted {
            return Box::new(
                self.data
                    .iter()
                    .filter(move |s| s.x >= x_min && s.x <= x_max)
                    .copied(),
            );
        }
        let start = self.data.partition_point(|s| s.x < x_min);
        let end = self.data.partition_point(|s| s.x <= x_max);
        Box::new(self.data[start..end.max(start)].iter().copied())
    }

    fn push(&mut self, sample: Sample) {
        if let Some(last) = self.data.last() {
            self.sorted &= !out_of_order(last, &sample);
        }
        let last_chunk_full = self.data.len() % CHUNK_SIZE == 0;
        self.data.push(sample);
        match self.bounds_cache.last_mut() {
            Some(extent) if !last_chunk_full => extent.include(&sample),
            _ => {
                let mut extent = DataExtent::empty();
                extent.include(&sample);
                self.bounds_cache.push(extent);
            }
        }
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

/// Data source for real-time streaming with a fixed capacity. The oldest
/// samples are evicted once the capacity is reached.
pub struct StreamingDataSource {
    data: VecDeque<Sample>,
    capacity: usize,
    /// Extent and live sample count of each chunk, oldest first.
    chunks: VecDeque<(DataExtent, usize)>,
    /// Adjacent pairs whose x goes backwards. Zero means sorted by x.
    inversions: usize,
}

impl StreamingDataSource {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
            chunks: VecDeque::new(),
            inversions: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict_front(&mut self) {
        if let (Some(a), Some(b)) = (self.data.front(), self.data.get(1)) {
            if out_of_order(a, b) {
                self.inversions -= 1;
            }
        }
        if self.data.pop_front().is_none() {
            return;
        }
        let Some((_, count)) = self.chunks.front_mut() else {
            return;
        };
        *count -= 1;
        if *count == 0 {
            self.chunks.pop_front();
            return;
        }
        let live = *count;
        let extent = extent_of(self.data.range(..live));
        if let Some(front) = self.chunks.front_mut() {
            front.0 = extent;
        }
    }

    fn append(&mut self, sample: Sample) {
        if let Some(last) = self.data.back() {
            if out_of_order(last, &sample) {
                self.inversions += 1;
            }
        }
        self.data.push_back(sample);
        match self.chunks.back_mut() {
            Some((extent, count)) if *count < CHUNK_SIZE => {
                extent.include(&sample);
                *count += 1;
            }
            _ => {
                let mut extent = DataExtent::empty();
                extent.include(&sample);
                self.chunks.push_back((extent, 1));
            }
        }
    }
}

impl PlotDataSource for StreamingDataSource {
    fn extent(&self) -> Option<DataExtent> {
        merge_extents(self.chunks.iter().map(|(e, _)| e))
    }

    fn y_range(&self, x_min: f64, x_max: f64) -> Option<(f64, f64)> {
        let mut acc = None;
        let mut start = 0;
        for (chunk, count) in &self.chunks {
            let end = start + count;
            if !chunk.is_empty() && chunk.x_max >= x_min && chunk.x_min <= x_max {
                if chunk.x_min >= x_min && chunk.x_max <= x_max {
                    fold_y(&mut acc, chunk.y_min);
                    fold_y(&mut acc, chunk.y_max);
                } else {
                    for s in self.data.range(start..end) {
                        if s.x >= x_min && s.x <= x_max {
                            fold_y(&mut acc, s.y);
                        }
                    }
                }
            }
            start = end;
        }
        acc
    }

    fn iter_range(&self, x_min: f64, x_max: f64) -> Box<dyn Iterator<Item = Sample> + '_> {
        if self.inversions > 0 {
            return Box::new(
                self.data
                    .iter()
                    .filter(move |s| s.x >= x_min && s.x <= x_max)
                    .copied(),
            );
        }
        let (s1, s2) = self.data.as_slices();
        let window = |s: &[Sample]| {
            let start = s.partition_point(|p| p.x < x_min);
            let end = s.partition_point(|p| p.x <= x_max).max(start);
            start..end
        };
        let r1 = window(s1);
        let r2 = window(s2);
        Box::new(s1[r1].iter().chain(s2[r2].iter()).copied())
    }

    fn push(&mut self, sample: Sample) {
        if self.data.len() >= self.capacity {
            self.evict_front();
        }
        self.append(sample);
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}
