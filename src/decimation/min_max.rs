use crate::data_types::Sample;
use rayon::prelude::*;

/// Below this many samples the sequential path is faster than rayon.
const PARALLEL_THRESHOLD: usize = 65_536;

/// Scans a slice to find the indices of the minimum and maximum y values.
/// NaN values are skipped; returns None when every value is NaN.
#[inline(always)]
pub fn find_extrema_indices(chunk: &[Sample]) -> Option<(usize, usize)> {
    let mut extrema: Option<(usize, usize)> = None;
    for (i, s) in chunk.iter().enumerate() {
        if s.y.is_nan() {
            continue;
        }
        extrema = Some(match extrema {
            None => (i, i),
            Some((lo, hi)) => (
                if s.y < chunk[lo].y { i } else { lo },
                if s.y > chunk[hi].y { i } else { hi },
            ),
        });
    }
    extrema
}

fn aggregate_bucket(chunk: &[Sample]) -> ([Sample; 2], usize) {
    match chunk.len() {
        0 => ([Sample::default(); 2], 0),
        1 => ([chunk[0], Sample::default()], 1),
        _ => match find_extrema_indices(chunk) {
            None => ([Sample::default(); 2], 0),
            Some((min_idx, max_idx)) if min_idx == max_idx => {
                ([chunk[min_idx], Sample::default()], 1)
            }
            Some((min_idx, max_idx)) => {
                let (a, b) = (chunk[min_idx], chunk[max_idx]);
                if a.x <= b.x {
                    ([a, b], 2)
                } else {
                    ([b, a], 2)
                }
            }
        },
    }
}

/// Min/max decimation: splits the samples into equal-count buckets and keeps
/// the lowest and highest sample of each, in x order. Peaks survive any
/// compression ratio.
pub fn decimate_min_max(data: &[Sample], max_points: usize) -> Vec<Sample> {
    if data.len() <= max_points || max_points < 2 {
        return data.to_vec();
    }

    let bucket_count = (max_points / 2).max(1);
    let bucket_len = data.len().div_ceil(bucket_count);

    let buckets: Vec<([Sample; 2], usize)> = if data.len() >= PARALLEL_THRESHOLD {
        data.par_chunks(bucket_len).map(aggregate_bucket).collect()
    } else {
        data.chunks(bucket_len).map(aggregate_bucket).collect()
    };

    let mut output = Vec::with_capacity(max_points);
    for (pts, n) in buckets {
        output.extend_from_slice(&pts[..n]);
    }
    output
}
