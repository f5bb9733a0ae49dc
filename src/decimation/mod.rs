pub mod min_max;

pub use min_max::{decimate_min_max, find_extrema_indices};
