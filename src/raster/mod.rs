//! Post-processing of rendered scale-bar rasters.

pub mod dual;
pub mod transform;

pub use dual::{
    ALPHA_THRESHOLD, SAMPLE_OFFSET_PX, align_dual, align_dual_with_spacing, compose_dual,
    leading_edge, pad_leading, zero_end_reversed,
};
pub use transform::{content_bounds, crop_to_content, rotate, rotated_point, rotated_size};
