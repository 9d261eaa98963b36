//! 对逐帧结果的后处理: 坏帧过滤, Graf 平面选择, 帧分类.

pub mod bad_data;
pub mod graf;
mod side;

pub use bad_data::{best_window, handle_bad_frames, remove_outliers};
pub use graf::{find_graf_plane, GrafScorer, LandmarkConsistencyScorer};
pub use side::set_side_info;
