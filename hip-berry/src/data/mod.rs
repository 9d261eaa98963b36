//! 髋关节超声分析的基础数据结构.

mod hip;
mod landmarks;
mod mesh;
mod metric;
mod seg;
mod study;

pub use hip::{HipDataUs, Side};
pub use landmarks::LandmarksUs;
pub use mesh::{FemoralHeadSphere, IliumMesh};
pub use metric::{CustomMetric, Metric2D, Metric3D, MetricUs};
pub use seg::{HipLabel, SegFrameObjects, SegObject};
pub use study::{HipDatasUs, PreEdited};

/// 钩子返回的辅助数据 (名称 -> 任意 JSON 值).
pub type AuxData = serde_json::Map<String, serde_json::Value>;
