//! 🍑欢迎光临🍒
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Coord2d, Coord3d, Shape2d};

pub use crate::config::{Config, HipMode, OperationType};
pub use crate::data::{
    CustomMetric, FemoralHeadSphere, HipDataUs, HipDatasUs, HipLabel, IliumMesh, LandmarksUs,
    Metric2D, Metric3D, MetricUs, SegFrameObjects, SegObject, Side,
};
pub use crate::draw::{Overlay, TextStyle};
pub use crate::error::{HookError, PipelineError};

pub use crate::hooks::{FrameContext, HookOutput, PreprocessContext, StudyContext};
pub use crate::hooks::{FrameMetricHook, FullMetricHook, PostDrawHook, SegPreprocessHook};

pub use crate::handlers::{find_graf_plane, handle_bad_frames, GrafScorer, LandmarkConsistencyScorer};
pub use crate::multiframe::{
    get_3d_metrics, MaskStackReconstructor, Reconstruction, Reconstructor, Visual3d,
};

pub use crate::pipeline::{self, run, AnalysisInput, Components, Detector, RetuveResult};
