//! 通用常量.

use std::ops::RangeInclusive;

/// 三通道颜色.
pub mod rgb {
    /// 黑色.
    pub const BLACK: [u8; 3] = [0, 0, 0];

    /// 白色.
    pub const WHITE: [u8; 3] = [255, 255, 255];

    /// 红色. 默认用于 alpha 角线段.
    pub const RED: [u8; 3] = [255, 0, 0];

    /// 绿色. 默认用于 Graf 帧的高亮.
    pub const GREEN: [u8; 3] = [0, 255, 0];

    /// 蓝色. 默认用于覆盖率线段.
    pub const BLUE: [u8; 3] = [0, 0, 255];

    /// 黄色. 默认用于标志点.
    pub const YELLOW: [u8; 3] = [255, 255, 0];

    /// 品红. 默认用于股骨头球心.
    pub const MAGENTA: [u8; 3] = [255, 0, 255];

    /// 青色.
    pub const CYAN: [u8; 3] = [0, 255, 255];
}

/// 多项式修正 apex 时默认的多项式次数.
pub const POLYFIT_DEGREE: u32 = 2;

/// 多项式修正 apex 时, 实测点与拟合点之间允许的最大像素距离.
pub const POLYFIT_MAX_PIXEL_ERR: f64 = 8.0;

/// 髂骨线 (left -> apex) 与水平方向的最大夹角 (角度).
pub const ILIUM_FLAT_MAX_DEG: f64 = 10.0;

/// apex 与 right 两个标志点之间的最小像素距离.
pub const APEX_RIGHT_MIN_DIST: f64 = 30.0;

/// 合理的 alpha 角范围 (角度, 左开右闭; 0 代表无法计算).
pub const ALPHA_SENSIBLE: RangeInclusive<f64> = 0.0..=90.0;

/// 合理的覆盖率范围.
pub const COVERAGE_SENSIBLE: RangeInclusive<f64> = 0.0..=1.0;

/// 视频的默认最小帧率.
pub const MIN_VID_FPS: u32 = 30;

/// 视频的默认最短时长 (秒).
pub const MIN_VID_LENGTH: u32 = 6;

/// 扫查模式下, Graf 帧在视频首尾各自重复的比例.
pub const SWEEP_GRAF_PAD_RATIO: f64 = 0.1;

/// 坏帧原因.
pub mod reason {
    /// 没有任何指标, 或全部指标为 0.
    pub const NO_METRICS: &str = "No Metrics";

    /// 没有标志点.
    pub const NO_LANDMARKS: &str = "No Landmarks";

    /// alpha 角不合理.
    pub const BAD_ALPHA: &str = "Alpha Angle Non-Sensical";

    /// 髂骨线不够平.
    pub const ILIUM_NOT_FLAT: &str = "Ilium Line not Flat";

    /// 覆盖率不合理.
    pub const BAD_COVERAGE: &str = "Coverage Value Non-Sensical";

    /// apex 与 right 太近.
    pub const APEX_RIGHT_TOO_CLOSE: &str = "Apex and Right Too Close";

    /// 不在主窗口内, 且上游没有给出拒绝原因.
    pub const NOT_ENOUGH_DATA: &str = "Not Enough Data";
}
