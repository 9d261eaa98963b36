use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::error::HookError;

/// 钩子类别, 用于日志.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HookKind {
    /// 逐帧指标.
    FrameMetric,

    /// 全局指标.
    FullMetric,

    /// 绘制后处理.
    PostDraw,

    /// 分割预处理.
    SegPreprocess,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HookKind::FrameMetric => "per-frame metric",
            HookKind::FullMetric => "full metric",
            HookKind::PostDraw => "post-draw",
            HookKind::SegPreprocess => "seg preprocess",
        })
    }
}

/// 在隔离边界内执行一次钩子调用.
///
/// `Err` 与 panic 都会被捕获, 以 `warn` 级别记录钩子类别, 显示名与所在位置 (`target`),
/// 然后返回 `None`. 不会重试.
pub fn isolated<T, F>(kind: HookKind, name: &str, target: &str, f: F) -> Option<T>
where
    F: FnOnce() -> Result<T, HookError>,
{
    let err = match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(v)) => return Some(v),
        Ok(Err(e)) => e,
        Err(payload) => HookError::Panicked(panic_message(payload.as_ref())),
    };
    log::warn!("{kind} hook '{name}' failed on {target}: {err}");
    None
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}
