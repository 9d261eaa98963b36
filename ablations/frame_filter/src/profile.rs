//! 过滤策略运行统计.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// ablation/benchmark 计时器.
///
/// 该计时器支持 "中途中断" 与 "结束中断, 继续开始计时".
#[derive(Clone, Debug)]
struct AccTimer {
    consumed: Duration,
    since: Instant,
}

impl AccTimer {
    /// 初始化计时器. 初始化时会视为已经开始计时.
    #[inline]
    fn new() -> Self {
        Self {
            consumed: Duration::from_secs(0),
            since: Instant::now(),
        }
    }

    /// 开始计时.
    #[inline]
    fn start(&mut self) {
        self.since = Instant::now();
    }

    /// 结束计时, 并将这一区间的时间累加. 返回本轮计时时长.
    #[inline]
    fn elapsed(&mut self) -> Duration {
        let d = self.since.elapsed();
        self.consumed += d;
        d
    }

    /// 总共累计下来的时间 (微秒).
    #[inline]
    fn get_total_us(&self) -> u64 {
        self.consumed.as_micros() as u64
    }
}

/// 单个过滤策略的统计.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 处理过的研究数.
    studies: u64,

    /// 处理过的总帧数.
    frames: u64,

    /// 保留的总帧数.
    kept: u64,

    /// 各拒绝原因出现的次数.
    reasons: BTreeMap<String, u64>,

    /// Graf 帧与设定值相差不超过一帧的研究数.
    graf_hits: u64,

    /// 没有选出 Graf 帧的研究数.
    no_graf: u64,

    /// 过滤 + Graf 平面选择的耗时.
    work_time: AccTimer,

    /// 整个任务的耗时.
    real_time: AccTimer,

    /// 最耗时的一次研究.
    most: Option<Duration>,
}

impl Profile {
    /// 初始化.
    #[inline]
    pub fn new() -> Self {
        Self {
            studies: 0,
            frames: 0,
            kept: 0,
            reasons: BTreeMap::new(),
            graf_hits: 0,
            no_graf: 0,
            work_time: AccTimer::new(),
            real_time: AccTimer::new(),
            most: None,
        }
    }

    /// 开始一次研究的计时.
    #[inline]
    pub fn work_start(&mut self) {
        self.work_time.start();
    }

    /// 结束一次研究的计时.
    #[inline]
    pub fn work_elapsed(&mut self) {
        let d = self.work_time.elapsed();
        self.most = Some(self.most.map_or(d, |m| m.max(d)));
    }

    /// 记录一次研究的结果.
    pub fn record<'a, I>(&mut self, frames: usize, kept: usize, reasons: I, graf_hit: Option<bool>)
    where
        I: IntoIterator<Item = &'a String>,
    {
        self.studies += 1;
        self.frames += frames as u64;
        self.kept += kept as u64;
        for r in reasons {
            *self.reasons.entry(r.clone()).or_default() += 1;
        }
        match graf_hit {
            Some(true) => self.graf_hits += 1,
            Some(false) => {}
            None => self.no_graf += 1,
        }
    }

    /// 结束全部计时.
    #[inline]
    pub fn finish(mut self) -> Self {
        self.real_time.elapsed();
        self
    }

    /// 研究数.
    #[inline]
    pub fn get_studies(&self) -> u64 {
        self.studies
    }

    /// 保留帧占比.
    pub fn get_kept_ratio(&self) -> Option<f64> {
        match self.frames {
            0 => None,
            frames => Some(self.kept as f64 / frames as f64),
        }
    }

    /// Graf 帧命中率.
    pub fn get_graf_hit_ratio(&self) -> Option<f64> {
        match self.studies {
            0 => None,
            studies => Some(self.graf_hits as f64 / studies as f64),
        }
    }

    /// 没有 Graf 帧的研究数.
    #[inline]
    pub fn get_no_graf(&self) -> u64 {
        self.no_graf
    }

    /// 拒绝原因统计.
    #[inline]
    pub fn get_reasons(&self) -> &BTreeMap<String, u64> {
        &self.reasons
    }

    /// 以微秒为单位获得过滤的总耗时.
    #[inline]
    pub fn get_work_time_us(&self) -> u64 {
        self.work_time.get_total_us()
    }

    /// 以微秒为单位获得任务总耗时.
    #[inline]
    pub fn get_real_time_us(&self) -> u64 {
        self.real_time.get_total_us()
    }

    /// 最耗时的一次研究. 没有研究时为 `None`.
    #[inline]
    pub fn get_most_time_consuming(&self) -> Option<Duration> {
        self.most
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}
