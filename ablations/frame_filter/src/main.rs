//! 坏帧过滤策略的消融实验: 在合成扫查上比较窗口筛选, 扫查筛选与 apex 修正.

mod profile;
mod result;
mod runner;

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .init()
        .expect("Logger initialization error");

    runner::run().analyze();
}
