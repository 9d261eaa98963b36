//! 实验结果.

use crate::profile::Profile;
use std::io::{self, Write};

/// 将 `profile` 的结果写进 `w` 中.
fn describe_into<W: Write>(name: &str, p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn ratio_to_display(f: Option<f64>) -> String {
        match f {
            Some(f) => format!("{:.2}%", f * 100.0),
            None => "/".to_string(),
        }
    }

    writeln!(w, "Strategy `{name}`:")?;
    writeln!(w, "{S4}Studies: {}", p.get_studies())?;
    writeln!(w, "{S4}Kept frames: {}", ratio_to_display(p.get_kept_ratio()))?;
    writeln!(
        w,
        "{S4}Graf frame within one frame: {}",
        ratio_to_display(p.get_graf_hit_ratio())
    )?;
    writeln!(w, "{S4}Studies without Graf frame: {}", p.get_no_graf())?;
    writeln!(w, "{S4}Rejection reasons:")?;
    for (reason, count) in p.get_reasons() {
        writeln!(w, "{S4}{S4}{reason}: {count}")?;
    }
    writeln!(w, "{S4}Effective total time: {} us", p.get_work_time_us())?;
    writeln!(w, "{S4}Total machine time: {} us", p.get_real_time_us())?;
    let t = p.get_most_time_consuming().map(|d| d.as_micros().to_string());
    write!(
        w,
        "{S4}Most time-consuming study costs {} us",
        t.as_deref().unwrap_or("/")
    )?;
    Ok(())
}

/// 消融实验最终结果.
pub struct AblationResult {
    data: Vec<(&'static str, Profile)>,
}

impl AblationResult {
    pub fn from_iter<I: IntoIterator<Item = (&'static str, Profile)>>(it: I) -> Self {
        Self {
            data: it.into_iter().collect(),
        }
    }

    /// 分析运行结果.
    pub fn analyze(&self) {
        utils::sep();
        let mut buf = Vec::with_capacity(512);

        for (key, profile) in self.data.iter() {
            if let Err(e) = describe_into(key, profile, &mut buf) {
                eprintln!("Failed to describe `{key}`: {e}");
            }
            println!("{}", String::from_utf8_lossy(&buf));
            buf.clear();

            utils::sep();
        }
    }
}
