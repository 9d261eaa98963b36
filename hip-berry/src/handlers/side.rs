use crate::data::{HipDatasUs, Side};

/// 根据 `graf_frame` 给每一帧分类: Graf 帧为 [`Side::Graf`], 其它保留帧为
/// [`Side::NotGraf`], 空帧不分配.
pub fn set_side_info(hip_datas: &mut HipDatasUs) {
    let graf_frame = hip_datas.graf_frame;
    for hip in hip_datas.iter_mut() {
        hip.side = if hip.is_empty() {
            None
        } else if Some(hip.frame_no) == graf_frame {
            Some(Side::Graf)
        } else {
            Some(Side::NotGraf)
        };
    }
}
