/// 3点 A-B-C の成す角度を度数で返す (0〜180)
///
/// Bを頂点とし、B→AとB→C両レイのatan2角の差の絶対値を取り、
/// 180を超える場合は360から引いて[0, 180]へ反射する。
/// 退化入力（3点の一致など）は0.0を返す。atan2(0, 0)は0なので
/// 一致点は自然に0度に落ち、非有限値のみガードで0に丸める。
pub fn joint_angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    let radians = f32::atan2(c.1 - b.1, c.0 - b.0) - f32::atan2(a.1 - b.1, a.0 - b.0);
    let mut angle = radians.to_degrees().abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    if angle.is_finite() {
        angle
    } else {
        0.0
    }
}
