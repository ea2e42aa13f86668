use std::time::Instant;

use anyhow::{bail, Result};

use crate::config::Config;
use crate::pose::Landmarks;
use crate::tracker::angle::joint_angle;
use crate::tracker::exercise::{Exercise, RepRule};

/// レップサイクルのフェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Down,
    Up,
}

/// 種目ごとのレップカウント状態機械
///
/// 1フレーム分のランドマークを受け取り、(カウント, フィードバック) を返す。
/// ランドマークなしのフレームは状態を一切変更しない。
/// 種目変更時は新しいインスタンスを作り直す。
#[derive(Debug)]
pub struct ExerciseSession {
    exercise: Exercise,
    visibility_threshold: f32,
    count: u32,
    phase: Phase,
    feedback: String,
    plank_start: Option<Instant>,
}

impl ExerciseSession {
    pub fn new(exercise: Exercise) -> Self {
        Self {
            exercise,
            visibility_threshold: 0.5,
            count: 0,
            phase: Phase::Down,
            feedback: String::new(),
            plank_start: None,
        }
    }

    /// 可視性閾値を設定
    pub fn with_visibility_threshold(mut self, threshold: f32) -> Self {
        self.visibility_threshold = threshold;
        self
    }

    /// 設定から作成
    ///
    /// 未知の種目名は構築時のエラー。フレームごとのエラーにはしない。
    pub fn from_config(config: &Config) -> Result<Self> {
        let exercise = match Exercise::from_name(&config.session.exercise) {
            Some(exercise) => exercise,
            None => bail!("unknown exercise type: {}", config.session.exercise),
        };
        Ok(Self::new(exercise).with_visibility_threshold(config.session.visibility_threshold))
    }

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    /// 1フレーム分の更新
    ///
    /// `None`（体未検出）は前回の (カウント, フィードバック) をそのまま返す。
    pub fn update(&mut self, landmarks: Option<&Landmarks>) -> (u32, &str) {
        self.update_at(landmarks, Instant::now())
    }

    fn update_at(&mut self, landmarks: Option<&Landmarks>, now: Instant) -> (u32, &str) {
        if let Some(landmarks) = landmarks {
            match self.exercise.rep_rule() {
                Some(rule) => self.update_reps(landmarks, rule),
                None => self.update_plank(now),
            }
        }
        (self.count, &self.feedback)
    }

    fn update_reps(&mut self, landmarks: &Landmarks, rule: &RepRule) {
        // 必要3関節のいずれかが可視性不足なら、そのフレームは未検出扱い
        let mut points = [(0.0f32, 0.0f32); 3];
        for (point, &index) in points.iter_mut().zip(rule.joints.iter()) {
            let lm = landmarks.get(index);
            if !lm.is_valid(self.visibility_threshold) {
                return;
            }
            *point = (lm.x, lm.y);
        }
        let angle = joint_angle(points[0], points[1], points[2]);

        // 判定順序: up遷移 → down遷移(+1) → up維持 → down維持
        // 1回の更新で発火する分岐は1つだけ。どれも不成立なら前回の
        // フィードバックを維持する。
        if self.phase == Phase::Down && rule.enter_up.matches(angle) {
            self.phase = Phase::Up;
            self.feedback = rule.enter_up_text.to_string();
        } else if self.phase == Phase::Up && rule.enter_down.matches(angle) {
            self.phase = Phase::Down;
            self.count += 1;
            self.feedback = format!("Rep {} completed!", self.count);
        } else if self.phase == Phase::Up && rule.hold_up.matches(angle) {
            self.feedback = rule.hold_up_text.to_string();
        } else if self.phase == Phase::Down && rule.hold_down.matches(angle) {
            self.feedback = rule.hold_down_text.to_string();
        }
    }

    /// プランクはレップではなく経過秒数をカウントとして扱う
    fn update_plank(&mut self, now: Instant) {
        let start = *self.plank_start.get_or_insert(now);
        let seconds = now.duration_since(start).as_secs() as u32;
        self.count = seconds;
        self.feedback = format!("Hold for {} seconds", seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pose::{Landmark, LandmarkIndex, Landmarks};
    use std::time::Duration;

    /// 指定した3関節が指定角度を成すフレームを生成
    ///
    /// 頂点Bを(0.5, 0.5)、Aを真上に置き、B→Cレイを角度分回転させる。
    fn frame_with_angle(joints: [LandmarkIndex; 3], angle_deg: f32) -> Landmarks {
        let b = (0.5f32, 0.5f32);
        let a = (b.0, b.1 - 0.2);
        let theta_a = f32::atan2(a.1 - b.1, a.0 - b.0);
        let theta_c = theta_a + angle_deg.to_radians();
        let c = (b.0 + 0.2 * theta_c.cos(), b.1 + 0.2 * theta_c.sin());

        let mut frame = Landmarks::default();
        frame.landmarks[joints[0] as usize] = Landmark::new(a.0, a.1, 0.9);
        frame.landmarks[joints[1] as usize] = Landmark::new(b.0, b.1, 0.9);
        frame.landmarks[joints[2] as usize] = Landmark::new(c.0, c.1, 0.9);
        frame
    }

    fn arm_frame(angle_deg: f32) -> Landmarks {
        frame_with_angle(
            [
                LandmarkIndex::LeftShoulder,
                LandmarkIndex::LeftElbow,
                LandmarkIndex::LeftWrist,
            ],
            angle_deg,
        )
    }

    fn leg_frame(angle_deg: f32) -> Landmarks {
        frame_with_angle(
            [
                LandmarkIndex::LeftHip,
                LandmarkIndex::LeftKnee,
                LandmarkIndex::LeftAnkle,
            ],
            angle_deg,
        )
    }

    fn torso_frame(angle_deg: f32) -> Landmarks {
        frame_with_angle(
            [
                LandmarkIndex::LeftShoulder,
                LandmarkIndex::LeftHip,
                LandmarkIndex::LeftKnee,
            ],
            angle_deg,
        )
    }

    #[test]
    fn test_feedback_empty_before_detection() {
        let mut session = ExerciseSession::new(Exercise::PushUp);
        assert_eq!(session.feedback(), "");
        let (count, feedback) = session.update(None);
        assert_eq!(count, 0);
        assert_eq!(feedback, "");
    }

    #[test]
    fn test_pushup_scenario() {
        let mut session = ExerciseSession::new(Exercise::PushUp);

        // down状態で170度: 遷移なし、下げるよう促す
        let (count, feedback) = session.update(Some(&arm_frame(170.0)));
        assert_eq!(count, 0);
        assert_eq!(feedback, "Go lower for a proper push-up");

        // 80度: up遷移
        let (count, feedback) = session.update(Some(&arm_frame(80.0)));
        assert_eq!(count, 0);
        assert_eq!(feedback, "Good form! Keep going up");

        // 170度: down遷移でカウント+1
        let (count, feedback) = session.update(Some(&arm_frame(170.0)));
        assert_eq!(count, 1);
        assert_eq!(feedback, "Rep 1 completed!");
    }

    #[test]
    fn test_pushup_hold_up_feedback() {
        let mut session = ExerciseSession::new(Exercise::PushUp);
        session.update(Some(&arm_frame(80.0))); // → up

        // up状態で160未満: まだ上げ切っていない
        let (count, feedback) = session.update(Some(&arm_frame(120.0)));
        assert_eq!(count, 0);
        assert_eq!(feedback, "Go all the way up!");
    }

    #[test]
    fn test_hysteresis_no_flicker() {
        // 91〜159度の往復はどちらのしきい値も越えないためカウントされない
        let mut session = ExerciseSession::new(Exercise::PushUp);
        for _ in 0..100 {
            session.update(Some(&arm_frame(91.0)));
            session.update(Some(&arm_frame(159.0)));
        }
        assert_eq!(session.count(), 0);
    }

    #[test]
    fn test_count_increments_by_one_per_cycle() {
        let mut session = ExerciseSession::new(Exercise::PushUp);
        let mut prev_count = 0;
        for cycle in 1..=5 {
            for frame in [arm_frame(80.0), arm_frame(170.0)] {
                let (count, _) = session.update(Some(&frame));
                assert!(count >= prev_count, "count decreased");
                assert!(count - prev_count <= 1, "count skipped more than 1");
                prev_count = count;
            }
            assert_eq!(session.count(), cycle);
        }
    }

    #[test]
    fn test_squat_scenario() {
        let mut session = ExerciseSession::new(Exercise::Squat);

        let (_, feedback) = session.update(Some(&leg_frame(170.0)));
        assert_eq!(feedback, "Go lower for a proper squat");

        let (_, feedback) = session.update(Some(&leg_frame(80.0)));
        assert_eq!(feedback, "Good depth! Now stand up");

        let (count, feedback) = session.update(Some(&leg_frame(170.0)));
        assert_eq!(count, 1);
        assert_eq!(feedback, "Rep 1 completed!");
    }

    #[test]
    fn test_crunch_scenario() {
        let mut session = ExerciseSession::new(Exercise::Crunch);

        // down状態で130度: 120未満ではないのでどの分岐も不成立
        let (count, feedback) = session.update(Some(&torso_frame(130.0)));
        assert_eq!(count, 0);
        assert_eq!(feedback, "");

        // 50度: up遷移
        let (_, feedback) = session.update(Some(&torso_frame(50.0)));
        assert_eq!(feedback, "Good crunch! Now lower down");

        // up状態で80度: down遷移には届かず、体幹維持を促す
        let (_, feedback) = session.update(Some(&torso_frame(80.0)));
        assert_eq!(feedback, "Keep your core engaged!");

        // 130度: down遷移でカウント+1
        let (count, feedback) = session.update(Some(&torso_frame(130.0)));
        assert_eq!(count, 1);
        assert_eq!(feedback, "Rep 1 completed!");
    }

    #[test]
    fn test_crunch_hold_down_feedback() {
        let mut session = ExerciseSession::new(Exercise::Crunch);
        session.update(Some(&torso_frame(50.0))); // → up
        session.update(Some(&torso_frame(130.0))); // → down, rep 1

        // down状態で120未満（60以上）: 下げ切るよう促す
        let (count, feedback) = session.update(Some(&torso_frame(90.0)));
        assert_eq!(count, 1);
        assert_eq!(feedback, "Lower down completely");
    }

    #[test]
    fn test_pullup_inverted_direction() {
        // プッシュアップと逆: 伸ばし切り(>160)がup、引き切り(<90)がdown+1
        let mut session = ExerciseSession::new(Exercise::PullUp);

        let (_, feedback) = session.update(Some(&arm_frame(170.0)));
        assert_eq!(feedback, "Good form! Keep pulling up");

        let (count, feedback) = session.update(Some(&arm_frame(80.0)));
        assert_eq!(count, 1);
        assert_eq!(feedback, "Rep 1 completed!");
    }

    #[test]
    fn test_pullup_hold_up_feedback() {
        let mut session = ExerciseSession::new(Exercise::PullUp);
        session.update(Some(&arm_frame(170.0))); // → up

        let (_, feedback) = session.update(Some(&arm_frame(120.0)));
        assert_eq!(feedback, "Pull up higher!");
    }

    #[test]
    fn test_no_detection_preserves_state() {
        let mut session = ExerciseSession::new(Exercise::PushUp);
        session.update(Some(&arm_frame(80.0)));
        session.update(Some(&arm_frame(170.0))); // rep 1
        let phase = session.phase;

        for _ in 0..10 {
            let (count, feedback) = session.update(None);
            assert_eq!(count, 1);
            assert_eq!(feedback, "Rep 1 completed!");
        }
        assert_eq!(session.phase, phase);
    }

    #[test]
    fn test_missing_joint_treated_as_no_detection() {
        let mut session = ExerciseSession::new(Exercise::PushUp);
        session.update(Some(&arm_frame(80.0))); // → up

        // 手首だけ可視性不足: 状態を変更しない
        let mut frame = arm_frame(170.0);
        frame.landmarks[LandmarkIndex::LeftWrist as usize].visibility = 0.1;
        let (count, feedback) = session.update(Some(&frame));
        assert_eq!(count, 0);
        assert_eq!(feedback, "Good form! Keep going up");

        // 全関節可視に戻るとカウントが進む
        let (count, _) = session.update(Some(&arm_frame(170.0)));
        assert_eq!(count, 1);
    }

    #[test]
    fn test_plank_elapsed_seconds() {
        let mut session = ExerciseSession::new(Exercise::Plank);
        let frame = Landmarks::default();
        let t0 = Instant::now();

        let (count, feedback) = session.update_at(Some(&frame), t0);
        assert_eq!(count, 0);
        assert_eq!(feedback, "Hold for 0 seconds");

        let (count, feedback) = session.update_at(Some(&frame), t0 + Duration::from_secs(5));
        assert_eq!(count, 5);
        assert_eq!(feedback, "Hold for 5 seconds");
    }

    #[test]
    fn test_plank_timer_starts_on_first_detection() {
        let mut session = ExerciseSession::new(Exercise::Plank);
        let frame = Landmarks::default();
        let t0 = Instant::now();

        // 未検出フレームではタイマーを開始しない
        let (count, feedback) = session.update_at(None, t0);
        assert_eq!(count, 0);
        assert_eq!(feedback, "");

        // 最初の検出フレームが起点になる
        let (count, _) = session.update_at(Some(&frame), t0 + Duration::from_secs(3));
        assert_eq!(count, 0);

        let (count, feedback) = session.update_at(Some(&frame), t0 + Duration::from_secs(7));
        assert_eq!(count, 4);
        assert_eq!(feedback, "Hold for 4 seconds");
    }

    #[test]
    fn test_from_config_unknown_exercise() {
        let mut config = Config::default();
        config.session.exercise = "yoga".to_string();
        let result = ExerciseSession::from_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("yoga"));
    }

    #[test]
    fn test_from_config_default() {
        let config = Config::default();
        let session = ExerciseSession::from_config(&config).unwrap();
        assert_eq!(session.exercise(), Exercise::PushUp);
    }
}
