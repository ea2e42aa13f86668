use crate::pose::LandmarkIndex;

/// 種目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exercise {
    PushUp,
    Squat,
    Crunch,
    PullUp,
    Plank,
}

impl Exercise {
    /// 設定上の種目名から変換（大文字小文字・複数形は許容）
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "push-up" | "push-ups" | "pushup" | "pushups" => Some(Self::PushUp),
            "squat" | "squats" => Some(Self::Squat),
            "crunch" | "crunches" => Some(Self::Crunch),
            "pull-up" | "pull-ups" | "pullup" | "pullups" => Some(Self::PullUp),
            "plank" => Some(Self::Plank),
            _ => None,
        }
    }

    /// 表示用ラベル
    pub fn label(self) -> &'static str {
        match self {
            Self::PushUp => "Push-ups",
            Self::Squat => "Squats",
            Self::Crunch => "Crunches",
            Self::PullUp => "Pull-ups",
            Self::Plank => "Plank",
        }
    }

    /// レップ判定ルール（Plankは角度判定なしのためNone）
    pub(crate) fn rep_rule(self) -> Option<&'static RepRule> {
        match self {
            Self::PushUp => Some(&PUSH_UP),
            Self::Squat => Some(&SQUAT),
            Self::Crunch => Some(&CRUNCH),
            Self::PullUp => Some(&PULL_UP),
            Self::Plank => None,
        }
    }
}

/// 角度のしきい値判定
#[derive(Debug, Clone, Copy)]
pub(crate) enum Threshold {
    Below(f32),
    Above(f32),
}

impl Threshold {
    pub(crate) fn matches(self, angle: f32) -> bool {
        match self {
            Self::Below(limit) => angle < limit,
            Self::Above(limit) => angle > limit,
        }
    }
}

/// 種目ごとの判定ルール
///
/// enter_up / enter_down が2しきい値ヒステリシス。
/// hold_up / hold_down はフェーズを維持したまま動作を促す
/// フィードバックの条件（enter側が不成立のときのみ評価される）。
pub(crate) struct RepRule {
    /// 角度を計算する3関節 (A-頂点B-C)
    pub joints: [LandmarkIndex; 3],
    pub enter_up: Threshold,
    pub enter_down: Threshold,
    pub hold_up: Threshold,
    pub hold_down: Threshold,
    pub enter_up_text: &'static str,
    pub hold_up_text: &'static str,
    pub hold_down_text: &'static str,
}

static PUSH_UP: RepRule = RepRule {
    joints: [
        LandmarkIndex::LeftShoulder,
        LandmarkIndex::LeftElbow,
        LandmarkIndex::LeftWrist,
    ],
    enter_up: Threshold::Below(90.0),
    enter_down: Threshold::Above(160.0),
    hold_up: Threshold::Below(160.0),
    hold_down: Threshold::Above(90.0),
    enter_up_text: "Good form! Keep going up",
    hold_up_text: "Go all the way up!",
    hold_down_text: "Go lower for a proper push-up",
};

static SQUAT: RepRule = RepRule {
    joints: [
        LandmarkIndex::LeftHip,
        LandmarkIndex::LeftKnee,
        LandmarkIndex::LeftAnkle,
    ],
    enter_up: Threshold::Below(90.0),
    enter_down: Threshold::Above(160.0),
    hold_up: Threshold::Below(160.0),
    hold_down: Threshold::Above(90.0),
    enter_up_text: "Good depth! Now stand up",
    hold_up_text: "Stand up straight!",
    hold_down_text: "Go lower for a proper squat",
};

static CRUNCH: RepRule = RepRule {
    joints: [
        LandmarkIndex::LeftShoulder,
        LandmarkIndex::LeftHip,
        LandmarkIndex::LeftKnee,
    ],
    enter_up: Threshold::Below(60.0),
    enter_down: Threshold::Above(120.0),
    hold_up: Threshold::Above(60.0),
    hold_down: Threshold::Below(120.0),
    enter_up_text: "Good crunch! Now lower down",
    hold_up_text: "Keep your core engaged!",
    hold_down_text: "Lower down completely",
};

// プッシュアップと同じ関節だがしきい値の向きが反転:
// 腕を伸ばした状態(>160)がup、引き上げ切った状態(<90)がdown+1
static PULL_UP: RepRule = RepRule {
    joints: [
        LandmarkIndex::LeftShoulder,
        LandmarkIndex::LeftElbow,
        LandmarkIndex::LeftWrist,
    ],
    enter_up: Threshold::Above(160.0),
    enter_down: Threshold::Below(90.0),
    hold_up: Threshold::Above(90.0),
    hold_down: Threshold::Below(160.0),
    enter_up_text: "Good form! Keep pulling up",
    hold_up_text: "Pull up higher!",
    hold_down_text: "Lower down completely",
};
