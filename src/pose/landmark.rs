use serde::{Deserialize, Serialize};

/// BlazePose の 33 ランドマークインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const COUNT: usize = 33;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Nose),
            1 => Some(Self::LeftEyeInner),
            2 => Some(Self::LeftEye),
            3 => Some(Self::LeftEyeOuter),
            4 => Some(Self::RightEyeInner),
            5 => Some(Self::RightEye),
            6 => Some(Self::RightEyeOuter),
            7 => Some(Self::LeftEar),
            8 => Some(Self::RightEar),
            9 => Some(Self::MouthLeft),
            10 => Some(Self::MouthRight),
            11 => Some(Self::LeftShoulder),
            12 => Some(Self::RightShoulder),
            13 => Some(Self::LeftElbow),
            14 => Some(Self::RightElbow),
            15 => Some(Self::LeftWrist),
            16 => Some(Self::RightWrist),
            17 => Some(Self::LeftPinky),
            18 => Some(Self::RightPinky),
            19 => Some(Self::LeftIndex),
            20 => Some(Self::RightIndex),
            21 => Some(Self::LeftThumb),
            22 => Some(Self::RightThumb),
            23 => Some(Self::LeftHip),
            24 => Some(Self::RightHip),
            25 => Some(Self::LeftKnee),
            26 => Some(Self::RightKnee),
            27 => Some(Self::LeftAnkle),
            28 => Some(Self::RightAnkle),
            29 => Some(Self::LeftHeel),
            30 => Some(Self::RightHeel),
            31 => Some(Self::LeftFootIndex),
            32 => Some(Self::RightFootIndex),
            _ => None,
        }
    }
}

/// 単一ランドマーク
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// 正規化されたX座標 (0.0〜1.0)
    pub x: f32,
    /// 正規化されたY座標 (0.0〜1.0、下方向が正)
    pub y: f32,
    /// 可視性スコア (0.0〜1.0)
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }

    /// 可視性が閾値以上か
    pub fn is_valid(&self, threshold: f32) -> bool {
        self.visibility >= threshold
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            visibility: 0.0,
        }
    }
}

/// 33ランドマークからなる1フレーム分の姿勢
#[derive(Debug, Clone)]
pub struct Landmarks {
    pub landmarks: [Landmark; LandmarkIndex::COUNT],
}

impl Landmarks {
    pub fn new(landmarks: [Landmark; LandmarkIndex::COUNT]) -> Self {
        Self { landmarks }
    }

    /// ワイヤ上のスライスから変換
    ///
    /// 長さが33でないフレームは不完全とみなしNone（未検出扱い）
    pub fn from_slice(slice: &[Landmark]) -> Option<Self> {
        let landmarks: [Landmark; LandmarkIndex::COUNT] = slice.try_into().ok()?;
        Some(Self { landmarks })
    }

    /// インデックスでランドマークを取得
    pub fn get(&self, index: LandmarkIndex) -> &Landmark {
        &self.landmarks[index as usize]
    }
}

impl Default for Landmarks {
    fn default() -> Self {
        Self {
            landmarks: [Landmark::default(); LandmarkIndex::COUNT],
        }
    }
}
