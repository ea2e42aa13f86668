use anyhow::Result;

/// フィードバック読み上げコラボレータ
///
/// 実際の音声合成は外部プロセス側の責務。ここでは注入境界のみを定義する。
pub trait Speaker {
    fn speak(&mut self, text: &str) -> Result<()>;
}

/// 標準出力へ書き出すスピーカー（開発用）
pub struct ConsoleSpeaker;

impl Speaker for ConsoleSpeaker {
    fn speak(&mut self, text: &str) -> Result<()> {
        println!("[speech] {}", text);
        Ok(())
    }
}

/// 同一フィードバックの連続読み上げを抑制するゲート
///
/// 「最後に読み上げた文言」の状態はセッションではなくこのゲートが所有する。
pub struct SpeechGate {
    enabled: bool,
    last_spoken: String,
}

impl SpeechGate {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last_spoken: String::new(),
        }
    }

    /// 読み上げるべきフィードバックだけを返す
    ///
    /// 無効時・空文字・直前と同一の文言はNone。
    pub fn utter<'a>(&mut self, feedback: &'a str) -> Option<&'a str> {
        if !self.enabled || feedback.is_empty() || feedback == self.last_spoken {
            return None;
        }
        self.last_spoken.clear();
        self.last_spoken.push_str(feedback);
        Some(feedback)
    }

    /// セッション作り直し時に呼ぶ
    pub fn reset(&mut self) {
        self.last_spoken.clear();
    }
}
