use anyhow::Result;
use rosc::{encoder, OscMessage, OscPacket, OscType};
use std::net::UdpSocket;

/// フィードバック送信先のデフォルトアドレス
pub const OSC_DEFAULT_ADDR: &str = "127.0.0.1:39601";

/// フィードバックメッセージのOSCアドレス
pub const FEEDBACK_OSC_PATH: &str = "/fitfusion/feedback";

/// UI/読み上げ側へ送る (カウント, フィードバック) のOSCメッセージを構築
pub fn build_feedback_message(count: u32, feedback: &str) -> OscMessage {
    OscMessage {
        addr: FEEDBACK_OSC_PATH.to_string(),
        args: vec![
            OscType::Int(count as i32),
            OscType::String(feedback.to_string()),
        ],
    }
}

/// OSCメッセージをバイト列にエンコード
pub fn encode_feedback_message(msg: &OscMessage) -> Result<Vec<u8>> {
    let packet = OscPacket::Message(msg.clone());
    let encoded = encoder::encode(&packet)?;
    Ok(encoded)
}

/// フィードバッククライアント
pub struct FeedbackClient {
    socket: UdpSocket,
    target_addr: String,
}

impl FeedbackClient {
    /// 新しいフィードバッククライアントを作成
    pub fn new(target_addr: &str) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        Ok(Self {
            socket,
            target_addr: target_addr.to_string(),
        })
    }

    /// デフォルトアドレス(127.0.0.1:39601)で作成
    pub fn default() -> Result<Self> {
        Self::new(OSC_DEFAULT_ADDR)
    }

    /// 現在のカウントとフィードバックを送信
    pub fn send(&self, count: u32, feedback: &str) -> Result<()> {
        let msg = build_feedback_message(count, feedback);
        let data = encode_feedback_message(&msg)?;
        self.socket.send_to(&data, &self.target_addr)?;
        Ok(())
    }
}
