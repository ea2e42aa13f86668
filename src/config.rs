use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::osc::OSC_DEFAULT_ADDR;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub osc: OscConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// 種目名 (e.g. "push-ups", "squats", "crunches", "pull-ups", "plank")
    #[serde(default = "default_exercise")]
    pub exercise: String,
    /// ランドマーク可視性の閾値
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// ポーズクライアントの待受アドレス
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OscConfig {
    /// フィードバック送信先 (UI/読み上げ側)
    #[serde(default = "default_osc_addr")]
    pub addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpeechConfig {
    /// 読み上げ出力の有効化
    #[serde(default = "default_speech_enabled")]
    pub enabled: bool,
}

fn default_exercise() -> String {
    "push-ups".to_string()
}
fn default_visibility_threshold() -> f32 {
    0.5
}
fn default_listen_addr() -> String {
    "127.0.0.1:39600".to_string()
}
fn default_osc_addr() -> String {
    OSC_DEFAULT_ADDR.to_string()
}
fn default_speech_enabled() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            exercise: default_exercise(),
            visibility_threshold: default_visibility_threshold(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            addr: default_osc_addr(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: default_speech_enabled(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 読み込みに失敗した場合はデフォルト設定を返す
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_default()
    }
}
