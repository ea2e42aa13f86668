//! TCP protocol for pose-client ↔ feedback-server communication.
//!
//! The pose-estimation collaborator pushes one landmark frame per video
//! frame; the server answers each frame with the current (count, feedback)
//! pair.

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::pose::Landmark;

// --- Message types ---

/// Pose client → server
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum ClientMessage {
    /// Switch exercise; the server discards the session and starts a fresh
    /// one. An unknown name is answered with `ServerMessage::Error` and the
    /// connection stays up.
    SelectExercise { name: String },
    /// One video frame worth of landmarks. `None` = no body detected.
    Frame {
        timestamp_us: u64,
        landmarks: Option<Vec<Landmark>>,
    },
}

/// Server → pose client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum ServerMessage {
    Ready,
    Feedback { count: u32, feedback: String },
    Error { message: String },
}

// --- TCP codec helpers ---

pub type MessageStream = Framed<TcpStream, LengthDelimitedCodec>;

/// Create a framed message stream with length-delimited framing.
pub fn message_stream(stream: TcpStream) -> MessageStream {
    let codec = LengthDelimitedCodec::builder()
        .max_frame_length(64 * 1024) // landmark frames are small
        .new_codec();
    Framed::new(stream, codec)
}

/// Send a serializable message (bincode + length prefix).
pub async fn send_message<T: Serialize>(
    stream: &mut MessageStream,
    msg: &T,
) -> anyhow::Result<()> {
    let data = bincode::serialize(msg)?;
    stream.send(Bytes::from(data)).await?;
    Ok(())
}

/// Receive and deserialize a message. `None` = connection closed.
pub async fn recv_message<T: DeserializeOwned>(
    stream: &mut MessageStream,
) -> anyhow::Result<Option<T>> {
    match stream.next().await {
        Some(Ok(bytes)) => Ok(Some(bincode::deserialize(&bytes)?)),
        Some(Err(e)) => Err(e.into()),
        None => Ok(None),
    }
}
