use anyhow::Result;
use std::time::Instant;
use tokio::net::{TcpListener, TcpStream};

use fitfusion_tracker::config::Config;
use fitfusion_tracker::osc::FeedbackClient;
use fitfusion_tracker::pose::Landmarks;
use fitfusion_tracker::protocol::{
    message_stream, recv_message, send_message, ClientMessage, ServerMessage,
};
use fitfusion_tracker::speech::{ConsoleSpeaker, Speaker, SpeechGate};
use fitfusion_tracker::tracker::{Exercise, ExerciseSession};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    println!("FitFusion Feedback Server");
    println!("Listen: {}", config.server.listen_addr);
    println!("OSC target: {}", config.osc.addr);
    println!("Exercise: {}", config.session.exercise);
    println!("Speech: {}", if config.speech.enabled { "ON" } else { "OFF" });
    println!();

    let listener = TcpListener::bind(&config.server.listen_addr).await?;

    loop {
        let (socket, peer) = listener.accept().await?;
        println!("Pose client connected: {}", peer);
        let config = config.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, &config).await {
                eprintln!("Client error: {:#}", e);
            }
            println!("Pose client disconnected: {}", peer);
        });
    }
}

async fn handle_client(socket: TcpStream, config: &Config) -> Result<()> {
    let mut stream = message_stream(socket);
    let mut session = ExerciseSession::from_config(config)?;
    let mut gate = SpeechGate::new(config.speech.enabled);
    let mut speaker = ConsoleSpeaker;
    let osc = FeedbackClient::new(&config.osc.addr)?;

    send_message(&mut stream, &ServerMessage::Ready).await?;

    // フレーム統計（1秒に1回表示）
    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();

    while let Some(msg) = recv_message::<ClientMessage>(&mut stream).await? {
        match msg {
            ClientMessage::SelectExercise { name } => match Exercise::from_name(&name) {
                Some(exercise) => {
                    // 種目変更はセッションの作り直し
                    session = ExerciseSession::new(exercise)
                        .with_visibility_threshold(config.session.visibility_threshold);
                    gate.reset();
                    println!("Exercise: {}", exercise.label());
                    send_message(&mut stream, &ServerMessage::Ready).await?;
                }
                None => {
                    send_message(
                        &mut stream,
                        &ServerMessage::Error {
                            message: format!("unknown exercise type: {}", name),
                        },
                    )
                    .await?;
                }
            },
            ClientMessage::Frame { landmarks, .. } => {
                let frame = landmarks.as_deref().and_then(Landmarks::from_slice);
                let (count, feedback) = session.update(frame.as_ref());
                let feedback = feedback.to_string();

                osc.send(count, &feedback)?;
                if let Some(text) = gate.utter(&feedback) {
                    speaker.speak(text)?;
                }
                send_message(&mut stream, &ServerMessage::Feedback { count, feedback }).await?;

                frame_count += 1;
                let elapsed = fps_timer.elapsed().as_secs_f32();
                if elapsed >= 1.0 {
                    println!(
                        "FPS: {:.1} | {}: {}",
                        frame_count as f32 / elapsed,
                        session.exercise().label(),
                        count
                    );
                    frame_count = 0;
                    fps_timer = Instant::now();
                }
            }
        }
    }

    Ok(())
}
