use std::io::Cursor;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::domain::DomainError;
use crate::ports::{AudioOutput, PlaybackHandle};

/// Commands sent to the playback thread.
enum PlayerCommand {
    Play {
        audio: Vec<u8>,
        reply: oneshot::Sender<Result<Sink, DomainError>>,
    },
    Shutdown,
}

/// Playback handle wrapping one rodio sink.
/// Each synthesized clip gets its own sink; stopping empties the queue and
/// releases the source, which satisfies the rewound-and-released contract.
struct RodioPlaybackHandle {
    sink: Sink,
}

impl PlaybackHandle for RodioPlaybackHandle {
    fn stop(&self) {
        self.sink.stop();
    }

    fn is_active(&self) -> bool {
        !self.sink.empty()
    }
}

/// Audio output backed by rodio on a dedicated thread.
///
/// The output stream is not `Send`, so a single thread owns it for the
/// adapter's lifetime and serves playback requests over a command channel.
pub struct RodioOutput {
    commands: mpsc::Sender<PlayerCommand>,
    thread: Option<JoinHandle<()>>,
}

impl RodioOutput {
    /// Create the playback thread and open the default output device.
    ///
    /// # Errors
    ///
    /// Returns error if no output device is available.
    pub fn new() -> Result<Self, DomainError> {
        let (command_tx, command_rx) = mpsc::channel::<PlayerCommand>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();

        let thread = thread::spawn(move || {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => {
                    let _ = ready_tx.send(Ok(()));
                    pair
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };
            // Keep the stream alive for the thread's lifetime.
            let _stream = stream;

            while let Ok(command) = command_rx.recv() {
                match command {
                    PlayerCommand::Play { audio, reply } => {
                        let result = Sink::try_new(&handle)
                            .map_err(|e| DomainError::Audio(e.to_string()))
                            .and_then(|sink| {
                                let source = Decoder::new(Cursor::new(audio))
                                    .map_err(|e| DomainError::Audio(e.to_string()))?;
                                sink.append(source);
                                sink.play();
                                Ok(sink)
                            });
                        let _ = reply.send(result);
                    }
                    PlayerCommand::Shutdown => break,
                }
            }
            debug!("playback thread exiting");
        });

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!("audio output initialized");
                Ok(Self {
                    commands: command_tx,
                    thread: Some(thread),
                })
            }
            Ok(Err(message)) => {
                let _ = thread.join();
                Err(DomainError::Audio(format!("no output device: {message}")))
            }
            Err(_) => Err(DomainError::Audio("playback thread died".to_string())),
        }
    }
}

#[async_trait]
impl AudioOutput for RodioOutput {
    async fn play(&self, audio: Vec<u8>) -> Result<Box<dyn PlaybackHandle>, DomainError> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.commands
            .send(PlayerCommand::Play {
                audio,
                reply: reply_tx,
            })
            .map_err(|_| DomainError::Audio("playback thread unavailable".to_string()))?;

        let sink = reply_rx
            .await
            .map_err(|_| DomainError::Audio("playback thread unavailable".to_string()))??;

        Ok(Box::new(RodioPlaybackHandle { sink }))
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        let _ = self.commands.send(PlayerCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("playback thread panicked during shutdown");
            }
        }
    }
}
