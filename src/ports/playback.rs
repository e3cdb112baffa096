use async_trait::async_trait;

use crate::domain::DomainError;

/// The live, exclusive audio-rendering resource for one synthesized clip.
///
/// The playback manager holds at most one handle; starting a new playback
/// or an explicit stop fully releases the previous one first.
pub trait PlaybackHandle: Send + Sync {
    /// Stop playback and release the underlying resource. Idempotent.
    fn stop(&self);

    /// Whether audio is still being rendered.
    fn is_active(&self) -> bool;
}

/// Port for the platform audio output.
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Begin playing the given encoded audio, returning a handle that stops
    /// it. Playback continues after the call returns.
    async fn play(&self, audio: Vec<u8>) -> Result<Box<dyn PlaybackHandle>, DomainError>;
}
