//! Background music session.
//!
//! The session is owned by whoever runs the application and handed to the
//! screens that need it. `start` and `stop` bracket the application's
//! lifetime; dropping a started session stops playback.

use anyhow::Result;

use crate::models::settings::AppSettings;

pub const DEFAULT_TRACK: &str = "audio/background-loop.mp3";

/// Playback backend. The planner never decodes audio itself.
#[cfg_attr(test, mockall::automock)]
pub trait AudioPlayer {
    fn load(&mut self, track: &str) -> Result<()>;
    fn play(&mut self, looping: bool) -> Result<()>;
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
}

/// Backend for environments without audio output. Only logs.
#[derive(Debug, Default)]
pub struct SilentPlayer {
    track: Option<String>,
}

impl AudioPlayer for SilentPlayer {
    fn load(&mut self, track: &str) -> Result<()> {
        log::debug!("Silent player loaded {}", track);
        self.track = Some(track.to_string());
        Ok(())
    }

    fn play(&mut self, looping: bool) -> Result<()> {
        log::debug!("Silent player playing {:?} (looping: {})", self.track, looping);
        Ok(())
    }

    fn stop(&mut self) {
        log::debug!("Silent player stopped");
    }

    fn set_volume(&mut self, volume: f32) {
        log::debug!("Silent player volume {}", volume);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

pub struct AudioSession {
    player: Box<dyn AudioPlayer>,
    track: String,
    state: PlaybackState,
    enabled: bool,
    volume: f32,
    muted: bool,
}

impl AudioSession {
    pub fn new(player: Box<dyn AudioPlayer>, track: impl Into<String>) -> Self {
        Self {
            player,
            track: track.into(),
            state: PlaybackState::Stopped,
            enabled: true,
            volume: 0.5,
            muted: false,
        }
    }

    /// Load and loop the track. No-op while music is disabled or already
    /// playing.
    pub fn start(&mut self) -> Result<()> {
        if !self.enabled {
            log::info!("Background music disabled; not starting");
            return Ok(());
        }
        if self.state == PlaybackState::Playing {
            return Ok(());
        }

        self.player.load(&self.track)?;
        self.player.set_volume(self.effective_volume());
        self.player.play(true)?;
        self.state = PlaybackState::Playing;
        log::info!("Background music started");
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.state == PlaybackState::Playing {
            self.player.stop();
            self.state = PlaybackState::Stopped;
            log::info!("Background music stopped");
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.player.set_volume(self.effective_volume());
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.player.set_volume(self.effective_volume());
    }

    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.muted);
    }

    /// Bring the session in line with the settings panel.
    pub fn apply_settings(&mut self, settings: &AppSettings) -> Result<()> {
        self.enabled = settings.music_enabled;
        self.volume = settings.volume.clamp(0.0, 1.0);
        self.muted = settings.muted;

        match (self.enabled, self.state) {
            (true, PlaybackState::Stopped) => self.start(),
            (false, PlaybackState::Playing) => {
                self.stop();
                Ok(())
            }
            _ => {
                self.player.set_volume(self.effective_volume());
                Ok(())
            }
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Volume actually sent to the player
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }
}

impl Drop for AudioSession {
    fn drop(&mut self) {
        self.stop();
    }
}
