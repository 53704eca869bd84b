use std::time::{Duration, Instant};

use anyhow::Result;

use super::service::SettingsService;
use crate::models::settings::AppSettings;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Debounced settings writer.
///
/// Slider drags and toggles record a change each time; the file is written
/// only once no change has arrived for the debounce window.
pub struct SettingsSync {
    debounce: Duration,
    pending: Option<AppSettings>,
    last_change: Option<Instant>,
}

impl Default for SettingsSync {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SettingsSync {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: None,
            last_change: None,
        }
    }

    pub fn record(&mut self, settings: AppSettings, now: Instant) {
        self.pending = Some(settings);
        self.last_change = Some(now);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match (self.pending.as_ref(), self.last_change) {
            (Some(_), Some(last)) => now.saturating_duration_since(last) >= self.debounce,
            _ => false,
        }
    }

    /// Write the pending settings if the debounce window has passed.
    /// Returns whether anything was written.
    pub fn flush_if_due(&mut self, service: &SettingsService, now: Instant) -> Result<bool> {
        if !self.is_due(now) {
            return Ok(false);
        }
        self.flush(service)
    }

    /// Write the pending settings now, e.g. on shutdown.
    pub fn flush(&mut self, service: &SettingsService) -> Result<bool> {
        let Some(settings) = self.pending.take() else {
            return Ok(false);
        };

        if let Err(err) = service.save(&settings) {
            // keep the change so the next flush retries it
            self.pending = Some(settings);
            return Err(err);
        }

        self.last_change = None;
        Ok(true)
    }
}
