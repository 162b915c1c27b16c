use serde::Serialize;

pub const MAX_VOLUME: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    CursorMove,
}

/// Playback lives with the host; the map core only says which cue to fire.
pub trait AudioCueSink {
    fn play(&mut self, cue: AudioCue);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioCueSink for NullAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AudioSettings {
    pub master_volume: u8,
    pub sfx_volume: u8,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 80,
            sfx_volume: 80,
        }
    }
}

impl AudioSettings {
    pub fn new(master_volume: u8, sfx_volume: u8) -> Self {
        Self {
            master_volume: master_volume.min(MAX_VOLUME),
            sfx_volume: sfx_volume.min(MAX_VOLUME),
        }
    }

    pub fn sfx_audible(&self) -> bool {
        self.master_volume > 0 && self.sfx_volume > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn muted_master_or_sfx_silences_cues() {
        assert!(AudioSettings::default().sfx_audible());
        assert!(!AudioSettings::new(0, 80).sfx_audible());
        assert!(!AudioSettings::new(80, 0).sfx_audible());
    }

    #[test]
    fn volumes_clamp_to_max() {
        let settings = AudioSettings::new(250, 101);
        assert_eq!(settings.master_volume, MAX_VOLUME);
        assert_eq!(settings.sfx_volume, MAX_VOLUME);
    }
}
