use crate::state::game_state::GameEvent;
use quad_snd::{AudioContext, PlaySoundParams, Sound as SndSound};
use std::collections::HashMap;
use std::fs;

macro_rules! define_sounds {
    ($($variant:ident => $file:literal),+ $(,)?) => {
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum Sound {
            $($variant),+
        }

        impl Sound {
            pub const ALL: &'static [Sound] = &[
                $(Sound::$variant),+
            ];

            pub const fn file_name(self) -> &'static str {
                match self {
                    $(Sound::$variant => $file),+
                }
            }
        }
    };
}

define_sounds! {
    Jump          => "jump.wav",
    CollectCoin   => "score.wav",
    Hit           => "hit.wav",
    LevelComplete => "clear.wav",
}

const SOUND_DIR: &str = "assets/sounds";

impl Sound {
    pub fn for_event(event: &GameEvent) -> Option<Sound> {
        match event {
            GameEvent::Jumped => Some(Sound::Jump),
            GameEvent::CoinCollected { .. } => Some(Sound::CollectCoin),
            GameEvent::LifeLost => Some(Sound::Hit),
            GameEvent::LevelCompleted { .. } | GameEvent::GameCompleted => {
                Some(Sound::LevelComplete)
            }
            GameEvent::ScoreChanged(_)
            | GameEvent::Respawned
            | GameEvent::LevelStarted { .. } => None,
        }
    }
}

pub struct SoundHandler {
    sounds: HashMap<Sound, SndSound>,
    audio_context: AudioContext,
}

impl SoundHandler {
    pub fn new() -> Self {
        let mut sounds: HashMap<Sound, SndSound> = HashMap::default();

        let audio_context = AudioContext::new();

        for sound in Sound::ALL {
            let full_path = format!("{}/{}", SOUND_DIR, sound.file_name());
            match fs::read(&full_path) {
                Ok(bytes) => {
                    let snd = SndSound::load(&audio_context, &bytes);
                    sounds.insert(*sound, snd);
                }
                Err(err) => log::info!("sound {full_path} not loaded: {err}"),
            }
        }
        log::info!("{} of {} sounds loaded", sounds.len(), Sound::ALL.len());

        SoundHandler {
            sounds,
            audio_context,
        }
    }

    pub fn play(&self, sound: Sound) {
        if let Some(sound) = self.sounds.get(&sound) {
            sound.play(&self.audio_context, PlaySoundParams::default());
        }
    }

    pub fn play_for(&self, event: &GameEvent) {
        if let Some(sound) = Sound::for_event(event) {
            self.play(sound);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_cues() {
        assert_eq!(Sound::for_event(&GameEvent::Jumped), Some(Sound::Jump));
        assert_eq!(
            Sound::for_event(&GameEvent::CoinCollected { col: 1, row: 2 }),
            Some(Sound::CollectCoin)
        );
        assert_eq!(Sound::for_event(&GameEvent::LifeLost), Some(Sound::Hit));
        assert_eq!(Sound::for_event(&GameEvent::ScoreChanged(3)), None);
        assert_eq!(Sound::for_event(&GameEvent::Respawned), None);
    }

    #[test]
    fn test_file_names_are_distinct() {
        let mut names: Vec<_> = Sound::ALL.iter().map(|s| s.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Sound::ALL.len());
    }
}
