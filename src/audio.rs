//! Audio sequencing over a pluggable backend
//!
//! The core never touches a sound device. It drives an `AudioBackend` and
//! runs the capture cue: pause the ambient track, play the capture one-shot,
//! resume ambient once the one-shot reports completion. Completion may arrive
//! on any thread; it is posted back to the session inbox and applied on the
//! next frame.

use std::fmt;
use std::sync::mpsc::Sender;

use crate::session::Inbound;
use crate::settings::AudioSettings;

/// Named sound resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    /// Looping ambient track
    BackgroundMusic,
    /// One-shot played on capture
    CaptureSound,
}

impl Sound {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sound::BackgroundMusic => "background_music",
            Sound::CaptureSound => "capture_sound",
        }
    }
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one capture one-shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CueId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No audio device/context available
    Unavailable,
    /// Resource missing or failed to decode
    NotLoaded(Sound),
    /// Backend refused the request
    Playback { sound: Sound, reason: String },
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "audio output unavailable"),
            Self::NotLoaded(sound) => write!(f, "sound '{}' is not loaded", sound),
            Self::Playback { sound, reason } => {
                write!(f, "playback of '{}' failed: {}", sound, reason)
            }
        }
    }
}

impl std::error::Error for AudioError {}

/// Completion handle for a one-shot. `Send`, so a backend may fire it from
/// its own audio thread.
#[derive(Debug)]
pub struct CueCompletion {
    cue: CueId,
    tx: Sender<Inbound>,
}

impl CueCompletion {
    pub fn new(cue: CueId, tx: Sender<Inbound>) -> Self {
        Self { cue, tx }
    }

    pub fn cue(&self) -> CueId {
        self.cue
    }

    /// Report that the one-shot finished playing
    pub fn complete(self) {
        if self.tx.send(Inbound::CueFinished(self.cue)).is_err() {
            log::debug!("Cue {:?} finished after teardown, dropped", self.cue);
        }
    }
}

/// Sound output collaborator
pub trait AudioBackend {
    fn play_looped(&mut self, sound: Sound, volume: f32) -> Result<(), AudioError>;
    fn pause(&mut self, sound: Sound) -> Result<(), AudioError>;
    fn resume(&mut self, sound: Sound) -> Result<(), AudioError>;
    fn stop(&mut self, sound: Sound) -> Result<(), AudioError>;
    /// Play once; the backend must call `done.complete()` when playback ends
    fn play_once(&mut self, sound: Sound, volume: f32, done: CueCompletion)
    -> Result<(), AudioError>;
}

/// Backend with no output. One-shots complete immediately.
#[derive(Debug, Default)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn play_looped(&mut self, sound: Sound, volume: f32) -> Result<(), AudioError> {
        log::debug!("(silent) loop {} at {:.2}", sound, volume);
        Ok(())
    }

    fn pause(&mut self, sound: Sound) -> Result<(), AudioError> {
        log::debug!("(silent) pause {}", sound);
        Ok(())
    }

    fn resume(&mut self, sound: Sound) -> Result<(), AudioError> {
        log::debug!("(silent) resume {}", sound);
        Ok(())
    }

    fn stop(&mut self, sound: Sound) -> Result<(), AudioError> {
        log::debug!("(silent) stop {}", sound);
        Ok(())
    }

    fn play_once(
        &mut self,
        sound: Sound,
        volume: f32,
        done: CueCompletion,
    ) -> Result<(), AudioError> {
        log::debug!("(silent) play {} at {:.2}", sound, volume);
        done.complete();
        Ok(())
    }
}

/// Ambient track and capture cue state
pub struct AudioDirector<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    /// Scene asked for ambient music; cleared when the track proves unplayable
    ambient_requested: bool,
    ambient_started: bool,
    /// One-shots still playing; ambient resumes when this empties
    outstanding: Vec<CueId>,
    next_cue: u64,
}

impl<B: AudioBackend> AudioDirector<B> {
    pub fn new(backend: B, settings: &AudioSettings) -> Self {
        Self {
            backend,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            ambient_requested: false,
            ambient_started: false,
            outstanding: Vec::new(),
            next_cue: 1,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Mute/unmute all audio. Muting pauses the ambient track; unmuting
    /// resumes it, or starts it if the scene asked for it while muted. While a
    /// capture cue is outstanding the track is already paused and its
    /// completion decides.
    pub fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        if !self.outstanding.is_empty() {
            return;
        }
        if muted {
            if self.ambient_started {
                if let Err(e) = self.backend.pause(Sound::BackgroundMusic) {
                    log::warn!("Failed to pause ambient: {}", e);
                }
            }
        } else {
            self.restore_ambient();
        }
    }

    /// One-shots that have not reported completion yet
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    fn music_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    fn sfx_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Start the looping ambient track (deferred until unmute when muted)
    pub fn start_ambient(&mut self) {
        self.ambient_requested = true;
        self.begin_ambient();
    }

    fn begin_ambient(&mut self) {
        let vol = self.music_level();
        if vol <= 0.0 {
            return;
        }
        match self.backend.play_looped(Sound::BackgroundMusic, vol) {
            Ok(()) => self.ambient_started = true,
            Err(e) => {
                log::warn!("Ambient music unavailable: {}", e);
                self.ambient_requested = false;
            }
        }
    }

    /// Bring ambient back after a pause: resume the track, or start it if it
    /// never got going
    fn restore_ambient(&mut self) {
        if self.ambient_started {
            if let Err(e) = self.backend.resume(Sound::BackgroundMusic) {
                log::warn!("Failed to resume ambient, continuing without it: {}", e);
                self.ambient_started = false;
                self.ambient_requested = false;
            }
        } else if self.ambient_requested {
            self.begin_ambient();
        }
    }

    /// Capture cue, steps one and two: pause ambient, play the one-shot.
    ///
    /// `tx` is where the completion will be posted.
    pub fn play_capture(&mut self, tx: &Sender<Inbound>) {
        let vol = self.sfx_level();
        if vol <= 0.0 {
            return;
        }

        if self.ambient_started && self.outstanding.is_empty() {
            if let Err(e) = self.backend.pause(Sound::BackgroundMusic) {
                log::warn!("Failed to pause ambient: {}", e);
            }
        }

        let cue = CueId(self.next_cue);
        self.next_cue += 1;
        self.outstanding.push(cue);

        let done = CueCompletion::new(cue, tx.clone());
        if let Err(e) = self.backend.play_once(Sound::CaptureSound, vol, done) {
            log::warn!("Capture sound failed: {}", e);
            // Nothing will report completion for this cue
            self.finish(cue);
        }
    }

    /// Capture cue, step three: the one-shot finished. Runs on the game-state
    /// owner when the session drains its inbox.
    pub fn on_cue_finished(&mut self, cue: CueId) {
        if !self.outstanding.contains(&cue) {
            log::debug!("Ignoring completion for unknown cue {:?}", cue);
            return;
        }
        self.finish(cue);
    }

    fn finish(&mut self, cue: CueId) {
        self.outstanding.retain(|c| *c != cue);
        if self.outstanding.is_empty() && !self.muted {
            self.restore_ambient();
        }
    }

    /// Scene teardown: forget pending cues and silence the ambient track
    pub fn teardown(&mut self) {
        self.outstanding.clear();
        if self.ambient_started {
            if let Err(e) = self.backend.stop(Sound::BackgroundMusic) {
                log::warn!("Failed to stop ambient: {}", e);
            }
            self.ambient_started = false;
        }
        self.ambient_requested = false;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::mpsc;

    /// Records every call; one-shots are held until the test completes them
    #[derive(Debug, Default)]
    pub(crate) struct RecordingBackend {
        pub calls: Vec<String>,
        pub pending: Vec<CueCompletion>,
        pub fail_once: bool,
        pub fail_resume: bool,
        pub fail_loop: bool,
    }

    impl AudioBackend for RecordingBackend {
        fn play_looped(&mut self, sound: Sound, _volume: f32) -> Result<(), AudioError> {
            if self.fail_loop {
                return Err(AudioError::NotLoaded(sound));
            }
            self.calls.push(format!("loop {}", sound));
            Ok(())
        }

        fn pause(&mut self, sound: Sound) -> Result<(), AudioError> {
            self.calls.push(format!("pause {}", sound));
            Ok(())
        }

        fn resume(&mut self, sound: Sound) -> Result<(), AudioError> {
            if self.fail_resume {
                return Err(AudioError::Unavailable);
            }
            self.calls.push(format!("resume {}", sound));
            Ok(())
        }

        fn stop(&mut self, sound: Sound) -> Result<(), AudioError> {
            self.calls.push(format!("stop {}", sound));
            Ok(())
        }

        fn play_once(
            &mut self,
            sound: Sound,
            _volume: f32,
            done: CueCompletion,
        ) -> Result<(), AudioError> {
            if self.fail_once {
                return Err(AudioError::Playback {
                    sound,
                    reason: "decoder error".to_string(),
                });
            }
            self.calls.push(format!("play {}", sound));
            self.pending.push(done);
            Ok(())
        }
    }

    fn director() -> AudioDirector<RecordingBackend> {
        AudioDirector::new(RecordingBackend::default(), &AudioSettings::default())
    }

    fn finished(rx: &mpsc::Receiver<Inbound>) -> Vec<CueId> {
        rx.try_iter()
            .filter_map(|m| match m {
                Inbound::CueFinished(cue) => Some(cue),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_capture_cue_sequence() {
        let (tx, rx) = mpsc::channel();
        let mut audio = director();
        audio.start_ambient();
        audio.play_capture(&tx);
        assert_eq!(
            audio.backend().calls,
            vec!["loop background_music", "pause background_music", "play capture_sound"]
        );

        // Completion arrives from the backend thread, applied later
        let done = audio.backend_mut().pending.pop().unwrap();
        std::thread::spawn(move || done.complete()).join().unwrap();
        for cue in finished(&rx) {
            audio.on_cue_finished(cue);
        }
        assert_eq!(audio.backend().calls.last().unwrap(), "resume background_music");
        assert_eq!(audio.outstanding(), 0);
    }

    #[test]
    fn test_overlapping_captures_resume_once_at_end() {
        let (tx, rx) = mpsc::channel();
        let mut audio = director();
        audio.start_ambient();
        audio.play_capture(&tx);
        audio.play_capture(&tx);
        assert_eq!(audio.outstanding(), 2);

        let first = audio.backend_mut().pending.remove(0);
        first.complete();
        for cue in finished(&rx) {
            audio.on_cue_finished(cue);
        }
        assert!(!audio.backend().calls.iter().any(|c| c.starts_with("resume")));

        let second = audio.backend_mut().pending.remove(0);
        second.complete();
        for cue in finished(&rx) {
            audio.on_cue_finished(cue);
        }
        let pauses = audio.backend().calls.iter().filter(|c| c.starts_with("pause")).count();
        let resumes = audio.backend().calls.iter().filter(|c| c.starts_with("resume")).count();
        assert_eq!((pauses, resumes), (1, 1));
    }

    #[test]
    fn test_failed_one_shot_resumes_ambient() {
        let (tx, _rx) = mpsc::channel();
        let mut audio = director();
        audio.start_ambient();
        audio.backend_mut().fail_once = true;
        audio.play_capture(&tx);
        assert_eq!(audio.outstanding(), 0);
        assert_eq!(audio.backend().calls.last().unwrap(), "resume background_music");
    }

    #[test]
    fn test_failed_resume_degrades_quietly() {
        let (tx, rx) = mpsc::channel();
        let mut audio = director();
        audio.start_ambient();
        audio.backend_mut().fail_resume = true;
        audio.play_capture(&tx);
        audio.backend_mut().pending.pop().unwrap().complete();
        for cue in finished(&rx) {
            audio.on_cue_finished(cue);
        }
        // Next capture no longer tries to pause a track that isn't playing
        audio.backend_mut().fail_resume = false;
        audio.play_capture(&tx);
        let pauses = audio.backend().calls.iter().filter(|c| c.starts_with("pause")).count();
        assert_eq!(pauses, 1);
    }

    #[test]
    fn test_missing_ambient_still_plays_capture() {
        let (tx, _rx) = mpsc::channel();
        let mut audio = director();
        audio.backend_mut().fail_loop = true;
        audio.start_ambient();
        audio.play_capture(&tx);
        assert_eq!(audio.backend().calls, vec!["play capture_sound"]);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let (tx, _rx) = mpsc::channel();
        let mut audio = director();
        audio.set_muted(true);
        audio.start_ambient();
        audio.play_capture(&tx);
        assert!(audio.backend().calls.is_empty());
    }

    #[test]
    fn test_completion_after_teardown_is_discarded() {
        let (tx, rx) = mpsc::channel();
        let mut audio = director();
        audio.start_ambient();
        audio.play_capture(&tx);
        audio.teardown();
        drop(rx);

        // Receiver gone: completing must not panic
        audio.backend_mut().pending.pop().unwrap().complete();
        assert_eq!(audio.backend().calls.last().unwrap(), "stop background_music");
        assert_eq!(audio.outstanding(), 0);
    }

    #[test]
    fn test_mute_pauses_and_unmute_resumes_ambient() {
        let mut audio = director();
        audio.start_ambient();
        audio.set_muted(true);
        audio.set_muted(true);
        audio.set_muted(false);
        assert_eq!(
            audio.backend().calls,
            vec!["loop background_music", "pause background_music", "resume background_music"]
        );
    }

    #[test]
    fn test_ambient_requested_while_muted_starts_on_unmute() {
        let settings = AudioSettings {
            muted: true,
            ..Default::default()
        };
        let mut audio = AudioDirector::new(RecordingBackend::default(), &settings);
        audio.start_ambient();
        assert!(audio.backend().calls.is_empty());
        audio.set_muted(false);
        assert_eq!(audio.backend().calls, vec!["loop background_music"]);
    }

    #[test]
    fn test_cue_finishing_while_muted_keeps_ambient_paused() {
        let (tx, rx) = mpsc::channel();
        let mut audio = director();
        audio.start_ambient();
        audio.play_capture(&tx);
        audio.set_muted(true);
        audio.backend_mut().pending.pop().unwrap().complete();
        for cue in finished(&rx) {
            audio.on_cue_finished(cue);
        }
        assert_eq!(audio.outstanding(), 0);
        assert!(!audio.backend().calls.iter().any(|c| c.starts_with("resume")));

        audio.set_muted(false);
        assert_eq!(audio.backend().calls.last().unwrap(), "resume background_music");
        let pauses = audio.backend().calls.iter().filter(|c| c.starts_with("pause")).count();
        assert_eq!(pauses, 1);
    }

    #[test]
    fn test_stale_completion_ignored() {
        let mut audio = director();
        audio.start_ambient();
        audio.on_cue_finished(CueId(99));
        assert_eq!(audio.backend().calls, vec!["loop background_music"]);
    }
}
