//=========================================================================
// Audio Service
//=========================================================================
//
// Background music and sound effects, fire-and-forget.
//
// `ShellAudio` drives an external player (`aplay` on the Pi) as child
// processes: one looping process group for BGM, one short-lived process
// per effect. Volume is applied to the mixer through `amixer`, since the
// player itself has no volume control. When no sound card is present the
// service turns silent after a single warning.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::config::AudioConfig;

//=== Track ===============================================================

/// Every sound shipped with the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
    Click,
    Bgm00,
    Bgm01,
    Bgm02,
}

impl Track {
    /// File name inside the audio directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Click => "click_001.wav",
            Self::Bgm00 => "bgm_00.wav",
            Self::Bgm01 => "bgm_01.wav",
            Self::Bgm02 => "bgm_02.wav",
        }
    }
}

//=== Volumes =============================================================

/// Volume levels, each clamped to `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volumes {
    pub main: u8,
    pub bgm: u8,
    pub sfx: u8,
}

impl Volumes {
    pub const MAX: u8 = 100;

    pub fn new(main: u8, bgm: u8, sfx: u8) -> Self {
        Self {
            main: main.min(Self::MAX),
            bgm: bgm.min(Self::MAX),
            sfx: sfx.min(Self::MAX),
        }
    }

    /// BGM level after the main volume is applied.
    pub fn effective_bgm(&self) -> u8 {
        (u16::from(self.bgm) * u16::from(self.main) / u16::from(Self::MAX)) as u8
    }

    /// Effect level after the main volume is applied.
    pub fn effective_sfx(&self) -> u8 {
        (u16::from(self.sfx) * u16::from(self.main) / u16::from(Self::MAX)) as u8
    }
}

impl Default for Volumes {
    fn default() -> Self {
        Self::new(Self::MAX, Self::MAX, Self::MAX)
    }
}

//=== AudioService ========================================================

pub trait AudioService {
    /// Starts looping `track`, replacing whatever music was playing.
    fn play_bgm(&mut self, track: Track);

    /// Plays `track` once on top of the music.
    fn play_sfx(&mut self, track: Track);

    fn stop_bgm(&mut self);

    fn set_main_volume(&mut self, volume: u8);
    fn set_bgm_volume(&mut self, volume: u8);
    fn set_sfx_volume(&mut self, volume: u8);

    fn volumes(&self) -> Volumes;

    /// Music currently looping, if any.
    fn current_bgm(&self) -> Option<Track>;
}

//=== SilentAudio =========================================================

/// Audio service that plays nothing but keeps the bookkeeping, so callers
/// observe the same state as with real output.
#[derive(Debug, Default)]
pub struct SilentAudio {
    volumes: Volumes,
    bgm: Option<Track>,
    sfx_played: usize,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of effects requested so far.
    pub fn sfx_played(&self) -> usize {
        self.sfx_played
    }
}

impl AudioService for SilentAudio {
    fn play_bgm(&mut self, track: Track) {
        self.bgm = Some(track);
    }

    fn play_sfx(&mut self, _track: Track) {
        self.sfx_played += 1;
    }

    fn stop_bgm(&mut self) {
        self.bgm = None;
    }

    fn set_main_volume(&mut self, volume: u8) {
        self.volumes.main = volume.min(Volumes::MAX);
    }

    fn set_bgm_volume(&mut self, volume: u8) {
        self.volumes.bgm = volume.min(Volumes::MAX);
    }

    fn set_sfx_volume(&mut self, volume: u8) {
        self.volumes.sfx = volume.min(Volumes::MAX);
    }

    fn volumes(&self) -> Volumes {
        self.volumes
    }

    fn current_bgm(&self) -> Option<Track> {
        self.bgm
    }
}

//=== ShellAudio ==========================================================

/// Plays audio by spawning the configured command-line player.
pub struct ShellAudio {
    player: String,
    audio_dir: PathBuf,
    volumes: Volumes,
    available: bool,
    bgm: Option<(Track, Child)>,
    effects: Vec<Child>,
}

impl ShellAudio {
    //--- Construction -----------------------------------------------------

    /// Probes the player once; without a sound card every call is a no-op.
    pub fn new(config: &AudioConfig, audio_dir: impl Into<PathBuf>) -> Self {
        let available = config.enabled && probe_sound_card(&config.player);
        let mut audio = Self {
            player: config.player.clone(),
            audio_dir: audio_dir.into(),
            volumes: Volumes::new(config.main_volume, config.bgm_volume, config.sfx_volume),
            available,
            bgm: None,
            effects: Vec::new(),
        };
        audio.apply_mixer_volume();
        audio
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    //--- Internal Helpers -------------------------------------------------

    fn track_path(&self, track: Track) -> Option<PathBuf> {
        let path = self.audio_dir.join(track.file_name());
        if path.is_file() {
            Some(path)
        } else {
            warn!("Audio file not found: {}", path.display());
            None
        }
    }

    fn apply_mixer_volume(&self) {
        if !self.available {
            return;
        }
        let level = format!("{}%", self.volumes.effective_bgm());
        let status = Command::new("amixer")
            .args(["set", "PCM", &level])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if let Err(e) = status {
            debug!("amixer unavailable: {}", e);
        }
    }

    /// Reaps finished effect processes.
    fn reap_effects(&mut self) {
        self.effects.retain_mut(|child| !matches!(child.try_wait(), Ok(Some(_))));
    }

    fn spawn_bgm_loop(&self, path: &Path) -> std::io::Result<Child> {
        // The path is passed as `$0` so it never needs shell quoting.
        let script = format!("while true; do {} -q \"$0\" || break; done", self.player);
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(script)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        command.spawn()
    }
}

impl AudioService for ShellAudio {
    fn play_bgm(&mut self, track: Track) {
        self.stop_bgm();
        if !self.available {
            return;
        }
        let Some(path) = self.track_path(track) else {
            return;
        };

        self.apply_mixer_volume();
        match self.spawn_bgm_loop(&path) {
            Ok(child) => {
                debug!("BGM started: {:?}", track);
                self.bgm = Some((track, child));
            }
            Err(e) => warn!("Failed to start BGM {:?}: {}", track, e),
        }
    }

    fn play_sfx(&mut self, track: Track) {
        self.reap_effects();
        if !self.available || self.volumes.effective_sfx() == 0 {
            return;
        }
        let Some(path) = self.track_path(track) else {
            return;
        };

        let spawned = Command::new(&self.player)
            .arg("-q")
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => self.effects.push(child),
            Err(e) => warn!("Failed to play {:?}: {}", track, e),
        }
    }

    fn stop_bgm(&mut self) {
        let Some((track, mut child)) = self.bgm.take() else {
            return;
        };
        stop_process_group(&mut child);
        debug!("BGM stopped: {:?}", track);
    }

    fn set_main_volume(&mut self, volume: u8) {
        self.volumes.main = volume.min(Volumes::MAX);
        self.apply_mixer_volume();
    }

    fn set_bgm_volume(&mut self, volume: u8) {
        self.volumes.bgm = volume.min(Volumes::MAX);
        self.apply_mixer_volume();
    }

    fn set_sfx_volume(&mut self, volume: u8) {
        self.volumes.sfx = volume.min(Volumes::MAX);
    }

    fn volumes(&self) -> Volumes {
        self.volumes
    }

    fn current_bgm(&self) -> Option<Track> {
        self.bgm.as_ref().map(|(track, _)| *track)
    }
}

impl Drop for ShellAudio {
    fn drop(&mut self) {
        self.stop_bgm();
    }
}

//=== Process Helpers =====================================================

/// `<player> -l` lists sound cards; no output or a missing binary means
/// there is nothing to play on.
fn probe_sound_card(player: &str) -> bool {
    match Command::new(player).arg("-l").stdin(Stdio::null()).stderr(Stdio::piped()).output() {
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let found = output.status.success()
                && !stdout.trim().is_empty()
                && !stderr.contains("no soundcards found");
            if !found {
                warn!("No sound card found, audio disabled");
            }
            found
        }
        Err(e) => {
            warn!("Audio player '{}' unavailable, audio disabled: {}", player, e);
            false
        }
    }
}

/// Terminates the BGM loop shell and the player it spawned.
fn stop_process_group(child: &mut Child) {
    #[cfg(unix)]
    {
        let group = format!("-{}", child.id());
        let killed = Command::new("kill")
            .args(["-TERM", "--", &group])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        if !killed {
            let _ = child.kill();
        }
    }
    #[cfg(not(unix))]
    {
        let _ = child.kill();
    }
    let _ = child.wait();
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volumes_are_clamped() {
        let volumes = Volumes::new(150, 200, 7);
        assert_eq!(volumes, Volumes { main: 100, bgm: 100, sfx: 7 });
    }

    #[test]
    fn effective_bgm_scales_by_main() {
        let volumes = Volumes::new(50, 80, 100);
        assert_eq!(volumes.effective_bgm(), 40);
        assert_eq!(volumes.effective_sfx(), 50);
    }

    #[test]
    fn silent_audio_tracks_music_and_effects() {
        let mut audio = SilentAudio::new();
        assert_eq!(audio.current_bgm(), None);

        audio.play_bgm(Track::Bgm01);
        audio.play_sfx(Track::Click);
        audio.play_sfx(Track::Click);
        assert_eq!(audio.current_bgm(), Some(Track::Bgm01));
        assert_eq!(audio.sfx_played(), 2);

        audio.stop_bgm();
        assert_eq!(audio.current_bgm(), None);
    }

    #[test]
    fn silent_audio_clamps_volume_setters() {
        let mut audio = SilentAudio::new();
        audio.set_bgm_volume(250);
        audio.set_sfx_volume(30);
        assert_eq!(audio.volumes().bgm, 100);
        assert_eq!(audio.volumes().sfx, 30);
    }

    #[test]
    fn disabled_shell_audio_is_inert() {
        let config = AudioConfig { enabled: false, ..AudioConfig::default() };
        let mut audio = ShellAudio::new(&config, "does-not-exist");

        assert!(!audio.is_available());
        audio.play_bgm(Track::Bgm00);
        audio.play_sfx(Track::Click);
        assert_eq!(audio.current_bgm(), None);
    }

    #[test]
    fn track_files_follow_asset_names() {
        assert_eq!(Track::Click.file_name(), "click_001.wav");
        assert_eq!(Track::Bgm02.file_name(), "bgm_02.wav");
    }
}
