use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

/// Tone frequency of the beep in Hz
const TONE: f32 = 440.0;

/// One channel of a square wave at a fixed frequency
struct SquareWave {
    phase: f32,
    phase_step: f32,
    volume: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.phase < 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_step) % 1.0;
        }
    }
}

/// # Beeper
/// A paused square-wave audio device. The machine's beep hook starts it and
/// the run loop stops it once the sound timer runs out, which reproduces the
/// original behavior of a tone that lasts while the timer is nonzero.
pub struct Beeper {
    device: AudioDevice<SquareWave>,
}

impl Beeper {
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let audio = sdl.audio()?;
        let spec = AudioSpecDesired {
            freq: Some(44_100),
            channels: Some(1),
            samples: None,
        };
        let device = audio.open_playback(None, &spec, |spec| SquareWave {
            phase: 0.0,
            phase_step: TONE / spec.freq as f32,
            volume: 0.25,
        })?;
        Ok(Beeper { device })
    }

    pub fn start(&self) {
        self.device.resume();
    }

    pub fn stop(&self) {
        self.device.pause();
    }
}
