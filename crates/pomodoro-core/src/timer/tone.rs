//! Synthesis of the completion chime: a short sine beep with an
//! exponential attack/decay envelope.

use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChimeTone {
    pub frequency_hz: f32,
    /// Time to ramp from `start_gain` to `peak_gain`.
    pub attack_secs: f32,
    /// Point at which the decay reaches `end_gain`.
    pub decay_end_secs: f32,
    /// Total buffer length; the tail holds `end_gain`.
    pub length_secs: f32,
    pub start_gain: f32,
    pub peak_gain: f32,
    pub end_gain: f32,
}

impl Default for ChimeTone {
    fn default() -> Self {
        Self {
            frequency_hz: 880.0,
            attack_secs: 0.02,
            decay_end_secs: 0.5,
            length_secs: 0.55,
            start_gain: 0.001,
            peak_gain: 0.2,
            end_gain: 0.0001,
        }
    }
}

impl ChimeTone {
    /// Envelope gain at `t` seconds.
    pub fn gain(&self, t: f32) -> f32 {
        if t <= 0.0 {
            self.start_gain
        } else if t < self.attack_secs {
            exp_ramp(self.start_gain, self.peak_gain, t / self.attack_secs)
        } else if t < self.decay_end_secs {
            let span = self.decay_end_secs - self.attack_secs;
            exp_ramp(self.peak_gain, self.end_gain, (t - self.attack_secs) / span)
        } else {
            self.end_gain
        }
    }

    pub fn sample(&self, t: f32) -> f32 {
        self.gain(t) * (TAU * self.frequency_hz * t).sin()
    }

    /// Mono samples for the whole tone at `sample_rate`.
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;
        let len = (self.length_secs * rate).round() as usize;
        (0..len).map(|i| self.sample(i as f32 / rate)).collect()
    }
}

fn exp_ramp(from: f32, to: f32, progress: f32) -> f32 {
    from * (to / from).powf(progress.clamp(0.0, 1.0))
}
