//! Per-frame input sources.
//!
//! An `InputSource` stands in for both the keyboard poll and the frame clock:
//! each poll yields the held actions and the elapsed time for one frame.

use crate::{InputError, InputSnapshot, Key, KeyBindings};
use serde::{Deserialize, Serialize};

/// Default frame time for scripts that do not set one: 60 Hz.
pub const DEFAULT_DT: f32 = 1.0 / 60.0;

/// Input and elapsed time for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInput {
    pub input: InputSnapshot,
    /// Seconds since the previous frame.
    pub dt: f32,
}

/// Anything that can be polled once per frame. `None` ends the session.
pub trait InputSource {
    fn poll(&mut self) -> Option<FrameInput>;
}

impl<I> InputSource for I
where
    I: Iterator<Item = FrameInput>,
{
    fn poll(&mut self) -> Option<FrameInput> {
        self.next()
    }
}

/// A run of identical frames in a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptSegment {
    pub frames: u32,
    #[serde(default)]
    pub keys: Vec<Key>,
    /// Overrides the script-wide frame time for this segment.
    #[serde(default)]
    pub dt: Option<f32>,
}

/// A recorded or hand-written sequence of held keys.
///
/// ```yaml
/// dt: 0.016
/// segments:
///   - { frames: 60, keys: [W] }
///   - { frames: 30, keys: [W, A], dt: 0.02 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    #[serde(default = "default_dt")]
    pub dt: f32,
    pub segments: Vec<ScriptSegment>,
}

fn default_dt() -> f32 {
    DEFAULT_DT
}

impl InputScript {
    pub fn new(dt: f32, segments: Vec<ScriptSegment>) -> Self {
        Self { dt, segments }
    }

    /// Parse and validate a YAML script.
    pub fn from_yaml_str(s: &str) -> Result<Self, InputError> {
        let script: Self = serde_yaml::from_str(s)?;
        script.validate()?;
        tracing::debug!(
            segments = script.segments.len(),
            frames = script.total_frames(),
            "loaded input script"
        );
        Ok(script)
    }

    /// Every segment's effective frame time must be finite and positive.
    pub fn validate(&self) -> Result<(), InputError> {
        for (i, seg) in self.segments.iter().enumerate() {
            let dt = seg.dt.unwrap_or(self.dt);
            if !dt.is_finite() || dt <= 0.0 {
                return Err(InputError::InvalidDt { segment: i, dt });
            }
        }
        Ok(())
    }

    pub fn total_frames(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.frames)).sum()
    }

    /// Repeat or cut the segments so the script runs exactly `frames` frames.
    ///
    /// A script with no frames stays empty.
    pub fn fit_to_frames(&self, frames: u64) -> Self {
        let mut segments = Vec::new();
        let mut remaining = frames;
        if self.total_frames() > 0 {
            for seg in self.segments.iter().filter(|s| s.frames > 0).cycle() {
                if remaining == 0 {
                    break;
                }
                let take = remaining.min(u64::from(seg.frames));
                remaining -= take;
                segments.push(ScriptSegment {
                    frames: take as u32,
                    ..seg.clone()
                });
            }
        }
        Self {
            dt: self.dt,
            segments,
        }
    }

    /// Total simulated time in seconds.
    pub fn duration(&self) -> f32 {
        self.segments
            .iter()
            .map(|s| s.frames as f32 * s.dt.unwrap_or(self.dt))
            .sum()
    }
}

/// Replays an `InputScript` through a key binding table.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    script: InputScript,
    bindings: KeyBindings,
    segment: usize,
    frame_in_segment: u32,
}

impl ScriptedInput {
    pub fn new(script: InputScript, bindings: KeyBindings) -> Self {
        Self {
            script,
            bindings,
            segment: 0,
            frame_in_segment: 0,
        }
    }

    pub fn script(&self) -> &InputScript {
        &self.script
    }
}

impl Iterator for ScriptedInput {
    type Item = FrameInput;

    fn next(&mut self) -> Option<FrameInput> {
        loop {
            let seg = self.script.segments.get(self.segment)?;
            if self.frame_in_segment < seg.frames {
                self.frame_in_segment += 1;
                return Some(FrameInput {
                    input: self.bindings.snapshot(seg.keys.iter().copied()),
                    dt: seg.dt.unwrap_or(self.script.dt),
                });
            }
            self.segment += 1;
            self.frame_in_segment = 0;
        }
    }
}
