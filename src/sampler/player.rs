use crate::replay::session::Rejection;
use crate::sampler::palette::Palette;
use crate::sampler::source::FrameSource;

/// Geometry for reducing a source into a character grid.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct SampleSpec {
    /// Grid width in symbols at scale 1.0.
    pub base_width: u32,
    /// User scale factor applied to the base width.
    pub scale: f64,
    /// Height correction: terminal cells are taller than they are wide.
    pub char_aspect: f64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            base_width: 120,
            scale: 1.0,
            char_aspect: 0.55,
        }
    }
}

impl SampleSpec {
    /// Default geometry at the given scale.
    pub fn with_scale(scale: f64) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    /// Target grid dimensions for a source of `src_w`×`src_h`; both at
    /// least 1.
    pub fn target_dims(&self, src_w: u32, src_h: u32) -> (u32, u32) {
        let w = ((f64::from(self.base_width) * self.scale).floor() as u32).max(1);
        let aspect = f64::from(src_h) / f64::from(src_w.max(1));
        let h = ((f64::from(w) * aspect * self.char_aspect).floor() as u32).max(1);
        (w, h)
    }
}

/// One rendered text frame, one line per sample row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextFrame {
    /// Symbols per row.
    pub width: u32,
    /// Row count.
    pub height: u32,
    /// Newline-terminated rows.
    pub text: String,
}

/// Plays a frame source as paletted text frames with pause/seek control.
///
/// The host drives playback by calling [`AsciiPlayer::tick`] once per
/// display refresh; each tick is one sample-and-render. While paused there
/// is no continuous loop; a seek commit performs exactly one synchronous
/// render. While a seek is in flight the position label reports the pending
/// target rather than the authoritative position, so the indicator does not
/// fight the source.
pub struct AsciiPlayer {
    source: Option<Box<dyn FrameSource>>,
    spec: SampleSpec,
    palette: Palette,
    target: (u32, u32),
    position_sec: f64,
    playing: bool,
    pending_seek: Option<f64>,
}

impl AsciiPlayer {
    /// Create a player with no source loaded.
    pub fn new(spec: SampleSpec, palette: Palette) -> Self {
        Self {
            source: None,
            spec,
            palette,
            target: (1, 1),
            position_sec: 0.0,
            playing: false,
            pending_seek: None,
        }
    }

    /// Load a source, replacing any previous one; the player resets to a
    /// paused state at position zero.
    pub fn load(&mut self, source: Box<dyn FrameSource>) {
        let (src_w, src_h) = source.size();
        self.target = self.spec.target_dims(src_w, src_h);
        self.source = Some(source);
        self.position_sec = 0.0;
        self.playing = false;
        self.pending_seek = None;
        tracing::debug!(w = self.target.0, h = self.target.1, "source loaded");
    }

    /// Whether a source is loaded.
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Whether playback is advancing.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether a seek is in flight.
    pub fn is_seeking(&self) -> bool {
        self.pending_seek.is_some()
    }

    /// Authoritative playback position in seconds.
    pub fn position_sec(&self) -> f64 {
        self.position_sec
    }

    /// Target grid dimensions computed at load time.
    pub fn target_dims(&self) -> (u32, u32) {
        self.target
    }

    /// Rewind to zero, start playing, and render the first frame.
    pub fn start(&mut self) -> Result<TextFrame, Rejection> {
        if self.source.is_none() {
            tracing::warn!("start rejected: no source loaded");
            return Err(Rejection::NoSource);
        }
        self.position_sec = 0.0;
        self.playing = true;
        self.pending_seek = None;
        self.render().ok_or(Rejection::NoSource)
    }

    /// Stop advancing; the last rendered frame stays current.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Resume playback; `false` without a source.
    pub fn resume(&mut self) -> bool {
        if self.source.is_none() {
            return false;
        }
        self.playing = true;
        true
    }

    /// Advance by `dt_sec` and render, or `None` when paused or unloaded.
    ///
    /// Playback clamps at the source duration and pauses there.
    pub fn tick(&mut self, dt_sec: f64) -> Option<TextFrame> {
        if !self.playing {
            return None;
        }
        let duration = self.source.as_ref()?.duration_sec();
        self.position_sec = (self.position_sec + dt_sec.max(0.0)).min(duration);
        if self.position_sec >= duration {
            self.playing = false;
        }
        self.render()
    }

    /// Mark a seek as in flight; ticks keep rendering but the label now
    /// reports the pending target.
    pub fn begin_seek(&mut self) {
        self.pending_seek = Some(self.position_sec);
    }

    /// Update the pending seek target shown by the label.
    pub fn preview_seek(&mut self, time_sec: f64) {
        self.pending_seek = Some(self.clamp_time(time_sec));
    }

    /// Finish a seek: pause, jump to the clamped target, render once.
    pub fn commit_seek(&mut self, time_sec: f64) -> Result<TextFrame, Rejection> {
        if self.source.is_none() {
            tracing::warn!("seek rejected: no source loaded");
            return Err(Rejection::NoSource);
        }
        self.playing = false;
        self.position_sec = self.clamp_time(time_sec);
        self.pending_seek = None;
        self.render().ok_or(Rejection::NoSource)
    }

    /// `"MM:SS / MM:SS"` position label; the pending seek target while a
    /// seek is in flight.
    pub fn position_label(&self) -> String {
        let shown = self.pending_seek.unwrap_or(self.position_sec);
        let total = self
            .source
            .as_ref()
            .map(|s| s.duration_sec())
            .unwrap_or(0.0);
        format!("{} / {}", format_time(shown), format_time(total))
    }

    fn clamp_time(&self, time_sec: f64) -> f64 {
        let duration = self
            .source
            .as_ref()
            .map(|s| s.duration_sec())
            .unwrap_or(0.0);
        if time_sec.is_finite() {
            time_sec.clamp(0.0, duration)
        } else {
            0.0
        }
    }

    fn render(&self) -> Option<TextFrame> {
        let source = self.source.as_ref()?;
        let (w, h) = self.target;
        let grid = source.sample(self.position_sec, w, h);

        let mut text = String::with_capacity(((w + 1) * h) as usize);
        for row in grid.chunks(w as usize) {
            for &intensity in row {
                text.push(self.palette.symbol_for(intensity));
            }
            text.push('\n');
        }
        Some(TextFrame {
            width: w,
            height: h,
            text,
        })
    }
}

fn format_time(sec: f64) -> String {
    if !sec.is_finite() || sec < 0.0 {
        return "00:00".to_string();
    }
    let total = sec.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
#[path = "../../tests/unit/sampler/player.rs"]
mod tests;
