use banglelink_frame::{FrameConfig, LineEnding};

/// Default battery percentage below which a status update is logged as low.
pub const DEFAULT_BATTERY_LOW_THRESHOLD: u8 = 30;

/// Session-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Outbound frame size and inbound line cap.
    pub frame: FrameConfig,
    /// How inbound lines are cut.
    pub line_ending: LineEnding,
    /// Percent below which the battery counts as low.
    pub battery_low_threshold: u8,
    /// Send space + Ctrl-C before the time sync on
    /// [`Session::initialize`](crate::Session::initialize).
    pub clear_line_on_init: bool,
}

impl SessionConfig {
    pub fn with_frame_config(mut self, frame: FrameConfig) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.frame.max_frame_size = max_frame_size;
        self
    }

    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.frame.max_line_length = max_line_length;
        self
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn with_battery_low_threshold(mut self, threshold: u8) -> Self {
        self.battery_low_threshold = threshold;
        self
    }

    pub fn with_clear_line_on_init(mut self, enabled: bool) -> Self {
        self.clear_line_on_init = enabled;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame: FrameConfig::default(),
            line_ending: LineEnding::default(),
            battery_low_threshold: DEFAULT_BATTERY_LOW_THRESHOLD,
            clear_line_on_init: true,
        }
    }
}
