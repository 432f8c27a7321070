use std::num::NonZero;

/// OpenGL context request passed to EGL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlVersion {
    pub major: u8,
    pub minor: u8,
    /// Core profile without the deprecated fixed-function entry points.
    pub core_profile: bool,
}

impl Default for GlVersion {
    fn default() -> Self {
        Self {
            major: 3,
            minor: 3,
            core_profile: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: NonZero<u32>,
    pub height: NonZero<u32>,
}

impl WindowSize {
    pub fn new(width: u32, height: u32) -> Option<WindowSize> {
        Some(WindowSize {
            width: NonZero::new(width)?,
            height: NonZero::new(height)?,
        })
    }
}

const DEFAULT_WIDTH: NonZero<u32> = NonZero::new(800).unwrap();
const DEFAULT_HEIGHT: NonZero<u32> = NonZero::new(600).unwrap();

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub app_id: String,
    pub size: WindowSize,
    pub gl: GlVersion,
    pub clear_color: [f32; 4],
    pub segments: usize,
    pub radius: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "processamento-grafico".to_owned(),
            app_id: "fanwheel".to_owned(),
            size: WindowSize::default(),
            gl: GlVersion::default(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            segments: crate::geometry::DEFAULT_SEGMENTS,
            radius: 1.0,
        }
    }
}
