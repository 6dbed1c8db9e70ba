pub const CANVAS_SIZE: i32 = 280;          // Width/height of the playback canvas
pub const GRID_SIZE: usize = 28;           // Width/height of a generated digit image
pub const PANEL_HEIGHT: i32 = 88;          // Height of the control panel below the canvas
pub const FPS: u32 = 60;                   // Frames per second

pub const HOLD_DURATION: u32 = 60;         // Ticks each image is held before advancing
pub const FADE_STEP: u8 = 5;               // Alpha change per tick during a crossfade
pub const MESSAGE_DURATION_MS: u64 = 3000; // How long the message box stays visible
