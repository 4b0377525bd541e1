//! Accent colours for rendered corrections.
//!
//! Defined as (R, G, B) tuples for the exported document and as xterm-256
//! indices for terminal output.

/// Solution section accent: #ff4d29
pub const SOLUTION_ACCENT: (u8, u8, u8) = (255, 77, 41);
/// Solution accent, darker border: #cc3d21
pub const SOLUTION_ACCENT_DARK: (u8, u8, u8) = (204, 61, 33);
/// Explanations section accent: #10b981
pub const EXPLANATION_ACCENT: (u8, u8, u8) = (16, 185, 129);
/// Explanations accent, darker border: #047857
pub const EXPLANATION_ACCENT_DARK: (u8, u8, u8) = (4, 120, 87);
/// Highlighted code token: #79c0ff
pub const CODE_TOKEN: (u8, u8, u8) = (121, 192, 255);
/// Code block background: #0d1117
pub const CODE_BACKGROUND: (u8, u8, u8) = (13, 17, 23);
/// Body text: #374151
pub const TEXT: (u8, u8, u8) = (55, 65, 81);

pub mod term {
    pub const SOLUTION_ACCENT: u8 = 202;
    pub const EXPLANATION_ACCENT: u8 = 36;
    pub const CODE_TOKEN: u8 = 111;
    pub const MUTED: u8 = 245;
}

/// Format an RGB tuple as a CSS hex colour.
pub fn hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}
