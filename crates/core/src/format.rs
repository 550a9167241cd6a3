//! Human-readable rendering of raw media quantities.
//!
//! All functions are pure and deterministic.

/// Formats a bitrate, switching between kbps and Mbps.
///
/// The unit switch happens once the kbps value reaches 1000, so values just
/// below one megabit still render in kbps (e.g. `999_999` → `"1000.0 kbps"`).
pub fn format_bitrate(bits_per_second: i64) -> String {
    let kbps = bits_per_second as f64 / 1000.0;
    if kbps >= 1000.0 {
        return format!("{:.1} Mbps", kbps / 1000.0);
    }
    format!("{:.1} kbps", kbps)
}

/// Formats a frequency, switching between Hz, kHz and MHz.
pub fn format_frequency(hertz: i64) -> String {
    let khz = hertz as f64 / 1000.0;
    if khz >= 1000.0 {
        format!("{:.2} MHz", khz / 1000.0)
    } else if khz >= 1.0 {
        format!("{:.1} kHz", khz)
    } else {
        format!("{} Hz", hertz)
    }
}

/// Formats a progress percentage as a whole number, e.g. `"42%"`.
pub fn format_progress(percent: f64) -> String {
    format!("{}%", percent as i64)
}

/// Formats a time-required value in seconds with two decimals, e.g. `"3.25s"`.
pub fn format_time_required(seconds: f64) -> String {
    format!("{:.2}s", seconds)
}

/// Formats a frame rate with two decimals, e.g. `"23.98 fps"`.
pub fn format_frame_rate(fps: f64) -> String {
    format!("{:.2} fps", fps)
}

/// Formats a pixel dimension, e.g. `"1920 px"`.
pub fn format_pixels(pixels: i64) -> String {
    format!("{} px", pixels)
}
