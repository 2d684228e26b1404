//! Frame timestamp formatting.
//!
//! Frame offsets are rendered as a zero-based time-of-day string:
//! `HH:MM:SS`, with `.ffffff` microseconds appended only when the offset
//! has a fractional component.

/// Format a frame offset (seconds from video start) as `HH:MM:SS(.ffffff)`.
///
/// # Examples
/// ```
/// use posetrack_models::timestamp::format_frame_timestamp;
/// assert_eq!(format_frame_timestamp(0.0), "00:00:00");
/// assert_eq!(format_frame_timestamp(61.0), "00:01:01");
/// assert_eq!(format_frame_timestamp(1.5), "00:00:01.500000");
/// ```
pub fn format_frame_timestamp(offset_secs: f64) -> String {
    let total_micros = (offset_secs.max(0.0) * 1_000_000.0).round() as u64;
    let micros = total_micros % 1_000_000;
    let total_secs = total_micros / 1_000_000;

    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if micros == 0 {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}.{:06}", hours, mins, secs, micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_seconds() {
        assert_eq!(format_frame_timestamp(0.0), "00:00:00");
        assert_eq!(format_frame_timestamp(1.0), "00:00:01");
        assert_eq!(format_frame_timestamp(2.0), "00:00:02");
        assert_eq!(format_frame_timestamp(90.0), "00:01:30");
        assert_eq!(format_frame_timestamp(3661.0), "01:01:01");
    }

    #[test]
    fn test_fractional_seconds_render_microseconds() {
        assert_eq!(format_frame_timestamp(0.5), "00:00:00.500000");
        assert_eq!(format_frame_timestamp(1.25), "00:00:01.250000");
    }

    #[test]
    fn test_thirty_fps_frame_offsets() {
        // Frame 40 of a 30 fps stream lands at 1.333333s.
        assert_eq!(format_frame_timestamp(40.0 / 30.0), "00:00:01.333333");
        // Multiples of the frame rate land on whole seconds.
        assert_eq!(format_frame_timestamp(60.0 / 30.0), "00:00:02");
    }

    #[test]
    fn test_rounding_to_whole_second() {
        // 0.9999999 rounds up to a whole second, not 1000000 micros.
        assert_eq!(format_frame_timestamp(0.9999999), "00:00:01");
    }

    #[test]
    fn test_negative_clamped_to_zero() {
        assert_eq!(format_frame_timestamp(-1.0), "00:00:00");
    }
}
