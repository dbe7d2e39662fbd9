//! Timecode conversions for NLE exports
//!
//! Model timecodes are MM:SS (sometimes HH:MM:SS) strings; EDL wants
//! SMPTE `HH:MM:SS:FF` at a fixed 25 fps with frames pinned to 00
//! (sub-second precision is not modeled), FCPXML wants whole seconds.

/// Convert an MM:SS or HH:MM:SS timecode to `HH:MM:SS:00`.
pub fn mmss_to_smpte(timecode: &str) -> String {
    seconds_to_smpte(mmss_to_seconds(timecode))
}

/// Convert an MM:SS or HH:MM:SS timecode to total seconds. Unparseable
/// input maps to 0.
pub fn mmss_to_seconds(timecode: &str) -> u64 {
    let parts: Vec<u64> = timecode
        .split(':')
        .map(|p| p.trim().parse().unwrap_or(0))
        .collect();

    match parts.as_slice() {
        [mins, secs] => mins * 60 + secs,
        [hours, mins, secs] => hours * 3600 + mins * 60 + secs,
        _ => 0,
    }
}

pub fn seconds_to_smpte(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let mins = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    format!("{hours:02}:{mins:02}:{secs:02}:00")
}
