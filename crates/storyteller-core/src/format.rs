/// Format whole seconds as an SRT timestamp, `HH:MM:SS,000`.
///
/// The pipeline only ever tracks whole-second durations, so the millisecond
/// field is a constant.
pub fn format_time(seconds: u64) -> String {
    let (mm, ss) = (seconds / 60, seconds % 60);
    let (hh, mm) = (mm / 60, mm % 60);
    format!("{:02}:{:02}:{:02},000", hh, mm, ss)
}

/// Timeline line for an SRT cue, `start --> end`.
pub fn make_timeline_string(start: u64, end: u64) -> String {
    format!("{} --> {}", format_time(start), format_time(end))
}

/// Single-cue SRT body for one segment: cue index `0`, a window starting at
/// zero and ending at `duration`, then the sentence.
pub fn make_subtitle(sentence: &str, duration: u64) -> String {
    format!("0\n{}\n{}\n", make_timeline_string(0, duration), sentence)
}
