/// Formats a millisecond duration as `HH:MM:SS.CC` (centiseconds).
///
/// The hours field is not capped, so sessions past 24h render as `24:..`,
/// `100:..` and so on; every field is zero-padded to at least two digits.
pub fn format_elapsed(ms: u64) -> String {
    let centis = (ms % 1000) / 10;
    let seconds = (ms / 1000) % 60;
    let minutes = (ms / 60_000) % 60;
    let hours = ms / 3_600_000;

    format!("{hours:02}:{minutes:02}:{seconds:02}.{centis:02}")
}
