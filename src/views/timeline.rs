//! Text rendering of the trim timeline

use crate::domain::model::TimeSpec;

/// Render the selection as a bar of `width` cells between `|` marks.
///
/// `[` and `]` are the start and end handles, `=` the kept part, `-` the
/// part that will be cut away. A zero duration renders an empty track.
pub fn render(start: TimeSpec, end: TimeSpec, duration: TimeSpec, width: usize) -> String {
    let width = width.max(2);
    if duration.millis == 0 {
        return format!("|{}|", "-".repeat(width));
    }

    let cell = |t: TimeSpec| -> usize {
        let t = t.millis.min(duration.millis);
        ((t as u128 * (width as u128 - 1)) / duration.millis as u128) as usize
    };
    let start_cell = cell(start);
    let end_cell = cell(end).max(start_cell);

    let bar: String = (0..width)
        .map(|i| {
            if i == start_cell && i == end_cell {
                'I'
            } else if i == start_cell {
                '['
            } else if i == end_cell {
                ']'
            } else if i > start_cell && i < end_cell {
                '='
            } else {
                '-'
            }
        })
        .collect();
    format!("|{}|", bar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> TimeSpec {
        TimeSpec::from_millis(millis)
    }

    #[test]
    fn test_full_selection() {
        assert_eq!(render(ms(0), ms(10_000), ms(10_000), 10), "|[========]|");
    }

    #[test]
    fn test_partial_selection() {
        assert_eq!(render(ms(2_000), ms(6_000), ms(9_000), 10), "|--[===]---|");
    }

    #[test]
    fn test_zero_duration() {
        assert_eq!(render(ms(0), ms(0), ms(0), 5), "|-----|");
    }

    #[test]
    fn test_handles_in_same_cell() {
        assert_eq!(render(ms(5_000), ms(5_010), ms(10_000), 3), "|-I-|");
    }
}
