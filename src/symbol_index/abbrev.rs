//! Length-bounded display names for search results

/// Default budget for an abbreviated name, in characters
pub const DEFAULT_MAX_LEN: usize = 26;

/// Marker prepended when leading segments were dropped. Together with the
/// separator of the first kept segment it renders as `...`.
const ELLIPSIS: &str = "..";

/// Abbreviate a qualified dotted name to fit `max_len`.
///
/// The last segment is always kept. Enclosing segments are prepended, innermost
/// first, while the segment plus the dotted tail built so far fits within
/// `max_len`. If every segment fit, the full name is returned; otherwise the
/// result is the kept tail prefixed with an ellipsis.
pub fn abbreviate(name: &str, max_len: usize) -> String {
    let parts: Vec<&str> = name.split('.').collect();
    let mut np = parts.len() - 1;
    let mut short = format!(".{}", parts[np]);
    let mut short_len = short.chars().count();

    while np > 0 {
        let prev_len = parts[np - 1].chars().count();
        if prev_len + short_len > max_len {
            break;
        }
        np -= 1;
        short = format!(".{}{}", parts[np], short);
        short_len += prev_len + 1;
    }

    if np > 0 {
        format!("{}{}", ELLIPSIS, short)
    } else {
        short[1..].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_is_unchanged() {
        assert_eq!(abbreviate("std.stdio.write", DEFAULT_MAX_LEN), "std.stdio.write");
        assert_eq!(abbreviate("object", DEFAULT_MAX_LEN), "object");
    }

    #[test]
    fn test_drops_leading_segments() {
        assert_eq!(abbreviate("std.algorithm.mutation.remove", 10), "...remove");
        assert_eq!(
            abbreviate("std.algorithm.mutation.remove", 16),
            "...mutation.remove"
        );
        // "algorithm" (9) + ".mutation.remove" (16) = 25 fits, "std" does not
        assert_eq!(
            abbreviate("std.algorithm.mutation.remove", 25),
            "...algorithm.mutation.remove"
        );
        assert_eq!(
            abbreviate("std.algorithm.mutation.remove", 29),
            "std.algorithm.mutation.remove"
        );
    }

    #[test]
    fn test_last_segment_kept_even_when_too_long() {
        assert_eq!(
            abbreviate("std.experimental.allocator.building_blocks", 5),
            "...building_blocks"
        );
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // "é" is two bytes but one character
        assert_eq!(abbreviate("ééé.x", 5), "ééé.x");
        assert_eq!(abbreviate("éééé.x", 5), "...x");
    }
}
