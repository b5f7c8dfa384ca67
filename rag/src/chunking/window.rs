//! Sliding character windows with sentence-aware cut points.

/// Splits `chars` into `[start, end)` spans of at most `chunk_size` characters.
///
/// A window that does not reach the end of the text is cut just after the last
/// `.` or `\n` in its second half, when there is one. The next window starts
/// `overlap` characters before the previous cut, and always strictly after the
/// previous start.
pub(crate) fn split_windows(chars: &[char], chunk_size: usize, overlap: usize) -> Vec<(usize, usize)> {
    let len = chars.len();
    if len == 0 {
        return Vec::new();
    }
    if len <= chunk_size {
        return vec![(0, len)];
    }

    let half = chunk_size / 2;
    let mut spans = Vec::with_capacity(len / chunk_size.saturating_sub(overlap).max(1) + 1);
    let mut start = 0;

    loop {
        let hard_end = (start + chunk_size).min(len);
        let end = if hard_end < len {
            sentence_cut(chars, start + half, hard_end).unwrap_or(hard_end)
        } else {
            hard_end
        };
        spans.push((start, end));

        if end >= len {
            break;
        }
        let next = end.saturating_sub(overlap);
        start = if next > start { next } else { end };
    }

    spans
}

/// Position just after the last boundary character in `[floor, end)`.
fn sentence_cut(chars: &[char], floor: usize, end: usize) -> Option<usize> {
    (floor..end)
        .rev()
        .find(|&i| matches!(chars[i], '.' | '\n'))
        .map(|i| i + 1)
}
