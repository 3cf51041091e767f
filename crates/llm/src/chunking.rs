/// Split text into ordered chunks of at most `max_chars` characters.
///
/// Each window is cut back to the last newline inside it, or failing that
/// the last space, so chunks end on natural boundaries. A window without
/// either is cut at the hard limit. Chunks are trimmed and never empty.
pub fn split(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < len {
        let mut end = (start + max_chars).min(len);

        if end < len {
            if let Some(cut) = find_break_point(&chars, start, end) {
                end = cut;
            }
        }

        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        // end > start on every iteration
        start = end;
    }

    chunks
}

/// Last newline in `chars[start..end]`, else the last space, strictly after `start`
fn find_break_point(chars: &[char], start: usize, end: usize) -> Option<usize> {
    let window = &chars[start..end];

    ['\n', ' '].iter().find_map(|&boundary| {
        window
            .iter()
            .rposition(|&c| c == boundary)
            .map(|offset| start + offset)
            .filter(|&cut| cut > start)
    })
}
