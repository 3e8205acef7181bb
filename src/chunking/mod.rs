//! Line-window chunking: fixed-size overlapping windows over a file's lines.

/// Output of the chunking process.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkOutput {
    pub content: String,
    /// 1-based start line in the original file.
    pub start_line: usize,
    /// 1-based end line in the original file, inclusive.
    pub end_line: usize,
}

/// Window geometry for [`chunk_lines`].
#[derive(Debug, Clone, Copy)]
pub struct ChunkParams {
    pub chunk_size: usize,
    pub overlap: usize,
    pub max_chars: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            chunk_size: 80,
            overlap: 20,
            max_chars: 2400,
        }
    }
}

/// Split `lines` into windows of `chunk_size` lines, each starting
/// `chunk_size - overlap` lines after the previous one.
///
/// The start always advances by at least one line, so any `overlap` value
/// terminates. Window text longer than `max_chars` characters is cut, not
/// re-chunked.
pub fn chunk_lines(lines: &[&str], params: ChunkParams) -> Vec<ChunkOutput> {
    let chunk_size = params.chunk_size.max(1);
    let step = chunk_size.saturating_sub(params.overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < lines.len() {
        let end = start.saturating_add(chunk_size).min(lines.len());
        let mut content = lines[start..end].join("\n");
        truncate_chars(&mut content, params.max_chars);

        chunks.push(ChunkOutput {
            content,
            start_line: start + 1,
            end_line: end,
        });

        if end >= lines.len() {
            break;
        }
        start += step;
    }

    chunks
}

fn truncate_chars(s: &mut String, max_chars: usize) {
    if let Some((idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {i}")).collect()
    }

    fn params(chunk_size: usize, overlap: usize) -> ChunkParams {
        ChunkParams {
            chunk_size,
            overlap,
            max_chars: usize::MAX,
        }
    }

    #[test]
    fn test_chunk_empty() {
        assert!(chunk_lines(&[], ChunkParams::default()).is_empty());
    }

    #[test]
    fn test_chunk_small_file_single_window() {
        let lines = ["a", "b", "c"];
        let chunks = chunk_lines(&lines, ChunkParams::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[0].end_line, 3);
        assert_eq!(chunks[0].content, "a\nb\nc");
    }

    #[test]
    fn test_chunk_default_windows_overlap() {
        let owned = numbered(200);
        let lines: Vec<&str> = owned.iter().map(String::as_str).collect();
        let chunks = chunk_lines(&lines, ChunkParams::default());
        let ranges: Vec<(usize, usize)> = chunks.iter().map(|c| (c.start_line, c.end_line)).collect();
        assert_eq!(ranges, vec![(1, 80), (61, 140), (121, 200)]);
    }

    #[test]
    fn test_chunk_covers_every_line() {
        for n in [1usize, 2, 7, 50, 81, 163] {
            for (size, overlap) in [(1, 0), (3, 2), (10, 3), (80, 20), (5, 0)] {
                let owned = numbered(n);
                let lines: Vec<&str> = owned.iter().map(String::as_str).collect();
                let chunks = chunk_lines(&lines, params(size, overlap));

                assert_eq!(chunks[0].start_line, 1);
                assert_eq!(chunks.last().unwrap().end_line, n);
                for pair in chunks.windows(2) {
                    assert!(pair[1].start_line > pair[0].start_line);
                    assert!(pair[1].start_line <= pair[0].end_line + 1, "gap for n={n} size={size}");
                }
                assert!(chunks.iter().all(|c| c.start_line <= c.end_line));
            }
        }
    }

    #[test]
    fn test_chunk_overlap_not_less_than_size_still_terminates() {
        let owned = numbered(5);
        let lines: Vec<&str> = owned.iter().map(String::as_str).collect();
        let chunks = chunk_lines(&lines, params(2, 5));
        let starts: Vec<usize> = chunks.iter().map(|c| c.start_line).collect();
        assert_eq!(starts, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_chunk_huge_window_size() {
        let owned = numbered(130);
        let lines: Vec<&str> = owned.iter().map(String::as_str).collect();
        let chunks = chunk_lines(&lines, params(usize::MAX, 0));
        assert_eq!(chunks.len(), 1);
        assert_eq!((chunks[0].start_line, chunks[0].end_line), (1, 130));

        let chunks = chunk_lines(&lines, params(usize::MAX, usize::MAX));
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_chunk_truncates_long_windows() {
        let long = "é".repeat(50);
        let lines = [long.as_str(), "tail"];
        let chunks = chunk_lines(
            &lines,
            ChunkParams {
                max_chars: 10,
                ..ChunkParams::default()
            },
        );
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content.chars().count(), 10);
        assert_eq!(chunks[0].end_line, 2);
    }
}
