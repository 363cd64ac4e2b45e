//! Progress-stream framing and frame classification.
//!
//! Frames are separated by a blank line (`\n\n`). A frame mentioning
//! `CANCELLED` anywhere is a cancellation; a frame starting with `done`
//! is a completion; anything else is an opaque progress label.

/// Delimiter between frames in the decoded progress stream.
pub const FRAME_DELIMITER: &str = "\n\n";

const CANCELLED_MARKER: &str = "CANCELLED";
const DONE_PREFIX: &str = "done";

/// One classified frame of the progress stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Human-readable label, echoed verbatim. Not guaranteed to be numeric.
    Progress(String),
    Done,
    Cancelled,
}

/// Classifies one frame. Unrecognized content is never an error.
pub fn classify_frame(frame: &str) -> ProgressEvent {
    if frame.contains(CANCELLED_MARKER) {
        ProgressEvent::Cancelled
    } else if frame.starts_with(DONE_PREFIX) {
        ProgressEvent::Done
    } else {
        ProgressEvent::Progress(frame.to_string())
    }
}

/// How decoded text is cut into frames across transport reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramingPolicy {
    /// Keep undelimited trailing text until its delimiter arrives.
    #[default]
    Buffered,
    /// Split every decoded chunk on its own and dispatch every non-empty
    /// fragment, including an undelimited tail. A frame spanning two reads
    /// is dispatched as two frames.
    PerChunk,
}

/// Incremental splitter turning decoded text into frames.
#[derive(Debug, Clone, Default)]
pub struct FrameSplitter {
    policy: FramingPolicy,
    pending: String,
}

impl FrameSplitter {
    pub fn new(policy: FramingPolicy) -> Self {
        Self {
            policy,
            pending: String::new(),
        }
    }

    pub fn policy(&self) -> FramingPolicy {
        self.policy
    }

    /// Feeds one decoded chunk and returns the frames it completes, in order.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        match self.policy {
            FramingPolicy::PerChunk => split_non_empty(text),
            FramingPolicy::Buffered => {
                self.pending.push_str(text);
                // Left to right, so cuts land where `str::split` puts them.
                let last = self.pending.match_indices(FRAME_DELIMITER).last();
                let Some(end) = last.map(|(index, _)| index) else {
                    return Vec::new();
                };
                let tail = self.pending.split_off(end + FRAME_DELIMITER.len());
                let complete = std::mem::replace(&mut self.pending, tail);
                split_non_empty(&complete)
            }
        }
    }

    /// Returns undelimited text still held back at end of stream, if any.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }
}

fn split_non_empty(text: &str) -> Vec<String> {
    text.split(FRAME_DELIMITER)
        .filter(|fragment| !fragment.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffered_keeps_tail_until_delimiter() {
        let mut splitter = FrameSplitter::new(FramingPolicy::Buffered);
        assert!(splitter.push("buil").is_empty());
        assert_eq!(splitter.push("ding\n\n50"), vec!["building".to_string()]);
        assert_eq!(splitter.push("%\n\n"), vec!["50%".to_string()]);
        assert_eq!(splitter.finish(), None);
    }

    #[test]
    fn buffered_delimiter_split_across_reads() {
        let mut splitter = FrameSplitter::new(FramingPolicy::Buffered);
        assert!(splitter.push("step one\n").is_empty());
        assert_eq!(splitter.push("\nstep two"), vec!["step one".to_string()]);
        assert_eq!(splitter.finish(), Some("step two".to_string()));
    }

    #[test]
    fn buffered_newline_runs_cut_like_split() {
        let whole = "a\n\n\nb\n\n";
        let expected = split_non_empty(whole);
        assert_eq!(expected, vec!["a".to_string(), "\nb".to_string()]);

        let mut two_reads = FrameSplitter::new(FramingPolicy::Buffered);
        let mut frames = two_reads.push("a\n\n\n");
        frames.extend(two_reads.push("b\n\n"));
        assert_eq!(frames, expected);
        assert_eq!(two_reads.finish(), None);

        let mut one_read = FrameSplitter::new(FramingPolicy::Buffered);
        assert_eq!(one_read.push("a\n\n\nb"), vec!["a".to_string()]);
        assert_eq!(one_read.finish(), Some("\nb".to_string()));

        let mut per_chunk = FrameSplitter::new(FramingPolicy::PerChunk);
        assert_eq!(per_chunk.push(whole), expected);
    }

    #[test]
    fn per_chunk_dispatches_undelimited_tail() {
        let mut splitter = FrameSplitter::new(FramingPolicy::PerChunk);
        assert_eq!(splitter.push("buil"), vec!["buil".to_string()]);
        assert_eq!(splitter.push("ding\n\n"), vec!["ding".to_string()]);
        assert_eq!(splitter.finish(), None);
    }
}
