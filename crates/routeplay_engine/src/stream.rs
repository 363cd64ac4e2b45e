//! Incremental consumption of the progress stream.

use bytes::Bytes;
use encoding_rs::{Decoder, UTF_8};
use futures_util::{Stream, StreamExt};
use routeplay_core::{classify_frame, FrameSplitter, FramingPolicy, ProgressEvent};
use routeplay_logging::{rp_debug, rp_trace};
use tokio_util::sync::CancellationToken;

use crate::{JobError, StreamOutcome};

/// Decodes, frames and classifies one progress stream.
///
/// A single UTF-8 decoder lives for the whole stream so that multi-byte
/// characters split across reads are reassembled.
pub struct StreamConsumer {
    decoder: Decoder,
    splitter: FrameSplitter,
}

impl StreamConsumer {
    pub fn new(policy: FramingPolicy) -> Self {
        Self {
            decoder: UTF_8.new_decoder(),
            splitter: FrameSplitter::new(policy),
        }
    }

    /// Reads until the transport ends, a cancellation frame arrives, or the
    /// token is cancelled. Each classified frame is handed to `on_event` in
    /// order; a `Cancelled` frame is delivered before returning.
    ///
    /// Token cancellation surfaces as an error of kind `Cancelled`, so both
    /// cancellation paths are visible to the caller.
    pub async fn consume<S, F>(
        &mut self,
        mut stream: S,
        cancel: &CancellationToken,
        mut on_event: F,
    ) -> Result<StreamOutcome, JobError>
    where
        S: Stream<Item = Result<Bytes, JobError>> + Unpin,
        F: FnMut(ProgressEvent),
    {
        let mut reads: u64 = 0;
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(JobError::aborted()),
                next = stream.next() => next,
            };

            let Some(chunk) = next else {
                let tail = self.decode(&[], true);
                let mut frames = self.splitter.push(&tail);
                frames.extend(self.splitter.finish());
                rp_debug!("Progress stream ended after {} reads", reads);
                return Ok(self
                    .dispatch(frames, &mut on_event)
                    .unwrap_or(StreamOutcome::Ended));
            };

            let chunk = chunk?;
            reads += 1;
            rp_trace!("Read {} chunk bytes (read #{})", chunk.len(), reads);
            let text = self.decode(&chunk, false);
            let frames = self.splitter.push(&text);
            if let Some(outcome) = self.dispatch(frames, &mut on_event) {
                return Ok(outcome);
            }
        }
    }

    /// Returns `Some` when a cancellation frame stops the loop.
    fn dispatch<F>(&self, frames: Vec<String>, on_event: &mut F) -> Option<StreamOutcome>
    where
        F: FnMut(ProgressEvent),
    {
        for frame in frames {
            let event = classify_frame(&frame);
            rp_debug!("Frame {:?} -> {:?}", frame, event);
            let cancelled = event == ProgressEvent::Cancelled;
            on_event(event);
            if cancelled {
                return Some(StreamOutcome::Cancelled);
            }
        }
        None
    }

    fn decode(&mut self, bytes: &[u8], last: bool) -> String {
        let capacity = self
            .decoder
            .max_utf8_buffer_length(bytes.len())
            .unwrap_or(bytes.len() * 3 + 4);
        let mut text = String::with_capacity(capacity);
        let (_, _, had_errors) = self.decoder.decode_to_string(bytes, &mut text, last);
        if had_errors {
            rp_debug!("Malformed UTF-8 in progress stream replaced");
        }
        text
    }
}

impl Default for StreamConsumer {
    fn default() -> Self {
        Self::new(FramingPolicy::default())
    }
}
