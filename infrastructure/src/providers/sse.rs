//! Server-Sent Events line splitting for streamed completions.
//!
//! Bytes are buffered until a newline so multi-byte characters split
//! across network chunks decode intact.

/// One meaningful SSE line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// `data:` payload
    Data(String),
    /// The `[DONE]` marker
    Done,
}

#[derive(Debug, Default)]
pub struct SseLineBuffer {
    buffer: Vec<u8>,
}

impl SseLineBuffer {
    /// Feed a chunk, returning the events completed by it
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Ok(line) = std::str::from_utf8(&line)
                && let Some(event) = parse_line(line)
            {
                events.push(event);
            }
        }
        events
    }

    /// Flush a final line that had no trailing newline
    pub fn finish(&mut self) -> Option<SseEvent> {
        let rest = std::mem::take(&mut self.buffer);
        std::str::from_utf8(&rest).ok().and_then(parse_line)
    }
}

fn parse_line(line: &str) -> Option<SseEvent> {
    let line = line.trim();
    // Blank separators and `:` comments carry nothing
    if line.is_empty() || line.starts_with(':') {
        return None;
    }
    let data = line.strip_prefix("data:")?.trim();
    match data {
        "" => None,
        "[DONE]" => Some(SseEvent::Done),
        payload => Some(SseEvent::Data(payload.to_string())),
    }
}
