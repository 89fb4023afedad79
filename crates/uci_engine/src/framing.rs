//! Newline framing over a byte stream
//!
//! Engine output arrives in arbitrary chunks. [`LineBuffer`] accumulates
//! them and hands out complete lines only, holding back a trailing partial
//! line until the rest of it arrives. `\r\n` endings are accepted.

/// Accumulates bytes and splits them into complete lines
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completed, in order
    ///
    /// Returned lines have their `\n` and any trailing `\r` stripped. Invalid
    /// UTF-8 is replaced rather than rejected.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            let mut line = &self.pending[start..end];
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
            lines.push(String::from_utf8_lossy(line).into_owned());
            start = end + 1;
        }
        self.pending.drain(..start);
        lines
    }

    /// Bytes held back waiting for a newline
    #[cfg(test)]
    fn pending(&self) -> &[u8] {
        &self.pending
    }
}
