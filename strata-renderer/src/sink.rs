//! Redirectable output accumulator.
//!
//! Writes always land in the most recently pushed buffer. Pushing swaps in a
//! fresh buffer, popping hands it back and re-activates the previous one, so
//! redirections nest strictly (LIFO). The root buffer is never popped.

/// Appendable output destination with a stack of capture buffers.
#[derive(Debug, Default)]
pub struct OutputSink {
    root: String,
    redirects: Vec<String>,
}

impl OutputSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the active buffer.
    pub fn write(&mut self, text: &str) {
        self.active().push_str(text);
    }

    /// Redirect writes into a fresh, empty buffer.
    pub fn push(&mut self) {
        self.redirects.push(String::new());
    }

    /// Remove the active capture buffer and return its contents.
    ///
    /// With no redirection active this returns an empty string and leaves the
    /// root untouched.
    pub fn pop(&mut self) -> String {
        self.redirects.pop().unwrap_or_default()
    }

    /// Number of capture buffers currently stacked over the root.
    pub fn depth(&self) -> usize {
        self.redirects.len()
    }

    /// What has been written to the active buffer so far.
    pub fn current(&self) -> &str {
        self.redirects.last().unwrap_or(&self.root)
    }

    /// Consume the sink, returning the root buffer.
    pub fn into_output(self) -> String {
        self.root
    }

    fn active(&mut self) -> &mut String {
        match self.redirects.last_mut() {
            Some(buf) => buf,
            None => &mut self.root,
        }
    }
}
