//! Notifier that prints messages to a console stream.

use crate::domain::error::SigtraderError;
use crate::ports::notifier_port::NotifierPort;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

pub struct ConsoleNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleNotifier {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn emit(&self, recipient: &str, text: &str) -> Result<(), SigtraderError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| std::io::Error::other("console writer poisoned"))?;
        for line in text.lines() {
            writeln!(out, "[{}] {}", recipient, line)?;
        }
        out.flush()?;
        Ok(())
    }
}

impl NotifierPort for ConsoleNotifier {
    fn send_text(&self, recipient: &str, text: &str) -> Result<(), SigtraderError> {
        self.emit(recipient, text)
    }

    fn send_file(&self, recipient: &str, path: &Path, caption: &str) -> Result<(), SigtraderError> {
        self.emit(
            recipient,
            &format!("{} (attachment: {})", caption, path.display()),
        )
    }
}
