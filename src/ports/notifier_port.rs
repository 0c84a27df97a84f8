//! Message delivery port trait.

use crate::domain::error::SigtraderError;
use std::path::Path;

pub trait NotifierPort: Send + Sync {
    fn send_text(&self, recipient: &str, text: &str) -> Result<(), SigtraderError>;

    fn send_file(&self, recipient: &str, path: &Path, caption: &str) -> Result<(), SigtraderError>;
}
