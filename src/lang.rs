pub mod javascript;
pub mod python;

use crate::config::Runtimes;

use std::path::Path;

use tokio::process::Command;

/// One supported interpreter. The sandbox materializes the source as
/// `src_name()` and spawns `command()` against it.
pub trait Language: Send + Sync {
    fn lang_name(&self) -> &str;
    fn src_name(&self) -> &str;
    fn command(&self, runtimes: &Runtimes, src_path: &Path) -> Command;
}

pub fn select(name: &str) -> Option<Box<dyn Language>> {
    match name {
        "python" => Some(Box::new(python::Python {})),
        "javascript" => Some(Box::new(javascript::JavaScript {})),
        _ => None,
    }
}
