use super::*;

pub struct JavaScript {}

impl Language for JavaScript {
    fn lang_name(&self) -> &str {
        "javascript"
    }

    fn src_name(&self) -> &str {
        "src.js"
    }

    fn command(&self, runtimes: &Runtimes, src_path: &Path) -> Command {
        let mut cmd = Command::new(&runtimes.node);
        cmd.arg(src_path);
        cmd
    }
}
