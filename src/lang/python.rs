use super::*;

pub struct Python {}

impl Language for Python {
    fn lang_name(&self) -> &str {
        "python"
    }

    fn src_name(&self) -> &str {
        "src.py"
    }

    fn command(&self, runtimes: &Runtimes, src_path: &Path) -> Command {
        let mut cmd = Command::new(&runtimes.python);
        cmd.arg(src_path);
        cmd
    }
}
