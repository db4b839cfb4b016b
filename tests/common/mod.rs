use assert_cmd::Command;
use std::path::Path;

pub fn chronomind_cmd() -> Command {
    let mut cmd = Command::cargo_bin("chronomind").unwrap();
    cmd.env_remove("CHRONOMIND_ROOT");
    cmd.env_remove("CHRONOMIND_LOG");
    cmd.env_remove("CHRONOMIND_SUMMARIZER_TOKEN");
    cmd.env_remove("HF_API_TOKEN");
    cmd.env_remove("CHRONOMIND_STT_API_KEY");
    cmd.env_remove("OPENAI_API_KEY");
    cmd
}

/// Command rooted at an existing journal
pub fn journal_cmd(root: &Path) -> Command {
    let mut cmd = chronomind_cmd();
    cmd.env("CHRONOMIND_ROOT", root);
    cmd
}

/// Initialize a journal that summarizes offline
pub fn init_journal(root: &Path, storage: &str) {
    chronomind_cmd()
        .arg("init")
        .arg(root)
        .arg("--storage")
        .arg(storage)
        .assert()
        .success();
    journal_cmd(root)
        .args(["config", "summarizer.backend", "extractive"])
        .assert()
        .success();
}

pub fn add(root: &Path, date: &str, text: &str) {
    journal_cmd(root)
        .args(["add", "--date", date, text])
        .assert()
        .success();
}
