mod config;
mod fix;
mod parse;

use assert_cmd::Command;

pub(crate) fn mend() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("mend"))
}
