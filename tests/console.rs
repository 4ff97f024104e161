use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::{tempdir, TempDir};

/// A working directory with a config file and one-entry templates
fn workspace() -> TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("templates")).unwrap();
    fs::write(dir.path().join("templates").join("food.txt"), "火锅\n").unwrap();
    fs::write(dir.path().join("templates").join("drink.txt"), "奶茶\n").unwrap();
    fs::write(
        dir.path().join("bot.toml"),
        r#"
        command_char = "/"
        nick = "bot"

        [log]
        dir = "logs"
        mode = "both"
        level = "info"

        [modules.eat_drink]
        module_type = "EatDrink"
        "#,
    )
    .unwrap();
    dir
}

#[test]
fn replies_on_stdout_and_logs_on_stderr() {
    let dir = workspace();

    cargo_bin_cmd!()
        .current_dir(dir.path())
        .arg("bot.toml")
        .write_stdin("/吃什么\nhello\n/推荐 喝\n")
        .assert()
        .success()
        .stdout("<bot> 🍚 推荐你吃：火锅\n（发送 /吃什么 可重新随机）\n<bot> 🥤 推荐你喝：奶茶\n")
        .stderr(predicate::str::contains("INFO suggested food 火锅 to console"));

    assert_eq!(
        fs::read_to_string(dir.path().join("data/eat_drink/food.txt")).unwrap(),
        "火锅\n"
    );
}

#[test]
fn bad_config_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bot.toml"), "command_char = \"\"\n").unwrap();

    cargo_bin_cmd!()
        .current_dir(dir.path())
        .arg("bot.toml")
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("command_char must not be empty"));
}
