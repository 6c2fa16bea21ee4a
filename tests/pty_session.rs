// Drives the compiled binary through a pseudo terminal: the login screen
// renders and Esc leaves the app. Needs a TTY, so it is ignored by default.
// Run with: `cargo test --test pty_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn login_screen_renders_and_escape_quits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("brickmath");
    let cmd = format!("{} --backend-url http://127.0.0.1:9 --mute", bin.display());

    let mut p = spawn(cmd)?;
    p.set_expect_timeout(Some(Duration::from_secs(5)));
    p.expect("Tu nombre")?;

    p.send("\x1b")?;
    p.expect(Eof)?;
    Ok(())
}
