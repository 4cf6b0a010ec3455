use crate::config::AppSettings;
use crate::error::Result;
use crate::graph::auth::{AccessToken, GraphAuth, Password};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, BufRead, Write};

const MASK: &[u8] = b"*";
const ERASE: &[u8] = b"\x08 \x08";

/// Username and password collected from the console
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: Password,
}

/// Prompt for a username and read one line. Empty input is accepted.
pub fn read_username<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<String> {
    writeln!(out, "Enter your username")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(line)
}

/// Read a password one key at a time until Enter, writing one mask symbol
/// per character. The typed characters are never written to `out`.
pub fn read_password<K, W>(mut next_key: K, out: &mut W) -> io::Result<Password>
where
    K: FnMut() -> io::Result<KeyEvent>,
    W: Write,
{
    let mut password = Password::new();

    loop {
        let key = next_key()?;
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Enter => break,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                writeln!(out)?;
                return Err(io::Error::new(
                    io::ErrorKind::Interrupted,
                    "password entry cancelled",
                ));
            }
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
            KeyCode::Char(c) => {
                password.push(c);
                out.write_all(MASK)?;
            }
            KeyCode::Backspace => {
                if password.pop().is_some() {
                    out.write_all(ERASE)?;
                }
            }
            _ => {}
        }
        out.flush()?;
    }

    out.write_all(b"\r\n")?;
    out.flush()?;
    Ok(password)
}

/// Restores cooked mode when dropped
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Prompt for a password on the terminal with masked echo
pub fn prompt_password() -> io::Result<Password> {
    let mut stdout = io::stdout();
    writeln!(stdout, "Enter your password")?;
    stdout.flush()?;

    let _raw = RawModeGuard::enable()?;
    read_password(
        || loop {
            if let Event::Key(key) = event::read()? {
                return Ok(key);
            }
        },
        &mut stdout,
    )
}

pub fn prompt_credentials() -> Result<Credentials> {
    let username = read_username(&mut io::stdin().lock(), &mut io::stdout())?;
    let password = prompt_password()?;
    Ok(Credentials { username, password })
}

/// Sign in with the chosen flow and return the access token
pub async fn login(settings: &AppSettings, device_code: bool) -> Result<AccessToken> {
    let auth = GraphAuth::new(settings);
    tracing::debug!("Authority: {}", auth.authority());

    if device_code {
        return auth.login_device_code().await;
    }

    let Credentials { username, password } = prompt_credentials()?;
    auth.login_password(&username, password).await
}
