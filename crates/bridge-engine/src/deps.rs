use std::{
    io,
    path::Path,
    process::{Command, Stdio},
    thread,
};

use tracing::debug;

use crate::{Error, Result};

// ---- Process launching ----

/// Starts external programs without waiting for them.
pub trait Launcher: Send + Sync {
    /// Spawn `program` with `args`; returns once the process has started.
    fn spawn(&self, program: &str, args: &[&Path]) -> io::Result<()>;
    /// Hand `path` to the OS default handler for its file type.
    fn open_default(&self, path: &Path) -> io::Result<()>;
}

/// Launcher backed by `std::process` and the `open` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn spawn(&self, program: &str, args: &[&Path]) -> io::Result<()> {
        let mut cmd = shell_command(program, args);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let mut child = cmd.spawn()?;
        let pid = child.id();
        // Reap in the background so the caller never blocks on the editor.
        thread::spawn(move || match child.wait() {
            Ok(status) => debug!(pid, %status, "launcher process exited"),
            Err(e) => debug!(pid, "launcher wait failed: {}", e),
        });
        Ok(())
    }

    fn open_default(&self, path: &Path) -> io::Result<()> {
        open::that_detached(path)
    }
}

/// On Windows the editor command is usually a `.cmd` shim, so go through the
/// shell with a command line where nothing is left for cmd.exe to interpret.
#[cfg(windows)]
fn shell_command(program: &str, args: &[&Path]) -> Command {
    use std::os::windows::process::CommandExt;

    let mut cmd = Command::new("cmd");
    cmd.raw_arg("/D /V:OFF /S /C")
        .raw_arg(format!("\"{}\"", cmd_line(program, args)));
    cmd
}

#[cfg(not(windows))]
fn shell_command(program: &str, args: &[&Path]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd
}

/// Render `program` and `args` for `cmd /C`, one quoted word each.
#[cfg(any(windows, test))]
fn cmd_line(program: &str, args: &[&Path]) -> String {
    let mut words = vec![cmd_quote(program)];
    words.extend(args.iter().map(|a| cmd_quote(&a.to_string_lossy())));
    words.join(" ")
}

/// Quote `arg` for the child's argv parser, then caret-escape every character
/// cmd.exe treats specially, the quotes included. cmd never enters a quoted
/// region, so `&`, `|`, `%` and friends reach the child literally.
#[cfg(any(windows, test))]
fn cmd_quote(arg: &str) -> String {
    use std::iter::repeat_n;

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    let mut backslashes = 0;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(repeat_n('\\', backslashes + 1));
                backslashes = 0;
            }
            _ => backslashes = 0,
        }
        quoted.push(c);
    }
    quoted.extend(repeat_n('\\', backslashes));
    quoted.push('"');

    let mut out = String::with_capacity(quoted.len() * 2);
    for c in quoted.chars() {
        if matches!(c, '^' | '&' | '|' | '<' | '>' | '(' | ')' | '%' | '!' | '"') {
            out.push('^');
        }
        out.push(c);
    }
    out
}

// ---- Clipboard ----

/// Write-only view of the system clipboard.
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`.
    fn copy(&self, text: &str) -> Result<()>;
    /// Whether a clipboard is reachable at all.
    fn available(&self) -> bool {
        true
    }
}

/// System clipboard via `arboard`; a handle is opened per operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        let mut cb = arboard::Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;
        cb.set_text(text.to_owned())
            .map_err(|e| Error::Clipboard(e.to_string()))?;
        debug!(chars = text.chars().count(), "copied message to clipboard");
        Ok(())
    }

    fn available(&self) -> bool {
        arboard::Clipboard::new().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmd_metacharacters_are_escaped() {
        let file = Path::new(r"C:\Users\u\Downloads\a&calc&.txt");
        assert_eq!(
            cmd_line("cursor", &[file]),
            r#"^"cursor^" ^"C:\Users\u\Downloads\a^&calc^&.txt^""#
        );
    }

    #[test]
    fn every_special_character_gets_a_caret() {
        assert_eq!(
            cmd_quote("a|b<c>d(e)f%PATH%g!h^i"),
            r#"^"a^|b^<c^>d^(e^)f^%PATH^%g^!h^^i^""#
        );
    }

    #[test]
    fn spaces_stay_inside_one_word() {
        let ws = Path::new(r"C:\My Projects\app");
        let file = Path::new(r"C:\My Projects\app\main.rs");
        assert_eq!(
            cmd_line("cursor", &[ws, file]),
            r#"^"cursor^" ^"C:\My Projects\app^" ^"C:\My Projects\app\main.rs^""#
        );
    }

    #[test]
    fn backslashes_before_quotes_are_doubled() {
        assert_eq!(cmd_quote(r"C:\dir\"), r#"^"C:\dir\\^""#);
        assert_eq!(cmd_quote(r#"a\"b"#), r#"^"a\\\^"b^""#);
    }
}
