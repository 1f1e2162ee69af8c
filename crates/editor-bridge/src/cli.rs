use std::{env, path::PathBuf, time::Duration};

use bridge_engine::{MESSAGE_FILE_NAME, Settings, Timeouts};
use bridge_server::{DEFAULT_HOST, DEFAULT_PORT};
use clap::Parser;
use logging::LogArgs;

/// File name of the log inside the temp directory.
pub const LOG_FILE_NAME: &str = "cursor_listener.log";

#[derive(Parser, Debug)]
#[command(
    name = "editor-bridge",
    about = "Open files in Cursor and paste comments into its chat over HTTP",
    version
)]
/// Command-line interface for the `editor-bridge` binary.
pub struct Cli {
    /// Host to bind
    #[arg(long, env = "CURSOR_SERVER_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "CURSOR_SERVER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Editor command used to open files
    #[arg(long, env = "CURSOR_EXECUTABLE", default_value = "cursor")]
    pub executable: String,

    /// Case-insensitive window-title substring identifying the editor
    #[arg(long, env = "CURSOR_WINDOW_MATCH", default_value = "cursor")]
    pub title_match: String,

    /// Seconds to wait for the first editor window on a cold start
    #[arg(long, env = "CURSOR_STARTUP_TIMEOUT", value_name = "SECS", default_value = "15", value_parser = parse_secs)]
    pub startup_timeout: Duration,

    /// Seconds to wait for the editor to settle on a cold start
    #[arg(long, env = "CURSOR_READY_TIMEOUT", value_name = "SECS", default_value = "5", value_parser = parse_secs)]
    pub ready_timeout: Duration,

    /// Seconds to wait for the file to load when the editor was running
    #[arg(long, env = "FILE_LOAD_TIMEOUT_HOT", value_name = "SECS", default_value = "8", value_parser = parse_secs)]
    pub file_load_timeout_hot: Duration,

    /// Seconds to wait for the file to load after a cold start
    #[arg(long, env = "FILE_LOAD_TIMEOUT_COLD", value_name = "SECS", default_value = "15", value_parser = parse_secs)]
    pub file_load_timeout_cold: Duration,

    /// Where to write the combined message (defaults to the temp directory)
    #[arg(long, value_name = "PATH")]
    pub message_file: Option<PathBuf>,

    /// Log file path (defaults to the temp directory)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Logging controls
    #[command(flatten)]
    pub log: LogArgs,
}

impl Cli {
    /// Bridge settings for these flags.
    pub fn settings(&self) -> Settings {
        Settings {
            executable: self.executable.clone(),
            title_match: self.title_match.clone(),
            message_path: self
                .message_file
                .clone()
                .unwrap_or_else(|| env::temp_dir().join(MESSAGE_FILE_NAME)),
            timeouts: Timeouts {
                startup: self.startup_timeout,
                ready: self.ready_timeout,
                file_load_hot: self.file_load_timeout_hot,
                file_load_cold: self.file_load_timeout_cold,
            },
        }
    }

    /// Resolved log file path.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| env::temp_dir().join(LOG_FILE_NAME))
    }
}

/// Parse fractional seconds, e.g. `2.5`.
fn parse_secs(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid seconds '{s}': {e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid seconds '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn seconds_accept_fractions() {
        assert_eq!(parse_secs("2.5"), Ok(Duration::from_millis(2500)));
        assert_eq!(parse_secs(" 15 "), Ok(Duration::from_secs(15)));
        assert!(parse_secs("-1").is_err());
        assert!(parse_secs("soon").is_err());
        assert!(parse_secs("NaN").is_err());
    }

    #[test]
    fn flags_map_onto_settings() {
        let cli = Cli::try_parse_from([
            "editor-bridge",
            "--executable",
            "cursor-nightly",
            "--startup-timeout",
            "1.5",
            "--file-load-timeout-hot",
            "0",
            "--message-file",
            "/tmp/m.txt",
        ])
        .unwrap();
        let s = cli.settings();
        assert_eq!(s.executable, "cursor-nightly");
        assert_eq!(s.timeouts.startup, Duration::from_millis(1500));
        assert_eq!(s.timeouts.file_load_hot, Duration::ZERO);
        assert_eq!(s.message_path, PathBuf::from("/tmp/m.txt"));
    }

    #[test]
    fn dotenv_values_feed_env_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "CURSOR_READY_TIMEOUT=2.5\n").unwrap();
        dotenvy::from_path(&path).unwrap();
        let cli = Cli::try_parse_from(["editor-bridge"]).unwrap();
        assert_eq!(cli.settings().timeouts.ready, Duration::from_millis(2500));
    }

    #[test]
    fn log_path_defaults_to_temp_dir() {
        let cli = Cli::try_parse_from(["editor-bridge", "--debug"]).unwrap();
        assert!(cli.log.debug);
        assert_eq!(cli.log_path(), env::temp_dir().join(LOG_FILE_NAME));
    }
}
