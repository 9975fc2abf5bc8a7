use std::process::{Command as StdCommand, Stdio};

use super::{Notifier, NotifyError};
use crate::config::NotifyConfig;

/// Renders alerts by running external programs built from argv templates.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    voice: Vec<String>,
    popup: Vec<String>,
}

impl CommandNotifier {
    pub fn new(voice: Vec<String>, popup: Vec<String>) -> Self {
        Self { voice, popup }
    }

    /// Configured templates, falling back to the platform defaults.
    pub fn from_config(config: &NotifyConfig) -> Self {
        Self::new(
            config
                .voice_command
                .clone()
                .unwrap_or_else(default_voice_command),
            config
                .popup_command
                .clone()
                .unwrap_or_else(default_popup_command),
        )
    }
}

impl Notifier for CommandNotifier {
    fn speak(&self, text: &str) -> Result<(), NotifyError> {
        let text = escape_for(&self.voice, text);
        run(&render(&self.voice, &[("{text}", text.as_str())]))
    }

    fn show_popup(
        &self,
        title: &str,
        message: &str,
        timeout_seconds: u64,
    ) -> Result<(), NotifyError> {
        let timeout = timeout_seconds.to_string();
        let timeout_ms = timeout_seconds.saturating_mul(1000).to_string();
        let title = escape_for(&self.popup, title);
        let message = escape_for(&self.popup, message);
        run(&render(
            &self.popup,
            &[
                ("{title}", title.as_str()),
                ("{message}", message.as_str()),
                ("{timeout_ms}", timeout_ms.as_str()),
                ("{timeout}", timeout.as_str()),
            ],
        ))
    }
}

/// Substitutes placeholders in a single left-to-right pass. Inserted values
/// are never scanned again.
fn render(template: &[String], values: &[(&str, &str)]) -> Vec<String> {
    template.iter().map(|arg| render_arg(arg, values)).collect()
}

fn render_arg(arg: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(arg.len());
    let mut rest = arg;
    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// PowerShell templates embed values inside a single-quoted literal, where
/// nothing expands and the only escape is a doubled quote. PowerShell also
/// treats the typographic single quotes as delimiters.
fn escape_for(template: &[String], value: &str) -> String {
    let is_powershell = template
        .first()
        .map(|p| p.to_ascii_lowercase().contains("powershell"))
        .unwrap_or(false);
    if !is_powershell {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}') {
            out.push(c);
        }
        out.push(c);
    }
    out
}

fn run(argv: &[String]) -> Result<(), NotifyError> {
    let Some((program, args)) = argv.split_first() else {
        return Err(NotifyError::Spawn {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        });
    };

    log::debug!("Running notifier: {:?}", argv);

    let output = StdCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| NotifyError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(NotifyError::Exit {
            program: program.clone(),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

pub fn default_voice_command() -> Vec<String> {
    voice_command_for(std::env::consts::OS)
}

pub fn default_popup_command() -> Vec<String> {
    popup_command_for(std::env::consts::OS)
}

fn voice_command_for(os: &str) -> Vec<String> {
    match os {
        "windows" => strings(&[
            "powershell",
            "-NoProfile",
            "-ExecutionPolicy",
            "Bypass",
            "-Command",
            "Add-Type -AssemblyName System.Speech; \
             (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak('{text}')",
        ]),
        "macos" => strings(&["say", "{text}"]),
        _ => strings(&["espeak", "{text}"]),
    }
}

fn popup_command_for(os: &str) -> Vec<String> {
    match os {
        "windows" => strings(&["msg", "*", "/time:{timeout}", "{message}"]),
        // Values reach the script through argv, never its source text.
        "macos" => strings(&[
            "osascript",
            "-e",
            "on run argv",
            "-e",
            "display notification (item 1 of argv) with title (item 2 of argv)",
            "-e",
            "end run",
            "{message}",
            "{title}",
        ]),
        _ => strings(&["notify-send", "-t", "{timeout_ms}", "{title}", "{message}"]),
    }
}
