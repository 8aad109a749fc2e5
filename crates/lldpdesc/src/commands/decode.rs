//! Decode command: show what an interface description records.

use std::fmt::Write;

use serde::Serialize;

use lldpdesc_core::codec;

use crate::cli::{DecodeArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct Decoded {
    description: String,
    user_text: String,
    system: Option<String>,
    port: Option<String>,
    down: bool,
    /// Whether the description names a usable neighbor.
    tracked: bool,
}

impl Decoded {
    fn from_text(text: &str) -> Self {
        let state = codec::decode(text);
        Self {
            tracked: state.identity().is_some(),
            description: text.to_owned(),
            user_text: state.user_text,
            system: state.system,
            port: state.port,
            down: state.down,
        }
    }
}

fn detail(d: &Decoded) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Description: {:?}", d.description);
    let _ = writeln!(out, "User text:   {:?}", d.user_text);
    let _ = writeln!(out, "System:      {}", d.system.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Port:        {}", d.port.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Down:        {}", d.down);
    let _ = write!(out, "Tracked:     {}", d.tracked);
    out
}

fn plain(d: &Decoded) -> String {
    match (&d.system, &d.port) {
        (Some(system), Some(port)) if d.down => format!("{system} {port} down"),
        (Some(system), Some(port)) => format!("{system} {port}"),
        _ => "untracked".into(),
    }
}

#[allow(clippy::unnecessary_wraps)]
pub fn handle(args: &DecodeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let decoded = Decoded::from_text(&args.text);
    let out = output::render_single(&global.output, &decoded, detail, plain);
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracked_description() {
        let d = Decoded::from_text("uplink LLDP: core1 xe-0/0/1(DOWN)");
        assert!(d.tracked);
        assert!(d.down);
        assert_eq!(d.user_text, "uplink");
        assert_eq!(plain(&d), "core1 xe-0/0/1 down");
    }

    #[test]
    fn untracked_description() {
        let d = Decoded::from_text("to printer");
        assert!(!d.tracked);
        assert_eq!(plain(&d), "untracked");
        assert!(detail(&d).contains("System:      -"));
    }
}
