// ── Description state codec ──
//
// Grammar of a tracked interface description:
//
//   [<user text> ]LLDP: <system> <port>[(DOWN)]
//
// Everything before the first "LLDP: " belongs to the operator. Decoding is
// total: text that does not fit degrades to "no recorded neighbor" instead
// of failing, so a hand-edited description can never stop a run.

use crate::model::{RecordedState, RemoteIdentity};

/// Separates operator text from the recorded neighbor.
pub const MARKER: &str = "LLDP: ";

/// Suffix marking a neighbor that was seen before but is gone now.
pub const DOWN_FLAG: &str = "(DOWN)";

/// Forward-only cursor over a description.
struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    /// Consume through the next `delimiter`, returning the text before it.
    /// Leaves the scanner untouched when the delimiter is absent.
    fn until(&mut self, delimiter: &str) -> Option<&'a str> {
        let (before, after) = self.rest.split_once(delimiter)?;
        self.rest = after;
        Some(before)
    }

    /// Consume everything left.
    fn finish(&mut self) -> &'a str {
        std::mem::take(&mut self.rest)
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_owned())
}

/// Decode a description into the state it records.
pub fn decode(text: &str) -> RecordedState {
    let mut scanner = Scanner::new(text);

    let Some(user_text) = scanner.until(MARKER) else {
        return RecordedState::unrecorded(text.trim_end());
    };

    let system = scanner.until(" ").unwrap_or_else(|| scanner.finish());
    let (port, down) = match scanner.until(DOWN_FLAG) {
        Some(port) => (port, true),
        None => (scanner.finish(), false),
    };

    RecordedState {
        user_text: user_text.trim_end().to_owned(),
        system: non_empty(system),
        port: non_empty(port),
        down,
    }
}

/// Encode a neighbor (and optional operator text) as a description.
pub fn encode(user_text: &str, remote: &RemoteIdentity, down: bool) -> String {
    let mut text = String::with_capacity(
        user_text.len() + MARKER.len() + remote.system.len() + remote.port.len() + 8,
    );
    if !user_text.is_empty() {
        text.push_str(user_text);
        text.push(' ');
    }
    text.push_str(MARKER);
    text.push_str(&remote.system);
    text.push(' ');
    text.push_str(&remote.port);
    if down {
        text.push_str(DOWN_FLAG);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn recorded(user_text: &str, system: &str, port: &str, down: bool) -> RecordedState {
        RecordedState {
            user_text: user_text.into(),
            system: Some(system.into()),
            port: Some(port.into()),
            down,
        }
    }

    #[test]
    fn plain_description_has_no_record() {
        assert_eq!(
            decode("uplink to core  "),
            RecordedState::unrecorded("uplink to core")
        );
    }

    #[test]
    fn empty_description() {
        assert_eq!(decode(""), RecordedState::default());
    }

    #[test]
    fn record_without_user_text() {
        assert_eq!(decode("LLDP: r1 ge-0/0/10"), recorded("", "r1", "ge-0/0/10", false));
    }

    #[test]
    fn record_with_user_text_and_down_flag() {
        assert_eq!(
            decode("mgmt link  LLDP: r1 ge-0/0/10(DOWN)"),
            recorded("mgmt link", "r1", "ge-0/0/10", true)
        );
    }

    #[test]
    fn text_after_down_flag_is_dropped() {
        assert_eq!(
            decode("LLDP: r1 ge-0/0/10(DOWN) stale"),
            recorded("", "r1", "ge-0/0/10", true)
        );
    }

    #[test]
    fn first_marker_wins() {
        let state = decode("see LLDP: notes LLDP: r1 p1");
        assert_eq!(state.user_text, "see");
        assert_eq!(state.system.as_deref(), Some("notes"));
        assert_eq!(state.port.as_deref(), Some("LLDP: r1 p1"));
    }

    #[test]
    fn marker_without_neighbor_is_unusable() {
        let state = decode("spare LLDP: ");
        assert_eq!(state.user_text, "spare");
        assert_eq!(state.system, None);
        assert_eq!(state.port, None);
        assert_eq!(state.identity(), None);
    }

    #[test]
    fn system_without_port_is_unusable() {
        let state = decode("LLDP: r1");
        assert_eq!(state.system.as_deref(), Some("r1"));
        assert_eq!(state.port, None);
        assert_eq!(state.identity(), None);
    }

    #[test]
    fn down_flag_without_port_is_unusable() {
        let state = decode("LLDP: r1 (DOWN)");
        assert!(state.down);
        assert_eq!(state.identity(), None);
    }

    #[test]
    fn encode_without_user_text() {
        let remote = RemoteIdentity::new("sysX", "p1");
        assert_eq!(encode("", &remote, false), "LLDP: sysX p1");
        assert_eq!(encode("", &remote, true), "LLDP: sysX p1(DOWN)");
    }

    #[test]
    fn encode_with_user_text() {
        let remote = RemoteIdentity::new("sysY", "p2");
        assert_eq!(encode("mgmt link", &remote, false), "mgmt link LLDP: sysY p2");
    }

    fn user_text() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 _./:()-]{0,24}".prop_filter("must survive trimming and marker search", |t| {
            t.trim_end() == t && !format!("{t} ").contains(MARKER) && !t.contains(DOWN_FLAG)
        })
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(
            user in user_text(),
            system in "[A-Za-z0-9._-]{1,16}",
            port in "[A-Za-z0-9/:._-]{1,16}",
            down in any::<bool>(),
        ) {
            let remote = RemoteIdentity::new(system.clone(), port.clone());
            let decoded = decode(&encode(&user, &remote, down));
            prop_assert_eq!(decoded, recorded(&user, &system, &port, down));
        }

        #[test]
        fn decode_never_panics(text in ".{0,64}") {
            let _ = decode(&text);
        }
    }
}
