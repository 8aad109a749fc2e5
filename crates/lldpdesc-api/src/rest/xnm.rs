// XNM (Junoscript) XML helpers
//
// The REST endpoint answers configuration RPCs in XML and reports problems
// as `<xnm:error>` / `<xnm:warning>` elements; the on-box NETCONF session
// reports them as `<rpc-error>`. We only need to emit a few fixed RPCs and
// to find those elements, so this is string work rather than a general XML
// parser.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Emitted by `open-configuration` on every run; never worth reporting.
const BENIGN_WARNING: &str = "uncommitted changes will be discarded on exit";

/// Number of RPCs in the batch built by [`load_descriptions_batch`].
pub const LOAD_BATCH_RPCS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// An `xnm:error` or `xnm:warning` found in a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Find every error and warning in an XML reply, skipping the benign
/// `open-configuration` warning.
pub fn scan_diagnostics(xml: &str) -> Vec<Diagnostic> {
    let mut found = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find("<xnm:") {
        let element = &rest[start + 1..];
        let (severity, close) = if element.starts_with("xnm:error") {
            (Severity::Error, "</xnm:error>")
        } else if element.starts_with("xnm:warning") {
            (Severity::Warning, "</xnm:warning>")
        } else {
            rest = element;
            continue;
        };

        let end = element.find(close).unwrap_or(element.len());
        let body = &element[..end];
        let message = element_text(body, "message").unwrap_or_else(|| "(empty message)".into());

        if !(severity == Severity::Warning && message == BENIGN_WARNING) {
            found.push(Diagnostic { severity, message });
        }
        rest = &element[end..];
    }

    found
}

/// Find every `<rpc-error>` in a NETCONF reply. Severity comes from
/// `<error-severity>`; anything other than `warning` counts as an error.
pub fn scan_rpc_errors(xml: &str) -> Vec<Diagnostic> {
    let mut found = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find("<rpc-error>") {
        let element = &rest[start + "<rpc-error>".len()..];
        let end = element.find("</rpc-error>").unwrap_or(element.len());
        let body = &element[..end];

        let severity = match element_text(body, "error-severity").as_deref() {
            Some("warning") => Severity::Warning,
            _ => Severity::Error,
        };
        let message =
            element_text(body, "error-message").unwrap_or_else(|| "(empty message)".into());

        if !(severity == Severity::Warning && message == BENIGN_WARNING) {
            found.push(Diagnostic { severity, message });
        }
        rest = &element[end..];
    }

    found
}

/// Messages of the `Error`-severity diagnostics only.
pub fn errors(xml: &str) -> Vec<String> {
    scan_diagnostics(xml)
        .into_iter()
        .filter(|d| d.severity == Severity::Error)
        .map(|d| d.message)
        .collect()
}

fn element_text(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let len = xml[start..].find(&close)?;
    Some(unescape(xml[start..start + len].trim()))
}

pub const OPEN_PRIVATE: &str = "<open-configuration><private/></open-configuration>";
pub const CLOSE: &str = "<close-configuration/>";

/// `load-configuration` merging one description per changed interface.
pub fn load_interfaces(changes: &BTreeMap<String, String>) -> String {
    let mut interfaces = String::new();
    for (port, description) in changes {
        let _ = write!(
            interfaces,
            "<interface><name>{}</name><description>{}</description></interface>",
            escape(port),
            escape(description),
        );
    }

    format!(
        "<load-configuration action=\"merge\" format=\"xml\">\
         <configuration><interfaces>{interfaces}</interfaces></configuration>\
         </load-configuration>"
    )
}

pub fn commit(comment: &str) -> String {
    format!(
        "<commit-configuration><log>{}</log></commit-configuration>",
        escape(comment)
    )
}

/// Build the `open → load merge → commit → close` batch that writes one
/// description per changed interface.
pub fn load_descriptions_batch(changes: &BTreeMap<String, String>, comment: &str) -> String {
    format!(
        "{OPEN_PRIVATE}{}{}{CLOSE}",
        load_interfaces(changes),
        commit(comment)
    )
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn benign_warning_is_ignored() {
        let xml = r#"<xnm:warning xmlns:xnm="http://xml.juniper.net/xnm/1.1/xnm">
            <message>uncommitted changes will be discarded on exit</message>
            </xnm:warning>
            <xnm:error xmlns:xnm="http://xml.juniper.net/xnm/1.1/xnm">
            <source-daemon>mgd</source-daemon>
            <message>
            description too long
            </message>
            </xnm:error>"#;

        assert_eq!(
            scan_diagnostics(xml),
            vec![Diagnostic {
                severity: Severity::Error,
                message: "description too long".into(),
            }]
        );
    }

    #[test]
    fn error_without_message_still_counts() {
        let xml = "<xnm:error></xnm:error>";
        assert_eq!(errors(xml), vec!["(empty message)".to_string()]);
    }

    #[test]
    fn clean_reply_has_no_diagnostics() {
        assert!(scan_diagnostics("<ok/>").is_empty());
    }

    #[test]
    fn batch_escapes_descriptions() {
        let mut changes = BTreeMap::new();
        changes.insert("ge-0/0/1".to_string(), "a<b> & \"c\" LLDP: r1 p1".to_string());

        let batch = load_descriptions_batch(&changes, "made by lldpdesc");
        assert!(batch.contains(
            "<interface><name>ge-0/0/1</name>\
             <description>a&lt;b&gt; &amp; &quot;c&quot; LLDP: r1 p1</description></interface>"
        ));
        assert!(batch.starts_with("<open-configuration><private/></open-configuration>"));
        assert!(batch.contains("<log>made by lldpdesc</log>"));
        assert!(batch.ends_with("<close-configuration/>"));
    }

    #[test]
    fn rpc_errors_split_by_severity() {
        let xml = "<rpc-reply><load-configuration-results>\
            <rpc-error><error-severity>warning</error-severity>\
            <error-message>uncommitted changes will be discarded on exit</error-message></rpc-error>\
            <rpc-error><error-severity>warning</error-severity>\
            <error-message>statement not supported on this platform</error-message></rpc-error>\
            <rpc-error><error-type>protocol</error-type><error-severity>error</error-severity>\
            <error-message>\n interface xe-9/9/9 does not exist\n</error-message></rpc-error>\
            </load-configuration-results></rpc-reply>";

        assert_eq!(
            scan_rpc_errors(xml),
            vec![
                Diagnostic {
                    severity: Severity::Warning,
                    message: "statement not supported on this platform".into(),
                },
                Diagnostic {
                    severity: Severity::Error,
                    message: "interface xe-9/9/9 does not exist".into(),
                },
            ]
        );
        assert!(scan_rpc_errors("<rpc-reply><ok/></rpc-reply>").is_empty());
    }

    #[test]
    fn unescape_reverses_escape() {
        let text = "x < y && 'z' > \"w\"";
        assert_eq!(unescape(&escape(text)), text);
    }
}
