// multipart/mixed splitting for batched RPC replies
//
// `POST /rpc` answers with one MIME part per RPC in the batch. RPCs with
// nothing to say (`close-configuration`) produce a part with no headers and
// no payload, which MIME treats as empty `text/plain`.

use tracing::warn;

/// One decoded part. `None` means the part had a type we do not understand.
pub type Part = Option<String>;

/// Split a batched reply into its parts.
///
/// A non-multipart reply is returned as a single part.
pub fn split_parts(content_type: &str, body: &str) -> Vec<Part> {
    let Some(boundary) = boundary(content_type) else {
        return vec![Some(body.to_owned())];
    };

    let delimiter = format!("--{boundary}");
    body.split(delimiter.as_str())
        .skip(1)
        .take_while(|segment| !segment.starts_with("--"))
        .map(decode_part)
        .collect()
}

fn boundary(content_type: &str) -> Option<String> {
    let lower = content_type.to_ascii_lowercase();
    if !lower.trim_start().starts_with("multipart/") {
        return None;
    }
    let start = lower.find("boundary=")? + "boundary=".len();
    let raw = content_type[start..].split(';').next()?.trim();
    let raw = raw.trim_matches('"');
    (!raw.is_empty()).then(|| raw.to_owned())
}

fn decode_part(segment: &str) -> Part {
    let segment = segment
        .strip_prefix("\r\n")
        .or_else(|| segment.strip_prefix('\n'))
        .unwrap_or(segment);

    let (headers, payload) = match (segment.find("\r\n\r\n"), segment.find("\n\n")) {
        (Some(crlf), _) => (&segment[..crlf], &segment[crlf + 4..]),
        (None, Some(lf)) => (&segment[..lf], &segment[lf + 2..]),
        (None, None) => (segment, ""),
    };
    let payload = payload.trim_end_matches(['\r', '\n']);

    let content_type = headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-type"))
        .map_or_else(
            || "text/plain".to_owned(),
            |(_, value)| {
                value
                    .split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_ascii_lowercase()
            },
        );

    match content_type.as_str() {
        "application/xml" | "application/json" => Some(payload.to_owned()),
        "text/plain" if payload.trim().is_empty() => Some(String::new()),
        other => {
            warn!(content_type = other, "unexpected part in batched RPC reply");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CT: &str = "multipart/mixed; boundary=fkj49sn38dcn3";

    #[test]
    fn splits_typed_and_empty_parts() {
        let body = "--fkj49sn38dcn3\r\n\
                    Content-Type: application/xml; charset=utf-8\r\n\
                    \r\n\
                    <ok/>\r\n\
                    --fkj49sn38dcn3\r\n\
                    \r\n\
                    --fkj49sn38dcn3\r\n\
                    Content-Type: application/xml; charset=utf-8\r\n\
                    \r\n\
                    <commit-results><routing-engine/></commit-results>\r\n\
                    --fkj49sn38dcn3--\r\n";

        assert_eq!(
            split_parts(CT, body),
            vec![
                Some("<ok/>".to_string()),
                Some(String::new()),
                Some("<commit-results><routing-engine/></commit-results>".to_string()),
            ]
        );
    }

    #[test]
    fn unknown_part_type_is_none() {
        let body = "--fkj49sn38dcn3\nContent-Type: image/png\n\nPNG\n--fkj49sn38dcn3--\n";
        assert_eq!(split_parts(CT, body), vec![None]);
    }

    #[test]
    fn quoted_boundary_is_accepted() {
        let ct = "multipart/mixed; boundary=\"abc\"";
        let body = "--abc\nContent-Type: application/json\n\n{}\n--abc--";
        assert_eq!(split_parts(ct, body), vec![Some("{}".to_string())]);
    }

    #[test]
    fn plain_reply_is_single_part() {
        assert_eq!(
            split_parts("application/xml", "<ok/>"),
            vec![Some("<ok/>".to_string())]
        );
    }
}
