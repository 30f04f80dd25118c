//! Textual armor around binary payloads.
//!
//! The container is the classic PEM shape: a `-----BEGIN <label>-----`
//! line, a base64 body wrapped at 64 columns to match SSH tooling, and a
//! matching `-----END <label>-----` line. The same container carries DER
//! key material and encrypted payloads, only the label differs.

use crate::error::{Error, Result};

fn begin_marker(label: &str) -> String {
    format!("-----BEGIN {}-----", label)
}

fn end_marker(label: &str) -> String {
    format!("-----END {}-----", label)
}

/// Wrap `payload` in armor under `label`.
#[must_use]
pub fn encode(label: &str, payload: &[u8]) -> String {
    let body = base64::encode(payload);

    let mut armored = begin_marker(label);
    armored.push('\n');
    for chunk in body.as_bytes().chunks(64) {
        armored.push_str(std::str::from_utf8(chunk).expect("base64 output is ASCII"));
        armored.push('\n');
    }
    armored.push_str(&end_marker(label));
    armored.push('\n');

    armored
}

/// Undo [`encode`], rejecting missing or mismatched armor lines.
pub fn decode(label: &str, armored: &str) -> Result<Vec<u8>> {
    let mut lines = armored.lines();

    let first = lines
        .next()
        .ok_or_else(|| Error::KeyFormat("empty armored input".into()))?;
    if first.trim() != begin_marker(label) {
        return Err(Error::KeyFormat(format!(
            "expected {:?} on the first line",
            begin_marker(label),
        )));
    }

    let mut body = String::new();
    let mut terminated = false;
    for line in lines {
        if line.trim() == end_marker(label) {
            terminated = true;
            break;
        }
        body.push_str(line.trim());
    }
    if !terminated {
        return Err(Error::KeyFormat(format!(
            "missing {:?} line",
            end_marker(label),
        )));
    }

    base64::decode(&body).map_err(|err| Error::KeyFormat(format!("invalid base64 body: {}", err)))
}

#[cfg(test)]
mod test {
    use super::{decode, encode};
    use crate::error::Error;

    const LABEL: &str = "RSA PUBLIC KEY";

    #[test]
    fn test_round_trip() {
        let payload: Vec<u8> = (0_u8..=255).collect();
        let armored = encode(LABEL, &payload);

        assert_eq!(decode(LABEL, &armored).unwrap(), payload);
    }

    #[test]
    fn test_layout() {
        let armored = encode(LABEL, &[0xab; 100]);
        let lines: Vec<&str> = armored.lines().collect();

        assert_eq!(lines.first(), Some(&"-----BEGIN RSA PUBLIC KEY-----"));
        assert_eq!(lines.last(), Some(&"-----END RSA PUBLIC KEY-----"));
        // 100 bytes become 136 base64 characters: two full lines and a tail.
        assert_eq!(lines.len(), 5);
        assert!(lines[1..lines.len() - 1].iter().all(|line| line.len() <= 64));
    }

    #[test]
    fn test_label_mismatch_rejected() {
        let armored = encode("RSA PRIVATE KEY", b"whatever");

        assert!(matches!(
            decode(LABEL, &armored),
            Err(Error::KeyFormat(_)),
        ));
    }

    #[test]
    fn test_missing_end_rejected() {
        let armored = encode(LABEL, b"whatever");
        let truncated = armored.replace("-----END RSA PUBLIC KEY-----\n", "");

        assert!(matches!(
            decode(LABEL, &truncated),
            Err(Error::KeyFormat(_)),
        ));
    }

    #[test]
    fn test_garbage_body_rejected() {
        let armored = format!(
            "-----BEGIN {}-----\n!!!not base64!!!\n-----END {}-----\n",
            LABEL, LABEL,
        );

        assert!(matches!(
            decode(LABEL, &armored),
            Err(Error::KeyFormat(_)),
        ));
    }
}
