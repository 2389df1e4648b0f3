//! Plain-text and HTML body extraction from MIME messages

use crate::types::BodyKind;
use mailparse::{DispositionType, ParsedMail};
use tracing::debug;

/// Access to the textual bodies of a message.
///
/// The field parsers only depend on this interface, never on the mail
/// library's message tree.
pub trait MessageParts {
    /// First non-attachment `text/plain` part, or empty
    fn plain_text_part(&self) -> String;

    /// First non-attachment `text/html` part, or empty
    fn html_part(&self) -> String;

    fn part(&self, kind: BodyKind) -> String {
        match kind {
            BodyKind::PlainText => self.plain_text_part(),
            BodyKind::Html => self.html_part(),
        }
    }
}

impl MessageParts for ParsedMail<'_> {
    fn plain_text_part(&self) -> String {
        extract_part(self, BodyKind::PlainText)
    }

    fn html_part(&self) -> String {
        extract_part(self, BodyKind::Html)
    }
}

/// Walk the MIME tree depth-first and decode the first matching part.
///
/// A part matches when its content type equals the requested kind and its
/// disposition is not `attachment`. Returns an empty string if none match.
#[must_use]
pub fn extract_part(parsed: &ParsedMail, kind: BodyKind) -> String {
    find_part(parsed, kind)
        .and_then(|part| match part.get_body_raw() {
            Ok(bytes) => Some(decode_text(&bytes)),
            Err(e) => {
                debug!("Skipping undecodable {} part: {}", kind, e);
                None
            }
        })
        .unwrap_or_default()
}

fn find_part<'a, 'b>(parsed: &'a ParsedMail<'b>, kind: BodyKind) -> Option<&'a ParsedMail<'b>> {
    if parsed.subparts.is_empty() {
        return is_match(parsed, kind).then_some(parsed);
    }

    parsed
        .subparts
        .iter()
        .find_map(|part| find_part(part, kind))
}

fn is_match(part: &ParsedMail, kind: BodyKind) -> bool {
    part.ctype.mimetype.eq_ignore_ascii_case(kind.mime_type())
        && !matches!(
            part.get_content_disposition().disposition,
            DispositionType::Attachment
        )
}

/// Decode as UTF-8, falling back to Latin-1 when the bytes are not valid UTF-8
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().copied().map(char::from).collect(),
    }
}
