//! Mailbox collaborators: message access and label fetching

use crate::body::MessageParts;
use crate::error::{Error, ParseError, Result};
use mailparse::MailHeaderMap;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The minimal view of a message the processor needs
pub trait RawMessage {
    /// Unique identifier within the mailbox
    fn id(&self) -> &str;

    fn subject(&self) -> &str;

    /// Raw `Date` header value
    fn date_header(&self) -> &str;

    fn plain_text_body(&self) -> String;

    fn html_body(&self) -> String;

    /// Structural problem found while loading the message, if any
    fn defect(&self) -> Option<&ParseError> {
        None
    }
}

/// Supplies messages for a label, in mailbox order
pub trait MailSource {
    type Message: RawMessage;

    /// Fetch every message under `label`.
    ///
    /// Failing to supply a label at all is an error for the caller; an
    /// empty label is not.
    fn fetch(&mut self, label: &str) -> Result<Vec<Self::Message>>;
}

/// One RFC 5322 message with its bodies already extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmlMessage {
    id: String,
    subject: String,
    date_header: String,
    plain_text: String,
    html: String,
    defect: Option<ParseError>,
}

impl EmlMessage {
    /// Parse raw message bytes.
    ///
    /// The id is the `Message-ID` header, or `fallback_id` when absent.
    pub fn parse(raw: &[u8], fallback_id: &str) -> std::result::Result<Self, ParseError> {
        let parsed =
            mailparse::parse_mail(raw).map_err(|e| ParseError::Structure(e.to_string()))?;

        let header = |name: &str| {
            parsed
                .headers
                .get_first_value(name)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let id = Some(header("Message-ID"))
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| fallback_id.to_string());

        Ok(Self {
            id,
            subject: header("Subject"),
            date_header: header("Date"),
            plain_text: parsed.plain_text_part(),
            html: parsed.html_part(),
            defect: None,
        })
    }

    /// Placeholder for a message whose bytes could not be parsed
    #[must_use]
    pub fn unparseable(id: impl Into<String>, error: ParseError) -> Self {
        Self {
            id: id.into(),
            subject: String::new(),
            date_header: String::new(),
            plain_text: String::new(),
            html: String::new(),
            defect: Some(error),
        }
    }
}

impl RawMessage for EmlMessage {
    fn id(&self) -> &str {
        &self.id
    }

    fn subject(&self) -> &str {
        &self.subject
    }

    fn date_header(&self) -> &str {
        &self.date_header
    }

    fn plain_text_body(&self) -> String {
        self.plain_text.clone()
    }

    fn html_body(&self) -> String {
        self.html.clone()
    }

    fn defect(&self) -> Option<&ParseError> {
        self.defect.as_ref()
    }
}

/// Labels stored as directories of `.eml` files under a root.
///
/// `LinkedIn/Applied` maps to `<root>/LinkedIn/Applied/*.eml`. Files are
/// returned sorted by name; one that cannot be read or parsed comes back
/// as an unparseable message rather than failing the fetch.
#[derive(Debug, Clone)]
pub struct DirectoryMailbox {
    root: PathBuf,
}

impl DirectoryMailbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load(path: &Path) -> EmlMessage {
        let fallback_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let parsed = fs::read(path)
            .map_err(|e| ParseError::Unreadable(e.to_string()))
            .and_then(|raw| EmlMessage::parse(&raw, &fallback_id));

        parsed.unwrap_or_else(|e| {
            warn!("Skipping {}: {}", path.display(), e);
            EmlMessage::unparseable(fallback_id, e)
        })
    }
}

impl MailSource for DirectoryMailbox {
    type Message = EmlMessage;

    fn fetch(&mut self, label: &str) -> Result<Vec<EmlMessage>> {
        let dir = self.root.join(label);
        if !dir.is_dir() {
            return Err(Error::LabelNotFound(label.to_string()));
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|p| {
                !p.is_dir()
                    && p.extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("eml"))
            })
            .collect();
        paths.sort();

        debug!("Found {} messages in {}", paths.len(), dir.display());
        Ok(paths.iter().map(|p| Self::load(p)).collect())
    }
}

/// In-memory mailbox; unknown labels are simply empty
#[derive(Debug, Clone)]
pub struct MemoryMailbox<M> {
    labels: HashMap<String, Vec<M>>,
}

impl<M> Default for MemoryMailbox<M> {
    fn default() -> Self {
        Self {
            labels: HashMap::new(),
        }
    }
}

impl<M> MemoryMailbox<M> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>, messages: Vec<M>) -> Self {
        self.labels.entry(label.into()).or_default().extend(messages);
        self
    }
}

impl<M: RawMessage + Clone> MailSource for MemoryMailbox<M> {
    type Message = M;

    fn fetch(&mut self, label: &str) -> Result<Vec<M>> {
        Ok(self.labels.get(label).cloned().unwrap_or_default())
    }
}
