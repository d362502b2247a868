use crate::application::recorder::UpdateDraft;
use crate::domain::money::Amount;
use crate::domain::order::{AttachmentRef, OrderId};
use crate::domain::stage::Stage;
use crate::error::{EngineError, Result};
use serde::Deserialize;
use std::io::Read;

/// A row as it appears in the feed. Field validation happens in the
/// conversion to [`Command`], where unknown stages and bad amounts surface
/// as the same rejections a form submission would get.
#[derive(Debug, Deserialize)]
struct RawRecord {
    r#type: String,
    order: OrderId,
    stage: Option<String>,
    amount: Option<String>,
    note: Option<String>,
    attachment: Option<String>,
}

/// One parsed instruction from the update feed.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Seeds a new order with its total amount.
    Open { order: OrderId, total: Amount },
    /// Proposes an update against an existing order.
    Update { order: OrderId, draft: UpdateDraft },
}

impl TryFrom<RawRecord> for Command {
    type Error = EngineError;

    fn try_from(raw: RawRecord) -> Result<Self> {
        match raw.r#type.as_str() {
            "open" => {
                let raw_total = raw.amount.as_deref().ok_or_else(|| {
                    EngineError::MalformedRecord(format!(
                        "open row for order {} is missing the total amount",
                        raw.order
                    ))
                })?;
                Ok(Command::Open {
                    order: raw.order,
                    total: Amount::parse(raw_total)?,
                })
            }
            "update" => {
                let stage = raw
                    .stage
                    .as_deref()
                    .map(str::parse::<Stage>)
                    .transpose()?;
                let payment = raw.amount.as_deref().map(Amount::parse).transpose()?;
                Ok(Command::Update {
                    order: raw.order,
                    draft: UpdateDraft {
                        stage,
                        payment,
                        note: raw.note.unwrap_or_default(),
                        attachment: raw.attachment.map(AttachmentRef::new),
                    },
                })
            }
            other => Err(EngineError::MalformedRecord(format!(
                "unknown row type {other:?}"
            ))),
        }
    }
}

/// Reads commands from a CSV source.
///
/// Wraps `csv::Reader` and provides an iterator over `Result<Command>`,
/// with whitespace trimming and flexible record lengths so hand-edited
/// feeds parse cleanly.
pub struct UpdateReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> UpdateReader<R> {
    /// Creates a new `UpdateReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads and parses commands, streaming large feeds without
    /// loading them into memory.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize::<RawRecord>()
            .map(|row| row.map_err(EngineError::from).and_then(Command::try_from))
    }
}
