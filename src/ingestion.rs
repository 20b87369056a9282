use std::io::Read;
use std::pin::Pin;

use futures::stream::{self, Stream};
use serde::Deserialize;

use crate::domain::{Error, InboundRecord, RequestStream};

/// Reads inbound transaction records from CSV input with a
/// `user,tx,amount,source,type` header. Amounts stay textual here; the
/// engine owns normalization.
pub struct CsvReader<R: Read> {
    reader: Option<csv::Reader<R>>,
}

impl<R: Read> CsvReader<R> {
    pub fn new(reader: R) -> Self {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        Self { reader: Some(rdr) }
    }
}

/// Internal shape used only for CSV deserialization.
#[derive(Debug, Deserialize)]
struct CsvRow {
    user: i64,
    tx: String,
    amount: String,
    source: String,
    #[serde(rename = "type")]
    kind: String,
}

impl From<CsvRow> for InboundRecord {
    fn from(row: CsvRow) -> Self {
        InboundRecord {
            user_id: row.user,
            transaction_id: row.tx,
            amount: row.amount,
            source: row.source,
            kind: row.kind,
        }
    }
}

impl<R: Read + Send + 'static> RequestStream for CsvReader<R> {
    type Stream = Pin<Box<dyn Stream<Item = Result<InboundRecord, Error>> + Send>>;

    fn stream(&mut self) -> Self::Stream {
        // Take ownership of the reader so the iterator we build owns all
        // its data and is 'static.
        let Some(reader) = self.reader.take() else {
            // Already consumed; nothing left to stream.
            return Box::pin(stream::iter(Vec::<Result<InboundRecord, Error>>::new()));
        };

        let iter = reader.into_deserialize::<CsvRow>().map(|row| match row {
            Ok(row) => Ok(InboundRecord::from(row)),
            Err(e) => Err(Error::MalformedRecord(e.to_string())),
        });

        Box::pin(stream::iter(iter))
    }
}
