use tracing::warn;

use crate::domain::{DeadLetterQueue, Error, InboundRecord};

/// Reports rejected records through the log, flagging which rejections
/// are worth resubmitting.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDlq;

impl DeadLetterQueue for LogDlq {
    fn report(&self, record: &InboundRecord, error: &Error) {
        warn!(
            tx_id = %record.transaction_id,
            user_id = record.user_id,
            retryable = error.is_retryable(),
            %error,
            "transaction rejected"
        );
    }
}
