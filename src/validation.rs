//! Field-level validation of inbound transaction requests.
//!
//! Rules are declared in a static per-field table and evaluated directly
//! against the request, collecting one message per offending field.

use crate::domain::error::{Error, FieldError};
use crate::domain::transaction::TransactionRequest;

pub const SOURCES: &[&str] = &["game", "server", "payment"];
pub const KINDS: &[&str] = &["win", "lose"];

#[derive(Debug, Clone, Copy)]
enum Rule {
    Required,
    OneOf(&'static [&'static str]),
    PositiveId,
}

enum FieldValue<'a> {
    Text(&'a str),
    Id(i64),
}

type Accessor = for<'a> fn(&'a TransactionRequest) -> FieldValue<'a>;

struct FieldRule {
    field: &'static str,
    value: Accessor,
    rules: &'static [Rule],
}

const TRANSACTION_RULES: &[FieldRule] = &[
    FieldRule {
        field: "transactionId",
        value: |r| FieldValue::Text(&r.id),
        rules: &[Rule::Required],
    },
    FieldRule {
        field: "accountId",
        value: |r| FieldValue::Id(r.account_id),
        rules: &[Rule::PositiveId],
    },
    FieldRule {
        field: "amount",
        value: |r| FieldValue::Text(&r.amount),
        rules: &[Rule::Required],
    },
    FieldRule {
        field: "source",
        value: |r| FieldValue::Text(&r.source),
        rules: &[Rule::Required, Rule::OneOf(SOURCES)],
    },
    FieldRule {
        field: "type",
        value: |r| FieldValue::Text(&r.kind),
        rules: &[Rule::Required, Rule::OneOf(KINDS)],
    },
];

fn check(field: &'static str, rule: Rule, value: &FieldValue<'_>) -> Option<FieldError> {
    match (rule, value) {
        (Rule::Required, FieldValue::Text(text)) => text
            .trim()
            .is_empty()
            .then(|| FieldError::new(field, format!("The {field} field is required"))),
        (Rule::OneOf(allowed), FieldValue::Text(text)) => (!allowed.contains(text)).then(|| {
            FieldError::new(
                field,
                format!("The {field} must be one of: {}", allowed.join(" ")),
            )
        }),
        (Rule::PositiveId, FieldValue::Id(id)) => (*id <= 0)
            .then(|| FieldError::new(field, format!("The {field} must be a positive number"))),
        _ => None,
    }
}

/// Evaluate the rule table against a request. The first failing rule per
/// field wins; every offending field is reported.
pub fn validate_request(request: &TransactionRequest) -> Result<(), Error> {
    let mut errors = Vec::new();

    for entry in TRANSACTION_RULES {
        let value = (entry.value)(request);
        if let Some(err) = entry
            .rules
            .iter()
            .find_map(|rule| check(entry.field, *rule, &value))
        {
            errors.push(err);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::FieldErrors;

    fn request() -> TransactionRequest {
        TransactionRequest {
            id: "tx-100".to_string(),
            account_id: 1,
            amount: "25.00".to_string(),
            source: "game".to_string(),
            kind: "win".to_string(),
        }
    }

    fn fields(err: Error) -> Vec<&'static str> {
        match err {
            Error::ValidationFailed(FieldErrors(errors)) => {
                errors.into_iter().map(|e| e.field).collect()
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn well_formed_request_passes() {
        assert!(validate_request(&request()).is_ok());
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let empty = TransactionRequest {
            id: String::new(),
            account_id: 0,
            amount: String::new(),
            source: String::new(),
            kind: String::new(),
        };
        assert_eq!(
            fields(validate_request(&empty).unwrap_err()),
            vec!["transactionId", "accountId", "amount", "source", "type"]
        );
    }

    #[test]
    fn out_of_enum_values_are_rejected() {
        let mut req = request();
        req.source = "email".to_string();
        req.kind = "refund".to_string();

        let err = validate_request(&req).unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed: \
             source: The source must be one of: game server payment; \
             type: The type must be one of: win lose"
        );
    }

    #[test]
    fn required_wins_over_membership_for_empty_values() {
        let mut req = request();
        req.source = String::new();

        let err = validate_request(&req).unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed: source: The source field is required"
        );
    }

    #[test]
    fn aliases_are_not_part_of_the_wire_enum() {
        let mut req = request();
        req.kind = "deposit".to_string();
        assert_eq!(fields(validate_request(&req).unwrap_err()), vec!["type"]);
    }
}
