//! Span finishing: maps a stage result onto span status and exception events.

use crate::error::{chain_message, AggregateError};
use opentelemetry::trace::{SpanRef, Status};
use opentelemetry::KeyValue;
use opentelemetry_semantic_conventions::trace::{EXCEPTION_MESSAGE, EXCEPTION_TYPE};
use std::error::Error as StdError;
use std::time::SystemTime;

const EXCEPTION_EVENT: &str = "exception";

/// Set status from `err`, record error events, and end the span.
///
/// Status descriptions and event messages carry the whole source chain.
/// An [`AggregateError`] anywhere in the source chain records one event per
/// cause, all stamped with the same time taken when this function is called.
pub fn finish_span(span: SpanRef<'_>, err: Option<&(dyn StdError + 'static)>) {
    match err {
        None => span.set_status(Status::Ok),
        Some(err) => {
            match find_aggregate(err) {
                Some(merr) => {
                    let occurred_at = SystemTime::now();
                    for cause in merr.errors() {
                        span.add_event_with_timestamp(
                            EXCEPTION_EVENT,
                            occurred_at,
                            exception_attributes(cause.as_ref()),
                        );
                    }
                }
                None => span.add_event(EXCEPTION_EVENT, exception_attributes(err)),
            }
            span.set_status(Status::error(chain_message(err)));
        }
    }
    span.end();
}

/// Walk the source chain for an aggregate.
fn find_aggregate<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a AggregateError> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(merr) = err.downcast_ref::<AggregateError>() {
            return Some(merr);
        }
        current = err.source();
    }
    None
}

fn exception_attributes(err: &(dyn StdError + 'static)) -> Vec<KeyValue> {
    vec![
        KeyValue::new(EXCEPTION_TYPE, error_type_name(err)),
        KeyValue::new(EXCEPTION_MESSAGE, chain_message(err)),
    ]
}

fn error_type_name(err: &(dyn StdError + 'static)) -> String {
    // Debug output starts with the type or variant name.
    let debug = format!("{err:?}");
    debug
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("error")
        .to_string()
}
