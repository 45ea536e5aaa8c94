//! Normalized payment notification from the processor webhook.
//!
//! The payment processor does not stick to one transport: callback fields
//! arrive via the query string, a form-encoded body, or a JSON body, and
//! sometimes split across both. The boundary merges every source into one
//! `PaymentNotification` value so the confirmation logic never branches on
//! transport shape.

use std::collections::HashMap;

use serde_json::Value;
use uuid::Uuid;

/// Payment progress fields reported by the processor.
///
/// Every field is optional because the processor is not trusted to send a
/// complete set; missing fields simply leave the order pending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentNotification {
    /// Order this callback refers to (embedded in the callback URL)
    pub order_id: Option<Uuid>,

    /// Amount received so far, in the settlement asset
    pub value_coin: Option<f64>,

    /// Pending-confirmation counter; zero means fully confirmed on-chain
    pub pending: Option<i64>,

    /// Processor's transaction identifier
    pub txid: Option<String>,
}

impl PaymentNotification {
    /// Merge query-string and body parameters into one notification.
    ///
    /// # Merge Rule
    ///
    /// Query parameters are read first, then body fields are laid on top:
    /// when the same field arrives through both transports the body value
    /// wins. The body is tried as a JSON object first, then as a
    /// form-encoded pair list; an unparsable body contributes nothing.
    pub fn from_transport(query: Option<&str>, body: &[u8]) -> Self {
        let mut fields: HashMap<String, Value> = HashMap::new();

        if let Some(raw) = query {
            for (name, value) in url::form_urlencoded::parse(raw.as_bytes()) {
                fields.insert(name.into_owned(), Value::String(value.into_owned()));
            }
        }

        if let Ok(Value::Object(object)) = serde_json::from_slice::<Value>(body) {
            fields.extend(object);
        } else {
            for (name, value) in url::form_urlencoded::parse(body) {
                fields.insert(name.into_owned(), Value::String(value.into_owned()));
            }
        }

        Self {
            order_id: string_field(&fields, "order_id").and_then(|s| Uuid::parse_str(&s).ok()),
            value_coin: float_field(&fields, "value_coin"),
            pending: integer_field(&fields, "pending"),
            // The processor names the field `txid_in`; accept the bare
            // spelling as well.
            txid: string_field(&fields, "txid_in").or_else(|| string_field(&fields, "txid")),
        }
    }
}

/// Read a field as a string, whatever JSON type it arrived as.
fn string_field(fields: &HashMap<String, Value>, name: &str) -> Option<String> {
    match fields.get(name)? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Read a field as a float; numbers and numeric strings both count.
fn float_field(fields: &HashMap<String, Value>, name: &str) -> Option<f64> {
    match fields.get(name)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a field as an integer; numbers and numeric strings both count.
fn integer_field(fields: &HashMap<String, Value>, name: &str) -> Option<i64> {
    match fields.get(name)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_query_string_only() {
        let id = Uuid::new_v4();
        let query = format!("order_id={id}&value_coin=14.3&pending=0&txid_in=abc123");
        let note = PaymentNotification::from_transport(Some(&query), b"");

        assert_eq!(note.order_id, Some(id));
        assert_eq!(note.value_coin, Some(14.3));
        assert_eq!(note.pending, Some(0));
        assert_eq!(note.txid.as_deref(), Some("abc123"));
    }

    #[test]
    fn parses_json_body_only() {
        let id = Uuid::new_v4();
        let body = format!(r#"{{"order_id":"{id}","value_coin":15.0,"pending":1}}"#);
        let note = PaymentNotification::from_transport(None, body.as_bytes());

        assert_eq!(note.order_id, Some(id));
        assert_eq!(note.value_coin, Some(15.0));
        assert_eq!(note.pending, Some(1));
        assert_eq!(note.txid, None);
    }

    #[test]
    fn parses_form_body_only() {
        let note =
            PaymentNotification::from_transport(None, b"value_coin=4.75&pending=0&txid_in=tx9");

        assert_eq!(note.value_coin, Some(4.75));
        assert_eq!(note.pending, Some(0));
        assert_eq!(note.txid.as_deref(), Some("tx9"));
    }

    #[test]
    fn merges_order_id_from_query_with_body_fields() {
        let id = Uuid::new_v4();
        let query = format!("order_id={id}");
        let note = PaymentNotification::from_transport(
            Some(&query),
            br#"{"value_coin":"14.3","pending":"0"}"#,
        );

        assert_eq!(note.order_id, Some(id));
        assert_eq!(note.value_coin, Some(14.3));
        assert_eq!(note.pending, Some(0));
    }

    #[test]
    fn body_value_wins_over_query_value() {
        let id = Uuid::new_v4();
        let query = format!("order_id={id}&pending=1");
        let note = PaymentNotification::from_transport(Some(&query), br#"{"pending":0}"#);

        assert_eq!(note.pending, Some(0));
    }

    #[test]
    fn unparsable_body_contributes_nothing() {
        let id = Uuid::new_v4();
        let query = format!("order_id={id}");
        let note = PaymentNotification::from_transport(Some(&query), b"\xff\xfenot a payload");

        assert_eq!(note.order_id, Some(id));
        assert_eq!(note.value_coin, None);
        assert_eq!(note.pending, None);
    }

    #[test]
    fn malformed_order_id_is_dropped() {
        let note = PaymentNotification::from_transport(Some("order_id=not-a-uuid"), b"");
        assert_eq!(note.order_id, None);
    }
}
