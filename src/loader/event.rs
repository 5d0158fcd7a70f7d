//! Typed event records
//!
//! Each line of the event log is an envelope `{"type": ..., "payload": {...}}`.
//! The loosely-typed payload is turned into one of four typed shapes here, at
//! the parse boundary. Unknown `type` values become [`EventRecord::Unrecognized`]
//! so newer exports still load.
//!
//! Every typed field is optional: a payload that is absent or `null` decodes
//! as an empty mapping. A field of the wrong JSON type reads as absent and its
//! raw value is kept in `extra`, next to the fields the auditor does not know
//! about. A recognized record is only dropped when its payload is not a
//! mapping at all.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::errors::RecordDefect;

/// The recognized record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    /// `DataSnapshotEvent`
    DataSnapshot,
    /// `DecisionEvent`
    Decision,
    /// `ModuleOpinionEvent`
    ModuleOpinion,
    /// `ForecastEvent`
    Forecast,
}

impl EventKind {
    /// Resolves a wire discriminator; `None` for anything unrecognized.
    pub fn from_type(discriminator: &str) -> Option<Self> {
        match discriminator {
            "DataSnapshotEvent" => Some(EventKind::DataSnapshot),
            "DecisionEvent" => Some(EventKind::Decision),
            "ModuleOpinionEvent" => Some(EventKind::ModuleOpinion),
            "ForecastEvent" => Some(EventKind::Forecast),
            _ => None,
        }
    }

    /// Returns the wire discriminator
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::DataSnapshot => "DataSnapshotEvent",
            EventKind::Decision => "DecisionEvent",
            EventKind::ModuleOpinion => "ModuleOpinionEvent",
            EventKind::Forecast => "ForecastEvent",
        }
    }
}

/// A captured piece of input data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSnapshot {
    /// Content-addressable identity decisions refer to
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// CANDLES_OHLCV, FUNDAMENTALS, MACRO, NEWS, ...
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub blob_ref: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub ingestion_time_utc: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub market_time_utc: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub final_source: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reference from a decision to the data it consumed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlobRef {
    #[serde(rename = "type")]
    pub blob_type: Option<String>,
    /// Snapshot identity the decision claims to have consumed
    pub hash_id: Option<String>,
}

impl BlobRef {
    /// Reads a blob entry leniently.
    ///
    /// Entries that are not objects, or whose `hash_id` is missing or not a
    /// string, yield `hash_id: None` and simply never match a snapshot.
    pub fn from_value(value: &Value) -> Self {
        let text = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_owned);
        Self {
            blob_type: text("type"),
            hash_id: text("hash_id"),
        }
    }

    /// Creates a well-formed reference to `hash_id`
    pub fn to_hash(hash_id: impl Into<String>) -> Self {
        Self {
            blob_type: None,
            hash_id: Some(hash_id.into()),
        }
    }
}

/// Reads an optional field; a value of the wrong type reads as `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// `input_blobs` must be a list. `null` means none; any other value counts
/// as a single entry that can never match.
fn deserialize_blobs<'de, D>(deserializer: D) -> Result<Vec<BlobRef>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(entries) => entries.iter().map(BlobRef::from_value).collect(),
        _ => vec![BlobRef::default()],
    })
}

/// A typed payload with a bag for fields it does not model
pub trait Payload: DeserializeOwned + Serialize + Default {
    /// Fields kept verbatim
    fn extra_mut(&mut self) -> &mut Map<String, Value>;
}

macro_rules! impl_payload {
    ($($ty:ty),*) => {
        $(impl Payload for $ty {
            fn extra_mut(&mut self) -> &mut Map<String, Value> {
                &mut self.extra
            }
        })*
    };
}

impl_payload!(DataSnapshot, Decision, ModuleOpinion, Forecast);

/// The final decision for a symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub decision_id: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// BUY | SELL | HOLD | PASS | VETO
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_blobs")]
    pub input_blobs: Vec<BlobRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single module's vote. Collected, not interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleOpinion {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub decision_id: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub stance: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub reasoning_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A five-day price forecast
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub predicted_price_5d: Option<f64>,
    /// 0-100 scale
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One event log record, classified by its declared type
#[derive(Debug, Clone, PartialEq)]
pub enum EventRecord {
    DataSnapshot(DataSnapshot),
    Decision(Decision),
    ModuleOpinion(ModuleOpinion),
    Forecast(Forecast),
    /// A `type` this version does not know, or no `type` at all
    Unrecognized { kind: Option<String> },
}

impl EventRecord {
    /// Returns the recognized kind, if any
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            EventRecord::DataSnapshot(_) => Some(EventKind::DataSnapshot),
            EventRecord::Decision(_) => Some(EventKind::Decision),
            EventRecord::ModuleOpinion(_) => Some(EventKind::ModuleOpinion),
            EventRecord::Forecast(_) => Some(EventKind::Forecast),
            EventRecord::Unrecognized { .. } => None,
        }
    }
}

/// A record together with its envelope metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    /// Envelope `timestamp` (or `event_time_utc`), when present and valid
    pub recorded_at: Option<DateTime<Utc>>,
    pub record: EventRecord,
}

/// Parses one log line into a classified record.
pub fn parse_record(line: &str) -> Result<ParsedRecord, RecordDefect> {
    let value: Value =
        serde_json::from_str(line).map_err(|e| RecordDefect::MalformedJson(e.to_string()))?;

    let Value::Object(mut envelope) = value else {
        return Err(RecordDefect::NotAnObject);
    };

    let recorded_at = envelope_timestamp(&envelope);
    let discriminator = envelope
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_owned);

    let kind = match discriminator.as_deref().and_then(EventKind::from_type) {
        Some(kind) => kind,
        None => {
            return Ok(ParsedRecord {
                recorded_at,
                record: EventRecord::Unrecognized {
                    kind: discriminator,
                },
            })
        }
    };

    let payload = envelope.remove("payload");
    let record = match kind {
        EventKind::DataSnapshot => EventRecord::DataSnapshot(decode_payload(kind, payload)?),
        EventKind::Decision => EventRecord::Decision(decode_payload(kind, payload)?),
        EventKind::ModuleOpinion => EventRecord::ModuleOpinion(decode_payload(kind, payload)?),
        EventKind::Forecast => EventRecord::Forecast(decode_payload(kind, payload)?),
    };

    Ok(ParsedRecord {
        recorded_at,
        record,
    })
}

fn decode_payload<T: Payload>(kind: EventKind, payload: Option<Value>) -> Result<T, RecordDefect> {
    match payload {
        None | Some(Value::Null) => Ok(T::default()),
        Some(Value::Object(fields)) => {
            let mut typed: T = serde_json::from_value(Value::Object(fields.clone())).map_err(
                |e| RecordDefect::PayloadShape {
                    kind: kind.as_str().to_string(),
                    reason: e.to_string(),
                },
            )?;
            keep_unread_fields(&mut typed, fields);
            Ok(typed)
        }
        Some(_) => Err(RecordDefect::PayloadNotAnObject {
            kind: kind.as_str().to_string(),
        }),
    }
}

/// Moves every non-null input field the typed view dropped into `extra`.
fn keep_unread_fields<T: Payload>(typed: &mut T, fields: Map<String, Value>) {
    let Ok(Value::Object(read)) = serde_json::to_value(&*typed) else {
        return;
    };
    for (key, value) in fields {
        if !value.is_null() && !read.contains_key(&key) {
            typed.extra_mut().insert(key, value);
        }
    }
}

fn envelope_timestamp(envelope: &Map<String, Value>) -> Option<DateTime<Utc>> {
    ["timestamp", "event_time_utc"]
        .iter()
        .filter_map(|key| envelope.get(*key).and_then(Value::as_str))
        .find_map(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|ts| ts.with_timezone(&Utc))
}
