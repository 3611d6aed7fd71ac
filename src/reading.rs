use std::collections::HashMap;

use anyhow::Context;
use aws_sdk_dynamodb::types::AttributeValue;

pub const CLIENT_ID_KEY: &str = "clientId";
pub const TS_KEY: &str = "ts";
pub const PAYLOAD_KEY: &str = "payload";

/// One telemetry row as stored by the device.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub client_id: String,
    /// Seconds since the epoch, fractional as published by the device.
    pub ts: f64,
    pub payload: Payload,
}

/// Sensor values of a reading. A field absent from the row, or not a finite
/// number, stays `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub temp: Option<f64>,
    pub light: Option<f64>,
    pub rh: Option<f64>,
    pub moisture: Option<f64>,
    pub pump: Option<f64>,
}

impl Reading {
    pub fn from_item(item: &HashMap<String, AttributeValue>) -> Result<Self, anyhow::Error> {
        let client_id = match item.get(CLIENT_ID_KEY) {
            Some(AttributeValue::S(s)) => s.clone(),
            _ => return Err(anyhow::anyhow!("Item is missing string attribute {CLIENT_ID_KEY}")),
        };

        let ts = item
            .get(TS_KEY)
            .and_then(number)
            .with_context(|| format!("Item for {client_id} is missing numeric attribute {TS_KEY}"))?;

        let payload = match item.get(PAYLOAD_KEY) {
            Some(AttributeValue::M(fields)) => Payload::from_fields(fields),
            _ => Payload::default(),
        };

        Ok(Reading {
            client_id,
            ts,
            payload,
        })
    }
}

impl Payload {
    fn from_fields(fields: &HashMap<String, AttributeValue>) -> Self {
        let field = |name: &str| fields.get(name).and_then(number);
        Payload {
            temp: field("temp"),
            light: field("light"),
            rh: field("rh"),
            moisture: field("moisture"),
            pump: field("pump"),
        }
    }
}

fn number(value: &AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::N(n) | AttributeValue::S(n) => {
            n.trim().parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}
