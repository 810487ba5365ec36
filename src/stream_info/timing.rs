//! Per-phase timing marks and their serde encodings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Offsets from the transaction start at which each phase completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    #[serde(with = "opt_duration_micros", skip_serializing_if = "Option::is_none")]
    pub last_downstream_rx_byte_received: Option<Duration>,
    #[serde(with = "opt_duration_micros", skip_serializing_if = "Option::is_none")]
    pub first_upstream_tx_byte_sent: Option<Duration>,
    #[serde(with = "opt_duration_micros", skip_serializing_if = "Option::is_none")]
    pub last_upstream_tx_byte_sent: Option<Duration>,
    #[serde(with = "opt_duration_micros", skip_serializing_if = "Option::is_none")]
    pub first_upstream_rx_byte_received: Option<Duration>,
    #[serde(with = "opt_duration_micros", skip_serializing_if = "Option::is_none")]
    pub last_upstream_rx_byte_received: Option<Duration>,
    #[serde(with = "opt_duration_micros", skip_serializing_if = "Option::is_none")]
    pub first_downstream_tx_byte_sent: Option<Duration>,
    #[serde(with = "opt_duration_micros", skip_serializing_if = "Option::is_none")]
    pub last_downstream_tx_byte_sent: Option<Duration>,
}

/// `SystemTime` as integer microseconds since the Unix epoch.
pub mod epoch_micros {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &SystemTime, s: S) -> Result<S::Ok, S::Error> {
        let micros = time
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros();
        s.serialize_u64(u64::try_from(micros).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SystemTime, D::Error> {
        let micros = u64::deserialize(d)?;
        Ok(UNIX_EPOCH + Duration::from_micros(micros))
    }
}

/// `Option<Duration>` as integer microseconds.
pub mod opt_duration_micros {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&u64::try_from(d.as_micros()).unwrap_or(u64::MAX)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_micros))
    }
}
