//! Startup loaders for the number pool that `run_server` can't get from
//! `RuntimeConfig` alone (§6 config surface lists thresholds and limits,
//! not the pool membership itself).

use load_balancer::{SendingCredentials, SendingNumber};
use serde::Deserialize;

#[derive(Deserialize)]
struct SendingNumberSeed {
    phone_id: String,
    account_id: String,
    token: String,
    #[serde(default)]
    display_name: String,
    #[serde(default = "default_capacity")]
    max_capacity: u32,
}

fn default_capacity() -> u32 {
    1000
}

/// Reads `SENDING_NUMBERS_JSON` (a JSON array of sending-number seeds) if
/// set, otherwise falls back to a single number built from the
/// `WHATSAPP_*` variables the `whatsapp_client` crate already expects, so
/// a single-number deployment needs no extra configuration.
pub fn load_sending_number_pool() -> Vec<SendingNumber> {
    if let Ok(raw) = std::env::var("SENDING_NUMBERS_JSON") {
        let seeds: Vec<SendingNumberSeed> =
            serde_json::from_str(&raw).expect("SENDING_NUMBERS_JSON must be a valid JSON array");
        return seeds
            .into_iter()
            .map(|seed| {
                let mut number = SendingNumber::new(
                    seed.phone_id,
                    SendingCredentials { id: seed.account_id.clone(), account_id: seed.account_id, token: seed.token },
                    seed.max_capacity,
                );
                number.display_name = seed.display_name;
                number
            })
            .collect();
    }

    let phone_id = std::env::var("WHATSAPP_PHONE_NUMBER_ID").expect(
        "either SENDING_NUMBERS_JSON or WHATSAPP_PHONE_NUMBER_ID/WHATSAPP_ACCESS_TOKEN must be set",
    );
    let token = std::env::var("WHATSAPP_ACCESS_TOKEN").expect("WHATSAPP_ACCESS_TOKEN must be set");
    let account_id = std::env::var("WHATSAPP_BUSINESS_ACCOUNT_ID").unwrap_or_else(|_| phone_id.clone());

    vec![SendingNumber::new(phone_id, SendingCredentials { id: account_id.clone(), account_id, token }, 1000)]
}
