use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use sha2::{Digest, Sha256};

const CAMPAIGN_ID_LEN: usize = 12;

static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

pub fn compute_hash(input: &[u8]) -> String {
    let digest = Sha256::digest(input);
    hex::encode(digest)
}

/// Short id for a new campaign, derived from the current instant and a seed.
pub fn new_campaign_id(seed: &str) -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let sequence = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let hash = compute_hash(format!("campaign:{nanos}:{sequence}:{seed}").as_bytes());
    hash[..CAMPAIGN_ID_LEN].to_string()
}
