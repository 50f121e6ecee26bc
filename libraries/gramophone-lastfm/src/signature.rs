//! Request signing
//!
//! Last.fm authenticates write and auth calls with `api_sig`: every other
//! parameter sorted by key, each key immediately followed by its value, the
//! shared secret appended, then MD5 as lowercase hex.

use md5::{Digest, Md5};
use std::collections::BTreeMap;

/// Name of the signature parameter itself, never part of the signed string
pub const SIGNATURE_PARAM: &str = "api_sig";

/// Compute `api_sig` for `params` with `secret`
#[must_use]
pub fn param_signature<K, V>(params: &BTreeMap<K, V>, secret: &str) -> String
where
    K: AsRef<str> + Ord,
    V: AsRef<str>,
{
    let mut hasher = Md5::new();
    for (key, value) in params {
        if key.as_ref() == SIGNATURE_PARAM {
            continue;
        }
        hasher.update(key.as_ref().as_bytes());
        hasher.update(value.as_ref().as_bytes());
    }
    hasher.update(secret.as_bytes());

    format!("{:x}", hasher.finalize())
}

/// Add `api_sig` to `params`, replacing a stale one
pub fn sign(params: &mut BTreeMap<String, String>, secret: &str) {
    let signature = param_signature(params, secret);
    params.insert(SIGNATURE_PARAM.to_owned(), signature);
}
