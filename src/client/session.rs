//! Session login for `login_sid.lua?version=2`
//!
//! The router answers with a small `SessionInfo` XML document carrying a
//! challenge. FRITZ!OS 7.24 and later offer a PBKDF2 challenge (`2$...`),
//! older releases an MD5 one.

use crate::error::{FritzboxError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::Sha256;

/// SID the router returns while not logged in
pub const INVALID_SID: &str = "0000000000000000";

static SID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<SID>([0-9a-fA-F]+)</SID>").expect("valid SID pattern"));
static CHALLENGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<Challenge>([^<]*)</Challenge>").expect("valid challenge pattern"));
static BLOCK_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<BlockTime>(\d+)</BlockTime>").expect("valid block time pattern"));

/// Fields of a `SessionInfo` document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub sid: String,
    pub challenge: String,
    /// Seconds the router refuses further login attempts
    pub block_time: u64,
}

impl SessionInfo {
    /// Extract the session fields from the XML body
    pub fn parse(xml: &str) -> Result<Self> {
        let capture = |re: &Regex| {
            re.captures(xml)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        };

        let sid = capture(&SID_RE)
            .ok_or_else(|| FritzboxError::authentication("SessionInfo without SID"))?;
        let challenge = capture(&CHALLENGE_RE).unwrap_or_default();
        let block_time = capture(&BLOCK_TIME_RE)
            .and_then(|b| b.parse().ok())
            .unwrap_or(0);

        Ok(Self {
            sid,
            challenge,
            block_time,
        })
    }

    /// Whether the SID grants access
    pub fn is_valid(&self) -> bool {
        self.sid != INVALID_SID
    }
}

/// Compute the login `response` for a challenge
pub fn challenge_response(challenge: &str, password: &str) -> Result<String> {
    if challenge.starts_with("2$") {
        pbkdf2_response(challenge, password)
    } else {
        Ok(md5_response(challenge, password))
    }
}

/// `2$<iter1>$<salt1>$<iter2>$<salt2>` → `<salt2>$<hex(pbkdf2(pbkdf2(password)))>`
fn pbkdf2_response(challenge: &str, password: &str) -> Result<String> {
    let parts: Vec<&str> = challenge.split('$').collect();
    let [_, iter1, salt1, iter2, salt2] = parts.as_slice() else {
        return Err(FritzboxError::authentication(format!(
            "Unexpected PBKDF2 challenge format: {challenge}"
        )));
    };

    let rounds = |iter: &str| {
        iter.parse::<u32>().map_err(|e| {
            FritzboxError::authentication(format!("Invalid challenge iteration count: {e}"))
        })
    };
    let salt = |hex_salt: &str| {
        hex::decode(hex_salt)
            .map_err(|e| FritzboxError::authentication(format!("Invalid challenge salt: {e}")))
    };

    let mut hash1 = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt(*salt1)?, rounds(*iter1)?, &mut hash1);

    let mut hash2 = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(&hash1, &salt(*salt2)?, rounds(*iter2)?, &mut hash2);

    Ok(format!("{salt2}${}", hex::encode(hash2)))
}

/// `<challenge>-<md5(utf16le(challenge-password))>`; code points above 255
/// are sent as `.`
fn md5_response(challenge: &str, password: &str) -> String {
    let bytes: Vec<u8> = format!("{challenge}-{password}")
        .chars()
        .map(|c| if (c as u32) > 255 { '.' } else { c })
        .flat_map(|c| (c as u16).to_le_bytes())
        .collect();

    format!("{challenge}-{:x}", md5::compute(bytes))
}
