//! Account and hash rendering.
//!
//! Accounts render as SS58 addresses, hashes as `0x`-hex. Both parse back
//! from their rendered form, which the call-data builder relies on.

use sp_core::crypto::{Ss58AddressFormat, Ss58Codec};

pub use sp_core::crypto::AccountId32;
pub use sp_core::H256;

use crate::error::CodecError;

/// SS58 network format of the target chain.
pub const DEFAULT_SS58_FORMAT: u16 = 29;

/// `true` for the all-zero account, which the runtime uses as "no account".
pub fn is_zero(account: &AccountId32) -> bool {
    AsRef::<[u8]>::as_ref(account).iter().all(|b| *b == 0)
}

/// Render as an SS58 address for the given network format.
pub fn to_ss58(account: &AccountId32, format: u16) -> String {
    account.to_ss58check_with_version(Ss58AddressFormat::custom(format))
}

/// Parse an SS58 address. Returns the account and its network format.
pub fn from_ss58(address: &str) -> Result<(AccountId32, u16), CodecError> {
    AccountId32::from_ss58check_with_version(address)
        .map(|(account, format)| (account, u16::from(format)))
        .map_err(|e| CodecError::InvalidAddress {
            address: address.to_string(),
            reason: format!("{e:?}"),
        })
}

/// Parse either an SS58 address or a `0x`-prefixed 32-byte hex key.
pub fn parse_account(input: &str) -> Result<AccountId32, CodecError> {
    if input.starts_with("0x") {
        let raw = decode_fixed_hex(input).map_err(|reason| CodecError::InvalidAddress {
            address: input.to_string(),
            reason,
        })?;
        return Ok(AccountId32::new(raw));
    }
    from_ss58(input).map(|(account, _)| account)
}

/// Parse a `0x`-hex 32-byte hash.
pub fn parse_hash(input: &str) -> Result<H256, CodecError> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(digits)?;
    if bytes.len() != 32 {
        return Err(CodecError::Hex(hex::FromHexError::InvalidStringLength));
    }
    Ok(H256::from_slice(&bytes))
}

/// Full `0x`-hex rendering. `H256`'s `Display` abbreviates.
pub fn hash_to_hex(hash: &H256) -> String {
    format!("0x{}", hex::encode(hash.as_bytes()))
}

fn decode_fixed_hex(input: &str) -> Result<[u8; 32], String> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(digits).map_err(|e| e.to_string())?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| format!("expected 32 bytes, got {}", b.len()))
}
