//! Extrinsic construction: turn a `StreamCall` into SCALE call data.
//!
//! The result is unsigned. Signing and submission happen elsewhere; a
//! signer takes `Extrinsic::call_data` as the call to wrap.

use codec::Encode;
use serde::Serialize;

use chainstream_core::{
    parse_account, parse_hash, AccountId32, CallArg, CodecError, StreamCall, StreamMethod,
};

use crate::config::PalletConfig;

/// An opaque, not yet signed pallet call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extrinsic {
    pub pallet: String,
    pub method: StreamMethod,
    #[serde(serialize_with = "hex_bytes")]
    pub call_data: Vec<u8>,
}

fn hex_bytes<S: serde::Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("0x{}", hex::encode(bytes)))
}

impl Extrinsic {
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.call_data))
    }
}

/// Builds a submittable value from a pallet call.
pub trait ExtrinsicBuilder: Send + Sync {
    fn build(&self, call: StreamCall) -> Result<Extrinsic, CodecError>;
}

/// On-chain type of each positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Param {
    Account,
    OptionAccount,
    Hash,
    /// An identifier, stored as its UTF-8 bytes.
    Id,
    OptionId,
    /// Hex-encoded signature bytes.
    Signature,
    Bool,
}

fn params(method: StreamMethod) -> &'static [Param] {
    use Param::*;
    match method {
        StreamMethod::Create => &[Account, Hash, OptionAccount, Id, OptionId, Signature],
        StreamMethod::Update => &[Id, Hash, Signature],
        StreamMethod::SetStatus => &[Id, Bool, Hash, Signature],
    }
}

/// Encodes `pallet_index ++ call_index ++ args` per the stream pallet's
/// call signatures.
#[derive(Debug, Clone)]
pub struct CallDataBuilder {
    pallet: PalletConfig,
}

impl CallDataBuilder {
    pub fn new(pallet: PalletConfig) -> Self {
        Self { pallet }
    }

    fn call_index(&self, method: StreamMethod) -> u8 {
        match method {
            StreamMethod::Create => self.pallet.create_call,
            StreamMethod::Update => self.pallet.update_call,
            StreamMethod::SetStatus => self.pallet.set_status_call,
        }
    }
}

impl ExtrinsicBuilder for CallDataBuilder {
    fn build(&self, call: StreamCall) -> Result<Extrinsic, CodecError> {
        let expected = params(call.method);
        if call.args.len() != expected.len() {
            return Err(CodecError::InvalidArgument {
                method: call.method.to_string(),
                index: call.args.len(),
                reason: format!("expected {} arguments, got {}", expected.len(), call.args.len()),
            });
        }

        let mut out = vec![self.pallet.pallet_index, self.call_index(call.method)];
        for (index, (param, arg)) in expected.iter().zip(&call.args).enumerate() {
            encode_arg(*param, arg, &mut out).map_err(|reason| CodecError::InvalidArgument {
                method: call.method.to_string(),
                index,
                reason,
            })?;
        }

        Ok(Extrinsic {
            pallet: self.pallet.name.clone(),
            method: call.method,
            call_data: out,
        })
    }
}

fn encode_arg(param: Param, arg: &CallArg, out: &mut Vec<u8>) -> Result<(), String> {
    match (param, arg) {
        (Param::Account, CallArg::Text(s)) => account(s)?.encode_to(out),
        (Param::OptionAccount, CallArg::Absent) => None::<AccountId32>.encode_to(out),
        (Param::OptionAccount, CallArg::Text(s)) => Some(account(s)?).encode_to(out),
        (Param::Hash, CallArg::Text(s)) => parse_hash(s).map_err(|e| e.to_string())?.encode_to(out),
        (Param::Id, CallArg::Text(s)) => s.as_bytes().encode_to(out),
        (Param::OptionId, CallArg::Absent) => None::<Vec<u8>>.encode_to(out),
        (Param::OptionId, CallArg::Text(s)) => Some(s.as_bytes().to_vec()).encode_to(out),
        (Param::Signature, CallArg::Text(s)) => {
            let digits = s.strip_prefix("0x").unwrap_or(s);
            hex::decode(digits).map_err(|e| e.to_string())?.encode_to(out)
        }
        (Param::Bool, CallArg::Bool(b)) => b.encode_to(out),
        (param, arg) => return Err(format!("cannot encode {arg:?} as {param:?}")),
    }
    Ok(())
}

fn account(s: &str) -> Result<AccountId32, String> {
    parse_account(s).map_err(|e| e.to_string())
}
