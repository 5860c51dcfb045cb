//! Fee section of Cosmos transaction envelopes.
//!
//! Only the fields needed to read the fee are declared; prost skips the rest.
#![allow(missing_docs)]

use primitives::samples::Coin;
use prost::Message;

use crate::error::CodecError;

/// Type id marking a blob-carrying transaction envelope.
pub const BLOB_TX_TYPE_ID: &str = "BLOB";

/// `cosmos.tx.v1beta1.Tx`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Tx {
    #[prost(bytes = "vec", tag = "1")]
    pub body: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub auth_info: Option<AuthInfo>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub signatures: Vec<Vec<u8>>,
}

/// `cosmos.tx.v1beta1.AuthInfo`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthInfo {
    #[prost(message, optional, tag = "2")]
    pub fee: Option<Fee>,
}

/// `cosmos.tx.v1beta1.Fee`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Fee {
    #[prost(message, repeated, tag = "1")]
    pub amount: Vec<ProtoCoin>,
    #[prost(uint64, tag = "2")]
    pub gas_limit: u64,
    #[prost(string, tag = "3")]
    pub payer: String,
    #[prost(string, tag = "4")]
    pub granter: String,
}

/// `cosmos.base.v1beta1.Coin`, amounts are decimal strings.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoCoin {
    #[prost(string, tag = "1")]
    pub denom: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

/// Envelope wrapping a pay-for-blobs transaction together with its blobs.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlobTx {
    #[prost(bytes = "vec", tag = "1")]
    pub tx: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub blobs: Vec<Vec<u8>>,
    #[prost(string, tag = "3")]
    pub type_id: String,
}

impl TryFrom<&ProtoCoin> for Coin {
    type Error = CodecError;

    fn try_from(coin: &ProtoCoin) -> Result<Self, Self::Error> {
        let amount =
            coin.amount.parse().map_err(|_| CodecError::InvalidAmount(coin.amount.clone()))?;
        Ok(Self::new(coin.denom.clone(), amount))
    }
}

/// Returns the inner transaction of a blob envelope, or `raw` itself.
fn unwrap_blob_tx(raw: &[u8]) -> Vec<u8> {
    match BlobTx::decode(raw) {
        Ok(blob_tx) if blob_tx.type_id == BLOB_TX_TYPE_ID => blob_tx.tx,
        _ => raw.to_vec(),
    }
}

/// Decode the fee declared by a raw transaction.
pub fn decode_fee(raw: &[u8]) -> Result<Vec<Coin>, CodecError> {
    let tx = Tx::decode(unwrap_blob_tx(raw).as_slice())?;
    let fee = tx
        .auth_info
        .ok_or(CodecError::MissingField("auth_info"))?
        .fee
        .ok_or(CodecError::MissingField("auth_info.fee"))?;
    fee.amount.iter().map(Coin::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_tx(coins: &[(&str, &str)]) -> Vec<u8> {
        Tx {
            body: vec![0x0a, 0x02, 0x08, 0x01],
            auth_info: Some(AuthInfo {
                fee: Some(Fee {
                    amount: coins
                        .iter()
                        .map(|(denom, amount)| ProtoCoin {
                            denom: (*denom).to_owned(),
                            amount: (*amount).to_owned(),
                        })
                        .collect(),
                    gas_limit: 200_000,
                    ..Default::default()
                }),
            }),
            signatures: vec![vec![0xff; 64]],
        }
        .encode_to_vec()
    }

    #[test]
    fn decodes_fee_amounts() {
        let fee = decode_fee(&encode_tx(&[("uosmo", "2500"), ("uion", "1")])).unwrap();
        assert_eq!(fee, vec![Coin::new("uosmo", 2500), Coin::new("uion", 1)]);
    }

    #[test]
    fn decodes_zero_fee() {
        assert!(decode_fee(&encode_tx(&[])).unwrap().is_empty());
    }

    #[test]
    fn unwraps_blob_envelope() {
        let inner = encode_tx(&[("utia", "42")]);
        let envelope = BlobTx {
            tx: inner,
            blobs: vec![vec![1, 2, 3]],
            type_id: BLOB_TX_TYPE_ID.to_owned(),
        }
        .encode_to_vec();
        assert_eq!(decode_fee(&envelope).unwrap(), vec![Coin::new("utia", 42)]);
    }

    #[test]
    fn missing_auth_info_is_an_error() {
        let raw = Tx { body: vec![1], ..Default::default() }.encode_to_vec();
        assert!(matches!(decode_fee(&raw), Err(CodecError::MissingField("auth_info"))));

        let raw = Tx { auth_info: Some(AuthInfo { fee: None }), ..Default::default() }
            .encode_to_vec();
        assert!(matches!(decode_fee(&raw), Err(CodecError::MissingField("auth_info.fee"))));
    }

    #[test]
    fn invalid_amount_is_an_error() {
        let err = decode_fee(&encode_tx(&[("utia", "1.5")])).unwrap_err();
        assert!(matches!(err, CodecError::InvalidAmount(ref a) if a == "1.5"));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(decode_fee(&[0xff, 0xff, 0xff]), Err(CodecError::Decode(_))));
    }
}
