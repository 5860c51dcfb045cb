//! Conversion from RPC JSON blocks to their protobuf encoding.
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use prost::Message;

use crate::{
    error::CodecError,
    proto::{self, BlockIdFlag, SignedMsgType, Timestamp},
    rpc::{
        RpcBlock, RpcBlockId, RpcCommit, RpcCommitSig, RpcConsensus, RpcDuplicateVoteEvidence,
        RpcEvidence, RpcHeader, RpcLightBlock, RpcLightClientAttackEvidence, RpcPubKey,
        RpcValidator, RpcValidatorSet, RpcVote,
    },
};

const ED25519_KEY_TYPE: &str = "tendermint/PubKeyEd25519";
const SECP256K1_KEY_TYPE: &str = "tendermint/PubKeySecp256k1";

/// Serialized size of `block` without its last commit.
///
/// Only the commit message itself is subtracted: the tag and length prefix of the
/// `last_commit` field still count towards the result.
pub fn block_payload_size(block: &RpcBlock) -> Result<usize, CodecError> {
    let proto = proto::Block::try_from(block)?;
    let commit_len = proto.last_commit.as_ref().map_or(0, Message::encoded_len);
    Ok(proto.encoded_len() - commit_len)
}

/// Raw transaction bytes of `block`.
pub fn decode_txs(block: &RpcBlock) -> Result<Vec<Vec<u8>>, CodecError> {
    block.data.txs.iter().flatten().map(|tx| base64("data.txs", tx)).collect()
}

fn hex(field: &'static str, value: &str) -> Result<Vec<u8>, CodecError> {
    hex::decode(value).map_err(|source| CodecError::Hex { field, source })
}

fn base64(field: &'static str, value: &str) -> Result<Vec<u8>, CodecError> {
    STANDARD.decode(value).map_err(|source| CodecError::Base64 { field, source })
}

fn optional_base64(field: &'static str, value: Option<&str>) -> Result<Vec<u8>, CodecError> {
    value.map_or_else(|| Ok(Vec::new()), |v| base64(field, v))
}

fn timestamp(time: &DateTime<Utc>) -> Timestamp {
    Timestamp { seconds: time.timestamp(), nanos: time.timestamp_subsec_nanos() as i32 }
}

impl TryFrom<&RpcBlock> for proto::Block {
    type Error = CodecError;

    fn try_from(block: &RpcBlock) -> Result<Self, Self::Error> {
        let evidence = block
            .evidence
            .evidence
            .iter()
            .flatten()
            .map(proto::Evidence::try_from)
            .collect::<Result<_, _>>()?;

        Ok(Self {
            header: Some((&block.header).try_into()?),
            data: Some(proto::Data { txs: decode_txs(block)? }),
            evidence: Some(proto::EvidenceList { evidence }),
            last_commit: block.last_commit.as_ref().map(TryInto::try_into).transpose()?,
        })
    }
}

impl TryFrom<&RpcHeader> for proto::Header {
    type Error = CodecError;

    fn try_from(header: &RpcHeader) -> Result<Self, Self::Error> {
        Ok(Self {
            version: Some((&header.version).into()),
            chain_id: header.chain_id.clone(),
            height: header.height,
            time: Some(timestamp(&header.time)),
            last_block_id: Some((&header.last_block_id).try_into()?),
            last_commit_hash: hex("header.last_commit_hash", &header.last_commit_hash)?,
            data_hash: hex("header.data_hash", &header.data_hash)?,
            validators_hash: hex("header.validators_hash", &header.validators_hash)?,
            next_validators_hash: hex("header.next_validators_hash", &header.next_validators_hash)?,
            consensus_hash: hex("header.consensus_hash", &header.consensus_hash)?,
            app_hash: hex("header.app_hash", &header.app_hash)?,
            last_results_hash: hex("header.last_results_hash", &header.last_results_hash)?,
            evidence_hash: hex("header.evidence_hash", &header.evidence_hash)?,
            proposer_address: hex("header.proposer_address", &header.proposer_address)?,
        })
    }
}

impl From<&RpcConsensus> for proto::Consensus {
    fn from(version: &RpcConsensus) -> Self {
        Self { block: version.block, app: version.app }
    }
}

impl TryFrom<&RpcBlockId> for proto::BlockId {
    type Error = CodecError;

    fn try_from(id: &RpcBlockId) -> Result<Self, Self::Error> {
        Ok(Self {
            hash: hex("block_id.hash", &id.hash)?,
            part_set_header: Some(proto::PartSetHeader {
                total: id.parts.total,
                hash: hex("block_id.parts.hash", &id.parts.hash)?,
            }),
        })
    }
}

impl TryFrom<&RpcCommit> for proto::Commit {
    type Error = CodecError;

    fn try_from(commit: &RpcCommit) -> Result<Self, Self::Error> {
        Ok(Self {
            height: commit.height,
            round: commit.round,
            block_id: Some((&commit.block_id).try_into()?),
            signatures: commit
                .signatures
                .iter()
                .flatten()
                .map(proto::CommitSig::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl TryFrom<&RpcCommitSig> for proto::CommitSig {
    type Error = CodecError;

    fn try_from(sig: &RpcCommitSig) -> Result<Self, Self::Error> {
        let flag = BlockIdFlag::try_from(sig.block_id_flag)
            .map_err(|_| CodecError::UnknownEnum { kind: "BlockIDFlag", value: sig.block_id_flag })?;
        Ok(Self {
            block_id_flag: flag as i32,
            validator_address: hex("commit_sig.validator_address", &sig.validator_address)?,
            timestamp: Some(timestamp(&sig.timestamp)),
            signature: optional_base64("commit_sig.signature", sig.signature.as_deref())?,
        })
    }
}

impl TryFrom<&RpcEvidence> for proto::Evidence {
    type Error = CodecError;

    fn try_from(evidence: &RpcEvidence) -> Result<Self, Self::Error> {
        use proto::evidence::Sum;

        let sum = match evidence {
            RpcEvidence::DuplicateVote(ev) => Sum::DuplicateVoteEvidence(ev.try_into()?),
            RpcEvidence::LightClientAttack(ev) => Sum::LightClientAttackEvidence(ev.try_into()?),
        };
        Ok(Self { sum: Some(sum) })
    }
}

impl TryFrom<&RpcDuplicateVoteEvidence> for proto::DuplicateVoteEvidence {
    type Error = CodecError;

    fn try_from(ev: &RpcDuplicateVoteEvidence) -> Result<Self, Self::Error> {
        Ok(Self {
            vote_a: ev.vote_a.as_ref().map(TryInto::try_into).transpose()?,
            vote_b: ev.vote_b.as_ref().map(TryInto::try_into).transpose()?,
            total_voting_power: ev.total_voting_power,
            validator_power: ev.validator_power,
            timestamp: Some(timestamp(&ev.timestamp)),
        })
    }
}

impl TryFrom<&RpcVote> for proto::Vote {
    type Error = CodecError;

    fn try_from(vote: &RpcVote) -> Result<Self, Self::Error> {
        let vote_type = SignedMsgType::try_from(vote.vote_type)
            .map_err(|_| CodecError::UnknownEnum { kind: "SignedMsgType", value: vote.vote_type })?;
        Ok(Self {
            r#type: vote_type as i32,
            height: vote.height,
            round: vote.round,
            block_id: Some((&vote.block_id).try_into()?),
            timestamp: Some(timestamp(&vote.timestamp)),
            validator_address: hex("vote.validator_address", &vote.validator_address)?,
            validator_index: vote.validator_index,
            signature: optional_base64("vote.signature", vote.signature.as_deref())?,
        })
    }
}

impl TryFrom<&RpcLightClientAttackEvidence> for proto::LightClientAttackEvidence {
    type Error = CodecError;

    fn try_from(ev: &RpcLightClientAttackEvidence) -> Result<Self, Self::Error> {
        Ok(Self {
            conflicting_block: ev.conflicting_block.as_ref().map(TryInto::try_into).transpose()?,
            common_height: ev.common_height,
            byzantine_validators: ev
                .byzantine_validators
                .iter()
                .flatten()
                .map(proto::Validator::try_from)
                .collect::<Result<_, _>>()?,
            total_voting_power: ev.total_voting_power,
            timestamp: Some(timestamp(&ev.timestamp)),
        })
    }
}

impl TryFrom<&RpcLightBlock> for proto::LightBlock {
    type Error = CodecError;

    fn try_from(block: &RpcLightBlock) -> Result<Self, Self::Error> {
        let signed_header = block
            .signed_header
            .as_ref()
            .map(|sh| -> Result<_, CodecError> {
                Ok(proto::SignedHeader {
                    header: sh.header.as_ref().map(TryInto::try_into).transpose()?,
                    commit: sh.commit.as_ref().map(TryInto::try_into).transpose()?,
                })
            })
            .transpose()?;

        Ok(Self {
            signed_header,
            validator_set: block.validator_set.as_ref().map(TryInto::try_into).transpose()?,
        })
    }
}

impl TryFrom<&RpcValidatorSet> for proto::ValidatorSet {
    type Error = CodecError;

    fn try_from(set: &RpcValidatorSet) -> Result<Self, Self::Error> {
        Ok(Self {
            validators: set
                .validators
                .iter()
                .flatten()
                .map(proto::Validator::try_from)
                .collect::<Result<_, _>>()?,
            proposer: set.proposer.as_ref().map(TryInto::try_into).transpose()?,
            // not carried over JSON
            total_voting_power: 0,
        })
    }
}

impl TryFrom<&RpcValidator> for proto::Validator {
    type Error = CodecError;

    fn try_from(val: &RpcValidator) -> Result<Self, Self::Error> {
        Ok(Self {
            address: hex("validator.address", &val.address)?,
            pub_key: Some((&val.pub_key).try_into()?),
            voting_power: val.voting_power,
            proposer_priority: val.proposer_priority,
        })
    }
}

impl TryFrom<&RpcPubKey> for proto::PublicKey {
    type Error = CodecError;

    fn try_from(key: &RpcPubKey) -> Result<Self, Self::Error> {
        use proto::public_key::Sum;

        let bytes = base64("pub_key.value", &key.value)?;
        let sum = match key.key_type.as_str() {
            ED25519_KEY_TYPE => Sum::Ed25519(bytes),
            SECP256K1_KEY_TYPE => Sum::Secp256k1(bytes),
            other => {
                return Err(CodecError::UnsupportedType {
                    kind: "public key",
                    type_tag: other.to_owned(),
                });
            }
        };
        Ok(Self { sum: Some(sum) })
    }
}
