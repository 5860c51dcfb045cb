//! JSON shapes returned by the `status`, `block` and `block_results` RPC methods.
//!
//! Hashes and addresses are upper-case hex, transactions and signatures are base64 and
//! 64-bit integers are quoted.
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::serde_helpers::{quoted, quoted_or_default};

/// `status` result.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    /// Node identity
    pub node_info: NodeInfo,
    /// Sync progress
    pub sync_info: SyncInfo,
}

/// Node identity section of `status`.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeInfo {
    /// Chain ID
    pub network: String,
}

/// Sync section of `status`.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncInfo {
    /// Latest committed height
    #[serde(deserialize_with = "quoted::deserialize")]
    pub latest_block_height: i64,
}

/// `block` result.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockResponse {
    /// The requested block
    pub block: RpcBlock,
}

/// A full block.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcBlock {
    /// Block header
    pub header: RpcHeader,
    /// Transactions
    pub data: RpcData,
    /// Evidence of misbehaviour
    #[serde(default)]
    pub evidence: RpcEvidenceList,
    /// Commit for the previous block
    pub last_commit: Option<RpcCommit>,
}

/// Block header.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcHeader {
    pub version: RpcConsensus,
    pub chain_id: String,
    #[serde(deserialize_with = "quoted::deserialize")]
    pub height: i64,
    pub time: DateTime<Utc>,
    pub last_block_id: RpcBlockId,
    pub last_commit_hash: String,
    pub data_hash: String,
    pub validators_hash: String,
    pub next_validators_hash: String,
    pub consensus_hash: String,
    pub app_hash: String,
    pub last_results_hash: String,
    pub evidence_hash: String,
    pub proposer_address: String,
}

/// Block and app protocol versions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcConsensus {
    #[serde(default, deserialize_with = "quoted_or_default::deserialize")]
    pub block: u64,
    #[serde(default, deserialize_with = "quoted_or_default::deserialize")]
    pub app: u64,
}

/// Block identifier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcBlockId {
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub parts: RpcPartSetHeader,
}

/// Part set header of a block identifier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcPartSetHeader {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub hash: String,
}

/// Transactions of a block, base64 encoded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcData {
    #[serde(default)]
    pub txs: Option<Vec<String>>,
}

/// Evidence list of a block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcEvidenceList {
    #[serde(default)]
    pub evidence: Option<Vec<RpcEvidence>>,
}

/// A single evidence entry, tagged with its amino type name.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum RpcEvidence {
    #[serde(rename = "tendermint/DuplicateVoteEvidence")]
    DuplicateVote(RpcDuplicateVoteEvidence),
    #[serde(rename = "tendermint/LightClientAttackEvidence")]
    LightClientAttack(RpcLightClientAttackEvidence),
}

/// Two conflicting votes from one validator.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcDuplicateVoteEvidence {
    pub vote_a: Option<RpcVote>,
    pub vote_b: Option<RpcVote>,
    #[serde(
        rename = "TotalVotingPower",
        alias = "total_voting_power",
        deserialize_with = "quoted::deserialize"
    )]
    pub total_voting_power: i64,
    #[serde(
        rename = "ValidatorPower",
        alias = "validator_power",
        deserialize_with = "quoted::deserialize"
    )]
    pub validator_power: i64,
    #[serde(rename = "Timestamp", alias = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// A consensus vote.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcVote {
    #[serde(rename = "type")]
    pub vote_type: i32,
    #[serde(deserialize_with = "quoted::deserialize")]
    pub height: i64,
    pub round: i32,
    #[serde(default)]
    pub block_id: RpcBlockId,
    pub timestamp: DateTime<Utc>,
    pub validator_address: String,
    pub validator_index: i32,
    #[serde(default)]
    pub signature: Option<String>,
}

/// Evidence of a light client attack.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcLightClientAttackEvidence {
    #[serde(rename = "ConflictingBlock", alias = "conflicting_block")]
    pub conflicting_block: Option<RpcLightBlock>,
    #[serde(
        rename = "CommonHeight",
        alias = "common_height",
        deserialize_with = "quoted::deserialize"
    )]
    pub common_height: i64,
    #[serde(default, rename = "ByzantineValidators", alias = "byzantine_validators")]
    pub byzantine_validators: Option<Vec<RpcValidator>>,
    #[serde(
        rename = "TotalVotingPower",
        alias = "total_voting_power",
        deserialize_with = "quoted::deserialize"
    )]
    pub total_voting_power: i64,
    #[serde(rename = "Timestamp", alias = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// A signed header together with its validator set.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcLightBlock {
    pub signed_header: Option<RpcSignedHeader>,
    pub validator_set: Option<RpcValidatorSet>,
}

/// A header and the commit that signs it.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcSignedHeader {
    pub header: Option<RpcHeader>,
    pub commit: Option<RpcCommit>,
}

/// Validator set.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcValidatorSet {
    #[serde(default)]
    pub validators: Option<Vec<RpcValidator>>,
    pub proposer: Option<RpcValidator>,
}

/// A single validator.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcValidator {
    pub address: String,
    pub pub_key: RpcPubKey,
    #[serde(deserialize_with = "quoted::deserialize")]
    pub voting_power: i64,
    #[serde(default, deserialize_with = "quoted_or_default::deserialize")]
    pub proposer_priority: i64,
}

/// Amino-tagged public key.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcPubKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub value: String,
}

/// Commit for a block.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcCommit {
    #[serde(deserialize_with = "quoted::deserialize")]
    pub height: i64,
    pub round: i32,
    #[serde(default)]
    pub block_id: RpcBlockId,
    #[serde(default)]
    pub signatures: Option<Vec<RpcCommitSig>>,
}

/// A validator signature within a commit.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcCommitSig {
    pub block_id_flag: i32,
    #[serde(default)]
    pub validator_address: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub signature: Option<String>,
}

/// `block_results` result.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockResultsResponse {
    /// Execution results, one per transaction
    #[serde(default)]
    pub txs_results: Option<Vec<RpcTxResult>>,
}

/// Execution result of a single transaction.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RpcTxResult {
    /// Result code, `0` on success
    #[serde(default)]
    pub code: u32,
}
