//! Contains the [StoreKey] type, which namespaces every persisted entity.

use crate::StoreError;
use alloy_primitives::{Address, B256};
use core::fmt::{Display, Formatter};
use verdict_primitives::{ClaimId, GameId, OutputIndex};

/// The namespace of a [StoreKey].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyType {
    /// Singleton protocol state, identified by a [MetaSlot].
    Meta = 1,
    /// A [Block] by hash.
    ///
    /// [Block]: verdict_primitives::Block
    Block = 2,
    /// The hash of the live block at a given number.
    BlockNumber = 3,
    /// An [OutputRecord] by arena index.
    ///
    /// [OutputRecord]: verdict_primitives::OutputRecord
    Output = 4,
    /// The arena index of the live output record at a given block number.
    OutputNumber = 5,
    /// The arena index of the output record of a given block hash.
    OutputHash = 6,
    /// A dispute game by id.
    Game = 7,
    /// A fraud proof claim by id.
    Claim = 8,
    /// The claimable balance of an address.
    Balance = 9,
    /// The progress of an invalidation cascade.
    CascadeCursor = 10,
}

impl TryFrom<u8> for KeyType {
    type Error = StoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let key_type = match value {
            1 => Self::Meta,
            2 => Self::Block,
            3 => Self::BlockNumber,
            4 => Self::Output,
            5 => Self::OutputNumber,
            6 => Self::OutputHash,
            7 => Self::Game,
            8 => Self::Claim,
            9 => Self::Balance,
            10 => Self::CascadeCursor,
            _ => return Err(StoreError::InvalidKeyType(value)),
        };
        Ok(key_type)
    }
}

/// Slots of the [KeyType::Meta] namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MetaSlot {
    /// The active [ProtocolConfig].
    ///
    /// [ProtocolConfig]: verdict_primitives::ProtocolConfig
    Config = 1,
    /// The next free output arena index.
    NextOutputIndex = 2,
    /// The number of the latest finalized block.
    LatestFinalized = 3,
    /// The next free game id.
    NextGameId = 4,
    /// The next free claim id.
    NextClaimId = 5,
    /// The pause state.
    Pause = 6,
    /// The set of games that have not been resolved.
    OpenGames = 7,
    /// The number of the highest live block.
    Head = 8,
}

/// A key in the protocol store.
///
/// **Layout**:
/// |  Bytes  | Description |
/// |---------|-------------|
/// | [0, 1)  | Type byte   |
/// | [1, 32) | Identifier  |
///
/// Numeric identifiers occupy the low-order 8 bytes, addresses the low-order 20 bytes, and hashes
/// are truncated to their low-order 31 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreKey {
    key_type: KeyType,
    data: [u8; 31],
}

impl StoreKey {
    const fn from_u64(key_type: KeyType, ident: u64) -> Self {
        let mut data = [0u8; 31];
        let bytes = ident.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            data[23 + i] = bytes[i];
            i += 1;
        }
        Self { key_type, data }
    }

    fn from_hash(key_type: KeyType, hash: B256) -> Self {
        let mut data = [0u8; 31];
        data.copy_from_slice(&hash[1..]);
        Self { key_type, data }
    }

    /// The key of a [MetaSlot].
    pub const fn meta(slot: MetaSlot) -> Self {
        Self::from_u64(KeyType::Meta, slot as u64)
    }

    /// The key of a block by hash.
    pub fn block(hash: B256) -> Self {
        Self::from_hash(KeyType::Block, hash)
    }

    /// The key of the block number index.
    pub const fn block_number(number: u64) -> Self {
        Self::from_u64(KeyType::BlockNumber, number)
    }

    /// The key of an output record.
    pub const fn output(index: OutputIndex) -> Self {
        Self::from_u64(KeyType::Output, index.0)
    }

    /// The key of the output record number index.
    pub const fn output_number(number: u64) -> Self {
        Self::from_u64(KeyType::OutputNumber, number)
    }

    /// The key of the output record hash index.
    pub fn output_hash(block_hash: B256) -> Self {
        Self::from_hash(KeyType::OutputHash, block_hash)
    }

    /// The key of a dispute game.
    pub const fn game(id: GameId) -> Self {
        Self::from_u64(KeyType::Game, id.0)
    }

    /// The key of a fraud proof claim.
    pub const fn claim(id: ClaimId) -> Self {
        Self::from_u64(KeyType::Claim, id.0)
    }

    /// The key of a claimable balance.
    pub fn balance(owner: Address) -> Self {
        let mut data = [0u8; 31];
        data[11..].copy_from_slice(owner.as_slice());
        Self { key_type: KeyType::Balance, data }
    }

    /// The key of the pending invalidation cascade.
    pub const fn cascade_cursor() -> Self {
        Self::from_u64(KeyType::CascadeCursor, 0)
    }

    /// Returns the [KeyType] of the key.
    pub const fn key_type(&self) -> KeyType {
        self.key_type
    }
}

impl From<StoreKey> for B256 {
    fn from(key: StoreKey) -> Self {
        let mut raw = [0u8; 32];
        raw[0] = key.key_type as u8;
        raw[1..].copy_from_slice(&key.data);
        Self::from(raw)
    }
}

impl TryFrom<B256> for StoreKey {
    type Error = StoreError;

    fn try_from(value: B256) -> Result<Self, Self::Error> {
        let key_type = KeyType::try_from(value[0])?;
        let mut data = [0u8; 31];
        data.copy_from_slice(&value[1..]);
        Ok(Self { key_type, data })
    }
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", B256::from(*self))
    }
}
