//! Typed access to the coordinator's persisted entities.
//!
//! Every accessor takes the store lock for the duration of a single read or write. The store is the
//! coordinator's staging layer, so writes stay invisible to the backing store until the coordinator
//! commits them. Callers must not hold a guard of their own while calling into the ledger, which
//! shares the same lock.

use crate::{CascadeCursor, CoordinatorResult, PauseState};
use alloy_primitives::{Address, B256};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeSet;
use verdict_dispute::DisputeGame;
use verdict_primitives::{Block, ClaimId, GameId, ProtocolConfig};
use verdict_proof::FraudProofClaim;
use verdict_store::{MetaSlot, SharedKeyValueStore, StoreKey, TypedStore};

#[derive(Clone)]
pub(crate) struct Records {
    store: SharedKeyValueStore,
}

impl Records {
    pub(crate) const fn new(store: SharedKeyValueStore) -> Self {
        Self { store }
    }

    fn get<T: DeserializeOwned>(&self, key: StoreKey) -> CoordinatorResult<Option<T>> {
        Ok(self.store.read().get_typed(key)?)
    }

    fn put<T: Serialize>(&self, key: StoreKey, value: &T) -> CoordinatorResult<()> {
        Ok(self.store.write().set_typed(key, value)?)
    }

    pub(crate) fn config(&self) -> CoordinatorResult<Option<ProtocolConfig>> {
        self.get(StoreKey::meta(MetaSlot::Config))
    }

    pub(crate) fn put_config(&self, config: &ProtocolConfig) -> CoordinatorResult<()> {
        self.put(StoreKey::meta(MetaSlot::Config), config)
    }

    pub(crate) fn block(&self, hash: B256) -> CoordinatorResult<Option<Block>> {
        self.get(StoreKey::block(hash))
    }

    pub(crate) fn put_block(&self, block: &Block) -> CoordinatorResult<()> {
        self.put(StoreKey::block(block.hash()), block)
    }

    /// Returns the hash of the live block at `number`.
    pub(crate) fn hash_at(&self, number: u64) -> CoordinatorResult<Option<B256>> {
        Ok(self.get::<Option<B256>>(StoreKey::block_number(number))?.flatten())
    }

    pub(crate) fn set_hash_at(&self, number: u64, hash: Option<B256>) -> CoordinatorResult<()> {
        self.put(StoreKey::block_number(number), &hash)
    }

    /// Returns the number of the highest live block, or `0` if only genesis exists.
    pub(crate) fn head(&self) -> CoordinatorResult<u64> {
        Ok(self.get(StoreKey::meta(MetaSlot::Head))?.unwrap_or_default())
    }

    pub(crate) fn set_head(&self, number: u64) -> CoordinatorResult<()> {
        self.put(StoreKey::meta(MetaSlot::Head), &number)
    }

    pub(crate) fn game(&self, id: GameId) -> CoordinatorResult<Option<DisputeGame>> {
        self.get(StoreKey::game(id))
    }

    pub(crate) fn put_game(&self, game: &DisputeGame) -> CoordinatorResult<()> {
        self.put(StoreKey::game(game.id()), game)
    }

    pub(crate) fn next_game_id(&self) -> CoordinatorResult<GameId> {
        let id: GameId = self.get(StoreKey::meta(MetaSlot::NextGameId))?.unwrap_or_default();
        self.put(StoreKey::meta(MetaSlot::NextGameId), &id.next())?;
        Ok(id)
    }

    pub(crate) fn open_games(&self) -> CoordinatorResult<BTreeSet<GameId>> {
        Ok(self.get(StoreKey::meta(MetaSlot::OpenGames))?.unwrap_or_default())
    }

    pub(crate) fn set_game_open(&self, id: GameId, open: bool) -> CoordinatorResult<()> {
        let mut games = self.open_games()?;
        if open {
            games.insert(id);
        } else {
            games.remove(&id);
        }
        self.put(StoreKey::meta(MetaSlot::OpenGames), &games)
    }

    pub(crate) fn claim(&self, id: ClaimId) -> CoordinatorResult<Option<FraudProofClaim>> {
        self.get(StoreKey::claim(id))
    }

    pub(crate) fn put_claim(&self, claim: &FraudProofClaim) -> CoordinatorResult<()> {
        self.put(StoreKey::claim(claim.id), claim)
    }

    pub(crate) fn next_claim_id(&self) -> CoordinatorResult<ClaimId> {
        let id: ClaimId = self.get(StoreKey::meta(MetaSlot::NextClaimId))?.unwrap_or_default();
        self.put(StoreKey::meta(MetaSlot::NextClaimId), &id.next())?;
        Ok(id)
    }

    pub(crate) fn balance(&self, owner: Address) -> CoordinatorResult<u64> {
        Ok(self.get(StoreKey::balance(owner))?.unwrap_or_default())
    }

    pub(crate) fn set_balance(&self, owner: Address, amount: u64) -> CoordinatorResult<()> {
        self.put(StoreKey::balance(owner), &amount)
    }

    pub(crate) fn credit(&self, owner: Address, amount: u64) -> CoordinatorResult<()> {
        let balance = self.balance(owner)?;
        self.set_balance(owner, balance.saturating_add(amount))
    }

    pub(crate) fn pause(&self) -> CoordinatorResult<PauseState> {
        Ok(self.get(StoreKey::meta(MetaSlot::Pause))?.unwrap_or_default())
    }

    pub(crate) fn set_pause(&self, state: &PauseState) -> CoordinatorResult<()> {
        self.put(StoreKey::meta(MetaSlot::Pause), state)
    }

    pub(crate) fn cursor(&self) -> CoordinatorResult<Option<CascadeCursor>> {
        Ok(self.get::<Option<CascadeCursor>>(StoreKey::cascade_cursor())?.flatten())
    }

    pub(crate) fn set_cursor(&self, cursor: Option<&CascadeCursor>) -> CoordinatorResult<()> {
        self.put(StoreKey::cascade_cursor(), &cursor)
    }
}
