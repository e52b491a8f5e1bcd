//! A protocol deployment driven by in-process challenger and defender clients.

#![allow(dead_code, unreachable_pub)]

use alloy_primitives::{Address, Bytes, B256};
use verdict_coordinator::{Coordinator, CoordinatorResult};
use verdict_participant::{Action, Challenger, Defender, ExecutionTrace};
use verdict_primitives::{BlockProposal, GameId, GenesisAnchor, ProtocolConfig};
use verdict_proof::test_utils::MockReexecutionOracle;
use verdict_store::{shared, KeyValueStore, MemoryKeyValueStore, SharedKeyValueStore};

pub const ADMIN: Address = Address::repeat_byte(0xAD);
pub const PROPOSER: Address = Address::repeat_byte(0xB0);
pub const CHALLENGER: Address = Address::repeat_byte(0xC0);
pub const TREASURY: Address = Address::repeat_byte(0x7E);

pub const CHALLENGE_PERIOD: u64 = 86_400;
pub const ROUND_TIMEOUT: u64 = 3_600;
pub const BOND: u64 = 1_000;
pub const STAKE: u64 = 500;

pub fn genesis() -> GenesisAnchor {
    GenesisAnchor::new(B256::repeat_byte(0x6E), B256::repeat_byte(0x5E), 0)
}

pub fn config() -> ProtocolConfig {
    ProtocolConfig {
        genesis: genesis(),
        challenge_period: CHALLENGE_PERIOD,
        round_timeout: ROUND_TIMEOUT,
        min_challenge_stake: 100,
        proposer_bond: BOND,
        admin: ADMIN,
        proposer: PROPOSER,
        treasury: TREASURY,
        ..Default::default()
    }
}

/// A store that stops accepting writes once it has written `budget` batches, as if the process
/// died. A rejected batch leaves the inner store untouched.
pub struct CrashingKeyValueStore {
    inner: SharedKeyValueStore,
    budget: usize,
}

impl CrashingKeyValueStore {
    pub fn new(inner: SharedKeyValueStore, budget: usize) -> Self {
        Self { inner, budget }
    }
}

impl KeyValueStore for CrashingKeyValueStore {
    fn get(&self, key: B256) -> anyhow::Result<Option<Vec<u8>>> {
        self.inner.read().get(key)
    }

    fn set(&mut self, key: B256, value: Vec<u8>) -> anyhow::Result<()> {
        self.set_batch(vec![(key, value)])
    }

    fn set_batch(&mut self, batch: Vec<(B256, Vec<u8>)>) -> anyhow::Result<()> {
        if self.budget == 0 {
            anyhow::bail!("store crashed");
        }
        self.budget -= 1;
        self.inner.write().set_batch(batch)
    }
}

/// The tip a new proposal builds on.
#[derive(Debug, Clone, Copy)]
pub struct Tip {
    pub hash: B256,
    pub state_root: B256,
    pub number: u64,
}

pub struct Harness {
    pub coordinator: Coordinator<MockReexecutionOracle>,
    pub store: SharedKeyValueStore,
    pub oracle: MockReexecutionOracle,
    pub defender: Defender,
    pub challenger: Challenger<MockReexecutionOracle>,
    pub tip: Tip,
    pub now: u64,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(config())
    }

    pub fn with_config(config: ProtocolConfig) -> Self {
        let store = shared(MemoryKeyValueStore::new());
        let oracle = MockReexecutionOracle::default();
        let coordinator = Coordinator::open(config, store.clone(), oracle.clone()).unwrap();
        let genesis = genesis();
        Self {
            coordinator,
            store,
            challenger: Challenger::new(CHALLENGER, STAKE, oracle.clone()),
            oracle,
            defender: Defender::new(PROPOSER),
            tip: Tip { hash: genesis.hash, state_root: genesis.state_root, number: 0 },
            now: 1,
        }
    }

    /// Drops the coordinator and opens a new one over the same store.
    pub fn reopen(&mut self) -> CoordinatorResult<()> {
        self.coordinator = Coordinator::open(config(), self.store.clone(), self.oracle.clone())?;
        Ok(())
    }

    pub fn advance(&mut self, seconds: u64) -> u64 {
        self.now += seconds;
        self.now
    }

    /// Returns distinct transactions for a block.
    pub fn transactions(&self, number: u64, count: u64) -> Vec<Bytes> {
        (0..count)
            .map(|i| {
                let mut raw = number.to_be_bytes().to_vec();
                raw.extend_from_slice(&i.to_be_bytes());
                Bytes::from(raw)
            })
            .collect()
    }

    /// Builds a proposal on the tip whose trace may diverge from honest execution at `lie_from`.
    pub async fn build(
        &self,
        tx_count: u64,
        lie_from: Option<u64>,
    ) -> (BlockProposal, Vec<Bytes>, ExecutionTrace) {
        let number = self.tip.number + 1;
        let transactions = self.transactions(number, tx_count);
        let honest = ExecutionTrace::replay(&self.oracle, self.tip.state_root, &transactions)
            .await
            .unwrap();
        let trace = match lie_from {
            Some(from) => honest.corrupted_from(from, B256::with_last_byte(number as u8)),
            None => honest,
        };
        let proposal = BlockProposal::new(
            self.tip.hash,
            trace.post_state_root(),
            verdict_proof::transactions_root(&transactions),
            number,
            tx_count,
            PROPOSER,
            self.now,
        );
        (proposal, transactions, trace)
    }

    /// Proposes a block on the tip and lets the challenger assess it. Returns the block hash and
    /// the challenger's reaction.
    pub async fn propose(&mut self, tx_count: u64, lie_from: Option<u64>) -> (B256, Option<Action>) {
        let (proposal, transactions, trace) = self.build(tx_count, lie_from).await;
        let hash = self.coordinator.propose(PROPOSER, proposal.clone(), self.now).unwrap();
        self.defender.register(hash, transactions.clone(), trace);

        let reaction =
            self.challenger.assess(&proposal, self.tip.state_root, transactions).await.unwrap();
        self.tip = Tip { hash, state_root: proposal.state_root, number: proposal.number };
        (hash, reaction)
    }

    pub async fn propose_honest(&mut self, tx_count: u64) -> B256 {
        let (hash, reaction) = self.propose(tx_count, None).await;
        assert_eq!(reaction, None);
        hash
    }

    /// Proposes a block whose execution is misreported from transaction `lie_from` onward and
    /// opens the challenger's game against it.
    pub async fn propose_fraud(&mut self, tx_count: u64, lie_from: u64) -> (B256, GameId) {
        let (hash, reaction) = self.propose(tx_count, Some(lie_from)).await;
        let Some(action) = reaction else { panic!("challenger missed fraud in {hash}") };
        let game = self.submit(action).await.unwrap().unwrap();
        (hash, game)
    }

    /// Submits an action at the current time on behalf of the party that usually takes it.
    /// Returns the game a challenge opened.
    pub async fn submit(&mut self, action: Action) -> CoordinatorResult<Option<GameId>> {
        let caller = match action {
            Action::RespondBisection { .. } => PROPOSER,
            _ => CHALLENGER,
        };
        self.submit_as(caller, action).await
    }

    /// Submits an action at the current time on behalf of `caller`.
    pub async fn submit_as(
        &mut self,
        caller: Address,
        action: Action,
    ) -> CoordinatorResult<Option<GameId>> {
        let now = self.now;
        match action {
            Action::Challenge { block, stake } => {
                self.coordinator.challenge(caller, block, stake, now).map(Some)
            }
            Action::RespondBisection { game, mid_index, mid_root, proof } => self
                .coordinator
                .respond_bisection(caller, game, mid_index, mid_root, proof, now)
                .map(|_| None),
            Action::SelectHalf { game, half } => {
                self.coordinator.select_half(caller, game, half, now).map(|_| None)
            }
            Action::SubmitOneStepProof { game, proof } => self
                .coordinator
                .submit_one_step_proof(caller, game, proof, now)
                .await
                .map(|_| None),
        }
    }

    /// Returns the client due in `game` together with its next action.
    pub fn next_move(&self, game: GameId) -> Option<(Address, Action)> {
        let snapshot = self.coordinator.game(game).unwrap();
        if let Some(action) = self.defender.act(&snapshot).unwrap() {
            return Some((PROPOSER, action));
        }
        self.challenger.act(&snapshot).unwrap().map(|action| (CHALLENGER, action))
    }

    /// Returns the next action of whichever client is due in `game`.
    pub fn next_action(&self, game: GameId) -> Option<Action> {
        self.next_move(game).map(|(_, action)| action)
    }

    /// Plays `game` one action at a time, one second apart, until nobody is due or `limit`
    /// actions were submitted. Returns the actions submitted.
    pub async fn play(&mut self, game: GameId, limit: usize) -> Vec<Action> {
        let mut played = Vec::new();
        while played.len() < limit {
            let Some((caller, action)) = self.next_move(game) else { break };
            self.advance(1);
            self.submit_as(caller, action.clone()).await.unwrap();
            played.push(action);
        }
        played
    }
}
