use log::error;
use rocket::tokio::sync::Mutex;

use crate::error::Result;
use crate::store::{Repository, StoreSettings, VotingStore};

/// The voting store as shared by every request: commands are serialised by a
/// lock, and the state is saved before the lock is released.
pub struct SharedStore {
    store: Mutex<VotingStore>,
    repository: Box<dyn Repository>,
}

impl SharedStore {
    /// Load the state from the repository and wrap it.
    pub async fn load<R>(repository: R, settings: StoreSettings) -> Result<Self>
    where
        R: Repository + 'static,
    {
        let state = repository.load().await?;
        Ok(Self {
            store: Mutex::new(VotingStore::new(state, settings)),
            repository: Box::new(repository),
        })
    }

    /// Run a query against the store.
    pub async fn read<T>(&self, query: impl FnOnce(&VotingStore) -> T) -> T {
        let store = self.store.lock().await;
        query(&store)
    }

    /// Run a command against the store, then persist the resulting state.
    ///
    /// If saving fails the in-memory change is kept and the error returned.
    pub async fn write<T>(&self, command: impl FnOnce(&mut VotingStore) -> T) -> Result<T> {
        let mut store = self.store.lock().await;
        let output = command(&mut store);
        if let Err(e) = self.repository.save(store.state()).await {
            error!("Failed to save voting state: {e}");
            return Err(e);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{
        api::candidate::CandidateSpec,
        common::VoterDetails,
        db::VotingState,
    };
    use crate::store::MemoryRepository;

    /// A repository that can be inspected after being handed to the store.
    #[derive(Default, Clone)]
    struct Inspectable(Arc<MemoryRepository>);

    #[rocket::async_trait]
    impl Repository for Inspectable {
        async fn load(&self) -> Result<VotingState> {
            self.0.load().await
        }

        async fn save(&self, state: &VotingState) -> Result<()> {
            self.0.save(state).await
        }
    }

    #[rocket::async_test]
    async fn commands_are_persisted() {
        let repository = Inspectable::default();
        let store = SharedStore::load(repository.clone(), StoreSettings::default())
            .await
            .unwrap();

        let candidate = store
            .write(|s| s.add_candidate(CandidateSpec::named("Alice")))
            .await
            .unwrap();
        store.write(|s| s.start_voting()).await.unwrap();
        let accepted = store
            .write(|s| s.cast_vote(VoterDetails::example(), candidate.id))
            .await
            .unwrap();
        assert!(accepted);

        let saved = repository.0.snapshot().await;
        assert_eq!(saved.candidates, vec![candidate]);
        assert!(saved.voting_session.is_active);
        assert_eq!(saved.votes.len(), 1);
        assert_eq!(saved, store.read(|s| s.state().clone()).await);
    }

    #[rocket::async_test]
    async fn rehydrates_from_repository() {
        let mut state = VotingState::default();
        state.voting_session.display_results = true;
        let repository = MemoryRepository::with_state(state.clone());

        let store = SharedStore::load(repository, StoreSettings::default())
            .await
            .unwrap();
        assert!(store.read(|s| s.session().display_results).await);
    }
}
