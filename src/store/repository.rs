use mongodb::{bson::doc, options::ReplaceOptions, Database};
use rocket::tokio::sync::Mutex;

use crate::error::Result;
use crate::model::{
    db::{StoredState, VotingState, STORAGE_NAME},
    mongodb::Coll,
};

/// Somewhere the voting state can be loaded from and saved to.
#[rocket::async_trait]
pub trait Repository: Send + Sync {
    /// Load the stored state, or the empty default state if nothing is stored.
    async fn load(&self) -> Result<VotingState>;

    /// Replace the stored state.
    async fn save(&self, state: &VotingState) -> Result<()>;
}

/// Keeps the state in process memory; lost on restart.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: Mutex<VotingState>,
}

impl MemoryRepository {
    /// A repository already holding the given state.
    pub fn with_state(state: VotingState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// A copy of the last saved state.
    pub async fn snapshot(&self) -> VotingState {
        self.state.lock().await.clone()
    }
}

#[rocket::async_trait]
impl Repository for MemoryRepository {
    async fn load(&self) -> Result<VotingState> {
        Ok(self.snapshot().await)
    }

    async fn save(&self, state: &VotingState) -> Result<()> {
        *self.state.lock().await = state.clone();
        Ok(())
    }
}

/// Keeps the state as a single document in MongoDB.
pub struct MongoRepository {
    storage: Coll<StoredState>,
}

impl MongoRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            storage: Coll::from_db(db),
        }
    }
}

#[rocket::async_trait]
impl Repository for MongoRepository {
    async fn load(&self) -> Result<VotingState> {
        let stored = self
            .storage
            .find_one(doc! { "_id": STORAGE_NAME }, None)
            .await?;
        Ok(stored.map(|s| s.state).unwrap_or_default())
    }

    async fn save(&self, state: &VotingState) -> Result<()> {
        let options = ReplaceOptions::builder().upsert(true).build();
        self.storage
            .replace_one(
                doc! { "_id": STORAGE_NAME },
                StoredState::new(state.clone()),
                options,
            )
            .await?;
        Ok(())
    }
}
