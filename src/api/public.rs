use rocket::{serde::json::Json, Route, State};

use crate::model::{
    api::results::{VoterStats, VotingResult},
    common::{Candidate, VotingSession},
};
use crate::store::SharedStore;

pub fn routes() -> Vec<Route> {
    routes![session, candidates, results, stats]
}

#[get("/session")]
async fn session(store: &State<SharedStore>) -> Json<VotingSession> {
    Json(store.read(|store| store.session().clone()).await)
}

#[get("/candidates")]
async fn candidates(store: &State<SharedStore>) -> Json<Vec<Candidate>> {
    Json(store.read(|store| store.candidates().to_vec()).await)
}

#[get("/results")]
async fn results(store: &State<SharedStore>) -> Json<Vec<VotingResult>> {
    Json(store.read(|store| store.get_voting_results()).await)
}

#[get("/stats")]
async fn stats(store: &State<SharedStore>) -> Json<VoterStats> {
    Json(store.read(|store| store.get_voter_stats()).await)
}
