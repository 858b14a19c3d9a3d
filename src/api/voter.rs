use rocket::{serde::json::Json, Route, State};

use crate::{
    error::{Error, Result},
    model::{
        api::ballot::BallotSpec,
        common::{Vote, VoterRecord},
    },
    store::SharedStore,
};

pub fn routes() -> Vec<Route> {
    routes![cast_vote, voter]
}

#[post("/votes", data = "<ballot>", format = "json")]
async fn cast_vote(ballot: Json<BallotSpec>, store: &State<SharedStore>) -> Result<Json<Vote>> {
    let BallotSpec {
        voter_details,
        candidate_id,
    } = ballot.into_inner();
    voter_details
        .validate()
        .map_err(|e| Error::bad_request(e.to_string()))?;

    let vote = store
        .write(|store| store.try_cast_vote(voter_details, candidate_id))
        .await?
        .map_err(|rejection| Error::conflict(rejection.to_string()))?;
    Ok(Json(vote))
}

#[get("/voters/<index_number>")]
async fn voter(index_number: &str, store: &State<SharedStore>) -> Result<Json<VoterRecord>> {
    // May insert a placeholder record, so this is a command.
    let record = store
        .write(|store| store.get_voter_details_by_index(index_number))
        .await?;
    record
        .map(Json)
        .ok_or_else(|| Error::not_found(format!("Voter {index_number}")))
}
