use rocket::{serde::json::Json, Route, State};

use crate::{
    error::{Error, Result},
    model::{
        api::{auth::AdminToken, candidate::CandidateSpec},
        common::{Candidate, CandidateId, VotingSession},
    },
    store::{SharedStore, VotingStore},
};

pub fn routes() -> Vec<Route> {
    routes![
        create_candidate,
        delete_candidate,
        start_session,
        stop_session,
        display_results,
        hide_results,
    ]
}

#[post("/candidates", data = "<spec>", format = "json")]
async fn create_candidate(
    _token: AdminToken,
    spec: Json<CandidateSpec>,
    store: &State<SharedStore>,
) -> Result<Json<Candidate>> {
    let spec = spec
        .into_inner()
        .normalized()
        .map_err(|e| Error::bad_request(e.to_string()))?;
    let candidate = store.write(|store| store.add_candidate(spec)).await?;
    Ok(Json(candidate))
}

#[delete("/candidates/<candidate_id>")]
async fn delete_candidate(
    _token: AdminToken,
    candidate_id: CandidateId,
    store: &State<SharedStore>,
) -> Result<()> {
    let removed = store
        .write(|store| store.remove_candidate(candidate_id))
        .await?;
    if !removed {
        return Err(Error::not_found(format!("Candidate {candidate_id}")));
    }
    Ok(())
}

#[post("/admin/session/start")]
async fn start_session(
    _token: AdminToken,
    store: &State<SharedStore>,
) -> Result<Json<VotingSession>> {
    let session = store
        .write(|store| {
            if store.session().is_active {
                return Err(Error::bad_request("Voting is already active"));
            }
            if store.candidates().is_empty() {
                return Err(Error::bad_request(
                    "Add at least one candidate before starting voting",
                ));
            }
            store.start_voting();
            Ok(store.session().clone())
        })
        .await??;
    Ok(Json(session))
}

#[post("/admin/session/stop")]
async fn stop_session(
    _token: AdminToken,
    store: &State<SharedStore>,
) -> Result<Json<VotingSession>> {
    let session = store
        .write(|store| {
            if !store.session().is_active {
                return Err(Error::bad_request("Voting is not active"));
            }
            store.stop_voting();
            Ok(store.session().clone())
        })
        .await??;
    Ok(Json(session))
}

#[post("/admin/session/display")]
async fn display_results(
    _token: AdminToken,
    store: &State<SharedStore>,
) -> Result<Json<VotingSession>> {
    let session = store
        .write(|store| {
            check_results_toggle(store)?;
            store.show_results();
            Ok::<_, Error>(store.session().clone())
        })
        .await??;
    Ok(Json(session))
}

#[post("/admin/session/hide")]
async fn hide_results(
    _token: AdminToken,
    store: &State<SharedStore>,
) -> Result<Json<VotingSession>> {
    let session = store
        .write(|store| {
            check_results_toggle(store)?;
            store.hide_results();
            Ok::<_, Error>(store.session().clone())
        })
        .await??;
    Ok(Json(session))
}

/// Results visibility can only change while voting is stopped and there is
/// something to show.
fn check_results_toggle(store: &VotingStore) -> Result<()> {
    if store.session().is_active {
        return Err(Error::bad_request(
            "Stop voting before changing results visibility",
        ));
    }
    if store.candidates().is_empty() {
        return Err(Error::bad_request("There are no candidates to show results for"));
    }
    Ok(())
}
