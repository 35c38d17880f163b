use crate::app::AppState;
use crate::errors::*;
use crate::models::RawConfiguration;
use crate::studio::{Edit, GetArtifact, GetSnapshot, Generate};
use actix_web::{AsyncResponder, FutureResponse, HttpResponse, Json, State};
use futures::future::Future;

pub fn get_config(state: State<AppState>) -> FutureResponse<HttpResponse, Error> {
    state
        .studio
        .send(GetSnapshot)
        .from_err::<Error>()
        .and_then(|snapshot| Ok(HttpResponse::Ok().json(snapshot.config)))
        .responder()
}

pub fn post_config(
    (config, state): (Json<RawConfiguration>, State<AppState>),
) -> FutureResponse<HttpResponse, Error> {
    let config = config.into_inner();
    let echo = config.clone();
    state
        .studio
        .send(Edit(config))
        .from_err::<Error>()
        .and_then(move |_| Ok(HttpResponse::Ok().json(echo)))
        .responder()
}

pub fn generate(state: State<AppState>) -> FutureResponse<HttpResponse, Error> {
    state
        .studio
        .send(Generate)
        .from_err::<Error>()
        .and_then(|generated| {
            let artifact = generated?;
            Ok(HttpResponse::Created().json(artifact.info()))
        })
        .responder()
}

pub fn get_artifact(state: State<AppState>) -> FutureResponse<HttpResponse, Error> {
    state
        .studio
        .send(GetArtifact)
        .from_err::<Error>()
        .and_then(|found| {
            let artifact = found?;
            Ok(HttpResponse::Ok().json(artifact.info()))
        })
        .responder()
}
