use crate::handlers::*;
use crate::studio::Studio;
use actix::prelude::*;
use actix_web::{http::Method, middleware, App};
use std::sync::Arc;

pub struct AppState {
    pub studio: Addr<Studio>,
    pub docs: Arc<String>,
}

pub fn create_app(studio: Addr<Studio>, docs: Arc<String>) -> App<AppState> {
    let state = AppState { studio, docs };
    App::with_state(state)
        .middleware(middleware::Logger::new("\"%r\" %s %b %Dms"))
        .resource("/", |r| {
            r.method(Method::GET).with(webui::index);
        })
        .resource("/generate", |r| {
            r.method(Method::POST).with(webui::generate);
        })
        .resource("/qr_code.png", |r| {
            r.method(Method::GET).with(webui::download);
        })
        .resource("/api/config", |r| {
            r.method(Method::GET).with(api::get_config);
            r.method(Method::POST).with(api::post_config);
        })
        .resource("/api/generate", |r| {
            r.method(Method::POST).with(api::generate);
        })
        .resource("/api/artifact", |r| {
            r.method(Method::GET).with(api::get_artifact);
        })
}
