use crate::errors::*;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use askama::Template;
use mime_guess::get_mime_type;

pub mod api;
pub mod webui;

pub trait TemplateIntoResponse {
    fn into_response(&self) -> Result<HttpResponse, Error>;
    fn into_response_with(&self, status: StatusCode) -> Result<HttpResponse, Error>;
}

impl<T: Template> TemplateIntoResponse for T {
    fn into_response(&self) -> Result<HttpResponse, Error> {
        self.into_response_with(StatusCode::OK)
    }

    fn into_response_with(&self, status: StatusCode) -> Result<HttpResponse, Error> {
        let rsp = self.render().map_err(|e| Error::Template(s!(e)))?;
        let ctype = get_mime_type(T::extension().unwrap_or("txt")).to_string();
        Ok(HttpResponse::build(status)
            .content_type(ctype.as_str())
            .body(rsp))
    }
}
