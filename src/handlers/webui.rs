use crate::app::AppState;
use crate::errors::*;
use crate::filters;
use crate::handlers::TemplateIntoResponse;
use crate::models::{ErrorCorrection, RawConfiguration};
use crate::pipeline::Artifact;
use crate::storage::ARTIFACT_FILENAME;
use crate::studio::{GetArtifact, GetSnapshot, Snapshot, Submit};
use actix_web::{AsyncResponder, Form, FutureResponse, HttpRequest, HttpResponse, State};
use askama::Template;
use chrono::NaiveDateTime;
use data_encoding::BASE64;
use futures::future::{err, ok, Either, Future};

struct LevelOption {
    value: &'static str,
    label: String,
    selected: bool,
}

struct ArtifactView {
    generation: u64,
    requested_version: String,
    version: u8,
    version_expanded: bool,
    module_count: u32,
    width: u32,
    height: u32,
    bytes: usize,
    generated_at: NaiveDateTime,
    preview: String,
}

impl<'a> From<&'a Artifact> for ArtifactView {
    fn from(artifact: &'a Artifact) -> Self {
        ArtifactView {
            generation: artifact.generation,
            requested_version: s!(artifact.config.version),
            version: artifact.version,
            version_expanded: artifact.version_expanded(),
            module_count: artifact.module_count,
            width: artifact.width,
            height: artifact.height,
            bytes: artifact.png.len(),
            generated_at: artifact.generated_at,
            preview: BASE64.encode(&artifact.png),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    config: &'a RawConfiguration,
    levels: Vec<LevelOption>,
    artifact: Option<ArtifactView>,
    error: &'a str,
    docs: &'a str,
    filename: &'static str,
}

fn level_options(selected: &str) -> Vec<LevelOption> {
    let selected = selected.trim().to_ascii_uppercase().parse::<ErrorCorrection>().ok();
    ErrorCorrection::ALL
        .iter()
        .map(|level| LevelOption {
            value: level.name(),
            label: level.label(),
            selected: selected == Some(*level),
        })
        .collect()
}

fn index_page<'a>(snapshot: &'a Snapshot, docs: &'a str) -> IndexTemplate<'a> {
    IndexTemplate {
        config: &snapshot.config,
        levels: level_options(&snapshot.config.error_correction),
        artifact: snapshot.artifact.as_ref().map(|a| ArtifactView::from(&**a)),
        error: snapshot.last_error.as_ref().map(|e| e.as_str()).unwrap_or(""),
        docs,
        filename: ARTIFACT_FILENAME,
    }
}

pub fn index(req: HttpRequest<AppState>) -> FutureResponse<HttpResponse, Error> {
    let docs = req.state().docs.clone();
    req.state()
        .studio
        .send(GetSnapshot)
        .from_err::<Error>()
        .and_then(move |snapshot| index_page(&snapshot, &docs).into_response())
        .responder()
}

/// The form's button. Success goes back to the page, a rejected
/// configuration renders the page again with the reason.
pub fn generate(
    (req, form): (HttpRequest<AppState>, Form<RawConfiguration>),
) -> FutureResponse<HttpResponse, Error> {
    let docs = req.state().docs.clone();
    let studio = req.state().studio.clone();
    req.state()
        .studio
        .send(Submit(form.into_inner()))
        .from_err::<Error>()
        .and_then(move |generated| match generated {
            Ok(_) => Either::A(ok(HttpResponse::Found().header("location", "/").finish())),
            Err(e) if e.is_user_error() => {
                let status = e.status();
                Either::B(studio.send(GetSnapshot).from_err::<Error>().and_then(move |snapshot| {
                    index_page(&snapshot, &docs).into_response_with(status)
                }))
            }
            Err(e) => Either::A(err(e)),
        })
        .responder()
}

pub fn download(state: State<AppState>) -> FutureResponse<HttpResponse, Error> {
    state
        .studio
        .send(GetArtifact)
        .from_err::<Error>()
        .and_then(|found| {
            let artifact = found?;
            Ok(HttpResponse::Ok()
                .content_type("image/png")
                .header(
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", ARTIFACT_FILENAME).as_str(),
                )
                .header("Cache-Control", "no-store")
                .body(artifact.png.clone()))
        })
        .responder()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawConfiguration;
    use crate::studio::Studio;

    #[test]
    fn test_level_options_mark_selection() {
        let levels = level_options("q");
        assert_eq!(levels.len(), 4);
        let selected: Vec<&str> = levels
            .iter()
            .filter(|l| l.selected)
            .map(|l| l.value)
            .collect();
        assert_eq!(selected, vec!["QUARTILE"]);
        assert!(level_options("nonsense").iter().all(|l| !l.selected));
    }

    #[test]
    fn test_empty_page_has_no_preview() {
        let snapshot = Studio::default().snapshot();
        let html = index_page(&snapshot, "# Help").render().unwrap();
        assert!(html.contains("name=\"text\""));
        assert!(!html.contains("data:image/png;base64,"));
        assert!(!html.contains("href=\"/qr_code.png\""));
        assert!(html.contains("# Help"));
    }

    #[test]
    fn test_page_shows_artifact_and_expanded_version() {
        let mut studio = Studio::default();
        studio.edit(RawConfiguration {
            text: "v".repeat(90),
            version: s!("2"),
            ..RawConfiguration::default()
        });
        let artifact = studio.generate().unwrap();
        let html = index_page(&studio.snapshot(), "").render().unwrap();
        assert!(html.contains("data:image/png;base64,"));
        assert!(html.contains("href=\"/qr_code.png\""));
        assert!(html.contains(&format!("version {}", artifact.version)));
        assert!(html.contains("expanded from 2"));
    }

    #[test]
    fn test_page_shows_last_error_and_escapes_input() {
        let mut studio = Studio::default();
        studio.edit(RawConfiguration {
            text: s!("<script>"),
            version: s!("99"),
            ..RawConfiguration::default()
        });
        assert!(studio.generate().is_err());
        let html = index_page(&studio.snapshot(), "").render().unwrap();
        assert!(html.contains("Invalid version"));
        assert!(!html.contains("<script>"));
    }
}
