use crate::errors::Error;
use crate::models::RawConfiguration;
use crate::pipeline::{self, Artifact, Limits};
use crate::storage::{ArtifactWriter, SaveArtifact};
use actix::{Actor, Addr, Context, Handler, Message, MessageResult};
use derive_deref::Deref;
use log::{info, warn};
use std::sync::Arc;

/// The single editing session: current form values and the published
/// artifact. Every change arrives as a message, so generations never
/// overlap and a reader always holds a complete artifact.
pub struct Studio {
    config: RawConfiguration,
    current: Option<Arc<Artifact>>,
    generation: u64,
    last_error: Option<String>,
    limits: Limits,
    writer: Option<Addr<ArtifactWriter>>,
}

impl Actor for Studio {
    type Context = Context<Self>;
}

impl Default for Studio {
    fn default() -> Self {
        Studio::new(Limits::default(), None)
    }
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub config: RawConfiguration,
    pub artifact: Option<Arc<Artifact>>,
    pub last_error: Option<String>,
}

impl Studio {
    pub fn new(limits: Limits, writer: Option<Addr<ArtifactWriter>>) -> Self {
        Studio {
            config: RawConfiguration::default(),
            current: None,
            generation: 0,
            last_error: None,
            limits,
            writer,
        }
    }

    pub fn edit(&mut self, config: RawConfiguration) {
        self.config = config;
    }

    pub fn generate(&mut self) -> Result<Arc<Artifact>, Error> {
        let result = self
            .config
            .validate()
            .and_then(|config| pipeline::generate(&config, self.generation + 1, self.limits));
        match result {
            Ok(artifact) => {
                let artifact = Arc::new(artifact);
                self.generation = artifact.generation;
                self.current = Some(artifact.clone());
                self.last_error = None;
                info!(
                    "generation {}: version {}, {}x{} px, {} bytes",
                    artifact.generation,
                    artifact.version,
                    artifact.width,
                    artifact.height,
                    artifact.png.len()
                );
                if let Some(ref writer) = self.writer {
                    writer.do_send(SaveArtifact(artifact.clone()));
                }
                Ok(artifact)
            }
            Err(e) => {
                warn!("generation failed: {}", e);
                self.last_error = Some(s!(e));
                Err(e)
            }
        }
    }

    pub fn current(&self) -> Option<Arc<Artifact>> {
        self.current.clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            config: self.config.clone(),
            artifact: self.current.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

/*
 * Messages understood by the studio
 */

#[derive(Debug, Deref)]
pub struct Edit(pub RawConfiguration);

impl Message for Edit {
    type Result = ();
}

#[derive(Debug)]
pub struct Generate;

impl Message for Generate {
    type Result = Result<Arc<Artifact>, Error>;
}

/// Edit followed by generate, handled as one event.
#[derive(Debug, Deref)]
pub struct Submit(pub RawConfiguration);

impl Message for Submit {
    type Result = Result<Arc<Artifact>, Error>;
}

#[derive(Debug)]
pub struct GetSnapshot;

impl Message for GetSnapshot {
    type Result = Snapshot;
}

#[derive(Debug)]
pub struct GetArtifact;

impl Message for GetArtifact {
    type Result = Result<Arc<Artifact>, Error>;
}

impl Handler<Edit> for Studio {
    type Result = ();

    fn handle(&mut self, msg: Edit, _: &mut Self::Context) -> Self::Result {
        self.edit(msg.0);
    }
}

impl Handler<Generate> for Studio {
    type Result = Result<Arc<Artifact>, Error>;

    fn handle(&mut self, _: Generate, _: &mut Self::Context) -> Self::Result {
        self.generate()
    }
}

impl Handler<Submit> for Studio {
    type Result = Result<Arc<Artifact>, Error>;

    fn handle(&mut self, msg: Submit, _: &mut Self::Context) -> Self::Result {
        self.edit(msg.0);
        self.generate()
    }
}

impl Handler<GetSnapshot> for Studio {
    type Result = MessageResult<GetSnapshot>;

    fn handle(&mut self, _: GetSnapshot, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.snapshot())
    }
}

impl Handler<GetArtifact> for Studio {
    type Result = Result<Arc<Artifact>, Error>;

    fn handle(&mut self, _: GetArtifact, _: &mut Self::Context) -> Self::Result {
        self.current().ok_or(Error::NoArtifact)
    }
}
