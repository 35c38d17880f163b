use crate::errors::Error;
use crate::pipeline::Artifact;
use actix::{Actor, Handler, Message, SyncContext};
use log::{debug, error};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

pub const ARTIFACT_FILENAME: &str = "qr_code.png";

/// Keeps a copy of the latest artifact on disk. Runs on its own thread
/// so file IO never stalls the studio.
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl Actor for ArtifactWriter {
    type Context = SyncContext<Self>;
}

impl ArtifactWriter {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        ArtifactWriter { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(ARTIFACT_FILENAME)
    }

    /// Writes through a temporary file and renames it over the previous
    /// copy, readers of the directory see either the old or the new image.
    pub fn save(&self, artifact: &Artifact) -> Result<PathBuf, Error> {
        fs::create_dir_all(&self.dir)?;
        let tmp = self.dir.join(format!(".{}.tmp", ARTIFACT_FILENAME));
        fs::write(&tmp, &artifact.png)?;
        let path = self.path();
        fs::rename(&tmp, &path)?;
        Ok(path)
    }
}

#[derive(Debug)]
pub struct SaveArtifact(pub Arc<Artifact>);

impl Message for SaveArtifact {
    type Result = Result<PathBuf, Error>;
}

impl Handler<SaveArtifact> for ArtifactWriter {
    type Result = Result<PathBuf, Error>;

    fn handle(&mut self, msg: SaveArtifact, _: &mut Self::Context) -> Self::Result {
        match self.save(&msg.0) {
            Ok(path) => {
                debug!(
                    "saved generation {} to {}",
                    msg.0.generation,
                    path.display()
                );
                Ok(path)
            }
            Err(e) => {
                error!("cannot save generation {}: {}", msg.0.generation, e);
                Err(e)
            }
        }
    }
}
