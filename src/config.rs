//! Runtime settings, read from the environment (and `.env` through dotenv
//! in `main`).

use crate::errors::Error;
use crate::pipeline::{Limits, DEFAULT_MAX_IMAGE_EDGE};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1:3000";
pub const DEFAULT_DOCS: &str = "docs/qr-code-generator.md";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    /// Markdown shown in the help panel. The server refuses to start
    /// without it.
    pub docs_path: PathBuf,
    /// Local copy of the latest artifact, disabled unless set.
    pub save_dir: Option<PathBuf>,
    pub max_image_edge: u32,
}

impl Config {
    pub fn from_vars<I: IntoIterator<Item = (String, String)>>(vars: I) -> Result<Config, Error> {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        let non_empty = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let max_image_edge = match non_empty("QR_MAX_IMAGE_EDGE") {
            Some(v) => v.parse::<u32>().map_err(|_| {
                Error::Config(format!("QR_MAX_IMAGE_EDGE must be a positive integer, got {:?}", v))
            })?,
            None => DEFAULT_MAX_IMAGE_EDGE,
        };
        if max_image_edge == 0 {
            return Err(Error::Config(s!("QR_MAX_IMAGE_EDGE must be greater than 0")));
        }

        Ok(Config {
            host: non_empty("HOST").unwrap_or(DEFAULT_HOST).to_owned(),
            docs_path: PathBuf::from(non_empty("QR_DOCS").unwrap_or(DEFAULT_DOCS)),
            save_dir: non_empty("QR_SAVE_DIR").map(PathBuf::from),
            max_image_edge,
        })
    }

    pub fn from_env() -> Result<Config, Error> {
        Config::from_vars(std::env::vars())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_image_edge: self.max_image_edge,
        }
    }

    pub fn load_docs(&self) -> Result<String, Error> {
        fs::read_to_string(&self.docs_path).map_err(|e| {
            Error::Config(format!(
                "Documentation file not found at {}: {}",
                self.docs_path.display(),
                e
            ))
        })
    }
}
