//! Adapter over the `qrcode` crate. Everything above this module talks
//! in terms of `EncodeRequest` and `Symbol` only.

use crate::errors::Error;
use crate::models::{ErrorCorrection, VersionHint, MAX_VERSION};
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode, Version};

#[derive(Debug, Clone)]
pub struct EncodeRequest<'a> {
    pub payload: &'a str,
    pub version: VersionHint,
    pub error_correction: ErrorCorrection,
    /// Grow past the requested version when the payload does not fit.
    pub fit: bool,
}

/// A finished symbol: `width * width` modules, row major, `true` is dark.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub version: u8,
    pub width: usize,
    modules: Vec<bool>,
}

impl Symbol {
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.width + x]
    }

    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|m| **m).count()
    }

    fn from_code(code: &QrCode, version: u8) -> Symbol {
        let width = code.width();
        let mut modules = Vec::with_capacity(width * width);
        for y in 0..width {
            for x in 0..width {
                modules.push(code[(x, y)] == Color::Dark);
            }
        }
        Symbol {
            version,
            width,
            modules,
        }
    }
}

fn try_version(payload: &str, version: u8, level: EcLevel) -> Result<Option<QrCode>, Error> {
    match QrCode::with_version(payload.as_bytes(), Version::Normal(version as i16), level) {
        Ok(code) => Ok(Some(code)),
        Err(QrError::DataTooLong) => Ok(None),
        Err(e) => Err(Error::Encoding(s!(e))),
    }
}

pub fn encode(req: &EncodeRequest) -> Result<Symbol, Error> {
    let level: EcLevel = req.error_correction.into();
    let start = req.version.start();
    let end = if req.fit { MAX_VERSION } else { start };
    for version in start..=end {
        if let Some(code) = try_version(req.payload, version, level)? {
            return Ok(Symbol::from_code(&code, version));
        }
    }
    Err(Error::EncodingOverflow {
        len: req.payload.len(),
        level: req.error_correction,
    })
}
