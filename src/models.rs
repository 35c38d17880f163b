use crate::errors::Error;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use strum_macros::EnumString;

pub const MIN_VERSION: u8 = 1;
pub const MAX_VERSION: u8 = 40;

pub const DEFAULT_TEXT: &str = "https://github.com/kuranez/qr-code-generator";
pub const DEFAULT_FOREGROUND: &str = "#000000";
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_BOX_SIZE: u32 = 10;
pub const DEFAULT_BORDER: u32 = 4; // quiet zone required by the QR standard

/*
 * Error correction levels, ordered from the least to the most redundant:
 * Low      - about 7% of codewords can be restored
 * Medium   - about 15%
 * Quartile - about 25%
 * High     - about 30%
 */
#[derive(
    Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Clone, Copy, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorCorrection {
    #[strum(serialize = "LOW", serialize = "L")]
    Low,
    #[strum(serialize = "MEDIUM", serialize = "M")]
    Medium,
    #[strum(serialize = "QUARTILE", serialize = "Q")]
    Quartile,
    #[strum(serialize = "HIGH", serialize = "H")]
    High,
}

impl ErrorCorrection {
    pub const ALL: [ErrorCorrection; 4] = [
        ErrorCorrection::Low,
        ErrorCorrection::Medium,
        ErrorCorrection::Quartile,
        ErrorCorrection::High,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ErrorCorrection::Low => "LOW",
            ErrorCorrection::Medium => "MEDIUM",
            ErrorCorrection::Quartile => "QUARTILE",
            ErrorCorrection::High => "HIGH",
        }
    }

    /// Share of the symbol that can be recovered, in percent.
    pub fn recovery(self) -> u8 {
        match self {
            ErrorCorrection::Low => 7,
            ErrorCorrection::Medium => 15,
            ErrorCorrection::Quartile => 25,
            ErrorCorrection::High => 30,
        }
    }

    pub fn label(self) -> String {
        let name = self.name();
        format!("{}{} ({}%)", &name[..1], name[1..].to_lowercase(), self.recovery())
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ErrorCorrection> for ::qrcode::EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => ::qrcode::EcLevel::L,
            ErrorCorrection::Medium => ::qrcode::EcLevel::M,
            ErrorCorrection::Quartile => ::qrcode::EcLevel::Q,
            ErrorCorrection::High => ::qrcode::EcLevel::H,
        }
    }
}

/// Requested symbol version. A fixed version is the smallest one the encoder
/// starts from, it still grows when the payload does not fit.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum VersionHint {
    Auto,
    Fixed(u8),
}

impl VersionHint {
    pub fn start(self) -> u8 {
        match self {
            VersionHint::Auto => MIN_VERSION,
            VersionHint::Fixed(v) => v,
        }
    }
}

impl fmt::Display for VersionHint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VersionHint::Auto => f.write_str("auto"),
            VersionHint::Fixed(v) => write!(f, "{}", v),
        }
    }
}

impl Serialize for VersionHint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("lime", Color::rgb(0, 255, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("navy", Color::rgb(0, 0, 128)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("orange", Color::rgb(255, 165, 0)),
    ("purple", Color::rgb(128, 0, 128)),
    ("maroon", Color::rgb(128, 0, 0)),
    ("teal", Color::rgb(0, 128, 128)),
    ("gray", Color::rgb(128, 128, 128)),
    ("grey", Color::rgb(128, 128, 128)),
    ("silver", Color::rgb(192, 192, 192)),
];

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn from_hex(hex: &str) -> Option<Color> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
                Some(Color::rgb(digit(0)?, digit(1)?, digit(2)?))
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => None,
        }
    }

    fn from_function(args: &str) -> Option<Color> {
        let parts = args
            .split(',')
            .map(|p| p.trim().parse::<u8>().ok())
            .collect::<Option<Vec<u8>>>()?;
        match parts.as_slice() {
            [r, g, b] => Some(Color::rgb(*r, *g, *b)),
            _ => None,
        }
    }
}

/// Accepts `#rgb`, `#rrggbb`, `rgb(r, g, b)` and a few CSS color names.
impl FromStr for Color {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();
        let parsed = if lower.starts_with('#') {
            Color::from_hex(&lower[1..])
        } else if lower.starts_with("rgb(") && lower.ends_with(')') {
            Color::from_function(&lower[4..lower.len() - 1])
        } else {
            NAMED_COLORS
                .iter()
                .find(|(name, _)| *name == lower)
                .map(|(_, color)| *color)
        };
        parsed.ok_or_else(|| Error::Render(format!("malformed color {:?}", value)))
    }
}

/// Form values exactly as the browser (or a JSON client) sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfiguration {
    pub text: String,
    pub foreground: String,
    pub background: String,
    pub version: String,
    pub error_correction: String,
    pub box_size: String,
    pub border: String,
}

impl Default for RawConfiguration {
    fn default() -> Self {
        RawConfiguration {
            text: s!(DEFAULT_TEXT),
            foreground: s!(DEFAULT_FOREGROUND),
            background: s!(DEFAULT_BACKGROUND),
            version: s!(MIN_VERSION),
            error_correction: s!(ErrorCorrection::High),
            box_size: s!(DEFAULT_BOX_SIZE),
            border: s!(DEFAULT_BORDER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    pub text: String,
    pub foreground: String,
    pub background: String,
    pub version: VersionHint,
    pub error_correction: ErrorCorrection,
    pub box_size: u32,
    pub border: u32,
}

fn parse_integer(field: &'static str, value: &str) -> Result<i64, Error> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::validation(field, format!("{:?} is not an integer", value)))
}

fn parse_version(value: &str) -> Result<VersionHint, Error> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("auto") {
        return Ok(VersionHint::Auto);
    }
    let version = parse_integer("version", value)?;
    if version < MIN_VERSION as i64 || version > MAX_VERSION as i64 {
        return Err(Error::validation(
            "version",
            format!(
                "must be between {} and {}, got {}",
                MIN_VERSION, MAX_VERSION, version
            ),
        ));
    }
    Ok(VersionHint::Fixed(version as u8))
}

fn parse_error_correction(value: &str) -> Result<ErrorCorrection, Error> {
    value
        .trim()
        .to_ascii_uppercase()
        .parse::<ErrorCorrection>()
        .map_err(|_| {
            Error::validation(
                "error_correction",
                format!("{:?} is not one of LOW, MEDIUM, QUARTILE, HIGH", value),
            )
        })
}

fn parse_bounded(field: &'static str, value: &str, min: i64) -> Result<u32, Error> {
    let n = parse_integer(field, value)?;
    if n < min {
        return Err(Error::validation(
            field,
            format!("must be at least {}, got {}", min, n),
        ));
    }
    if n > u32::max_value() as i64 {
        return Err(Error::validation(field, format!("{} is too large", n)));
    }
    Ok(n as u32)
}

impl RawConfiguration {
    /// Coerces the stringly form values into a `Configuration`.
    /// Colors are kept as given, the renderer owns their parsing.
    pub fn validate(&self) -> Result<Configuration, Error> {
        Ok(Configuration {
            text: self.text.clone(),
            foreground: self.foreground.clone(),
            background: self.background.clone(),
            version: parse_version(&self.version)?,
            error_correction: parse_error_correction(&self.error_correction)?,
            box_size: parse_bounded("box_size", &self.box_size, 1)?,
            border: parse_bounded("border", &self.border, 0)?,
        })
    }
}
