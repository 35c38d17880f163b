use crate::errors::Error;
use crate::models::{Color, Configuration, VersionHint};
use crate::qrcode::{self, EncodeRequest, Symbol};
use bytes::Bytes;
use chrono::{NaiveDateTime, Utc};
use image::png::PNGEncoder;
use image::{ImageBuffer, Pixel, Rgb, RgbImage};
use serde::Serialize;

/// Fits a version 40 symbol at box size 20 with a border of 10 (3940 px).
pub const DEFAULT_MAX_IMAGE_EDGE: u32 = 4096;

#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Largest width/height in pixels the renderer will allocate.
    pub max_image_edge: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_image_edge: DEFAULT_MAX_IMAGE_EDGE,
        }
    }
}

/// One generated QR image. Immutable once built; a newer generation
/// replaces the whole value.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub generation: u64,
    pub config: Configuration,
    pub version: u8,
    pub module_count: u32,
    pub width: u32,
    pub height: u32,
    pub png: Bytes,
    pub generated_at: NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct ArtifactInfo {
    pub generation: u64,
    pub requested_version: VersionHint,
    pub version: u8,
    pub version_expanded: bool,
    pub error_correction: String,
    pub module_count: u32,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
    pub generated_at: NaiveDateTime,
}

impl Artifact {
    /// The encoder picked a bigger version than the one asked for.
    pub fn version_expanded(&self) -> bool {
        match self.config.version {
            VersionHint::Fixed(v) => self.version > v,
            VersionHint::Auto => false,
        }
    }

    pub fn info(&self) -> ArtifactInfo {
        ArtifactInfo {
            generation: self.generation,
            requested_version: self.config.version,
            version: self.version,
            version_expanded: self.version_expanded(),
            error_correction: s!(self.config.error_correction),
            module_count: self.module_count,
            width: self.width,
            height: self.height,
            bytes: self.png.len(),
            generated_at: self.generated_at,
        }
    }
}

fn image_edge(module_count: u32, config: &Configuration) -> Option<u32> {
    config
        .border
        .checked_mul(2)
        .and_then(|b| b.checked_add(module_count))
        .and_then(|modules| modules.checked_mul(config.box_size))
}

/// `edge` is the pixel size already checked by `image_edge`.
fn render(
    symbol: &Symbol,
    edge: u32,
    foreground: Color,
    background: Color,
    box_size: u32,
    border: u32,
) -> RgbImage {
    let width = symbol.width as u32;
    let dark = Rgb([foreground.r, foreground.g, foreground.b]);
    let light = Rgb([background.r, background.g, background.b]);
    ImageBuffer::from_fn(edge, edge, |x, y| {
        let (mx, my) = (x / box_size, y / box_size);
        let inside = mx >= border && my >= border && mx < border + width && my < border + width;
        if inside && symbol.is_dark((mx - border) as usize, (my - border) as usize) {
            dark
        } else {
            light
        }
    })
}

pub fn to_png(img: &RgbImage) -> Result<Bytes, Error> {
    let mut buf: Vec<u8> = Vec::new();
    PNGEncoder::new(&mut buf)
        .encode(img, img.width(), img.height(), Rgb::<u8>::color_type())
        .map_err(|e| Error::Render(format!("Cannot write PNG file: {}", e)))?;
    Ok(Bytes::from(buf))
}

/// Runs one generation: colors, encoding with fit, rendering, PNG.
/// Nothing is shared between calls, the same configuration always gives
/// the same bytes.
pub fn generate(config: &Configuration, generation: u64, limits: Limits) -> Result<Artifact, Error> {
    let foreground: Color = config.foreground.parse()?;
    let background: Color = config.background.parse()?;

    let symbol = qrcode::encode(&EncodeRequest {
        payload: &config.text,
        version: config.version,
        error_correction: config.error_correction,
        fit: true,
    })?;

    let module_count = symbol.width as u32;
    let edge = match image_edge(module_count, config) {
        Some(edge) if edge <= limits.max_image_edge => edge,
        Some(edge) => {
            return Err(Error::Render(format!(
                "image would be {}px wide, the limit is {}px",
                edge, limits.max_image_edge
            )))
        }
        None => return Err(Error::Render(s!("image size overflows"))),
    };

    let img = render(
        &symbol,
        edge,
        foreground,
        background,
        config.box_size,
        config.border,
    );
    let png = to_png(&img)?;

    Ok(Artifact {
        generation,
        config: config.clone(),
        version: symbol.version,
        module_count,
        width: edge,
        height: edge,
        png,
        generated_at: Utc::now().naive_utc(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ErrorCorrection, RawConfiguration};

    fn config(text: &str) -> Configuration {
        RawConfiguration {
            text: s!(text),
            version: s!("auto"),
            ..RawConfiguration::default()
        }
        .validate()
        .unwrap()
    }

    fn decode(png: &[u8]) -> (u32, u32, String) {
        let img = image::load_from_memory(png).unwrap().to_luma();
        let (w, h) = img.dimensions();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            w as usize,
            h as usize,
            |x, y| img.get_pixel(x as u32, y as u32).channels()[0],
        );
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1);
        let (_, content) = grids[0].decode().unwrap();
        (w, h, content)
    }

    #[test]
    fn test_example_url_round_trip() {
        let c = config("https://example.com");
        assert_eq!(c.error_correction, ErrorCorrection::High);
        let artifact = generate(&c, 1, Limits::default()).unwrap();
        let edge = (artifact.module_count + 8) * 10;
        assert_eq!(artifact.module_count, 17 + 4 * artifact.version as u32);
        assert_eq!((artifact.width, artifact.height), (edge, edge));

        let (w, h, content) = decode(&artifact.png);
        assert_eq!((w, h), (edge, edge));
        assert_eq!(content, "https://example.com");
    }

    #[test]
    fn test_same_config_same_bytes() {
        let c = config("idempotent");
        let first = generate(&c, 1, Limits::default()).unwrap();
        let second = generate(&c, 2, Limits::default()).unwrap();
        assert_eq!(first.png, second.png);
    }

    #[test]
    fn test_dimensions_follow_box_and_border() {
        let mut c = config("dimensions");
        c.box_size = 3;
        c.border = 0;
        let artifact = generate(&c, 1, Limits::default()).unwrap();
        assert_eq!(artifact.width, artifact.module_count * 3);

        c.box_size = 1;
        c.border = 7;
        let artifact = generate(&c, 1, Limits::default()).unwrap();
        assert_eq!(artifact.width, artifact.module_count + 14);
        let img = image::load_from_memory(&artifact.png).unwrap().to_rgb();
        assert_eq!(img.dimensions(), (artifact.width, artifact.height));
    }

    #[test]
    fn test_colors_are_applied() {
        let mut c = config("colors");
        c.foreground = s!("#ff0000");
        c.background = s!("rgb(0, 0, 255)");
        c.box_size = 2;
        let artifact = generate(&c, 1, Limits::default()).unwrap();
        let img = image::load_from_memory(&artifact.png).unwrap().to_rgb();
        // quiet zone corner, then the top-left finder pattern
        assert_eq!(img.get_pixel(0, 0).channels(), &[0, 0, 255]);
        let finder = c.border * c.box_size;
        assert_eq!(img.get_pixel(finder, finder).channels(), &[255, 0, 0]);
    }

    #[test]
    fn test_equal_colors_are_allowed() {
        let mut c = config("invisible");
        c.foreground = s!("#ffffff");
        c.background = s!("white");
        let artifact = generate(&c, 1, Limits::default()).unwrap();
        let img = image::load_from_memory(&artifact.png).unwrap().to_rgb();
        assert!(img.pixels().all(|p| p.channels() == &[255, 255, 255]));
    }

    #[test]
    fn test_bad_color_is_render_error() {
        let mut c = config("bad color");
        c.background = s!("#12");
        match generate(&c, 1, Limits::default()) {
            Err(Error::Render(msg)) => assert!(msg.contains("#12")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_text_gives_minimal_symbol() {
        let artifact = generate(&config(""), 1, Limits::default()).unwrap();
        assert_eq!(artifact.version, 1);
        assert_eq!(artifact.module_count, 21);
        assert_eq!(artifact.width, (21 + 8) * 10);
    }

    #[test]
    fn test_too_long_text_overflows() {
        let c = config(&"x".repeat(3000));
        match generate(&c, 1, Limits::default()) {
            Err(Error::EncodingOverflow { len, level }) => {
                assert_eq!(len, 3000);
                assert_eq!(level, ErrorCorrection::High);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_version_expansion_is_reported() {
        let mut c = config(&"y".repeat(100));
        c.version = VersionHint::Fixed(2);
        let artifact = generate(&c, 1, Limits::default()).unwrap();
        assert!(artifact.version > 2);
        assert!(artifact.version_expanded());
        assert!(artifact.info().version_expanded);

        c.version = VersionHint::Fixed(20);
        let artifact = generate(&c, 1, Limits::default()).unwrap();
        assert_eq!(artifact.version, 20);
        assert!(!artifact.version_expanded());
    }

    #[test]
    fn test_largest_form_input_fits_default_limit() {
        let mut c = config("");
        c.box_size = 20;
        c.border = 10;
        let edge = image_edge(177, &c).unwrap();
        assert_eq!(edge, 3940);
        assert!(edge <= DEFAULT_MAX_IMAGE_EDGE);

        c.box_size = u32::max_value();
        assert_eq!(image_edge(177, &c), None);
    }

    #[test]
    fn test_edge_limit() {
        let mut c = config("big");
        c.box_size = 1000;
        let limits = Limits {
            max_image_edge: 2000,
        };
        assert!(match generate(&c, 1, limits) {
            Err(Error::Render(_)) => true,
            _ => false,
        });
    }
}
