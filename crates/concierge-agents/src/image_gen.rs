//! Text-to-image prompting with an optional model and an offline fallback.
//!
//! With an [`ImageModel`] attached, `generate` asks it for a picture under the
//! collaborator timeout, always passing [`SAFE_NEGATIVE`]. Without one, or
//! when the call fails, a simple scene keyed on the prompt's subject is
//! rasterized instead so paths and replies look the same either way.
//!
//! The placeholder carries no caption text: nothing in the dependency set
//! rasterizes fonts, so the bottom band is left as plain background.

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use twox_hash::XxHash64;

use concierge_core::error::CollaboratorError;
use concierge_core::traits::ImageModel;

/// Negative prompt sent with every model request.
pub const SAFE_NEGATIVE: &str = "nsfw, nudity, gore, violence, low quality, blurry, watermark";

const BACKGROUND: Rgb<u8> = Rgb([240, 248, 255]);
const BORDER: Rgb<u8> = Rgb([100, 100, 100]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const ORANGE: Rgb<u8> = Rgb([255, 165, 0]);
const BROWN: Rgb<u8> = Rgb([139, 69, 19]);
const GOLD: Rgb<u8> = Rgb([255, 215, 0]);
const GRAY: Rgb<u8> = Rgb([200, 200, 200]);

pub struct ImageGenerator {
    out_dir: PathBuf,
    width: u32,
    height: u32,
    model: Option<Arc<dyn ImageModel>>,
    timeout: Duration,
}

impl ImageGenerator {
    pub fn new(out_dir: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            out_dir: out_dir.into(),
            width: width.max(64),
            height: height.max(64),
            model: None,
            timeout: Duration::from_secs(20),
        }
    }

    /// Route generation through `model`, bounding each call by `timeout`.
    #[must_use]
    pub fn with_model(mut self, model: Arc<dyn ImageModel>, timeout: Duration) -> Self {
        self.model = Some(model);
        self.timeout = timeout;
        self
    }

    /// Fill the prompt template with the default style knobs.
    pub fn build_prompt(&self, subject: &str) -> String {
        self.build_prompt_with(subject, "cinematic", "soft studio", "rule of thirds", "50mm")
    }

    pub fn build_prompt_with(&self, subject: &str, style: &str, lighting: &str, composition: &str, lens: &str) -> String {
        format!(
            "High-quality, detailed image of {subject}. Style: {style}. Lighting: {lighting}. \
             Composition: {composition}. Lens: {lens}. Include one clear focal point."
        )
    }

    /// Produce a PNG for `prompt` under the output directory and return its path.
    pub async fn generate(&self, prompt: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("creating image dir {}", self.out_dir.display()))?;
        let path = self.out_dir.join(file_name(prompt));

        if let Some(model) = &self.model {
            match self.request(model.as_ref(), prompt, &path).await {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "generated image");
                    return Ok(path);
                }
                Err(e) => tracing::warn!(error = %e, "image model failed; drawing placeholder"),
            }
        }

        let img = self.render(prompt);
        img.save(&path).with_context(|| format!("writing image {}", path.display()))?;
        tracing::info!(path = %path.display(), "generated placeholder image");
        Ok(path)
    }

    /// Ask the model for an image and re-encode whatever it returns as PNG.
    async fn request(&self, model: &dyn ImageModel, prompt: &str, path: &Path) -> std::result::Result<(), CollaboratorError> {
        let call = model.generate(prompt, SAFE_NEGATIVE, self.width, self.height);
        let bytes = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| CollaboratorError::Timeout(self.timeout))??;
        let img = image::load_from_memory(&bytes)
            .map_err(|e| CollaboratorError::Malformed(format!("undecodable image: {e}")))?;
        img.save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| CollaboratorError::Unavailable(format!("writing {}: {e}", path.display())))
    }

    fn render(&self, prompt: &str) -> RgbImage {
        let mut img = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        outline(&mut img, 10, 3, BORDER);

        let cx = i64::from(self.width / 2);
        let cy = i64::from(self.height / 2);
        let lower = prompt.to_lowercase();
        if lower.contains("cat") {
            ellipse(&mut img, (cx - 60, cy - 40, cx + 60, cy + 40), ORANGE);
            ellipse(&mut img, (cx - 50, cy - 50, cx - 20, cy - 20), ORANGE);
            ellipse(&mut img, (cx + 20, cy - 50, cx + 50, cy - 20), ORANGE);
            ellipse(&mut img, (cx - 15, cy - 15, cx - 5, cy - 5), BLACK);
            ellipse(&mut img, (cx + 5, cy - 15, cx + 15, cy - 5), BLACK);
            triangle(&mut img, [(cx - 5, cy + 5), (cx, cy + 15), (cx + 5, cy + 5)], BLACK);
            for dy in [0, 5] {
                hline(&mut img, cx - 60, cx - 30, cy + dy, 2, BLACK);
                hline(&mut img, cx + 30, cx + 60, cy + dy, 2, BLACK);
            }
        } else if lower.contains("dog") {
            ellipse(&mut img, (cx - 50, cy - 30, cx + 50, cy + 30), BROWN);
            ellipse(&mut img, (cx - 40, cy - 45, cx - 15, cy - 20), BROWN);
            ellipse(&mut img, (cx + 15, cy - 45, cx + 40, cy - 20), BROWN);
            ellipse(&mut img, (cx - 15, cy - 10, cx - 5, cy), BLACK);
            ellipse(&mut img, (cx + 5, cy - 10, cx + 15, cy), BLACK);
            ellipse(&mut img, (cx - 5, cy + 5, cx + 5, cy + 10), BLACK);
        } else if lower.contains("sun") {
            ellipse(&mut img, (cx - 100, cy - 80, cx + 100, cy + 80), ORANGE);
            ellipse(&mut img, (cx - 80, cy - 60, cx + 80, cy + 60), GOLD);
        } else {
            ellipse(&mut img, (cx - 80, cy - 60, cx + 80, cy + 60), GRAY);
        }
        img
    }
}

/// `image_<unix-ts>_<hash>.png`; the hash keeps same-second prompts apart.
fn file_name(prompt: &str) -> String {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(prompt.as_bytes());
    format!("image_{}_{:08x}.png", chrono::Utc::now().timestamp(), hasher.finish() as u32)
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
        if x < img.width() && y < img.height() {
            img.put_pixel(x, y, color);
        }
    }
}

/// Rectangle outline `inset` pixels from the edges, `thickness` wide.
fn outline(img: &mut RgbImage, inset: u32, thickness: u32, color: Rgb<u8>) {
    let (w, h) = (img.width(), img.height());
    for y in inset..h.saturating_sub(inset) {
        for x in inset..w.saturating_sub(inset) {
            let edge = x < inset + thickness
                || y < inset + thickness
                || x + inset + thickness >= w
                || y + inset + thickness >= h;
            if edge {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// Filled ellipse inscribed in the bounding box `(x0, y0, x1, y1)`.
fn ellipse(img: &mut RgbImage, (x0, y0, x1, y1): (i64, i64, i64, i64), color: Rgb<u8>) {
    let (rx, ry) = ((x1 - x0) as f64 / 2.0, (y1 - y0) as f64 / 2.0);
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let (cx, cy) = (x0 as f64 + rx, y0 as f64 + ry);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = (x as f64 - cx) / rx;
            let dy = (y as f64 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                put(img, x, y, color);
            }
        }
    }
}

fn triangle(img: &mut RgbImage, pts: [(i64, i64); 3], color: Rgb<u8>) {
    let min_x = pts.iter().map(|p| p.0).min().unwrap_or(0);
    let max_x = pts.iter().map(|p| p.0).max().unwrap_or(0);
    let min_y = pts.iter().map(|p| p.1).min().unwrap_or(0);
    let max_y = pts.iter().map(|p| p.1).max().unwrap_or(0);
    let side = |a: (i64, i64), b: (i64, i64), p: (i64, i64)| (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = (x, y);
            let d = [side(pts[0], pts[1], p), side(pts[1], pts[2], p), side(pts[2], pts[0], p)];
            let all_neg = d.iter().all(|v| *v <= 0);
            let all_pos = d.iter().all(|v| *v >= 0);
            if all_neg || all_pos {
                put(img, x, y, color);
            }
        }
    }
}

fn hline(img: &mut RgbImage, x0: i64, x1: i64, y: i64, width: i64, color: Rgb<u8>) {
    for dy in 0..width {
        for x in x0..=x1 {
            put(img, x, y + dy, color);
        }
    }
}
