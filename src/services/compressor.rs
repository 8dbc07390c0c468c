// ============================================================================
// IMAGE COMPRESSOR
// ============================================================================
// Re-encodes a user-selected image to fit under a byte ceiling without
// exceeding maximum pixel dimensions, preserving aspect ratio.
//
// The quality search itself is pure: a bounded walk over a fixed descending
// ladder, calling an injected encode(quality) function. The canvas pipeline
// is only the thin shell that supplies that encoder in the browser.
// ============================================================================

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, File, FilePropertyBag, HtmlCanvasElement, HtmlImageElement, Url,
};

use crate::dom::document;

/// Maximum output width and height in pixels.
pub const MAX_DIMENSION: u32 = 1200;

/// Default byte-size ceiling for compressed uploads.
pub const DEFAULT_CEILING_KB: f64 = 500.0;

/// Fixed descending quality sequence. The first encoding at or under the
/// ceiling wins; the 0.1-floor result is accepted even when over the ceiling
/// rather than looping indefinitely.
pub const QUALITY_LADDER: [f64; 8] = [0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1];

#[derive(Debug, thiserror::Error)]
pub enum CompressError {
    /// The source blob could not be decoded as an image.
    #[error("Failed to load image")]
    Decode,
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("Browser API unavailable: {0}")]
    Dom(String),
}

impl CompressError {
    fn dom(value: JsValue) -> Self {
        CompressError::Dom(format!("{:?}", value))
    }

    fn encode(value: JsValue) -> Self {
        CompressError::Encode(format!("{:?}", value))
    }
}

/// Output of a successful compression. The original blob is not retained.
pub struct CompressedUpload {
    /// Re-encoded file, carrying the source name and MIME type.
    pub file: File,
    pub original_kb: f64,
    pub compressed_kb: f64,
    /// Quality factor the search settled on (0.1 ..= 0.8).
    pub quality: f64,
    /// `(1 - compressed/original) * 100`. Negative when re-encoding enlarged
    /// an already-optimized file; accepted, not corrected.
    pub ratio: f64,
}

/// Scale (width, height) down so both fit inside the maxima, preserving
/// aspect ratio. Dimensions already within bounds are returned unchanged;
/// this function never upscales.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    if scale >= 1.0 {
        return (width, height);
    }
    let out_w = (width as f64 * scale).round().max(1.0) as u32;
    let out_h = (height as f64 * scale).round().max(1.0) as u32;
    (out_w, out_h)
}

/// Walk the quality ladder until `encode` produces a result at or under
/// `ceiling_bytes`, or the ladder is exhausted. Returns the winning bytes and
/// the quality that produced them. At most `QUALITY_LADDER.len()` encodes.
pub fn search_quality<E>(ceiling_bytes: usize, mut encode: E) -> Result<(Vec<u8>, f64), CompressError>
where
    E: FnMut(f64) -> Result<Vec<u8>, CompressError>,
{
    let last = QUALITY_LADDER.len() - 1;
    for (i, &quality) in QUALITY_LADDER.iter().enumerate() {
        let bytes = encode(quality)?;
        if bytes.len() <= ceiling_bytes || i == last {
            return Ok((bytes, quality));
        }
    }
    unreachable!("quality ladder is never empty")
}

/// `(1 - compressed/original) * 100`, in percent.
pub fn compression_ratio(original_bytes: f64, compressed_bytes: f64) -> f64 {
    (1.0 - compressed_bytes / original_bytes) * 100.0
}

/// Extract the raw bytes of a base64 data URL produced by canvas encoding.
pub fn data_url_bytes(data_url: &str) -> Result<Vec<u8>, CompressError> {
    let body = data_url
        .split_once(',')
        .ok_or_else(|| CompressError::Encode("malformed data URL".to_string()))?
        .1;
    STANDARD
        .decode(body)
        .map_err(|e| CompressError::Encode(e.to_string()))
}

/// Compress `file` to at most `max_size_kb` KB, bounded to
/// [`MAX_DIMENSION`]×[`MAX_DIMENSION`] pixels.
///
/// Run the validation gate (`utils::files::validate_upload`) first: this
/// function assumes the MIME type is already allow-listed.
pub async fn compress_image(file: &File, max_size_kb: f64) -> Result<CompressedUpload, CompressError> {
    let mime = file.type_();
    let original_bytes = file.size();

    let image = load_image(file).await?;
    let (width, height) = fit_within(
        image.natural_width(),
        image.natural_height(),
        MAX_DIMENSION,
        MAX_DIMENSION,
    );

    let canvas = draw_to_canvas(&image, width, height)?;

    let ceiling_bytes = (max_size_kb * 1024.0) as usize;
    let (bytes, quality) = search_quality(ceiling_bytes, |quality| {
        let data_url = canvas
            .to_data_url_with_type_and_encoder_options(&mime, &JsValue::from_f64(quality))
            .map_err(CompressError::encode)?;
        data_url_bytes(&data_url)
    })?;

    let compressed_bytes = bytes.len() as f64;
    let output = bytes_to_file(&bytes, &file.name(), &mime)?;

    let result = CompressedUpload {
        file: output,
        original_kb: original_bytes / 1024.0,
        compressed_kb: compressed_bytes / 1024.0,
        quality,
        ratio: compression_ratio(original_bytes, compressed_bytes),
    };
    log::info!(
        "🗜️ [COMPRESS] {:.1} KB -> {:.1} KB at quality {:.1} ({:.1}% saved)",
        result.original_kb,
        result.compressed_kb,
        result.quality,
        result.ratio
    );
    Ok(result)
}

/// Decode a blob into an image element via an object URL. Resolves once the
/// browser has the natural dimensions; a blob that is not a decodable image
/// rejects and surfaces as [`CompressError::Decode`].
async fn load_image(file: &File) -> Result<HtmlImageElement, CompressError> {
    let url = Url::create_object_url_with_blob(file).map_err(CompressError::dom)?;
    let image = HtmlImageElement::new().map_err(CompressError::dom)?;

    let loaded = js_sys::Promise::new(&mut |resolve, reject| {
        image.set_onload(Some(&resolve));
        image.set_onerror(Some(&reject));
    });
    image.set_src(&url);

    let result = JsFuture::from(loaded).await;
    let _ = Url::revoke_object_url(&url);

    match result {
        Ok(_) => Ok(image),
        Err(_) => Err(CompressError::Decode),
    }
}

fn draw_to_canvas(
    image: &HtmlImageElement,
    width: u32,
    height: u32,
) -> Result<HtmlCanvasElement, CompressError> {
    let canvas: HtmlCanvasElement = document()
        .ok_or_else(|| CompressError::Dom("no document".to_string()))?
        .create_element("canvas")
        .map_err(CompressError::dom)?
        .dyn_into()
        .map_err(|_| CompressError::Dom("not a canvas element".to_string()))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(CompressError::dom)?
        .ok_or_else(|| CompressError::Dom("no 2d context".to_string()))?
        .dyn_into()
        .map_err(|_| CompressError::Dom("unexpected context type".to_string()))?;

    context
        .draw_image_with_html_image_element_and_dw_and_dh(
            image,
            0.0,
            0.0,
            width as f64,
            height as f64,
        )
        .map_err(CompressError::dom)?;

    Ok(canvas)
}

fn bytes_to_file(bytes: &[u8], name: &str, mime: &str) -> Result<File, CompressError> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&array);

    let options = FilePropertyBag::new();
    options.set_type(mime);

    File::new_with_u8_array_sequence_and_options(&parts, name, &options)
        .map_err(CompressError::dom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_bounds_is_untouched() {
        assert_eq!(fit_within(800, 600, 1200, 1200), (800, 600));
        assert_eq!(fit_within(1200, 1200, 1200, 1200), (1200, 1200));
    }

    #[test]
    fn landscape_clamps_width() {
        assert_eq!(fit_within(3000, 2000, 1200, 1200), (1200, 800));
    }

    #[test]
    fn portrait_clamps_height() {
        assert_eq!(fit_within(2000, 3000, 1200, 1200), (800, 1200));
    }

    #[test]
    fn square_clamps_both() {
        assert_eq!(fit_within(2400, 2400, 1200, 1200), (1200, 1200));
    }

    #[test]
    fn resize_never_upscales() {
        assert_eq!(fit_within(10, 10, 1200, 1200), (10, 10));
    }

    #[test]
    fn aspect_ratio_preserved_within_a_pixel() {
        for (w, h) in [(3001, 1999), (4032, 3024), (1999, 3001), (5000, 333)] {
            let (ow, oh) = fit_within(w, h, 1200, 1200);
            assert!(ow <= 1200 && oh <= 1200);
            let in_ratio = w as f64 / h as f64;
            // Deviation at the output scale must stay under one pixel.
            let expected_h = ow as f64 / in_ratio;
            assert!(
                (oh as f64 - expected_h).abs() <= 1.0,
                "{}x{} -> {}x{} drifts off ratio",
                w,
                h,
                ow,
                oh
            );
        }
    }

    #[test]
    fn first_fit_wins_at_starting_quality() {
        let mut calls = 0;
        let (bytes, quality) = search_quality(1000, |_q| {
            calls += 1;
            Ok(vec![0u8; 900])
        })
        .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(quality, 0.8);
        assert_eq!(bytes.len(), 900);
    }

    #[test]
    fn search_stops_at_first_quality_under_ceiling() {
        // Sizes shrink with quality; crossing point at 0.5.
        let (bytes, quality) =
            search_quality(500, |q| Ok(vec![0u8; (q * 1000.0) as usize])).unwrap();
        assert_eq!(quality, 0.5);
        assert_eq!(bytes.len(), 500);
    }

    #[test]
    fn floor_result_accepted_over_ceiling() {
        let mut calls = 0;
        let (bytes, quality) = search_quality(10, |_q| {
            calls += 1;
            Ok(vec![0u8; 5000])
        })
        .unwrap();
        assert_eq!(calls, QUALITY_LADDER.len());
        assert_eq!(quality, 0.1);
        assert!(bytes.len() > 10);
    }

    #[test]
    fn qualities_walk_strictly_downward_and_never_below_floor() {
        let mut seen = Vec::new();
        let _ = search_quality(0, |q| {
            seen.push(q);
            Ok(vec![0u8; 1])
        });
        // Ceiling 0 is unreachable, so every rung is visited exactly once.
        assert_eq!(seen, QUALITY_LADDER.to_vec());
        assert!(seen.windows(2).all(|w| w[1] < w[0]));
        assert!(seen.iter().all(|&q| (0.1..=0.8).contains(&q)));
    }

    #[test]
    fn encoder_errors_propagate() {
        let result = search_quality(1000, |_q| {
            Err::<Vec<u8>, _>(CompressError::Encode("boom".to_string()))
        });
        assert!(result.is_err());
    }

    #[test]
    fn recompressing_an_under_ceiling_result_stays_under_ceiling() {
        let encode = |q: f64| Ok(vec![0u8; (q * 600.0) as usize]);
        let (first, _) = search_quality(500, encode).unwrap();
        // Feeding a result already under the ceiling back through the search
        // can only keep or shrink it.
        let (second, _) = search_quality(500, |q| Ok(vec![0u8; first.len().min((q * 600.0) as usize)])).unwrap();
        assert!(second.len() <= first.len());
        assert!(second.len() <= 500);
    }

    #[test]
    fn ratio_is_percentage_saved() {
        let ratio = compression_ratio(2048.0 * 1024.0, 500.0 * 1024.0);
        assert!((ratio - 75.58).abs() < 0.1);
    }

    #[test]
    fn ratio_goes_negative_when_output_grows() {
        assert!(compression_ratio(100.0, 150.0) < 0.0);
    }

    #[test]
    fn data_url_bodies_decode() {
        let bytes = data_url_bytes("data:image/jpeg;base64,AAEC").unwrap();
        assert_eq!(bytes, vec![0, 1, 2]);
        assert!(data_url_bytes("no-comma-here").is_err());
    }
}
