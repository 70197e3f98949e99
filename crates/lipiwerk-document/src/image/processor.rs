// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — prepares scanned pages for OCR. Operates on in-memory
// images using the `image` and `imageproc` crates.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use lipiwerk_core::error::LipiwerkError;
use tracing::{debug, instrument};

/// OCR preparation pipeline operating on a single in-memory image.
///
/// Each method consumes `self` and returns a new `ImageProcessor`, so steps
/// chain:
///
/// ```ignore
/// let prepared = ImageProcessor::from_bytes(&upload)?
///     .grayscale()
///     .limit_dimension(4096)
///     .binarize_otsu()
///     .into_dynamic();
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from raw encoded bytes (JPEG, PNG, TIFF, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, LipiwerkError> {
        let img = image::load_from_memory(data).map_err(|err| {
            LipiwerkError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Convert the image to grayscale (luma).
    pub fn grayscale(self) -> Self {
        Self {
            image: self.image.grayscale(),
        }
    }

    /// Downscale so the longest side is at most `max_side`, preserving aspect
    /// ratio. Images already within the bound are returned untouched; zero
    /// disables the bound.
    #[instrument(skip(self), fields(max_side))]
    pub fn limit_dimension(self, max_side: u32) -> Self {
        let (width, height) = (self.image.width(), self.image.height());
        if max_side == 0 || width.max(height) <= max_side {
            return self;
        }
        let resized = self
            .image
            .resize(max_side, max_side, image::imageops::FilterType::Lanczos3);
        debug!(
            from_w = width,
            from_h = height,
            new_w = resized.width(),
            new_h = resized.height(),
            "Image downscaled for OCR"
        );
        Self { image: resized }
    }

    /// Global black-and-white thresholding at the Otsu level of the luma
    /// histogram. Pixels above the level become white.
    #[instrument(skip(self))]
    pub fn binarize_otsu(self) -> Self {
        let gray = self.image.to_luma8();
        let threshold = otsu_level(&gray);
        debug!(threshold, "Otsu threshold computed");

        let (width, height) = gray.dimensions();
        let output = GrayImage::from_fn(width, height, |x, y| {
            let val = gray.get_pixel(x, y).0[0];
            // The Otsu level itself belongs to the dark class.
            Luma([if val > threshold { 255u8 } else { 0u8 }])
        });

        Self {
            image: DynamicImage::ImageLuma8(output),
        }
    }
}
