use std::path::Path;

use image::{GrayImage, ImageReader};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};

use crate::config::{LoadConfig, ThresholdMethod};
use crate::error::VectorizeError;
use crate::skeleton::Skeleton;

/// Load an image file and binarize it into a skeleton.
///
/// The image is taken to be thin already; no thinning is applied.
pub fn load(path: &Path, config: &LoadConfig) -> Result<Skeleton, VectorizeError> {
    let img = ImageReader::open(path)
        .map_err(|e| VectorizeError::ImageLoad(e.to_string()))?
        .decode()
        .map_err(|e| VectorizeError::ImageLoad(e.to_string()))?
        .into_luma8();
    Ok(binarize(&img, config))
}

/// Threshold a grayscale image. Bright pixels are foreground unless
/// `config.invert` is set.
pub fn binarize(img: &GrayImage, config: &LoadConfig) -> Skeleton {
    let level = match config.threshold {
        ThresholdMethod::Fixed(t) => t,
        ThresholdMethod::Otsu => {
            let t = otsu_level(img);
            tracing::info!("Threshold   Otsu = {}", t);
            t
        }
    };

    let kind = if config.invert {
        ThresholdType::BinaryInverted
    } else {
        ThresholdType::Binary
    };
    Skeleton::from_gray(&threshold(img, level, kind))
}
