// Domain rules - Validation and the trim/crop/scale/speed pipeline

use std::path::Path;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Checks that need nothing but the request itself
pub struct RequestValidator;

impl RequestValidator {
    /// Validate a request before any file is touched
    pub fn validate(request: &TransformRequest) -> Result<(), DomainError> {
        if request.start.seconds < 0.0 {
            return Err(DomainError::validation("start cannot be negative"));
        }
        if request.start.seconds >= request.end.seconds {
            return Err(DomainError::validation(format!(
                "start must precede end (start {}, end {})",
                request.start, request.end
            )));
        }
        if !request.speed.is_finite() || request.speed <= 0.0 {
            return Err(DomainError::validation(format!(
                "speed factor must be positive, got {}",
                request.speed
            )));
        }
        if request.fps == 0 || request.fps > MAX_FPS {
            return Err(DomainError::validation(format!(
                "frame rate must be between 1 and {}, got {}",
                MAX_FPS, request.fps
            )));
        }
        match request.scale {
            ScalePolicy::Factor(factor) if !factor.is_finite() || factor <= 0.0 || factor > 1.0 => {
                Err(DomainError::validation(format!(
                    "scale factor must be in (0, 1], got {}",
                    factor
                )))
            }
            ScalePolicy::Width(0) => Err(DomainError::validation("output width must be positive")),
            _ => Ok(()),
        }
    }

    /// Reject input files whose extension is not an accepted container
    pub fn validate_container(path: &Path) -> Result<String, DomainError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "cannot determine container of '{}'; expected one of {}",
                    path.display(),
                    SUPPORTED_CONTAINERS.join(", ")
                ))
            })?;

        if !is_supported_container(&extension) {
            return Err(DomainError::validation(format!(
                "unsupported container '{}'; expected one of {}",
                extension,
                SUPPORTED_CONTAINERS.join(", ")
            )));
        }

        Ok(extension)
    }
}

/// Turns a request and a probed source into an engine plan
///
/// Steps run in a fixed order: trim, crop, scale, speed. Each narrows the
/// frame the next one works on.
pub struct TransformPlanner;

impl TransformPlanner {
    pub fn plan(
        source: &SourceMedia,
        request: &TransformRequest,
    ) -> Result<TransformPlan, DomainError> {
        RequestValidator::validate(request)?;

        let (start, end) = Self::trim(source, request)?;
        let crop = Self::crop(source, request)?;
        let output = Self::scale(&crop, request)?;
        let speed = request.speed;

        Ok(TransformPlan {
            source: source.path.clone(),
            source_dimensions: source.dimensions,
            start,
            end,
            crop,
            output,
            speed,
            fps: request.fps,
            loop_forever: true,
        })
    }

    fn trim(
        source: &SourceMedia,
        request: &TransformRequest,
    ) -> Result<(TimeSpec, TimeSpec), DomainError> {
        if request.start.seconds >= request.end.seconds {
            return Err(DomainError::validation("start must precede end"));
        }
        if request.end.seconds > source.duration.seconds {
            return Err(DomainError::validation(format!(
                "end ({}) exceeds source duration ({})",
                request.end, source.duration
            )));
        }
        Ok((request.start, request.end))
    }

    fn crop(source: &SourceMedia, request: &TransformRequest) -> Result<CropRect, DomainError> {
        let height = source.dimensions.height;
        let remaining = request.crop.remaining_height(height).ok_or_else(|| {
            DomainError::validation(format!(
                "nothing would remain: cropping {} + {} rows from a {}px frame",
                request.crop.top, request.crop.bottom, height
            ))
        })?;

        Ok(CropRect {
            width: source.dimensions.width,
            height: remaining,
            x: 0,
            y: request.crop.top,
        })
    }

    fn scale(crop: &CropRect, request: &TransformRequest) -> Result<Dimensions, DomainError> {
        if let ScalePolicy::Width(width) = request.scale {
            if width > crop.width {
                return Err(DomainError::validation(format!(
                    "output width {} exceeds source width {}",
                    width, crop.width
                )));
            }
        }
        Ok(request.scale.apply(Dimensions::new(crop.width, crop.height)))
    }
}
