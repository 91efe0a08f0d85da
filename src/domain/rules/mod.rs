// Domain rules - Business logic and policies

use std::cmp::Ordering;
use std::path::Path;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Rules for moving the start/end handles of a selection
pub struct BoundsPolicy;

impl BoundsPolicy {
    /// Clamp a requested position into `[0, duration]`
    pub fn clamp(requested: TimeSpec, duration: TimeSpec) -> TimeSpec {
        requested.min(duration)
    }

    /// Resolve a start move against the current end
    ///
    /// The clamped value must stay strictly before `end`; a move that would
    /// meet or cross it is rejected rather than swapped.
    pub fn resolve_start(
        requested: TimeSpec,
        end: TimeSpec,
        duration: TimeSpec,
    ) -> Result<TimeSpec, DomainError> {
        let start = Self::clamp(requested, duration);
        if start >= end {
            return Err(DomainError::InvalidTimeRange(format!(
                "start {} would not be before end {}",
                start, end
            )));
        }
        Ok(start)
    }

    /// Resolve an end move against the current start
    pub fn resolve_end(
        requested: TimeSpec,
        start: TimeSpec,
        duration: TimeSpec,
    ) -> Result<TimeSpec, DomainError> {
        let end = Self::clamp(requested, duration);
        if end <= start {
            return Err(DomainError::InvalidTimeRange(format!(
                "end {} would not be after start {}",
                end, start
            )));
        }
        Ok(end)
    }

    /// Apply a signed offset to a position without wrapping below zero
    pub fn offset(position: TimeSpec, delta_ms: i64) -> TimeSpec {
        let millis = if delta_ms.is_negative() {
            position.millis.saturating_sub(delta_ms.unsigned_abs())
        } else {
            position.millis.saturating_add(delta_ms as u64)
        };
        TimeSpec::from_millis(millis)
    }
}

/// Ordering of gallery entries under a sort spec
pub struct GalleryOrdering;

impl GalleryOrdering {
    /// Compare on the chosen field, then on path so the order is total
    pub fn compare(a: &GalleryEntry, b: &GalleryEntry, spec: SortSpec) -> Ordering {
        let primary = match spec.field {
            SortField::Name => a
                .display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
                .then_with(|| a.display_name.cmp(&b.display_name)),
            SortField::Size => a.size_bytes.cmp(&b.size_bytes),
            SortField::LastModified => a.last_modified.cmp(&b.last_modified),
        };
        let primary = match spec.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        primary.then_with(|| a.path.cmp(&b.path))
    }
}

/// Recognition of video files by extension
pub struct VideoExtensions;

impl VideoExtensions {
    pub const DEFAULT: &'static [&'static str] = &[
        "mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v", "3gp", "mpg", "mpeg",
    ];

    pub fn defaults() -> Vec<String> {
        Self::DEFAULT.iter().map(|ext| ext.to_string()).collect()
    }

    /// Case-insensitive extension match
    pub fn is_video(path: &Path, extensions: &[String]) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .map(|ext| extensions.iter().any(|known| known.eq_ignore_ascii_case(&ext)))
            .unwrap_or(false)
    }
}

/// Human-readable file sizes
pub struct SizeFormatter;

impl SizeFormatter {
    const UNITS: &'static [&'static str] = &["B", "KB", "MB", "GB", "TB"];

    pub fn format(size_bytes: u64) -> String {
        let mut size = size_bytes as f64;
        for unit in Self::UNITS {
            if size < 1024.0 {
                return format!("{:.1} {}", size, unit);
            }
            size /= 1024.0;
        }
        format!("{:.1} PB", size)
    }

    pub fn megabytes(size_bytes: u64) -> f64 {
        size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Sizing rules for re-encoding a trim under a size cap
pub struct CompressionPlanner;

impl CompressionPlanner {
    /// Head-room kept below the cap for container overhead
    const SIZE_MARGIN: f64 = 0.95;

    pub fn fits(size_bytes: u64, max_size_mb: u32) -> bool {
        SizeFormatter::megabytes(size_bytes) <= max_size_mb as f64
    }

    /// Total bitrate (bits/s) that lands a clip of `duration` under `max_size_mb`
    pub fn target_bitrate(max_size_mb: u32, duration: TimeSpec) -> Result<u64, DomainError> {
        if duration.millis == 0 {
            return Err(DomainError::ProcessingError(
                "Could not determine video duration for compression".to_string(),
            ));
        }
        if max_size_mb == 0 {
            return Err(DomainError::BadArgs(
                "Target size must be at least 1 MB".to_string(),
            ));
        }
        let target_bytes = max_size_mb as f64 * 1024.0 * 1024.0 * Self::SIZE_MARGIN;
        Ok(((target_bytes * 8.0) / duration.as_seconds()) as u64)
    }
}
