// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::domain::errors::DomainError;
use crate::domain::rules::{BoundsPolicy, GalleryOrdering, SizeFormatter};

/// Millisecond-precision time value used for trim bounds and durations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct TimeSpec {
    pub millis: u64,
}

impl TimeSpec {
    /// Create a new TimeSpec from milliseconds
    pub fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Create a new TimeSpec from fractional seconds, rounding to the nearest millisecond
    pub fn from_seconds(seconds: f64) -> Self {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Self { millis: 0 };
        }
        Self {
            millis: (seconds * 1000.0).round() as u64,
        }
    }

    /// Create a new TimeSpec from hours, minutes, seconds, milliseconds
    pub fn from_components(hours: u32, minutes: u32, seconds: u32, milliseconds: u32) -> Self {
        let millis = hours as u64 * 3_600_000
            + minutes as u64 * 60_000
            + seconds as u64 * 1000
            + milliseconds as u64;
        Self { millis }
    }

    pub fn as_seconds(&self) -> f64 {
        self.millis as f64 / 1000.0
    }

    pub fn to_duration(&self) -> Duration {
        Duration::from_millis(self.millis)
    }

    /// Parse time string in various formats
    ///
    /// Accepts plain seconds (`90.5`), `MM:SS[.ms]` and `HH:MM:SS[.ms]`.
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();

        if let Ok(seconds) = trimmed.parse::<f64>() {
            if seconds < 0.0 || !seconds.is_finite() {
                return Err(DomainError::BadArgs("Time cannot be negative".to_string()));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        match parts.as_slice() {
            [minutes, seconds] => {
                let minutes = minutes
                    .parse::<u32>()
                    .map_err(|_| DomainError::BadArgs("Invalid minutes format".to_string()))?;
                let seconds = Self::parse_seconds_part(seconds)?;
                Ok(Self::from_seconds(minutes as f64 * 60.0 + seconds))
            }
            [hours, minutes, seconds] => {
                let hours = hours
                    .parse::<u32>()
                    .map_err(|_| DomainError::BadArgs("Invalid hours format".to_string()))?;
                let minutes = minutes
                    .parse::<u32>()
                    .map_err(|_| DomainError::BadArgs("Invalid minutes format".to_string()))?;
                if minutes >= 60 {
                    return Err(DomainError::BadArgs(
                        "Minutes must be less than 60".to_string(),
                    ));
                }
                let seconds = Self::parse_seconds_part(seconds)?;
                Ok(Self::from_seconds(
                    hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds,
                ))
            }
            _ => Err(DomainError::BadArgs(
                "Invalid time format. Supported formats: seconds (e.g., 123.45), MM:SS.ms (e.g., 2:30.5), HH:MM:SS.ms (e.g., 1:02:30.5)".to_string(),
            )),
        }
    }

    fn parse_seconds_part(part: &str) -> Result<f64, DomainError> {
        let seconds = part
            .parse::<f64>()
            .map_err(|_| DomainError::BadArgs("Invalid seconds format".to_string()))?;
        if !(0.0..60.0).contains(&seconds) {
            return Err(DomainError::BadArgs(
                "Seconds must be less than 60".to_string(),
            ));
        }
        Ok(seconds)
    }

    /// Format as [H:]MM:SS.mmm
    pub fn format_hms(&self) -> String {
        let hours = self.millis / 3_600_000;
        let minutes = (self.millis % 3_600_000) / 60_000;
        let seconds = (self.millis % 60_000) / 1000;
        let milliseconds = self.millis % 1000;

        if hours > 0 {
            format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// What the media layer reports once a file has been loaded
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub path: PathBuf,
    pub duration: TimeSpec,
    pub format_name: Option<String>,
    pub size_bytes: Option<u64>,
}

/// Lifecycle of a trim session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No file loaded
    Empty,
    /// File set, bounds untouched since load
    Loaded,
    /// Bounds changed since load or since the last commit
    Editing,
    /// A trim exists for the current bounds
    Committed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Empty => "empty",
            SessionState::Loaded => "loaded",
            SessionState::Editing => "editing",
            SessionState::Committed => "committed",
        };
        f.write_str(label)
    }
}

/// Files produced by a committed trim
#[derive(Debug, Clone, PartialEq)]
pub struct TrimArtifact {
    pub trimmed: PathBuf,
    pub compressed: Option<PathBuf>,
    pub size_bytes: u64,
}

impl TrimArtifact {
    pub fn new(trimmed: PathBuf, size_bytes: u64) -> Self {
        Self {
            trimmed,
            compressed: None,
            size_bytes,
        }
    }

    /// The file handed to save/copy: the compressed one when it exists
    pub fn deliverable(&self) -> &Path {
        self.compressed.as_deref().unwrap_or(&self.trimmed)
    }
}

/// State of one in-progress trim
#[derive(Debug, Clone)]
pub struct TrimSession {
    source_path: Option<PathBuf>,
    duration: TimeSpec,
    start: TimeSpec,
    end: TimeSpec,
    state: SessionState,
    artifact: Option<TrimArtifact>,
}

impl Default for TrimSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TrimSession {
    pub fn new() -> Self {
        Self {
            source_path: None,
            duration: TimeSpec::default(),
            start: TimeSpec::default(),
            end: TimeSpec::default(),
            state: SessionState::Empty,
            artifact: None,
        }
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn duration(&self) -> TimeSpec {
        self.duration
    }

    pub fn start(&self) -> TimeSpec {
        self.start
    }

    pub fn end(&self) -> TimeSpec {
        self.end
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_committed(&self) -> bool {
        self.state == SessionState::Committed
    }

    pub fn artifact(&self) -> Option<&TrimArtifact> {
        self.artifact.as_ref()
    }

    /// Length of the current selection
    pub fn selection(&self) -> TimeSpec {
        TimeSpec::from_millis(self.end.millis.saturating_sub(self.start.millis))
    }

    /// Start a session on `path`; duration stays unknown until the media layer reports it
    pub fn load(&mut self, path: PathBuf) {
        self.source_path = Some(path);
        self.duration = TimeSpec::default();
        self.start = TimeSpec::default();
        self.end = TimeSpec::default();
        self.state = SessionState::Loaded;
        self.artifact = None;
    }

    /// Record the duration reported by the media layer and open the selection fully
    pub fn set_duration(&mut self, duration: TimeSpec) {
        self.duration = duration;
        self.start = TimeSpec::default();
        self.end = duration;
        if self.state == SessionState::Committed {
            self.artifact = None;
            self.state = SessionState::Editing;
        }
    }

    /// Move the start handle; returns the accepted (clamped) value
    pub fn set_start(&mut self, requested: TimeSpec) -> Result<TimeSpec, DomainError> {
        self.require_loaded()?;
        let start = BoundsPolicy::resolve_start(requested, self.end, self.duration)?;
        self.start = start;
        self.mark_edited();
        Ok(start)
    }

    /// Move the end handle; returns the accepted (clamped) value
    pub fn set_end(&mut self, requested: TimeSpec) -> Result<TimeSpec, DomainError> {
        self.require_loaded()?;
        let end = BoundsPolicy::resolve_end(requested, self.start, self.duration)?;
        self.end = end;
        self.mark_edited();
        Ok(end)
    }

    /// Check that a trim can be produced right now
    pub fn ensure_committable(&self) -> Result<(), DomainError> {
        self.require_loaded()?;
        if self.start >= self.end {
            return Err(DomainError::InvalidTimeRange(format!(
                "start ({}) must be before end ({})",
                self.start, self.end
            )));
        }
        if self.is_committed() {
            return Err(DomainError::InvalidState(
                "a trim already exists for this selection".to_string(),
            ));
        }
        Ok(())
    }

    /// Check that a produced trim is available to save, copy or compress
    pub fn ensure_artifact(&self) -> Result<&TrimArtifact, DomainError> {
        match (&self.artifact, self.state) {
            (Some(artifact), SessionState::Committed) => Ok(artifact),
            _ => Err(DomainError::InvalidState(
                "No trimmed video available".to_string(),
            )),
        }
    }

    pub fn commit(&mut self, artifact: TrimArtifact) {
        self.artifact = Some(artifact);
        self.state = SessionState::Committed;
    }

    /// Attach a re-encoded copy to the committed artifact
    pub fn attach_compressed(&mut self, compressed: PathBuf) {
        if let Some(artifact) = self.artifact.as_mut() {
            artifact.compressed = Some(compressed);
        }
    }

    /// A failed commit leaves the session editable
    pub fn commit_failed(&mut self) {
        self.artifact = None;
        if self.state != SessionState::Empty {
            self.state = SessionState::Editing;
        }
    }

    fn require_loaded(&self) -> Result<(), DomainError> {
        if self.source_path.is_none() {
            return Err(DomainError::InvalidState("No video loaded".to_string()));
        }
        Ok(())
    }

    fn mark_edited(&mut self) {
        self.artifact = None;
        self.state = SessionState::Editing;
    }
}

/// A file found while scanning a directory
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: DateTime<Local>,
}

/// One discovered video file
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryEntry {
    pub path: PathBuf,
    pub display_name: String,
    pub size_bytes: u64,
    pub size_formatted: String,
    pub last_modified: DateTime<Local>,
    pub thumbnail_path: Option<PathBuf>,
}

impl GalleryEntry {
    pub fn from_record(record: FileRecord) -> Self {
        let display_name = record
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| record.path.to_string_lossy().into_owned());
        Self {
            display_name,
            size_formatted: SizeFormatter::format(record.size_bytes),
            size_bytes: record.size_bytes,
            last_modified: record.modified,
            path: record.path,
            thumbnail_path: None,
        }
    }
}

/// Field a gallery can be sorted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Size,
    LastModified,
}

impl SortField {
    pub fn parse(field: &str) -> Result<Self, DomainError> {
        match field.to_lowercase().as_str() {
            "name" | "filename" => Ok(SortField::Name),
            "size" | "filesize" => Ok(SortField::Size),
            "date" | "modified" | "lastmodified" => Ok(SortField::LastModified),
            other => Err(DomainError::BadArgs(format!(
                "Unknown sort field: {}. Valid fields: name, size, date",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }
}

/// Ordered collection of gallery entries
#[derive(Debug, Clone, Default)]
pub struct GalleryModel {
    entries: Vec<GalleryEntry>,
    sort: Option<SortSpec>,
    generation: u64,
    selected: Option<PathBuf>,
}

impl GalleryModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GalleryEntry> {
        self.entries.get(index)
    }

    pub fn find(&self, path: &Path) -> Option<&GalleryEntry> {
        self.entries.iter().find(|entry| entry.path == path)
    }

    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort
    }

    /// Identifies the current load; thumbnail results carry it back
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    /// Discard the collection and rebuild it from `records`
    ///
    /// Records are put in path order first so that repeated loads of an
    /// unchanged directory yield the same sequence; the active sort is then
    /// re-applied. Returns the new generation.
    pub fn replace(&mut self, records: Vec<FileRecord>) -> u64 {
        let mut entries: Vec<GalleryEntry> =
            records.into_iter().map(GalleryEntry::from_record).collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries.dedup_by(|a, b| a.path == b.path);

        self.entries = entries;
        self.selected = None;
        self.generation += 1;
        if let Some(spec) = self.sort {
            self.apply_sort(spec);
        }
        self.generation
    }

    /// Drop every entry, e.g. after an unreadable directory
    pub fn clear(&mut self) -> u64 {
        self.replace(Vec::new())
    }

    pub fn sort_by(&mut self, spec: SortSpec) {
        self.sort = Some(spec);
        self.apply_sort(spec);
    }

    fn apply_sort(&mut self, spec: SortSpec) {
        self.entries
            .sort_by(|a, b| GalleryOrdering::compare(a, b, spec));
    }

    pub fn select(&mut self, path: &Path) -> Result<&GalleryEntry, DomainError> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.path == path)
            .ok_or_else(|| DomainError::FileNotFound(path.display().to_string()))?;
        self.selected = Some(entry.path.clone());
        Ok(entry)
    }

    /// Record a finished thumbnail; ignored when it belongs to an older load
    pub fn set_thumbnail(&mut self, generation: u64, path: &Path, thumbnail: PathBuf) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.entries.iter_mut().find(|entry| entry.path == path) {
            Some(entry) => {
                entry.thumbnail_path = Some(thumbnail);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests;
