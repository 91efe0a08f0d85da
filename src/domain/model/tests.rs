// Unit tests for domain models

use std::path::{Path, PathBuf};

use chrono::{Local, TimeZone};

use crate::domain::errors::*;
use crate::domain::model::*;

fn ms(millis: u64) -> TimeSpec {
    TimeSpec::from_millis(millis)
}

fn loaded_session(duration_ms: u64) -> TrimSession {
    let mut session = TrimSession::new();
    session.load(PathBuf::from("/videos/clip.mp4"));
    session.set_duration(ms(duration_ms));
    session
}

fn record(path: &str, size: u64) -> FileRecord {
    FileRecord {
        path: PathBuf::from(path),
        size_bytes: size,
        modified: Local.timestamp_opt(1_700_000_000 + size as i64, 0).unwrap(),
    }
}

fn paths(model: &GalleryModel) -> Vec<String> {
    model
        .entries()
        .iter()
        .map(|entry| entry.display_name.clone())
        .collect()
}

#[test]
fn test_time_spec_parse_seconds() {
    assert_eq!(TimeSpec::parse("90.5").unwrap(), ms(90_500));
    assert_eq!(TimeSpec::parse(" 12 ").unwrap(), ms(12_000));
}

#[test]
fn test_time_spec_parse_mm_ss() {
    assert_eq!(TimeSpec::parse("01:30.5").unwrap(), ms(90_500));
    assert_eq!(TimeSpec::parse("2:00").unwrap(), ms(120_000));
}

#[test]
fn test_time_spec_parse_hh_mm_ss() {
    assert_eq!(TimeSpec::parse("01:02:03.456").unwrap(), ms(3_723_456));
}

#[test]
fn test_time_spec_parse_invalid() {
    assert!(TimeSpec::parse("invalid").is_err());
    assert!(TimeSpec::parse("00:60").is_err());
    assert!(TimeSpec::parse("1:75:00").is_err());
    assert!(TimeSpec::parse("-10").is_err());
    assert!(TimeSpec::parse("1:2:3:4").is_err());
}

#[test]
fn test_time_spec_display() {
    assert_eq!(TimeSpec::from_components(1, 2, 3, 456).to_string(), "1:02:03.456");
    assert_eq!(TimeSpec::from_components(0, 2, 3, 456).to_string(), "02:03.456");
}

#[test]
fn test_new_session_is_empty() {
    let mut session = TrimSession::new();
    assert_eq!(session.state(), SessionState::Empty);
    assert!(session.set_start(ms(0)).is_err());
    assert!(session.ensure_committable().is_err());
}

#[test]
fn test_load_waits_for_duration() {
    let mut session = TrimSession::new();
    session.load(PathBuf::from("/videos/clip.mp4"));
    assert_eq!(session.state(), SessionState::Loaded);
    assert_eq!(session.duration(), ms(0));
    assert_eq!(session.end(), ms(0));

    session.set_duration(ms(60_000));
    assert_eq!(session.start(), ms(0));
    assert_eq!(session.end(), ms(60_000));
    assert_eq!(session.state(), SessionState::Loaded);
}

#[test]
fn test_bounds_are_clamped_into_media() {
    let mut session = loaded_session(10_000);

    assert_eq!(session.set_end(ms(25_000)).unwrap(), ms(10_000));
    assert_eq!(session.set_start(ms(2_000)).unwrap(), ms(2_000));
    assert!(session.start() < session.end());
}

#[test]
fn test_crossing_move_is_rejected_and_bounds_kept() {
    let mut session = loaded_session(10_000);
    session.set_start(ms(3_000)).unwrap();
    session.set_end(ms(6_000)).unwrap();

    assert!(matches!(
        session.set_start(ms(6_000)),
        Err(DomainError::InvalidTimeRange(_))
    ));
    assert!(session.set_end(ms(1_000)).is_err());
    assert_eq!(session.start(), ms(3_000));
    assert_eq!(session.end(), ms(6_000));
}

#[test]
fn test_accepted_change_uncommits_even_when_unchanged() {
    let mut session = loaded_session(10_000);
    session.set_end(ms(8_000)).unwrap();
    session.commit(TrimArtifact::new(PathBuf::from("/tmp/out.mp4"), 42));
    assert!(session.is_committed());

    session.set_end(ms(8_000)).unwrap();
    assert!(!session.is_committed());
    assert_eq!(session.state(), SessionState::Editing);
    assert!(session.artifact().is_none());
}

#[test]
fn test_rejected_change_keeps_commit() {
    let mut session = loaded_session(10_000);
    session.commit(TrimArtifact::new(PathBuf::from("/tmp/out.mp4"), 42));

    assert!(session.set_start(ms(10_000)).is_err());
    assert!(session.is_committed());
}

#[test]
fn test_commit_needs_non_empty_uncommitted_selection() {
    let session = TrimSession::new();
    assert!(session.ensure_committable().is_err());

    let mut session = loaded_session(0);
    assert!(matches!(
        session.ensure_committable(),
        Err(DomainError::InvalidTimeRange(_))
    ));

    session.set_duration(ms(5_000));
    assert!(session.ensure_committable().is_ok());
    session.commit(TrimArtifact::new(PathBuf::from("/tmp/out.mp4"), 1));
    assert!(matches!(
        session.ensure_committable(),
        Err(DomainError::InvalidState(_))
    ));
}

#[test]
fn test_failed_commit_returns_to_editing() {
    let mut session = loaded_session(5_000);
    session.commit_failed();
    assert_eq!(session.state(), SessionState::Editing);
    assert!(session.ensure_artifact().is_err());
}

#[test]
fn test_deliverable_prefers_compressed() {
    let mut session = loaded_session(5_000);
    session.commit(TrimArtifact::new(PathBuf::from("/tmp/trimmed.mp4"), 1));
    assert_eq!(
        session.ensure_artifact().unwrap().deliverable(),
        Path::new("/tmp/trimmed.mp4")
    );

    session.attach_compressed(PathBuf::from("/tmp/compressed.mp4"));
    assert_eq!(
        session.ensure_artifact().unwrap().deliverable(),
        Path::new("/tmp/compressed.mp4")
    );
}

#[test]
fn test_gallery_sort_by_name_then_size() {
    let mut model = GalleryModel::new();
    model.replace(vec![
        record("/v/b.mp4", 2),
        record("/v/a.mp4", 1),
        record("/v/c.mp4", 3),
    ]);

    model.sort_by(SortSpec::ascending(SortField::Name));
    assert_eq!(paths(&model), vec!["a.mp4", "b.mp4", "c.mp4"]);

    model.sort_by(SortSpec::descending(SortField::Name));
    assert_eq!(paths(&model), vec!["c.mp4", "b.mp4", "a.mp4"]);

    model.sort_by(SortSpec::ascending(SortField::Size));
    assert_eq!(paths(&model), vec!["a.mp4", "b.mp4", "c.mp4"]);
    assert_eq!(model.get(0).unwrap().size_bytes, 1);
}

#[test]
fn test_gallery_replace_is_deterministic() {
    let mut first = GalleryModel::new();
    first.replace(vec![record("/v/z.mp4", 9), record("/v/m.mp4", 4)]);
    let mut second = GalleryModel::new();
    second.replace(vec![record("/v/m.mp4", 4), record("/v/z.mp4", 9)]);

    assert_eq!(first.entries(), second.entries());
}

#[test]
fn test_gallery_keeps_sort_across_reload() {
    let mut model = GalleryModel::new();
    model.sort_by(SortSpec::descending(SortField::Size));
    model.replace(vec![record("/v/small.mp4", 1), record("/v/big.mp4", 100)]);

    assert_eq!(paths(&model), vec!["big.mp4", "small.mp4"]);
}

#[test]
fn test_stale_thumbnail_is_ignored() {
    let mut model = GalleryModel::new();
    let old = model.replace(vec![record("/v/a.mp4", 1)]);
    let current = model.replace(vec![record("/v/a.mp4", 1)]);
    assert_ne!(old, current);

    assert!(!model.set_thumbnail(old, Path::new("/v/a.mp4"), PathBuf::from("/t/a.jpg")));
    assert!(model.get(0).unwrap().thumbnail_path.is_none());

    assert!(model.set_thumbnail(current, Path::new("/v/a.mp4"), PathBuf::from("/t/a.jpg")));
    assert!(!model.set_thumbnail(current, Path::new("/v/gone.mp4"), PathBuf::from("/t/g.jpg")));
    assert_eq!(
        model.get(0).unwrap().thumbnail_path.as_deref(),
        Some(Path::new("/t/a.jpg"))
    );
}

#[test]
fn test_select_unknown_path_fails() {
    let mut model = GalleryModel::new();
    model.replace(vec![record("/v/a.mp4", 1)]);

    assert!(model.select(Path::new("/v/missing.mp4")).is_err());
    assert!(model.select(Path::new("/v/a.mp4")).is_ok());
    assert_eq!(model.selected(), Some(Path::new("/v/a.mp4")));
}

#[test]
fn test_sort_field_parsing() {
    assert_eq!(SortField::parse("Name").unwrap(), SortField::Name);
    assert_eq!(SortField::parse("size").unwrap(), SortField::Size);
    assert_eq!(SortField::parse("date").unwrap(), SortField::LastModified);
    assert!(SortField::parse("colour").is_err());
}
