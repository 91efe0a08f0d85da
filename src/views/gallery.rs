//! Gallery view: lists the videos of a directory and hands one to the trimmer

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::AsyncBufRead;
use tokio::sync::{mpsc, Semaphore};

use crate::app::gallery_interactor::{GalleryController, ThumbnailJob};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::error::OtrimResult;
use crate::ports::ThumbnailPort;
use crate::views::{print_notifications, spawn_line_reader, split_command, EVENT_QUEUE_CAPACITY};

const HELP: &str = "\
Commands:
  list                              show the videos
  sort <name|size|date> [asc|desc]  change the order
  select <n|path>                   highlight a video
  open <n|path>                     open a video in the trimmer and close the gallery
  reload                            scan the directory again
  help                              show this help
  quit                              exit";

/// A parsed gallery command line
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryCommand {
    List,
    Sort(SortSpec),
    Select(String),
    Open(String),
    Reload,
    Help,
    Quit,
    Nothing,
}

impl GalleryCommand {
    pub fn parse(line: &str) -> Result<Self, DomainError> {
        let (verb, rest) = split_command(line);
        let command = match verb.as_str() {
            "" => GalleryCommand::Nothing,
            "list" | "ls" => GalleryCommand::List,
            "sort" => {
                let mut words = rest.split_whitespace();
                let field = SortField::parse(words.next().unwrap_or(""))?;
                let spec = match words.next().map(str::to_lowercase).as_deref() {
                    None | Some("asc") | Some("ascending") => SortSpec::ascending(field),
                    Some("desc") | Some("descending") => SortSpec::descending(field),
                    Some(other) => {
                        return Err(DomainError::BadArgs(format!(
                            "Unknown sort direction: {}. Use asc or desc",
                            other
                        )))
                    }
                };
                GalleryCommand::Sort(spec)
            }
            "select" => GalleryCommand::Select(required(rest, "select")?),
            "open" => GalleryCommand::Open(required(rest, "open")?),
            "reload" | "refresh" => GalleryCommand::Reload,
            "help" | "?" => GalleryCommand::Help,
            "quit" | "q" | "exit" => GalleryCommand::Quit,
            other => {
                return Err(DomainError::BadArgs(format!(
                    "Unknown command: {}. Type help for a list",
                    other
                )))
            }
        };
        Ok(command)
    }
}

fn required(rest: &str, verb: &str) -> Result<String, DomainError> {
    if rest.is_empty() {
        return Err(DomainError::BadArgs(format!(
            "{} needs a number from the list or a path",
            verb
        )));
    }
    Ok(rest.to_string())
}

/// How the gallery ended
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryOutcome {
    Closed,
    /// A trimmer ran on this video in place of the gallery
    Launched(PathBuf),
}

enum GalleryEvent {
    Line(String),
    InputClosed,
    Thumbnail(ThumbnailJob, Option<PathBuf>),
}

/// Terminal gallery window
pub struct GalleryView {
    controller: GalleryController,
    thumbnails: Option<Arc<dyn ThumbnailPort>>,
    limiter: Arc<Semaphore>,
    tx: mpsc::Sender<GalleryEvent>,
    rx: mpsc::Receiver<GalleryEvent>,
}

impl GalleryView {
    pub fn new(
        controller: GalleryController,
        thumbnails: Option<Arc<dyn ThumbnailPort>>,
        thumbnail_concurrency: usize,
    ) -> Self {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        Self {
            controller,
            thumbnails,
            limiter: Arc::new(Semaphore::new(thumbnail_concurrency.max(1))),
            tx,
            rx,
        }
    }

    pub fn controller(&self) -> &GalleryController {
        &self.controller
    }

    /// Run on an already loaded controller until `quit`, `open` or end of input
    pub async fn run<R, W>(mut self, input: R, out: &mut W) -> OtrimResult<GalleryOutcome>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: Write,
    {
        self.print_list(out)?;
        self.request_thumbnails();
        spawn_line_reader(input, self.tx.clone(), |line| match line {
            Some(line) => GalleryEvent::Line(line),
            None => GalleryEvent::InputClosed,
        });

        let mut outcome = GalleryOutcome::Closed;
        while let Some(event) = self.rx.recv().await {
            let keep_going = match event {
                GalleryEvent::Line(line) => match self.handle_line(&line, out).await? {
                    Some(done) => {
                        outcome = done;
                        false
                    }
                    None => true,
                },
                GalleryEvent::InputClosed => false,
                GalleryEvent::Thumbnail(job, thumbnail) => {
                    if self.controller.on_thumbnail(&job, thumbnail) {
                        tracing::debug!(video = %job.video.display(), "Thumbnail ready");
                    }
                    true
                }
            };
            print_notifications(out, self.controller.notifications())?;
            out.flush()?;
            if !keep_going {
                break;
            }
        }
        Ok(outcome)
    }

    /// One task per missing thumbnail, at most `thumbnail_concurrency` running
    fn request_thumbnails(&self) {
        let Some(port) = &self.thumbnails else {
            return;
        };
        for job in self.controller.thumbnail_jobs() {
            let port = Arc::clone(port);
            let limiter = Arc::clone(&self.limiter);
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let Ok(_permit) = limiter.acquire_owned().await else {
                    return;
                };
                if tx.is_closed() {
                    return;
                }
                let thumbnail = port.thumbnail_for(&job.video).await;
                let _ = tx.send(GalleryEvent::Thumbnail(job, thumbnail)).await;
            });
        }
    }

    /// `Some` when the view should close
    async fn handle_line<W: Write>(
        &mut self,
        line: &str,
        out: &mut W,
    ) -> OtrimResult<Option<GalleryOutcome>> {
        let command = match GalleryCommand::parse(line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "[error] {}", e)?;
                return Ok(None);
            }
        };

        match command {
            GalleryCommand::Nothing => {}
            GalleryCommand::List => self.print_list(out)?,
            GalleryCommand::Sort(spec) => {
                self.controller.sort(spec);
                self.print_list(out)?;
            }
            GalleryCommand::Select(target) => {
                if let Some(path) = self.resolve(&target, out)? {
                    if let Ok(entry) = self.controller.select_video(&path) {
                        writeln!(
                            out,
                            "Selected {} ({}, {})",
                            entry.display_name,
                            entry.size_formatted,
                            entry.last_modified.format("%Y-%m-%d %H:%M")
                        )?;
                    }
                }
            }
            GalleryCommand::Open(target) => {
                if let Some(path) = self.resolve(&target, out)? {
                    writeln!(out, "Opening {} in the trimmer", path.display())?;
                    // The trimmer may replace this process
                    out.flush()?;
                    if self.controller.open_video_in_trimmer(&path).is_ok() {
                        return Ok(Some(GalleryOutcome::Launched(path)));
                    }
                }
            }
            GalleryCommand::Reload => {
                if self.controller.reload().await.is_ok() {
                    self.print_list(out)?;
                    self.request_thumbnails();
                }
            }
            GalleryCommand::Help => writeln!(out, "{}", HELP)?,
            GalleryCommand::Quit => return Ok(Some(GalleryOutcome::Closed)),
        }
        Ok(None)
    }

    fn resolve<W: Write>(&self, target: &str, out: &mut W) -> std::io::Result<Option<PathBuf>> {
        let resolved = self.controller.resolve(target);
        if resolved.is_none() {
            writeln!(out, "[error] No video matches {}", target)?;
        }
        Ok(resolved)
    }

    fn print_list<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let model = self.controller.model();
        let dir = self
            .controller
            .directory()
            .map(|dir| dir.display().to_string())
            .unwrap_or_default();

        if model.is_empty() {
            writeln!(out, "No videos found in {}", dir)?;
            return Ok(());
        }

        let order = match model.sort_spec() {
            Some(spec) => format!(
                ", sorted by {} {}",
                match spec.field {
                    SortField::Name => "name",
                    SortField::Size => "size",
                    SortField::LastModified => "date",
                },
                match spec.direction {
                    SortDirection::Ascending => "asc",
                    SortDirection::Descending => "desc",
                }
            ),
            None => String::new(),
        };
        writeln!(out, "Videos in {} ({}{})", dir, model.len(), order)?;

        let name_width = model
            .entries()
            .iter()
            .map(|entry| entry.display_name.chars().count())
            .max()
            .unwrap_or(0);
        for (index, entry) in model.entries().iter().enumerate() {
            let marker = if model.selected() == Some(entry.path.as_path()) {
                '*'
            } else {
                ' '
            };
            writeln!(
                out,
                "{}{:>3}. {:<name_width$}  {:>10}  {}{}",
                marker,
                index + 1,
                entry.display_name,
                entry.size_formatted,
                entry.last_modified.format("%Y-%m-%d %H:%M"),
                if entry.thumbnail_path.is_some() {
                    "  [thumb]"
                } else {
                    ""
                },
                name_width = name_width
            )?;
        }
        Ok(())
    }
}
