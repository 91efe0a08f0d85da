//! Trimmer view: one video, two handles, commit, save or copy

use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};

use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;

use crate::adapters::toml_config::ViewConfig;
use crate::app::trim_interactor::TrimController;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::SizeFormatter;
use crate::error::OtrimResult;
use crate::utils::PathUtils;
use crate::views::{print_notifications, spawn_line_reader, split_command, timeline, EVENT_QUEUE_CAPACITY};

const HELP: &str = "\
Commands:
  start <time>      move the start handle (SS[.ms], MM:SS[.ms], HH:MM:SS[.ms])
  end <time>        move the end handle
  + [ms] / - [ms]   nudge the end handle
  <+ [ms] / <- [ms] nudge the start handle
  trim              create the trim for the current selection
  compress <MB>     re-encode the trim to fit a size
  copy              copy the trim to the clipboard
  save [path]       save the trim (asks for a location without a path)
  open <path>       load another video (path or file:// URL)
  status            show the current selection
  help              show this help
  quit              exit";

/// A parsed trimmer command line
#[derive(Debug, Clone, PartialEq)]
pub enum TrimmerCommand {
    Start(TimeSpec),
    End(TimeSpec),
    NudgeStart(Option<i64>),
    NudgeEnd(Option<i64>),
    Trim,
    Compress(u32),
    Copy,
    Save(Option<PathBuf>),
    Open(String),
    Status,
    Help,
    Quit,
    Nothing,
}

impl TrimmerCommand {
    pub fn parse(line: &str) -> Result<Self, DomainError> {
        let (verb, rest) = split_command(line);
        let command = match verb.as_str() {
            "" => TrimmerCommand::Nothing,
            "start" | "s" => TrimmerCommand::Start(parse_time(rest)?),
            "end" | "e" => TrimmerCommand::End(parse_time(rest)?),
            "+" => TrimmerCommand::NudgeEnd(parse_step(rest, 1)?),
            "-" => TrimmerCommand::NudgeEnd(parse_step(rest, -1)?),
            "<+" => TrimmerCommand::NudgeStart(parse_step(rest, 1)?),
            "<-" => TrimmerCommand::NudgeStart(parse_step(rest, -1)?),
            "trim" | "t" => TrimmerCommand::Trim,
            "compress" => {
                let size = rest.parse::<u32>().map_err(|_| {
                    DomainError::BadArgs("compress needs a size in MB, e.g. compress 25".to_string())
                })?;
                TrimmerCommand::Compress(size)
            }
            "copy" | "c" => TrimmerCommand::Copy,
            "save" => TrimmerCommand::Save(if rest.is_empty() {
                None
            } else {
                Some(PathUtils::normalize_input(rest))
            }),
            "open" | "load" => {
                if rest.is_empty() {
                    return Err(DomainError::BadArgs("open needs a path".to_string()));
                }
                TrimmerCommand::Open(rest.to_string())
            }
            "status" | "st" => TrimmerCommand::Status,
            "help" | "?" => TrimmerCommand::Help,
            "quit" | "q" | "exit" => TrimmerCommand::Quit,
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

fn parse_time(text: &str) -> Result<TimeSpec, DomainError> {
    if text.is_empty() {
        return Err(DomainError::BadArgs("a time is required".to_string()));
    }
    TimeSpec::parse(text)
}

fn parse_step(text: &str, sign: i64) -> Result<Option<i64>, DomainError> {
    if text.is_empty() {
        return Ok(None);
    }
    let step = text
        .parse::<u32>()
        .map_err(|_| DomainError::BadArgs(format!("Invalid step in milliseconds: {}", text)))?;
    Ok(Some(sign * step as i64))
}

enum TrimmerEvent {
    Line(String),
    InputClosed,
    /// Probe answer for the file it was started on
    MediaLoaded(PathBuf, Result<MediaInfo, DomainError>),
}

/// Terminal trimmer window
pub struct TrimmerView {
    controller: TrimController,
    config: ViewConfig,
    tx: mpsc::Sender<TrimmerEvent>,
    rx: mpsc::Receiver<TrimmerEvent>,
    /// Lines received while the duration is still unknown
    deferred: VecDeque<String>,
    probing: bool,
    input_closed: bool,
}

impl TrimmerView {
    pub fn new(controller: TrimController, config: ViewConfig) -> Self {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        Self {
            controller,
            config,
            tx,
            rx,
            deferred: VecDeque::new(),
            probing: false,
            input_closed: false,
        }
    }

    pub fn controller(&self) -> &TrimController {
        &self.controller
    }

    /// Run until `quit` or end of input
    pub async fn run<R, W>(mut self, video: Option<String>, input: R, out: &mut W) -> OtrimResult<()>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: Write,
    {
        writeln!(out, "otrim trimmer. Type help for commands.")?;
        if let Some(video) = video {
            self.open(&video, out).await?;
        }
        spawn_line_reader(input, self.tx.clone(), |line| match line {
            Some(line) => TrimmerEvent::Line(line),
            None => TrimmerEvent::InputClosed,
        });

        while let Some(event) = self.rx.recv().await {
            let keep_going = match event {
                TrimmerEvent::Line(line) if self.probing => {
                    if matches!(TrimmerCommand::parse(&line), Ok(TrimmerCommand::Quit)) {
                        false
                    } else {
                        self.deferred.push_back(line);
                        true
                    }
                }
                TrimmerEvent::Line(line) => self.handle_line(&line, out).await?,
                TrimmerEvent::InputClosed => {
                    self.input_closed = true;
                    self.probing
                }
                TrimmerEvent::MediaLoaded(path, _) if !self.is_current(&path) => {
                    tracing::debug!(
                        path = %path.display(),
                        "Dropping media answer for a replaced video"
                    );
                    true
                }
                TrimmerEvent::MediaLoaded(path, result) => {
                    self.probing = false;
                    self.controller.on_media_loaded(&path, result);
                    print_notifications(out, self.controller.notifications())?;
                    self.print_status(out)?;
                    self.replay_deferred(out).await?
                }
            };
            print_notifications(out, self.controller.notifications())?;
            out.flush()?;
            if !keep_going {
                break;
            }
        }
        tracing::debug!("Trimmer view closed");
        Ok(())
    }

    async fn replay_deferred<W: Write>(&mut self, out: &mut W) -> OtrimResult<bool> {
        while let Some(line) = self.deferred.pop_front() {
            if !self.handle_line(&line, out).await? {
                return Ok(false);
            }
            if self.probing {
                // A deferred `open` started another probe
                return Ok(true);
            }
        }
        Ok(!self.input_closed)
    }

    fn is_current(&self, path: &Path) -> bool {
        self.controller.session().source_path() == Some(path)
    }

    async fn open<W: Write>(&mut self, video: &str, out: &mut W) -> OtrimResult<()> {
        match self.controller.load_file(video).await {
            Ok(path) => {
                writeln!(out, "Loading {}", path.display())?;
                self.probing = true;
                let prober = self.controller.prober();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = prober.probe_media(&path).await;
                    let _ = tx.send(TrimmerEvent::MediaLoaded(path, result)).await;
                });
            }
            Err(_) => print_notifications(out, self.controller.notifications())?,
        }
        Ok(())
    }

    /// Returns false when the view should close
    async fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> OtrimResult<bool> {
        let command = match TrimmerCommand::parse(line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "[error] {}", e)?;
                return Ok(true);
            }
        };

        let step = self.config.nudge_step_ms as i64;
        match command {
            TrimmerCommand::Nothing => {}
            TrimmerCommand::Start(time) => {
                if self.controller.set_start(time).is_ok() {
                    self.print_selection(out)?;
                }
            }
            TrimmerCommand::End(time) => {
                if self.controller.set_end(time).is_ok() {
                    self.print_selection(out)?;
                }
            }
            TrimmerCommand::NudgeStart(delta) => {
                if self.controller.nudge_start(delta.unwrap_or(step)).is_ok() {
                    self.print_selection(out)?;
                }
            }
            TrimmerCommand::NudgeEnd(delta) => {
                if self.controller.nudge_end(delta.unwrap_or(step)).is_ok() {
                    self.print_selection(out)?;
                }
            }
            TrimmerCommand::Trim => {
                writeln!(out, "Creating trim...")?;
                let _ = self.controller.commit_trim().await;
            }
            TrimmerCommand::Compress(size_mb) => {
                let _ = self.controller.compress_to_size(size_mb).await;
            }
            TrimmerCommand::Copy => {
                let _ = self.controller.copy_result().await;
            }
            TrimmerCommand::Save(dest) => {
                if let Ok(None) = self.controller.save_result(dest).await {
                    writeln!(out, "Save cancelled")?;
                }
            }
            TrimmerCommand::Open(video) => self.open(&video, out).await?,
            TrimmerCommand::Status => self.print_status(out)?,
            TrimmerCommand::Help => writeln!(out, "{}", HELP)?,
            TrimmerCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn print_selection<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let session = self.controller.session();
        writeln!(
            out,
            "{}  {} - {} ({})",
            timeline::render(
                session.start(),
                session.end(),
                session.duration(),
                self.config.timeline_width
            ),
            session.start(),
            session.end(),
            session.selection()
        )
    }

    fn print_status<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let session = self.controller.session();
        match session.source_path() {
            Some(path) => writeln!(out, "File: {}", path.display())?,
            None => {
                writeln!(out, "No video loaded. Use: open <path>")?;
                return Ok(());
            }
        }
        writeln!(out, "State: {}", session.state())?;
        writeln!(out, "Duration: {}", session.duration())?;
        self.print_selection(out)?;
        if let Some(artifact) = session.artifact() {
            writeln!(
                out,
                "Trim: {} ({})",
                artifact.deliverable().display(),
                SizeFormatter::format(artifact.size_bytes)
            )?;
        }
        Ok(())
    }
}
