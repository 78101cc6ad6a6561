//! A single ffmpeg transcode and its output stream.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use std::task::{Context, Poll};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, ReadBuf};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::error::TranscodeError;
use super::profile::CodecProfile;
use super::types::{Codec, Song, TranscodeState};

/// One transcode of one song into one codec.
///
/// Built by [`TranscoderFactory`](super::TranscoderFactory) in the `Created` state. The
/// operation owns its ffmpeg process: [`start`](Self::start) spawns it and hands out the
/// encoded stream, [`wait`](Self::wait) reaps it. Dropping the operation kills a process
/// that was never waited on.
///
/// Close or drain the stream before (or while) waiting. ffmpeg blocks once the pipe is
/// full, and if the stream is dropped early ffmpeg exits on the broken pipe and `wait`
/// reports a failure.
#[derive(Debug)]
pub struct Transcoder {
    profile: &'static CodecProfile,
    quality: String,
    flags: &'static [&'static str],
    tool_path: PathBuf,
    log_level: String,
    stderr_tail_lines: usize,
    state: TranscodeState,
    source: Option<PathBuf>,
    child: Option<Child>,
    stderr_task: Option<JoinHandle<Option<String>>>,
}

impl Transcoder {
    pub(crate) fn new(
        profile: &'static CodecProfile,
        quality: String,
        flags: &'static [&'static str],
        tool_path: PathBuf,
        log_level: String,
        stderr_tail_lines: usize,
    ) -> Self {
        Self {
            profile,
            quality,
            flags,
            tool_path,
            log_level,
            stderr_tail_lines,
            state: TranscodeState::Created,
            source: None,
            child: None,
            stderr_task: None,
        }
    }

    pub fn codec(&self) -> Codec {
        self.profile.codec
    }

    pub fn quality(&self) -> &str {
        &self.quality
    }

    pub fn mime_type(&self) -> &'static str {
        self.profile.mime_type
    }

    pub fn extension(&self) -> &'static str {
        self.profile.extension
    }

    pub fn state(&self) -> TranscodeState {
        self.state
    }

    /// The full ffmpeg invocation, binary first.
    ///
    /// The `-i <source>` pair only appears once a song has been bound by `start`.
    pub fn command(&self) -> Vec<String> {
        let mut command = vec![self.tool_path.to_string_lossy().into_owned()];
        command.extend(self.build_args(self.source.as_deref()));
        command
    }

    fn build_args(&self, source: Option<&Path>) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(source) = source {
            args.extend(["-i".to_string(), source.to_string_lossy().into_owned()]);
        }

        // Audio only; cover art streams would otherwise be muxed in.
        args.extend([
            "-map".to_string(),
            "0:a".to_string(),
            "-codec:a".to_string(),
            self.profile.native_encoder().to_string(),
        ]);
        args.extend(self.flags.iter().map(|f| f.to_string()));
        args.extend([
            "-f".to_string(),
            self.profile.output_format.to_string(),
            "-loglevel".to_string(),
            self.log_level.clone(),
            "pipe:1".to_string(),
        ]);

        args
    }

    /// Spawns ffmpeg for `song` and returns its encoded output.
    pub async fn start(&mut self, song: &Song) -> Result<TranscodeStream, TranscodeError> {
        if self.state != TranscodeState::Created {
            return Err(TranscodeError::invalid_state("start", self.state));
        }

        match self.spawn(song.path()).await {
            Ok(stream) => {
                self.state = TranscodeState::Running;
                Ok(stream)
            }
            Err(e) => {
                self.state = TranscodeState::Failed;
                Err(e)
            }
        }
    }

    async fn spawn(&mut self, source: &Path) -> Result<TranscodeStream, TranscodeError> {
        // ffmpeg would start fine and only then fail on the input, so check it up front.
        tokio::fs::File::open(source)
            .await
            .map_err(|e| TranscodeError::launch(source, e))?;

        let args = self.build_args(Some(source));
        debug!(
            "Starting {} transcode ({}): {} {}",
            self.codec(),
            self.quality,
            self.tool_path.display(),
            args.join(" ")
        );

        let mut child = Command::new(&self.tool_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TranscodeError::launch(source, e))?;

        let stdout = child.stdout.take().ok_or_else(|| {
            TranscodeError::launch(source, io::Error::other("ffmpeg stdout was not captured"))
        })?;

        if let Some(stderr) = child.stderr.take() {
            self.stderr_task = Some(tokio::spawn(drain_stderr(stderr, self.stderr_tail_lines)));
        }

        self.source = Some(source.to_path_buf());
        self.child = Some(child);

        Ok(TranscodeStream { inner: stdout })
    }

    /// Waits for ffmpeg to exit and releases the process.
    ///
    /// Only valid once, after a successful `start`.
    pub async fn wait(&mut self) -> Result<(), TranscodeError> {
        let Some(mut child) = self.child.take() else {
            return Err(TranscodeError::invalid_state("wait on", self.state));
        };

        let status = match child.wait().await {
            Ok(status) => status,
            Err(e) => {
                self.state = TranscodeState::Failed;
                return Err(TranscodeError::Io(e));
            }
        };

        let stderr = match self.stderr_task.take() {
            Some(task) => task.await.ok().flatten(),
            None => None,
        };

        if status.success() {
            self.state = TranscodeState::Completed;
            debug!("{} transcode completed", self.codec());
            Ok(())
        } else {
            self.state = TranscodeState::Failed;
            Err(TranscodeError::ProcessFailure { status, stderr })
        }
    }

    /// Kills a running ffmpeg process and reaps it.
    pub async fn abort(&mut self) -> Result<(), TranscodeError> {
        let Some(mut child) = self.child.take() else {
            return Err(TranscodeError::invalid_state("abort", self.state));
        };

        self.state = TranscodeState::Failed;
        if let Some(task) = self.stderr_task.take() {
            task.abort();
        }

        child.kill().await.map_err(TranscodeError::Io)
    }
}

impl Drop for Transcoder {
    fn drop(&mut self) {
        if self.child.is_some() {
            warn!(
                "{} transcode dropped while running, killing ffmpeg",
                self.profile.codec
            );
        }
    }
}

/// Logs ffmpeg's stderr and keeps the last `tail_lines` lines.
async fn drain_stderr(stderr: ChildStderr, tail_lines: usize) -> Option<String> {
    let mut lines = BufReader::new(stderr).lines();
    let mut tail = VecDeque::with_capacity(tail_lines);

    while let Ok(Some(line)) = lines.next_line().await {
        debug!("ffmpeg: {}", line);
        if tail_lines == 0 {
            continue;
        }
        if tail.len() == tail_lines {
            tail.pop_front();
        }
        tail.push_back(line);
    }

    if tail.is_empty() {
        None
    } else {
        Some(Vec::from(tail).join("\n"))
    }
}

/// Encoded output of a running transcode.
///
/// Reads from ffmpeg's stdout. Dropping it closes the pipe.
#[derive(Debug)]
pub struct TranscodeStream {
    inner: ChildStdout,
}

impl AsyncRead for TranscodeStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}
