//! Pipeline executor: pre-allocated anonymous pipes, ordered start, ordered
//! wait, last segment's exit code.
//!
//! All inter-segment pipes exist before the first process starts, so no
//! segment can block on a pipe that is not there yet. A start failure aborts
//! the launch loop; segments already started are not torn down and finish or
//! fail on their own (their stdio is inherited, so nothing runs detached from
//! the user's terminal).

use super::{plan_streams, ProcessSegment, SegmentStreams, StreamSpec, FAILURE_EXIT_CODE};
use crate::pipeline::ResolveExecutable;
use anyhow::{anyhow, Context, Result};
use std::io::{PipeReader, PipeWriter};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// How a waited-on segment ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStatus {
    Exited(i32),
    /// Killed by a signal; there is no exit code to report.
    Signaled,
}

/// OS process and pipe primitives behind a seam, so the executor's wiring
/// and ordering can be exercised with a recording fake.
pub trait Spawner {
    /// Allocate the inter-segment pipes, one per adjacent pair, before
    /// anything starts.
    fn allocate_pipes(&mut self, count: usize) -> Result<()>;
    /// Start one segment with the given stream wiring.
    fn start(&mut self, segment: &ProcessSegment, streams: SegmentStreams) -> Result<()>;
    /// Block until the segment started by the `index`-th `start` call exits.
    fn wait(&mut self, index: usize) -> Result<SegmentStatus>;
}

/// Run a compiled pipeline to completion and report its exit code.
///
/// Segments start and are waited on in pipeline order. Only the last
/// segment's exit code is surfaced; a last segment killed by a signal
/// reports [`FAILURE_EXIT_CODE`].
pub fn run(segments: &[ProcessSegment], spawner: &mut dyn Spawner) -> Result<i32> {
    let streams = plan_streams(segments.len());
    spawner.allocate_pipes(segments.len().saturating_sub(1))?;

    for (segment, streams) in segments.iter().zip(streams) {
        spawner.start(segment, streams)?;
    }

    let mut code = 0;
    for index in 0..segments.len() {
        let status = spawner.wait(index)?;
        if index == segments.len() - 1 {
            code = match status {
                SegmentStatus::Exited(code) => code,
                SegmentStatus::Signaled => FAILURE_EXIT_CODE,
            };
        }
    }
    Ok(code)
}

/// The real spawner: anonymous OS pipes plus `std::process::Command`.
///
/// Each pipe end is handed to exactly one child at spawn time and dropped in
/// the parent right after, so writers close when their segment exits and
/// readers see EOF.
#[derive(Default)]
pub struct OsSpawner {
    pipes: Vec<(Option<PipeReader>, Option<PipeWriter>)>,
    children: Vec<Child>,
}

impl OsSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    fn take_stdio(&mut self, spec: StreamSpec) -> Result<Stdio> {
        match spec {
            StreamSpec::Inherit => Ok(Stdio::inherit()),
            StreamSpec::PipeRead(i) => self
                .pipes
                .get_mut(i)
                .and_then(|(reader, _)| reader.take())
                .map(Stdio::from)
                .ok_or_else(|| anyhow!("read end of pipe {i} is not available")),
            StreamSpec::PipeWrite(i) => self
                .pipes
                .get_mut(i)
                .and_then(|(_, writer)| writer.take())
                .map(Stdio::from)
                .ok_or_else(|| anyhow!("write end of pipe {i} is not available")),
        }
    }
}

impl Spawner for OsSpawner {
    fn allocate_pipes(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            let (reader, writer) = std::io::pipe().context("allocating pipe")?;
            self.pipes.push((Some(reader), Some(writer)));
        }
        Ok(())
    }

    fn start(&mut self, segment: &ProcessSegment, streams: SegmentStreams) -> Result<()> {
        let mut command = Command::new(&segment.path);
        command.args(segment.argv.iter().skip(1));
        command.stdin(self.take_stdio(streams.stdin)?);
        command.stdout(self.take_stdio(streams.stdout)?);
        // stderr stays attached to the parent for every segment.

        let child = command
            .spawn()
            .with_context(|| format!("starting `{}`", segment.program))?;
        self.children.push(child);
        Ok(())
    }

    fn wait(&mut self, index: usize) -> Result<SegmentStatus> {
        let child = self
            .children
            .get_mut(index)
            .ok_or_else(|| anyhow!("segment {index} was never started"))?;
        let status = child.wait().context("waiting for pipeline segment")?;
        Ok(match status.code() {
            Some(code) => SegmentStatus::Exited(code),
            None => SegmentStatus::Signaled,
        })
    }
}

/// `PATH`-walking executable resolver. Names containing a path separator are
/// checked directly instead of searched.
pub struct SystemPath;

impl ResolveExecutable for SystemPath {
    fn resolve_executable(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        let direct = Path::new(name);
        if direct.components().count() > 1 {
            return is_executable(direct).then(|| direct.to_path_buf());
        }
        let path_var = std::env::var_os("PATH")?;
        std::env::split_paths(&path_var)
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable(candidate))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
