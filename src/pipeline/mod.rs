//! The pipeline core: compiling a stored alias into process segments and
//! running them as a pipe-connected chain of OS processes, shell-free.

mod compile;
mod exec;

pub use compile::{compile, ResolveExecutable};
pub use exec::{run, OsSpawner, SegmentStatus, Spawner, SystemPath};

use std::path::PathBuf;

/// Exit code reported when the launcher itself fails (unknown alias, pipe
/// setup failure, launch failure) or the final segment is killed by a signal.
/// Distinct from a target program exiting 0 and outside the common small
/// exit codes.
pub const FAILURE_EXIT_CODE: i32 = 125;

/// One process in a compiled pipeline. Ephemeral: built by [`compile`],
/// consumed by [`run`], never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSegment {
    /// Program name as written in the template.
    pub program: String,
    /// Resolved path, or the unresolved name when lookup failed; the OS
    /// reports that failure at start time.
    pub path: PathBuf,
    /// Full argument vector; `argv[0]` is the program name.
    pub argv: Vec<String>,
}

/// Disposition of one standard stream of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSpec {
    /// Attached to the parent process's corresponding stream.
    Inherit,
    /// Read end of the pipe joining segments `i` and `i + 1`.
    PipeRead(usize),
    /// Write end of the pipe joining segments `i` and `i + 1`.
    PipeWrite(usize),
}

/// Stream wiring for one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentStreams {
    pub stdin: StreamSpec,
    pub stdout: StreamSpec,
    pub stderr: StreamSpec,
}

/// Plan the stream wiring for a pipeline of `count` segments: the first
/// segment reads the parent's stdin, the last writes the parent's stdout,
/// stderr is shared throughout, and pipe `i` joins segments `i` and `i + 1`.
pub fn plan_streams(count: usize) -> Vec<SegmentStreams> {
    (0..count)
        .map(|i| SegmentStreams {
            stdin: if i == 0 {
                StreamSpec::Inherit
            } else {
                StreamSpec::PipeRead(i - 1)
            },
            stdout: if i + 1 == count {
                StreamSpec::Inherit
            } else {
                StreamSpec::PipeWrite(i)
            },
            stderr: StreamSpec::Inherit,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment_inherits_everything() {
        assert_eq!(
            plan_streams(1),
            vec![SegmentStreams {
                stdin: StreamSpec::Inherit,
                stdout: StreamSpec::Inherit,
                stderr: StreamSpec::Inherit,
            }]
        );
    }

    #[test]
    fn interior_boundaries_get_one_pipe_each() {
        let streams = plan_streams(3);
        assert_eq!(streams[0].stdin, StreamSpec::Inherit);
        assert_eq!(streams[0].stdout, StreamSpec::PipeWrite(0));
        assert_eq!(streams[1].stdin, StreamSpec::PipeRead(0));
        assert_eq!(streams[1].stdout, StreamSpec::PipeWrite(1));
        assert_eq!(streams[2].stdin, StreamSpec::PipeRead(1));
        assert_eq!(streams[2].stdout, StreamSpec::Inherit);
        assert!(streams.iter().all(|s| s.stderr == StreamSpec::Inherit));
    }
}
