//! Template-to-pipeline compiler.
//!
//! Splits a stored argument list into process segments wherever an element
//! starts with the pipe sentinel. The scan is a fold over an ordered vector
//! of segment drafts; no mutable "current segment" pointer is carried across
//! iterations.

use crate::model::Alias;
use crate::pipeline::ProcessSegment;
use std::path::PathBuf;

const PIPE_SENTINEL: char = '|';

/// Search-path lookup behind a seam so compilation never touches the real
/// filesystem in tests.
pub trait ResolveExecutable {
    /// Path for `name`, or `None` when it cannot be resolved.
    fn resolve_executable(&self, name: &str) -> Option<PathBuf>;
}

/// One segment under construction. `program` stays unset after a bare `|`
/// until the next non-marker element names it.
#[derive(Debug, Default)]
struct SegmentDraft {
    program: Option<String>,
    argv: Vec<String>,
}

impl SegmentDraft {
    fn named(program: &str) -> Self {
        SegmentDraft {
            program: Some(program.to_string()),
            argv: vec![program.to_string()],
        }
    }
}

/// Compile an alias plus invocation-time trailing arguments into an ordered
/// pipeline of process segments.
///
/// An element starting with `|` closes the current segment; any remainder in
/// the same element names the next segment. Trailing arguments are appended
/// to the first segment only. Every compile yields at least one segment.
pub fn compile(
    alias: &Alias,
    trailing: &[String],
    resolver: &dyn ResolveExecutable,
) -> Vec<ProcessSegment> {
    let mut drafts = vec![SegmentDraft::named(&alias.program)];

    for arg in &alias.args {
        match arg.strip_prefix(PIPE_SENTINEL) {
            Some(rest) if rest.is_empty() => drafts.push(SegmentDraft::default()),
            Some(rest) => drafts.push(SegmentDraft::named(rest)),
            None => {
                let last = drafts.len() - 1;
                let current = &mut drafts[last];
                if current.program.is_none() {
                    // A bare `|` was just seen: this element names the new
                    // segment and becomes its argv[0], verbatim.
                    current.program = Some(arg.clone());
                    current.argv.push(arg.clone());
                } else {
                    current.argv.push(arg.clone());
                }
            }
        }
    }

    drafts[0].argv.extend(trailing.iter().cloned());

    drafts
        .into_iter()
        .map(|draft| {
            let program = draft.program.unwrap_or_default();
            let path = resolver
                .resolve_executable(&program)
                .unwrap_or_else(|| PathBuf::from(&program));
            ProcessSegment {
                program,
                path,
                argv: draft.argv,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct NoResolver;

    impl ResolveExecutable for NoResolver {
        fn resolve_executable(&self, _name: &str) -> Option<PathBuf> {
            None
        }
    }

    struct MapResolver(HashMap<String, PathBuf>);

    impl ResolveExecutable for MapResolver {
        fn resolve_executable(&self, name: &str) -> Option<PathBuf> {
            self.0.get(name).cloned()
        }
    }

    fn alias(program: &str, args: &[&str]) -> Alias {
        Alias {
            name: "t".to_string(),
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_markers_yield_one_segment_with_trailing_appended() {
        let segments = compile(
            &alias("git", &["log", "--oneline"]),
            &strings(&["-n", "5"]),
            &NoResolver,
        );

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].program, "git");
        assert_eq!(segments[0].argv, strings(&["git", "log", "--oneline", "-n", "5"]));
    }

    #[test]
    fn attached_marker_splits_and_names_the_next_segment() {
        let segments = compile(&alias("git", &["log", "|grep", "fix"]), &[], &NoResolver);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].argv, strings(&["git", "log"]));
        assert_eq!(segments[1].program, "grep");
        assert_eq!(segments[1].argv, strings(&["grep", "fix"]));
    }

    #[test]
    fn trailing_args_go_to_the_first_segment_only() {
        let segments = compile(
            &alias("git", &["log", "|grep", "fix", "|wc", "-l"]),
            &strings(&["--since", "1week"]),
            &NoResolver,
        );

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].argv, strings(&["git", "log", "--since", "1week"]));
        assert_eq!(segments[1].argv, strings(&["grep", "fix"]));
        assert_eq!(segments[2].argv, strings(&["wc", "-l"]));
    }

    #[test]
    fn bare_marker_defers_naming_to_the_next_element() {
        let segments = compile(&alias("cat", &["|", "grep", "bx"]), &[], &NoResolver);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].program, "grep");
        // The naming element is used in full, not a truncated form.
        assert_eq!(segments[1].argv, strings(&["grep", "bx"]));
    }

    #[test]
    fn consecutive_bare_markers_leave_an_empty_segment() {
        let segments = compile(&alias("cat", &["|", "|", "wc"]), &[], &NoResolver);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].program, "");
        assert!(segments[1].argv.is_empty());
        assert_eq!(segments[2].argv, strings(&["wc"]));
    }

    #[test]
    fn empty_args_still_yield_one_segment() {
        let segments = compile(&alias("ls", &[]), &strings(&["-la"]), &NoResolver);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].argv, strings(&["ls", "-la"]));
    }

    #[test]
    fn resolution_failure_falls_back_to_the_unresolved_name() {
        let segments = compile(&alias("nope", &[]), &[], &NoResolver);
        assert_eq!(segments[0].path, PathBuf::from("nope"));
    }

    #[test]
    fn resolved_programs_carry_their_looked_up_path() {
        let resolver = MapResolver(HashMap::from([
            ("cat".to_string(), PathBuf::from("/bin/cat")),
            ("grep".to_string(), PathBuf::from("/usr/bin/grep")),
        ]));
        let segments = compile(&alias("cat", &["|grep", "x"]), &[], &resolver);

        assert_eq!(segments[0].path, PathBuf::from("/bin/cat"));
        assert_eq!(segments[1].path, PathBuf::from("/usr/bin/grep"));
    }

    #[test]
    fn compilation_is_idempotent() {
        let stored = alias("git", &["log", "|", "grep", "fix"]);
        let trailing = strings(&["-p"]);

        let first = compile(&stored, &trailing, &NoResolver);
        let second = compile(&stored, &trailing, &NoResolver);
        assert_eq!(first, second);
    }
}
