//! Drives the external C compiler against a candidate artifact and
//! prunes the selection based on its diagnostics.
use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::Result;

use crate::{
    emitter::{emit, Emission, LineMapEntry},
    inliner::Inliner,
    resolve::{HeaderResolver, SystemIncludePaths},
};

const MAX_CAPTURED_OUTPUT_BYTES: usize = 64 * 1024;
const OFFENDER_MARKERS: [&str; 2] = ["redefinition of", "conflicting types"];

/// The capability the Compile Loop needs from a C compiler: check a file
/// in syntax-only mode and report its exit status and combined output.
/// Injected so tests can substitute a fake compiler returning canned
/// diagnostics.
pub trait SyntaxChecker {
    fn check(&self, path: &Path) -> Result<(i32, String)>;
}

/// Invokes the host C compiler (`cc -fsyntax-only -x c <path>`).
pub struct HostCompiler {
    pub compiler_path: PathBuf,
}

impl SyntaxChecker for HostCompiler {
    fn check(&self, path: &Path) -> Result<(i32, String)> {
        let output = Command::new(&self.compiler_path)
            .args(["-fsyntax-only", "-x", "c"])
            .arg(path)
            .output()?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        if combined.len() > MAX_CAPTURED_OUTPUT_BYTES {
            let mut boundary = MAX_CAPTURED_OUTPUT_BYTES;
            while !combined.is_char_boundary(boundary) {
                boundary -= 1;
            }
            combined.truncate(boundary);
        }

        Ok((output.status.code().unwrap_or(-1), combined))
    }
}

/// Parses the compiler's combined output for the first redefinition-style
/// diagnostic and returns the 1-based artifact line number it reports.
fn find_offending_line(output: &str) -> Option<usize> {
    let marker_idx = OFFENDER_MARKERS
        .iter()
        .filter_map(|marker| output.find(marker))
        .min()?;

    let line_start = output[..marker_idx].rfind('\n').map_or(0, |idx| idx + 1);
    let line_end = output[marker_idx..]
        .find('\n')
        .map_or(output.len(), |idx| marker_idx + idx);
    let diagnostic_line = &output[line_start..line_end];

    diagnostic_line
        .split(':')
        .find_map(|segment| segment.trim().parse::<usize>().ok())
}

fn find_offender(line_map: &[LineMapEntry], line_number: usize) -> Option<PathBuf> {
    line_map
        .iter()
        .find(|entry| (entry.start_line..=entry.end_line).contains(&line_number))
        .map(|entry| entry.source_path.clone())
}

/// Outcome of running the compile loop to convergence (or giving up).
pub struct CompileLoopOutcome {
    pub selection: Vec<PathBuf>,
    pub emission: Emission,
    pub iterations: usize,
    pub converged: bool,
}

/// Regenerates the candidate artifact each iteration, checks it with
/// `checker`, and removes one offending file per failed iteration until
/// it compiles cleanly, the selection runs dry, or `max_iterations` is
/// exhausted.
pub fn run(
    repo_name: &str,
    repo_root: &Path,
    mut selection: Vec<PathBuf>,
    header_sweep: Option<&[PathBuf]>,
    system_paths: &SystemIncludePaths,
    checker: &dyn SyntaxChecker,
    max_iterations: usize,
) -> Result<CompileLoopOutcome> {
    let mut last_emission: Option<Emission> = None;
    let mut iterations = 0;

    while iterations < max_iterations {
        if selection.is_empty() {
            log::warn!("Compile loop selection is empty, stopping");
            break;
        }
        iterations += 1;

        let resolver = HeaderResolver::new(repo_root, system_paths);
        let mut inliner = Inliner::new(resolver);
        let emission = emit(repo_name, repo_root, &selection, &mut inliner, header_sweep)?;

        let temp_file = tempfile::Builder::new()
            .prefix("giga-header-")
            .suffix(".c")
            .tempfile()?;
        std::fs::write(temp_file.path(), &emission.artifact)?;

        let check_result = checker.check(temp_file.path());
        drop(temp_file); // deleted on both success and error paths below

        let (exit_code, output) = match check_result {
            Ok(result) => result,
            Err(err) => {
                log::warn!("Syntax-only compiler probe failed to execute: {err:#}");
                last_emission = Some(emission);
                return Ok(CompileLoopOutcome {
                    selection,
                    emission: last_emission.unwrap(),
                    iterations,
                    converged: false,
                });
            }
        };

        if exit_code == 0 {
            log::debug!("Compile loop converged after {iterations} iteration(s)");
            return Ok(CompileLoopOutcome {
                selection,
                emission,
                iterations,
                converged: true,
            });
        }

        let Some(line) = find_offending_line(&output) else {
            log::debug!("Compiler diagnostic was unparseable, using last candidate as-is");
            last_emission = Some(emission);
            break;
        };
        let Some(offender) = find_offender(&emission.line_map, line) else {
            log::debug!("Offending line {line} did not map to any selected file, giving up");
            last_emission = Some(emission);
            break;
        };

        log::info!("Removing {:?} after compiler diagnostic at line {}", offender, line);
        selection.retain(|path| path != &offender);
        last_emission = Some(emission);
    }

    let emission = match last_emission {
        Some(emission) => emission,
        None => {
            let resolver = HeaderResolver::new(repo_root, system_paths);
            let mut inliner = Inliner::new(resolver);
            emit(repo_name, repo_root, &selection, &mut inliner, header_sweep)?
        }
    };

    Ok(CompileLoopOutcome {
        selection,
        emission,
        iterations,
        converged: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, fs};
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        fs::write(&path, content).unwrap();
        path.canonicalize().unwrap()
    }

    #[test]
    fn parses_gcc_style_redefinition_diagnostic() {
        let output = "/tmp/x.c:42:5: error: redefinition of 'g'\n/tmp/x.c:10:5: note: previous definition is here\n";
        assert_eq!(find_offending_line(output), Some(42));
    }

    #[test]
    fn parses_clang_style_conflicting_types_diagnostic() {
        let output = "/tmp/x.c:7:1: error: conflicting types for 'g'\n";
        assert_eq!(find_offending_line(output), Some(7));
    }

    #[test]
    fn unrelated_diagnostics_are_unparseable() {
        assert_eq!(find_offending_line("/tmp/x.c:1:1: error: expected ';'\n"), None);
    }

    /// A fake compiler that fails once for a line belonging to `fail_path`,
    /// then succeeds once that file has been removed.
    struct FailOnceCompiler {
        remaining_failures: RefCell<usize>,
        fail_line: usize,
    }

    impl SyntaxChecker for FailOnceCompiler {
        fn check(&self, _path: &Path) -> Result<(i32, String)> {
            let mut remaining = self.remaining_failures.borrow_mut();
            if *remaining > 0 {
                *remaining -= 1;
                Ok((
                    1,
                    format!("artifact.c:{}:1: error: redefinition of 'g'\n", self.fail_line),
                ))
            } else {
                Ok((0, String::new()))
            }
        }
    }

    #[test]
    fn prunes_offending_file_and_converges() {
        let repo = TempDir::new().unwrap();
        let a = write(repo.path(), "a.c", "int g(void){return 0;}\n");
        let b = write(repo.path(), "b.c", "int h(void){return 1;}\n");
        let system = SystemIncludePaths::from_dirs(vec![]);

        // First emitted artifact has a.c's "int g(void){return 0;}" at
        // some known line; point the fake failure there so the second
        // iteration removes a.c and converges.
        let resolver = HeaderResolver::new(repo.path(), &system);
        let mut inliner = Inliner::new(resolver);
        let first = emit("lib", repo.path(), &[a.clone(), b.clone()], &mut inliner, None).unwrap();
        let fail_line = first.line_map[0].start_line;

        let checker = FailOnceCompiler {
            remaining_failures: RefCell::new(1),
            fail_line,
        };

        let outcome = run(
            "lib",
            repo.path(),
            vec![a.clone(), b.clone()],
            None,
            &system,
            &checker,
            10,
        )
        .unwrap();

        assert!(outcome.converged);
        assert_eq!(outcome.selection, vec![b]);
        assert_eq!(outcome.iterations, 2);
    }

    struct AlwaysFailCompiler;
    impl SyntaxChecker for AlwaysFailCompiler {
        fn check(&self, _path: &Path) -> Result<(i32, String)> {
            Ok((1, "garbage output with no useful diagnostic\n".to_string()))
        }
    }

    #[test]
    fn stops_on_unparseable_diagnostic_without_looping_forever() {
        let repo = TempDir::new().unwrap();
        let a = write(repo.path(), "a.c", "int g(void){return 0;}\n");
        let system = SystemIncludePaths::from_dirs(vec![]);

        let outcome = run("lib", repo.path(), vec![a], None, &system, &AlwaysFailCompiler, 10).unwrap();
        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 1);
    }
}
