//! Mock system implementation for testing

use super::{ProcessOutput, System, WalkEntry};
use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// A process launch recorded by [`MockSystem`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

/// In-memory implementation of System trait for testing
///
/// `MockSystem` keeps files and directories in memory and hands out scripted
/// process outputs in the order they were queued.
///
/// # Example
/// ```
/// use simregress::system::{mock::MockSystem, ProcessOutput, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_file("/refs/case.txt", b"Run command:\nbin/sim -m 1\n").unwrap()
///     .with_process_output("/build/bin/sim", ProcessOutput::success("# done\n")).unwrap();
///
/// assert!(system.is_file(Path::new("/refs/case.txt")));
/// let output = system
///     .run_process(Path::new("/build/bin/sim"), &[], Path::new("/build"))
///     .unwrap();
/// assert_eq!(output.stdout, "# done\n");
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
    processes: HashMap<PathBuf, VecDeque<ProcessOutput>>,
    invocations: Vec<Invocation>,
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                files: HashMap::new(),
                dirs: HashSet::from([PathBuf::from("/")]),
                processes: HashMap::new(),
                invocations: Vec::new(),
            })),
        }
    }

    /// Add a file with contents (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if let Some(parent) = path_buf.parent() {
            Self::ensure_parent_dirs(&mut state.dirs, parent);
        }

        state.files.insert(path_buf, contents.to_vec());
        drop(state);
        Ok(self)
    }

    /// Add a directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_dir<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Self::ensure_parent_dirs(&mut state.dirs, &path_buf);
        drop(state);
        Ok(self)
    }

    /// Queue the output of the next run of `program` (builder pattern)
    ///
    /// Outputs queued for the same program are handed out in order. Running a
    /// program with an empty queue fails as if the binary did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_process_output<P: AsRef<Path>>(
        self,
        program: P,
        output: ProcessOutput,
    ) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state
            .processes
            .entry(program.as_ref().to_path_buf())
            .or_default()
            .push_back(output);
        drop(state);
        Ok(self)
    }

    /// Contents of a file as UTF-8, if it exists
    #[must_use]
    pub fn file_contents<P: AsRef<Path>>(&self, path: P) -> Option<String> {
        let state = self.state.read().ok()?;
        state
            .files
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Every process launch so far, oldest first
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.state
            .read()
            .map(|state| state.invocations.clone())
            .unwrap_or_default()
    }

    #[inline]
    fn ensure_parent_dirs(dirs: &mut HashSet<PathBuf>, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor == Path::new("") {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        let bytes = state.files.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })?;
        let result = bytes.clone();
        drop(state);
        String::from_utf8(result)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }

    #[inline]
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !state.dirs.contains(parent)
        {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }

        if state.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("Is a directory: {}", path.display()),
            ));
        }

        state.files.insert(path.to_path_buf(), contents.to_vec());
        drop(state);
        Ok(())
    }

    #[inline]
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        if let Some(file) = path.ancestors().find(|a| state.files.contains_key(*a)) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Not a directory: {}", file.display()),
            ));
        }
        Self::ensure_parent_dirs(&mut state.dirs, path);
        drop(state);
        Ok(())
    }

    #[inline]
    fn exists(&self, path: &Path) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.files.contains_key(path) || state.dirs.contains(path))
    }

    #[inline]
    fn is_file(&self, path: &Path) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.files.contains_key(path))
    }

    #[inline]
    fn is_dir(&self, path: &Path) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.dirs.contains(path))
    }

    fn walk_dir(&self, path: &Path, max_depth: Option<usize>) -> io::Result<Vec<WalkEntry>> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !state.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Directory not found: {}", path.display()),
            ));
        }

        let within_depth = |candidate: &Path| {
            candidate
                .strip_prefix(path)
                .ok()
                .map(|rel| rel.components().count())
                .is_some_and(|depth| depth > 0 && max_depth.is_none_or(|max| depth <= max))
        };

        let mut entries: Vec<WalkEntry> = state
            .dirs
            .iter()
            .filter(|dir| within_depth(dir))
            .map(|dir| WalkEntry {
                path: dir.clone(),
                is_file: false,
                is_dir: true,
            })
            .chain(
                state
                    .files
                    .keys()
                    .filter(|file| within_depth(file))
                    .map(|file| WalkEntry {
                        path: file.clone(),
                        is_file: true,
                        is_dir: false,
                    }),
            )
            .collect();
        drop(state);

        // Component-wise path ordering matches a depth-first walk with sorted siblings
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn run_process(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> io::Result<ProcessOutput> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        state.invocations.push(Invocation {
            program: program.to_path_buf(),
            args: args.to_vec(),
            working_dir: working_dir.to_path_buf(),
        });

        let output = state
            .processes
            .get_mut(program)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("No such program: {}", program.display()),
                )
            })?;
        drop(state);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_create_parent_dirs() {
        let system = MockSystem::new().with_file("/a/b/c.txt", b"x").unwrap();
        assert!(system.is_dir(Path::new("/a")));
        assert!(system.is_dir(Path::new("/a/b")));
        assert!(system.is_file(Path::new("/a/b/c.txt")));
        assert!(!system.is_dir(Path::new("/a/b/c.txt")));
    }

    #[test]
    fn write_requires_parent() {
        let system = MockSystem::new();
        assert!(system.write(Path::new("/missing/out.txt"), b"x").is_err());
        system.create_dir_all(Path::new("/missing")).unwrap();
        system.write(Path::new("/missing/out.txt"), b"x").unwrap();
        assert_eq!(system.file_contents("/missing/out.txt").unwrap(), "x");
    }

    #[test]
    fn create_dir_over_file_fails() {
        let system = MockSystem::new().with_file("/results", b"").unwrap();
        assert!(system.create_dir_all(Path::new("/results/sub")).is_err());
    }

    #[test]
    fn walk_dir_depth_and_order() {
        let system = MockSystem::new()
            .with_file("/refs/b/two.txt", b"")
            .unwrap()
            .with_file("/refs/a.txt", b"")
            .unwrap()
            .with_dir("/refs/c")
            .unwrap();

        let all = system.walk_dir(Path::new("/refs"), None).unwrap();
        let paths: Vec<_> = all.iter().map(|e| e.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/refs/a.txt"),
                PathBuf::from("/refs/b"),
                PathBuf::from("/refs/b/two.txt"),
                PathBuf::from("/refs/c"),
            ]
        );

        let shallow = system.walk_dir(Path::new("/refs"), Some(1)).unwrap();
        assert_eq!(shallow.len(), 3);
    }

    #[test]
    fn scripted_processes_are_consumed_in_order() {
        let system = MockSystem::new()
            .with_process_output("/bin/sim", ProcessOutput::success("first"))
            .unwrap()
            .with_process_output("/bin/sim", ProcessOutput::failure(1, "second"))
            .unwrap();

        let args = vec!["-t".to_owned(), "0".to_owned()];
        let first = system
            .run_process(Path::new("/bin/sim"), &args, Path::new("/build"))
            .unwrap();
        let second = system
            .run_process(Path::new("/bin/sim"), &[], Path::new("/build"))
            .unwrap();
        assert_eq!(first.stdout, "first");
        assert_eq!(second.stderr, "second");
        assert!(
            system
                .run_process(Path::new("/bin/sim"), &[], Path::new("/build"))
                .is_err()
        );

        let invocations = system.invocations();
        assert_eq!(invocations.len(), 3);
        assert_eq!(invocations[0].args, args);
        assert_eq!(invocations[0].working_dir, PathBuf::from("/build"));
    }
}
