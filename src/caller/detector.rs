use crate::error::{InitError, Result};
use crate::search_path::builder::normalize_path;
use std::fmt;
use std::panic::Location;
use std::path::{Path, PathBuf};

/// Classification of the code location that requested initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerContext {
	/// A script, test, or any other caller backed by a concrete file.
	File(PathBuf),

	/// An imported module, identified by its dotted name.
	Module(String),

	/// An interactively evaluated cell with no backing file.
	Interactive,
}

impl CallerContext {
	pub fn calling_file(&self) -> Option<&Path> {
		match self {
			CallerContext::File(path) => Some(path),
			_ => None,
		}
	}

	pub fn calling_module(&self) -> Option<&str> {
		match self {
			CallerContext::Module(name) => Some(name),
			_ => None,
		}
	}
}

impl fmt::Display for CallerContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CallerContext::File(path) => write!(f, "file {}", path.display()),
			CallerContext::Module(name) => write!(f, "module {}", name),
			CallerContext::Interactive => f.write_str("interactive"),
		}
	}
}

/// One frame of a call stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
	/// Source file backing the frame, if any.
	pub file: Option<PathBuf>,

	/// Module path of the frame, either dotted or `::`-separated.
	pub module: Option<String>,
}

impl Frame {
	pub fn file(path: impl Into<PathBuf>) -> Self {
		Frame {
			file: Some(path.into()),
			module: None,
		}
	}

	pub fn module(name: impl Into<String>) -> Self {
		Frame {
			file: None,
			module: Some(name.into()),
		}
	}

	/// A frame with neither a file nor a module, as produced by a notebook cell.
	pub fn interactive() -> Self {
		Frame::default()
	}

	/// Frame for a source file as `file!()` reports it, anchored at the
	/// manifest directory of the crate containing it.
	///
	/// `file!()` is relative to the directory cargo ran the compiler from,
	/// which is the workspace root for workspace members, so the manifest
	/// directory and then each of its ancestors is tried.
	/// Usually built through [`caller_frame!`](crate::caller_frame).
	pub fn from_source(manifest_dir: &str, file: &str, module: &str) -> Self {
		let manifest_dir = Path::new(manifest_dir);
		let file = Path::new(file);
		let resolved = if file.is_absolute() {
			file.to_path_buf()
		} else {
			manifest_dir
				.ancestors()
				.map(|dir| dir.join(file))
				.find(|candidate| candidate.is_file())
				.unwrap_or_else(|| manifest_dir.join(file))
		};

		Frame {
			file: Some(resolved),
			module: Some(module.to_string()),
		}
	}

	fn from_location(location: &Location<'_>) -> Self {
		Frame::file(location.file())
	}
}

/// Something that can tell who is calling at a given stack depth.
///
/// Depth 0 is the detector's own invocation point, depth 1 its direct caller.
pub trait DetectCaller {
	fn detect(&self, stack_depth: usize) -> Result<CallerContext>;
}

/// An ordered call stack, innermost frame first.
#[derive(Debug, Clone)]
pub struct CallStack {
	frames: Vec<Frame>,
}

impl CallStack {
	/// Capture the stack as seen from the current call site.
	///
	/// Frame 0 is this crate and frame 1 is the nearest caller that is not
	/// itself `#[track_caller]`. Deeper frames are read from the process
	/// backtrace, anchored at the compiler-reported caller location, and
	/// carry the absolute source paths recorded in debug info.
	///
	/// Without debug info only the caller location is known: the stack then
	/// has two frames, and the caller file is the path `file!()` reports,
	/// taken relative to the working directory. Use [`caller_frame!`](crate::caller_frame)
	/// with [`CallStack::from_callers`] to anchor explicitly in that case.
	#[track_caller]
	pub fn capture() -> Self {
		let location = Location::caller();
		let callers =
			resolved_callers(location).unwrap_or_else(|| vec![Frame::from_location(location)]);
		CallStack::from_callers(callers)
	}

	/// Build a stack from explicit caller frames, direct caller first.
	pub fn from_callers(callers: impl IntoIterator<Item = Frame>) -> Self {
		let mut frames = vec![own_frame()];
		frames.extend(callers);
		CallStack { frames }
	}

	pub fn len(&self) -> usize {
		self.frames.len()
	}

	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}
}

/// A resolved backtrace symbol.
struct ResolvedSymbol {
	file: Option<PathBuf>,
	line: Option<u32>,
	module: Option<String>,
}

impl ResolvedSymbol {
	fn from_symbol(symbol: &backtrace::BacktraceSymbol) -> Self {
		// `{:#}` drops the trailing hash; the last path segment is the function
		let module = symbol.name().and_then(|name| {
			let name = format!("{:#}", name);
			name.rsplit_once("::").map(|(module, _)| module.to_string())
		});

		ResolvedSymbol {
			file: symbol.filename().map(Path::to_path_buf),
			line: symbol.lineno(),
			module,
		}
	}

	fn is_at(&self, location: &Location<'_>) -> bool {
		self.line == Some(location.line())
			&& self
				.file
				.as_deref()
				.is_some_and(|file| file.ends_with(location.file()))
	}

	fn into_frame(self) -> Frame {
		Frame {
			file: self.file,
			module: self.module,
		}
	}
}

/// Walk the backtrace from the frame at `location` outwards.
///
/// Returns `None` when no symbol matches, e.g. without debug info.
fn resolved_callers(location: &Location<'_>) -> Option<Vec<Frame>> {
	let backtrace = backtrace::Backtrace::new();
	let symbols: Vec<ResolvedSymbol> = backtrace
		.frames()
		.iter()
		.flat_map(|frame| frame.symbols())
		.map(ResolvedSymbol::from_symbol)
		.collect();

	let start = symbols.iter().position(|symbol| symbol.is_at(location))?;
	Some(
		symbols
			.into_iter()
			.skip(start)
			.map(ResolvedSymbol::into_frame)
			.collect(),
	)
}

impl DetectCaller for CallStack {
	fn detect(&self, stack_depth: usize) -> Result<CallerContext> {
		let frame = self.frames.get(stack_depth).ok_or(InitError::Detection {
			depth: stack_depth,
			available: self.frames.len(),
		})?;

		let context = classify(frame)?;
		tracing::debug!(stack_depth, caller = %context, "Detected caller");
		Ok(context)
	}
}

// Depth 0 is reported as this module, never as a source file
fn own_frame() -> Frame {
	Frame::module(module_path!())
}

/// Classify a frame: concrete file first, then module, otherwise interactive.
fn classify(frame: &Frame) -> Result<CallerContext> {
	if let Some(file) = &frame.file
		&& !is_synthetic(file)
	{
		return absolute_file(file).map(CallerContext::File);
	}

	match &frame.module {
		Some(module) if !module.is_empty() => Ok(CallerContext::Module(module.replace("::", "."))),
		_ => Ok(CallerContext::Interactive),
	}
}

/// Interactive environments report no file or an anonymous one such as `<stdin>`.
fn is_synthetic(file: &Path) -> bool {
	let name = file.to_string_lossy();
	name.is_empty() || (name.starts_with('<') && name.ends_with('>'))
}

fn absolute_file(file: &Path) -> Result<PathBuf> {
	let absolute = std::path::absolute(file).map_err(|source| InitError::CurrentDir { source })?;
	Ok(normalize_path(&absolute))
}
