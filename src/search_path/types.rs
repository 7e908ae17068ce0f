use std::fmt;

/// How a search path entry is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
	/// A directory on the filesystem.
	FileSystem,

	/// A dotted, importable config package.
	PackageResource,
}

impl Schema {
	/// URI scheme prefix used when rendering entries.
	pub fn as_str(&self) -> &'static str {
		match self {
			Schema::FileSystem => "file",
			Schema::PackageResource => "pkg",
		}
	}
}

/// A single location in the config search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPathEntry {
	/// Who contributed this entry (`main` for user config, `cfgboot` for built-ins).
	pub provider: String,

	/// Directory path or dotted package name, depending on the schema.
	pub path: String,

	pub schema: Schema,
}

impl SearchPathEntry {
	pub fn new(provider: impl Into<String>, path: impl Into<String>, schema: Schema) -> Self {
		SearchPathEntry {
			provider: provider.into(),
			path: path.into(),
			schema,
		}
	}

	/// Render the entry as a URI, e.g. `file:///etc/app/conf` or `pkg://app.conf`.
	pub fn uri(&self) -> String {
		format!("{}://{}", self.schema.as_str(), self.path)
	}
}

impl fmt::Display for SearchPathEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.provider, self.uri())
	}
}

/// Matches search path entries by provider and/or path.
///
/// A query with neither field set matches every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPathQuery {
	pub provider: Option<String>,
	pub path: Option<String>,
}

impl SearchPathQuery {
	pub fn provider(provider: impl Into<String>) -> Self {
		SearchPathQuery {
			provider: Some(provider.into()),
			path: None,
		}
	}

	pub fn path(path: impl Into<String>) -> Self {
		SearchPathQuery {
			provider: None,
			path: Some(path.into()),
		}
	}

	pub fn matches(&self, entry: &SearchPathEntry) -> bool {
		let provider_ok = self.provider.as_deref().is_none_or(|p| p == entry.provider);
		let path_ok = self.path.as_deref().is_none_or(|p| p == entry.path);
		provider_ok && path_ok
	}
}

/// Ordered config search path. Earlier entries take priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSearchPath {
	entries: Vec<SearchPathEntry>,
}

impl ConfigSearchPath {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn entries(&self) -> &[SearchPathEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn append(&mut self, entry: SearchPathEntry) {
		self.entries.push(entry);
	}

	pub fn prepend(&mut self, entry: SearchPathEntry) {
		self.entries.insert(0, entry);
	}

	/// Insert right after the last entry matching `anchor`, or at the end if none matches.
	pub fn append_after(&mut self, anchor: &SearchPathQuery, entry: SearchPathEntry) {
		match self.find_last_match(anchor) {
			Some(index) => self.entries.insert(index + 1, entry),
			None => self.append(entry),
		}
	}

	/// Insert right before the first entry matching `anchor`, or at the start if none matches.
	pub fn prepend_before(&mut self, anchor: &SearchPathQuery, entry: SearchPathEntry) {
		match self.find_first_match(anchor) {
			Some(index) => self.entries.insert(index, entry),
			None => self.prepend(entry),
		}
	}

	pub fn find_first_match(&self, query: &SearchPathQuery) -> Option<usize> {
		self.entries.iter().position(|entry| query.matches(entry))
	}

	pub fn find_last_match(&self, query: &SearchPathQuery) -> Option<usize> {
		self.entries.iter().rposition(|entry| query.matches(entry))
	}
}

impl fmt::Display for ConfigSearchPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for entry in &self.entries {
			writeln!(f, "{}", entry)?;
		}
		Ok(())
	}
}
