//! # Dictionary
//!
//! Herein is support for dictionary construction and pattern matching. All
//! runtime operations are performed against a [`Dictionary`], which is a
//! prefix tree of lowercase words. The solver interrogates the dictionary
//! with [patterns](Pattern), fixed letters interleaved with wildcards, and
//! the prefix tree lets a pattern query abandon a branch as soon as no word
//! starts with the letters committed so far.

use std::{
	collections::BTreeMap,
	fmt::{self, Display, Formatter},
	fs::File,
	io::{self, BufRead, BufReader, ErrorKind, Read, Write},
	path::Path,
	str::FromStr
};

use log::{trace, warn};
use pfx::PrefixTreeSet;
use serde::{Deserialize, Serialize};

////////////////////////////////////////////////////////////////////////////////
//                                 Patterns.                                  //
////////////////////////////////////////////////////////////////////////////////

/// One position of a [`Pattern`]: either a letter fixed by the partial
/// cipher, or a wildcard standing for a code that has not been assigned yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot
{
	/// The position must hold exactly this lowercase letter.
	Letter(char),

	/// The position may hold any lowercase letter.
	Any
}

/// A whole-word template used to query the [`Dictionary`]. A pattern of
/// length `n` matches a word iff the word also has length `n` and every
/// [`Slot::Letter`] position agrees with the corresponding character of the
/// word. Matching is anchored at both ends; a pattern never matches a mere
/// substring of a longer word.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct Pattern(Vec<Slot>);

impl Pattern
{
	/// Get the number of slots in the pattern, which is also the length of
	/// any word the pattern can match.
	#[inline]
	#[must_use]
	pub fn len(&self) -> usize { self.0.len() }

	/// Check if the pattern has no slots at all.
	#[inline]
	#[must_use]
	pub fn is_empty(&self) -> bool { self.0.is_empty() }

	/// Get the slots of the pattern, in word order.
	#[inline]
	#[must_use]
	pub fn slots(&self) -> &[Slot] { &self.0 }
}

impl FromIterator<Slot> for Pattern
{
	fn from_iter<T: IntoIterator<Item = Slot>>(iter: T) -> Self
	{
		Self(iter.into_iter().collect())
	}
}

impl FromStr for Pattern
{
	type Err = char;

	/// Parse a pattern from its display form: lowercase letters are fixed
	/// slots and underscores are wildcards. Any other character is reported
	/// as the error.
	fn from_str(s: &str) -> Result<Self, Self::Err>
	{
		s.chars()
			.map(|c| match c
			{
				'_' => Ok(Slot::Any),
				c if c.is_ascii_lowercase() => Ok(Slot::Letter(c)),
				c => Err(c)
			})
			.collect()
	}
}

impl Display for Pattern
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		for slot in &self.0
		{
			match slot
			{
				Slot::Letter(c) => write!(f, "{}", c)?,
				Slot::Any => write!(f, "_")?
			}
		}
		Ok(())
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                Dictionary.                                 //
////////////////////////////////////////////////////////////////////////////////

/// A dictionary is a [`PrefixTreeSet`] of lowercase words.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Dictionary(PrefixTreeSet<String>);

impl Dictionary
{
	/// Construct an empty dictionary. Same as [`Default::default`].
	///
	/// # Returns
	///
	/// An empty dictionary.
	#[inline]
	pub fn new() -> Self { Self(Default::default()) }

	/// Check if the dictionary is empty.
	///
	/// # Returns
	///
	/// `true` if the dictionary is empty, `false` otherwise.
	#[inline]
	#[must_use]
	pub fn is_empty(&self) -> bool { self.0.is_empty() }

	/// Check if the dictionary contains the given word.
	///
	/// # Arguments
	///
	/// * `word` - The word to check.
	///
	/// # Returns
	///
	/// `true` if the dictionary contains the word, `false` otherwise.
	#[inline]
	#[must_use]
	pub fn contains(&self, word: &str) -> bool { self.0.contains(word) }

	/// Populate the dictionary with the given words, lowercasing each one.
	///
	/// # Arguments
	///
	/// * `words` - The intended content of the dictionary.
	pub fn populate<T: AsRef<str>>(&mut self, words: &[T])
	{
		for word in words
		{
			self.0.insert(word.as_ref().to_lowercase());
		}
	}

	/// Check if any word in the dictionary matches the given pattern. The
	/// pattern is matched against whole words only: the word must have
	/// exactly as many letters as the pattern has slots.
	///
	/// The query walks the prefix tree rather than scanning the corpus. Each
	/// fixed slot extends the committed prefix by one letter; each wildcard
	/// tries the 26 letters in turn; either way, a branch is abandoned as
	/// soon as no dictionary word starts with the committed prefix.
	///
	/// # Arguments
	///
	/// * `pattern` - The pattern to match.
	///
	/// # Returns
	///
	/// `true` if at least one word matches the pattern, `false` otherwise.
	/// An empty pattern matches nothing.
	#[must_use]
	pub fn matches(&self, pattern: &Pattern) -> bool
	{
		if pattern.is_empty()
		{
			return false
		}
		let mut prefix = String::with_capacity(pattern.len());
		self.matches_from(pattern.slots(), &mut prefix)
	}

	/// Recursively match the remaining slots of a pattern, having already
	/// committed to the given prefix.
	///
	/// # Arguments
	///
	/// * `slots` - The slots not yet matched.
	/// * `prefix` - The letters committed so far. Restored to its incoming
	///   content before returning.
	///
	/// # Returns
	///
	/// `true` if some word completes the prefix in agreement with the
	/// remaining slots, `false` otherwise.
	fn matches_from(&self, slots: &[Slot], prefix: &mut String) -> bool
	{
		match slots.split_first()
		{
			None => self.0.contains(prefix.as_str()),
			Some((&Slot::Letter(c), rest)) =>
			{
				prefix.push(c);
				let found = self.0.contains_prefix(prefix.as_str())
					&& self.matches_from(rest, prefix);
				prefix.pop();
				found
			},
			Some((&Slot::Any, rest)) =>
			{
				for c in b'a'..=b'z'
				{
					prefix.push(c as char);
					let found = self.0.contains_prefix(prefix.as_str())
						&& self.matches_from(rest, prefix);
					prefix.pop();
					if found
					{
						return true
					}
				}
				false
			}
		}
	}

	/// Open the dictionary at the given path. If a binary dictionary (same
	/// path with a `dict` extension) exists _and_ is newer than the source
	/// file, it will be read; otherwise, the source file will be read and a
	/// binary dictionary will be created (to optimize future reads). A source
	/// file with a `json` extension is read as a word map; any other source
	/// file is read as a newline-delimited word list.
	///
	/// # Arguments
	///
	/// * `path` - The path of the source dictionary file.
	///
	/// # Returns
	///
	/// A dictionary containing the words from the file.
	///
	/// # Errors
	///
	/// * If the file cannot be opened or read, an error is returned.
	/// * If the file contains invalid data, an [`ErrorKind::InvalidData`] is
	///   returned.
	pub fn open<T: AsRef<Path>>(path: T) -> Result<Self, io::Error>
	{
		let path = path.as_ref();
		let cache_path = path.with_extension("dict");
		// Use the binary dictionary only if it's newer than the source file.
		// If anything goes wrong while comparing modification times, fall
		// back to reading the source file. Note that the `metadata` call
		// fails if the binary dictionary doesn't exist, so there's no
		// separate existence check.
		if cache_path
			.metadata()
			.and_then(|m| m.modified())
			.and_then(|cache_time| {
				path.metadata()
					.and_then(|n| n.modified())
					.map(|source_time| cache_time > source_time)
			})
			.unwrap_or(false)
		{
			let dictionary = Self::deserialize_from_file(&cache_path);
			trace!("Read binary dictionary: {}", cache_path.display());
			dictionary
		}
		else
		{
			let dictionary =
				if path.extension().is_some_and(|ext| ext == "json")
				{
					Self::read_from_json_file(path)?
				}
				else
				{
					Self::read_from_file(path)?
				};
			trace!("Read source dictionary: {}", path.display());
			match dictionary.serialize_to_file(&cache_path)
			{
				Ok(_) =>
				{
					trace!("Wrote binary dictionary: {}", cache_path.display())
				},
				Err(e) => warn!(
					"Failed to write binary dictionary: {}: {}",
					cache_path.display(),
					e
				)
			}
			Ok(dictionary)
		}
	}

	/// Construct a dictionary from the contents of the given file. Each
	/// nonempty line in the file is considered a single word.
	///
	/// # Arguments
	///
	/// * `path` - The target file.
	///
	/// # Returns
	///
	/// A dictionary containing the words from the file.
	///
	/// # Errors
	///
	/// If the file cannot be opened or read, an error is returned.
	pub fn read_from_file<T: AsRef<Path>>(path: T) -> Result<Self, io::Error>
	{
		let file = File::open(path)?;
		let reader = BufReader::new(file);
		let mut words = Vec::new();
		for line in reader.lines()
		{
			let line = line?;
			let word = line.trim();
			if !word.is_empty()
			{
				words.push(word.to_string());
			}
		}
		let mut dictionary = Self::new();
		dictionary.populate(&words);
		Ok(dictionary)
	}

	/// Construct a dictionary from the given JSON file. The file must contain
	/// a single object whose keys are the words; the values are ignored.
	///
	/// # Arguments
	///
	/// * `path` - The target file.
	///
	/// # Returns
	///
	/// A dictionary containing the words from the file.
	///
	/// # Errors
	///
	/// * If the file cannot be opened or read, an error is returned.
	/// * If the file is not a JSON object, an [`ErrorKind::InvalidData`] is
	///   returned.
	pub fn read_from_json_file<T: AsRef<Path>>(
		path: T
	) -> Result<Self, io::Error>
	{
		let file = File::open(path)?;
		let reader = BufReader::new(file);
		let map: BTreeMap<String, serde_json::Value> =
			serde_json::from_reader(reader)
				.map_err(|_e| ErrorKind::InvalidData)?;
		let words = map.keys().cloned().collect::<Vec<_>>();
		let mut dictionary = Self::new();
		dictionary.populate(&words);
		Ok(dictionary)
	}

	/// Deserialize a dictionary from the given file. The file must contain a
	/// serialized dictionary in [`bincode`](bincode) format.
	///
	/// # Arguments
	///
	/// * `path` - The target file.
	///
	/// # Returns
	///
	/// A dictionary deserialized from the file.
	///
	/// # Errors
	///
	/// * If the file cannot be opened or read, an error is returned.
	/// * If the file contains invalid data, an [`ErrorKind::InvalidData`] is
	///   returned.
	pub fn deserialize_from_file<T: AsRef<Path>>(
		path: T
	) -> Result<Self, io::Error>
	{
		let file = File::open(path)?;
		let mut reader = BufReader::new(file);
		let mut content = Vec::new();
		reader.read_to_end(&mut content)?;
		let dictionary = bincode::deserialize(&content)
			.map_err(|_e| ErrorKind::InvalidData)?;
		Ok(dictionary)
	}

	/// Serialize the dictionary to the given file. The dictionary is
	/// serialized in [`bincode`](bincode) format.
	///
	/// # Arguments
	///
	/// * `path` - The target file.
	///
	/// # Errors
	///
	/// * If the file cannot be opened or written, an error is returned.
	/// * If the dictionary cannot be serialized, an
	///   [`ErrorKind::InvalidData`] is returned.
	pub fn serialize_to_file<T: AsRef<Path>>(
		&self,
		path: T
	) -> Result<(), io::Error>
	{
		let mut file = File::create(path)?;
		let content =
			bincode::serialize(self).map_err(|_e| ErrorKind::InvalidData)?;
		file.write_all(&content)?;
		Ok(())
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use std::io::Write;

	use crate::dictionary::{Dictionary, Pattern, Slot};
	use tempfile::{NamedTempFile, TempDir};

	/// Test basic functionality of [`Dictionary`]:
	///
	/// * [`Dictionary::new`]
	/// * [`Dictionary::is_empty`]
	/// * [`Dictionary::populate`]
	/// * [`Dictionary::contains`]
	#[test]
	fn test_populate()
	{
		let mut dictionary = Dictionary::new();
		assert!(dictionary.is_empty());
		assert!(!dictionary.contains("hello"));
		assert!(!dictionary.contains("world"));
		dictionary.populate(&["hello", "World"]);
		assert!(!dictionary.is_empty());
		assert!(dictionary.contains("hello"));
		// Words are lowercased on entry.
		assert!(dictionary.contains("world"));
		assert!(!dictionary.contains("World"));
	}

	/// Test parsing and display of [`Pattern`].
	#[test]
	fn test_pattern_parse()
	{
		let pattern = "d_d".parse::<Pattern>().unwrap();
		assert_eq!(pattern.len(), 3);
		assert_eq!(
			pattern.slots(),
			&[Slot::Letter('d'), Slot::Any, Slot::Letter('d')]
		);
		assert_eq!(pattern.to_string(), "d_d");
		assert_eq!("dAd".parse::<Pattern>(), Err('A'));
		assert_eq!("d.d".parse::<Pattern>(), Err('.'));
		let empty = "".parse::<Pattern>().unwrap();
		assert!(empty.is_empty());
	}

	/// Test pattern matching against a small corpus:
	///
	/// * [`Dictionary::matches`]
	#[test]
	fn test_matches()
	{
		let mut dictionary = Dictionary::new();
		dictionary.populate(&["dad", "mom", "on", "no", "deed", "dread"]);
		let matches =
			|s: &str| dictionary.matches(&s.parse::<Pattern>().unwrap());
		// Fully fixed patterns are exact membership tests.
		assert!(matches("dad"));
		assert!(matches("mom"));
		assert!(!matches("dam"));
		// Wildcards accept any letter at their position.
		assert!(matches("d_d"));
		assert!(matches("m_m"));
		assert!(matches("__d"));
		assert!(matches("___"));
		assert!(matches("_o"));
		assert!(!matches("_a"));
		// Matching is anchored at both ends, so nothing shorter than a whole
		// word matches. "dad" is in the corpus, but no 1- or 2-letter word
		// is.
		assert!(!matches("a"));
		assert!(!matches("_"));
		assert!(!matches("da"));
		assert!(!matches("ad"));
		// "dread" is the only 5-letter word; it ends in 'd' but its second
		// letter is 'r'.
		assert!(matches("d___d"));
		assert!(!matches("do___"));
		assert!(!matches("______"));
		// The empty pattern matches nothing.
		assert!(!dictionary.matches(&Pattern::default()));
	}

	/// Test reading a newline-delimited dictionary from a file:
	///
	/// * [`Dictionary::read_from_file`]
	#[test]
	fn test_read_from_file()
	{
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "hello\nWORLD\n\ndad\n  mom  ").unwrap();
		let dictionary = Dictionary::read_from_file(file.path()).unwrap();
		assert!(dictionary.contains("hello"));
		assert!(dictionary.contains("world"));
		assert!(dictionary.contains("dad"));
		assert!(dictionary.contains("mom"));
		assert!(!dictionary.contains(""));
	}

	/// Test reading a JSON word-map dictionary from a file:
	///
	/// * [`Dictionary::read_from_json_file`]
	#[test]
	fn test_read_from_json_file()
	{
		let mut file = NamedTempFile::new().unwrap();
		write!(file, r#"{{"hello": 1, "WORLD": 1, "dad": true}}"#).unwrap();
		let dictionary = Dictionary::read_from_json_file(file.path()).unwrap();
		assert!(dictionary.contains("hello"));
		assert!(dictionary.contains("world"));
		assert!(dictionary.contains("dad"));
		assert!(!dictionary.contains("mom"));

		let mut file = NamedTempFile::new().unwrap();
		write!(file, "[1, 2, 3]").unwrap();
		assert!(Dictionary::read_from_json_file(file.path()).is_err());
	}

	/// Test serializing and deserializing a dictionary:
	///
	/// * [`Dictionary::serialize_to_file`]
	/// * [`Dictionary::deserialize_from_file`]
	#[test]
	fn test_serialize_to_file()
	{
		let mut dictionary = Dictionary::new();
		dictionary.populate(&["hello", "world", "dad", "mom"]);
		let file = NamedTempFile::new().unwrap();
		dictionary.serialize_to_file(file.path()).unwrap();
		let deserialized =
			Dictionary::deserialize_from_file(file.path()).unwrap();
		assert_eq!(dictionary, deserialized);
	}

	/// Test opening a dictionary with binary caching:
	///
	/// * [`Dictionary::open`]
	#[test]
	fn test_open()
	{
		let dir = TempDir::new().unwrap();
		let txt_path = dir.path().join("words.txt");
		std::fs::write(&txt_path, "hello\nworld\n").unwrap();
		let dictionary = Dictionary::open(&txt_path).unwrap();
		assert!(dictionary.contains("hello"));
		// The first open should have written the binary cache alongside.
		let cache_path = dir.path().join("words.dict");
		assert!(cache_path.exists());
		let cached = Dictionary::open(&txt_path).unwrap();
		assert_eq!(dictionary, cached);
	}
}
