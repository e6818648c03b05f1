//! # Puzzle
//!
//! Herein is the puzzle model and its JSON loader. A puzzle file is a single
//! object with two fields: `known_keys`, a map from decimal code strings to
//! single-letter strings, seeding the initial cipher; and `words`, an array
//! of word descriptors, each an array of codes giving the letter order of one
//! grid entry. JSON object keys are always strings, which is why the codes of
//! `known_keys` arrive as strings and are rectified during validation.

use std::{
	collections::BTreeMap,
	error::Error,
	fmt::{self, Display, Formatter},
	fs::File,
	io::{self, BufReader},
	path::Path
};

use log::debug;
use serde::Deserialize;

use crate::cipher::{CipherTable, Code, CODE_COUNT};

////////////////////////////////////////////////////////////////////////////////
//                             Word descriptors.                              //
////////////////////////////////////////////////////////////////////////////////

/// A word descriptor is the ordered sequence of codes spelling one entry of
/// the puzzle grid, one row or one column. Order matters: the first code is
/// the first letter of the target word.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct WordDescriptor(Vec<Code>);

impl WordDescriptor
{
	/// Construct a word descriptor from the given codes.
	///
	/// # Arguments
	///
	/// * `codes` - The codes of the descriptor, in letter order.
	///
	/// # Returns
	///
	/// The word descriptor.
	///
	/// # Errors
	///
	/// * [`PuzzleError::EmptyWord`] if `codes` is empty.
	/// * [`PuzzleError::CodeOutOfRange`] if any code is outside `1..=26`.
	pub fn new(codes: Vec<Code>) -> Result<Self, PuzzleError>
	{
		if codes.is_empty()
		{
			return Err(PuzzleError::EmptyWord)
		}
		for &code in &codes
		{
			if !(1..=CODE_COUNT as Code).contains(&code)
			{
				return Err(PuzzleError::CodeOutOfRange(code))
			}
		}
		Ok(Self(codes))
	}

	/// Get the codes of the descriptor, in letter order.
	#[inline]
	#[must_use]
	pub fn codes(&self) -> &[Code] { &self.0 }

	/// Get the length of the target word.
	#[inline]
	#[must_use]
	pub fn len(&self) -> usize { self.0.len() }

	/// Check if the descriptor is empty. Never true for a validated
	/// descriptor.
	#[inline]
	#[must_use]
	pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

////////////////////////////////////////////////////////////////////////////////
//                                  Puzzles.                                  //
////////////////////////////////////////////////////////////////////////////////

/// A puzzle comprises the word descriptors of the grid and the known seed
/// assignments supplied up front. Construction validates the structural
/// invariants, so a `Puzzle` value is always well-formed: every code is in
/// range, every descriptor is nonempty, and the seed assignments form an
/// injective partial mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Puzzle
{
	/// The seed assignments, as (code, letter) pairs in ascending code order.
	known_keys: Vec<(Code, char)>,

	/// The word descriptors of the grid, in puzzle order.
	words: Vec<WordDescriptor>
}

/// The raw shape of a puzzle file, prior to validation.
#[derive(Clone, Debug, Deserialize)]
struct RawPuzzle
{
	/// The known assignments, keyed by decimal code string.
	known_keys: BTreeMap<String, String>,

	/// The word descriptors, as raw code arrays.
	words: Vec<Vec<Code>>
}

impl Puzzle
{
	/// Construct a puzzle from the given seed assignments and word
	/// descriptors.
	///
	/// # Arguments
	///
	/// * `known_keys` - The seed assignments, as (code, letter) pairs.
	/// * `words` - The word descriptors of the grid.
	///
	/// # Returns
	///
	/// The validated puzzle.
	///
	/// # Errors
	///
	/// * [`PuzzleError::CodeOutOfRange`] if a seed code is outside `1..=26`.
	/// * [`PuzzleError::BadLetter`] if a seed letter is not a single ASCII
	///   letter.
	/// * [`PuzzleError::DuplicateCode`] if two seeds assign the same code.
	/// * [`PuzzleError::ConflictingLetter`] if two seeds assign the same
	///   letter to different codes.
	pub fn new(
		known_keys: Vec<(Code, char)>,
		words: Vec<WordDescriptor>
	) -> Result<Self, PuzzleError>
	{
		let mut seeds = Vec::with_capacity(known_keys.len());
		for (code, letter) in known_keys
		{
			if !(1..=CODE_COUNT as Code).contains(&code)
			{
				return Err(PuzzleError::CodeOutOfRange(code))
			}
			if !letter.is_ascii_alphabetic()
			{
				return Err(PuzzleError::BadLetter(letter.to_string()))
			}
			let letter = letter.to_ascii_lowercase();
			if seeds.iter().any(|&(c, _)| c == code)
			{
				return Err(PuzzleError::DuplicateCode(code))
			}
			// Two codes holding the same letter could never appear in a
			// solution, so reject the seed outright rather than search a
			// tree that is empty by construction.
			if seeds.iter().any(|&(_, l)| l == letter)
			{
				return Err(PuzzleError::ConflictingLetter(letter))
			}
			seeds.push((code, letter));
		}
		seeds.sort_unstable();
		Ok(Self { known_keys: seeds, words })
	}

	/// Get the seed assignments, in ascending code order.
	#[inline]
	#[must_use]
	pub fn known_keys(&self) -> &[(Code, char)] { &self.known_keys }

	/// Get the word descriptors, in puzzle order.
	#[inline]
	#[must_use]
	pub fn words(&self) -> &[WordDescriptor] { &self.words }

	/// Build the initial cipher table: the seed assignments merged into an
	/// otherwise unassigned table.
	///
	/// # Returns
	///
	/// The seed cipher table.
	#[inline]
	pub fn seed_table(&self) -> CipherTable
	{
		CipherTable::with_known_keys(&self.known_keys)
	}

	/// Parse and validate a puzzle from the given JSON text.
	///
	/// # Arguments
	///
	/// * `text` - The JSON text of the puzzle.
	///
	/// # Returns
	///
	/// The validated puzzle.
	///
	/// # Errors
	///
	/// * [`PuzzleError::Json`] if the text is not valid JSON of the expected
	///   shape.
	/// * [`PuzzleError::BadCode`] if a `known_keys` key is not a decimal
	///   code.
	/// * Any validation error of [`Puzzle::new`] or [`WordDescriptor::new`].
	pub fn from_json_str(text: &str) -> Result<Self, PuzzleError>
	{
		let raw: RawPuzzle = serde_json::from_str(text)?;
		Self::from_raw(raw)
	}

	/// Load and validate a puzzle from the given JSON file.
	///
	/// # Arguments
	///
	/// * `path` - The target file.
	///
	/// # Returns
	///
	/// The validated puzzle.
	///
	/// # Errors
	///
	/// * [`PuzzleError::Io`] if the file cannot be opened or read.
	/// * Any error of [`Puzzle::from_json_str`].
	pub fn read_from_file<T: AsRef<Path>>(path: T) -> Result<Self, PuzzleError>
	{
		let file = File::open(path.as_ref())?;
		let reader = BufReader::new(file);
		let raw: RawPuzzle = serde_json::from_reader(reader)?;
		let puzzle = Self::from_raw(raw)?;
		debug!(
			"Loaded puzzle: {} words, {} known keys: {}",
			puzzle.words.len(),
			puzzle.known_keys.len(),
			path.as_ref().display()
		);
		Ok(puzzle)
	}

	/// Validate a raw puzzle, rectifying the string-keyed `known_keys` map
	/// into (code, letter) pairs.
	///
	/// # Arguments
	///
	/// * `raw` - The raw puzzle.
	///
	/// # Returns
	///
	/// The validated puzzle.
	///
	/// # Errors
	///
	/// * [`PuzzleError::BadCode`] if a `known_keys` key is not a decimal
	///   code.
	/// * [`PuzzleError::BadLetter`] if a `known_keys` value is not a single
	///   letter.
	/// * Any validation error of [`Puzzle::new`] or [`WordDescriptor::new`].
	fn from_raw(raw: RawPuzzle) -> Result<Self, PuzzleError>
	{
		let mut known_keys = Vec::with_capacity(raw.known_keys.len());
		for (key, value) in &raw.known_keys
		{
			let code = key
				.parse::<Code>()
				.map_err(|_| PuzzleError::BadCode(key.clone()))?;
			let mut chars = value.chars();
			let letter = match (chars.next(), chars.next())
			{
				(Some(letter), None) => letter,
				_ => return Err(PuzzleError::BadLetter(value.clone()))
			};
			known_keys.push((code, letter));
		}
		let words = raw
			.words
			.into_iter()
			.map(WordDescriptor::new)
			.collect::<Result<Vec<_>, _>>()?;
		Self::new(known_keys, words)
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                  Errors.                                   //
////////////////////////////////////////////////////////////////////////////////

/// The complete enumeration of puzzle loading and validation errors. All of
/// these are fatal: a puzzle that fails to load is reported and the run
/// aborts before any search begins.
#[derive(Debug)]
pub enum PuzzleError
{
	/// The puzzle file could not be read.
	Io(io::Error),

	/// The puzzle file is not valid JSON of the expected shape.
	Json(serde_json::Error),

	/// A `known_keys` key is not a decimal integer.
	BadCode(String),

	/// A code is outside the valid range `1..=26`.
	CodeOutOfRange(Code),

	/// A `known_keys` value is not a single ASCII letter.
	BadLetter(String),

	/// Two `known_keys` entries assign the same code.
	DuplicateCode(Code),

	/// Two `known_keys` entries assign the same letter to different codes,
	/// which no injective solution could ever satisfy.
	ConflictingLetter(char),

	/// A word descriptor is empty.
	EmptyWord
}

impl Display for PuzzleError
{
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		match self
		{
			Self::Io(e) => write!(f, "cannot read puzzle: {}", e),
			Self::Json(e) => write!(f, "malformed puzzle JSON: {}", e),
			Self::BadCode(key) => write!(f, "bad code: {:?}", key),
			Self::CodeOutOfRange(code) =>
				write!(f, "code out of range 1..=26: {}", code),
			Self::BadLetter(value) => write!(f, "bad letter: {:?}", value),
			Self::DuplicateCode(code) =>
				write!(f, "duplicate known key for code {}", code),
			Self::ConflictingLetter(letter) => write!(
				f,
				"known keys assign letter {:?} to more than one code",
				letter
			),
			Self::EmptyWord => write!(f, "empty word descriptor")
		}
	}
}

impl Error for PuzzleError
{
	fn source(&self) -> Option<&(dyn Error + 'static)>
	{
		match self
		{
			Self::Io(e) => Some(e),
			Self::Json(e) => Some(e),
			_ => None
		}
	}
}

impl From<io::Error> for PuzzleError
{
	fn from(e: io::Error) -> Self { Self::Io(e) }
}

impl From<serde_json::Error> for PuzzleError
{
	fn from(e: serde_json::Error) -> Self { Self::Json(e) }
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test
{
	use std::io::Write;

	use crate::puzzle::{Puzzle, PuzzleError, WordDescriptor};
	use tempfile::NamedTempFile;

	/// Ensure that word descriptors are validated on construction.
	#[test]
	fn test_word_descriptor()
	{
		let word = WordDescriptor::new(vec![1, 2, 1]).unwrap();
		assert_eq!(word.codes(), &[1, 2, 1]);
		assert_eq!(word.len(), 3);
		assert!(!word.is_empty());
		assert!(matches!(
			WordDescriptor::new(vec![]),
			Err(PuzzleError::EmptyWord)
		));
		assert!(matches!(
			WordDescriptor::new(vec![1, 0]),
			Err(PuzzleError::CodeOutOfRange(0))
		));
		assert!(matches!(
			WordDescriptor::new(vec![27]),
			Err(PuzzleError::CodeOutOfRange(27))
		));
	}

	/// Ensure that a well-formed puzzle parses, rectifying the string-keyed
	/// `known_keys` map.
	#[test]
	fn test_from_json_str()
	{
		let puzzle = Puzzle::from_json_str(
			r#"{
				"known_keys": {"3": "o", "1": "D"},
				"words": [[1, 2, 1], [3, 4]]
			}"#
		)
		.unwrap();
		// Letters are lowercased; seeds are in ascending code order.
		assert_eq!(puzzle.known_keys(), &[(1, 'd'), (3, 'o')]);
		assert_eq!(puzzle.words().len(), 2);
		assert_eq!(puzzle.words()[0].codes(), &[1, 2, 1]);
		assert_eq!(puzzle.words()[1].codes(), &[3, 4]);
		let seed = puzzle.seed_table();
		assert_eq!(seed.get(1), Some('d'));
		assert_eq!(seed.get(2), None);
		assert_eq!(seed.get(3), Some('o'));
	}

	/// Ensure that malformed puzzles are rejected with the right errors.
	#[test]
	fn test_validation()
	{
		assert!(matches!(
			Puzzle::from_json_str("not json"),
			Err(PuzzleError::Json(_))
		));
		assert!(matches!(
			Puzzle::from_json_str(r#"{"words": [[1]]}"#),
			Err(PuzzleError::Json(_))
		));
		assert!(matches!(
			Puzzle::from_json_str(
				r#"{"known_keys": {"x": "a"}, "words": [[1]]}"#
			),
			Err(PuzzleError::BadCode(_))
		));
		assert!(matches!(
			Puzzle::from_json_str(
				r#"{"known_keys": {"0": "a"}, "words": [[1]]}"#
			),
			Err(PuzzleError::CodeOutOfRange(0))
		));
		assert!(matches!(
			Puzzle::from_json_str(
				r#"{"known_keys": {"1": "ab"}, "words": [[1]]}"#
			),
			Err(PuzzleError::BadLetter(_))
		));
		assert!(matches!(
			Puzzle::from_json_str(
				r#"{"known_keys": {"1": "?"}, "words": [[1]]}"#
			),
			Err(PuzzleError::BadLetter(_))
		));
		// "1" and "01" rectify to the same code.
		assert!(matches!(
			Puzzle::from_json_str(
				r#"{"known_keys": {"1": "a", "01": "b"}, "words": [[1]]}"#
			),
			Err(PuzzleError::DuplicateCode(1))
		));
		// Seeds violating injectivity are rejected eagerly at load time.
		assert!(matches!(
			Puzzle::from_json_str(
				r#"{"known_keys": {"1": "a", "2": "a"}, "words": [[1]]}"#
			),
			Err(PuzzleError::ConflictingLetter('a'))
		));
		assert!(matches!(
			Puzzle::from_json_str(
				r#"{"known_keys": {}, "words": [[1], []]}"#
			),
			Err(PuzzleError::EmptyWord)
		));
		assert!(matches!(
			Puzzle::from_json_str(
				r#"{"known_keys": {}, "words": [[1, 27]]}"#
			),
			Err(PuzzleError::CodeOutOfRange(27))
		));
	}

	/// Ensure that loading from a file works end to end:
	///
	/// * [`Puzzle::read_from_file`]
	#[test]
	fn test_read_from_file()
	{
		let mut file = NamedTempFile::new().unwrap();
		write!(
			file,
			r#"{{"known_keys": {{"5": "e"}}, "words": [[5, 1], [1, 5]]}}"#
		)
		.unwrap();
		let puzzle = Puzzle::read_from_file(file.path()).unwrap();
		assert_eq!(puzzle.known_keys(), &[(5, 'e')]);
		assert_eq!(puzzle.words().len(), 2);
		assert!(matches!(
			Puzzle::read_from_file("no/such/puzzle.json"),
			Err(PuzzleError::Io(_))
		));
	}
}
