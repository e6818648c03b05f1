//! # Cipher
//!
//! Herein are the core value types of the solver: the [`CipherTable`], a
//! partial injective mapping from numeric codes to lowercase letters, and the
//! [`FrequencyTable`], which counts how often each code occurs in a puzzle.
//! Cipher tables are persistent values: extending a table produces a new
//! table and leaves the parent untouched, which is what makes backtracking a
//! matter of simply abandoning a subtree.

use std::fmt::{self, Display, Formatter};

use crate::{
	dictionary::{Pattern, Slot},
	puzzle::WordDescriptor
};

////////////////////////////////////////////////////////////////////////////////
//                                Definitions.                                //
////////////////////////////////////////////////////////////////////////////////

/// A numeric code standing for one unknown letter of the cipher. Valid codes
/// are `1..=26`.
pub type Code = u8;

/// The number of distinct codes (and letters) in a codeword puzzle.
pub const CODE_COUNT: usize = 26;

/// The lowercase letters in descending order of English letter frequency.
/// Candidate letters are proposed in this order, so that the letters most
/// likely to appear in actual words are tried first.
pub const LETTERS_BY_FREQUENCY: [char; CODE_COUNT] = [
	'e', 't', 'a', 'o', 'i', 'n', 's', 'r', 'h', 'd', 'l', 'u', 'c', 'm',
	'f', 'y', 'w', 'g', 'p', 'b', 'v', 'k', 'x', 'q', 'j', 'z'
];

/// Get an iterator over all valid codes, in ascending order.
///
/// # Returns
///
/// An iterator over `1..=26`.
#[inline]
pub fn codes() -> impl Iterator<Item = Code>
{
	1..=CODE_COUNT as Code
}

////////////////////////////////////////////////////////////////////////////////
//                               Cipher tables.                               //
////////////////////////////////////////////////////////////////////////////////

/// A cipher table maps each code to an optional lowercase letter. The table
/// is always a partial injective function: no two codes ever hold the same
/// letter. A table is _complete_ when every code holds a letter.
///
/// Tables are immutable values. [`assign`](Self::assign) returns a new table
/// extended by one entry; every node of the search tree owns its own table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct CipherTable([Option<char>; CODE_COUNT]);

impl CipherTable
{
	/// Construct a table with every code unassigned. Same as
	/// [`Default::default`].
	///
	/// # Returns
	///
	/// An empty cipher table.
	#[inline]
	pub fn new() -> Self { Self([None; CODE_COUNT]) }

	/// Construct a table seeded with the given known assignments. The
	/// assignments must be valid and mutually injective; the puzzle loader
	/// enforces this before any table is built.
	///
	/// # Arguments
	///
	/// * `known_keys` - The seed assignments, as (code, letter) pairs.
	///
	/// # Returns
	///
	/// A cipher table holding exactly the seed assignments.
	pub fn with_known_keys(known_keys: &[(Code, char)]) -> Self
	{
		known_keys
			.iter()
			.fold(Self::new(), |table, &(code, letter)| {
				table.assign(code, letter)
			})
	}

	/// Get the letter assigned to the given code, if any.
	///
	/// # Arguments
	///
	/// * `code` - The code to look up.
	///
	/// # Returns
	///
	/// The letter assigned to the code, or `None` if the code is unassigned.
	#[inline]
	#[must_use]
	pub fn get(&self, code: Code) -> Option<char>
	{
		self.0[Self::index(code)]
	}

	/// Produce a new table with the given code mapped to the given letter.
	/// The receiver is untouched. The code must be unassigned and the letter
	/// must be unused, preserving injectivity.
	///
	/// # Arguments
	///
	/// * `code` - The code to assign.
	/// * `letter` - The letter to assign to the code.
	///
	/// # Returns
	///
	/// The extended table.
	pub fn assign(&self, code: Code, letter: char) -> Self
	{
		debug_assert!(self.get(code).is_none());
		debug_assert!(!self.uses_letter(letter));
		let mut entries = self.0;
		entries[Self::index(code)] = Some(letter);
		Self(entries)
	}

	/// Check if every code holds a letter.
	///
	/// # Returns
	///
	/// `true` if the table is complete, `false` otherwise.
	#[inline]
	#[must_use]
	pub fn is_complete(&self) -> bool
	{
		self.0.iter().all(Option::is_some)
	}

	/// Check if some code already holds the given letter.
	///
	/// # Arguments
	///
	/// * `letter` - The letter to look for.
	///
	/// # Returns
	///
	/// `true` if the letter is already in use, `false` otherwise.
	#[inline]
	#[must_use]
	pub fn uses_letter(&self, letter: char) -> bool
	{
		self.0.iter().any(|&entry| entry == Some(letter))
	}

	/// Check that no two codes hold the same letter. This always holds for
	/// tables built through [`assign`](Self::assign); it exists so that the
	/// invariant can be checked mechanically.
	///
	/// # Returns
	///
	/// `true` if the table is injective, `false` otherwise.
	#[must_use]
	pub fn is_injective(&self) -> bool
	{
		let mut seen = [false; CODE_COUNT];
		for letter in self.0.iter().flatten()
		{
			let index = (*letter as u8 - b'a') as usize;
			if seen[index]
			{
				return false
			}
			seen[index] = true;
		}
		true
	}

	/// Build the dictionary pattern for the given word descriptor under this
	/// table: each assigned code contributes its letter as a fixed slot, and
	/// each unassigned code contributes a wildcard.
	///
	/// # Arguments
	///
	/// * `word` - The word descriptor to decipher.
	///
	/// # Returns
	///
	/// The pattern describing every word the descriptor could still spell.
	pub fn pattern_for(&self, word: &WordDescriptor) -> Pattern
	{
		word.codes()
			.iter()
			.map(|&code| match self.get(code)
			{
				Some(letter) => Slot::Letter(letter),
				None => Slot::Any
			})
			.collect()
	}

	/// Decipher the given word descriptor through this table.
	///
	/// # Arguments
	///
	/// * `word` - The word descriptor to decipher.
	///
	/// # Returns
	///
	/// The deciphered word, or `None` if any of the descriptor's codes is
	/// still unassigned.
	#[must_use]
	pub fn decipher(&self, word: &WordDescriptor) -> Option<String>
	{
		word.codes().iter().map(|&code| self.get(code)).collect()
	}

	/// Get the array index for the given code.
	///
	/// # Arguments
	///
	/// * `code` - The code, in `1..=26`.
	///
	/// # Returns
	///
	/// The corresponding index, in `0..26`.
	#[inline]
	#[must_use]
	fn index(code: Code) -> usize
	{
		debug_assert!((1..=CODE_COUNT as Code).contains(&code));
		(code - 1) as usize
	}
}

impl Display for CipherTable
{
	/// Render the table as 26 characters, one per code in ascending order,
	/// with `_` standing for an unassigned code.
	fn fmt(&self, f: &mut Formatter) -> fmt::Result
	{
		for entry in &self.0
		{
			write!(f, "{}", entry.unwrap_or('_'))?;
		}
		Ok(())
	}
}

////////////////////////////////////////////////////////////////////////////////
//                             Frequency tables.                              //
////////////////////////////////////////////////////////////////////////////////

/// A frequency table counts the occurrences of each code across all word
/// descriptors of a puzzle. It is computed once per puzzle and never changes
/// thereafter; the solver consults it to pick the most constraining code to
/// assign next.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct FrequencyTable([u32; CODE_COUNT]);

impl FrequencyTable
{
	/// Count the occurrences of each code across the given word descriptors.
	///
	/// # Arguments
	///
	/// * `words` - The word descriptors of the puzzle.
	///
	/// # Returns
	///
	/// The frequency table for the puzzle.
	pub fn tally(words: &[WordDescriptor]) -> Self
	{
		let mut counts = [0u32; CODE_COUNT];
		for word in words
		{
			for &code in word.codes()
			{
				counts[CipherTable::index(code)] += 1;
			}
		}
		Self(counts)
	}

	/// Get the occurrence count for the given code.
	///
	/// # Arguments
	///
	/// * `code` - The code to look up.
	///
	/// # Returns
	///
	/// The number of times the code occurs in the puzzle.
	#[inline]
	#[must_use]
	pub fn count(&self, code: Code) -> u32
	{
		self.0[CipherTable::index(code)]
	}
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
