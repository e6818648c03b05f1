//! # Solver
//!
//! Herein is the backtracking search engine. The search tree is explored
//! depth first over an explicit stack of cipher tables, rather than by
//! recursion, which makes the production of solutions lazy and pull-based:
//! each call to [`Solver::next_solution`] runs the search only as far as the
//! next complete, feasible cipher table, and the caller decides whether to
//! continue. Abandoning the solver abandons the rest of the tree.

use std::{cmp::Reverse, rc::Rc};

use log::{debug, trace};

use crate::{
	cipher::{
		codes,
		CipherTable,
		Code,
		FrequencyTable,
		LETTERS_BY_FREQUENCY
	},
	dictionary::Dictionary,
	puzzle::{Puzzle, WordDescriptor}
};

////////////////////////////////////////////////////////////////////////////////
//                                  Solver.                                   //
////////////////////////////////////////////////////////////////////////////////

/// A progress observer, invoked with every candidate cipher table the search
/// visits, before that table's feasibility is checked. Infeasible and partial
/// tables are reported too; this hook exists for diagnostic tracing.
pub type ProgressHook = Box<dyn FnMut(&CipherTable)>;

/// The complete context of the codeword solver: the dictionary, the word
/// descriptors, the precomputed frequency table, and the depth-first stack of
/// cipher tables still to visit. The dictionary and frequency table are
/// immutable for the life of the solver; every stack entry owns its own
/// table.
///
/// Solutions are enumerated in a deterministic order: at every branching
/// point the most frequent unassigned code is extended, with candidate
/// letters in [English frequency order](LETTERS_BY_FREQUENCY), and siblings
/// are visited in exactly that order.
#[must_use]
pub struct Solver
{
	/// The dictionary to validate deciphered words against.
	dictionary: Rc<Dictionary>,

	/// The word descriptors of the puzzle.
	words: Vec<WordDescriptor>,

	/// The code frequencies of the puzzle, computed once at construction.
	frequencies: FrequencyTable,

	/// The cipher tables not yet visited, rightmost on top. Sibling tables
	/// are pushed in reverse preference order so the most preferred letter
	/// is popped first.
	pending: Vec<CipherTable>,

	/// The number of cipher tables visited so far.
	visited: u64,

	/// The maximum number of cipher tables to visit, if any. Once the budget
	/// is spent, the search stops producing solutions even though unvisited
	/// branches may remain.
	node_budget: Option<u64>,

	/// The progress observer, if any.
	progress: Option<ProgressHook>
}

impl Solver
{
	/// Construct a solver for the given dictionary and puzzle. The frequency
	/// table is computed here, and the seed cipher table (the puzzle's known
	/// keys merged into an otherwise unassigned table) becomes the root of
	/// the search tree.
	///
	/// # Arguments
	///
	/// * `dictionary` - The dictionary to validate deciphered words against.
	/// * `puzzle` - The puzzle to solve.
	///
	/// # Returns
	///
	/// A solver positioned before the first solution.
	pub fn new(dictionary: Rc<Dictionary>, puzzle: &Puzzle) -> Self
	{
		let words = puzzle.words().to_vec();
		let frequencies = FrequencyTable::tally(&words);
		Self
		{
			dictionary,
			words,
			frequencies,
			pending: vec![puzzle.seed_table()],
			visited: 0,
			node_budget: None,
			progress: None
		}
	}

	/// Limit the number of cipher tables the solver will visit. The search
	/// tree is in principle bounded only by 26!, so a budget puts a hard
	/// ceiling on a run regardless of puzzle difficulty.
	///
	/// # Arguments
	///
	/// * `budget` - The maximum number of tables to visit.
	///
	/// # Returns
	///
	/// The solver, with the budget installed.
	pub fn with_node_budget(mut self, budget: u64) -> Self
	{
		self.node_budget = Some(budget);
		self
	}

	/// Install a progress observer. The observer is invoked with every
	/// candidate table the search visits, before its feasibility is checked.
	///
	/// # Arguments
	///
	/// * `hook` - The progress observer.
	///
	/// # Returns
	///
	/// The solver, with the observer installed.
	pub fn with_progress(mut self, hook: ProgressHook) -> Self
	{
		self.progress = Some(hook);
		self
	}

	/// Get the number of cipher tables visited so far.
	///
	/// # Returns
	///
	/// The visit count.
	#[inline]
	#[must_use]
	pub fn nodes_visited(&self) -> u64 { self.visited }

	/// Check if the search space is exhausted. Further calls to
	/// [`next_solution`](Self::next_solution) cannot produce anything once
	/// this answers `true`.
	///
	/// # Returns
	///
	/// `true` if no unvisited branches remain, `false` otherwise.
	#[inline]
	#[must_use]
	pub fn is_exhausted(&self) -> bool { self.pending.is_empty() }

	/// Run the search as far as the next solution: a complete cipher table
	/// under which every word descriptor deciphers to a dictionary word.
	/// Branches whose partial table already rules out some descriptor are
	/// pruned without expansion. A table that is complete and feasible on
	/// arrival, including a fully seeded puzzle, is emitted without
	/// generating any candidates.
	///
	/// # Returns
	///
	/// The next solution, or `None` if the search space (or the node budget)
	/// is exhausted.
	pub fn next_solution(&mut self) -> Option<CipherTable>
	{
		loop
		{
			if let Some(budget) = self.node_budget
			{
				if self.visited >= budget
				{
					debug!("node budget exhausted: {}", budget);
					return None
				}
			}
			let table = self.pending.pop()?;
			self.visited += 1;
			if let Some(hook) = self.progress.as_mut()
			{
				hook(&table);
			}
			trace!("considering: {}", table);
			if !self.is_feasible(&table)
			{
				// Some descriptor can no longer decipher to any dictionary
				// word, so the whole subtree below this table is dead.
				continue
			}
			if table.is_complete()
			{
				debug!("found solution: {}", table);
				return Some(table)
			}
			// Expand the most constraining unassigned code. Push children in
			// reverse so the most preferred letter is popped first.
			for child in self.candidates(&table).into_iter().rev()
			{
				self.pending.push(child);
			}
		}
	}

	/// Check if every word descriptor could still decipher to a dictionary
	/// word under the given table. Stops at the first descriptor that
	/// cannot.
	///
	/// # Arguments
	///
	/// * `table` - The candidate cipher table.
	///
	/// # Returns
	///
	/// `true` if every descriptor's pattern matches some dictionary word,
	/// `false` otherwise.
	#[must_use]
	fn is_feasible(&self, table: &CipherTable) -> bool
	{
		self.words.iter().all(|word| {
			let pattern = table.pattern_for(word);
			let matched = self.dictionary.matches(&pattern);
			if !matched
			{
				trace!("infeasible: no word matches {}", pattern);
			}
			matched
		})
	}

	/// Generate the child tables of the given incomplete table: pick the
	/// unassigned code with the highest frequency (ties broken toward the
	/// lowest code, for reproducibility) and propose every unused letter
	/// for it, in [English frequency order](LETTERS_BY_FREQUENCY).
	///
	/// # Arguments
	///
	/// * `table` - The incomplete table to extend.
	///
	/// # Returns
	///
	/// The child tables, most preferred letter first. At most 26, fewer as
	/// letters are used up.
	fn candidates(&self, table: &CipherTable) -> Vec<CipherTable>
	{
		let code = match self.most_constrained_code(table)
		{
			Some(code) => code,
			None => return Vec::new()
		};
		LETTERS_BY_FREQUENCY
			.iter()
			.filter(|&&letter| !table.uses_letter(letter))
			.map(|&letter| table.assign(code, letter))
			.collect()
	}

	/// Pick the unassigned code that appears most often in the puzzle. It
	/// influences the most word patterns, so assigning it first prunes the
	/// search tree fastest.
	///
	/// # Arguments
	///
	/// * `table` - The table whose unassigned codes are in play.
	///
	/// # Returns
	///
	/// The most frequent unassigned code, lowest code first among ties, or
	/// `None` if the table is complete.
	#[must_use]
	fn most_constrained_code(&self, table: &CipherTable) -> Option<Code>
	{
		codes()
			.filter(|&code| table.get(code).is_none())
			.min_by_key(|&code| (Reverse(self.frequencies.count(code)), code))
	}
}

impl Iterator for Solver
{
	type Item = CipherTable;

	#[inline]
	fn next(&mut self) -> Option<Self::Item> { self.next_solution() }
}

////////////////////////////////////////////////////////////////////////////////
//                                   Tests.                                   //
////////////////////////////////////////////////////////////////////////////////
