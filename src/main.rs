//! # Codeword Solver
//!
//! A codeword (criss-cross cipher) puzzle presents a crossword-style grid
//! whose cells hold numbers 1 through 26 instead of letters. Each number
//! stands for one letter, the same everywhere it appears, and no two numbers
//! share a letter. This program recovers the cipher by backtracking search:
//! it repeatedly assigns a letter to the most frequently occurring unsolved
//! number and prunes any partial cipher under which some grid entry could no
//! longer decipher to a dictionary word.
//!
//! The puzzle is supplied as a JSON file naming the known seed assignments
//! and the code sequences of the grid entries. The dictionary is a newline-
//! delimited word list (or a JSON object keyed by words); a binary copy is
//! cached beside it to optimize future loads. Solutions are printed one at a
//! time; unless `--exhaust` is given, the operator is asked after each
//! solution whether the search should continue.

use std::{
	io::{self, BufRead, Write},
	path::PathBuf,
	rc::Rc,
	time::Instant
};

use clap::Parser;
use log::debug;

use codeword_solver::{
	cipher::{codes, CipherTable},
	dictionary::Dictionary,
	puzzle::Puzzle,
	solver::Solver
};

////////////////////////////////////////////////////////////////////////////////
//                           Command line options.                            //
////////////////////////////////////////////////////////////////////////////////

/// CLI for solving codeword puzzles.
#[derive(Clone, Debug, Parser)]
#[command(version = "1.0", about = "Backtracking solver for codewords")]
struct Opts
{
	/// The path to the dictionary file. A `.json` file is read as an object
	/// keyed by words; anything else is read as a newline-delimited word
	/// list.
	#[arg(short = 'd', long, default_value = "words_alpha.txt")]
	dictionary: PathBuf,

	/// The path to the puzzle JSON file.
	#[arg(short = 'p', long, required = true)]
	puzzle: PathBuf,

	/// Print out progress as we backtrack: every candidate cipher table the
	/// search visits, with `_` for unassigned codes.
	#[arg(long)]
	print: bool,

	/// Exhaustive search: visit the entire search tree instead of prompting
	/// after each solution.
	#[arg(long)]
	exhaust: bool
}

////////////////////////////////////////////////////////////////////////////////
//                               Main program.                                //
////////////////////////////////////////////////////////////////////////////////

/// Parse the command line options, load the dictionary and puzzle, and drain
/// solutions from the solver until the operator stops or the search space is
/// exhausted.
fn main()
{
	env_logger::init();
	let opts = Opts::parse();
	debug!("Command line options: {:?}", opts);

	// Load the dictionary, creating the binary cache if necessary.
	let dictionary = Dictionary::open(&opts.dictionary).unwrap_or_else(|e| {
		panic!(
			"Failed to open dictionary: {}: {}",
			opts.dictionary.display(),
			e
		)
	});

	// Load and validate the puzzle.
	let puzzle = Puzzle::read_from_file(&opts.puzzle).unwrap_or_else(|e| {
		panic!("Failed to load puzzle: {}: {}", opts.puzzle.display(), e)
	});

	let start = Instant::now();
	let mut solver = Solver::new(Rc::new(dictionary), &puzzle);
	if opts.print
	{
		solver = solver.with_progress(Box::new(move |table| {
			println!("{:>12.3?} {}", start.elapsed(), table);
		}));
	}

	let mut count = 0usize;
	while let Some(solution) = solver.next_solution()
	{
		println!("Found solution:");
		print_solution(&solution);
		count += 1;
		if !opts.exhaust && !prompt_continue()
		{
			break
		}
	}
	println!("found {} solutions, took {:?}", count, start.elapsed());
}

/// Print a solution to standard output: the 26-slot line followed by the
/// individual assignments.
///
/// # Arguments
///
/// * `solution` - The solution to print.
fn print_solution(solution: &CipherTable)
{
	println!("  {}", solution);
	for code in codes()
	{
		if let Some(letter) = solution.get(code)
		{
			println!("  {:>2} -> {}", code, letter);
		}
	}
}

/// Ask the operator whether the search should continue past the solution
/// just printed. Re-prompts until the answer is recognizably yes or no;
/// treats end of input as no.
///
/// # Returns
///
/// `true` if the search should continue, `false` otherwise.
fn prompt_continue() -> bool
{
	let stdin = io::stdin();
	loop
	{
		print!("Continue search? ");
		let _ = io::stdout().flush();
		let mut line = String::new();
		match stdin.lock().read_line(&mut line)
		{
			Ok(0) | Err(_) => return false,
			Ok(_) => ()
		}
		match line.trim().to_lowercase().as_str()
		{
			"y" | "yes" | "t" | "true" | "on" | "1" => return true,
			"n" | "no" | "f" | "false" | "off" | "0" => return false,
			_ => println!("Please answer yes or no.")
		}
	}
}
