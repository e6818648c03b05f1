//! # Codeword Solver
//!
//! A codeword (also called a criss-cross cipher) is a crossword-style puzzle
//! in which every cell holds a number from 1 to 26 instead of a letter. Each
//! number stands for one letter of the alphabet, the same letter everywhere it
//! appears, and no two numbers share a letter. Solving the puzzle means
//! recovering the number→letter cipher such that every row and column of the
//! grid spells a real word.
//!
//! The solver treats this as a constraint-satisfaction problem: a backtracking
//! search assigns letters to codes one at a time, always extending the most
//! frequently occurring unassigned code first, and prunes any partial cipher
//! under which some puzzle word could no longer decipher to a dictionary
//! word.

pub mod cipher;
pub mod dictionary;
pub mod puzzle;
pub mod solver;
