#![no_main]

//! Fuzz target for the console line grammar.
//!
//! Feeds arbitrary word sequences to the clap multicall parser. Parsing may
//! fail, and almost always will, but it must never panic, whatever mix of
//! flags, values, and Unicode the words contain.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use saarthi::console::ConsoleLine;

#[derive(Arbitrary, Debug)]
struct LineInput {
    words: Vec<String>,
    /// When set, prefix a real command name so deeper argument parsing runs
    command_choice: Option<u8>,
}

const COMMANDS: [&str; 10] = [
    "login",
    "logout",
    "reports",
    "board",
    "show",
    "advance",
    "dashboard",
    "alerts",
    "quit",
    "help",
];

fuzz_target!(|input: LineInput| {
    // Limit to a reasonable line length
    if input.words.len() > 16 {
        return;
    }

    let mut words: Vec<&str> = Vec::new();
    if let Some(choice) = input.command_choice {
        words.push(COMMANDS[usize::from(choice) % COMMANDS.len()]);
    }
    words.extend(input.words.iter().map(String::as_str));
    if words.is_empty() {
        return;
    }

    let _ = ConsoleLine::try_parse_from(words);
});
