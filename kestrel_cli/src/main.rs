// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
mod helper;
mod theme;

use clap::{Parser as ClapParser, Subcommand};
use cliclack::{input, intro, set_theme};
use helper::{Session, parse_numbers, print_uncaught, sum_precise};
use kestrel_vm::ecmascript::{
    execution::{Agent, Options},
    types::Value,
};
use theme::ReplTheme;

/// Kestrel runtime core console
#[derive(Debug, ClapParser)] // requires `derive` feature
#[command(name = "kestrel")]
#[command(about = "Kestrel runtime core console", long_about = None)]
struct Cli {
    /// Print engine internals to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sums numbers with Math.sumPrecise
    Sum {
        /// Also print the result of left to right addition
        #[arg(long)]
        naive: bool,

        /// The numbers to sum
        #[arg(allow_hyphen_values = true)]
        numbers: Vec<String>,
    },

    /// Runs a property store console on a single object
    Repl {},
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    let mut agent = Agent::new(Options {
        print_internals: args.verbose,
        ..Default::default()
    });

    match args.command {
        Command::Sum { naive, numbers } => {
            let result = parse_numbers(&mut agent, &numbers)
                .and_then(|numbers| Ok((sum_precise(&mut agent, &numbers)?, numbers)));
            let numbers = match result {
                Ok((result, numbers)) => {
                    println!("{}", result.to_display_string(&agent));
                    numbers
                }
                Err(error) => {
                    print_uncaught(&agent, error);
                    std::process::exit(1);
                }
            };
            if naive {
                let sum = numbers.iter().fold(0.0, |sum, number| sum + number);
                println!("naive: {}", Value::from(sum).to_display_string(&agent));
            }
        }
        Command::Repl {} => {
            let mut session = Session::new(&mut agent);

            set_theme(ReplTheme);
            println!("\n\n");
            let mut placeholder = "set answer 42".to_string();

            loop {
                intro("Kestrel Repl (type exit or ctrl+c to exit)")?;
                let input: String = input("").placeholder(&placeholder).interact()?;

                match session.execute(&mut agent, &input) {
                    Ok(Some(output)) => println!("{output}\n"),
                    Ok(None) => std::process::exit(0),
                    Err(error) => print_uncaught(&agent, error),
                }
                placeholder = input;
            }
        }
    }
    Ok(())
}
