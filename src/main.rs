mod cli;

use std::process::ExitCode;

use chartparse::error_handling::banner;
use chartparse::steps::render_form;
use chartparse::{bnf, generator, grammar, order, flatten, sentential_forms, Chart, Grammar, Simplifier};
use clap::Parser;
use itertools::Itertools;
use rand::thread_rng;

use cli::Cli;

type Messages = Vec<String>;

fn load_grammar(cli: &Cli) -> Result<Grammar, Messages> {
    let grammar = match &cli.grammar {
        Some(path) => bnf::parse_file(path).map_err(|errors| errors.iter().map(ToString::to_string).collect_vec())?,
        None => grammar::arithmetic(),
    };

    match &cli.start {
        Some(start) => grammar.with_start(start).map_err(|error| vec![banner(error)]),
        None => Ok(grammar),
    }
}

fn sample(grammar: &Grammar, amount: u32, depth: usize) -> Result<ExitCode, Messages> {
    for _ in 0..amount {
        let sentence = generator::generate(grammar, thread_rng(), depth).map_err(|error| vec![banner(error)])?;
        println!("{}", sentence.join(" "));
    }

    Ok(ExitCode::SUCCESS)
}

fn run(cli: &Cli) -> Result<ExitCode, Messages> {
    let grammar = load_grammar(cli)?;

    if let Some(amount) = cli.sample {
        return sample(&grammar, amount, cli.depth);
    }

    let tokens = cli.tokens();
    if tokens.len() > cli.max_tokens {
        return Err(vec![banner(format!(
            "Input has {} tokens, more than the limit of {} (see --max-tokens)",
            tokens.len(),
            cli.max_tokens
        ))]);
    }

    let chart = Chart::build(&grammar, &tokens);
    if cli.verbose {
        eprintln!("chart: {}", chart.stats());
    }

    let derivations = order(chart.trees(), cli.direction);
    let Some(first) = derivations.first() else {
        println!("No derivation of `{}` from `{}`", tokens.join(" "), grammar.start());
        return Ok(ExitCode::FAILURE);
    };

    let shown = if cli.all { &derivations[..] } else { std::slice::from_ref(first) };
    let simplifier = Simplifier::for_grammar(&grammar);

    for (number, tree) in shown.iter().enumerate() {
        if cli.all {
            println!("Derivation {} of {}:", number + 1, derivations.len());
        }

        if cli.ast {
            println!("Abstract syntax tree:\n{:#}", simplifier.simplify(tree));
        } else if cli.forms {
            println!("Derivation steps ({}):", cli.direction);
            for form in sentential_forms(tree, cli.direction) {
                println!("  {}", render_form(&form));
            }
        } else {
            println!("Derivation steps:");
            for step in flatten(tree) {
                println!("  {}", step);
            }
            println!("{:#}", tree);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(messages) => {
            for message in messages {
                eprintln!("{}", message);
            }
            ExitCode::FAILURE
        }
    }
}
