//! Styl Compiler Binary

use std::process;

use clap::{Arg, ArgAction, Command};
use stylc::{
    evaluate_expression_with_options, evaluate_file, EvaluationStats, EvaluatorOptions,
    DESCRIPTION, NAME, VERSION,
};

fn build_command() -> Command {
    Command::new(NAME)
        .version(VERSION)
        .about(DESCRIPTION)
        .arg(
            Arg::new("expression")
                .help("Styl expression to evaluate")
                .index(1)
                .conflicts_with("file"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Evaluate a declaration file instead of a single expression"),
        )
        .arg(
            Arg::new("var")
                .short('D')
                .long("var")
                .value_name("NAME=EXPR")
                .help("Inject a variable into the root scope (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .help("Print evaluation statistics to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print evaluation statistics as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Enable debug logging of evaluation phases")
                .action(ArgAction::SetTrue),
        )
}

fn print_stats(stats: &EvaluationStats, as_json: bool) {
    if as_json {
        match serde_json::to_string_pretty(stats) {
            Ok(json) => eprintln!("{}", json),
            Err(e) => eprintln!("Failed to serialize stats: {}", e),
        }
        return;
    }
    eprintln!("Expressions evaluated: {}", stats.expressions_evaluated);
    eprintln!("Variables resolved:    {}", stats.variables_resolved);
    eprintln!("Function calls:        {}", stats.function_calls);
    eprintln!("Color operations:      {}", stats.color_operations);
    eprintln!("Evaluation time:       {}ms", stats.eval_time_ms);
}

fn main() {
    env_logger::init();

    let matches = build_command().get_matches();

    let mut options = EvaluatorOptions {
        debug_mode: matches.get_flag("debug"),
        ..Default::default()
    };
    if let Some(defs) = matches.get_many::<String>("var") {
        for def in defs {
            match def.split_once('=') {
                Some((name, expr)) => {
                    options
                        .custom_variables
                        .insert(name.trim_start_matches('$').to_string(), expr.to_string());
                }
                None => {
                    eprintln!("Invalid --var '{}': expected NAME=EXPR", def);
                    process::exit(2);
                }
            }
        }
    }

    let result = if let Some(path) = matches.get_one::<String>("file") {
        evaluate_file(path, &options)
    } else if let Some(expression) = matches.get_one::<String>("expression") {
        evaluate_expression_with_options(expression, &options)
    } else {
        eprintln!("Usage: {} <EXPRESSION> | --file <FILE>", NAME);
        eprintln!("  {NAME} v{VERSION} - {DESCRIPTION}");
        process::exit(2);
    };

    match result {
        Ok((css, stats)) => {
            println!("{}", css);
            if matches.get_flag("stats") || matches.get_flag("json") {
                print_stats(&stats, matches.get_flag("json"));
            }
        }
        Err(e) => {
            eprintln!("Evaluation failed: {}", e);
            process::exit(1);
        }
    }
}
