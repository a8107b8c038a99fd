#![cfg(not(tarpaulin_include))]

use blockcalc::calculator::Calculator;
use blockcalc::diagram::{Diagram, Side};
use blockcalc::expression::evaluate;
use blockcalc::grapher::{sample_curve, sample_segments};
use blockcalc::notepad::render_line;
use blockcalc::numeric::format_number;
use blockcalc::saving::{export_json, import_json, load_diagram, save_diagram};
use blockcalc::settings::Settings;
use std::env;
use std::io::{self, Write};
use std::time::Instant;

fn print_help() {
    println!("Commands:");
    println!("  calc <expr>: Evaluate an expression");
    println!("  note <line>: Solve a notepad line");
    println!("  plot <expr> [x_min x_max]: Sample a function of x");
    println!("  key <keys>: Press calculator keys (digits . % + - * / = c <)");
    println!("  add <left> <op> <right>: Append a diagram block");
    println!("  set <pos> left|right|op <text>: Edit a block");
    println!("  rm <pos>: Remove a block");
    println!("  show: Show the diagram");
    println!("  links: Show block references");
    println!("  save <file> / load <file>: Binary diagram file");
    println!("  export <file> / import <file>: JSON diagram file");
    println!("  q: Quit");
}

fn show_diagram(diagram: &Diagram, settings: &Settings) {
    let results = diagram.recompute();
    println!("#\tid\tleft\top\tright\t\tresult");
    for (i, (block, result)) in diagram.blocks.iter().zip(results.iter()).enumerate() {
        println!(
            "{}\t{}\t{}\t{}\t{}\t\t{}",
            i + 1,
            block.id,
            block.left.raw(),
            block.operator.symbol(),
            block.right.raw(),
            result.display(
                &settings.display.error_label,
                &settings.display.unresolved_label
            )
        );
    }
}

fn parse_position(diagram: &Diagram, text: &str) -> Option<u32> {
    text.trim_start_matches('#')
        .parse::<usize>()
        .ok()
        .and_then(|pos| diagram.id_at(pos))
}

fn run_command(
    command: &str,
    diagram: &mut Diagram,
    calculator: &mut Calculator,
    settings: &Settings,
    show: &mut bool,
) -> String {
    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "calc" => match evaluate(rest).display(&settings.display.error_label) {
            Some(text) => {
                println!("{}", text);
                String::from("ok")
            }
            None => String::from("not an expression"),
        },
        "note" => {
            println!("{}", render_line(rest, &settings.display.notepad_error_label));
            String::from("ok")
        }
        "plot" => {
            let args: Vec<&str> = rest.split_whitespace().collect();
            let (expr, x_min, x_max) = match args.as_slice() {
                [expr] => (*expr, settings.graph.x_min, settings.graph.x_max),
                [expr, lo, hi] => match (lo.parse::<f64>(), hi.parse::<f64>()) {
                    (Ok(lo), Ok(hi)) => (*expr, lo, hi),
                    _ => return String::from("invalid range"),
                },
                _ => return String::from("invalid command"),
            };
            let var = settings.graph.variable;
            let points = sample_curve(expr, var, x_min, x_max, settings.graph.samples);
            let segments = sample_segments(expr, var, x_min, x_max, settings.graph.samples);
            println!(
                "{} of {} samples plotted in {} segment(s)",
                points.len(),
                settings.graph.samples,
                segments.len()
            );
            let stride = (points.len() / 10).max(1);
            for point in points.iter().step_by(stride) {
                println!("  {}\t{}", format_number(point.x), format_number(point.y));
            }
            String::from("ok")
        }
        "key" => {
            calculator.press_all(rest);
            println!("[{}]", calculator.display());
            String::from("ok")
        }
        "add" => {
            let args: Vec<&str> = rest.split_whitespace().collect();
            match args.as_slice() {
                [left, op, right] => {
                    diagram.add_block(left, op, right);
                }
                [left, right] => {
                    diagram.add_block(left, "", right);
                }
                _ => return String::from("invalid command"),
            }
            if *show {
                show_diagram(diagram, settings);
            }
            String::from("ok")
        }
        "set" => {
            let args: Vec<&str> = rest.splitn(3, char::is_whitespace).collect();
            if args.len() < 2 {
                return String::from("invalid command");
            }
            let Some(id) = parse_position(diagram, args[0]) else {
                return String::from("invalid block");
            };
            let text = args.get(2).copied().unwrap_or("");
            let updated = match args[1] {
                "left" => diagram.update_slot(id, Side::Left, text),
                "right" => diagram.update_slot(id, Side::Right, text),
                "op" => diagram.set_operator(id, text),
                _ => return String::from("invalid slot"),
            };
            if updated && *show {
                show_diagram(diagram, settings);
            }
            String::from("ok")
        }
        "rm" => {
            let Some(id) = parse_position(diagram, rest) else {
                return String::from("invalid block");
            };
            diagram.remove_block(id);
            if *show {
                show_diagram(diagram, settings);
            }
            String::from("ok")
        }
        "show" => {
            show_diagram(diagram, settings);
            String::from("ok")
        }
        "links" => {
            for link in diagram.links() {
                println!("  {} -> {}", link.source, link.target);
            }
            String::from("ok")
        }
        "save" => match save_diagram(diagram, rest) {
            Ok(()) => String::from("ok"),
            Err(e) => format!("save failed: {}", e),
        },
        "load" => match load_diagram(rest) {
            Ok(loaded) => {
                *diagram = loaded;
                String::from("ok")
            }
            Err(e) => format!("load failed: {}", e),
        },
        "export" => match export_json(diagram, rest) {
            Ok(()) => String::from("ok"),
            Err(e) => format!("export failed: {}", e),
        },
        "import" => match import_json(rest) {
            Ok(loaded) => {
                *diagram = loaded;
                String::from("ok")
            }
            Err(e) => format!("import failed: {}", e),
        },
        "disable_output" => {
            *show = false;
            String::from("ok")
        }
        "enable_output" => {
            *show = true;
            String::from("ok")
        }
        _ => String::from("invalid command"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let s = Instant::now();
    let args: Vec<String> = env::args().collect();

    let settings = match args.get(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let mut diagram = Diagram::new();
    let mut calculator = Calculator::new(&settings.display.error_label);
    let mut status = String::from("ok");
    let mut show = true;
    let mut start_time = Instant::now();

    loop {
        let elapsed_time = start_time.elapsed().as_secs_f64();
        print!("[{:.1}] ({}) > ", elapsed_time, status);
        io::stdout().flush()?;

        let mut command = String::new();
        match io::stdin().read_line(&mut command) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let command = command.trim();

        start_time = Instant::now();

        if command.is_empty() {
            status = String::from("invalid command");
            continue;
        }

        if command == "help" {
            print_help();
            continue;
        }

        if command == "q" {
            break;
        }

        status = run_command(command, &mut diagram, &mut calculator, &settings, &mut show);
    }

    let e = s.elapsed().as_secs_f64();
    println!("Total elapsed time: {:.1} seconds", e);

    Ok(())
}
