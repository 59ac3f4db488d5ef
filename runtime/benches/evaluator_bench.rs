use psyl::native::extract_int;
use psyl::{Environment, Expr, Value, parse};
use psyl_runtime::{Concurrent, Evaluator, Sequential};
use std::thread;
use std::time::{Duration, Instant};

fn make_env() -> Environment {
    let env = Environment::new();
    // Simulates a host procedure doing real work, e.g. a lookup
    env.define_fn("slow", |args| {
        thread::sleep(Duration::from_millis(2));
        Ok(args.get(0).cloned().unwrap_or(Value::Nil))
    });
    env.define_fn("+", |args| {
        let mut total = 0i64;
        for value in &args.positional {
            total += extract_int(value)?;
        }
        Ok(Value::Int(total))
    });
    env
}

fn bench(evaluator: &dyn Evaluator, tree: &Expr, env: &Environment, rounds: u32) -> Duration {
    let start = Instant::now();
    for _ in 0..rounds {
        if let Err(e) = evaluator.eval_tree(tree, env) {
            eprintln!("evaluation failed: {e}");
            break;
        }
    }
    start.elapsed() / rounds
}

fn main() {
    println!("Sequential vs Concurrent Evaluation");
    println!("===================================\n");

    let env = make_env();
    let sources = [
        ("flat", "(+ 1 2 3 4 5 6 7 8)"),
        ("wide", "(+ (slow 1) (slow 2) (slow 3) (slow 4))"),
        (
            "deep",
            "(+ (+ (slow 1) (slow 2)) (+ (slow 3) (+ (slow 4) (slow 5))) (slow 6))",
        ),
    ];

    for (name, source) in sources {
        let tree = match parse(source) {
            Ok(tree) => tree,
            Err(e) => {
                eprintln!("{name}: {e}");
                continue;
            }
        };
        let sequential = bench(&Sequential, &tree, &env, 20);
        let concurrent = bench(&Concurrent::default(), &tree, &env, 20);
        println!("{name:5}: sequential {sequential:?}, concurrent {concurrent:?}");
    }
}
