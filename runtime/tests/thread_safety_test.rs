use psyl::{Environment, Interner, Value, parse_with};
use psyl_runtime::{Concurrent, Evaluator, Sequential};
use std::sync::Arc;
use std::thread;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_core_types_are_send_sync() {
    assert_send_sync::<Value>();
    assert_send_sync::<psyl::Expr>();
    assert_send_sync::<Environment>();
    assert_send_sync::<Interner>();
    assert_send_sync::<Concurrent>();
}

#[test]
fn test_tree_and_environment_shared_across_threads() {
    let env = Environment::with_interner(Interner::new());
    env.define_fn("list", |args| Ok(Value::List(args.positional)));
    env.define("x", 5i64);

    let tree = Arc::new(parse_with("(list x (list x 1))", env.interner()).unwrap());

    let mut handles = vec![];

    // Spawn 5 threads that all evaluate the same tree
    for i in 0..5 {
        let tree = Arc::clone(&tree);
        let env = env.clone();
        let handle = thread::spawn(move || {
            if i % 2 == 0 {
                Sequential.eval_tree(&tree, &env)
            } else {
                Concurrent::default().eval_tree(&tree, &env)
            }
        });
        handles.push(handle);
    }

    let expected = Value::from(vec![Value::Int(5), Value::from(vec![5i64, 1])]);
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), expected);
    }
}

#[test]
fn test_interning_from_many_threads_yields_one_symbol() {
    let interner = Interner::new();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let interner = interner.clone();
            thread::spawn(move || interner.intern("shared-name"))
        })
        .collect();

    let symbols: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(symbols.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(interner.len(), 1);
}
