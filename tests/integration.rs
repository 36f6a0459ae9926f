//! Integration tests for node composition and the lifecycle contract

use std::cell::RefCell;
use std::rc::Rc;

use pipeweld::prelude::*;

type Log = Rc<RefCell<Vec<String>>>;

/// A transformer adding `n` that records every hook into a shared log.
struct Traced {
    name: &'static str,
    n: i32,
    log: Log,
}

impl Traced {
    fn new(name: &'static str, n: i32, log: &Log) -> Self {
        Self {
            name,
            n,
            log: Rc::clone(log),
        }
    }

    fn push(&self, entry: String) {
        self.log.borrow_mut().push(format!("{} {}", self.name, entry));
    }
}

impl Node for Traced {
    type Role = TransformerRole;
    type Input = i32;
    type Output = i32;

    fn exec(&self, input: i32) -> Result<i32> {
        self.push(format!("exec {input}"));
        Ok(input + self.n)
    }

    fn before(&self, input: &i32) -> Result<()> {
        self.push(format!("before {input}"));
        Ok(())
    }

    fn computed(&self, output: &i32) -> Result<()> {
        self.push(format!("computed {output}"));
        Ok(())
    }

    fn after(&self, exit: Exit<'_>) -> Result<()> {
        self.push(format!("after {}", exit.is_completed()));
        Ok(())
    }
}

/// An iterable producer over a fixed list that records every hook.
struct Listed {
    values: Vec<i32>,
    log: Log,
}

impl Node for Listed {
    type Role = ProducerRole;
    type Input = ();
    type Output = Vec<i32>;

    fn exec(&self, _input: ()) -> Result<Vec<i32>> {
        Ok(self.values.clone())
    }

    fn before(&self, _input: &()) -> Result<()> {
        self.log.borrow_mut().push("before".into());
        Ok(())
    }

    fn computed(&self, output: &Vec<i32>) -> Result<()> {
        self.log.borrow_mut().push(format!("computed {output:?}"));
        Ok(())
    }

    fn after(&self, exit: Exit<'_>) -> Result<()> {
        self.log
            .borrow_mut()
            .push(format!("after {}", exit.error().is_none()));
        Ok(())
    }
}

impl IterableNode for Listed {
    type Item = i32;

    fn each(&self, item: &i32, index: usize) -> Result<()> {
        self.log.borrow_mut().push(format!("each {item} {index}"));
        Ok(())
    }
}

#[test]
fn test_basic_pipeline() -> Result<()> {
    let entry = from_fn(|| Ok(0));
    let pipeline = transformer_from_fn(|x: i32| Ok(x.to_string()));
    let exit = consumer_from_fn(|x: String| Ok(x.len()));

    assert_eq!(entry.connect(pipeline).connect(exit)?, 1);
    Ok(())
}

#[test]
fn test_composition_equals_nested_calls() {
    let f = || Ok(7);
    let g = |x: i32| Ok(x * 3);
    let h = |x: i32| Ok(format!("<{x}>"));

    let direct = h(g(f().unwrap()).unwrap()).unwrap();
    let piped = (from_fn(f) | transformer_from_fn(g) | consumer_from_fn(h)).unwrap();
    assert_eq!(piped, direct);
}

#[test]
fn test_associativity_same_output_and_hooks() {
    let left_log = Log::default();
    let right_log = Log::default();

    let left = Traced::new("a", 1, &left_log)
        .connect(Traced::new("b", 10, &left_log))
        .connect(Traced::new("c", 100, &left_log));
    let right = Traced::new("a", 1, &right_log)
        .connect(Traced::new("b", 10, &right_log).connect(Traced::new("c", 100, &right_log)));

    for input in [0, -5, 42] {
        assert_eq!(left.call(input).unwrap(), right.call(input).unwrap());
    }
    assert_eq!(*left_log.borrow(), *right_log.borrow());
    assert_eq!(
        left_log.borrow()[..4],
        ["a before 0", "a exec 0", "a computed 1", "a after true"]
    );
    assert_eq!(left_log.borrow()[8], "c before 11");
}

#[test]
fn test_connect_shapes() {
    let producer = constant(3) | transformer_from_fn(|x: i32| Ok(x + 1));
    assert_eq!(producer.role(), Role::Producer);
    assert_eq!(producer.call(()).unwrap(), 4);

    let transformer =
        transformer_from_fn(|x: i32| Ok(x + 3)) | transformer_from_fn(|x: i32| Ok(x - 2));
    assert_eq!(transformer.role(), Role::Transformer);
    assert_eq!(transformer.call(4).unwrap(), 5);

    let consumer =
        transformer_from_fn(|x: i32| Ok(x + 1)) | consumer_from_fn(|x: i32| Ok(x.to_string()));
    assert_eq!(consumer.role(), Role::Consumer);
    assert_eq!(consumer.call(3).unwrap(), "4");
}

fn rejected<S, T>(result: Result<Connected<S, T>>) -> Error {
    match result {
        Ok(_) => panic!("join should have been rejected"),
        Err(err) => err,
    }
}

#[test]
fn test_unsupported_combinations_at_runtime() {
    let producer = || AnyNode::<i32, i32>::producer(from_fn(|| Ok(3)));
    let transformer = || AnyNode::<i32, i32>::transformer(transformer_from_fn(|x: i32| Ok(x)));
    let consumer = || AnyNode::<i32, i32>::consumer(IdentitySink::new());
    let source = AnyNode::<(), i32>::producer(from_fn(|| Ok(3)));

    let cases = [
        (rejected(source | producer()), Role::Producer, Role::Producer),
        (rejected(transformer() | producer()), Role::Transformer, Role::Producer),
        (rejected(consumer() | producer()), Role::Consumer, Role::Producer),
        (rejected(consumer() | transformer()), Role::Consumer, Role::Transformer),
        (rejected(consumer() | consumer()), Role::Consumer, Role::Consumer),
    ];

    for (err, left, right) in cases {
        assert!(err.is_unsupported());
        assert_eq!(
            err.to_string(),
            format!("unsupported roles for connect: '{left}' and '{right}'")
        );
    }
}

#[test]
fn test_iterable_producer_hook_order() {
    let log = Log::default();
    let node = Iterable::new(Listed {
        values: vec![0, 1, 2],
        log: Rc::clone(&log),
    });

    let drawn = node.call(()).unwrap();
    assert_eq!(*log.borrow(), vec!["before", "computed [0, 1, 2]"]);

    for item in drawn {
        let item = item.unwrap();
        log.borrow_mut().push(format!("received {item}"));
    }

    assert_eq!(
        *log.borrow(),
        vec![
            "before",
            "computed [0, 1, 2]",
            "each 0 0",
            "received 0",
            "each 1 1",
            "received 1",
            "each 2 2",
            "received 2",
            "after true",
        ]
    );
}

#[test]
fn test_iterable_producer_iterates_directly() {
    let log = Log::default();
    let node = Iterable::new(Listed {
        values: vec![5, 6],
        log: Rc::clone(&log),
    });

    let items: Vec<i32> = (&node).into_iter().collect::<Result<_>>().unwrap();
    assert_eq!(items, vec![5, 6]);
    assert_eq!(log.borrow().last().unwrap(), "after true");
}

#[test]
fn test_iterable_transformer_and_consumer() {
    let squares = Iterable::transformer(|xs: Vec<i32>| Ok(xs.into_iter().map(|d| d * d)));
    assert_eq!(squares.role(), Role::Transformer);
    let drawn: Result<Vec<i32>> = squares.call((0..10).collect()).unwrap().collect();
    assert_eq!(drawn.unwrap(), (0..10).map(|i| i * i).collect::<Vec<_>>());

    let strings = Iterable::consumer(|xs: std::ops::Range<i32>| Ok(xs.map(|d| d.to_string())));
    assert_eq!(strings.role(), Role::Consumer);
    let drawn: Result<Vec<String>> = strings.call(0..4).unwrap().collect();
    assert_eq!(drawn.unwrap(), vec!["0", "1", "2", "3"]);
}

#[test]
fn test_primitive_failure_is_unchanged() {
    #[derive(Debug, thiserror::Error)]
    #[error("bad value {0}")]
    struct BadValue(i32);

    let node = transformer_from_fn(|x: i32| -> Result<i32> { Err(Error::node(BadValue(x))) });
    let err = node.call(3).unwrap_err();
    assert_eq!(err.downcast_ref::<BadValue>().unwrap().0, 3);
}

#[test]
fn test_finalizer_failure_wins() {
    struct Failing;

    impl Node for Failing {
        type Role = ProducerRole;
        type Input = ();
        type Output = i32;

        fn exec(&self, _input: ()) -> Result<i32> {
            Err(Error::custom("string"))
        }

        fn after(&self, exit: Exit<'_>) -> Result<()> {
            assert_eq!(exit.error().unwrap().to_string(), "string");
            Err(Error::custom("overridden"))
        }
    }

    assert_eq!(Failing.call(()).unwrap_err().to_string(), "overridden");
}

#[test]
fn test_before_failure_not_passed_to_finalizer() {
    struct Guarded;

    impl Node for Guarded {
        type Role = ProducerRole;
        type Input = ();
        type Output = i32;

        fn exec(&self, _input: ()) -> Result<i32> {
            Ok(123)
        }

        fn before(&self, _input: &()) -> Result<()> {
            Err(Error::custom("raised by before"))
        }

        fn after(&self, _exit: Exit<'_>) -> Result<()> {
            Err(Error::custom("overridden"))
        }
    }

    assert_eq!(Guarded.call(()).unwrap_err().to_string(), "raised by before");
}

#[test]
fn test_convenience_nodes() {
    let total = SumProcessor::<_, i32>::new().call(vec![1, 2, 3, 4]).unwrap();
    assert_eq!(total, 10);

    let joined = SumProcessor::with_initial(Vec::new())
        .call(vec![vec![0], vec![1, 2], vec![-1, -2]])
        .unwrap();
    assert_eq!(joined, vec![0, 1, 2, -1, -2]);

    let evens: Result<Vec<i32>> = filter(|x: &i32| x % 2 == 0)
        .call(vec![0, 1, 2, 3, 4, 5])
        .unwrap()
        .collect();
    assert_eq!(evens.unwrap(), vec![0, 2, 4]);

    let bumped: Result<Vec<i32>> = map(|x: i32| x + 1).call(vec![0, 1, 3]).unwrap().collect();
    assert_eq!(bumped.unwrap(), vec![1, 2, 4]);

    assert_eq!((constant(3) | IdentitySink::new()).unwrap(), 3);
}

#[test]
fn test_complex_pipeline() {
    let drawn = (iter_constant(1..21)
        | filter(|x: &i64| x % 2 == 0)
        | map(|x: i64| x * 3)
        | IdentitySink::new())
    .unwrap();
    let first: Result<Vec<i64>> = drawn.take(3).collect();
    assert_eq!(first.unwrap(), vec![6, 12, 18]);
}

/// An iterable producer of `[1, 2, 3]` whose finalizer always fails.
struct FailingFinalizer;

impl Node for FailingFinalizer {
    type Role = ProducerRole;
    type Input = ();
    type Output = Vec<i32>;

    fn exec(&self, _input: ()) -> Result<Vec<i32>> {
        Ok(vec![1, 2, 3])
    }

    fn after(&self, _exit: Exit<'_>) -> Result<()> {
        Err(Error::custom("finalizer F"))
    }
}

impl IterableNode for FailingFinalizer {
    type Item = i32;
}

#[test]
fn test_iterable_finalizer_failure_reaches_pipeline_caller() {
    let total = Iterable::new(FailingFinalizer) | sum::<_, i32>() | IdentitySink::new();
    assert_eq!(total.unwrap_err().to_string(), "finalizer F");

    let mapped = Iterable::new(FailingFinalizer) | map(|x: i32| x * 2) | IdentitySink::new();
    let collected: Result<Vec<i32>> = mapped.unwrap().collect();
    assert_eq!(collected.unwrap_err().to_string(), "finalizer F");

    let mut seen = Vec::new();
    let mut failure = None;
    for item in Iterable::new(FailingFinalizer).iter().unwrap() {
        match item {
            Ok(value) => seen.push(value),
            Err(err) => failure = Some(err),
        }
    }
    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(failure.unwrap().to_string(), "finalizer F");
}

#[test]
fn test_failing_each_hook_aborts_pipeline() {
    struct Picky {
        log: Log,
    }

    impl Node for Picky {
        type Role = ProducerRole;
        type Input = ();
        type Output = std::ops::Range<i32>;

        fn exec(&self, _input: ()) -> Result<Self::Output> {
            Ok(0..5)
        }

        fn after(&self, exit: Exit<'_>) -> Result<()> {
            let seen = exit.error().map(|err| err.to_string());
            self.log.borrow_mut().push(format!("after {seen:?}"));
            Ok(())
        }
    }

    impl IterableNode for Picky {
        type Item = i32;

        fn each(&self, item: &i32, _index: usize) -> Result<()> {
            if *item == 1 {
                return Err(Error::custom("rejected 1"));
            }
            Ok(())
        }
    }

    let log = Log::default();
    let node = Iterable::new(Picky {
        log: Rc::clone(&log),
    });
    let total = node | sum::<_, i32>() | IdentitySink::new();
    assert_eq!(total.unwrap_err().to_string(), "rejected 1");
    assert_eq!(*log.borrow(), vec![r#"after Some("rejected 1")"#]);
}
