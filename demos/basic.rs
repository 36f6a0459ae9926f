//! Basic pipelines built from plain functions and the bundled nodes.

use pipeweld::prelude::*;

/// A transformer that reports each lifecycle step.
struct Announce;

impl Node for Announce {
    type Role = TransformerRole;
    type Input = i64;
    type Output = i64;

    fn exec(&self, input: i64) -> Result<i64> {
        Ok(input * 2)
    }

    fn before(&self, input: &i64) -> Result<()> {
        println!("  before: {input}");
        Ok(())
    }

    fn computed(&self, output: &i64) -> Result<()> {
        println!("  computed: {output}");
        Ok(())
    }

    fn after(&self, exit: Exit<'_>) -> Result<()> {
        println!("  after: {exit:?}");
        Ok(())
    }
}

fn main() -> Result<()> {
    println!("=== Scalar Pipeline ===");
    let length = from_fn(|| Ok(21i64))
        | Announce
            .connect(transformer_from_fn(|x: i64| Ok(x.to_string())))
            .connect(consumer_from_fn(|s: String| Ok(s.len())));
    println!("length: {}\n", length?);

    println!("=== Sequence Pipeline ===");
    let total = (iter_constant(1..=10)
        | filter(|x: &i64| x % 2 == 0)
        | map(|x: i64| x * x)
        | sum::<_, i64>()
        | IdentitySink::new())?;
    println!("sum of even squares: {total}\n");

    println!("=== Rejected Join ===");
    let left = AnyNode::<(), i64>::producer(constant(1));
    let right = AnyNode::<i64, i64>::producer(constant(2));
    match left | right {
        Ok(_) => println!("unexpectedly joined"),
        Err(err) => println!("{err}"),
    }

    Ok(())
}
