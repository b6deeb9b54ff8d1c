//! Shared test utilities for dissect.

pub mod fixtures;

/// Table-driven test case structure.
#[derive(Debug, Clone)]
pub struct TestCase<I, E> {
    pub name: &'static str,
    pub input: I,
    pub expected: E,
}

impl<I, E> TestCase<I, E> {
    pub const fn new(name: &'static str, input: I, expected: E) -> Self {
        Self {
            name,
            input,
            expected,
        }
    }
}

/// Run table-driven tests, stopping at the first mismatch.
///
/// Every case is logged so a failing table shows which row broke and what
/// the rows before it produced.
pub fn run_table_tests<I, E, F>(cases: Vec<TestCase<I, E>>, test_fn: F) -> Result<(), String>
where
    I: std::fmt::Debug + Clone,
    E: std::fmt::Debug + PartialEq,
    F: Fn(I) -> E,
{
    for case in cases {
        let start = std::time::Instant::now();
        println!("[TEST] Running: {}", case.name);
        println!("[TEST] Input: {:?}", case.input);

        let actual = test_fn(case.input.clone());
        let elapsed = start.elapsed();

        println!("[TEST] Expected: {:?}", case.expected);
        println!("[TEST] Actual: {actual:?}");

        if actual != case.expected {
            return Err(format!(
                "Test '{}' failed: expected {:?}, got {:?}",
                case.name, case.expected, actual
            ));
        }
        println!("[TEST] PASSED: {} ({elapsed:?})\n", case.name);
    }
    Ok(())
}
