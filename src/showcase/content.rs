//! Static text and code for the presentation pages.

/// Snippet with a heading and the commentary shown under it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snippet {
    pub heading: &'static str,
    pub code: &'static str,
    pub note: &'static str,
}

pub const APP_TITLE: &str = "Polars v Arrow";

pub const INTRO_TITLE: &str = "Polars: DataFrames for the new era";

pub const INTRO_TEXT: &[&str] = &[
    "Datasets keep growing, and a hand-written pipeline of eager kernel calls has to hold every intermediate result in memory.",
    "Enter Polars. A query engine on top of Arrow memory: faster, leaner and easier to read.",
];

pub const SYNTAX_INTRO_ARROW: &str = "With raw Arrow compute kernels every step is a separate call on concrete arrays, and grouping has to be written by hand.";

pub const SYNTAX_INTRO_POLARS: &str = "Polars describes the whole pipeline as expressions on named columns, then runs it in one go.";

pub const ARROW_SNIPPETS: &[Snippet] = &[
    Snippet {
        heading: "Arrow",
        code: r#"// Step 1: filter rows where A > 2
let a = batch.column_by_name("A").unwrap();
let mask = gt(a, &Int64Array::new_scalar(2))?;
let filtered = filter_record_batch(&batch, &mask)?;

// Step 2: group by C, sum A and average B
let mut groups: HashMap<&str, (i64, f64, usize)> = HashMap::new();
// ... loop over rows, accumulate, build new arrays ...

// Step 3: sort by sum of A, descending
let indices = sort_to_indices(&sum_a, Some(desc), None)?;
let sorted = take_record_batch(&grouped, &indices)?;"#,
        note: "Each step materializes a new batch, and grouping needs a hand-rolled hash map.",
    },
    Snippet {
        heading: "Filtering",
        code: r#"let mask = gt(batch.column_by_name("A").unwrap(), &Int64Array::new_scalar(2))?;
let filtered = filter_record_batch(&batch, &mask)?;"#,
        note: "Filtering needs a boolean mask built separately, then applied to the batch. The column lookup and the comparison are easy to lose in a larger function.",
    },
    Snippet {
        heading: "Grouping and Aggregation",
        code: r#"for row in 0..filtered.num_rows() {
    let entry = groups.entry(c.value(row)).or_default();
    entry.0 += a.value(row);
    entry.1 += b.value(row);
    entry.2 += 1;
}"#,
        note: "There is no group-by kernel, so every aggregation is bookkeeping you write and test yourself.",
    },
    Snippet {
        heading: "Sorting",
        code: r#"let indices = sort_to_indices(&sum_a, Some(SortOptions { descending: true, nulls_first: false }), None)?;
let sorted = take_record_batch(&grouped, &indices)?;"#,
        note: "Sorting is two calls: compute a permutation, then gather every column through it.",
    },
];

pub const POLARS_SNIPPETS: &[Snippet] = &[
    Snippet {
        heading: "Polars",
        code: r#"// The same pipeline, as one lazy query
let result = df
    .lazy()
    .filter(col("A").gt(lit(2)))
    .group_by([col("C")])
    .agg([
        col("A").sum().alias("sum_A"),
        col("B").mean().alias("mean_B"),
    ])
    .sort(["sum_A"], SortMultipleOptions::default().with_order_descending(true))
    .collect()?;"#,
        note: "Filtering, grouping, several aggregations and sorting read top to bottom with no intermediate variables.",
    },
    Snippet {
        heading: "Filtering",
        code: r#".filter(col("A").gt(lit(2)))"#,
        note: "filter() takes an expression and col(\"A\") makes it obvious which column is meant.",
    },
    Snippet {
        heading: "Grouping and Aggregation",
        code: r#".group_by([col("C")])
.agg([
    col("A").sum().alias("sum_A"),
    col("B").mean().alias("mean_B"),
])"#,
        note: "agg() takes a list of expressions, one per output column. Adding another aggregation is one more line.",
    },
    Snippet {
        heading: "Sorting",
        code: r#".sort(["sum_A"], SortMultipleOptions::default().with_order_descending(true))"#,
        note: "The sort column is named directly and the descending order is spelled out in the options.",
    },
];

pub const DEBUGGING_TITLE: &str = "Error Debugging";

pub const DEBUGGING_INTRO: &str = "The same mistakes made against both libraries. The messages below are produced live by calling each library.";

pub const SPEED_TITLE: &str = "Speed & Memory Efficiency: Polars vs Arrow";

pub const SPEED_INTRO: &str = "This page compares the performance of Polars (lazy) and Arrow (eager) for the following operations on the stock exchange dataset:";

pub const SPEED_OPERATIONS: &[&str] = &["Aggregation & Group By", "Searching", "Sorting"];

pub const MEMORY_CAVEAT: &str = "Memory figures are not measured the same way: Polars reports its own estimated size (MB / 1000), Arrow reports allocated buffer bytes (bytes / 10⁹). Compare them as an illustration, not an exact measurement.";

pub const LAZY_TITLE: &str = "Lazy Execution";

pub const LAZY_TEXT: &[&str] = &[
    "So how is Polars able to pull this off when an eager pipeline struggles this much? Lazy execution.",
    "Instead of executing operations immediately, Polars builds a logical plan of the steps to run. The plan is only evaluated when a result is requested with collect(), which lets the engine push filters down, read only the needed columns and stream the data.",
    "This matters most for complex queries on large datasets: operations are combined and optimized before anything runs.",
    "Below, one large combined file of the stock exchange dataset goes through filter → group by → aggregate → sort in both libraries.",
];
