//! End-to-end tests: parse, plan and format through the public CLI library.

use packplan::{PackingConfig, Planner, StrategyKind};
use packplan_cli::{
    problematic, to_json, to_text, uniform, BenchmarkConfig, BenchmarkRunner, InputParser,
    PlanInput,
};
use proptest::prelude::*;

const REFERENCE: &str = "NATURAL,40,500.0\n1001,6200,30,9.653\n2001,7200,50,11.21\n";

#[test]
fn test_reference_input_to_text() {
    let input = InputParser::new().parse_str(REFERENCE).unwrap();
    let config = input.config(PackingConfig::new().with_threads(1));
    let result = Planner::new().plan(&config, &input.items);

    let expected = "Pack Number: 1\n\
                    1001,6200,30,9.653\n\
                    2001,7200,10,11.210\n\
                    Pack Length: 7200, Pack Weight: 401.69\n\
                    Pack Number: 2\n\
                    2001,7200,40,11.210\n\
                    Pack Length: 7200, Pack Weight: 448.40\n";
    assert_eq!(to_text(&result, false), expected);

    let timed = to_text(&result, true);
    assert!(timed.starts_with(expected));
    assert!(timed.contains("Packs created: 2"));
    assert!(timed.contains("Items processed: 80"));
}

#[test]
fn test_reference_input_to_json() {
    let input = InputParser::new().parse_str(REFERENCE).unwrap();
    let config = input.config(PackingConfig::new().with_strategy(StrategyKind::BestFit));
    let result = Planner::new().plan(&config, &input.items);

    let value: serde_json::Value = serde_json::from_str(&to_json(&result).unwrap()).unwrap();
    assert_eq!(value["strategy_name"], "BestFit");
    assert_eq!(value["packs"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_negative_max_items_is_clamped() {
    let input = InputParser::new()
        .parse_str("NATURAL,-5,500.0\n1001,6200,3,9.653\n")
        .unwrap();
    let result = Planner::new().plan(&input.config(PackingConfig::new()), &input.items);

    assert_eq!(result.pack_count(), 3);
    assert!(result.packs.iter().all(|p| p.total_items() == 1));
}

#[test]
fn test_generated_input_parses_back() {
    let generated = PlanInput {
        sort_order: "SHORT_TO_LONG".parse().unwrap(),
        max_items: 25,
        max_weight: 300.0,
        items: uniform(500, 7),
    };
    let parsed = InputParser::new().parse_str(&generated.to_string()).unwrap();

    assert_eq!(parsed.sort_order, generated.sort_order);
    assert_eq!(parsed.max_items, 25);
    assert_eq!(parsed.max_weight, 300.0);
    assert_eq!(parsed.items.len(), 500);
    for (a, b) in parsed.items.iter().zip(&generated.items) {
        assert_eq!((a.id(), a.length(), a.quantity()), (b.id(), b.length(), b.quantity()));
        assert!((a.weight() - b.weight()).abs() < 1e-3);
    }
}

#[test]
fn test_problematic_input_through_every_strategy() {
    let items = problematic();
    let total: u64 = items.iter().map(|i| u64::from(i.units())).sum();
    let planner = Planner::new();

    for &kind in StrategyKind::all() {
        let config = PackingConfig::new()
            .with_strategy(kind)
            .with_max_items(5)
            .with_max_weight(100.0)
            .with_threads(2);
        let result = planner.plan(&config, &items);
        assert_eq!(result.packed_quantity(), total, "{kind}");
        assert!(result
            .packs
            .iter()
            .all(|p| p.total_items() <= 5 && p.total_weight() <= 100.0 + 1e-9));
    }
}

#[test]
fn test_benchmark_json_output() {
    let config = BenchmarkConfig::quick().with_sizes(vec![100]).with_threads(1);
    let results = BenchmarkRunner::new(config).run();
    assert_eq!(results.runs.len(), 2);

    let path = std::env::temp_dir().join(format!("packplan-cli-{}.json", std::process::id()));
    results.save_json(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert!(text.contains("\"strategy\": \"Blocking\""));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_parser_never_panics(body in "[0-9A-Za-z_,. \\-\n]{0,200}") {
        let _ = InputParser::new().parse_str(&body);
    }

    #[test]
    fn prop_well_formed_lines_parse(
        rows in prop::collection::vec((1i64..100_000, 1u32..20_000, 1i32..500, 0.001f64..100.0), 0..40)
    ) {
        let mut text = String::from("LONG_TO_SHORT,40,500\n");
        for (id, length, quantity, weight) in &rows {
            text.push_str(&format!("{id}, {length} ,{quantity},{weight}\n"));
        }
        let input = InputParser::new().parse_str(&text).unwrap();
        prop_assert_eq!(input.items.len(), rows.len());
    }
}
