//! Line-based planner input parser.
//!
//! ```text
//! SORT_ORDER,max_items,max_weight
//! id,length,quantity,weight
//! ...
//! ```
//!
//! Fields are comma-separated and trimmed. Reading stops at the first empty
//! line or at end of input.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use packplan_core::{Error, Item, PackingConfig, Result, SortOrder};

/// A parsed planner input: header values plus items.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanInput {
    /// Requested item ordering.
    pub sort_order: SortOrder,
    /// Maximum units per pack.
    pub max_items: u32,
    /// Maximum weight per pack.
    pub max_weight: f64,
    /// Items in input order.
    pub items: Vec<Item>,
}

impl PlanInput {
    /// Applies the header values to `base`, keeping its other fields.
    pub fn config(&self, base: PackingConfig) -> PackingConfig {
        base.with_sort_order(self.sort_order)
            .with_max_items(self.max_items)
            .with_max_weight(self.max_weight)
    }
}

impl fmt::Display for PlanInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{},{},{}", self.sort_order, self.max_items, self.max_weight)?;
        for item in &self.items {
            writeln!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Parser for the planner input format.
#[derive(Debug, Default)]
pub struct InputParser;

impl InputParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses input from a file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<PlanInput> {
        let file = File::open(path)?;
        self.parse_reader(BufReader::new(file))
    }

    /// Parses input from a string.
    pub fn parse_str(&self, input: &str) -> Result<PlanInput> {
        self.parse_reader(input.as_bytes())
    }

    /// Parses input from any buffered reader.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<PlanInput> {
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(Error::parse(1, "missing header line")),
        };
        let header = header.trim();
        if header.is_empty() {
            return Err(Error::parse(1, "missing header line"));
        }
        let (sort_order, max_items, max_weight) = parse_header(header)?;

        let mut items = Vec::new();
        for (index, line) in lines.enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                break;
            }
            items.push(parse_item(line, index + 2)?);
        }

        log::debug!("parsed {} items ({}, {}, {})", items.len(), sort_order, max_items, max_weight);
        Ok(PlanInput {
            sort_order,
            max_items,
            max_weight,
            items,
        })
    }
}

fn fields<'a, const N: usize>(line: &'a str, line_no: usize, what: &str) -> Result<[&'a str; N]> {
    let parts: Vec<&'a str> = line.split(',').map(str::trim).collect();
    <[&'a str; N]>::try_from(parts.as_slice()).map_err(|_| {
        Error::parse(
            line_no,
            format!("expected {N} comma-separated {what} fields, found {}", parts.len()),
        )
    })
}

fn number<T: FromStr>(value: &str, line_no: usize, name: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    value
        .parse()
        .map_err(|e| Error::parse(line_no, format!("invalid {name} '{value}': {e}")))
}

fn parse_header(line: &str) -> Result<(SortOrder, u32, f64)> {
    let [order, max_items, max_weight] = fields::<3>(line, 1, "header")?;
    let sort_order = order
        .parse::<SortOrder>()
        .map_err(|e| Error::parse(1, e.to_string()))?;
    // Out-of-range counts saturate; the planner clamps them to at least 1.
    let max_items = number::<i64>(max_items, 1, "max items")?;
    let max_items = u32::try_from(max_items.max(0)).unwrap_or(u32::MAX);
    let max_weight = number::<f64>(max_weight, 1, "max weight")?;
    Ok((sort_order, max_items, max_weight))
}

fn parse_item(line: &str, line_no: usize) -> Result<Item> {
    let [id, length, quantity, weight] = fields::<4>(line, line_no, "item")?;
    let item = Item::new(
        number(id, line_no, "id")?,
        number(length, line_no, "length")?,
        number(quantity, line_no, "quantity")?,
        number(weight, line_no, "weight")?,
    );
    item.validate()
        .map_err(|e| Error::parse(line_no, e.to_string()))?;
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "NATURAL,40,500.0\n1001,6200,30,9.653\n2001,7200,50,11.21\n";

    #[test]
    fn test_parse_sample() {
        let input = InputParser::new().parse_str(SAMPLE).unwrap();
        assert_eq!(input.sort_order, SortOrder::Natural);
        assert_eq!(input.max_items, 40);
        assert_eq!(input.max_weight, 500.0);
        assert_eq!(input.items.len(), 2);
        assert_eq!(input.items[1], Item::new(2001, 7200, 50, 11.21));
    }

    #[test]
    fn test_whitespace_and_empty_line_terminator() {
        let text = "  LONG_TO_SHORT , 10 , 25.5 \n 1 , 100 , 2 , 3.5 \n\n2,200,1,1.0\n";
        let input = InputParser::new().parse_str(text).unwrap();
        assert_eq!(input.sort_order, SortOrder::LongToShort);
        assert_eq!(input.items, vec![Item::new(1, 100, 2, 3.5)]);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let parser = InputParser::new();
        match parser.parse_str("NATURAL,40,500\n1,2,3,4\n1,2,x,4\n") {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
        match parser.parse_str("SIDEWAYS,40,500\n") {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected parse error, got {other:?}"),
        }
        match parser.parse_str("NATURAL,40\n") {
            Err(Error::Parse { line, message }) => {
                assert_eq!(line, 1);
                assert!(message.contains("expected 3"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        assert!(parser.parse_str("").is_err());
        assert!(parser.parse_str("NATURAL,4,5\n1,2,3,NaN\n").is_err());
    }

    #[test]
    fn test_display_is_parseable() {
        let input = InputParser::new().parse_str(SAMPLE).unwrap();
        let text = input.to_string();
        assert!(text.starts_with("NATURAL,40,500\n1001,6200,30,9.653\n"));
        let again = InputParser::new().parse_str(&text).unwrap();
        assert_eq!(again.items.len(), 2);
        assert_eq!(again.max_weight, 500.0);
    }

    #[test]
    fn test_degenerate_max_items_is_accepted() {
        let parser = InputParser::new();
        let negative = parser.parse_str("NATURAL,-5,500.0\n1001,6200,30,9.653\n").unwrap();
        assert_eq!(negative.max_items, 0);
        assert_eq!(negative.items.len(), 1);

        let zero = parser.parse_str("NATURAL,0,500.0\n1001,6200,30,9.653\n").unwrap();
        assert_eq!(zero.max_items, 0);
        let config = zero.config(PackingConfig::new()).validated();
        assert_eq!(config.max_items_per_pack, 1);

        let huge = parser.parse_str("NATURAL,99999999999,500.0\n").unwrap();
        assert_eq!(huge.max_items, u32::MAX);
    }

    #[test]
    fn test_config_applies_header() {
        let input = InputParser::new().parse_str(SAMPLE).unwrap();
        let config = input.config(PackingConfig::new().with_threads(3));
        assert_eq!(config.max_items_per_pack, 40);
        assert_eq!(config.max_weight_per_pack, 500.0);
        assert_eq!(config.thread_count, 3);
    }
}
