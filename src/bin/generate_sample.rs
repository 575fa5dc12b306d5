use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use fileflow::data::export::write_xlsx;
use fileflow::data::loader::parse_csv;

/// Rows of the sample file; `None` fields are written as empty cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct SaleRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Customer Name")]
    customer: &'static str,
    #[serde(rename = "Product")]
    product: &'static str,
    #[serde(rename = "Quantity")]
    quantity: Option<u32>,
    #[serde(rename = "Price")]
    price: Option<f64>,
}

/// splitmix64, seeded directly. Only has to be repeatable, not strong.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }

    /// True about `percent` times in a hundred.
    fn percent(&mut self, percent: u64) -> bool {
        self.next_u64() % 100 < percent
    }
}

fn generate_sales(rng: &mut SampleRng, rows: usize) -> Vec<SaleRecord> {
    let customers = ["Ana", "Bilal", "Chen", "Dana", "Emeka"];
    let products = [("Notebook", 3.5), ("Pen", 1.25), ("Backpack", 24.0), ("Lamp", 18.9)];

    let mut records: Vec<SaleRecord> = Vec::with_capacity(rows);
    for day in 0..rows {
        // Roughly one row in ten repeats an earlier one verbatim.
        if !records.is_empty() && rng.percent(10) {
            let earlier = rng.pick(&records).clone();
            records.push(earlier);
            continue;
        }

        let &(product, unit_price) = rng.pick(&products);
        let quantity = 1 + rng.below(9) as u32;
        records.push(SaleRecord {
            date: format!("2024-03-{:02}", day % 28 + 1),
            customer: *rng.pick(&customers),
            product,
            quantity: (!rng.percent(8)).then_some(quantity),
            price: (!rng.percent(8)).then_some(unit_price * f64::from(quantity)),
        });
    }
    records
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SampleRng(42);
    let records = generate_sales(&mut rng, 60);

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for record in &records {
        writer.serialize(record).context("serializing sample row")?;
    }
    let csv_bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV buffer: {e}"))?;

    let csv_path = out_dir.join("sales_sample.csv");
    std::fs::write(&csv_path, &csv_bytes)
        .with_context(|| format!("writing {}", csv_path.display()))?;

    let frame = parse_csv(&csv_bytes).context("re-reading generated CSV")?;
    let xlsx_path = out_dir.join("sales_sample.xlsx");
    std::fs::write(&xlsx_path, write_xlsx(&frame)?)
        .with_context(|| format!("writing {}", xlsx_path.display()))?;

    log::info!(
        "Wrote {} sales rows to {} and {}",
        records.len(),
        csv_path.display(),
        xlsx_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_rows() {
        let a = generate_sales(&mut SampleRng(7), 50);
        let b = generate_sales(&mut SampleRng(7), 50);
        assert_eq!(a.len(), 50);
        assert_eq!(a, b);
    }

    #[test]
    fn sample_has_duplicates_and_gaps() {
        let records = generate_sales(&mut SampleRng(42), 600);
        let repeated = records
            .iter()
            .enumerate()
            .any(|(i, r)| records[..i].contains(r));
        assert!(repeated, "expected at least one repeated row");
        assert!(records.iter().any(|r| r.quantity.is_none() || r.price.is_none()));
    }
}
