//! Terminal rendering for predictions and metrics tables.

use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use skimlit_core::ClassifiedAbstract;
use skimlit_core::api::MetricsTable;

/// Delay between words for `--reveal`, matching the page.
pub const REVEAL_DELAY: Duration = Duration::from_millis(50);

/// Print a classified abstract as `CATEGORY: line` blocks or as an Arrow table.
pub fn print_predictions(
    classified: &ClassifiedAbstract,
    table: bool,
    reveal: bool,
) -> anyhow::Result<()> {
    if table {
        let batch = classified.to_record_batch()?;
        println!("{}", pretty_format_batches(&[batch])?);
        return Ok(());
    }

    let rendered = classified.render();
    let mut stdout = io::stdout().lock();
    if reveal {
        reveal_words(&mut stdout, &rendered, REVEAL_DELAY)?;
    } else {
        writeln!(stdout, "{rendered}")?;
    }
    Ok(())
}

/// Write `text` one word at a time, flushing after each.
pub fn reveal_words<W: Write>(out: &mut W, text: &str, delay: Duration) -> io::Result<()> {
    // Split on spaces only so the blank lines between blocks survive.
    let mut words = text.split(' ').peekable();
    while let Some(word) = words.next() {
        out.write_all(word.as_bytes())?;
        if words.peek().is_some() {
            out.write_all(b" ")?;
        }
        out.flush()?;
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
    out.write_all(b"\n")?;
    out.flush()
}

/// Print a titled metrics batch read from disk.
pub fn print_batch(title: &str, batch: &RecordBatch) -> anyhow::Result<()> {
    println!("{title}");
    println!("{}", pretty_format_batches(std::slice::from_ref(batch))?);
    Ok(())
}

/// Print a titled metrics table received from a server.
pub fn print_table(title: &str, table: &MetricsTable) -> anyhow::Result<()> {
    print_batch(title, &table_to_batch(table)?)
}

/// All-`Utf8` batch so server tables share the local pretty printer.
pub fn table_to_batch(table: &MetricsTable) -> anyhow::Result<RecordBatch> {
    let fields: Vec<Field> = table
        .columns
        .iter()
        .map(|name| Field::new(name, DataType::Utf8, true))
        .collect();

    let columns: Vec<ArrayRef> = (0..table.columns.len())
        .map(|i| {
            let values = table.rows.iter().map(|row| row.get(i).map(String::as_str));
            Arc::new(StringArray::from_iter(values)) as ArrayRef
        })
        .collect();

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}
