use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;

/// Destination of a JSON document.
enum JsonSink<'a> {
    Stdout(io::StdoutLock<'static>),
    File(BufWriter<File>, &'a Path),
}

impl JsonSink<'_> {
    fn name(&self) -> String {
        match self {
            JsonSink::Stdout(_) => "stdout".to_owned(),
            JsonSink::File(_, path) => path.display().to_string(),
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            JsonSink::Stdout(writer) => writer,
            JsonSink::File(writer, _) => writer,
        }
    }
}

/// Writes `value` as pretty JSON to `path`, or to stdout when no path is
/// given.
pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let mut sink = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            JsonSink::File(BufWriter::new(file), path)
        }
        None => JsonSink::Stdout(io::stdout().lock()),
    };

    let writer = sink.writer();
    serde_json::to_writer_pretty(&mut *writer, value)
        .map_err(io::Error::from)
        .and_then(|()| writeln!(writer))
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write JSON to {}", sink.name()))
}

/// Reads a JSON document; `kind` names the file in error messages.
pub fn read_json_file<T>(kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open {kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {kind} JSON file: {}", path.display()))
}

/// Write serializable records as CSV with a header row
///
/// # Returns
///
/// Number of records written
///
/// # Errors
///
/// Returns error if the file cannot be created or a record cannot be written
pub fn write_csv_rows<T, I>(path: &Path, rows: I) -> anyhow::Result<usize>
where
    T: serde::Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    let mut count = 0;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write CSV row to {}", path.display()))?;
        count += 1;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush CSV file: {}", path.display()))?;
    Ok(count)
}
