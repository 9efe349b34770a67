use std::io::Write;

use anyhow::Context;
use labrador::HicExperiment;

/// Query parameters, as given on the command line.
#[derive(Debug)]
pub(crate) struct QueryArgs<'a> {
    pub chrom: &'a str,
    pub start: u64,
    pub end: u64,
    pub field: &'a str,
    pub symmetric: bool,
}

/// Writes the queried block with a header row and a leading column holding
/// the start coordinates of the bins.
pub(crate) fn query<W: Write>(
    experiment: &HicExperiment,
    args: &QueryArgs<'_>,
    writer: W,
    delimiter: u8,
) -> anyhow::Result<()> {
    let block = experiment
        .query(args.chrom, args.start, args.end, args.field, args.symmetric)
        .with_context(|| {
            format!(
                "Failed to query {}:{}-{}",
                args.chrom, args.start, args.end
            )
        })?;

    let resolution = experiment.resolution();
    let first_coordinate = args.start / resolution * resolution;
    let coordinates: Vec<String> = (0..block.nrows())
        .map(|bin| (first_coordinate + bin as u64 * resolution).to_string())
        .collect();

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    csv_writer.write_record(std::iter::once("pos").chain(coordinates.iter().map(String::as_str)))?;
    for (coordinate, row) in coordinates.iter().zip(block.rows()) {
        let values = row.iter().map(ToString::to_string);
        csv_writer.write_record(std::iter::once(coordinate.clone()).chain(values))?;
    }
    csv_writer.flush()?;

    Ok(())
}
