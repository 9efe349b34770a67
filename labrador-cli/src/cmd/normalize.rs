use std::io::Write;

use anyhow::Context;
use labrador::normalization::NormalizationMethod;
use labrador::HicExperiment;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct NormalizedRecord<'a> {
    chrom: &'a str,
    pos1: u64,
    pos2: u64,
    source: f64,
    normalized: f64,
}

/// Normalizes every chromosome and writes each stored entry along with its
/// source and normalized values.
pub(crate) fn normalize<W: Write>(
    experiment: &mut HicExperiment,
    method: &NormalizationMethod,
    source_field: &str,
    writer: W,
    delimiter: u8,
) -> anyhow::Result<()> {
    experiment
        .normalize_all(method, source_field)
        .with_context(|| format!("Failed to normalize field {} with {}", source_field, method))?;

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    for matrix in experiment.matrices() {
        let source = matrix.field(source_field)?;
        let normalized = matrix.field(method.name())?;
        let resolution = matrix.resolution();

        for ((row, col, source_value), &normalized_value) in
            source.iter().zip(normalized.values())
        {
            csv_writer.serialize(NormalizedRecord {
                chrom: matrix.chrom(),
                pos1: row as u64 * resolution,
                pos2: col as u64 * resolution,
                source: source_value,
                normalized: normalized_value,
            })?;
        }
    }
    csv_writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use labrador::normalization::NormalizationMethod;
    use labrador::{HicExperimentBuilder, RAW_COUNT_FIELD};

    use crate::cmd::normalize::normalize;

    #[test]
    fn test_normalize_writes_records() {
        let mut builder = HicExperimentBuilder::new(1000, [RAW_COUNT_FIELD]).unwrap();
        builder
            .add_contact("chr1", 0, "chr1", 0, &[5.0])
            .unwrap()
            .add_contact("chr1", 1000, "chr1", 1000, &[3.0])
            .unwrap()
            .add_contact("chr1", 0, "chr1", 1000, &[2.0])
            .unwrap();
        let mut experiment = builder.build().unwrap();
        let mut output = Vec::new();

        normalize(
            &mut experiment,
            &NormalizationMethod::MinMax,
            RAW_COUNT_FIELD,
            &mut output,
            b',',
        )
        .unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "chrom,pos1,pos2,source,normalized");
        assert_eq!(lines[1], "chr1,0,0,5.0,1.0");
        assert_eq!(lines[3], "chr1,0,1000,2.0,0.0");
        assert_eq!(lines.len(), 4);
    }
}
