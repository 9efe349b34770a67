use std::io::Write;

use anyhow::Context;
use labrador::topdom::TopDomParams;
use labrador::HicExperiment;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct BoundaryRecord<'a> {
    chrom: &'a str,
    coordinate: u64,
    p_value: Option<f64>,
}

/// Calls domain boundaries in given chromosomes and writes one record per
/// boundary.
pub(crate) fn topdom<W: Write>(
    experiment: &HicExperiment,
    chroms: &[String],
    field: &str,
    params: &TopDomParams,
    writer: W,
    delimiter: u8,
) -> anyhow::Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    for chrom in chroms {
        let boundaries = experiment
            .call_topdom(chrom, field, params)
            .with_context(|| format!("Failed to call domains in chromosome {}", chrom))?;

        for boundary in boundaries {
            csv_writer.serialize(BoundaryRecord {
                chrom: chrom.as_str(),
                coordinate: boundary.coordinate,
                p_value: boundary.p_value,
            })?;
        }
    }
    csv_writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use labrador::_internal_test_data::TWO_TAD_MATRIX;
    use labrador::topdom::TopDomParams;
    use labrador::{HicExperimentBuilder, RAW_COUNT_FIELD};

    use crate::cmd::topdom::topdom;

    #[test]
    fn test_topdom_writes_boundaries() {
        let field = TWO_TAD_MATRIX.field(RAW_COUNT_FIELD).unwrap();
        let mut builder = HicExperimentBuilder::new(5000, [RAW_COUNT_FIELD]).unwrap();
        for (row, col, value) in field.iter() {
            builder
                .add_contact("chr1", row as u64 * 5000, "chr1", col as u64 * 5000, &[value])
                .unwrap();
        }
        let experiment = builder.build().unwrap();
        let params = TopDomParams::builder()
            .window_size(15_000)
            .significance_test(false)
            .build();
        let mut output = Vec::new();

        topdom(
            &experiment,
            &["chr1".to_owned()],
            RAW_COUNT_FIELD,
            &params,
            &mut output,
            b'\t',
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "chrom\tcoordinate\tp_value\nchr1\t95000\t\n"
        );
    }

    #[test]
    fn test_topdom_unknown_chromosome() {
        let builder = HicExperimentBuilder::new(5000, [RAW_COUNT_FIELD]).unwrap();
        let experiment = builder.build().unwrap();

        let result = topdom(
            &experiment,
            &["chr1".to_owned()],
            RAW_COUNT_FIELD,
            &TopDomParams::default(),
            Vec::new(),
            b'\t',
        );

        assert!(result.is_err());
    }
}
