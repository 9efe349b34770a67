use std::io::Write;

use anyhow::Context;
use labrador::HicExperiment;

pub(crate) fn stats<W: Write>(experiment: &HicExperiment, mut writer: W) -> anyhow::Result<()> {
    for matrix in experiment.matrices() {
        writeln!(writer, "{}", matrix)
            .with_context(|| format!("Could not write summary of {}", matrix.chrom()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use labrador::{HicExperimentBuilder, RAW_COUNT_FIELD};

    use crate::cmd::stats::stats;

    #[test]
    fn test_stats_prints_every_chromosome() {
        let mut builder = HicExperimentBuilder::new(1000, [RAW_COUNT_FIELD]).unwrap();
        builder
            .add_contact("chr1", 0, "chr1", 0, &[5.0])
            .unwrap()
            .add_contact("chr2", 0, "chr2", 1000, &[2.0])
            .unwrap();
        let experiment = builder.build().unwrap();
        let mut output = Vec::new();

        stats(&experiment, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Sparse matrix for chromosome chr1:"));
        assert!(output.contains("Sparse matrix for chromosome chr2:"));
        assert!(output.contains("[RawCount]"));
    }
}
