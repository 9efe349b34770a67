use std::io::Read;

use anyhow::{anyhow, bail, Context};
use csv::StringRecord;
use itertools::Itertools;
use labrador::{HicExperiment, HicExperimentBuilder};
use log::info;

use crate::PROGRESS_BAR;

const CHROM1_COLUMN: &str = "chrom1";
const POS1_COLUMN: &str = "pos1";
const CHROM2_COLUMN: &str = "chrom2";
const POS2_COLUMN: &str = "pos2";

/// Positions of the used columns within a record.
#[derive(Debug)]
struct ColumnLayout {
    chrom1: usize,
    pos1: usize,
    chrom2: usize,
    pos2: usize,
    values: Vec<usize>,
}

impl ColumnLayout {
    fn from_header(header: &StringRecord, fields: &[String]) -> anyhow::Result<Self> {
        let column = |name: &str| {
            header
                .iter()
                .position(|column| column == name)
                .ok_or_else(|| {
                    anyhow!(
                        "Column {} not found in the header (available columns: {})",
                        name,
                        header.iter().join(", ")
                    )
                })
        };

        Ok(Self {
            chrom1: column(CHROM1_COLUMN)?,
            pos1: column(POS1_COLUMN)?,
            chrom2: column(CHROM2_COLUMN)?,
            pos2: column(POS2_COLUMN)?,
            values: fields
                .iter()
                .map(|field| column(field))
                .collect::<anyhow::Result<_>>()?,
        })
    }
}

/// Reads a delimited contact file with a header line, one contact per
/// record.
pub(crate) fn load_experiment<R: Read>(
    reader: R,
    delimiter: u8,
    resolution: u64,
    fields: &[String],
) -> anyhow::Result<HicExperiment> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let header = csv_reader
        .headers()
        .context("Could not read the header line")?
        .clone();
    let layout = ColumnLayout::from_header(&header, fields)?;
    let mut builder = HicExperimentBuilder::new(resolution, fields.iter().cloned())
        .context("Invalid experiment parameters")?;

    PROGRESS_BAR.set_length(0);
    let mut values = vec![0.0; fields.len()];
    let mut record = StringRecord::new();
    let mut line = 1;
    while csv_reader
        .read_record(&mut record)
        .with_context(|| format!("Could not read record after line {}", line))?
    {
        line += 1;
        let parse_pos = |index: usize| -> anyhow::Result<u64> {
            record[index]
                .trim()
                .parse()
                .with_context(|| format!("Invalid position at line {}: {}", line, &record[index]))
        };
        let pos1 = parse_pos(layout.pos1)?;
        let pos2 = parse_pos(layout.pos2)?;
        for (value, &index) in values.iter_mut().zip(&layout.values) {
            *value = record[index]
                .trim()
                .parse()
                .with_context(|| format!("Invalid value at line {}: {}", line, &record[index]))?;
        }

        builder.add_contact(
            &record[layout.chrom1],
            pos1,
            &record[layout.chrom2],
            pos2,
            &values,
        )?;
        PROGRESS_BAR.inc(1);
    }
    if line == 1 {
        bail!("Input contains no contacts");
    }
    info!("Read {} contacts", line - 1);

    let experiment = builder.build().context("Could not build contact matrices")?;
    Ok(experiment)
}
