use std::fmt::Display;
use std::fs::File;
use std::io;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::info;

pub fn input_stream(path: &str) -> Result<InputStream, String> {
    let result = InputStream {
        path: PathBuf::from(path),
    };

    Ok(result)
}

#[derive(Debug, Clone)]
pub struct InputStream {
    path: PathBuf,
}

impl Display for InputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl Default for InputStream {
    fn default() -> Self {
        Self {
            path: PathBuf::from("-"),
        }
    }
}

impl InputStream {
    pub fn as_reader(&self) -> anyhow::Result<InputReader> {
        InputReader::from_path(&self.path)
    }
}

#[derive(Debug)]
pub enum InputReader {
    Stdin(io::Stdin),
    File(File),
}

impl InputReader {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        let is_stdin = path.to_string_lossy() == "-";

        let val = if is_stdin {
            info!("Reading contacts from the standard input");
            Self::Stdin(io::stdin())
        } else {
            info!("Reading contacts from {}", path.display());
            Self::File(File::open(path)?)
        };
        Ok(val)
    }

    #[must_use]
    pub fn into_read(self) -> Box<dyn Read + Send> {
        match self {
            InputReader::Stdin(stdin) => Box::new(stdin),
            InputReader::File(file) => Box::new(file),
        }
    }
}

#[derive(Debug)]
pub enum OutputWriter {
    Stdout(io::Stdout),
    File(File),
}

impl OutputWriter {
    /// Opens given path for writing; `None` and `-` denote the standard
    /// output.
    pub fn from_path(output: &Option<PathBuf>) -> anyhow::Result<Self> {
        let path = output.as_deref().unwrap_or_else(|| Path::new("-"));
        let is_stdout = path.to_string_lossy() == "-";

        let writer = if is_stdout {
            Self::Stdout(io::stdout())
        } else {
            info!("Output file: {}", path.display());
            Self::File(File::create(path)?)
        };

        Ok(writer)
    }

    pub fn into_write(self) -> Box<dyn Write + Send> {
        match self {
            OutputWriter::Stdout(stdout) => Box::new(stdout),
            OutputWriter::File(file) => Box::new(file),
        }
    }
}
