use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

/// Trait for corpus types that can stream documents.
pub trait TextCorpus {
    type Stream: Iterator<Item = io::Result<String>>;
    fn stream(&self) -> io::Result<Self::Stream>;
}

/// An ordered list of extract files holding one document per line.
#[derive(Clone, Debug)]
pub struct DocumentCorpus {
    files: Vec<PathBuf>,
}

impl DocumentCorpus {
    pub fn new(files: Vec<PathBuf>) -> io::Result<Self> {
        if files.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "expected at least one file for corpus",
            ));
        }

        for path in &files {
            if !path.is_file() {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("corpus file not found at {}", path.display()),
                ));
            }
        }

        Ok(Self { files })
    }

    pub fn file_paths(&self) -> &[PathBuf] {
        &self.files
    }
}

impl TextCorpus for DocumentCorpus {
    type Stream = DocumentStream;

    fn stream(&self) -> io::Result<Self::Stream> {
        Ok(DocumentStream {
            files: self.files.clone(),
            next_file: 0,
            current_reader: None,
        })
    }
}

/// Iterator yielding the non-blank lines of each file in order.
pub struct DocumentStream {
    files: Vec<PathBuf>,
    next_file: usize,
    current_reader: Option<io::Lines<BufReader<File>>>,
}

impl DocumentStream {
    fn advance_file(&mut self) -> io::Result<bool> {
        if self.next_file >= self.files.len() {
            return Ok(false);
        }

        let path = &self.files[self.next_file];
        let file = File::open(path).map_err(|err| {
            io::Error::new(
                err.kind(),
                format!("failed to open corpus file {}: {err}", path.display()),
            )
        })?;
        self.current_reader = Some(BufReader::new(file).lines());
        self.next_file += 1;
        Ok(true)
    }
}

impl Iterator for DocumentStream {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(reader) = self.current_reader.as_mut() {
                match reader.next() {
                    Some(Ok(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        return Some(Ok(line));
                    }
                    Some(Err(err)) => return Some(Err(err)),
                    None => {
                        self.current_reader = None;
                        continue;
                    }
                }
            }

            match self.advance_file() {
                Ok(true) => continue,
                Ok(false) => return None,
                Err(err) => {
                    // Do not retry the failing file forever.
                    self.next_file = self.files.len();
                    return Some(Err(err));
                }
            }
        }
    }
}
