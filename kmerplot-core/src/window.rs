//! Windowing encoder
//!
//! Splits every sequence of a FASTA/FASTQ file (plain or gzipped, parsed with
//! needletail) into consecutive k-mer windows and writes each window as its
//! own FASTA record named `<sample>_<start>_to_<end>`. The sample name is the
//! full header line of the source record. A trailing window shorter than the
//! k-mer size keeps its true end coordinate.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use needletail::parse_fastx_reader;

use crate::error::{KmerPlotError, Result};
use crate::types::{Position, WindowId};

/// Default window size in bases
pub const DEFAULT_KMER_SIZE: usize = 100;

/// Smallest window size accepted unless configured otherwise
pub const DEFAULT_MIN_KMER_SIZE: usize = 100;

/// Counters reported after an encoding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub sequences: usize,
    pub windows: usize,
    pub bases: u64,
}

/// Splits sequences into fixed-size, tagged windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEncoder {
    kmer_size: usize,
}

impl WindowEncoder {
    pub fn new(kmer_size: usize, min_kmer_size: usize) -> Result<Self> {
        if kmer_size == 0 || kmer_size < min_kmer_size {
            return Err(KmerPlotError::KmerSizeTooSmall { kmer_size, min_kmer_size });
        }
        Ok(Self { kmer_size })
    }

    pub fn kmer_size(&self) -> usize {
        self.kmer_size
    }

    /// Windows of one sequence with their identifiers, in order
    pub fn windows<'s>(&self, sample: &'s str, sequence: &'s [u8]) -> impl Iterator<Item = (WindowId, &'s [u8])> + 's {
        let kmer_size = self.kmer_size;
        sequence.chunks(kmer_size).enumerate().map(move |(i, chunk)| {
            let start = (i * kmer_size) as Position;
            let end = start + chunk.len() as Position - 1;
            (WindowId::new(sample, start, end), chunk)
        })
    }

    /// Write the windows of one sequence, returning how many were written
    pub fn write_sequence<W: Write>(&self, sample: &str, sequence: &[u8], out: &mut W) -> Result<usize> {
        let mut count = 0;
        for (id, chunk) in self.windows(sample, sequence) {
            writeln!(out, ">{}", id)?;
            out.write_all(chunk)?;
            out.write_all(b"\n")?;
            count += 1;
        }
        Ok(count)
    }

    /// Encode every record of a FASTA/FASTQ stream
    pub fn encode_reader<R, W>(&self, reader: R, out: &mut W) -> Result<EncodeStats>
    where
        R: Read + Send,
        W: Write,
    {
        let mut stats = EncodeStats::default();
        let mut fastx_reader = parse_fastx_reader(reader)
            .map_err(|e| KmerPlotError::SequenceParse(e.to_string()))?;

        while let Some(record) = fastx_reader.next() {
            let record = record.map_err(|e| KmerPlotError::SequenceParse(e.to_string()))?;
            let sample = String::from_utf8_lossy(record.id()).into_owned();
            let sequence = record.seq();

            let windows = self.write_sequence(&sample, &sequence, out)?;
            log::debug!("{}: {} bases in {} windows", sample, sequence.len(), windows);

            stats.sequences += 1;
            stats.windows += windows;
            stats.bases += sequence.len() as u64;
        }

        out.flush()?;
        Ok(stats)
    }

    /// Encode a sequence file into a new window file
    pub fn encode_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<EncodeStats> {
        let input = input.as_ref();
        let reader = File::open(input)?;
        let mut writer = BufWriter::new(File::create(output.as_ref())?);

        let stats = self.encode_reader(reader, &mut writer)?;
        if stats.sequences == 0 {
            return Err(KmerPlotError::EmptyInput { input: input.display().to_string() });
        }

        log::info!(
            "Wrote {} windows of {} bp from {} sequences ({} bases)",
            stats.windows,
            self.kmer_size,
            stats.sequences,
            stats.bases
        );
        Ok(stats)
    }
}
