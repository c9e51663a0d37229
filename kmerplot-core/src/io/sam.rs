//! SAM/BAM reader for k-mer alignment records
//!
//! Reads text SAM or binary BAM with noodles and turns each record into an
//! [`AlignmentRecord`]: the query name is parsed as a window identifier, the
//! unmapped flag decides `is_mapped`, the reference id is resolved through the
//! header and MAPQ is carried over (255 when unset).

use std::io::BufRead;
use std::path::Path;

use noodles::bam;
use noodles::sam::{self as sam, alignment::RecordBuf, Header};

use super::AlignmentFormat;
use crate::error::{KmerPlotError, Result};
use crate::types::{AlignmentRecord, MAPQ_UNAVAILABLE};

/// SAM/BAM parser producing alignment records
pub struct SamParser;

impl SamParser {
    /// Parse a file, choosing BAM for a `.bam` extension and SAM otherwise
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<AlignmentRecord>> {
        match AlignmentFormat::from_path(&path) {
            AlignmentFormat::Bam => Self::parse_bam_file(path),
            AlignmentFormat::Sam => Self::parse_sam_file(path),
        }
    }

    /// Parse a SAM file (compressed SAM is detected by the noodles builder)
    pub fn parse_sam_file<P: AsRef<Path>>(path: P) -> Result<Vec<AlignmentRecord>> {
        let mut reader = sam::io::reader::Builder::default().build_from_path(path)?;
        let header = reader.read_header()?;
        Self::convert_records(reader.record_bufs(&header), &header)
    }

    /// Parse a BAM file
    pub fn parse_bam_file<P: AsRef<Path>>(path: P) -> Result<Vec<AlignmentRecord>> {
        let mut reader = bam::io::reader::Builder::default().build_from_path(path)?;
        let header = reader.read_header()?;
        Self::convert_records(reader.record_bufs(&header), &header)
    }

    /// Parse SAM text from any buffered reader
    pub fn parse_sam_reader<R: BufRead>(inner: R) -> Result<Vec<AlignmentRecord>> {
        let mut reader = sam::io::Reader::new(inner);
        let header = reader.read_header()?;
        Self::convert_records(reader.record_bufs(&header), &header)
    }

    fn convert_records<I>(records: I, header: &Header) -> Result<Vec<AlignmentRecord>>
    where
        I: Iterator<Item = std::io::Result<RecordBuf>>,
    {
        let mut alignments = Vec::new();
        for result in records {
            let record = result?;
            alignments.push(Self::record_to_alignment(&record, header)?);
        }
        Ok(alignments)
    }

    /// Convert one SAM/BAM record
    fn record_to_alignment(record: &RecordBuf, header: &Header) -> Result<AlignmentRecord> {
        let name = record
            .name()
            .ok_or_else(|| KmerPlotError::invalid_record("record without a query name"))?;
        let query_name = std::str::from_utf8(name.as_ref())
            .map_err(|_| KmerPlotError::invalid_record("query name is not valid UTF-8"))?
            .to_string();

        let is_mapped = !record.flags().is_unmapped();

        let reference = match record.reference_sequence_id() {
            Some(id) => {
                let name = header
                    .reference_sequences()
                    .get_index(id)
                    .map(|(name, _)| name.to_string())
                    .ok_or_else(|| {
                        KmerPlotError::invalid_record(format!(
                            "{}: reference sequence id {} is not in the header",
                            query_name, id
                        ))
                    })?;
                Some(name)
            }
            None if is_mapped => {
                return Err(KmerPlotError::invalid_record(format!(
                    "{}: mapped record without a reference sequence",
                    query_name
                )));
            }
            None => None,
        };

        let mapping_quality = record
            .mapping_quality()
            .map_or(MAPQ_UNAVAILABLE, |mq| mq.get());

        AlignmentRecord::from_query_name(&query_name, reference, is_mapped, mapping_quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAM: &str = "@HD\tVN:1.6\n\
@SQ\tSN:KIR2DL1_001\tLN:1000\n\
@SQ\tSN:KIR2DL2_002\tLN:1000\n\
s1_0_to_99\t0\tKIR2DL1_001\t1\t60\t100M\t*\t0\t0\t*\t*\n\
s1_0_to_99\t256\tKIR2DL2_002\t1\t60\t100M\t*\t0\t0\t*\t*\n\
s1_100_to_199\t4\t*\t0\t0\t*\t*\t0\t0\t*\t*\n\
s_x_200_to_299\t0\tKIR2DL2_002\t5\t255\t100M\t*\t0\t0\t*\t*\n";

    #[test]
    fn test_parse_sam_records() {
        let records = SamParser::parse_sam_reader(SAM.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);

        assert_eq!(records[0].sample, "s1");
        assert_eq!(records[0].window_start, 0);
        assert_eq!(records[0].window_end, 99);
        assert!(records[0].is_mapped);
        assert_eq!(records[0].gene(), Some("KIR2DL1"));
        assert_eq!(records[0].mapping_quality, 60);

        assert_eq!(records[1].gene(), Some("KIR2DL2"));

        assert!(!records[2].is_mapped);
        assert_eq!(records[2].reference, None);
        assert_eq!(records[2].window_start, 100);

        assert_eq!(records[3].sample, "s_x");
        assert_eq!(records[3].mapping_quality, MAPQ_UNAVAILABLE);
    }

    #[test]
    fn test_malformed_query_name_is_fatal() {
        let sam = "@HD\tVN:1.6\n@SQ\tSN:A\tLN:100\nread1\t0\tA\t1\t60\t10M\t*\t0\t0\t*\t*\n";
        let err = SamParser::parse_sam_reader(sam.as_bytes()).unwrap_err();
        assert!(matches!(err, KmerPlotError::MalformedIdentifier { .. }));
    }

    #[test]
    fn test_missing_query_name_is_invalid_record() {
        let sam = "@HD\tVN:1.6\n@SQ\tSN:A\tLN:100\n*\t4\t*\t0\t0\t*\t*\t0\t0\t*\t*\n";
        let err = SamParser::parse_sam_reader(sam.as_bytes()).unwrap_err();
        assert!(matches!(err, KmerPlotError::InvalidRecord { .. }));
    }
}
